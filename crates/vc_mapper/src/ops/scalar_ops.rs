use alloc::string::String;

use crate::Reflect;
use crate::info::ScalarKind;

// -----------------------------------------------------------------------------
// Scalar

/// A borrowed primitive value, widened to 64 bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRef<'a> {
    Bool(bool),
    Int(i64),
    Uint(u64),
    F32(f32),
    F64(f64),
    Str(&'a str),
}

/// An owned primitive value, ready to be stored into a [`Scalar`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    F32(f32),
    F64(f64),
    Str(String),
}

/// A trait used to power primitive operations via reflection.
///
/// Implemented for `bool`, every integer and float type and `String`.
pub trait Scalar: Reflect {
    fn scalar_kind(&self) -> ScalarKind;

    fn scalar_ref(&self) -> ScalarRef<'_>;

    /// Store `value` if its variant matches the kind and it fits the width,
    /// otherwise return it back.
    fn store(&mut self, value: ScalarValue) -> Result<(), ScalarValue>;
}
