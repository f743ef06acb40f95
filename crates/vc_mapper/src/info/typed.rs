use crate::info::{TypeInfo, TypePath};

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to compile-time type information.
///
/// Automatically implemented by `#[derive(Reflect)]`,
/// the result is cached in a static cell and never rebuilt.
///
/// See [`NonGenericTypeInfoCell`](crate::impls::NonGenericTypeInfoCell).
pub trait Typed: TypePath {
    fn type_info() -> &'static TypeInfo;
}

// -----------------------------------------------------------------------------
// DynamicTyped

/// Dynamic dispatch for [`Typed`].
///
/// Implemented for every [`Typed`] type, do not implement it manually.
pub trait DynamicTyped {
    fn reflect_type_info(&self) -> &'static TypeInfo;

    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        self.reflect_type_info().type_path()
    }
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }
}
