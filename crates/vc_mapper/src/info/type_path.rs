use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;

use crate::Reflect;

// -----------------------------------------------------------------------------
// TypePath

/// A static accessor to type paths and names.
///
/// - `type_path`: Full name, a fixed and unique identifier for the type,
///   e.g. `alloc::vec::Vec<i32>`. Used as the marker of encoded records.
/// - `type_name`: The name without module path, may be duplicated, e.g. `Vec<i32>`.
///
/// Usually implemented by `#[derive(Reflect)]`.
pub trait TypePath: 'static {
    fn type_path() -> &'static str;

    fn type_name() -> &'static str;
}

// -----------------------------------------------------------------------------
// Type

/// The identity of a reflected type: [`TypeId`], type path and zero constructor.
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
    name: &'static str,
    zero: fn() -> Box<dyn Reflect>,
}

fn zero_of<T: Reflect + Default>() -> Box<dyn Reflect> {
    Box::new(T::default())
}

impl Type {
    /// Create the [`Type`] of `T`.
    #[inline]
    pub fn of<T: TypePath + Reflect + Default>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: T::type_path(),
            name: T::type_name(),
            zero: zero_of::<T>,
        }
    }

    #[inline(always)]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline(always)]
    pub fn path(&self) -> &'static str {
        self.path
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Create a fresh zero value of this type.
    #[inline]
    pub fn zero(&self) -> Box<dyn Reflect> {
        (self.zero)()
    }

    /// Check if the type is `T`.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}
