use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{OpaqueInfo, TypeInfo, TypePath, Typed};

// -----------------------------------------------------------------------------
// Dynamic

/// A holder of any reflected value, or nothing.
///
/// Used as the field type of untyped values. Decoded untyped data is
/// built from `Dynamic`, `Vec<Dynamic>` and `BTreeMap<String, Dynamic>`.
///
/// # Example
///
/// ```
/// use vc_mapper::ops::Dynamic;
///
/// let value = Dynamic::new(42_i64);
/// assert_eq!(value.downcast_ref::<i64>(), Some(&42));
/// assert!(Dynamic::nil().is_nil());
/// assert_eq!(value.clone(), value);
/// ```
#[derive(Default)]
pub struct Dynamic(Option<Box<dyn Reflect>>);

impl Dynamic {
    #[inline]
    pub const fn nil() -> Self {
        Self(None)
    }

    #[inline]
    pub fn new<T: Reflect>(value: T) -> Self {
        Self::from_boxed(Box::new(value))
    }

    /// Wrap a boxed value, a boxed `Dynamic` is unwrapped instead of nested.
    pub fn from_boxed(value: Box<dyn Reflect>) -> Self {
        match value.take::<Self>() {
            Ok(dynamic) => dynamic,
            Err(value) => Self(Some(value)),
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        self.0.is_none()
    }

    #[inline]
    pub fn get(&self) -> Option<&dyn Reflect> {
        self.0.as_deref()
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.0.as_deref_mut()
    }

    /// Replace the held value.
    #[inline]
    pub fn replace(&mut self, value: Box<dyn Reflect>) {
        *self = Self::from_boxed(value);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0 = None;
    }

    #[inline]
    pub fn into_inner(self) -> Option<Box<dyn Reflect>> {
        self.0
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.get()?.downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.get_mut()?.downcast_mut()
    }

    /// Take the held value as `T`, return `self` back on mismatch.
    pub fn take<T: Any>(self) -> Result<T, Self> {
        match self.0 {
            Some(value) => value.take::<T>().map_err(|value| Self(Some(value))),
            None => Err(Self(None)),
        }
    }
}

impl Clone for Dynamic {
    fn clone(&self) -> Self {
        Self(self.get().map(|value| value.reflect_clone()))
    }
}

impl PartialEq for Dynamic {
    fn eq(&self, other: &Self) -> bool {
        match (self.get(), other.get()) {
            (None, None) => true,
            (Some(a), Some(b)) => a.reflect_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => value.reflect_debug(f),
            None => f.write_str("nil"),
        }
    }
}

// -----------------------------------------------------------------------------
// Reflect

impl TypePath for Dynamic {
    #[inline]
    fn type_path() -> &'static str {
        "vc_mapper::ops::Dynamic"
    }

    #[inline]
    fn type_name() -> &'static str {
        "Dynamic"
    }
}

impl Typed for Dynamic {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Dynamic(OpaqueInfo::new::<Self>()))
    }
}

impl Reflect for Dynamic {
    crate::impl_reflect_cast_fn!(Dynamic);

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn reflect_eq(&self, other: &dyn Reflect) -> bool {
        other.downcast_ref::<Self>().is_some_and(|other| self == other)
    }

    #[inline]
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
