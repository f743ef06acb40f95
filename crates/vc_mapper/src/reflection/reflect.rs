use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{DynamicTyped, ReflectKind};
use crate::ops::{ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Reflect

/// The base trait of every reflected type.
///
/// A `Reflect` value can be inspected by kind through [`reflect_ref`] and
/// [`reflect_mut`], compared, cloned and overwritten without knowing its
/// concrete type. Implemented by `#[derive(Reflect)]` for records and by
/// this crate for primitives, `Option`, `Box`, `Vec`, maps and [`Dynamic`].
///
/// Every reflected type also implements `Default`, its zero value is
/// available through [`TypeInfo::zero`].
///
/// `Box<T>` is transparent: it reports the type, kind and [`TypeId`] of `T`.
///
/// [`reflect_ref`]: Reflect::reflect_ref
/// [`reflect_mut`]: Reflect::reflect_mut
/// [`Dynamic`]: crate::ops::Dynamic
/// [`TypeInfo::zero`]: crate::info::TypeInfo::zero
pub trait Reflect: DynamicTyped + Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn as_reflect(&self) -> &dyn Reflect;

    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;

    fn into_reflect(self: Box<Self>) -> Box<dyn Reflect>;

    fn reflect_kind(&self) -> ReflectKind;

    fn reflect_ref(&self) -> ReflectRef<'_>;

    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Deep clone through reflection.
    fn reflect_clone(&self) -> Box<dyn Reflect>;

    /// Value equality through reflection.
    ///
    /// Values of different concrete types are never equal.
    fn reflect_eq(&self, other: &dyn Reflect) -> bool;

    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Overwrite `self` with `value` if they have the same type,
    /// otherwise return `value` back.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Unbox a concrete value of `Self`, return `value` back on type mismatch.
    fn take_from(value: Box<dyn Reflect>) -> Result<Self, Box<dyn Reflect>>
    where
        Self: Sized;

    /// The [`TypeId`] of the underlying value.
    #[inline]
    fn ty_id(&self) -> TypeId {
        Any::type_id(self.as_any())
    }
}

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    ///
    /// ```
    /// use vc_mapper::Reflect;
    ///
    /// let x: Box<dyn Reflect> = Box::new(10_i32);
    /// assert!(x.is::<i32>());
    /// assert!(!x.is::<u32>());
    /// ```
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        if !self.is::<T>() {
            return Err(self);
        }
        match self.into_any().downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => unreachable!("type is already checked"),
        }
    }
}

impl fmt::Debug for dyn Reflect {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reflect_debug(f)
    }
}

// -----------------------------------------------------------------------------
// Macro

/// Implement the kind-independent methods of [`Reflect`].
///
/// Used by `#[derive(Reflect)]` and the built-in implementations.
#[doc(hidden)]
#[macro_export]
macro_rules! impl_reflect_cast_fn {
    ($kind:ident) => {
        #[inline]
        fn as_any(&self) -> &dyn ::core::any::Any {
            self
        }

        #[inline]
        fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
            self
        }

        #[inline]
        fn into_any(
            self: $crate::__macro_exports::Box<Self>,
        ) -> $crate::__macro_exports::Box<dyn ::core::any::Any> {
            self
        }

        #[inline]
        fn as_reflect(&self) -> &dyn $crate::Reflect {
            self
        }

        #[inline]
        fn as_reflect_mut(&mut self) -> &mut dyn $crate::Reflect {
            self
        }

        #[inline]
        fn into_reflect(
            self: $crate::__macro_exports::Box<Self>,
        ) -> $crate::__macro_exports::Box<dyn $crate::Reflect> {
            self
        }

        #[inline]
        fn reflect_kind(&self) -> $crate::info::ReflectKind {
            $crate::info::ReflectKind::$kind
        }

        #[inline]
        fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
            $crate::ops::ReflectRef::$kind(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
            $crate::ops::ReflectMut::$kind(self)
        }

        fn set(
            &mut self,
            value: $crate::__macro_exports::Box<dyn $crate::Reflect>,
        ) -> ::core::result::Result<(), $crate::__macro_exports::Box<dyn $crate::Reflect>> {
            *self = <Self as $crate::Reflect>::take_from(value)?;
            ::core::result::Result::Ok(())
        }

        #[inline]
        fn take_from(
            value: $crate::__macro_exports::Box<dyn $crate::Reflect>,
        ) -> ::core::result::Result<Self, $crate::__macro_exports::Box<dyn $crate::Reflect>> {
            value.take::<Self>()
        }
    };
}
