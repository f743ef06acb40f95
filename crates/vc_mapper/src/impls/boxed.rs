use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::Reflect;
use crate::info::{ReflectKind, TypeInfo, TypePath, Typed};
use crate::ops::{ReflectMut, ReflectRef};

// `Box<T>` is transparent, so that `Option<Box<T>>` behaves as
// an optional reference to `T` and recursive records can be expressed.

impl<T: Typed> TypePath for Box<T> {
    #[inline]
    fn type_path() -> &'static str {
        T::type_path()
    }

    #[inline]
    fn type_name() -> &'static str {
        T::type_name()
    }
}

impl<T: Typed> Typed for Box<T> {
    #[inline]
    fn type_info() -> &'static TypeInfo {
        T::type_info()
    }
}

impl<T: Reflect + Typed> Reflect for Box<T> {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        T::as_any(self)
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        T::as_any_mut(self)
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        T::into_any(*self)
    }

    #[inline]
    fn as_reflect(&self) -> &dyn Reflect {
        T::as_reflect(self)
    }

    #[inline]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect {
        T::as_reflect_mut(self)
    }

    #[inline]
    fn into_reflect(self: Box<Self>) -> Box<dyn Reflect> {
        T::into_reflect(*self)
    }

    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        T::reflect_kind(self)
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        T::reflect_ref(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        T::reflect_mut(self)
    }

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        T::reflect_clone(self)
    }

    #[inline]
    fn reflect_eq(&self, other: &dyn Reflect) -> bool {
        T::reflect_eq(self, other)
    }

    #[inline]
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        T::reflect_debug(self, f)
    }

    #[inline]
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        T::set(self, value)
    }

    #[inline]
    fn take_from(value: Box<dyn Reflect>) -> Result<Self, Box<dyn Reflect>> {
        T::take_from(value).map(Box::new)
    }

    #[inline]
    fn ty_id(&self) -> TypeId {
        T::ty_id(self)
    }
}
