use alloc::boxed::Box;
use alloc::format;
use core::fmt;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell};
use crate::info::{OptionInfo, TypeInfo, TypePath, Typed};
use crate::ops::{Optional, option_debug, option_eq};

impl<T: Reflect + Typed + Default + Clone> TypePath for Option<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| format!("core::option::Option<{}>", T::type_path()))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| format!("Option<{}>", T::type_name()))
    }
}

impl<T: Reflect + Typed + Default + Clone> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Option(OptionInfo::new::<Self, T>()))
    }
}

impl<T: Reflect + Typed + Default + Clone> Reflect for Option<T> {
    crate::impl_reflect_cast_fn!(Option);

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(Clone::clone(self))
    }

    #[inline]
    fn reflect_eq(&self, other: &dyn Reflect) -> bool {
        option_eq(self, other)
    }

    #[inline]
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        option_debug(self, f)
    }
}

impl<T: Reflect + Typed + Default + Clone> Optional for Option<T> {
    #[inline]
    fn get(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(|value| value as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(|value| value as &mut dyn Reflect)
    }

    #[inline]
    fn get_or_insert_zero(&mut self) -> &mut dyn Reflect {
        self.get_or_insert_with(T::default)
    }

    #[inline]
    fn clear(&mut self) {
        *self = None;
    }

    fn replace(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = Some(T::take_from(value)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use crate::Reflect;
    use crate::info::{ReflectKind, Typed};
    use crate::ops::ReflectMut;

    #[test]
    fn option_paths() {
        assert_eq!(<Option<i32>>::type_info().type_path(), "core::option::Option<i32>");
        assert_eq!(<Option<Box<u8>>>::type_info().type_name(), "Option<u8>");
        assert_eq!(<Option<u8>>::type_info().deref().kind(), ReflectKind::Scalar);
    }

    #[test]
    fn allocate_on_demand() {
        let mut value: Option<Box<i32>> = None;
        let ReflectMut::Option(option) = value.reflect_mut() else {
            panic!("expected option kind");
        };
        assert!(option.is_none());
        let inner = option.get_or_insert_zero();
        assert!(inner.is::<i32>());
        *inner.downcast_mut::<i32>().unwrap() = 5;
        assert_eq!(value.as_deref(), Some(&5));
    }
}
