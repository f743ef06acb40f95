use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;
use core::fmt;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell};
use crate::info::{ListInfo, TypeInfo, TypePath, Typed};
use crate::ops::{List, list_debug, list_eq};

impl<T: Reflect + Typed + Default + Clone> TypePath for Vec<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| format!("alloc::vec::Vec<{}>", T::type_path()))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| format!("Vec<{}>", T::type_name()))
    }
}

impl<T: Reflect + Typed + Default + Clone> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>()))
    }
}

impl<T: Reflect + Typed + Default + Clone> Reflect for Vec<T> {
    crate::impl_reflect_cast_fn!(List);

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(Clone::clone(self))
    }

    #[inline]
    fn reflect_eq(&self, other: &dyn Reflect) -> bool {
        list_eq(self, other)
    }

    #[inline]
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        list_debug(self, f)
    }
}

impl<T: Reflect + Typed + Default + Clone> List for Vec<T> {
    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(|value| value as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|value| value as &mut dyn Reflect)
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn push_zero(&mut self) -> &mut dyn Reflect {
        Vec::push(self, T::default());
        let index = Vec::len(self) - 1;
        &mut self[index]
    }

    fn push_boxed(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        Vec::push(self, T::take_from(value)?);
        Ok(())
    }

    #[inline]
    fn clear(&mut self) {
        Vec::clear(self);
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::Reflect;
    use crate::info::Typed;
    use crate::ops::{ReflectMut, ReflectRef};

    #[test]
    fn list_ops() {
        let mut list: Vec<String> = vec![String::from("a")];
        let ReflectMut::List(ops) = list.reflect_mut() else {
            panic!("expected list kind");
        };
        ops.push_zero();
        assert!(ops.push_boxed(Box::new(String::from("c"))).is_ok());
        assert!(ops.push_boxed(Box::new(1_i32)).is_err());
        assert_eq!(list, ["a", "", "c"]);

        let ReflectRef::List(ops) = list.reflect_ref() else {
            panic!("expected list kind");
        };
        assert_eq!(ops.iter().count(), 3);
        assert!(list.reflect_eq(&vec![String::from("a"), String::new(), String::from("c")]));
        assert_eq!(<Vec<u8>>::type_info().type_path(), "alloc::vec::Vec<u8>");
    }
}
