use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use core::fmt;
use core::hash::Hash;
use std::collections::HashMap;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell};
use crate::info::{MapInfo, TypeInfo, TypePath, Typed};
use crate::ops::{Map, map_debug, map_eq};

macro_rules! impl_reflect_map {
    ($ty:ident, $path:literal, $($key_bound:tt)+) => {
        impl<K, V> TypePath for $ty<K, V>
        where
            K: Reflect + Typed + Default + Clone + $($key_bound)+,
            V: Reflect + Typed + Default + Clone,
        {
            fn type_path() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    format!(concat!($path, "<{}, {}>"), K::type_path(), V::type_path())
                })
            }

            fn type_name() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    format!(concat!(stringify!($ty), "<{}, {}>"), K::type_name(), V::type_name())
                })
            }
        }

        impl<K, V> Typed for $ty<K, V>
        where
            K: Reflect + Typed + Default + Clone + $($key_bound)+,
            V: Reflect + Typed + Default + Clone,
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::Map(MapInfo::new::<Self, K, V>()))
            }
        }

        impl<K, V> Reflect for $ty<K, V>
        where
            K: Reflect + Typed + Default + Clone + $($key_bound)+,
            V: Reflect + Typed + Default + Clone,
        {
            crate::impl_reflect_cast_fn!(Map);

            #[inline]
            fn reflect_clone(&self) -> Box<dyn Reflect> {
                Box::new(Clone::clone(self))
            }

            #[inline]
            fn reflect_eq(&self, other: &dyn Reflect) -> bool {
                map_eq(self, other)
            }

            #[inline]
            fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                map_debug(self, f)
            }
        }

        impl<K, V> Map for $ty<K, V>
        where
            K: Reflect + Typed + Default + Clone + $($key_bound)+,
            V: Reflect + Typed + Default + Clone,
        {
            #[inline]
            fn len(&self) -> usize {
                $ty::len(self)
            }

            fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect> {
                let key = key.downcast_ref::<K>()?;
                $ty::get(self, key).map(|value| value as &dyn Reflect)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
                Box::new(
                    $ty::iter(self).map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect)),
                )
            }

            fn insert_boxed(
                &mut self,
                key: Box<dyn Reflect>,
                value: Box<dyn Reflect>,
            ) -> Result<(), Box<dyn Reflect>> {
                let key = K::take_from(key)?;
                let value = V::take_from(value)?;
                $ty::insert(self, key, value);
                Ok(())
            }

            #[inline]
            fn clear(&mut self) {
                $ty::clear(self);
            }
        }
    };
}

impl_reflect_map!(HashMap, "std::collections::HashMap", Eq + Hash);
impl_reflect_map!(BTreeMap, "alloc::collections::BTreeMap", Ord);

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use std::collections::HashMap;

    use crate::Reflect;
    use crate::info::Typed;
    use crate::ops::{ReflectMut, ReflectRef};

    #[test]
    fn map_ops() {
        let mut map: HashMap<String, i32> = HashMap::new();
        let ReflectMut::Map(ops) = map.reflect_mut() else {
            panic!("expected map kind");
        };
        assert!(ops.insert_boxed(Box::new(String::from("a")), Box::new(1_i32)).is_ok());
        assert!(ops.insert_boxed(Box::new(1_u8), Box::new(1_i32)).is_err());
        assert_eq!(ops.len(), 1);
        assert_eq!(map.get("a"), Some(&1));

        let ReflectRef::Map(ops) = map.reflect_ref() else {
            panic!("expected map kind");
        };
        let value = ops.get(&String::from("a")).unwrap();
        assert!(value.reflect_eq(&1_i32));
    }

    #[test]
    fn map_paths() {
        let info = <BTreeMap<String, u8>>::type_info();
        assert_eq!(
            info.type_path(),
            "alloc::collections::BTreeMap<alloc::string::String, u8>"
        );
        assert_eq!(info.type_name(), "BTreeMap<String, u8>");
        let info = info.as_map().unwrap();
        assert_eq!(info.key_info().type_name(), "String");
    }
}
