//! Declarative default values of record fields.
//!
//! Default values are read from `#[tag(default = "...")]` annotations:
//!
//! - Scalars parse the whole annotation, e.g. `default = "9"`.
//! - Lists parse one element per `,` token, e.g. `default = "1,2,3"`.
//! - Maps parse `key=value` tokens, e.g. `default = "x=1,y=2"`.
//! - Struct fields take the defaults of their own type.
//! - `default = "-"` ignores the field.
//!
//! # Example
//!
//! ```
//! use vc_mapper::defaults::{alloc_default, set_default};
//! use vc_mapper::derive::Reflect;
//!
//! #[derive(Reflect, Default, Clone, Debug, PartialEq)]
//! struct Server {
//!     #[tag(default = "8080")]
//!     pub port: u16,
//!     #[tag(default = "localhost")]
//!     pub host: Option<String>,
//!     #[tag(default = "1,2,3")]
//!     pub retries: Vec<u8>,
//! }
//!
//! let server: Server = alloc_default();
//! assert_eq!(server.port, 8080);
//! assert_eq!(server.host.as_deref(), Some("localhost"));
//! assert_eq!(server.retries, [1, 2, 3]);
//!
//! let mut server = Server { port: 9000, ..Default::default() };
//! set_default(&mut server);
//! assert_eq!(server.port, 9000);
//! assert_eq!(server.host.as_deref(), Some("localhost"));
//! ```

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use std::sync::{PoisonError, RwLock};

use crate::Reflect;
use crate::access::{alloc_indirect, field_by_indexes, field_slot_mut};
use crate::coerce::{CoerceError, text_to_value};
use crate::info::{ReflectKind, TypeInfo, Typed};
use crate::mapper::{FieldInfo, Mapper, TagFunc, default_tag_func};
use crate::ops::{ReflectMut, ReflectRef};
use crate::utils::TypeIdMap;

// -----------------------------------------------------------------------------
// DefaultStruct

/// The default value of one field.
pub struct DefaultField {
    index: Box<[usize]>,
    optional: bool,
    nested: bool,
    zero: Box<dyn Reflect>,
    default: Box<dyn Reflect>,
}

impl DefaultField {
    /// The field positions from the root record.
    #[inline(always)]
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// The zero value of the dereferenced field type.
    #[inline]
    pub fn zero(&self) -> &dyn Reflect {
        &*self.zero
    }

    /// The default value of the dereferenced field type.
    #[inline]
    pub fn default_value(&self) -> &dyn Reflect {
        &*self.default
    }
}

impl fmt::Debug for DefaultField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultField")
            .field("index", &self.index)
            .field("default", &self.default)
            .finish()
    }
}

/// The default values of a record type.
///
/// Holds the defaultable fields and the whole record with every default
/// applied, handed out by deep clone.
pub struct DefaultStruct {
    fields: Vec<DefaultField>,
    zero: Box<dyn Reflect>,
    default: Box<dyn Reflect>,
    // Struct types reachable through the fields, the record itself included
    // when it is recursive.
    reach: Vec<TypeId>,
}

impl DefaultStruct {
    #[inline]
    pub fn fields(&self) -> &[DefaultField] {
        &self.fields
    }

    /// The zero value of the record.
    #[inline]
    pub fn zero(&self) -> &dyn Reflect {
        &*self.zero
    }

    /// The record with every default applied.
    #[inline]
    pub fn default_value(&self) -> &dyn Reflect {
        &*self.default
    }
}

impl fmt::Debug for DefaultStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultStruct")
            .field("fields", &self.fields)
            .field("default", &self.default)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// DefaultMapper

#[cold]
#[inline(never)]
fn invalid_default(info: &TypeInfo, field: &FieldInfo, err: CoerceError) -> ! {
    panic!(
        "Invalid default value of `{}.{}`: {err}",
        info.type_path(),
        field.path(),
    );
}

/// Store a clone of `default` into a slot of the same type.
fn store_default(slot: &mut dyn Reflect, default: &dyn Reflect) {
    if slot.set(default.reflect_clone()).is_err() {
        unreachable!(
            "default of `{}` stored into `{}`",
            default.reflect_type_path(),
            slot.reflect_type_path(),
        );
    }
}

#[inline]
fn reaches_path(built: &DefaultStruct, building: &[TypeId]) -> bool {
    built.reach.iter().any(|id| building.contains(id))
}

fn add_reach(reach: &mut Vec<TypeId>, type_id: TypeId) {
    if !reach.contains(&type_id) {
        reach.push(type_id);
    }
}

/// A cache of default values per record type.
pub struct DefaultMapper {
    mapper: Mapper,
    cache: RwLock<TypeIdMap<Arc<DefaultStruct>>>,
}

/// The default values read from `default` annotations.
pub static DEFAULT_MAPPER: DefaultMapper = DefaultMapper::new("default", default_tag_func);

impl DefaultMapper {
    pub const fn new(tag_name: &'static str, tag_func: TagFunc) -> Self {
        Self {
            mapper: Mapper::new(tag_name, tag_func),
            cache: RwLock::new(TypeIdMap::new()),
        }
    }

    #[inline(always)]
    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    /// Returns the default values of a record type, building them on the first call.
    ///
    /// # Panics
    ///
    /// - The type is not a struct, or an `Option` of a struct.
    /// - A default annotation can not be parsed into its field.
    pub fn get_default_struct(&self, info: &'static TypeInfo) -> Arc<DefaultStruct> {
        self.default_struct(info.deref(), &mut Vec::new())
    }

    /// Returns the template of `info` as seen from the types in `building`.
    ///
    /// A template only depends on that path when it reaches one of its
    /// types. Only templates reaching none of them are cached, and a cached
    /// template is only reused under such a path.
    fn default_struct(
        &self,
        info: &'static TypeInfo,
        building: &mut Vec<TypeId>,
    ) -> Arc<DefaultStruct> {
        let type_id = info.type_id();
        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            && !reaches_path(cached, building)
        {
            return Arc::clone(cached);
        }

        building.push(type_id);
        let built = Arc::new(self.build(info, building));
        building.pop();

        log::debug!(
            "Built default template of `{}` with {} fields.",
            info.type_path(),
            built.fields.len(),
        );

        if reaches_path(&built, building) {
            return built;
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.get_or_insert(type_id, || built))
    }

    fn build(&self, info: &'static TypeInfo, building: &mut Vec<TypeId>) -> DefaultStruct {
        let map = self.mapper.type_map_of(info);
        let mut fields = Vec::new();
        let mut template = info.zero();
        let mut reach = Vec::new();

        for field in map.children(map.tree()) {
            let Some(default) = self.field_default(info, field, building, &mut reach) else {
                continue;
            };

            match field_by_indexes(&mut *template, field.index()) {
                Ok(slot) => store_default(slot, &*default),
                Err(err) => invalid_default(info, field, err.into()),
            }

            fields.push(DefaultField {
                index: field.index().into(),
                optional: field.is_optional(),
                nested: field.is_struct(),
                zero: field.zero(),
                default,
            });
        }

        DefaultStruct {
            fields,
            zero: info.zero(),
            default: template,
            reach,
        }
    }

    /// Parse the default value of a field, `None` if it has none.
    fn field_default(
        &self,
        info: &'static TypeInfo,
        field: &FieldInfo,
        building: &mut Vec<TypeId>,
        reach: &mut Vec<TypeId>,
    ) -> Option<Box<dyn Reflect>> {
        let elem = field.elem_info();
        if elem.kind() != ReflectKind::Struct && field.parts().is_empty() {
            return None;
        }

        let mut value = elem.zero();
        let parsed = match elem {
            TypeInfo::Struct(_) => {
                add_reach(reach, elem.type_id());
                // Being built on the way from the root, treated as having no defaults.
                if building.contains(&elem.type_id()) {
                    return None;
                }
                let child = self.default_struct(elem, building);
                for &type_id in &child.reach {
                    add_reach(reach, type_id);
                }
                if child.fields.is_empty() {
                    return None;
                }
                return Some(child.default.reflect_clone());
            }
            TypeInfo::Map(map_info) => match value.reflect_mut() {
                ReflectMut::Map(map) => field.options().iter().try_for_each(|(key, item)| {
                    let mut new_key = map_info.key_info().zero();
                    text_to_value(key, &mut *new_key)?;
                    let mut new_item = map_info.value_info().zero();
                    text_to_value(item, &mut *new_item)?;
                    map.insert_boxed(new_key, new_item)
                        .map_err(|rejected| CoerceError::TypeMismatch {
                            expected: elem.type_path(),
                            actual: rejected.reflect_type_path(),
                        })
                }),
                _ => Ok(()),
            },
            TypeInfo::List(_) => match value.reflect_mut() {
                ReflectMut::List(list) => field
                    .parts()
                    .iter()
                    .try_for_each(|part| text_to_value(part, list.push_zero())),
                _ => Ok(()),
            },
            _ => text_to_value(&field.parts()[0], &mut *value),
        };

        match parsed {
            Ok(()) => Some(value),
            Err(err) => invalid_default(info, field, err),
        }
    }

    /// Apply default values to the zero fields of a record.
    ///
    /// - A record equal to its zero value is replaced by the defaults.
    /// - A `None` field takes its default.
    /// - A struct field, or a `Some` struct field, is handled recursively.
    /// - Any other field takes its default only when it equals its zero value.
    ///
    /// # Panics
    ///
    /// See [`get_default_struct`](Self::get_default_struct).
    pub fn set_default(&self, value: &mut dyn Reflect) {
        let value = alloc_indirect(value);
        let defaults = self.get_default_struct(value.reflect_type_info());

        if value.reflect_eq(defaults.zero()) {
            store_default(value, &*defaults.default);
            return;
        }

        for field in &defaults.fields {
            let Ok(slot) = field_slot_mut(value, &field.index) else {
                continue;
            };

            if field.optional {
                let is_none = match slot.reflect_ref() {
                    ReflectRef::Option(option) => option.is_none(),
                    _ => false,
                };
                let inner = alloc_indirect(slot);
                if is_none {
                    store_default(inner, &*field.default);
                } else if field.nested {
                    self.set_default(inner);
                }
            } else if field.nested {
                self.set_default(slot);
            } else if slot.reflect_eq(field.zero()) {
                store_default(slot, &*field.default);
            }
        }
    }

    /// Allocate a record of a type with every default applied.
    ///
    /// An `Option` type is returned as `Some`.
    pub fn alloc_default_of(&self, info: &'static TypeInfo) -> Box<dyn Reflect> {
        let defaults = self.get_default_struct(info);
        let mut value = info.zero();
        store_default(alloc_indirect(&mut *value), &*defaults.default);
        value
    }

    /// Allocate a `T` with every default applied.
    pub fn alloc_default<T: Typed + Reflect>(&self) -> T {
        match T::take_from(self.alloc_default_of(T::type_info())) {
            Ok(value) => value,
            Err(_) => unreachable!("the zero value of `T` is a `T`"),
        }
    }
}

impl fmt::Debug for DefaultMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultMapper")
            .field("mapper", &self.mapper)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Shortcuts

/// Apply default values through [`DEFAULT_MAPPER`], see [`DefaultMapper::set_default`].
#[inline]
pub fn set_default(value: &mut dyn Reflect) {
    DEFAULT_MAPPER.set_default(value);
}

/// Allocate a `T` with default values through [`DEFAULT_MAPPER`].
#[inline]
pub fn alloc_default<T: Typed + Reflect>() -> T {
    DEFAULT_MAPPER.alloc_default()
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::derive::Reflect;

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Third {
        #[tag(default = "Third")]
        pub third: String,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Foo {
        #[tag(default = "foo")]
        pub foo: String,
        #[tag(default = "pfoo")]
        pub p_foo: Option<String>,
        pub third: Third,
        pub p_third: Option<Box<Third>>,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct NoTag {
        #[tag(form = ",omitempty")]
        pub a: i32,
        pub b: i32,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct FooBar {
        #[tag(default = "1.23")]
        private: f32,
        pub no_tag: String,
        #[tag(default = "-")]
        pub ignore: bool,
        #[tag(default = "9")]
        pub int: i64,
        #[tag(default = "10")]
        pub p_int: Option<i64>,
        #[reflect(embedded)]
        pub base: Foo,
        pub p_foo: Option<Box<Foo>>,
        #[tag(default = "1,2,3,4,5")]
        pub bar: Vec<i16>,
        #[tag(default = "2,3,4,5,6")]
        pub p_bar: Option<Vec<i16>>,
        #[tag(default = "3,4,5,6,7")]
        pub bar_p: Vec<Option<i64>>,
        #[tag(default = "x=1,y=2")]
        pub map: BTreeMap<String, i32>,
        pub n: NoTag,
        pub p_n: Option<Box<NoTag>>,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Chain {
        #[tag(default = "1")]
        pub value: i32,
        pub next: Option<Box<Chain>>,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Bad {
        #[tag(default = "x")]
        pub n: u8,
    }

    fn third() -> Third {
        Third {
            third: String::from("Third"),
        }
    }

    fn foo() -> Foo {
        Foo {
            foo: String::from("foo"),
            p_foo: Some(String::from("pfoo")),
            third: third(),
            p_third: Some(Box::new(third())),
        }
    }

    fn foo_bar() -> FooBar {
        FooBar {
            private: 0.0,
            no_tag: String::new(),
            ignore: false,
            int: 9,
            p_int: Some(10),
            base: foo(),
            p_foo: Some(Box::new(foo())),
            bar: vec![1, 2, 3, 4, 5],
            p_bar: Some(vec![2, 3, 4, 5, 6]),
            bar_p: vec![Some(3), Some(4), Some(5), Some(6), Some(7)],
            map: BTreeMap::from([(String::from("x"), 1), (String::from("y"), 2)]),
            n: NoTag::default(),
            p_n: None,
        }
    }

    #[test]
    fn default_template() {
        let defaults = DEFAULT_MAPPER.get_default_struct(FooBar::type_info());
        assert!(defaults.zero().reflect_eq(&FooBar::default()));
        assert!(defaults.default_value().reflect_eq(&foo_bar()));

        let indexes: Vec<&[usize]> = defaults.fields().iter().map(DefaultField::index).collect();
        assert!(indexes.contains(&&[5, 0][..]));
        assert!(!indexes.contains(&&[0][..]));
        assert!(!indexes.contains(&&[2][..]));
        assert!(!indexes.contains(&&[11][..]));
    }

    #[test]
    fn alloc_isolated() {
        let mut first: FooBar = alloc_default();
        assert_eq!(first, foo_bar());

        first.bar.push(6);
        first.base.third.third.push('!');
        first.map.clear();

        let second: FooBar = alloc_default();
        assert_eq!(second, foo_bar());
    }

    #[test]
    fn set_default_on_zero() {
        let mut value = FooBar::default();
        set_default(&mut value);
        assert_eq!(value, foo_bar());
    }

    #[test]
    fn set_default_keeps_values() {
        let mut value = FooBar {
            int: 5,
            bar: vec![7],
            p_foo: Some(Box::new(Foo {
                foo: String::from("keep"),
                ..Default::default()
            })),
            p_bar: Some(Vec::new()),
            ..Default::default()
        };
        set_default(&mut value);

        assert_eq!(value.int, 5);
        assert_eq!(value.p_int, Some(10));
        assert_eq!(value.bar, [7]);
        // `Some` of a non-struct is kept as is.
        assert_eq!(value.p_bar, Some(Vec::new()));
        assert_eq!(value.base, foo());
        assert_eq!(
            value.p_foo.as_deref(),
            Some(&Foo {
                foo: String::from("keep"),
                ..foo()
            })
        );
        assert_eq!(value.p_n, None);
    }

    #[test]
    fn recursive_type() {
        let value: Chain = alloc_default();
        assert_eq!(value, Chain { value: 1, next: None });

        let mut value = Chain {
            value: 0,
            next: Some(Box::new(Chain {
                value: 0,
                next: Some(Box::new(Chain::default())),
            })),
        };
        set_default(&mut value);
        assert_eq!(value.value, 1);
        // The recursive field has no default of its own.
        let next = value.next.as_deref().unwrap();
        assert_eq!(next.value, 0);
        assert!(next.next.is_some());
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Outer {
        pub inner: Inner,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Inner {
        #[tag(default = "1")]
        pub x: i32,
        pub outer: Option<Box<Outer>>,
    }

    #[test]
    fn mutual_recursion_any_order() {
        let expected = Outer {
            inner: Inner { x: 1, outer: None },
        };

        let inner_first = DefaultMapper::new("default", default_tag_func);
        let inner: Inner = inner_first.alloc_default();
        assert_eq!(inner, Inner { x: 1, outer: None });
        let outer: Outer = inner_first.alloc_default();
        assert_eq!(outer, expected);

        let outer_first = DefaultMapper::new("default", default_tag_func);
        let outer: Outer = outer_first.alloc_default();
        assert_eq!(outer, expected);
        let inner: Inner = outer_first.alloc_default();
        assert_eq!(inner, Inner { x: 1, outer: None });
    }

    #[test]
    fn defaults_stored_in_every_slot() {
        let mapper = DefaultMapper::new("default", default_tag_func);

        let mut zero = Foo::default();
        mapper.set_default(&mut zero);
        assert_eq!(zero, foo());

        let mut partial = Foo {
            third: Third {
                third: String::from("keep"),
            },
            ..Foo::default()
        };
        mapper.set_default(&mut partial);
        assert_eq!(partial.foo, "foo");
        assert_eq!(partial.p_foo.as_deref(), Some("pfoo"));
        assert_eq!(partial.third.third, "keep");
        assert_eq!(partial.p_third.as_deref(), Some(&third()));

        let mut missing: Option<Box<Foo>> = None;
        mapper.set_default(&mut missing);
        assert_eq!(missing.as_deref(), Some(&foo()));
    }

    #[test]
    fn alloc_option_type() {
        let value = DEFAULT_MAPPER.alloc_default_of(<Option<Box<Third>>>::type_info());
        let value = value.downcast_ref::<Option<Box<Third>>>().unwrap();
        assert_eq!(value.as_deref(), Some(&third()));
    }

    #[test]
    #[should_panic(expected = "Invalid default value")]
    fn invalid_annotation_panics() {
        let _: Bad = alloc_default();
    }
}
