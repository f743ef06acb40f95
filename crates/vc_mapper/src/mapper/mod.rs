//! Field trees of record types, cached per type.
//!
//! A [`Mapper`] resolves the canonical name of every field from its
//! annotations and builds a [`StructMap`]:
//!
//! - Nested struct fields are mapped as `parent.child` paths.
//! - Fields of a `flatten` struct field, or of an embedded field that keeps
//!   its default name, are mapped at the parent level.
//! - An `omitnested` struct field is mapped but its fields are not.
//! - Non-public fields are skipped unless embedded.
//!
//! # Example
//!
//! ```
//! use vc_mapper::derive::Reflect;
//! use vc_mapper::mapper::{Mapper, field_name_to_underscore};
//!
//! #[derive(Reflect, Default, Clone)]
//! struct Base {
//!     pub id: u64,
//! }
//!
//! #[derive(Reflect, Default, Clone)]
//! struct User {
//!     #[reflect(embedded)]
//!     pub Base: Base,
//!     #[tag(json = "login")]
//!     pub UserName: String,
//!     pub Address: Option<Box<Address>>,
//! }
//!
//! #[derive(Reflect, Default, Clone)]
//! struct Address {
//!     pub ZipCode: String,
//! }
//!
//! static MAPPER: Mapper = Mapper::new("json", field_name_to_underscore);
//!
//! let map = MAPPER.type_map::<User>();
//! assert_eq!(map.get_by_path("id").unwrap().index(), [0, 0]);
//! assert_eq!(map.get_by_path("login").unwrap().index(), [1]);
//! assert_eq!(map.get_by_path("address.zip_code").unwrap().index(), [2, 0]);
//! assert!(map.leaf("address").is_none());
//! ```

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod field_info;
mod tag;

// -----------------------------------------------------------------------------
// Exports

pub use field_info::{FieldId, FieldInfo, StructMap};
pub use tag::{FLATTEN, IGNORE_THIS_FIELD, OMIT_EMPTY, OMIT_NESTED, TagFunc};
pub use tag::{camel_case_to_underscore, underscore_to_camel_case};
pub use tag::{default_tag_func, field_name_to_lower, field_name_to_underscore, std_tag_func};

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::{PoisonError, RwLock};

use crate::Reflect;
use crate::access::{field_by_indexes, field_by_indexes_read_only, field_slot_mut};
use crate::coerce::{CoerceError, assign_dynamic};
use crate::info::{TypeInfo, Typed};
use crate::utils::TypeIdMap;

// -----------------------------------------------------------------------------
// Mapper

/// A mapper of canonical names to record fields.
///
/// The annotation under `tag_name` is handed to `tag_func` with the declared
/// field name to resolve the canonical name and the options of the field.
/// Field trees are built on first use and cached for the process lifetime.
pub struct Mapper {
    tag_name: &'static str,
    tag_func: TagFunc,
    cache: RwLock<TypeIdMap<Arc<StructMap>>>,
}

/// A mapper without annotation key, fields keep their declared names.
pub static STD_MAPPER: Mapper = Mapper::new("", std_tag_func);

impl Mapper {
    pub const fn new(tag_name: &'static str, tag_func: TagFunc) -> Self {
        Self {
            tag_name,
            tag_func,
            cache: RwLock::new(TypeIdMap::new()),
        }
    }

    /// A mapper reading `tag_name` annotations with [`std_tag_func`].
    #[inline]
    pub const fn with_tag(tag_name: &'static str) -> Self {
        Self::new(tag_name, std_tag_func)
    }

    #[inline(always)]
    pub fn tag_name(&self) -> &'static str {
        self.tag_name
    }

    #[inline(always)]
    pub fn tag_func(&self) -> TagFunc {
        self.tag_func
    }

    /// Returns the field tree of `T`.
    ///
    /// # Panics
    ///
    /// See [`type_map_of`](Self::type_map_of).
    #[inline]
    pub fn type_map<T: Typed>(&self) -> Arc<StructMap> {
        self.type_map_of(T::type_info())
    }

    /// Returns the field tree of a type, building it on the first call.
    ///
    /// # Panics
    ///
    /// - The type is not a struct, or an `Option` of a struct.
    /// - Two fields of the type resolve to the same canonical path.
    pub fn type_map_of(&self, info: &'static TypeInfo) -> Arc<StructMap> {
        let type_id = info.type_id();
        if let Some(map) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return Arc::clone(map);
        }

        let map = Arc::new(builder::build_struct_map(info, self.tag_name, self.tag_func));
        log::debug!(
            "Built field tree of `{}` with {} fields.",
            info.type_path(),
            map.fields().len(),
        );
        #[cfg(all(debug_assertions, feature = "debug"))]
        log::trace!("{map:#?}");

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.get_or_insert(type_id, || map))
    }

    /// Returns a cached field tree by the type path of the record.
    pub fn name_map(&self, type_path: &str) -> Option<Arc<StructMap>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|map| map.type_info().type_path() == type_path)
            .map(Arc::clone)
    }

    /// Returns every field of `value` by canonical path.
    ///
    /// Fields behind a `None` link are absent.
    pub fn field_map<'a>(&self, value: &'a dyn Reflect) -> BTreeMap<String, &'a dyn Reflect> {
        let map = self.type_map_of(value.reflect_type_info());
        map.paths()
            .filter_map(|(path, field)| {
                let value = field_by_indexes_read_only(value, field.index())?;
                Some((String::from(path), value))
            })
            .collect()
    }

    /// Returns the field of `value` with the canonical `path`, `""` is the record.
    ///
    /// `None` if the path is unknown, or the field is behind a `None` link.
    pub fn field_by_path<'a>(&self, value: &'a dyn Reflect, path: &str) -> Option<&'a dyn Reflect> {
        let map = self.type_map_of(value.reflect_type_info());
        let field = map.get_by_path(path)?;
        field_by_indexes_read_only(value, field.index())
    }

    /// Returns the field of `value` with the canonical `path`,
    /// `None` links on the way are allocated.
    ///
    /// ```
    /// use vc_mapper::derive::Reflect;
    /// use vc_mapper::mapper::STD_MAPPER;
    ///
    /// #[derive(Reflect, Default, Clone)]
    /// struct Config {
    ///     pub Retry: Option<u32>,
    /// }
    ///
    /// let mut config = Config::default();
    /// let retry = STD_MAPPER.field_by_path_mut(&mut config, "Retry").unwrap();
    /// *retry.downcast_mut::<u32>().unwrap() = 3;
    /// assert_eq!(config.Retry, Some(3));
    /// ```
    pub fn field_by_path_mut<'a>(
        &self,
        value: &'a mut dyn Reflect,
        path: &str,
    ) -> Option<&'a mut dyn Reflect> {
        let map = self.type_map_of(value.reflect_type_info());
        let field = map.get_by_path(path)?;
        field_by_indexes(value, field.index()).ok()
    }

    /// Returns the fields of `value` for each path, see [`field_by_path`](Self::field_by_path).
    pub fn fields_by_path<'a>(
        &self,
        value: &'a dyn Reflect,
        paths: &[&str],
    ) -> Vec<Option<&'a dyn Reflect>> {
        let map = self.type_map_of(value.reflect_type_info());
        paths
            .iter()
            .map(|path| {
                let field = map.get_by_path(path)?;
                field_by_indexes_read_only(value, field.index())
            })
            .collect()
    }

    /// Returns the index path of each canonical path, empty for unknown paths.
    pub fn traversals_by_path(&self, info: &'static TypeInfo, paths: &[&str]) -> Vec<Vec<usize>> {
        let map = self.type_map_of(info);
        paths
            .iter()
            .map(|path| match map.paths.get(*path) {
                Some(id) => map.nodes[id.index()].index().to_vec(),
                None => Vec::new(),
            })
            .collect()
    }
}

impl core::fmt::Debug for Mapper {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Mapper")
            .field("tag_name", &self.tag_name)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Copy

/// Copy every leaf of `src` into the leaf of `dst` with the same path.
///
/// Paths are resolved by [`STD_MAPPER`], values are assigned with
/// [`assign_dynamic`]. Leaves behind a `None` link of `src` are skipped.
///
/// ```
/// use vc_mapper::derive::Reflect;
/// use vc_mapper::mapper::copy_struct;
///
/// #[derive(Reflect, Default, Clone)]
/// struct Form {
///     pub Name: String,
///     pub Age: String,
/// }
///
/// #[derive(Reflect, Default, Clone)]
/// struct Person {
///     pub Name: String,
///     pub Age: Option<u8>,
///     pub Email: String,
/// }
///
/// let form = Form { Name: "Ann".into(), Age: "30".into() };
/// let mut person = Person::default();
/// copy_struct(&mut person, &form).unwrap();
/// assert_eq!(person.Name, "Ann");
/// assert_eq!(person.Age, Some(30));
/// ```
pub fn copy_struct(dst: &mut dyn Reflect, src: &dyn Reflect) -> Result<(), CoerceError> {
    let src_map = STD_MAPPER.type_map_of(src.reflect_type_info());
    let dst_map = STD_MAPPER.type_map_of(dst.reflect_type_info());

    let small = if src_map.leaf_len() < dst_map.leaf_len() {
        &src_map
    } else {
        &dst_map
    };

    for (path, _) in small.leaves() {
        let (Some(src_field), Some(dst_field)) = (src_map.leaf(path), dst_map.leaf(path)) else {
            continue;
        };
        let Some(value) = field_by_indexes_read_only(src, src_field.index()) else {
            continue;
        };
        assign_dynamic(field_slot_mut(dst, dst_field.index())?, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::derive::Reflect;

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Base {
        pub ID: i64,
        pub Created: i64,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Profile {
        pub Bio: String,
        #[tag(json = "-")]
        pub Secret: String,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Account {
        #[reflect(embedded)]
        pub Base: Base,
        #[tag(json = "name,omitempty")]
        pub Name: String,
        pub Profile: Option<Box<Profile>>,
        #[tag(json = "extra,flatten")]
        pub Extra: Extra,
        #[tag(json = "raw,omitnested")]
        pub Raw: Profile,
        hidden: u8,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Extra {
        pub Level: u8,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Chain {
        pub Value: i32,
        pub Next: Option<Box<Chain>>,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Clash {
        #[tag(json = "a")]
        pub A: i32,
        #[tag(json = "inner,flatten")]
        pub Inner: ClashInner,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct ClashInner {
        #[tag(json = "a")]
        pub A: i32,
    }

    static JSON: Mapper = Mapper::with_tag("json");

    fn index_of(map: &StructMap, path: &str) -> Vec<usize> {
        map.get_by_path(path).unwrap().index().to_vec()
    }

    #[test]
    fn paths_and_indexes() {
        let map = JSON.type_map::<Account>();
        assert_eq!(index_of(&map, "ID"), [0, 0]);
        assert_eq!(index_of(&map, "Created"), [0, 1]);
        assert_eq!(index_of(&map, "Base"), [0]);
        assert_eq!(index_of(&map, "name"), [1]);
        assert_eq!(index_of(&map, "Profile.Bio"), [2, 0]);
        assert_eq!(index_of(&map, "Level"), [3, 0]);
        assert_eq!(index_of(&map, "extra"), [3]);
        assert_eq!(index_of(&map, "raw"), [4]);

        assert!(map.get_by_path("Profile.Secret").is_none());
        assert!(map.get_by_path("raw.Bio").is_none());
        assert!(map.get_by_path("hidden").is_none());
        assert!(map.get_by_path("Name").is_none());

        let name = map.get_by_path("name").unwrap();
        assert!(name.has_option(OMIT_EMPTY));
        assert_eq!(name.parts(), [String::from("omitempty")]);
        assert!(map.get_by_path("Profile").unwrap().is_optional());
    }

    #[test]
    fn children_skip_shortcut_fields() {
        let map = JSON.type_map::<Account>();
        let root = map.tree();
        assert_eq!(root.path(), "");
        assert_eq!(root.name(), Account::type_info().type_path());

        let names: Vec<&str> = map.children(root).map(FieldInfo::name).collect();
        assert_eq!(names, ["name", "Profile", "raw", "ID", "Created", "Level"]);

        let profile = map.get_by_path("Profile").unwrap();
        let names: Vec<&str> = map.children(profile).map(FieldInfo::name).collect();
        assert_eq!(names, ["Bio"]);
        let bio = map.get_by_path("Profile.Bio").unwrap();
        assert_eq!(map.parent(bio).map(FieldInfo::path), Some("Profile"));

        let level = map.get_by_path("Level").unwrap();
        assert_eq!(level.parent(), Some(FieldId::ROOT));
    }

    #[test]
    fn leaves_exclude_structs() {
        let map = JSON.type_map::<Account>();
        assert!(map.leaf("Profile").is_none());
        assert!(map.leaf("raw").is_none());
        assert!(map.leaf("Profile.Bio").is_some());
        assert_eq!(map.leaf_len(), 5);
        assert_eq!(map.paths().len(), 9);
    }

    #[test]
    fn traversal_lookup() {
        let map = JSON.type_map::<Account>();
        assert_eq!(map.get_by_traversal(&[]).map(FieldInfo::path), Some(""));
        assert_eq!(map.get_by_traversal(&[2, 0]).map(FieldInfo::path), Some("Profile.Bio"));
        assert!(map.get_by_traversal(&[9]).is_none());

        let traversals = JSON.traversals_by_path(Account::type_info(), &["Level", "missing"]);
        assert_eq!(traversals, vec![vec![3, 0], vec![]]);
    }

    #[test]
    fn cycle_guard() {
        let map = STD_MAPPER.type_map::<Chain>();
        assert!(map.get_by_path("Next").is_some());
        assert!(map.get_by_path("Next.Value").is_none());
        assert_eq!(map.fields().len(), 2);
    }

    #[test]
    #[should_panic(expected = "Duplicated path")]
    fn flatten_clash_panics() {
        JSON.type_map::<Clash>();
    }

    #[test]
    #[should_panic(expected = "is not a struct")]
    fn non_struct_panics() {
        STD_MAPPER.type_map::<Vec<u8>>();
    }

    #[test]
    fn cached_once() {
        let mapper = Mapper::new("json", field_name_to_lower);
        let first = mapper.type_map::<Account>();
        let second = mapper.type_map::<Account>();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(index_of(&first, "profile.bio"), [2, 0]);

        let by_name = mapper.name_map(Account::type_info().type_path()).unwrap();
        assert!(Arc::ptr_eq(&first, &by_name));
        assert!(mapper.name_map("missing::Type").is_none());
    }

    #[test]
    fn field_access_by_path() {
        let mut account = Account::default();
        assert!(JSON.field_by_path(&account, "Profile.Bio").is_none());

        let bio = JSON.field_by_path_mut(&mut account, "Profile.Bio").unwrap();
        *bio.downcast_mut::<String>().unwrap() = String::from("hi");
        assert_eq!(account.Profile.as_ref().map(|p| p.Bio.as_str()), Some("hi"));

        let values = JSON.fields_by_path(&account, &["ID", "missing", "Profile.Bio"]);
        assert_eq!(values.len(), 3);
        assert!(values[0].is_some_and(|v| v.is::<i64>()));
        assert!(values[1].is_none());
        assert!(values[2].is_some_and(|v| v.is::<String>()));

        let fields = JSON.field_map(&account);
        assert!(fields.contains_key("Profile.Bio"));
        assert!(fields.contains_key("Base"));
        assert_eq!(fields.len(), 9);
    }

    #[test]
    fn copy_same_paths() {
        let src = Chain {
            Value: 4,
            Next: None,
        };
        let mut dst = Extra::default();
        copy_struct(&mut dst, &src).unwrap();
        assert_eq!(dst, Extra::default());

        let src = Base { ID: 7, Created: 300 };
        let mut dst = Account::default();
        copy_struct(&mut dst, &src).unwrap();
        assert_eq!(dst.Base, src);
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct TextValue {
        pub Value: String,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct MaybeValue {
        pub Value: Option<i32>,
    }

    #[test]
    fn copy_failure_keeps_none() {
        let src = TextValue {
            Value: String::from("abc"),
        };
        let mut dst = MaybeValue::default();
        assert!(copy_struct(&mut dst, &src).is_err());
        assert_eq!(dst.Value, None);

        let src = TextValue {
            Value: String::from("12"),
        };
        copy_struct(&mut dst, &src).unwrap();
        assert_eq!(dst.Value, Some(12));
    }
}
