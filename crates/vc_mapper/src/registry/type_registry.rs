use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;

use crate::info::{TypeInfo, Typed};
use crate::ops::Dynamic;
use crate::utils::{HashMap, HashSet, TypeIdMap};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of reflected types.
///
/// [Registering] a type stores its [`TypeInfo`] together with the type info
/// of every field, item, key and value it depends on, so that a value of the
/// type can be created from its type path alone.
///
/// # Example
///
/// ```
/// use core::any::TypeId;
/// use vc_mapper::derive::Reflect;
/// use vc_mapper::registry::TypeRegistry;
///
/// #[derive(Reflect, Default, Clone)]
/// struct Foo {
///     pub name: Option<String>,
///     pub value: Vec<i32>,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Foo>();
///
/// // The main type
/// assert!(registry.contains(TypeId::of::<Foo>()));
/// // Its type dependencies
/// assert!(registry.contains(TypeId::of::<Option<String>>()));
/// assert!(registry.contains(TypeId::of::<Vec<i32>>()));
///
/// let info = registry.get_with_type_name("Foo").unwrap();
/// let zero = info.zero();
/// assert!(zero.is::<Foo>());
/// ```
///
/// [Registering]: TypeRegistry::register
pub struct TypeRegistry {
    type_info_table: TypeIdMap<&'static TypeInfo>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a empty [`TypeRegistry`].
    #[inline]
    pub const fn empty() -> Self {
        Self {
            type_info_table: TypeIdMap::new(),
            type_path_to_id: HashMap::with_hasher(crate::utils::FixedHashState),
            type_name_to_id: HashMap::with_hasher(crate::utils::FixedHashState),
            ambiguous_names: HashSet::with_hasher(crate::utils::FixedHashState),
        }
    }

    /// Create a type registry with default registrations for primitive types.
    ///
    /// - `()` `bool`
    /// - `i8 - i64` `isize`
    /// - `u8 - u64` `usize`
    /// - `f32` `f64`
    /// - `String` `Dynamic`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<()>();
        registry.register::<bool>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<Dynamic>();
        registry
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(
        info: &'static TypeInfo,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
        type_name_to_id: &mut HashMap<&'static str, TypeId>,
        ambiguous_names: &mut HashSet<&'static str>,
    ) {
        let ty = info.ty();
        let type_name = ty.name();

        if !ambiguous_names.contains(type_name) {
            if type_name_to_id.contains_key(type_name) {
                log::warn!(
                    "type name `{type_name}` is ambiguous, `{}` must be looked up by type path",
                    ty.path(),
                );
                type_name_to_id.remove(type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_id.insert(type_name, ty.id());
            }
        }

        // `Option<Box<T>>` and `Option<T>` share a path, the first one wins.
        type_path_to_id.entry(ty.path()).or_insert(ty.id());
    }

    /// Register a type info and its dependencies if it has not yet been registered.
    ///
    /// Returns `true` if the type was new.
    pub fn register_info(&mut self, info: &'static TypeInfo) -> bool {
        let inserted = self.type_info_table.try_insert(info.type_id(), || {
            Self::add_new_type_indices(
                info,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
            info
        });
        if inserted {
            self.register_dependencies(info);
        }
        inserted
    }

    fn register_dependencies(&mut self, info: &'static TypeInfo) {
        match info {
            TypeInfo::Struct(info) => {
                let deps: Vec<_> = info.fields().iter().map(|f| f.type_info()).collect();
                for dep in deps {
                    self.register_info(dep);
                }
            }
            TypeInfo::Option(info) => {
                self.register_info(info.some_info());
            }
            TypeInfo::List(info) => {
                self.register_info(info.item_info());
            }
            TypeInfo::Map(info) => {
                self.register_info(info.key_info());
                self.register_info(info.value_info());
            }
            TypeInfo::Scalar(_) | TypeInfo::Dynamic(_) | TypeInfo::Opaque(_) => {}
        }
    }

    /// Attempts to register the type `T` if it has not yet been registered already.
    ///
    /// This will also recursively register the types of its fields, items, keys and values.
    #[inline]
    pub fn register<T: Typed>(&mut self) {
        self.register_info(T::type_info());
    }

    /// Automatically registers all non-generic types annotated with `#[reflect(auto_register)]`.
    ///
    /// Returns `false` if the `auto_register` feature is disabled.
    ///
    /// # Example
    ///
    /// ```
    /// use vc_mapper::derive::Reflect;
    /// use vc_mapper::registry::TypeRegistry;
    ///
    /// #[derive(Reflect, Default, Clone)]
    /// #[reflect(auto_register)]
    /// struct A {
    ///     pub id: u64,
    /// }
    ///
    /// let mut registry = TypeRegistry::new();
    /// if registry.auto_register() {
    ///     assert!(registry.get_with_type_name("A").is_some());
    /// }
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::auto_register::__register_types(self);
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_info_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.type_info_table.get(&type_id).copied()
    }

    /// Returns the type info with the given [type path].
    ///
    /// [type path]: crate::info::TypePath::type_path
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&'static TypeInfo> {
        self.type_path_to_id
            .get(type_path)
            .and_then(|id| self.get(*id))
    }

    /// Returns the type info with the given [type name].
    ///
    /// If the type name is ambiguous, or if no type with the given name
    /// has been registered, returns `None`.
    ///
    /// [type name]: crate::info::TypePath::type_name
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&'static TypeInfo> {
        self.type_name_to_id
            .get(type_name)
            .and_then(|id| self.get(*id))
    }

    /// Returns `true` if the given type name matches multiple registered types.
    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_info_table.len()
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'static TypeInfo> + '_ {
        self.type_info_table.values().copied()
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set()
            .entries(self.type_path_to_id.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use super::TypeRegistry;
    use crate::derive::Reflect;

    mod a {
        use crate::derive::Reflect;

        #[derive(Reflect, Default, Clone)]
        pub struct Same {
            pub id: u32,
        }
    }

    mod b {
        use crate::derive::Reflect;

        #[derive(Reflect, Default, Clone)]
        pub struct Same {
            pub id: u64,
        }
    }

    #[derive(Reflect, Default, Clone)]
    struct Outer {
        pub inner: Option<Box<a::Same>>,
        pub tags: Vec<String>,
    }

    #[test]
    fn dependencies_are_registered() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Outer>();
        assert!(registry.contains(TypeId::of::<a::Same>()));
        assert!(registry.contains(TypeId::of::<u32>()));
        assert!(registry.contains(TypeId::of::<Vec<String>>()));
        assert!(registry.contains(TypeId::of::<String>()));
        assert!(!registry.contains(TypeId::of::<b::Same>()));
    }

    #[test]
    fn ambiguous_names() {
        let mut registry = TypeRegistry::new();
        registry.register::<a::Same>();
        assert!(registry.get_with_type_name("Same").is_some());
        registry.register::<b::Same>();
        assert!(registry.is_ambiguous("Same"));
        assert!(registry.get_with_type_name("Same").is_none());

        let path = <b::Same as crate::info::TypePath>::type_path();
        let info = registry.get_with_type_path(path).unwrap();
        assert_eq!(info.type_id(), TypeId::of::<b::Same>());
    }
}
