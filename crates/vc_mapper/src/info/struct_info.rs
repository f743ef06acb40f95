use alloc::boxed::Box;
use core::any::TypeId;

use crate::Reflect;
use crate::info::{Type, TypeInfo, TypePath, Typed};

// -----------------------------------------------------------------------------
// FieldTags

/// Annotations attached to a field via `#[tag(key = "value", ...)]`.
///
/// Keys keep declaration order. A key that is declared with an empty
/// string is present, which differs from an absent key.
#[derive(Clone, Copy, Default)]
pub struct FieldTags(&'static [(&'static str, &'static str)]);

impl FieldTags {
    pub const EMPTY: Self = Self(&[]);

    #[inline]
    pub const fn new(tags: &'static [(&'static str, &'static str)]) -> Self {
        Self(tags)
    }

    /// Returns the annotation stored under `key`, `None` when the key is absent.
    ///
    /// ```
    /// use vc_mapper::info::FieldTags;
    ///
    /// let tags = FieldTags::new(&[("json", "id,omitempty"), ("db", "")]);
    /// assert_eq!(tags.get("json"), Some("id,omitempty"));
    /// assert_eq!(tags.get("db"), Some(""));
    /// assert_eq!(tags.get("xml"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find_map(|(k, v)| if *k == key { Some(*v) } else { None })
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'static str, &'static str)> {
        self.0.iter().copied()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Debug for FieldTags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.0.iter().map(|(k, v)| (k, v))).finish()
    }
}

// -----------------------------------------------------------------------------
// NamedField

/// Static information of a struct's named field.
///
/// The field's position inside [`StructInfo::fields`] is the index used by
/// [`Struct::field_at`](crate::ops::Struct::field_at).
#[derive(Clone, Debug)]
pub struct NamedField {
    name: &'static str,
    type_info: fn() -> &'static TypeInfo,
    tags: FieldTags,
    embedded: bool,
    exported: bool,
}

impl NamedField {
    /// Create a new exported, non-embedded field without tags.
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            type_info: T::type_info,
            tags: FieldTags::EMPTY,
            embedded: false,
            exported: true,
        }
    }

    #[inline]
    pub fn with_tags(self, tags: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            tags: FieldTags::new(tags),
            ..self
        }
    }

    /// Mark the field as an embedded record, whose fields are promoted
    /// to the owner unless it is renamed.
    #[inline]
    pub fn with_embedded(self, embedded: bool) -> Self {
        Self { embedded, ..self }
    }

    /// Whether the field is visible outside of its module (`pub`).
    #[inline]
    pub fn with_exported(self, exported: bool) -> Self {
        Self { exported, ..self }
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared type of the field.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_info().type_id()
    }

    #[inline(always)]
    pub fn tags(&self) -> &FieldTags {
        &self.tags
    }

    #[inline(always)]
    pub fn embedded(&self) -> bool {
        self.embedded
    }

    #[inline(always)]
    pub fn exported(&self) -> bool {
        self.exported
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// Type info of a struct with named fields.
///
/// # Example
///
/// ```
/// use vc_mapper::derive::Reflect;
/// use vc_mapper::info::Typed;
///
/// #[derive(Reflect, Default, Clone)]
/// struct Point {
///     #[tag(json = "px")]
///     pub x: i32,
///     pub y: i32,
/// }
///
/// let info = Point::type_info().as_struct().unwrap();
/// assert_eq!(info.field_len(), 2);
/// assert_eq!(info.field("x").unwrap().tags().get("json"), Some("px"));
/// assert_eq!(info.index_of("y"), Some(1));
/// ```
#[derive(Debug)]
pub struct StructInfo {
    ty: Type,
    fields: Box<[NamedField]>,
}

impl StructInfo {
    #[inline]
    pub fn new<T: TypePath + Reflect + Default>(fields: &[NamedField]) -> Self {
        Self {
            ty: Type::of::<T>(),
            fields: fields.to_vec().into_boxed_slice(),
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    #[inline]
    pub fn fields(&self) -> &[NamedField] {
        &self.fields
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&NamedField> {
        self.fields.get(index)
    }

    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;
    use alloc::{format, vec};

    use crate::Reflect;
    use crate::derive::Reflect;
    use crate::info::{TypePath, Typed};
    use crate::ops::{ReflectRef, Struct};

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Base {
        pub id: u64,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    #[reflect(type_path = "demo::Account")]
    struct Account {
        #[reflect(embedded)]
        pub base: Base,
        #[tag(json = "login,omitempty", r#type = "text")]
        pub name: String,
        #[reflect(skip)]
        pub cache: Vec<u8>,
        secret: String,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Page<T> {
        pub items: Vec<T>,
        pub total: u32,
    }

    #[test]
    fn type_paths() {
        assert_eq!(
            Base::type_path(),
            "vc_mapper::info::struct_info::tests::Base"
        );
        assert_eq!(Base::type_name(), "Base");
        assert_eq!(Account::type_path(), "demo::Account");
        assert_eq!(
            <Page<i32>>::type_path(),
            "vc_mapper::info::struct_info::tests::Page<i32>"
        );
        assert_eq!(<Page<Base>>::type_name(), "Page<Base>");
    }

    #[test]
    fn derived_fields() {
        let info = Account::type_info().as_struct().unwrap();
        assert_eq!(info.type_path(), "demo::Account");
        assert_eq!(info.field_len(), 3);

        let base = info.field_at(0).unwrap();
        assert!(base.embedded());
        assert!(base.exported());
        assert_eq!(base.type_info().type_path(), Base::type_path());

        let name = info.field("name").unwrap();
        assert_eq!(name.tags().get("json"), Some("login,omitempty"));
        assert_eq!(name.tags().get("type"), Some("text"));
        assert!(!name.embedded());

        assert!(info.field("cache").is_none());
        assert_eq!(info.index_of("secret"), Some(2));
        assert!(!info.field("secret").unwrap().exported());
    }

    #[test]
    fn field_access() {
        let mut account = Account {
            cache: vec![1, 2],
            ..Default::default()
        };
        assert_eq!(account.field_len(), 3);
        assert!(account.field_at(3).is_none());

        *account.field_at_mut(1).unwrap().downcast_mut::<String>().unwrap() = "ann".into();
        assert_eq!(account.name, "ann");

        let value: &dyn Struct = &account;
        assert_eq!(value.field("name").unwrap().downcast_ref::<String>().unwrap(), "ann");
        assert!(matches!(account.reflect_ref(), ReflectRef::Struct(_)));
    }

    #[test]
    fn clone_eq_debug() {
        let page = Page::<i32> {
            items: vec![1, 2],
            total: 2,
        };
        let cloned: Box<dyn Reflect> = page.reflect_clone();
        assert!(page.reflect_eq(&*cloned));
        assert_eq!(cloned.downcast_ref::<Page<i32>>(), Some(&page));

        let other = Page::<i32>::default();
        assert!(!page.reflect_eq(&other));
        assert!(!page.reflect_eq(&Base::default()));

        // Skipped fields are not compared.
        let a = Account {
            cache: vec![1],
            ..Default::default()
        };
        assert!(a.reflect_eq(&Account::default()));

        let text = format!("{:?}", page.as_reflect());
        assert_eq!(text, "Page<i32> { items: [1, 2], total: 2 }");
    }
}
