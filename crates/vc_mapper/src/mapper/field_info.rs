use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::Reflect;
use crate::access::field_by_indexes;
use crate::coerce::{CoerceError, text_to_value};
use crate::info::{ReflectKind, TypeInfo};
use crate::ops::ReflectMut;
use crate::utils::HashMap;

// -----------------------------------------------------------------------------
// FieldId

/// The position of a [`FieldInfo`] in its [`StructMap`].
///
/// The root node is always [`FieldId::ROOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub(crate) usize);

impl FieldId {
    pub const ROOT: Self = Self(0);

    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0
    }
}

// -----------------------------------------------------------------------------
// FieldInfo

/// Metadata of one field in the flattened field space of a record.
///
/// The root node describes the whole record, its path is `""` and
/// its name is the type path.
pub struct FieldInfo {
    pub(crate) id: FieldId,
    pub(crate) index: Box<[usize]>,
    pub(crate) path: String,
    pub(crate) name: String,
    pub(crate) parts: Vec<String>,
    pub(crate) options: BTreeMap<String, String>,
    pub(crate) ty: &'static TypeInfo,
    pub(crate) elem: &'static TypeInfo,
    pub(crate) embedded: bool,
    pub(crate) children: Vec<FieldId>,
    pub(crate) parent: Option<FieldId>,
}

impl FieldInfo {
    pub(crate) fn root(ty: &'static TypeInfo) -> Self {
        Self {
            id: FieldId::ROOT,
            index: Box::new([]),
            path: String::new(),
            name: String::from(ty.type_path()),
            parts: Vec::new(),
            options: BTreeMap::new(),
            ty,
            elem: ty.deref(),
            embedded: false,
            children: Vec::new(),
            parent: None,
        }
    }

    #[inline(always)]
    pub fn id(&self) -> FieldId {
        self.id
    }

    /// The field positions from the root record.
    #[inline(always)]
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// The canonical path, unique within the record type.
    #[inline(always)]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The canonical name.
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The annotation tokens after the name.
    #[inline(always)]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// The options parsed from [`parts`](Self::parts), bare flags have empty values.
    #[inline(always)]
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    #[inline]
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    #[inline]
    pub fn has_option(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Returns `true` if the declared type is an `Option`.
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.ty.kind() == ReflectKind::Option
    }

    /// The declared type.
    #[inline(always)]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.ty
    }

    /// The declared type without `Option` layers.
    #[inline(always)]
    pub fn elem_info(&self) -> &'static TypeInfo {
        self.elem
    }

    /// Returns `true` if the dereferenced type is a struct.
    #[inline]
    pub fn is_struct(&self) -> bool {
        self.elem.kind() == ReflectKind::Struct
    }

    #[inline(always)]
    pub fn embedded(&self) -> bool {
        self.embedded
    }

    /// The nested fields listed under this field.
    ///
    /// Fields of a flattened or shortcut struct field are listed under the
    /// parent of that field instead.
    #[inline(always)]
    pub fn children(&self) -> &[FieldId] {
        &self.children
    }

    /// The owner node, `None` for the root.
    #[inline(always)]
    pub fn parent(&self) -> Option<FieldId> {
        self.parent
    }

    /// A fresh zero value of the dereferenced type.
    #[inline]
    pub fn zero(&self) -> Box<dyn Reflect> {
        self.elem.zero()
    }

    /// Parse `strs` into this field of `record`.
    ///
    /// A list field is replaced with one element per string,
    /// other fields accept at most one string.
    ///
    /// # Example
    ///
    /// ```
    /// use vc_mapper::derive::Reflect;
    /// use vc_mapper::mapper::STD_MAPPER;
    ///
    /// #[derive(Reflect, Default, Clone)]
    /// struct Query {
    ///     pub ids: Vec<u32>,
    ///     pub page: Option<u8>,
    /// }
    ///
    /// let map = STD_MAPPER.type_map::<Query>();
    /// let mut query = Query::default();
    /// map.get_by_path("ids").unwrap().strings_to_field(&["1", "2"], &mut query).unwrap();
    /// map.get_by_path("page").unwrap().strings_to_field(&["3"], &mut query).unwrap();
    /// assert_eq!(query.ids, [1, 2]);
    /// assert_eq!(query.page, Some(3));
    ///
    /// let page = map.get_by_path("page").unwrap();
    /// assert!(page.strings_to_field(&["1", "2"], &mut query).is_err());
    /// ```
    pub fn strings_to_field<S: AsRef<str>>(
        &self,
        strs: &[S],
        record: &mut dyn Reflect,
    ) -> Result<(), CoerceError> {
        let field = field_by_indexes(record, &self.index)?;

        if self.elem.kind() == ReflectKind::List {
            let mut built = self.elem.zero();
            if let ReflectMut::List(list) = built.reflect_mut() {
                for text in strs {
                    text_to_value(text.as_ref(), list.push_zero())?;
                }
            }
            return field.set(built).map_err(|_| CoerceError::TypeMismatch {
                expected: self.elem.type_path(),
                actual: field.reflect_type_path(),
            });
        }

        match strs {
            [] => Ok(()),
            [text] => text_to_value(text.as_ref(), field),
            _ => Err(CoerceError::TooManyValues {
                count: strs.len(),
                type_path: self.elem.type_path(),
            }),
        }
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("path", &self.path)
            .field("index", &self.index)
            .field("type", &self.ty.type_path())
            .field("options", &self.options)
            .field("children", &self.children)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// StructMap

/// An index of field metadata for a record type.
///
/// Built by [`Mapper`](crate::mapper::Mapper) and cached per type.
/// Nodes live in an arena and reference each other by [`FieldId`].
pub struct StructMap {
    pub(crate) nodes: Vec<FieldInfo>,
    pub(crate) paths: HashMap<String, FieldId>,
    pub(crate) leaves: HashMap<String, FieldId>,
}

impl StructMap {
    /// The root node, which describes the whole record.
    #[inline]
    pub fn tree(&self) -> &FieldInfo {
        &self.nodes[FieldId::ROOT.0]
    }

    /// The record type.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.tree().ty
    }

    /// Every field of the tree in breadth-first order, excluding the root.
    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.nodes[1..]
    }

    #[inline]
    pub fn get(&self, id: FieldId) -> Option<&FieldInfo> {
        self.nodes.get(id.0)
    }

    /// Iterate the children of a node.
    pub fn children(&self, field: &FieldInfo) -> impl ExactSizeIterator<Item = &FieldInfo> {
        field.children.iter().map(|id| &self.nodes[id.0])
    }

    #[inline]
    pub fn parent(&self, field: &FieldInfo) -> Option<&FieldInfo> {
        field.parent.map(|id| &self.nodes[id.0])
    }

    /// Returns the field with the canonical `path`, `""` is the root.
    pub fn get_by_path(&self, path: &str) -> Option<&FieldInfo> {
        if path.is_empty() {
            return Some(self.tree());
        }
        self.paths.get(path).map(|id| &self.nodes[id.0])
    }

    /// Returns the field with the index path, `[]` is the root.
    pub fn get_by_traversal(&self, index: &[usize]) -> Option<&FieldInfo> {
        if index.is_empty() {
            return Some(self.tree());
        }
        self.fields().iter().find(|field| *field.index == *index)
    }

    /// Returns the non-struct field with the canonical `path`.
    #[inline]
    pub fn leaf(&self, path: &str) -> Option<&FieldInfo> {
        self.leaves.get(path).map(|id| &self.nodes[id.0])
    }

    /// Iterate every field by canonical path, in arbitrary order.
    pub fn paths(&self) -> impl ExactSizeIterator<Item = (&str, &FieldInfo)> {
        self.paths
            .iter()
            .map(|(path, id)| (path.as_str(), &self.nodes[id.0]))
    }

    /// Iterate every non-struct field by canonical path, in arbitrary order.
    pub fn leaves(&self) -> impl ExactSizeIterator<Item = (&str, &FieldInfo)> {
        self.leaves
            .iter()
            .map(|(path, id)| (path.as_str(), &self.nodes[id.0]))
    }

    #[inline]
    pub fn leaf_len(&self) -> usize {
        self.leaves.len()
    }
}

impl fmt::Debug for StructMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructMap")
            .field("type", &self.type_info().type_path())
            .field("fields", &self.fields())
            .finish()
    }
}
