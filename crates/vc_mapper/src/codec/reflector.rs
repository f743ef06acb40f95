use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use std::sync::{PoisonError, RwLock};

use crate::Reflect;
use crate::access::{field_by_indexes_read_only, field_slot_mut};
use crate::codec::{CodecError, Node};
use crate::coerce::{assign_dynamic, value_to_text};
use crate::info::{TypeInfo, Typed};
use crate::mapper::{FieldId, FieldInfo, Mapper, StructMap, TagFunc, std_tag_func};
use crate::ops::{Dynamic, ReflectRef, ScalarRef};
use crate::registry::TypeRegistry;

/// The default marker key, holding the type path of an encoded record.
pub const STRUCT_NAME_KEY: &str = "_struct_name";

/// Strip `Option` and [`Dynamic`] layers, `None` if a link is empty.
fn deref_value(value: &dyn Reflect) -> Option<&dyn Reflect> {
    match value.reflect_ref() {
        ReflectRef::Option(option) => deref_value(option.get()?),
        ReflectRef::Dynamic(dynamic) => deref_value(dynamic.get()?),
        _ => Some(value),
    }
}

// -----------------------------------------------------------------------------
// Reflector

/// Encodes records into [`Node`] trees and decodes them back.
///
/// An encoded record is a map of its fields by canonical name, plus a
/// marker key holding its type path. Decoding looks the type path up in
/// the registry, then in the field trees of the mapper. Encoded record
/// types are registered on the way, other record types must be
/// [registered](Self::register) before they can be decoded.
///
/// Untyped data is decoded into [`Dynamic`], `Vec<Dynamic>` and
/// `BTreeMap<String, Dynamic>`.
///
/// # Example
///
/// ```
/// use vc_mapper::codec::Reflector;
/// use vc_mapper::derive::Reflect;
///
/// #[derive(Reflect, Default, Clone, Debug, PartialEq)]
/// struct Point {
///     #[tag(reflector = "x")]
///     pub x: i32,
///     #[tag(reflector = "y,omitempty")]
///     pub y: Option<i32>,
/// }
///
/// let reflector = Reflector::default();
/// reflector.register::<Point>();
///
/// let point = Point { x: 1, y: Some(2) };
/// let node = reflector.encode(&point).unwrap();
/// let text = serde_json::to_string(&node).unwrap();
/// assert!(text.contains(r#""x":1"#));
///
/// let node = serde_json::from_str(&text).unwrap();
/// let decoded = reflector.decode(&node).unwrap();
/// assert_eq!(decoded.downcast_ref::<Point>(), Some(&point));
/// ```
pub struct Reflector {
    mapper: Mapper,
    marker: &'static str,
    registry: RwLock<TypeRegistry>,
}

impl Default for Reflector {
    /// Reads the `reflector` annotation with [`std_tag_func`],
    /// the marker is [`STRUCT_NAME_KEY`].
    fn default() -> Self {
        Self::new("reflector", std_tag_func, STRUCT_NAME_KEY)
    }
}

impl Reflector {
    /// Create a reflector with a registry of the primitive types.
    pub fn new(tag_name: &'static str, tag_func: TagFunc, marker: &'static str) -> Self {
        Self {
            mapper: Mapper::new(tag_name, tag_func),
            marker,
            registry: RwLock::new(TypeRegistry::new()),
        }
    }

    #[inline(always)]
    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    #[inline(always)]
    pub fn marker(&self) -> &'static str {
        self.marker
    }

    /// Register a record type and the types it depends on.
    ///
    /// # Panics
    ///
    /// `T` is not a struct, or an `Option` of a struct.
    pub fn register<T: Typed>(&self) {
        self.register_info(T::type_info());
    }

    /// See [`register`](Self::register).
    pub fn register_info(&self, info: &'static TypeInfo) {
        self.mapper.type_map_of(info);
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register_info(info);
    }

    // Checked under the read lock first, most records are already known.
    fn register_encoded(&self, info: &'static TypeInfo) {
        let known = self
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(info.type_id());
        if !known {
            self.registry
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .register_info(info);
        }
    }

    /// Register every type annotated with `#[reflect(auto_register)]`.
    ///
    /// Returns `false` if the `auto_register` feature is disabled.
    pub fn auto_register(&self) -> bool {
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .auto_register()
    }

    // -------------------------------------------------------------------------
    // Encode

    /// Encode a record, `Node::Null` if `value` is `None`.
    ///
    /// Returns [`CodecError::UnsupportedKind`] if `value` is not a record.
    pub fn encode(&self, value: &dyn Reflect) -> Result<Node, CodecError> {
        let Some(record) = deref_value(value) else {
            return Ok(Node::Null);
        };
        let ReflectRef::Struct(_) = record.reflect_ref() else {
            return Err(CodecError::UnsupportedKind {
                type_path: record.reflect_type_path(),
            });
        };
        Ok(self.encode_value(record)?.unwrap_or_default())
    }

    /// Encode a map of untyped values.
    ///
    /// Empty values are kept as `Node::Null`.
    pub fn encode_map(&self, values: &BTreeMap<String, Dynamic>) -> Result<Node, CodecError> {
        let mut entries = BTreeMap::new();
        for (key, value) in values {
            let node = self.encode_value(value)?.unwrap_or_default();
            entries.insert(key.clone(), node);
        }
        Ok(Node::Map(entries))
    }

    /// Encode any value, `None` if it is absent.
    ///
    /// - `None` and empty [`Dynamic`] values are absent.
    /// - Empty lists and maps are absent.
    /// - Absent list items and map values are kept as `Node::Null`.
    /// - Map keys are converted to text.
    pub fn encode_value(&self, value: &dyn Reflect) -> Result<Option<Node>, CodecError> {
        let Some(value) = deref_value(value) else {
            return Ok(None);
        };

        let node = match value.reflect_ref() {
            ReflectRef::Struct(_) => {
                let info = value.reflect_type_info();
                self.register_encoded(info);
                let map = self.mapper.type_map_of(info);
                return self.encode_struct(&map, map.tree(), value);
            }
            ReflectRef::List(list) => {
                if list.is_empty() {
                    return Ok(None);
                }
                let items = list
                    .iter()
                    .map(|item| Ok(self.encode_value(item)?.unwrap_or_default()))
                    .collect::<Result<Vec<_>, CodecError>>()?;
                Node::List(items)
            }
            ReflectRef::Map(map) => {
                if map.is_empty() {
                    return Ok(None);
                }
                let mut entries = BTreeMap::new();
                for (key, item) in map.iter() {
                    let key = value_to_text(key).map_err(|_| CodecError::UnsupportedKey {
                        type_path: key.reflect_type_path(),
                    })?;
                    entries.insert(key, self.encode_value(item)?.unwrap_or_default());
                }
                Node::Map(entries)
            }
            ReflectRef::Scalar(scalar) => match scalar.scalar_ref() {
                ScalarRef::Bool(value) => Node::Bool(value),
                ScalarRef::Int(value) => Node::Int(value),
                ScalarRef::Uint(value) => Node::from(value),
                ScalarRef::F32(value) => Node::Float(value.into()),
                ScalarRef::F64(value) => Node::Float(value),
                ScalarRef::Str(value) => Node::String(value.to_string()),
            },
            ReflectRef::Opaque(_) => {
                return Err(CodecError::UnsupportedKind {
                    type_path: value.reflect_type_path(),
                });
            }
            ReflectRef::Option(_) | ReflectRef::Dynamic(_) => return Ok(None),
        };
        Ok(Some(node))
    }

    /// Encode the struct node `field` of `map`, read from the root `record`.
    fn encode_struct(
        &self,
        map: &StructMap,
        field: &FieldInfo,
        record: &dyn Reflect,
    ) -> Result<Option<Node>, CodecError> {
        let mut entries = BTreeMap::new();
        entries.insert(
            self.marker.to_string(),
            Node::String(field.elem_info().type_path().to_string()),
        );

        for child in map.children(field) {
            let Some(value) = field_by_indexes_read_only(record, child.index()) else {
                continue;
            };
            let node = if child.is_struct() && !child.children().is_empty() {
                self.encode_struct(map, child, record)?
            } else {
                // Leaves, and struct fields not expanded in this tree.
                self.encode_value(value)?
            };
            if let Some(node) = node {
                entries.insert(child.name().to_string(), node);
            }
        }
        Ok(Some(Node::Map(entries)))
    }

    // -------------------------------------------------------------------------
    // Decode

    /// Decode a node.
    ///
    /// - Maps with a marker are decoded into a value of the registered type.
    /// - Other maps become `BTreeMap<String, Dynamic>`, lists become `Vec<Dynamic>`.
    /// - Scalars become `bool`, `i64`, `u64`, `f64` or `String`.
    /// - Null becomes an empty [`Dynamic`].
    ///
    /// Fields of a record are converted with [`assign_dynamic`].
    pub fn decode(&self, node: &Node) -> Result<Dynamic, CodecError> {
        Ok(match node {
            Node::Null => Dynamic::nil(),
            Node::Bool(value) => Dynamic::new(*value),
            Node::Int(value) => Dynamic::new(*value),
            Node::Uint(value) => Dynamic::new(*value),
            Node::Float(value) => Dynamic::new(*value),
            Node::String(text) => Dynamic::new(text.clone()),
            Node::List(items) => Dynamic::new(
                items
                    .iter()
                    .map(|item| self.decode(item))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Node::Map(entries) => match entries.get(self.marker) {
                Some(Node::String(type_path)) => self.decode_struct(type_path, entries)?,
                _ => Dynamic::new(
                    entries
                        .iter()
                        .map(|(key, item)| Ok((key.clone(), self.decode(item)?)))
                        .collect::<Result<BTreeMap<_, _>, CodecError>>()?,
                ),
            },
        })
    }

    fn decode_struct(
        &self,
        type_path: &str,
        entries: &BTreeMap<String, Node>,
    ) -> Result<Dynamic, CodecError> {
        let info = self
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get_with_type_path(type_path)
            .or_else(|| self.mapper.name_map(type_path).map(|map| map.type_info()))
            .ok_or_else(|| CodecError::UnknownType {
                type_path: type_path.to_string(),
            })?;
        let map = self.mapper.type_map_of(info);
        let mut record = info.zero();

        for (key, item) in entries {
            if key == self.marker || item.is_null() {
                continue;
            }
            let field = map
                .get_by_path(key)
                .filter(|field| field.id() != FieldId::ROOT)
                .ok_or_else(|| CodecError::UnknownPath {
                    path: key.clone(),
                    type_path: info.type_path(),
                })?;
            let value = self.decode(item)?;
            let target = field_slot_mut(&mut *record, field.index())?;
            assign_dynamic(target, &value)?;
        }

        log::trace!("Decoded a `{}` record.", info.type_path());
        Ok(Dynamic::from_boxed(record))
    }
}

impl fmt::Debug for Reflector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflector")
            .field("mapper", &self.mapper)
            .field("marker", &self.marker)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::derive::Reflect;

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Address {
        pub City: String,
        pub Zip: Option<u32>,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Meta {
        pub Version: u8,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct User {
        #[tag(reflector = "id")]
        pub ID: u64,
        pub Name: String,
        pub Score: f32,
        pub Active: bool,
        pub Home: Option<Box<Address>>,
        pub Work: Address,
        pub Tags: Vec<String>,
        pub Scores: BTreeMap<u16, i64>,
        pub Friends: Vec<Address>,
        #[reflect(embedded)]
        pub Meta: Meta,
        pub Any: Dynamic,
        #[tag(reflector = "-")]
        pub Secret: String,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Chain {
        pub Value: i32,
        pub Next: Option<Box<Chain>>,
    }

    fn user() -> User {
        User {
            ID: u64::MAX,
            Name: String::from("ann"),
            Score: 0.1,
            Active: true,
            Home: Some(Box::new(Address {
                City: String::from("here"),
                Zip: Some(1234),
            })),
            Work: Address {
                City: String::from("there"),
                Zip: None,
            },
            Tags: vec![String::from("a"), String::from("b")],
            Scores: BTreeMap::from([(1, -5), (2, 7)]),
            Friends: vec![Address::default()],
            Meta: Meta { Version: 3 },
            Any: Dynamic::new(String::from("free")),
            Secret: String::new(),
        }
    }

    fn reflector() -> Reflector {
        let reflector = Reflector::default();
        reflector.register::<User>();
        reflector.register::<Chain>();
        reflector
    }

    fn marker_of<T: Typed>() -> Node {
        Node::from(T::type_info().type_path())
    }

    #[test]
    fn encode_shape() {
        let reflector = reflector();
        let Node::Map(entries) = reflector.encode(&user()).unwrap() else {
            panic!("a record is encoded as a map");
        };

        assert_eq!(entries[STRUCT_NAME_KEY], marker_of::<User>());
        assert_eq!(entries["id"], Node::Uint(u64::MAX));
        assert_eq!(entries["Version"], Node::Int(3));
        assert!(!entries.contains_key("Meta"));
        assert!(!entries.contains_key("Secret"));
        assert_eq!(entries["Tags"], Node::List(vec![Node::from("a"), Node::from("b")]));

        let Node::Map(scores) = &entries["Scores"] else {
            panic!("a map is encoded as a map");
        };
        assert_eq!(scores["1"], Node::Int(-5));

        let Node::Map(work) = &entries["Work"] else {
            panic!("a record is encoded as a map");
        };
        assert_eq!(work[STRUCT_NAME_KEY], marker_of::<Address>());
        assert!(!work.contains_key("Zip"));
    }

    #[test]
    fn absent_values() {
        let reflector = reflector();
        let Node::Map(entries) = reflector.encode(&User::default()).unwrap() else {
            panic!("a record is encoded as a map");
        };
        assert!(!entries.contains_key("Home"));
        assert!(!entries.contains_key("Tags"));
        assert!(!entries.contains_key("Scores"));
        assert!(!entries.contains_key("Any"));
        assert_eq!(entries["Name"], Node::from(""));

        assert_eq!(reflector.encode(&Option::<User>::None).unwrap(), Node::Null);
        assert!(matches!(
            reflector.encode(&vec![1_u8]),
            Err(CodecError::UnsupportedKind { .. })
        ));
    }

    #[test]
    fn round_trip() {
        let reflector = reflector();
        for value in [user(), User::default()] {
            let node = reflector.encode(&value).unwrap();
            let decoded = reflector.decode(&node).unwrap();
            assert_eq!(decoded.downcast_ref::<User>(), Some(&value));
        }
    }

    #[test]
    fn json_round_trip() {
        let reflector = reflector();
        let value = user();
        let text = serde_json::to_string(&reflector.encode(&value).unwrap()).unwrap();
        let node: Node = serde_json::from_str(&text).unwrap();
        let decoded = reflector.decode(&node).unwrap();
        assert_eq!(decoded.take::<User>().ok(), Some(value));
    }

    #[test]
    fn recursive_record() {
        let reflector = reflector();
        let value = Chain {
            Value: 1,
            Next: Some(Box::new(Chain {
                Value: 2,
                Next: Some(Box::new(Chain { Value: 3, Next: None })),
            })),
        };
        let node = reflector.encode(&value).unwrap();
        let decoded = reflector.decode(&node).unwrap();
        assert_eq!(decoded.downcast_ref::<Chain>(), Some(&value));
    }

    #[test]
    fn decode_without_register() {
        let reflector = Reflector::default();
        for value in [user(), User::default()] {
            let node = reflector.encode(&value).unwrap();
            let decoded = reflector.decode(&node).unwrap();
            assert_eq!(decoded.downcast_ref::<User>(), Some(&value));
        }

        let value = Chain {
            Value: 1,
            Next: Some(Box::new(Chain { Value: 2, Next: None })),
        };
        let text = serde_json::to_string(&reflector.encode(&value).unwrap()).unwrap();
        let node: Node = serde_json::from_str(&text).unwrap();
        assert_eq!(reflector.decode(&node).unwrap().take::<Chain>().ok(), Some(value));

        // Known to the mapper only.
        let reflector = Reflector::default();
        reflector.mapper().type_map::<Meta>();
        let node = Node::Map(BTreeMap::from([
            (String::from(STRUCT_NAME_KEY), marker_of::<Meta>()),
            (String::from("Version"), Node::Int(4)),
        ]));
        let decoded = reflector.decode(&node).unwrap();
        assert_eq!(decoded.downcast_ref::<Meta>(), Some(&Meta { Version: 4 }));
    }

    #[test]
    fn untyped_data() {
        let reflector = reflector();
        let node: Node = serde_json::from_str(r#"{"a": [1, "x"], "b": {"c": null}}"#).unwrap();
        let decoded = reflector.decode(&node).unwrap();
        let map = decoded.downcast_ref::<BTreeMap<String, Dynamic>>().unwrap();

        let list = map["a"].downcast_ref::<Vec<Dynamic>>().unwrap();
        assert_eq!(list[0].downcast_ref::<i64>(), Some(&1));
        assert_eq!(list[1].downcast_ref::<String>().map(String::as_str), Some("x"));

        let inner = map["b"].downcast_ref::<BTreeMap<String, Dynamic>>().unwrap();
        assert!(inner["c"].is_nil());

        let values = BTreeMap::from([
            (String::from("n"), Dynamic::new(1_u8)),
            (String::from("z"), Dynamic::nil()),
        ]);
        assert_eq!(
            reflector.encode_map(&values).unwrap(),
            Node::Map(BTreeMap::from([
                (String::from("n"), Node::Int(1)),
                (String::from("z"), Node::Null),
            ]))
        );
    }

    #[test]
    fn decode_errors() {
        let reflector = reflector();

        let node = Node::Map(BTreeMap::from([(
            String::from(STRUCT_NAME_KEY),
            Node::from("nowhere::Missing"),
        )]));
        assert_eq!(
            reflector.decode(&node).unwrap_err(),
            CodecError::UnknownType {
                type_path: String::from("nowhere::Missing"),
            }
        );

        let node = Node::Map(BTreeMap::from([
            (String::from(STRUCT_NAME_KEY), marker_of::<Address>()),
            (String::from("Street"), Node::from("x")),
        ]));
        assert!(matches!(
            reflector.decode(&node),
            Err(CodecError::UnknownPath { .. })
        ));

        let node = Node::Map(BTreeMap::from([
            (String::from(STRUCT_NAME_KEY), marker_of::<Address>()),
            (String::from("Zip"), Node::Int(-1)),
        ]));
        assert!(matches!(
            reflector.decode(&node),
            Err(CodecError::Coerce(_))
        ));
    }
}
