use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use serde_core::de::{MapAccess, SeqAccess, Visitor};
use serde_core::ser::{SerializeMap, SerializeSeq};
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::CodecError;
use crate::coerce::{ParseError, float_to_int, float_to_uint, parse_bool, parse_int, parse_uint};

// -----------------------------------------------------------------------------
// Node

/// A self-describing encoded value.
///
/// Records are encoded as maps carrying their type path under a marker key,
/// see [`Reflector`](crate::codec::Reflector).
///
/// `Node` implements `Serialize` and `Deserialize`, so it can be written
/// to and read from any serde format.
///
/// # Example
///
/// ```
/// use vc_mapper::codec::Node;
///
/// let node: Node = serde_json::from_str(r#"{"a": [1, -2, 2.5, "x", null]}"#).unwrap();
/// let Node::Map(entries) = &node else { unreachable!() };
/// assert_eq!(
///     entries["a"],
///     Node::List(vec![
///         Node::Int(1),
///         Node::Int(-2),
///         Node::Float(2.5),
///         Node::from("x"),
///         Node::Null,
///     ])
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// Only used for values above `i64::MAX`.
    Uint(u64),
    Float(f64),
    String(String),
    List(Vec<Node>),
    Map(BTreeMap<String, Node>),
}

impl Node {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The kind of the node, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    #[cold]
    fn not_convertible(&self, expected: &'static str) -> CodecError {
        CodecError::NotConvertible {
            expected,
            found: self.kind_name(),
        }
    }

    /// Convert a number, or a numeric string, to `i64`.
    ///
    /// Floats and strings are accepted if they represent an integer exactly.
    ///
    /// ```
    /// use vc_mapper::codec::Node;
    ///
    /// assert_eq!(Node::Float(10.0).to_i64(), Ok(10));
    /// assert_eq!(Node::from("0x10").to_i64(), Ok(16));
    /// assert!(Node::Float(1.5).to_i64().is_err());
    /// assert!(Node::Null.to_i64().is_err());
    /// ```
    pub fn to_i64(&self) -> Result<i64, CodecError> {
        let parsed = match self {
            Self::Null => return Err(CodecError::Nil),
            Self::Int(value) => return Ok(*value),
            Self::Uint(value) => i64::try_from(*value).map_err(|_| ParseError::OutOfRange),
            Self::Float(value) => float_to_int(*value),
            Self::String(text) => parse_int(text, 64),
            _ => return Err(self.not_convertible("i64")),
        };
        parsed.map_err(|err| CodecError::Coerce(err.into_coerce(&self.to_text(), "i64")))
    }

    /// Convert a number, or a numeric string, to `u64`, see [`to_i64`](Self::to_i64).
    pub fn to_u64(&self) -> Result<u64, CodecError> {
        let parsed = match self {
            Self::Null => return Err(CodecError::Nil),
            Self::Uint(value) => return Ok(*value),
            Self::Int(value) => u64::try_from(*value).map_err(|_| ParseError::OutOfRange),
            Self::Float(value) => float_to_uint(*value),
            Self::String(text) => parse_uint(text, 64),
            _ => return Err(self.not_convertible("u64")),
        };
        parsed.map_err(|err| CodecError::Coerce(err.into_coerce(&self.to_text(), "u64")))
    }

    /// Convert a number, or a numeric string, to `f64`.
    pub fn to_f64(&self) -> Result<f64, CodecError> {
        match self {
            Self::Null => Err(CodecError::Nil),
            Self::Int(value) => Ok(*value as f64),
            Self::Uint(value) => Ok(*value as f64),
            Self::Float(value) => Ok(*value),
            Self::String(text) => text.parse().map_err(|_| {
                CodecError::Coerce(ParseError::InvalidSyntax.into_coerce(text, "f64"))
            }),
            _ => Err(self.not_convertible("f64")),
        }
    }

    /// Convert a bool, or its text form such as `"true"`, `"F"` or `1`, to `bool`.
    pub fn to_bool(&self) -> Result<bool, CodecError> {
        match self {
            Self::Null => Err(CodecError::Nil),
            Self::Bool(value) => Ok(*value),
            Self::List(_) | Self::Map(_) => Err(self.not_convertible("bool")),
            _ => {
                let text = self.to_text();
                parse_bool(&text).ok_or_else(|| {
                    CodecError::Coerce(ParseError::InvalidSyntax.into_coerce(&text, "bool"))
                })
            }
        }
    }

    /// Like [`to_i64`](Self::to_i64), but returns `0` on error.
    #[inline]
    pub fn as_i64(&self) -> i64 {
        self.to_i64().unwrap_or_default()
    }

    /// Like [`to_u64`](Self::to_u64), but returns `0` on error.
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.to_u64().unwrap_or_default()
    }

    /// Like [`to_f64`](Self::to_f64), but returns `0.0` on error.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.to_f64().unwrap_or_default()
    }

    /// Like [`to_bool`](Self::to_bool), but returns `false` on error.
    #[inline]
    pub fn as_bool(&self) -> bool {
        self.to_bool().unwrap_or_default()
    }

    /// Returns `default` if the node is null.
    #[inline]
    pub fn or(self, default: Node) -> Node {
        if self.is_null() { default } else { self }
    }

    /// Add `step` to a numeric node, keeping its variant.
    ///
    /// A numeric string stays a string. Null and non-numeric nodes,
    /// including non-integer floats, give `Node::Int(step)`.
    ///
    /// ```
    /// use vc_mapper::codec::Node;
    ///
    /// assert_eq!(Node::Int(1).plus(2), Node::Int(3));
    /// assert_eq!(Node::Float(1.0).plus(2), Node::Float(3.0));
    /// assert_eq!(Node::from("9").plus(1), Node::from("10"));
    /// assert_eq!(Node::Null.plus(5), Node::Int(5));
    /// assert_eq!(Node::from("x").plus(5), Node::Int(5));
    /// ```
    pub fn plus(&self, step: i64) -> Node {
        match self {
            Self::Int(value) => Self::Int(value.wrapping_add(step)),
            Self::Uint(value) => Self::Uint(value.wrapping_add_signed(step)),
            Self::Float(value) => match float_to_int(*value) {
                Ok(value) => Self::Float(value.wrapping_add(step) as f64),
                Err(_) => Self::Int(step),
            },
            Self::String(text) => match parse_int(text, 64) {
                Ok(value) => Self::String(value.wrapping_add(step).to_string()),
                Err(_) => Self::Int(step),
            },
            _ => Self::Int(step),
        }
    }

    /// The text form of a scalar node, `""` for null.
    fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(value) => value.to_string(),
            Self::Int(value) => value.to_string(),
            Self::Uint(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::String(text) => text.clone(),
            Self::List(_) | Self::Map(_) => String::from(self.kind_name()),
        }
    }
}

// -----------------------------------------------------------------------------
// From

macro_rules! impl_node_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Node {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::$variant(value.into())
            }
        }
    )*};
}

impl_node_from!(
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => String,
    &str => String,
    Vec<Node> => List,
    BTreeMap<String, Node> => Map,
);

impl From<u64> for Node {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => Self::Int(value),
            Err(_) => Self::Uint(value),
        }
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// -----------------------------------------------------------------------------
// Serde

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Uint(value) => serializer.serialize_u64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::String(text) => serializer.serialize_str(text),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any encoded node")
    }

    #[inline]
    fn visit_bool<E>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Bool(v))
    }

    #[inline]
    fn visit_i64<E>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Int(v))
    }

    #[inline]
    fn visit_u64<E>(self, v: u64) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    #[inline]
    fn visit_f64<E>(self, v: f64) -> Result<Node, E> {
        Ok(Node::Float(v))
    }

    #[inline]
    fn visit_str<E>(self, v: &str) -> Result<Node, E> {
        Ok(Node::String(String::from(v)))
    }

    #[inline]
    fn visit_string<E>(self, v: String) -> Result<Node, E> {
        Ok(Node::String(v))
    }

    #[inline]
    fn visit_unit<E>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    #[inline]
    fn visit_none<E>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Node, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(item) = seq.next_element::<Node>()? {
            items.push(item);
        }
        Ok(Node::List(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<String, Node>()? {
            entries.insert(key, value);
        }
        Ok(Node::Map(entries))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;

    use super::Node;
    use crate::codec::CodecError;

    #[test]
    fn numeric_conversions() {
        assert_eq!(Node::Int(-3).to_i64(), Ok(-3));
        assert_eq!(Node::Uint(7).to_i64(), Ok(7));
        assert!(Node::Uint(u64::MAX).to_i64().is_err());
        assert!(Node::Int(-1).to_u64().is_err());
        assert_eq!(Node::from("12").to_u64(), Ok(12));
        assert_eq!(Node::Float(4.0).to_u64(), Ok(4));
        assert_eq!(Node::Int(2).to_f64(), Ok(2.0));
        assert_eq!(Node::from("2.5").to_f64(), Ok(2.5));
        assert!(Node::from("x").to_f64().is_err());

        assert_eq!(Node::Bool(true).to_i64(), Err(CodecError::NotConvertible {
            expected: "i64",
            found: "bool",
        }));
        assert_eq!(Node::Null.to_f64(), Err(CodecError::Nil));
    }

    #[test]
    fn bool_conversions() {
        assert_eq!(Node::Bool(false).to_bool(), Ok(false));
        assert_eq!(Node::from("T").to_bool(), Ok(true));
        assert_eq!(Node::Int(1).to_bool(), Ok(true));
        assert_eq!(Node::Float(0.0).to_bool(), Ok(false));
        assert!(Node::Int(2).to_bool().is_err());
        assert!(Node::List(vec![]).to_bool().is_err());
    }

    #[test]
    fn lossy_and_default() {
        assert_eq!(Node::from("x").as_i64(), 0);
        assert!(!Node::Null.as_bool());
        assert_eq!(Node::Float(1.5).as_f64(), 1.5);
        assert_eq!(Node::Null.or(Node::Int(3)), Node::Int(3));
        assert_eq!(Node::Int(1).or(Node::Int(3)), Node::Int(1));
    }

    #[test]
    fn plus_keeps_variant() {
        assert_eq!(Node::Uint(u64::MAX).plus(-1), Node::Uint(u64::MAX - 1));
        assert_eq!(Node::Float(1.5).plus(1), Node::Int(1));
        assert_eq!(Node::from("-3").plus(3), Node::from("0"));
        assert_eq!(Node::Bool(true).plus(2), Node::Int(2));
    }

    #[test]
    fn serde_json_text() {
        let node = Node::Map(BTreeMap::from([
            (String::from("big"), Node::Uint(u64::MAX)),
            (String::from("int"), Node::Int(-1)),
            (String::from("list"), Node::List(vec![Node::Null, Node::Bool(true)])),
            (String::from("text"), Node::from("a\"b")),
        ]));
        let text = serde_json::to_string(&node).unwrap();
        assert_eq!(
            text,
            r#"{"big":18446744073709551615,"int":-1,"list":[null,true],"text":"a\"b"}"#
        );
        assert_eq!(serde_json::from_str::<Node>(&text).unwrap(), node);

        let node: Node = serde_json::from_str("5").unwrap();
        assert_eq!(node, Node::Int(5));
    }

    #[test]
    fn ron_text() {
        let node = Node::List(vec![Node::Float(0.5), Node::from("x"), Node::Int(-7)]);
        let text = ron::to_string(&node).unwrap();
        assert_eq!(ron::from_str::<Node>(&text).unwrap(), node);
    }
}
