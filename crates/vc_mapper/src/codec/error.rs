use alloc::string::String;

use thiserror::Error;

use crate::access::AccessError;
use crate::coerce::CoerceError;

// -----------------------------------------------------------------------------
// Error

/// An error returned by [`Reflector`](crate::codec::Reflector) and [`Node`] conversions.
///
/// [`Node`]: crate::codec::Node
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    #[error("Unknown type: `{type_path}` is not registered")]
    UnknownType { type_path: String },

    #[error("Unknown path: `{path}` is not a field of `{type_path}`")]
    UnknownPath {
        path: String,
        type_path: &'static str,
    },

    #[error("Unsupported kind: `{type_path}` can not be encoded")]
    UnsupportedKind { type_path: &'static str },

    #[error("Unsupported key: `{type_path}` can not be encoded as a map key")]
    UnsupportedKey { type_path: &'static str },

    #[error("Nil node")]
    Nil,

    #[error("Can not convert a {found} node to `{expected}`")]
    NotConvertible {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Coerce(#[from] CoerceError),

    #[error(transparent)]
    Access(#[from] AccessError),
}
