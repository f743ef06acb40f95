use alloc::string::String;

use thiserror::Error;

use crate::access::AccessError;

// -----------------------------------------------------------------------------
// Error

/// An error returned when a value can not be converted into a field.
///
/// The target is left unmodified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoerceError {
    #[error("Invalid syntax: can not parse {text:?} as `{type_path}`")]
    InvalidSyntax {
        text: String,
        type_path: &'static str,
    },

    #[error("Value {text:?} is out of range for `{type_path}`")]
    OutOfRange {
        text: String,
        type_path: &'static str,
    },

    #[error("Value {text:?} is not an integer, can not convert to `{type_path}`")]
    NotAnInteger {
        text: String,
        type_path: &'static str,
    },

    #[error("Type mismatch: expected `{expected}`, found `{actual}`")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Unsupported kind: `{type_path}` can not be converted from or to text")]
    UnsupportedKind { type_path: &'static str },

    #[error("Can not convert {count} values to `{type_path}`")]
    TooManyValues {
        count: usize,
        type_path: &'static str,
    },

    #[error("Field access failed: {0}")]
    Access(#[from] AccessError),
}
