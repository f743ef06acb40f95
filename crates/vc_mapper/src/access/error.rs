use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// An index path does not fit the value it is applied to.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    #[error("Can not access field {index} of `{type_path}`, it is not a struct")]
    NotAStruct {
        type_path: &'static str,
        index: usize,
    },

    #[error("Field index {index} is out of range for `{type_path}` with {len} fields")]
    OutOfRange {
        type_path: &'static str,
        index: usize,
        len: usize,
    },
}
