//! Provide compile-time type infomation.
//!
//! ## Menu
//!
//! - [`TypePath`]: A trait for obtaining type paths and names.
//! - [`Type`]: `TypeId` + type path + zero constructor.
//! - [`TypeInfo`]: A enum representing compile-time type infomations, the inner is one of following:
//!     - [`StructInfo`]: For struct with named fields, including field names, field type info and tags.
//!     - [`OptionInfo`]: For `Option<T>`, the optional reference.
//!     - [`ListInfo`]: For list-like(e.g. `Vec<i32>`) infomation.
//!     - [`MapInfo`]: For map-like(e.g. `HashMap<K, V>`) infomation.
//!     - [`ScalarInfo`]: For `bool`, numbers and `String`.
//!     - [`OpaqueInfo`]: For `Dynamic` and internal invisible types(e.g. `Duration`).
//! - [`NamedField`]: For struct's field, including field name, type info, tags and flags.
//! - [`FieldTags`]: The `key = "value"` annotations of a field.
//! - [`Typed`]: A trait for obtaining `TypeInfo` data.
//! - [`DynamicTyped`]: Provide dynamic dispatch for `Typed`.

// -----------------------------------------------------------------------------
// Modules

mod struct_info;
mod type_info;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use struct_info::{FieldTags, NamedField, StructInfo};
pub use type_info::{ListInfo, MapInfo, OpaqueInfo, OptionInfo, ScalarInfo};
pub use type_info::{ReflectKind, ScalarKind, TypeInfo};
pub use type_path::{Type, TypePath};
pub use typed::{DynamicTyped, Typed};
