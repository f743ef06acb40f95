//! Reflection implementations of built-in types, and static cells
//! used to implement [`Typed`](crate::info::Typed).
//!
//! - Scalar: `bool`, `i8 - i64`, `isize`, `u8 - u64`, `usize`, `f32`, `f64`, `String`.
//! - Option: `Option<T>`.
//! - List: `Vec<T>`.
//! - Map: `HashMap<K, V>`, `BTreeMap<K, V>`.
//! - Opaque: `()`, `Duration`, see [`impl_reflect_opaque`](crate::impl_reflect_opaque).
//! - `Box<T>`: transparent, behaves as `T`.

// -----------------------------------------------------------------------------
// Modules

mod boxed;
mod cell;
mod list;
mod map;
mod opaque;
mod option;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeCell, NonGenericTypeCell};
pub use cell::{GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeInfoCell};
