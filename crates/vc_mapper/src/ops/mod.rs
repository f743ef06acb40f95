//! Provide interfaces for data operation.
//!
//! ## Menu
//!
//! The following is the subtrait of [`Reflect`], which provide data access methods in different kinds.
//!
//! - [`Struct`]: For struct (e.g. `A{ .. }`) .
//! - [`Optional`]: For optional reference (e.g. `Option<Box<A>>`) .
//! - [`List`]: For list-like (e.g. `Vec<i32>`) .
//! - [`Map`]: For map-like (e.g. `HashMap<String, f32>`) .
//! - [`Scalar`]: For `bool`, numbers and `String`.
//!
//! [`Dynamic`] holds a value of any reflected type, or nothing.
//!
//! [`Reflect`]: crate::Reflect

// -----------------------------------------------------------------------------
// Modules

mod dynamic;
mod list_ops;
mod map_ops;
mod option_ops;
mod scalar_ops;
mod struct_ops;

// -----------------------------------------------------------------------------
// Exports

pub use dynamic::Dynamic;
pub use list_ops::{List, ListIter, list_debug, list_eq};
pub use map_ops::{Map, map_debug, map_eq};
pub use option_ops::{Optional, option_debug, option_eq};
pub use scalar_ops::{Scalar, ScalarRef, ScalarValue};
pub use struct_ops::{Struct, struct_debug, struct_eq};

use crate::Reflect;
use crate::info::ReflectKind;

// -----------------------------------------------------------------------------
// ReflectRef

/// An immutable enumeration of "kinds" of a reflected type.
///
/// Created through [`Reflect::reflect_ref`].
pub enum ReflectRef<'a> {
    Struct(&'a dyn Struct),
    Option(&'a dyn Optional),
    List(&'a dyn List),
    Map(&'a dyn Map),
    Scalar(&'a dyn Scalar),
    Dynamic(&'a Dynamic),
    Opaque(&'a dyn Reflect),
}

impl ReflectRef<'_> {
    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Struct(_) => ReflectKind::Struct,
            Self::Option(_) => ReflectKind::Option,
            Self::List(_) => ReflectKind::List,
            Self::Map(_) => ReflectKind::Map,
            Self::Scalar(_) => ReflectKind::Scalar,
            Self::Dynamic(_) => ReflectKind::Dynamic,
            Self::Opaque(_) => ReflectKind::Opaque,
        }
    }
}

// -----------------------------------------------------------------------------
// ReflectMut

/// A mutable enumeration of "kinds" of a reflected type.
///
/// Created through [`Reflect::reflect_mut`].
pub enum ReflectMut<'a> {
    Struct(&'a mut dyn Struct),
    Option(&'a mut dyn Optional),
    List(&'a mut dyn List),
    Map(&'a mut dyn Map),
    Scalar(&'a mut dyn Scalar),
    Dynamic(&'a mut Dynamic),
    Opaque(&'a mut dyn Reflect),
}

impl<'a> ReflectMut<'a> {
    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Struct(_) => ReflectKind::Struct,
            Self::Option(_) => ReflectKind::Option,
            Self::List(_) => ReflectKind::List,
            Self::Map(_) => ReflectKind::Map,
            Self::Scalar(_) => ReflectKind::Scalar,
            Self::Dynamic(_) => ReflectKind::Dynamic,
            Self::Opaque(_) => ReflectKind::Opaque,
        }
    }

    /// Give the borrow back as a plain `&mut dyn Reflect`.
    pub fn into_reflect(self) -> &'a mut dyn Reflect {
        match self {
            Self::Struct(value) => value.as_reflect_mut(),
            Self::Option(value) => value.as_reflect_mut(),
            Self::List(value) => value.as_reflect_mut(),
            Self::Map(value) => value.as_reflect_mut(),
            Self::Scalar(value) => value.as_reflect_mut(),
            Self::Dynamic(value) => value,
            Self::Opaque(value) => value,
        }
    }
}
