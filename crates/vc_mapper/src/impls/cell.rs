//! Containers for static storage of type information.
//!
//! This is usually used to implement [`Typed`](crate::info::Typed) and
//! [`TypePath`](crate::info::TypePath).
//!
//! - [`NonGenericTypeInfoCell`]: an [`OnceLock`], almost no additional expenses.
//! - [`GenericTypeInfoCell`] and [`GenericTypePathCell`]: the `static CELL` inside
//!   a generic function is shared by every instantiation, so the inner is a
//!   [`TypeIdMap`] wrapped in [`RwLock`]. Values are leaked and live forever.

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::info::TypeInfo;
use crate::utils::TypeIdMap;

mod sealed {
    use super::TypeInfo;
    use alloc::string::String;

    pub trait TypedProperty: Send + Sync + 'static {}

    impl TypedProperty for String {}
    impl TypedProperty for TypeInfo {}
}

use sealed::TypedProperty;

// -----------------------------------------------------------------------------
// NonGenericTypeCell

/// Container for static storage of non-generic type information.
pub struct NonGenericTypeCell<T: TypedProperty>(OnceLock<T>);

/// Container for static storage of non-generic [`TypeInfo`].
///
/// ## Example
///
/// ```ignore
/// use vc_mapper::impls::NonGenericTypeInfoCell;
/// use vc_mapper::info::{StructInfo, NamedField, TypeInfo, Typed};
///
/// // `TypePath`, `Reflect` and `Struct` are implemented by hand.
/// #[derive(Default, Clone)]
/// struct A2 {
///     pub a: u32,
/// }
///
/// impl Typed for A2 {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Struct(
///             StructInfo::new::<A2>(&[NamedField::new::<u32>("a")])
///         ))
///     }
/// }
///
/// let info = A2::type_info().as_struct().unwrap();
/// assert_eq!(info.field("a").unwrap().type_info().type_path(), "u32");
/// ```
pub type NonGenericTypeInfoCell = NonGenericTypeCell<TypeInfo>;

impl<T: TypedProperty> NonGenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns a reference to the value stored in the cell.
    ///
    /// If there is no entry found, a new one will be generated from the given function.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> T) -> &T {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeCell

/// Container for static storage of type information with generics.
pub struct GenericTypeCell<T: TypedProperty>(RwLock<TypeIdMap<&'static T>>);

/// Container for static storage of [`TypeInfo`] with generics.
pub type GenericTypeInfoCell = GenericTypeCell<TypeInfo>;

/// Container for static storage of type path with generics.
///
/// ## Example
///
/// ```
/// use vc_mapper::impls::GenericTypePathCell;
/// use vc_mapper::info::TypePath;
///
/// struct Wrapper<T>(T);
///
/// impl<T: TypePath> TypePath for Wrapper<T> {
///     fn type_path() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| format!("test::Wrapper<{}>", T::type_path()))
///     }
///
///     fn type_name() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| format!("Wrapper<{}>", T::type_name()))
///     }
/// }
///
/// assert_eq!(<Wrapper<i32>>::type_path(), "test::Wrapper<i32>");
/// assert_eq!(<Wrapper<u8>>::type_name(), "Wrapper<u8>");
/// ```
pub type GenericTypePathCell = GenericTypeCell<String>;

impl<T: TypedProperty> GenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns a reference to the value stored for the type `G`.
    ///
    /// If there is no entry found, a new one will be generated from the given function.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &T {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &T {
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&T> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: T) -> &T {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(value)))
    }
}
