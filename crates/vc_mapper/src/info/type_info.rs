use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;

use crate::Reflect;
use crate::info::{StructInfo, Type, TypePath, Typed};

// -----------------------------------------------------------------------------
// ReflectKind

/// An enumeration of the "kinds" of a reflected type.
///
/// Each kind corresponds to a specific reflection trait or type,
/// see [`ReflectRef`](crate::ops::ReflectRef).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Struct,
    Option,
    List,
    Map,
    Scalar,
    Dynamic,
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct => f.pad("Struct"),
            Self::Option => f.pad("Option"),
            Self::List => f.pad("List"),
            Self::Map => f.pad("Map"),
            Self::Scalar => f.pad("Scalar"),
            Self::Dynamic => f.pad("Dynamic"),
            Self::Opaque => f.pad("Opaque"),
        }
    }
}

// -----------------------------------------------------------------------------
// ScalarKind

/// The primitive shape of a scalar type, with the bit width of numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int(u32),
    Uint(u32),
    Float(u32),
    Str,
}

impl ScalarKind {
    #[inline]
    pub const fn is_number(self) -> bool {
        matches!(self, Self::Int(_) | Self::Uint(_) | Self::Float(_))
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time type information for reflected types.
///
/// Obtained through [`Typed::type_info`] and always `'static`.
#[derive(Debug)]
pub enum TypeInfo {
    Struct(StructInfo),
    Option(OptionInfo),
    List(ListInfo),
    Map(MapInfo),
    Scalar(ScalarInfo),
    Dynamic(OpaqueInfo),
    Opaque(OpaqueInfo),
}

macro_rules! impl_as_info {
    ($name:ident, $variant:ident, $info:ty) => {
        #[inline]
        pub const fn $name(&self) -> Option<&$info> {
            match self {
                Self::$variant(info) => Some(info),
                _ => None,
            }
        }
    };
}

impl TypeInfo {
    /// Returns the [`Type`] of the underlying type.
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Struct(info) => info.ty(),
            Self::Option(info) => &info.ty,
            Self::List(info) => &info.ty,
            Self::Map(info) => &info.ty,
            Self::Scalar(info) => &info.ty,
            Self::Dynamic(info) | Self::Opaque(info) => &info.ty,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    /// Create a fresh zero value of the underlying type.
    #[inline]
    pub fn zero(&self) -> Box<dyn Reflect> {
        self.ty().zero()
    }

    pub const fn kind(&self) -> ReflectKind {
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

    /// Strip every layer of `Option`, returning the pointed-to type.
    ///
    /// ```
    /// use vc_mapper::info::{ReflectKind, Typed};
    ///
    /// let info = <Option<Option<u8>>>::type_info();
    /// assert_eq!(info.kind(), ReflectKind::Option);
    /// assert_eq!(info.deref().kind(), ReflectKind::Scalar);
    /// ```
    pub fn deref(&'static self) -> &'static TypeInfo {
        let mut info = self;
        while let Self::Option(inner) = info {
            info = inner.some_info();
        }
        info
    }

    impl_as_info!(as_struct, Struct, StructInfo);
    impl_as_info!(as_option, Option, OptionInfo);
    impl_as_info!(as_list, List, ListInfo);
    impl_as_info!(as_map, Map, MapInfo);
    impl_as_info!(as_scalar, Scalar, ScalarInfo);
}

// -----------------------------------------------------------------------------
// Other infos

/// Type info of `Option<T>`.
#[derive(Debug)]
pub struct OptionInfo {
    ty: Type,
    some: fn() -> &'static TypeInfo,
}

impl OptionInfo {
    #[inline]
    pub fn new<TOption: TypePath + Reflect + Default, T: Typed>() -> Self {
        Self {
            ty: Type::of::<TOption>(),
            some: T::type_info,
        }
    }

    /// The type info of the `Some` value.
    #[inline]
    pub fn some_info(&self) -> &'static TypeInfo {
        (self.some)()
    }
}

/// Type info of list-like types, e.g. `Vec<T>`.
#[derive(Debug)]
pub struct ListInfo {
    ty: Type,
    item: fn() -> &'static TypeInfo,
}

impl ListInfo {
    #[inline]
    pub fn new<TList: TypePath + Reflect + Default, T: Typed>() -> Self {
        Self {
            ty: Type::of::<TList>(),
            item: T::type_info,
        }
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item)()
    }
}

/// Type info of map-like types, e.g. `HashMap<K, V>`.
#[derive(Debug)]
pub struct MapInfo {
    ty: Type,
    key: fn() -> &'static TypeInfo,
    value: fn() -> &'static TypeInfo,
}

impl MapInfo {
    #[inline]
    pub fn new<TMap: TypePath + Reflect + Default, K: Typed, V: Typed>() -> Self {
        Self {
            ty: Type::of::<TMap>(),
            key: K::type_info,
            value: V::type_info,
        }
    }

    #[inline]
    pub fn key_info(&self) -> &'static TypeInfo {
        (self.key)()
    }

    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value)()
    }
}

/// Type info of primitive types: `bool`, numbers and `String`.
#[derive(Debug)]
pub struct ScalarInfo {
    ty: Type,
    kind: ScalarKind,
}

impl ScalarInfo {
    #[inline]
    pub fn new<T: TypePath + Reflect + Default>(kind: ScalarKind) -> Self {
        Self {
            ty: Type::of::<T>(),
            kind,
        }
    }

    #[inline(always)]
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }
}

/// Type info of types whose content is invisible to reflection.
#[derive(Debug)]
pub struct OpaqueInfo {
    ty: Type,
}

impl OpaqueInfo {
    #[inline]
    pub fn new<T: TypePath + Reflect + Default>() -> Self {
        Self { ty: Type::of::<T>() }
    }
}
