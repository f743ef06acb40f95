//! Navigate to nested fields by index path.
//!
//! An index path is the list of field positions from the root record,
//! as stored in [`FieldInfo::index`](crate::mapper::FieldInfo::index).
//! `Option` links on the way are dereferenced:
//!
//! - [`field_by_indexes`] replaces every `None` with `Some(zero)`.
//! - [`field_slot_mut`] does the same for intermediate links only.
//! - [`field_by_indexes_read_only`] stops at the first `None`.

// -----------------------------------------------------------------------------
// Modules

mod error;

// -----------------------------------------------------------------------------
// Exports

pub use error::AccessError;

use crate::Reflect;
use crate::ops::{ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Indirect

/// Strip every `Option` layer, returns `None` if a link is `None`.
///
/// ```
/// use vc_mapper::access::indirect;
///
/// let value: Option<Option<u8>> = Some(Some(3));
/// assert_eq!(indirect(&value).and_then(|v| v.downcast_ref::<u8>()), Some(&3));
/// assert!(indirect(&Option::<u8>::None).is_none());
/// ```
pub fn indirect(value: &dyn Reflect) -> Option<&dyn Reflect> {
    match value.reflect_ref() {
        ReflectRef::Option(option) => indirect(option.get()?),
        _ => Some(value),
    }
}

/// Strip every `Option` layer, allocating `None` links with zero values.
pub fn alloc_indirect(value: &mut dyn Reflect) -> &mut dyn Reflect {
    match value.reflect_mut() {
        ReflectMut::Option(option) => alloc_indirect(option.get_or_insert_zero()),
        other => other.into_reflect(),
    }
}

fn struct_field_mut(value: &mut dyn Reflect, index: usize) -> Result<&mut dyn Reflect, AccessError> {
    let type_path = value.reflect_type_path();
    match value.reflect_mut() {
        ReflectMut::Struct(record) => {
            let len = record.field_len();
            record
                .field_at_mut(index)
                .ok_or(AccessError::OutOfRange { type_path, index, len })
        }
        _ => Err(AccessError::NotAStruct { type_path, index }),
    }
}

// -----------------------------------------------------------------------------
// Resolver

/// Returns the field addressed by `indexes`.
///
/// Every `None` on the way, the addressed field included, is replaced
/// with `Some(zero)`, so the returned value is never an `Option`.
///
/// # Example
///
/// ```
/// use vc_mapper::access::field_by_indexes;
/// use vc_mapper::derive::Reflect;
///
/// #[derive(Reflect, Default, Clone)]
/// struct Inner {
///     pub id: i32,
/// }
///
/// #[derive(Reflect, Default, Clone)]
/// struct Outer {
///     pub inner: Option<Box<Inner>>,
/// }
///
/// let mut outer = Outer::default();
/// let id = field_by_indexes(&mut outer, &[0, 0]).unwrap();
/// *id.downcast_mut::<i32>().unwrap() = 7;
/// assert_eq!(outer.inner.map(|inner| inner.id), Some(7));
/// ```
pub fn field_by_indexes<'a>(
    value: &'a mut dyn Reflect,
    indexes: &[usize],
) -> Result<&'a mut dyn Reflect, AccessError> {
    let value = alloc_indirect(value);
    let Some((&index, rest)) = indexes.split_first() else {
        return Ok(value);
    };
    field_by_indexes(struct_field_mut(value, index)?, rest)
}

/// Returns the field addressed by `indexes` without touching it.
///
/// Intermediate `None` links are allocated, the addressed field is
/// returned as is, an `Option` field stays `None`.
pub fn field_slot_mut<'a>(
    value: &'a mut dyn Reflect,
    indexes: &[usize],
) -> Result<&'a mut dyn Reflect, AccessError> {
    let Some((&index, rest)) = indexes.split_first() else {
        return Ok(value);
    };
    let value = alloc_indirect(value);
    field_slot_mut(struct_field_mut(value, index)?, rest)
}

/// Returns the field addressed by `indexes`, or `None` as soon as
/// a `None` link is met or the path does not fit.
///
/// The returned value is never an `Option`.
pub fn field_by_indexes_read_only<'a>(
    value: &'a dyn Reflect,
    indexes: &[usize],
) -> Option<&'a dyn Reflect> {
    let value = indirect(value)?;
    let Some((&index, rest)) = indexes.split_first() else {
        return Some(value);
    };
    let ReflectRef::Struct(record) = value.reflect_ref() else {
        return None;
    };
    field_by_indexes_read_only(record.field_at(index)?, rest)
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use super::*;
    use crate::derive::Reflect;

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Leaf {
        pub name: String,
        pub size: Option<u32>,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Root {
        pub id: i64,
        pub leaf: Option<Box<Leaf>>,
    }

    #[test]
    fn allocate_on_the_way() {
        let mut root = Root::default();
        let size = field_by_indexes(&mut root, &[1, 1]).unwrap();
        assert!(size.is::<u32>());
        assert_eq!(root.leaf.as_ref().and_then(|leaf| leaf.size), Some(0));
    }

    #[test]
    fn slot_keeps_addressed_option() {
        let mut root = Root::default();
        let size = field_slot_mut(&mut root, &[1, 1]).unwrap();
        assert_eq!(size.reflect_kind(), crate::info::ReflectKind::Option);
        assert!(root.leaf.is_some());
        assert_eq!(root.leaf.as_ref().and_then(|leaf| leaf.size), None);
    }

    #[test]
    fn read_only_stops_at_none() {
        let root = Root::default();
        assert!(field_by_indexes_read_only(&root, &[1, 0]).is_none());
        assert!(field_by_indexes_read_only(&root, &[0]).is_some());
        assert!(field_by_indexes_read_only(&root, &[]).is_some());

        let root = Root {
            id: 1,
            leaf: Some(Box::new(Leaf {
                name: String::from("x"),
                size: None,
            })),
        };
        let name = field_by_indexes_read_only(&root, &[1, 0]).unwrap();
        assert_eq!(name.downcast_ref::<String>().map(String::as_str), Some("x"));
        assert!(field_by_indexes_read_only(&root, &[1, 1]).is_none());
    }

    #[test]
    fn path_mismatch() {
        let mut root = Root::default();
        assert!(matches!(
            field_by_indexes(&mut root, &[5]),
            Err(AccessError::OutOfRange { index: 5, len: 2, .. })
        ));
        assert!(matches!(
            field_by_indexes(&mut root, &[0, 0]),
            Err(AccessError::NotAStruct { type_path: "i64", index: 0 })
        ));
    }
}
