use core::fmt;

use crate::Reflect;
use crate::ops::ReflectRef;

// -----------------------------------------------------------------------------
// Struct

/// A trait used to power struct-like operations via reflection.
///
/// Fields are addressed by their position in
/// [`StructInfo::fields`](crate::info::StructInfo::fields).
/// Implemented by `#[derive(Reflect)]`.
pub trait Struct: Reflect {
    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn field_len(&self) -> usize;
}

impl dyn Struct {
    /// Returns the field with the given declared name.
    pub fn field(&self, name: &str) -> Option<&dyn Reflect> {
        let index = self.reflect_type_info().as_struct()?.index_of(name)?;
        self.field_at(index)
    }

    /// Returns the field with the given declared name.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
        let index = self.reflect_type_info().as_struct()?.index_of(name)?;
        self.field_at_mut(index)
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// The default implementation of [`Reflect::reflect_eq`] for structs.
pub fn struct_eq(x: &dyn Struct, y: &dyn Reflect) -> bool {
    if x.ty_id() != y.ty_id() {
        return false;
    }
    let ReflectRef::Struct(y) = y.reflect_ref() else {
        return false;
    };
    if x.field_len() != y.field_len() {
        return false;
    }
    (0..x.field_len()).all(|index| match (x.field_at(index), y.field_at(index)) {
        (Some(a), Some(b)) => a.reflect_eq(b),
        _ => false,
    })
}

/// The default implementation of [`Reflect::reflect_debug`] for structs.
pub fn struct_debug(x: &dyn Struct, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let info = x.reflect_type_info();
    let mut debug = f.debug_struct(info.type_name());
    if let Some(info) = info.as_struct() {
        for (index, field) in info.fields().iter().enumerate() {
            if let Some(value) = x.field_at(index) {
                debug.field(field.name(), &value);
            }
        }
    }
    debug.finish()
}
