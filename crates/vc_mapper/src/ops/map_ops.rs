use alloc::boxed::Box;
use core::fmt;

use crate::Reflect;
use crate::ops::ReflectRef;

// -----------------------------------------------------------------------------
// Map

/// A trait used to power map-like operations via reflection.
///
/// Implemented for `HashMap<K, V>` and `BTreeMap<K, V>`.
pub trait Map: Reflect {
    fn len(&self) -> usize;

    fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect>;

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;

    /// Insert or overwrite an entry.
    ///
    /// If the key or the value has the wrong type,
    /// the map is untouched and the rejected part is returned.
    fn insert_boxed(
        &mut self,
        key: Box<dyn Reflect>,
        value: Box<dyn Reflect>,
    ) -> Result<(), Box<dyn Reflect>>;

    fn clear(&mut self);

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// The default implementation of [`Reflect::reflect_eq`] for maps.
pub fn map_eq(x: &dyn Map, y: &dyn Reflect) -> bool {
    if x.ty_id() != y.ty_id() {
        return false;
    }
    let ReflectRef::Map(y) = y.reflect_ref() else {
        return false;
    };
    x.len() == y.len()
        && x.iter().all(|(key, a)| match y.get(key) {
            Some(b) => a.reflect_eq(b),
            None => false,
        })
}

/// The default implementation of [`Reflect::reflect_debug`] for maps.
pub fn map_debug(x: &dyn Map, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(x.iter()).finish()
}
