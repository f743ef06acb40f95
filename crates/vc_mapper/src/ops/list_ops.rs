use alloc::boxed::Box;
use core::fmt;

use crate::Reflect;
use crate::ops::ReflectRef;

// -----------------------------------------------------------------------------
// List

/// A trait used to power list-like operations via reflection.
///
/// Implemented for `Vec<T>`.
pub trait List: Reflect {
    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn len(&self) -> usize;

    /// Append a zero item and return it.
    fn push_zero(&mut self) -> &mut dyn Reflect;

    /// Append `value`, return it back on type mismatch.
    fn push_boxed(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    fn clear(&mut self);

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl dyn List {
    #[inline]
    pub fn iter(&self) -> ListIter<'_> {
        ListIter {
            list: self,
            index: 0,
        }
    }
}

/// An iterator over the items of a [`List`].
pub struct ListIter<'a> {
    list: &'a dyn List,
    index: usize,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a dyn Reflect;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.list.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ListIter<'_> {}

// -----------------------------------------------------------------------------
// Helpers

/// The default implementation of [`Reflect::reflect_eq`] for lists.
pub fn list_eq(x: &dyn List, y: &dyn Reflect) -> bool {
    if x.ty_id() != y.ty_id() {
        return false;
    }
    let ReflectRef::List(y) = y.reflect_ref() else {
        return false;
    };
    x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| a.reflect_eq(b))
}

/// The default implementation of [`Reflect::reflect_debug`] for lists.
pub fn list_debug(x: &dyn List, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(x.iter()).finish()
}
