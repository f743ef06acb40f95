use alloc::boxed::Box;
use core::fmt;

use crate::Reflect;
use crate::ops::ReflectRef;

// -----------------------------------------------------------------------------
// Optional

/// A trait used to power optional references via reflection.
///
/// Implemented for `Option<T>`. A `None` is the nil reference,
/// [`get_or_insert_zero`](Optional::get_or_insert_zero) allocates it.
pub trait Optional: Reflect {
    fn get(&self) -> Option<&dyn Reflect>;

    fn get_mut(&mut self) -> Option<&mut dyn Reflect>;

    /// Returns the inner value, replacing `None` with `Some(zero)` first.
    fn get_or_insert_zero(&mut self) -> &mut dyn Reflect;

    /// Set to `None`.
    fn clear(&mut self);

    /// Set to `Some(value)`, return `value` back on type mismatch.
    fn replace(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    #[inline]
    fn is_none(&self) -> bool {
        self.get().is_none()
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// The default implementation of [`Reflect::reflect_eq`] for `Option`.
pub fn option_eq(x: &dyn Optional, y: &dyn Reflect) -> bool {
    if x.ty_id() != y.ty_id() {
        return false;
    }
    let ReflectRef::Option(y) = y.reflect_ref() else {
        return false;
    };
    match (x.get(), y.get()) {
        (None, None) => true,
        (Some(a), Some(b)) => a.reflect_eq(b),
        _ => false,
    }
}

/// The default implementation of [`Reflect::reflect_debug`] for `Option`.
pub fn option_debug(x: &dyn Optional, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match x.get() {
        Some(value) => f.debug_tuple("Some").field(&value).finish(),
        None => f.write_str("None"),
    }
}
