//! Hash containers with a fixed hash state.
//!
//! `FixedHashState` based on `foldhash` crate,
//! provide stable hash results through a fixed hash seed.

use core::any::TypeId;
use core::fmt::Debug;
use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x95EE04C4F326B271);

/// A fixed hasher provided hash results that only related on the input.
pub type FixedHasher = FoldHasher<'static>;

/// Fixed Hash State based upon a random but fixed seed.
///
/// # Examples
///
/// ```
/// use core::hash::{BuildHasher, Hash, Hasher};
/// use vc_mapper::utils::FixedHashState;
///
/// let mut a = FixedHashState.build_hasher();
/// let mut b = FixedHashState.build_hasher();
/// "path".hash(&mut a);
/// "path".hash(&mut b);
/// assert_eq!(a.finish(), b.finish());
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

/// A [`hashbrown::HashMap`] with [`FixedHashState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A [`hashbrown::HashSet`] with [`FixedHashState`].
pub type HashSet<K> = hashbrown::HashSet<K, FixedHashState>;

// -----------------------------------------------------------------------------
// TypeIdMap

/// A specialized map container with [`TypeId`] as the fixed key type.
///
/// Used by every process-wide cache of this crate.
pub struct TypeIdMap<V>(HashMap<TypeId, V>);

impl<V> TypeIdMap<V> {
    /// Creates an empty `TypeIdMap`.
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(FixedHashState))
    }

    /// Returns a reference to the value corresponding to the key.
    #[inline]
    pub fn get(&self, key: &TypeId) -> Option<&V> {
        self.0.get(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[inline]
    pub fn contains(&self, key: &TypeId) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts a key-value pair, returning the old value if present.
    #[inline]
    pub fn insert(&mut self, key: TypeId, value: V) -> Option<V> {
        self.0.insert(key, value)
    }

    /// Inserts the value created by `f` only if the key is absent.
    ///
    /// - Returns `true` if the key was not present and the value was inserted.
    /// - Returns `false` and leaves the map untouched otherwise.
    #[inline]
    pub fn try_insert(&mut self, key: TypeId, f: impl FnOnce() -> V) -> bool {
        use hashbrown::hash_map::Entry;
        match self.0.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(f());
                true
            }
        }
    }

    /// Returns the value of the key, inserting the value created by `f`
    /// first if the key is absent.
    ///
    /// An existing value always wins.
    #[inline]
    pub fn get_or_insert(&mut self, key: TypeId, f: impl FnOnce() -> V) -> &V {
        self.0.entry(key).or_insert_with(f)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.0.values()
    }
}

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Debug> Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}
