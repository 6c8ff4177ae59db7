//! Bulk multiset for traversal results
//!
//! A [`BulkSet`] stores each distinct value once together with its occurrence
//! count (its *bulk*). Adding the same value ten million times costs one
//! ledger slot, while iteration still replays every occurrence.

use crate::error::{StructureError, StructureResult};
use indexmap::map;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;

/// Multiset of values with per-value occurrence counts
///
/// Invariants:
/// - every stored value has a bulk of at least 1
/// - [`size`](Self::size) is the sum of all bulks
/// - [`unique_size`](Self::unique_size) is the number of distinct values
/// - distinct values keep the order in which they were first added
///
/// Iterators borrow the set, so the set can not be changed while one is alive.
/// There is no way to observe a half-mutated ledger from an iterator.
///
/// ```
/// use samyama_structure::process::BulkSet;
///
/// let mut set = BulkSet::new();
/// set.add("marko");
/// set.add_bulk("josh", 3);
/// assert_eq!(set.size(), 4);
/// assert_eq!(set.unique_size(), 2);
/// assert_eq!(set.iter().collect::<Vec<_>>(), vec![&"marko", &"josh", &"josh", &"josh"]);
/// ```
#[derive(Clone)]
pub struct BulkSet<T> {
    bulks: IndexMap<T, u64, FxBuildHasher>,
    size: u64,
}

impl<T: Hash + Eq> BulkSet<T> {
    /// Create an empty bulk set
    pub fn new() -> Self {
        Self {
            bulks: IndexMap::with_hasher(FxBuildHasher),
            size: 0,
        }
    }

    /// Create an empty bulk set with room for `capacity` distinct values
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bulks: IndexMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            size: 0,
        }
    }

    /// Add one occurrence of `value`
    pub fn add(&mut self, value: T) {
        self.add_bulk(value, 1);
    }

    /// Add `bulk` occurrences of `value`
    ///
    /// A zero bulk is a no-op. A new value goes to the end of the ledger, an
    /// existing one accumulates.
    ///
    /// # Panics
    ///
    /// Panics if the total size would exceed `u64::MAX`. Use
    /// [`checked_add_bulk`](Self::checked_add_bulk) for untrusted counts.
    pub fn add_bulk(&mut self, value: T, bulk: u64) {
        if let Err(err) = self.checked_add_bulk(value, bulk) {
            panic!("{}", err);
        }
    }

    /// Like [`add_bulk`](Self::add_bulk), but returns
    /// [`StructureError::BulkOverflow`] instead of panicking. The set is left
    /// unchanged on error.
    pub fn checked_add_bulk(&mut self, value: T, bulk: u64) -> StructureResult<()> {
        if bulk == 0 {
            return Ok(());
        }
        // Every bulk is at most the size, so a size that fits means the entry fits too
        let size = self
            .size
            .checked_add(bulk)
            .ok_or(StructureError::BulkOverflow(bulk))?;
        *self.bulks.entry(value).or_insert(0) += bulk;
        self.size = size;
        Ok(())
    }

    /// Like [`checked_add_bulk`](Self::checked_add_bulk) for signed counts
    ///
    /// Returns [`StructureError::InvalidBulk`] for a negative `bulk`. The set
    /// is left unchanged on error.
    pub fn try_add_bulk(&mut self, value: T, bulk: i64) -> StructureResult<()> {
        let bulk = u64::try_from(bulk).map_err(|_| StructureError::InvalidBulk(bulk))?;
        self.checked_add_bulk(value, bulk)
    }

    /// Occurrences of `value`, 0 when absent
    pub fn get<Q>(&self, value: &Q) -> u64
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.bulks.get(value).copied().unwrap_or(0)
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(value) > 0
    }

    /// Remove `value` with its whole bulk, returning the bulk that was removed
    pub fn remove<Q>(&mut self, value: &Q) -> u64
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        // shift_remove keeps the first-insertion order of the remaining values
        let bulk = self.bulks.shift_remove(value).unwrap_or(0);
        self.size -= bulk;
        bulk
    }

    pub fn clear(&mut self) {
        self.bulks.clear();
        self.size = 0;
    }
}

impl<T> BulkSet<T> {
    /// Total number of occurrences
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of distinct values actually stored
    pub fn unique_size(&self) -> usize {
        self.bulks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bulks.is_empty()
    }

    /// Every occurrence: each distinct value repeated by its bulk, distinct
    /// values in first-insertion order
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            entries: self.bulks.iter(),
            current: None,
            remaining_current: 0,
            remaining_total: self.size,
        }
    }

    /// Distinct values with their bulks, in first-insertion order
    pub fn iter_bulk(&self) -> impl Iterator<Item = (&T, u64)> + '_ {
        self.bulks.iter().map(|(value, bulk)| (value, *bulk))
    }
}

impl<T: Hash + Eq> Default for BulkSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for BulkSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.bulks.iter()).finish()
    }
}

impl<T: Hash + Eq> PartialEq for BulkSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self.bulks.len() == other.bulks.len()
            && self
                .bulks
                .iter()
                .all(|(value, bulk)| other.bulks.get(value) == Some(bulk))
    }
}

impl<T: Hash + Eq> Eq for BulkSet<T> {}

impl<T: Hash + Eq> FromIterator<T> for BulkSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = BulkSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Hash + Eq> Extend<T> for BulkSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a BulkSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Serialized as a sequence of `[value, bulk]` pairs in ledger order
impl<T: Serialize> Serialize for BulkSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter_bulk())
    }
}

impl<'de, T: Deserialize<'de> + Hash + Eq> Deserialize<'de> for BulkSet<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs: Vec<(T, u64)> = Vec::deserialize(deserializer)?;
        let mut set = BulkSet::with_capacity(pairs.len());
        for (value, bulk) in pairs {
            set.checked_add_bulk(value, bulk).map_err(de::Error::custom)?;
        }
        Ok(set)
    }
}

/// Lazy occurrence iterator returned by [`BulkSet::iter`]
pub struct Iter<'a, T> {
    entries: map::Iter<'a, T, u64>,
    current: Option<&'a T>,
    remaining_current: u64,
    remaining_total: u64,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        while self.remaining_current == 0 {
            let (value, bulk) = self.entries.next()?;
            self.current = Some(value);
            self.remaining_current = *bulk;
        }
        self.remaining_current -= 1;
        self.remaining_total -= 1;
        self.current
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining_total) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl<T> FusedIterator for Iter<'_, T> {}
