//! # probe-table
//!
//! An open-addressing hash table with string keys, linear probing and tombstone
//! deletion.
//!
//! Every key has a home slot, `hash(key) % capacity`. Collisions are resolved by
//! walking forward one slot at a time (wrapping at the end) until a free slot is
//! found. Deleted entries leave a tombstone behind so that keys stored further
//! along the same probe run stay reachable. Every probe is bounded by the table's
//! capacity: a table with no free slot reports [`TableError::TableFull`] instead of
//! spinning.
//!
//! ## Example
//!
//! ```rust
//! use probe_table::{ProbeTable, TableError};
//!
//! let mut table: ProbeTable<u32> = ProbeTable::with_capacity(5).unwrap();
//! table.insert("a", 1).unwrap();
//! table.insert("f", 2).unwrap(); // same home slot as "a"; probes to the next one
//!
//! assert_eq!(table.lookup("f"), Ok(&2));
//! assert_eq!(table.delete("a"), Ok(1));
//! assert_eq!(table.lookup("f"), Ok(&2)); // still reachable across the tombstone
//! assert!(matches!(table.lookup("a"), Err(TableError::KeyNotFound { .. })));
//! ```

pub mod array;
pub mod config;
pub mod error;
pub mod hash;
pub mod shared;

pub use array::StaticArray;
pub use config::{Config, Growth};
pub use error::{Result, TableError};
pub use hash::{strhash, AdditiveHasher, Fnv1aHasher, KeyHasher};
pub use shared::SharedProbeTable;

use log::{debug, trace, warn};

/// Probe runs at least this long are traced.
const LONG_PROBE_RUN: usize = 8;

// =============================================================================
// Slots
// =============================================================================

#[derive(Clone, Debug)]
struct Entry<V> {
    key: String,
    value: V,
}

#[derive(Clone, Debug)]
enum Slot<V> {
    Empty,
    Occupied(Entry<V>),
    /// Previously occupied. Lookups walk past it; inserts may reuse it.
    Tombstone,
}

impl<V> Slot<V> {
    #[inline]
    fn entry(&self) -> Option<&Entry<V>> {
        match self {
            Slot::Occupied(entry) => Some(entry),
            _ => None,
        }
    }

    #[inline]
    fn entry_mut(&mut self) -> Option<&mut Entry<V>> {
        match self {
            Slot::Occupied(entry) => Some(entry),
            _ => None,
        }
    }
}

/// Outcome of walking a key's probe sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Probe {
    /// The key lives at `index`, reached after `probes` slot visits.
    Found { index: usize, probes: usize },
    /// The key is absent; `index` is where it would be inserted (first tombstone
    /// on the path, else the empty slot that ended the search).
    Vacant { index: usize },
    /// The key is absent and every slot is occupied by another key.
    Full,
}

#[inline]
fn home_slot(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

// =============================================================================
// ProbeTable
// =============================================================================

/// A string-keyed hash table using linear probing over a fixed slot array.
///
/// Capacity only changes through a rehash, which happens automatically under
/// [`Growth::Double`] and never under [`Growth::Fixed`].
#[derive(Clone)]
pub struct ProbeTable<V, H = AdditiveHasher> {
    slots: StaticArray<Slot<V>>,
    len: usize,
    tombstones: usize,
    growth: Growth,
    hasher: H,
}

impl<V> ProbeTable<V> {
    /// A growable table with the default configuration.
    pub fn new() -> Self {
        Self::from_parts(Config::default(), AdditiveHasher)
    }

    /// A fixed table of exactly `capacity` slots that never resizes.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_config(Config::fixed(capacity))
    }

    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_hasher(config, AdditiveHasher)
    }
}

impl<V, H: KeyHasher> ProbeTable<V, H> {
    pub fn with_hasher(config: Config, hasher: H) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, hasher))
    }

    fn from_parts(config: Config, hasher: H) -> Self {
        Self {
            slots: StaticArray::from_fn(config.initial_capacity, |_| Slot::Empty),
            len: 0,
            tombstones: 0,
            growth: config.growth,
            hasher,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Every slot holds a live entry.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots holding a tombstone.
    #[inline]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Live entries divided by capacity.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    pub fn growth(&self) -> Growth {
        self.growth
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Walks the probe sequence for `key`, visiting at most `capacity` slots.
    fn probe(&self, key: &str) -> Probe {
        let capacity = self.capacity();
        let home = home_slot(self.hasher.hash_key(key), capacity);
        let mut first_tombstone = None;

        for step in 0..capacity {
            let index = (home + step) % capacity;
            match &self.slots[index] {
                Slot::Empty => {
                    return Probe::Vacant {
                        index: first_tombstone.unwrap_or(index),
                    };
                }
                Slot::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Slot::Occupied(entry) if entry.key == key => {
                    let probes = step + 1;
                    if probes >= LONG_PROBE_RUN {
                        trace!(
                            "key {:?} found after {} probes (home {}, capacity {})",
                            key,
                            probes,
                            home,
                            capacity
                        );
                    }
                    return Probe::Found { index, probes };
                }
                Slot::Occupied(_) => {}
            }
        }

        match first_tombstone {
            Some(index) => Probe::Vacant { index },
            None => Probe::Full,
        }
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    ///
    /// A new key takes the first tombstone on its probe path, or the empty slot that
    /// ends the path. Fails with [`TableError::TableFull`] if neither exists within
    /// one full cycle; growable tables rehash before that can happen.
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>> {
        if key.is_empty() {
            return Err(TableError::EmptyKey);
        }

        let mut probe = self.probe(key);
        if !matches!(probe, Probe::Found { .. }) {
            if let Some(new_capacity) = self.rehash_target() {
                self.rehash(new_capacity)?;
                probe = self.probe(key);
            }
        }

        match probe {
            Probe::Found { index, .. } => Ok(self.slots[index]
                .entry_mut()
                .map(|entry| std::mem::replace(&mut entry.value, value))),
            Probe::Vacant { index } => {
                if matches!(self.slots[index], Slot::Tombstone) {
                    self.tombstones -= 1;
                }
                self.slots[index] = Slot::Occupied(Entry {
                    key: key.to_owned(),
                    value,
                });
                self.len += 1;
                Ok(None)
            }
            Probe::Full => {
                warn!(
                    "cannot insert {:?}: all {} slots occupied",
                    key,
                    self.capacity()
                );
                Err(TableError::TableFull {
                    capacity: self.capacity(),
                })
            }
        }
    }

    /// Returns the value stored under `key`, or [`TableError::KeyNotFound`].
    pub fn lookup(&self, key: &str) -> Result<&V> {
        self.get(key).ok_or_else(|| TableError::not_found(key))
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        match self.probe(key) {
            Probe::Found { index, .. } => self.slots[index].entry().map(|entry| &entry.value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        match self.probe(key) {
            Probe::Found { index, .. } => {
                self.slots[index].entry_mut().map(|entry| &mut entry.value)
            }
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        matches!(self.probe(key), Probe::Found { .. })
    }

    /// Number of slots a successful lookup of `key` visits (1 when the key sits in
    /// its home slot).
    pub fn probe_distance(&self, key: &str) -> Option<usize> {
        match self.probe(key) {
            Probe::Found { probes, .. } => Some(probes),
            _ => None,
        }
    }

    /// Removes `key`, leaving a tombstone in its slot, and returns its value.
    pub fn delete(&mut self, key: &str) -> Result<V> {
        self.remove(key).ok_or_else(|| TableError::not_found(key))
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let Probe::Found { index, .. } = self.probe(key) else {
            return None;
        };
        match std::mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied(entry) => {
                self.len -= 1;
                self.tombstones += 1;
                Some(entry.value)
            }
            other => {
                self.slots[index] = other;
                None
            }
        }
    }

    /// Resets every slot to empty. Capacity is unchanged.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.len = 0;
        self.tombstones = 0;
    }

    /// Capacity to rebuild at before inserting one more key, if the growth policy
    /// asks for a rebuild.
    fn rehash_target(&self) -> Option<usize> {
        let Growth::Double { max_load_factor } = self.growth else {
            return None;
        };
        let capacity = self.capacity();
        let exceeds = |used: usize, capacity: usize| used as f64 > capacity as f64 * max_load_factor;

        if !exceeds(self.len + self.tombstones + 1, capacity) {
            return None;
        }
        // Purging tombstones alone may be enough.
        let mut target = capacity;
        while exceeds(self.len + 1, target) {
            target = target.checked_mul(2)?;
        }
        Some(target)
    }

    /// Rebuilds the slot array at `new_capacity`, reinserting every live entry and
    /// discarding all tombstones.
    pub fn rehash(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity == 0 || new_capacity < self.len {
            return Err(TableError::InvalidConfig(format!(
                "cannot rehash {} entries into {} slots",
                self.len, new_capacity
            )));
        }

        let old_capacity = self.capacity();
        let purged = self.tombstones;
        let old = std::mem::replace(
            &mut self.slots,
            StaticArray::from_fn(new_capacity, |_| Slot::Empty),
        );

        for slot in old.into_vec() {
            let Slot::Occupied(entry) = slot else {
                continue;
            };
            let home = home_slot(self.hasher.hash_key(&entry.key), new_capacity);
            // new_capacity >= len, so an empty slot is always reachable.
            let index = (0..new_capacity)
                .map(|step| (home + step) % new_capacity)
                .find(|&i| matches!(self.slots[i], Slot::Empty))
                .ok_or(TableError::TableFull {
                    capacity: new_capacity,
                })?;
            self.slots[index] = Slot::Occupied(entry);
        }
        self.tombstones = 0;

        debug!(
            "rehashed {} entries from {} to {} slots, purged {} tombstones",
            self.len, old_capacity, new_capacity, purged
        );
        Ok(())
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }
}

impl<V> Default for ProbeTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug, H> std::fmt::Debug for ProbeTable<V, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.slots.iter().filter_map(Slot::entry).map(|e| (&e.key, &e.value)))
            .finish()
    }
}

pub struct Iter<'a, V> {
    slots: std::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(entry) = slot {
                self.remaining -= 1;
                return Some((entry.key.as_str(), &entry.value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V, H: KeyHasher> IntoIterator for &'a ProbeTable<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}



#[cfg(test)]
mod proptests;
