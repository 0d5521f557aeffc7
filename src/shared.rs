//! Thread-safe wrapper around [`ProbeTable`].
//!
//! A probe walks a run of adjacent slots, so a concurrent insert or delete could
//! change the run halfway through. All mutations therefore go through a single
//! write lock; lookups share a read lock.

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::Result;
use crate::hash::{AdditiveHasher, KeyHasher};
use crate::ProbeTable;

pub struct SharedProbeTable<V, H = AdditiveHasher> {
    inner: RwLock<ProbeTable<V, H>>,
}

impl<V> SharedProbeTable<V> {
    pub fn new() -> Self {
        Self::from_table(ProbeTable::new())
    }

    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self::from_table(ProbeTable::with_config(config)?))
    }
}

impl<V, H: KeyHasher> SharedProbeTable<V, H> {
    pub fn from_table(table: ProbeTable<V, H>) -> Self {
        Self {
            inner: RwLock::new(table),
        }
    }

    /// Insert a key-value pair, returning the previous value if the key existed.
    pub fn insert(&self, key: &str, value: V) -> Result<Option<V>> {
        self.inner.write().insert(key, value)
    }

    /// Clone of the value stored under `key`.
    pub fn lookup(&self, key: &str) -> Result<V>
    where
        V: Clone,
    {
        self.inner.read().lookup(key).cloned()
    }

    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.read().contains_key(key)
    }

    pub fn delete(&self, key: &str) -> Result<V> {
        self.inner.write().delete(key)
    }

    pub fn remove(&self, key: &str) -> Option<V> {
        self.inner.write().remove(key)
    }

    pub fn rehash(&self, new_capacity: usize) -> Result<()> {
        self.inner.write().rehash(new_capacity)
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Runs `f` against the table while holding the read lock.
    pub fn with_read<R>(&self, f: impl FnOnce(&ProbeTable<V, H>) -> R) -> R {
        f(&*self.inner.read())
    }

    /// Runs `f` against the table while holding the write lock, so a
    /// read-modify-write sequence is atomic.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut ProbeTable<V, H>) -> R) -> R {
        f(&mut *self.inner.write())
    }

    pub fn into_inner(self) -> ProbeTable<V, H> {
        self.inner.into_inner()
    }
}

impl<V> Default for SharedProbeTable<V> {
    fn default() -> Self {
        Self::new()
    }
}
