//! Copy-on-write caches shared by every call on a [`Validator`].
//!
//! Reads load an immutable snapshot without locking. A miss is computed
//! outside any lock; publishing takes a writer lock, re-checks the key,
//! copies the map, inserts and swaps the snapshot in. Concurrent misses on
//! one key may compute twice, but readers only ever see a single winner.
//!
//! [`Validator`]: crate::Validator

use std::any::TypeId;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::tag::Chunk;

// ============================================================================
// SNAPSHOT CACHE
// ============================================================================

/// A map with lock-free reads and serialized copy-on-write publication.
pub struct SnapshotCache<K, V> {
    snapshot: ArcSwap<HashMap<K, V>>,
    writer: Mutex<()>,
}

impl<K, V> SnapshotCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(HashMap::new()),
            writer: Mutex::new(()),
        }
    }

    /// Lock-free lookup in the current snapshot.
    pub fn load<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.snapshot.load().get(key).cloned()
    }

    /// Publishes `value` unless another writer got there first, and returns
    /// whichever value is now cached.
    pub fn store(&self, key: K, value: V) -> V {
        let _guard = self.writer.lock();
        let current = self.snapshot.load_full();
        if let Some(existing) = current.get(&key) {
            return existing.clone();
        }

        let mut next = HashMap::with_capacity(current.len() + 1);
        next.extend(current.iter().map(|(k, v)| (k.clone(), v.clone())));
        next.insert(key, value.clone());
        self.snapshot.store(Arc::new(next));
        value
    }

    /// Drops every entry.
    pub fn clear(&self) {
        let _guard = self.writer.lock();
        self.snapshot.store(Arc::new(HashMap::new()));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }
}

impl<K, V> Default for SnapshotCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for SnapshotCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotCache")
            .field("entries", &self.snapshot.load().len())
            .finish()
    }
}

// ============================================================================
// TAG AND STRUCT CACHES
// ============================================================================

/// Raw tag string to parsed chunk chain.
pub type TagCache = SnapshotCache<String, Arc<Chunk>>;

/// Struct type to the metadata of its validated fields.
pub type StructCache = SnapshotCache<TypeId, Arc<[FieldCache]>>;

/// One exported, non-skipped struct field and its parsed rules.
#[derive(Debug, Clone)]
pub struct FieldCache {
    /// Position in declaration order.
    pub index: usize,
    pub name: &'static str,
    pub exported: bool,
    pub raw_tag: &'static str,
    pub chunk: Arc<Chunk>,
}
