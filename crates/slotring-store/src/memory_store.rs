//! In-memory node storage backend.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use slotring_types::{Entity, Slot};
use tracing::trace;

use crate::error::StoreError;
use crate::traits::NodeStore;

type Buckets = BTreeMap<Slot, HashMap<String, String>>;

/// In-memory node store backed by a `RwLock<BTreeMap>`.
///
/// Buckets are kept in a `BTreeMap` so enumeration is sorted, which keeps
/// ring dumps stable between runs. Tracks the number of stored entities
/// against a configurable maximum.
pub struct MemoryStore {
    buckets: RwLock<Buckets>,
    max_entities: usize,
}

impl MemoryStore {
    /// Create a new in-memory store holding at most `max_entities` entities.
    pub fn new(max_entities: usize) -> Self {
        Self {
            buckets: RwLock::new(BTreeMap::new()),
            max_entities,
        }
    }

    /// Create a store with no entity limit.
    pub fn unbounded() -> Self {
        Self::new(usize::MAX)
    }

    /// Configured entity limit.
    pub fn max_entities(&self) -> usize {
        self.max_entities
    }

    fn read(&self, op: &'static str) -> Result<RwLockReadGuard<'_, Buckets>, StoreError> {
        self.buckets.read().map_err(|_| StoreError::Poisoned(op))
    }

    fn write(&self, op: &'static str) -> Result<RwLockWriteGuard<'_, Buckets>, StoreError> {
        self.buckets.write().map_err(|_| StoreError::Poisoned(op))
    }

    fn count_unlocked(map: &Buckets) -> usize {
        map.values().map(HashMap::len).sum()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("MemoryStore");
        match self.buckets.read() {
            Ok(map) => s.field("entities", &Self::count_unlocked(&map)),
            Err(_) => s.field("entities", &"<poisoned>"),
        };
        s.field("max_entities", &self.max_entities).finish()
    }
}

impl NodeStore for MemoryStore {
    fn put(&self, bucket: Slot, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.write("put")?;

        // Overwrites never grow the store.
        let exists = map.get(&bucket).is_some_and(|b| b.contains_key(key));
        if !exists {
            let used = Self::count_unlocked(&map);
            if used >= self.max_entities {
                return Err(StoreError::CapacityExceeded {
                    needed: 1,
                    available: self.max_entities.saturating_sub(used),
                });
            }
        }

        trace!(%bucket, key, "storing entity in memory");
        map.entry(bucket)
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, bucket: Slot, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.read("get")?;
        Ok(map.get(&bucket).and_then(|b| b.get(key)).cloned())
    }

    fn delete(&self, bucket: Slot, key: &str) -> Result<Option<String>, StoreError> {
        let mut map = self.write("delete")?;
        let Some(entries) = map.get_mut(&bucket) else {
            return Ok(None);
        };
        let removed = entries.remove(key);
        if entries.is_empty() {
            map.remove(&bucket);
        }
        if removed.is_some() {
            trace!(%bucket, key, "deleted entity from memory");
        }
        Ok(removed)
    }

    fn entries(&self) -> Result<Vec<Entity>, StoreError> {
        let map = self.read("entries")?;
        let mut out = Vec::with_capacity(Self::count_unlocked(&map));
        for (bucket, entries) in map.iter() {
            let mut keys: Vec<&String> = entries.keys().collect();
            keys.sort();
            for key in keys {
                out.push(Entity::new(*bucket, key.as_str(), entries[key].as_str()));
            }
        }
        Ok(out)
    }

    fn buckets(&self) -> Result<Vec<Slot>, StoreError> {
        let map = self.read("buckets")?;
        Ok(map.keys().copied().collect())
    }

    fn len(&self) -> Result<usize, StoreError> {
        let map = self.read("len")?;
        Ok(Self::count_unlocked(&map))
    }
}
