//! Core trait for node storage.

use slotring_types::{Entity, Slot};

use crate::error::StoreError;

/// Entity storage local to one node.
///
/// Entities are addressed first by bucket, then by key within the bucket.
/// All methods take `&self`: implementations serialize access internally so
/// that a store can be shared between the ring and whoever owns the node.
pub trait NodeStore: Send + Sync {
    /// Insert or overwrite `key` under `bucket`.
    fn put(&self, bucket: Slot, key: &str, value: &str) -> Result<(), StoreError>;

    /// Look up `key` under `bucket`. Returns `None` if either is absent.
    fn get(&self, bucket: Slot, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove `key` from `bucket`, returning the removed value.
    fn delete(&self, bucket: Slot, key: &str) -> Result<Option<String>, StoreError>;

    /// Enumerate every stored entity, ordered by bucket and then by key.
    fn entries(&self) -> Result<Vec<Entity>, StoreError>;

    /// List non-empty buckets in ascending order.
    fn buckets(&self) -> Result<Vec<Slot>, StoreError>;

    /// Number of stored entities across all buckets.
    fn len(&self) -> Result<usize, StoreError>;

    /// Whether the store holds no entities.
    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}
