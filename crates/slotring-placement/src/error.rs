//! Error types for ring operations.

use slotring_store::StoreError;
use slotring_types::Slot;

/// Errors produced by topology changes and entity routing.
///
/// Every check runs before the ring is mutated, so a returned error means
/// the topology is exactly as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum RingError {
    /// The requested slot count cannot back a ring.
    #[error("invalid total range {0}: must be between 1 and {max}", max = i32::MAX)]
    InvalidRange(u32),

    /// Every slot is already occupied.
    #[error("hash space is full: all {total_range} slots are occupied")]
    HashSpaceFull {
        /// Slot count of the ring.
        total_range: u32,
    },

    /// The node's host hashes to a slot another node already holds.
    #[error("slot collision at {slot}: {host} hashes onto {existing}")]
    SlotCollision {
        /// The contested slot.
        slot: Slot,
        /// Host of the node being added.
        host: String,
        /// Host of the node already at `slot`.
        existing: String,
    },

    /// The ring has no nodes.
    #[error("hash space is empty")]
    HashSpaceEmpty,

    /// No node occupies the slot the host hashes to.
    #[error("node does not exist: {host} (slot {slot})")]
    NodeNotFound {
        /// Host that was looked up.
        host: String,
        /// Slot it hashes to.
        slot: Slot,
    },

    /// A caller-supplied argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A node store failed while serving or migrating entities.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
