//! Shared types for SlotRing.
//!
//! This crate defines the two values every other crate passes around:
//! [`Slot`], a position on the fixed-size ring which doubles as the bucket an
//! entity is filed under, and [`Entity`], the `(bucket, key, value)` triple
//! that node stores enumerate during migration.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// A position in `[0, total_range)` on the ring.
///
/// Nodes occupy slots, and entities are bucketed by the slot their key hashes
/// to. Both uses share the same type so that arc comparisons between a node
/// position and an entity bucket are plain integer comparisons.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot(u32);

impl Slot {
    /// Wrap a raw slot number.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Return the raw slot number.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for Slot {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Slot> for u32 {
    fn from(slot: Slot) -> Self {
        slot.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A stored key/value pair together with the bucket it is filed under.
///
/// Bucket collisions are expected: the bucket space is `total_range` wide,
/// far smaller than the key space, so many entities share one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Hashed slot of `key`.
    pub bucket: Slot,
    /// Entity key, unique within its bucket.
    pub key: String,
    /// Entity value.
    pub value: String,
}

impl Entity {
    /// Build an entity from its parts.
    pub fn new(bucket: Slot, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            bucket,
            key: key.into(),
            value: value.into(),
        }
    }
}
