//! Consistent hashing ring implementation.

use std::fmt;

use slotring_types::Slot;
use tracing::{debug, trace, warn};

use crate::error::RingError;
use crate::hash::slot_for;
use crate::index::SlotIndex;
use crate::migration::{Migration, SlotArc};
use crate::node::Node;

/// Consistent hashing ring over a fixed number of slots.
///
/// Each node sits on the slot its host hashes to and owns the arc running
/// counter-clockwise from its slot (inclusive) to the previous node's slot
/// (exclusive). An entity is owned by the first node at or clockwise of the
/// slot its key hashes to, wrapping past the last slot back to the first.
///
/// Topology changes take `&mut self`; entity operations take `&self` and
/// rely on each node store for per-node locking. Share a ring across threads
/// as `Arc<RwLock<Ring>>` so migrations never overlap routing.
#[derive(Debug)]
pub struct Ring {
    /// Occupied slots and their nodes, ascending.
    index: SlotIndex<Node>,
    /// Number of slots on the ring.
    total_range: u32,
}

impl Ring {
    /// Create an empty ring with `total_range` slots.
    ///
    /// `total_range` bounds the node count and must lie in `1..=i32::MAX`.
    pub fn new(total_range: u32) -> Result<Self, RingError> {
        if total_range == 0 || total_range > i32::MAX as u32 {
            return Err(RingError::InvalidRange(total_range));
        }
        Ok(Self {
            index: SlotIndex::new(),
            total_range,
        })
    }

    /// Add a node and return the slot it now occupies.
    ///
    /// The clockwise neighbour hands over every entity on the arc the new
    /// node claims. Fails without touching the ring or any store if the ring
    /// is full, the slot is taken, or the hand-over cannot complete.
    pub fn add_node(&mut self, node: Node) -> Result<Slot, RingError> {
        if self.index.len() as u64 >= u64::from(self.total_range) {
            return Err(RingError::HashSpaceFull {
                total_range: self.total_range,
            });
        }

        let key = slot_for(node.host(), self.total_range);
        let index = self.index.insertion_point(key);

        if index > 0 && self.index.slot_at(index - 1) == key {
            return Err(RingError::SlotCollision {
                slot: key,
                host: node.host().to_string(),
                existing: self.index.value_at(index - 1).host().to_string(),
            });
        }

        let mut moved = 0;
        if !self.index.is_empty() {
            let len = self.index.len();
            let left = if index == 0 { len - 1 } else { index - 1 };
            let right = if index == len { 0 } else { index };
            let neighbour = self.index.value_at(right);

            let arc = SlotArc::new(self.index.slot_at(left), key);
            let mut migration =
                Migration::arc(neighbour.store().as_ref(), node.store().as_ref(), arc)?;
            migration.copy()?;
            migration.purge_source()?;
            moved = migration.len();

            debug!(
                from = %neighbour,
                to = %node,
                after = %arc.after,
                through = %arc.through,
                moved,
                "split arc onto new node"
            );
        }

        debug!(node = %node, slot = %key, moved, "added node to ring");
        self.index.insert_at(index, key, node);
        Ok(key)
    }

    /// Remove the node whose host hashes to an occupied slot, returning that slot.
    ///
    /// Every entity of the departing node is copied into its clockwise
    /// successor before the slot is released. The departing store itself is
    /// left untouched for the caller to discard. When the last node leaves
    /// there is no successor and its entities stay where they are.
    pub fn remove_node(&mut self, node: &Node) -> Result<Slot, RingError> {
        if self.index.is_empty() {
            return Err(RingError::HashSpaceEmpty);
        }

        let key = slot_for(node.host(), self.total_range);
        let index = self.index.lower_bound(key);

        if index >= self.index.len() || self.index.slot_at(index) != key {
            return Err(RingError::NodeNotFound {
                host: node.host().to_string(),
                slot: key,
            });
        }

        let departing = self.index.value_at(index);
        if self.index.len() > 1 {
            let successor = self.index.value_at((index + 1) % self.index.len());
            let mut migration =
                Migration::all(departing.store().as_ref(), successor.store().as_ref())?;
            migration.copy()?;
            debug!(
                from = %departing,
                to = %successor,
                copied = migration.len(),
                "handed arc to successor"
            );
        } else {
            let stranded = departing.store().len()?;
            if stranded > 0 {
                warn!(node = %departing, stranded, "last node left the ring; entities remain in its store");
            }
        }

        let (slot, removed) = self.index.remove_at(index);
        debug!(node = %removed, %slot, "removed node from ring");
        Ok(slot)
    }

    /// Return the node responsible for `entity_key`.
    ///
    /// Walks clockwise from the key's slot to the first occupied slot at or
    /// after it, wrapping to the lowest slot. A key hashing onto a node's
    /// own slot belongs to that node, matching the `(left, slot]` arcs that
    /// migrations move.
    pub fn assign(&self, entity_key: &str) -> Result<&Node, RingError> {
        if self.index.is_empty() {
            return Err(RingError::HashSpaceEmpty);
        }
        let key = slot_for(entity_key, self.total_range);
        let index = self.index.lower_bound(key) % self.index.len();
        Ok(self.index.value_at(index))
    }

    /// Store `entity_value` under `entity_key` on the owning node.
    pub fn put(&self, entity_key: &str, entity_value: &str) -> Result<(), RingError> {
        let (node, bucket) = self.route(entity_key)?;
        trace!(key = entity_key, %bucket, node = %node, "put entity");
        node.store().put(bucket, entity_key, entity_value)?;
        Ok(())
    }

    /// Fetch the value stored under `entity_key`, if any.
    pub fn get(&self, entity_key: &str) -> Result<Option<String>, RingError> {
        let (node, bucket) = self.route(entity_key)?;
        trace!(key = entity_key, %bucket, node = %node, "get entity");
        Ok(node.store().get(bucket, entity_key)?)
    }

    /// Delete `entity_key`, returning the value it held.
    pub fn delete(&self, entity_key: &str) -> Result<Option<String>, RingError> {
        let (node, bucket) = self.route(entity_key)?;
        trace!(key = entity_key, %bucket, node = %node, "delete entity");
        Ok(node.store().delete(bucket, entity_key)?)
    }

    fn route(&self, entity_key: &str) -> Result<(&Node, Slot), RingError> {
        if entity_key.is_empty() {
            return Err(RingError::InvalidArgument("entity key is empty"));
        }
        let node = self.assign(entity_key)?;
        Ok((node, slot_for(entity_key, self.total_range)))
    }

    /// List `(slot, node)` pairs in ring order.
    pub fn describe(&self) -> Vec<(Slot, &Node)> {
        self.index.iter().collect()
    }

    /// The arc owned by the node at `slot`, if occupied.
    pub fn arc_of(&self, slot: Slot) -> Option<SlotArc> {
        let i = self.index.position(slot)?;
        let len = self.index.len();
        let left = if i == 0 { len - 1 } else { i - 1 };
        Some(SlotArc::new(self.index.slot_at(left), slot))
    }

    /// Slot a host would occupy on this ring.
    pub fn slot_of(&self, host: &str) -> Slot {
        slot_for(host, self.total_range)
    }

    /// Node occupying `slot`, if any.
    pub fn owner_of(&self, slot: Slot) -> Option<&Node> {
        self.index.get(slot)
    }

    /// Occupied slots in ascending order.
    pub fn slots(&self) -> Vec<Slot> {
        self.index.slots()
    }

    /// Number of slots on the ring.
    pub fn total_range(&self) -> u32 {
        self.total_range
    }

    /// Return the number of nodes in the ring.
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    /// Whether the ring has no nodes.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Whether every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.index.len() as u64 >= u64::from(self.total_range)
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (slot, node) in self.index.iter() {
            writeln!(f, "Server Hash : {slot}")?;
            match node.describe() {
                Ok(text) => writeln!(f, "{text}")?,
                Err(e) => writeln!(f, "Host : {}\nname : {}\n      <{e}>", node.host(), node.name())?,
            }
        }
        Ok(())
    }
}
