//! Shared test harness for SlotRing integration tests.
//!
//! Provides [`TestCluster`]: a ring plus a handle on every node it has ever
//! placed, so tests can inspect stores directly and check cluster-wide
//! invariants after each topology change.

use std::collections::BTreeMap;
use std::sync::Arc;

use slotring_placement::{Node, Ring, RingError};
use slotring_store::{MemoryStore, NodeStore};
use slotring_types::{Entity, Slot};

/// Slot count used by most tests.
pub const TOTAL_RANGE: u32 = 50;

/// Hosts chosen for their slots on a 50-slot ring.
pub const HOST_AT_5: &str = "node-52";
/// Hashes to slot 18.
pub const HOST_AT_18: &str = "node-29";
/// Hashes to slot 25.
pub const HOST_AT_25: &str = "node-15";
/// Hashes to slot 33.
pub const HOST_AT_33: &str = "node-3";

/// A ring together with every node handed to it.
pub struct TestCluster {
    pub ring: Ring,
    nodes: BTreeMap<String, Node>,
}

impl TestCluster {
    /// Empty cluster on a ring of `total_range` slots.
    pub fn new(total_range: u32) -> Self {
        Self {
            ring: Ring::new(total_range).expect("valid range"),
            nodes: BTreeMap::new(),
        }
    }

    /// Cluster with nodes A, B, C at slots 5, 18 and 33.
    pub fn abc() -> Self {
        let mut c = Self::new(TOTAL_RANGE);
        c.add("A", HOST_AT_5).unwrap();
        c.add("B", HOST_AT_18).unwrap();
        c.add("C", HOST_AT_33).unwrap();
        c
    }

    /// Create a node with a fresh in-memory store and add it to the ring.
    pub fn add(&mut self, name: &str, host: &str) -> Result<Slot, RingError> {
        let node = Node::new(name, host, Arc::new(MemoryStore::unbounded()));
        let slot = self.ring.add_node(node.clone())?;
        self.nodes.insert(name.to_string(), node);
        Ok(slot)
    }

    /// Remove a node by name and discard its store, as an operator would.
    pub fn remove(&mut self, name: &str) -> Result<Slot, RingError> {
        let node = self.node(name).clone();
        let slot = self.ring.remove_node(&node)?;
        self.nodes.remove(name);
        Ok(slot)
    }

    /// Handle on a node placed through this cluster.
    pub fn node(&self, name: &str) -> &Node {
        self.nodes
            .get(name)
            .unwrap_or_else(|| panic!("no node named {name}"))
    }

    /// Entities held by one node's store.
    pub fn entities_on(&self, name: &str) -> Vec<Entity> {
        self.node(name).store().entries().unwrap()
    }

    /// Union of all live nodes' entities, keyed by `(bucket, key)`.
    ///
    /// Panics if any entity is held by two live nodes.
    pub fn all_entities(&self) -> BTreeMap<(Slot, String), String> {
        let mut out = BTreeMap::new();
        for (name, node) in &self.nodes {
            for e in node.store().entries().unwrap() {
                let prev = out.insert((e.bucket, e.key.clone()), e.value);
                assert!(prev.is_none(), "{name} duplicates entity {}", e.key);
            }
        }
        out
    }

    /// Assert every stored entity sits on the node the ring routes its key to.
    pub fn assert_placement(&self) {
        for (name, node) in &self.nodes {
            for e in node.store().entries().unwrap() {
                let owner = self.ring.assign(&e.key).unwrap();
                assert_eq!(
                    owner.name(),
                    name,
                    "entity {} (bucket {}) stored on {name} but routed to {}",
                    e.key,
                    e.bucket,
                    owner.name()
                );
            }
        }
    }

    /// Assert slots are strictly increasing and match the live node count.
    pub fn assert_index(&self) {
        let slots = self.ring.slots();
        assert!(
            slots.windows(2).all(|w| w[0] < w[1]),
            "slots not strictly increasing: {slots:?}"
        );
        assert_eq!(slots.len(), self.ring.node_count());
        assert_eq!(slots.len(), self.nodes.len());
    }
}

/// Keys `"{prefix}-0" .. "{prefix}-{n}"`.
pub fn keys(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}-{i}")).collect()
}
