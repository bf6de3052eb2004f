//! Consistent hashing ring for deterministic entity placement.
//!
//! This crate implements a consistent hash ring over a small, fixed-size
//! slot space. Each node occupies exactly one slot, chosen by hashing its
//! host string; each entity is filed under the slot its key hashes to and is
//! owned by the first node clockwise from that slot.
//!
//! Adding or removing a node migrates entities between exactly two node
//! stores: the arc the new node claims is moved out of its clockwise
//! neighbour, and a departing node's entities are copied into its clockwise
//! successor.
//!
//! There are no virtual nodes: `total_range` bounds both the node count and
//! how evenly load spreads.

mod error;
mod hash;
mod index;
mod migration;
mod node;
mod ring;

pub use error::RingError;
pub use hash::{DEFAULT_TOTAL_RANGE, slot_for};
pub use index::SlotIndex;
pub use migration::SlotArc;
pub use node::Node;
pub use ring::Ring;
