//! Per-node entity storage for SlotRing.
//!
//! This crate defines the [`NodeStore`] trait that the ring migrates
//! entities through, along with one concrete backend:
//!
//! - [`MemoryStore`]: in-memory storage backed by a `RwLock<BTreeMap>`.

mod error;
mod memory_store;
mod traits;

pub use error::StoreError;
pub use memory_store::MemoryStore;
pub use traits::NodeStore;
