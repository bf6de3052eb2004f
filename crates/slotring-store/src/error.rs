//! Error types for node storage operations.

/// Errors that can occur during node storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store has reached its entity limit.
    #[error("store capacity exceeded: need {needed} entities, only {available} available")]
    CapacityExceeded {
        /// Entities the operation needed to add.
        needed: usize,
        /// Entity slots still free.
        available: usize,
    },

    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned during {0}")]
    Poisoned(&'static str),
}
