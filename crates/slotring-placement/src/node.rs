//! Storage node handles.

use std::fmt;
use std::sync::Arc;

use slotring_store::{NodeStore, StoreError};

/// A storage node known to the ring.
///
/// The ring never builds nodes itself; callers create one per physical node
/// and hand clones to the ring. Clones share the same store.
#[derive(Clone)]
pub struct Node {
    name: String,
    host: String,
    store: Arc<dyn NodeStore>,
}

impl Node {
    /// Create a node handle.
    ///
    /// `host` decides the node's slot; `name` is only a label.
    pub fn new(name: impl Into<String>, host: impl Into<String>, store: Arc<dyn NodeStore>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            store,
        }
    }

    /// Diagnostic label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host identity used as the hash input.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The node's entity store.
    pub fn store(&self) -> &Arc<dyn NodeStore> {
        &self.store
    }

    /// Multi-line dump of the node and its buckets.
    pub fn describe(&self) -> Result<String, StoreError> {
        let mut out = format!("Host : {}\nname : {}", self.host, self.name);
        let entries = self.store.entries()?;
        let mut iter = entries.iter().peekable();
        while let Some(first) = iter.next() {
            let mut pairs = vec![format!("{}={}", first.key, first.value)];
            while let Some(next) = iter.next_if(|e| e.bucket == first.bucket) {
                pairs.push(format!("{}={}", next.key, next.value));
            }
            out.push_str(&format!(
                "\n      hash : {} Value : {{{}}}",
                first.bucket,
                pairs.join(", ")
            ));
        }
        Ok(out)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.host)
    }
}
