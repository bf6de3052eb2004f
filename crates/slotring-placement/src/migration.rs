//! Entity transfer between two node stores.

use slotring_store::{NodeStore, StoreError};
use slotring_types::{Entity, Slot};
use tracing::error;

/// A half-open arc of slots `(after, through]`, walked clockwise.
///
/// The arc wraps past the end of the slot space when `after >= through`.
/// `after == through` covers the whole ring, which is what a lone node owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotArc {
    /// Exclusive counter-clockwise boundary.
    pub after: Slot,
    /// Inclusive clockwise boundary; the owning node's slot.
    pub through: Slot,
}

impl SlotArc {
    /// Build the arc `(after, through]`.
    pub fn new(after: Slot, through: Slot) -> Self {
        Self { after, through }
    }

    /// Whether `bucket` falls on the arc.
    pub fn contains(&self, bucket: Slot) -> bool {
        if self.after < self.through {
            self.after < bucket && bucket <= self.through
        } else {
            bucket > self.after || bucket <= self.through
        }
    }
}

/// Entities selected for transfer from `source` to `target`.
///
/// Writes to the target happen first and are undone if any of them fails,
/// so a failed migration leaves both stores as they were.
pub(crate) struct Migration<'a> {
    source: &'a dyn NodeStore,
    target: &'a dyn NodeStore,
    entities: Vec<Entity>,
    /// Target values overwritten by `copy`, parallel to `entities`.
    replaced: Vec<Option<String>>,
}

impl<'a> Migration<'a> {
    /// Select every entity in `source` whose bucket lies on `arc`.
    pub(crate) fn arc(
        source: &'a dyn NodeStore,
        target: &'a dyn NodeStore,
        arc: SlotArc,
    ) -> Result<Self, StoreError> {
        let entities = source
            .entries()?
            .into_iter()
            .filter(|e| arc.contains(e.bucket))
            .collect();
        Ok(Self::with_entities(source, target, entities))
    }

    /// Select every entity in `source`.
    pub(crate) fn all(
        source: &'a dyn NodeStore,
        target: &'a dyn NodeStore,
    ) -> Result<Self, StoreError> {
        let entities = source.entries()?;
        Ok(Self::with_entities(source, target, entities))
    }

    fn with_entities(
        source: &'a dyn NodeStore,
        target: &'a dyn NodeStore,
        entities: Vec<Entity>,
    ) -> Self {
        Self {
            source,
            target,
            entities,
            replaced: Vec::new(),
        }
    }

    /// Number of selected entities.
    pub(crate) fn len(&self) -> usize {
        self.entities.len()
    }

    /// Write every selected entity into the target.
    pub(crate) fn copy(&mut self) -> Result<(), StoreError> {
        if let Err(e) = self.copy_unchecked() {
            self.rollback();
            return Err(e);
        }
        Ok(())
    }

    fn copy_unchecked(&mut self) -> Result<(), StoreError> {
        self.replaced.reserve(self.entities.len());
        for entity in &self.entities {
            let previous = self.target.get(entity.bucket, &entity.key)?;
            self.target.put(entity.bucket, &entity.key, &entity.value)?;
            self.replaced.push(previous);
        }
        Ok(())
    }

    /// Delete every selected entity from the source, after a successful `copy`.
    ///
    /// On failure, entities already deleted are written back to the source
    /// and the target is rolled back.
    pub(crate) fn purge_source(&mut self) -> Result<(), StoreError> {
        let mut failure = None;
        for (done, entity) in self.entities.iter().enumerate() {
            if let Err(e) = self.source.delete(entity.bucket, &entity.key) {
                failure = Some((done, e));
                break;
            }
        }
        let Some((done, err)) = failure else {
            return Ok(());
        };

        for restored in &self.entities[..done] {
            if let Err(e) = self
                .source
                .put(restored.bucket, &restored.key, &restored.value)
            {
                error!(bucket = %restored.bucket, key = %restored.key, %e, "failed to restore entity to source");
            }
        }
        self.rollback();
        Err(err)
    }

    /// Undo the target writes made so far by `copy`.
    fn rollback(&mut self) {
        let written = self.replaced.len();
        for (entity, previous) in self.entities[..written]
            .iter()
            .zip(self.replaced.drain(..))
            .rev()
        {
            let result = match previous {
                Some(value) => self.target.put(entity.bucket, &entity.key, &value),
                None => self.target.delete(entity.bucket, &entity.key).map(|_| ()),
            };
            if let Err(e) = result {
                error!(bucket = %entity.bucket, key = %entity.key, %e, "failed to roll back migrated entity");
            }
        }
    }
}
