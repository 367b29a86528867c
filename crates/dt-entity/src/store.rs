//! Entity storage: `EntityStore` (records) and `EntityRngs` (per-entity RNG).
//!
//! # Why two structs?
//!
//! A motion update needs `&mut EntityState` and `&mut EntityRng` for the same
//! entity while the event detector later needs the whole store at once.
//! Keeping the RNGs in their own struct lets the tick loop borrow both
//! mutably side by side:
//!
//! ```ignore
//! for (entity, rng) in store.iter_mut().zip(rngs.iter_mut()) {
//!     engine.update(entity, rng, &ctx);
//! }
//! ```

use dt_core::{DtError, DtResult, EntityId, EntityKind, EntityRng};

use crate::EntityState;

// ── EntityRngs ────────────────────────────────────────────────────────────────

/// Per-entity deterministic RNG state, indexed by `EntityId`.
pub struct EntityRngs {
    pub inner: Vec<EntityRng>,
}

impl EntityRngs {
    /// Allocate and seed `count` per-entity RNGs from `global_seed`.
    pub fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| EntityRng::new(global_seed, EntityId(i)))
            .collect();
        Self { inner }
    }

    #[inline]
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut EntityRng> {
        self.inner.get_mut(entity.index())
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, EntityRng> {
        self.inner.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── EntityStore ───────────────────────────────────────────────────────────────

/// Owned collection of every entity in one simulation.
///
/// The population is fixed for the session: entities are created by
/// [`EntityStoreBuilder`](crate::EntityStoreBuilder) and never removed, and
/// `EntityId(i)` is always the record at index `i`.
#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    entities: Vec<EntityState>,
}

impl EntityStore {
    /// Wrap pre-built records.  Ids are reassigned to match their index.
    pub fn from_entities(mut entities: Vec<EntityState>) -> Self {
        for (i, e) in entities.iter_mut().enumerate() {
            e.id = EntityId(i as u32);
        }
        Self { entities }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterator over all `EntityId`s in ascending index order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        (0..self.entities.len() as u32).map(EntityId)
    }

    pub fn get(&self, id: EntityId) -> DtResult<&EntityState> {
        self.entities.get(id.index()).ok_or(DtError::EntityNotFound(id))
    }

    pub fn get_mut(&mut self, id: EntityId) -> DtResult<&mut EntityState> {
        self.entities.get_mut(id.index()).ok_or(DtError::EntityNotFound(id))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntityState> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, EntityState> {
        self.entities.iter_mut()
    }

    pub fn as_slice(&self) -> &[EntityState] {
        &self.entities
    }

    pub fn as_mut_slice(&mut self) -> &mut [EntityState] {
        &mut self.entities
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }
}
