//! Researchers and their equipment bags.
//!
//! A bag holds up to `capacity` pieces of equipment, all from the same
//! [`EquipmentCategory`]. Pieces are tracked by identity, so two cameras are
//! two entries. Bag operations check every precondition before touching the
//! bag or the store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LakeError;
use crate::grid::{Direction, Grid};
use crate::item::{EquipmentCategory, EquipmentId, EquipmentKind, EquipmentStore, HazardKind, Owner};
use crate::movement::{self, SlideReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResearcherId(pub u32);

impl fmt::Display for ResearcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// One carried piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagEntry {
    pub id: EquipmentId,
    pub kind: EquipmentKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentBag {
    capacity: usize,
    entries: Vec<BagEntry>,
}

impl EquipmentBag {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BagEntry> {
        self.entries.iter()
    }

    /// Category of the current contents; `None` while empty.
    pub fn category(&self) -> Option<EquipmentCategory> {
        self.entries.first().map(|e| e.kind.category())
    }

    pub fn contains(&self, id: EquipmentId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Whether `kind` could be added right now.
    pub fn check_add(&self, kind: EquipmentKind) -> Result<(), LakeError> {
        if self.entries.len() >= self.capacity {
            return Err(LakeError::BagFull {
                capacity: self.capacity,
            });
        }
        if let Some(held) = self.category() {
            if held != kind.category() {
                return Err(LakeError::MixedCategory {
                    held,
                    offered: kind.category(),
                });
            }
        }
        Ok(())
    }

    /// Add an entry. Re-adding the same piece is a no-op.
    pub fn insert(&mut self, entry: BagEntry) -> Result<(), LakeError> {
        if self.contains(entry.id) {
            return Ok(());
        }
        self.check_add(entry.kind)?;
        self.entries.push(entry);
        Ok(())
    }

    pub fn remove(&mut self, id: EquipmentId) -> Option<BagEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    pub fn find_kind(&self, kind: EquipmentKind) -> Option<BagEntry> {
        self.entries.iter().copied().find(|e| e.kind == kind)
    }

    pub fn find_code(&self, code: &str) -> Option<BagEntry> {
        self.entries.iter().copied().find(|e| e.kind.code() == code)
    }

    /// Gear in this bag that neutralizes `hazard`.
    pub fn find_counter(&self, hazard: HazardKind) -> Option<BagEntry> {
        let counter = hazard.counter()?;
        self.entries
            .iter()
            .copied()
            .find(|e| e.kind.as_gear() == Some(counter))
    }

    pub fn has_instrument(&self) -> bool {
        self.category() == Some(EquipmentCategory::ResearchInstrument)
    }

    pub(crate) fn drain(&mut self) -> Vec<BagEntry> {
        std::mem::take(&mut self.entries)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Researcher {
    id: ResearcherId,
    alive: bool,
    bag: EquipmentBag,
}

impl Researcher {
    /// Ids start at 1.
    pub fn new(id: u32, bag_capacity: usize) -> Result<Self, LakeError> {
        if id == 0 {
            return Err(LakeError::InvalidResearcherId);
        }
        Ok(Self {
            id: ResearcherId(id),
            alive: true,
            bag: EquipmentBag::new(bag_capacity),
        })
    }

    pub fn id(&self) -> ResearcherId {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }

    pub fn bag(&self) -> &EquipmentBag {
        &self.bag
    }

    pub(crate) fn bag_mut(&mut self) -> &mut EquipmentBag {
        &mut self.bag
    }

    /// Move a pooled piece into this researcher's bag.
    pub fn take_from_pool(
        &mut self,
        store: &mut EquipmentStore,
        id: EquipmentId,
    ) -> Result<(), LakeError> {
        let kind = store.kind(id).ok_or(LakeError::UnknownEquipment(id))?;
        if store.owner(id) != Some(Owner::Pool) {
            return Err(LakeError::PoolExhausted(kind));
        }
        self.bag.insert(BagEntry { id, kind })?;
        store.set_owner(id, Owner::Bag(self.id));
        Ok(())
    }

    /// Hand every carried piece back to the pool.
    pub fn return_to_pool(&mut self, store: &mut EquipmentStore) -> Vec<EquipmentId> {
        self.bag
            .drain()
            .into_iter()
            .map(|entry| {
                store.set_owner(entry.id, Owner::Pool);
                entry.id
            })
            .collect()
    }

    /// Slide across the grid from wherever this researcher stands.
    pub fn slide(
        &mut self,
        dir: Direction,
        grid: &mut Grid,
        store: &mut EquipmentStore,
    ) -> Result<SlideReport, LakeError> {
        movement::slide(self, dir, grid, store)
    }
}
