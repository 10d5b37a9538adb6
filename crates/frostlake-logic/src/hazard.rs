//! What happens when a researcher enters a hazard cell.
//!
//! Holes, ice spikes and cliff edges each have one counter gear. If the
//! researcher carries it, the gear leaves the bag and stays on the cell in
//! place of the hazard. Otherwise the researcher dies and the cell is left
//! as it was. Ice blocks are never entered, so they never get here.

use serde::{Deserialize, Serialize};

use crate::error::LakeError;
use crate::grid::{Grid, Position};
use crate::item::{EquipmentId, EquipmentStore, GearKind, HazardKind, Item, Owner};
use crate::researcher::Researcher;

/// Exactly one of these per encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Gear consumed; it now marks the cell.
    Neutralized { gear: EquipmentId, kind: GearKind },
    Killed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub hazard: HazardKind,
    pub at: Position,
    pub resolution: Resolution,
}

impl Encounter {
    /// Flavor line for the presentation layer.
    pub fn message(&self) -> &'static str {
        match (self.hazard, self.resolution) {
            (HazardKind::CliffEdge, Resolution::Neutralized { .. }) => {
                "Researcher comes across a cliff edge. However, Researcher is equipped with \
                 Climbing Equipment. Researcher safely navigates the cliff edge."
            }
            (HazardKind::Hole, Resolution::Neutralized { .. }) => {
                "Researcher comes across a hole in ice. However, Researcher is carrying a \
                 Large Wooden Board. Researcher safely crosses the hole."
            }
            (HazardKind::IceSpike, Resolution::Neutralized { .. }) => {
                "Researcher comes across a sharp ice spike. However, Researcher is wearing a \
                 Protective Helmet. Researcher is protected from the falling spike."
            }
            (_, Resolution::Killed) => "Researcher was injured by the hazard.",
            (HazardKind::IceBlock, _) => "Researcher stops at an ice block.",
        }
    }
}

/// Resolve `researcher` entering `hazard` at `at`.
pub fn resolve(
    researcher: &mut Researcher,
    hazard: HazardKind,
    at: Position,
    grid: &mut Grid,
    store: &mut EquipmentStore,
) -> Result<Encounter, LakeError> {
    let Some(counter) = hazard.counter() else {
        return Err(LakeError::Grid {
            at,
            reason: "ice blocks are never entered",
        });
    };

    let resolution = match researcher.bag().find_counter(hazard) {
        Some(entry) => {
            grid.replace_item(at, Item::Equipment(entry.id))?;
            researcher.bag_mut().remove(entry.id);
            store.set_owner(entry.id, Owner::Ground(at));
            log::info!(
                "{} neutralized {:?} at {} with {}",
                researcher.id(),
                hazard,
                at,
                entry.kind.name()
            );
            Resolution::Neutralized {
                gear: entry.id,
                kind: counter,
            }
        }
        None => {
            researcher.kill();
            log::warn!("{} injured by {:?} at {}", researcher.id(), hazard, at);
            Resolution::Killed
        }
    };

    Ok(Encounter {
        hazard,
        at,
        resolution,
    })
}
