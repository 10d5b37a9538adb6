//! Slide resolution.
//!
//! A move is planned against a read-only grid first and applied only once
//! the plan is known, so a blocked first step never touches anything.
//!
//! | Next cell             | Result                          |
//! |-----------------------|---------------------------------|
//! | off the grid          | stop on the current cell        |
//! | occupied              | stop on the current cell        |
//! | ice block             | stop on the current cell        |
//! | hole / spike / cliff  | enter, resolve hazard, stop     |
//! | equipment             | enter and stop                  |
//! | wall / entrance       | stop on the current cell        |
//! | empty                 | keep sliding                    |

use serde::{Deserialize, Serialize};

use crate::error::LakeError;
use crate::grid::{Direction, Grid, Position};
use crate::hazard::{self, Encounter};
use crate::item::{EquipmentStore, HazardKind, Item};
use crate::researcher::{Researcher, ResearcherId};

/// Why a slide ended where it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stop {
    Boundary,
    Occupant(ResearcherId),
    IceBlock,
    Hazard(HazardKind),
    Equipment,
    Obstacle,
}

/// Where a slide would end, computed without mutating the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlidePlan {
    pub to: Position,
    pub stop: Stop,
    pub cells: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideReport {
    pub researcher: ResearcherId,
    pub direction: Direction,
    pub from: Position,
    pub to: Position,
    pub stop: Stop,
    pub encounter: Option<Encounter>,
}

/// Plan a slide from `from` in `dir`.
pub fn plan_slide(grid: &Grid, from: Position, dir: Direction) -> Result<SlidePlan, LakeError> {
    let first = grid.step(from, dir).ok_or(LakeError::UnavailableDirection)?;
    if grid.occupant_at(first).is_some() || grid.item_at(first).is_some_and(Item::blocks_entry) {
        return Err(LakeError::UnavailableDirection);
    }

    let mut current = from;
    let mut cells = 0;
    loop {
        let Some(next) = grid.step(current, dir) else {
            return Ok(SlidePlan {
                to: current,
                stop: Stop::Boundary,
                cells,
            });
        };
        if let Some(id) = grid.occupant_at(next) {
            return Ok(SlidePlan {
                to: current,
                stop: Stop::Occupant(id),
                cells,
            });
        }
        let stop = match grid.item_at(next) {
            None => {
                current = next;
                cells += 1;
                continue;
            }
            Some(Item::Hazard(HazardKind::IceBlock)) => Stop::IceBlock,
            Some(Item::Hazard(h)) => {
                return Ok(SlidePlan {
                    to: next,
                    stop: Stop::Hazard(h),
                    cells: cells + 1,
                })
            }
            Some(Item::Equipment(_)) => {
                return Ok(SlidePlan {
                    to: next,
                    stop: Stop::Equipment,
                    cells: cells + 1,
                })
            }
            Some(Item::Wall) | Some(Item::Entrance) => Stop::Obstacle,
        };
        return Ok(SlidePlan {
            to: current,
            stop,
            cells,
        });
    }
}

/// Slide `researcher` in `dir` and resolve any hazard it lands on.
pub fn slide(
    researcher: &mut Researcher,
    dir: Direction,
    grid: &mut Grid,
    store: &mut EquipmentStore,
) -> Result<SlideReport, LakeError> {
    let from = grid
        .find_occupant(researcher.id())
        .ok_or(LakeError::Grid {
            at: grid.entry_cell(),
            reason: "researcher is not on the grid",
        })?;
    let plan = plan_slide(grid, from, dir)?;

    grid.move_occupant(from, plan.to)?;
    log::debug!(
        "{} slid {} from {} to {} ({:?})",
        researcher.id(),
        dir.symbol(),
        from,
        plan.to,
        plan.stop
    );

    let encounter = match plan.stop {
        Stop::Hazard(h) => Some(hazard::resolve(researcher, h, plan.to, grid, store)?),
        _ => None,
    };

    Ok(SlideReport {
        researcher: researcher.id(),
        direction: dir,
        from,
        to: plan.to,
        stop: plan.stop,
        encounter,
    })
}
