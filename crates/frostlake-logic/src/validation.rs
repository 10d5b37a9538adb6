//! Structural checks for generated lakes.
//!
//! Pure functions over a finished [`Grid`]. Each returns the problems it
//! found; an empty list means the lake is well formed.

use crate::config::LakeConfig;
use crate::generation::near_entrance;
use crate::grid::{CliffSide, Grid, Position};
use crate::item::{HazardKind, Item};

/// A map validation problem.
#[derive(Debug, Clone)]
pub struct MapViolation {
    pub category: &'static str,
    pub message: String,
}

impl MapViolation {
    fn new(category: &'static str, message: String) -> Self {
        Self { category, message }
    }
}

// ── Frame ───────────────────────────────────────────────────────────────

/// Exactly one entrance, on row 0.
pub fn check_single_entrance(grid: &Grid) -> Vec<MapViolation> {
    let entrances: Vec<Position> = grid
        .cells()
        .filter(|c| c.item() == Some(Item::Entrance))
        .map(|c| c.position())
        .collect();
    match entrances.as_slice() {
        [p] if p.row == 0 => Vec::new(),
        _ => vec![MapViolation::new(
            "frame",
            format!("expected one entrance on row 0, found {entrances:?}"),
        )],
    }
}

/// Every border cell is a wall, the entrance, or a cliff on the cliff side.
pub fn check_border(grid: &Grid) -> Vec<MapViolation> {
    let mut errors = Vec::new();
    for cell in grid.cells().filter(|c| grid.is_border(c.position())) {
        let p = cell.position();
        match cell.item() {
            Some(Item::Wall) | Some(Item::Entrance) => {}
            Some(Item::Hazard(HazardKind::CliffEdge)) => {
                if !on_cliff_side(grid, p) {
                    errors.push(MapViolation::new(
                        "frame",
                        format!("cliff edge at {p} is off the {:?} side", grid.cliff_side()),
                    ));
                }
            }
            other => errors.push(MapViolation::new(
                "frame",
                format!("border cell {p} holds {other:?}"),
            )),
        }
    }
    errors
}

fn on_cliff_side(grid: &Grid, p: Position) -> bool {
    match grid.cliff_side() {
        Some(CliffSide::Right) => p.col == grid.columns() - 1,
        Some(CliffSide::Bottom) => p.row == grid.rows() - 1,
        Some(CliffSide::Left) => p.col == 0,
        None => false,
    }
}

/// Cliff edges only on the border.
pub fn check_cliff_on_border(grid: &Grid) -> Vec<MapViolation> {
    grid.cells()
        .filter(|c| c.hazard() == Some(HazardKind::CliffEdge) && !grid.is_border(c.position()))
        .map(|c| {
            MapViolation::new(
                "frame",
                format!("interior cliff edge at {}", c.position()),
            )
        })
        .collect()
}

// ── Hazards ─────────────────────────────────────────────────────────────

/// At least one ice block in every interior row.
pub fn check_ice_block_rows(grid: &Grid) -> Vec<MapViolation> {
    grid.rows_iter()
        .enumerate()
        .skip(1)
        .take(grid.rows().saturating_sub(2))
        .filter(|(_, cells)| !cells.iter().any(|c| c.hazard() == Some(HazardKind::IceBlock)))
        .map(|(row, _)| MapViolation::new("ice_blocks", format!("row {row} has no ice block")))
        .collect()
}

/// Holes and spikes stay out of the entrance box and away from the cliff.
pub fn check_hazard_exclusion(grid: &Grid, config: &LakeConfig) -> Vec<MapViolation> {
    let mut errors = Vec::new();
    for cell in grid.cells() {
        let p = cell.position();
        if !matches!(
            cell.hazard(),
            Some(HazardKind::Hole) | Some(HazardKind::IceSpike)
        ) {
            continue;
        }
        if near_entrance(p, config) {
            errors.push(MapViolation::new(
                "hazards",
                format!("{:?} at {p} inside the entrance box", cell.hazard()),
            ));
        }
        if grid.is_next_to_cliff(p) {
            errors.push(MapViolation::new(
                "hazards",
                format!("{:?} at {p} next to the cliff", cell.hazard()),
            ));
        }
    }
    errors
}

/// Every spike touches a wall.
pub fn check_spikes_near_walls(grid: &Grid) -> Vec<MapViolation> {
    grid.cells()
        .filter(|c| c.hazard() == Some(HazardKind::IceSpike))
        .filter(|c| !grid.is_next_to_wall(c.position()))
        .map(|c| {
            MapViolation::new(
                "hazards",
                format!("spike at {} not next to a wall", c.position()),
            )
        })
        .collect()
}

// ── Master validation ───────────────────────────────────────────────────

/// Run every map check.
pub fn validate_map(grid: &Grid, config: &LakeConfig) -> Vec<MapViolation> {
    let mut all = Vec::new();
    all.extend(check_single_entrance(grid));
    all.extend(check_border(grid));
    all.extend(check_cliff_on_border(grid));
    all.extend(check_ice_block_rows(grid));
    all.extend(check_hazard_exclusion(grid, config));
    all.extend(check_spikes_near_walls(grid));
    all
}
