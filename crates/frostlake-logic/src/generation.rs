//! Procedural lake generation.
//!
//! Runs in three passes over a fresh grid:
//!
//! 1. **Frame**: entrance and walls on row 0, one cliff side chosen from
//!    right/bottom/left, walls on the remaining border (corners included).
//! 2. **Ice blocks**: at least one per interior row, with special rows near
//!    the entrance, the middle and the cliff.
//! 3. **Holes and spikes**: drawn from a shuffled list of safe cells. Spikes
//!    only go next to walls, so candidates that are not are skipped.
//!
//! Every step degrades to a wider candidate set instead of failing.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::LakeConfig;
use crate::error::LakeError;
use crate::grid::{CliffSide, Grid, Position};
use crate::item::{HazardKind, Item};

const ICE_BLOCK: Item = Item::Hazard(HazardKind::IceBlock);

/// Generate a lake with a randomly chosen cliff side.
pub fn generate_map(config: &LakeConfig, rng: &mut impl Rng) -> Result<Grid, LakeError> {
    let side = CliffSide::ALL[rng.gen_range(0..CliffSide::ALL.len())];
    generate_map_with_cliff(config, side, rng)
}

/// Generate a lake whose cliff runs along `side`.
pub fn generate_map_with_cliff(
    config: &LakeConfig,
    side: CliffSide,
    rng: &mut impl Rng,
) -> Result<Grid, LakeError> {
    let mut grid = build_frame(config, side)?;
    place_ice_blocks(&mut grid, config, rng)?;
    place_hazards(&mut grid, config, rng)?;
    log::debug!(
        "generated {}x{} lake, cliff {:?}, {} ice blocks",
        config.columns,
        config.rows,
        side,
        grid.count_items(ICE_BLOCK)
    );
    Ok(grid)
}

/// Entrance, walls and the cliff boundary on an otherwise empty grid.
pub fn build_frame(config: &LakeConfig, side: CliffSide) -> Result<Grid, LakeError> {
    let (cols, rows) = (config.columns, config.rows);
    let mut grid = Grid::new(cols, rows);
    grid.set_cliff_side(side);

    for row in 0..rows {
        for col in 0..cols {
            let pos = Position::new(row, col);
            if !grid.is_border(pos) {
                continue;
            }
            let corner = (row == 0 || row == rows - 1) && (col == 0 || col == cols - 1);
            let item = if pos == grid.entrance() {
                Item::Entrance
            } else if !corner && on_side(side, pos, cols, rows) {
                Item::Hazard(HazardKind::CliffEdge)
            } else {
                Item::Wall
            };
            grid.place_item(pos, item)?;
        }
    }
    Ok(grid)
}

fn on_side(side: CliffSide, pos: Position, cols: usize, rows: usize) -> bool {
    match side {
        CliffSide::Right => pos.col == cols - 1 && pos.row > 0,
        CliffSide::Bottom => pos.row == rows - 1,
        CliffSide::Left => pos.col == 0 && pos.row > 0,
    }
}

/// Interior column directly next to a side cliff.
fn cliff_adjacent_column(side: CliffSide, cols: usize) -> Option<usize> {
    match side {
        CliffSide::Right => Some(cols - 2),
        CliffSide::Left => Some(1),
        CliffSide::Bottom => None,
    }
}

fn place_ice_blocks(
    grid: &mut Grid,
    config: &LakeConfig,
    rng: &mut impl Rng,
) -> Result<(), LakeError> {
    let side = grid.cliff_side().unwrap_or(CliffSide::Bottom);
    let cols = grid.columns();
    let entrance_col = config.entrance_column();
    let interior: Vec<usize> = (1..cols - 1).collect();
    let cliff_col = cliff_adjacent_column(side, cols);
    let mut middle_used = false;

    for row in 1..=config.last_interior_row() {
        let cliff_blocks = cliff_col.map_or(0, |c| {
            (1..row)
                .filter(|&r| grid.item_at(Position::new(r, c)) == Some(ICE_BLOCK))
                .count()
        });

        let columns: Vec<usize> = if row == 1 {
            let choices: Vec<usize> = interior
                .iter()
                .copied()
                .filter(|&c| c != entrance_col)
                .collect();
            pick(&choices, &interior, rng).into_iter().collect()
        } else if row == config.middle_row() && !middle_used {
            vec![entrance_col]
        } else if row == config.cliff_row() && cliff_blocks == 0 && cliff_col.is_some() {
            cliff_col.into_iter().collect()
        } else if row == config.last_interior_row() && side == CliffSide::Bottom {
            vec![cols / 3, 2 * cols / 3]
        } else if row == config.last_interior_row() && cliff_blocks == 1 && cliff_col.is_some() {
            cliff_col.into_iter().collect()
        } else {
            let choices: Vec<usize> = interior
                .iter()
                .copied()
                .filter(|&c| !crowds_row_below(grid, row, c))
                .collect();
            pick(&choices, &interior, rng).into_iter().collect()
        };

        for col in columns {
            if col == entrance_col {
                middle_used = true;
            }
            grid.place_item(Position::new(row, col), ICE_BLOCK)?;
            log::trace!("ice block at ({row}, {col})");
        }
    }
    Ok(())
}

/// Whether a block in `col` would sit over a cell hugging a wall or cliff.
fn crowds_row_below(grid: &Grid, row: usize, col: usize) -> bool {
    let below = Position::new(row + 1, col);
    grid.is_next_to_wall(below)
        || grid.is_next_to_cliff(below)
        || grid.hazard_at(below) == Some(HazardKind::CliffEdge)
}

/// Random choice from `preferred`, falling back to `all` when it is empty.
fn pick(preferred: &[usize], all: &[usize], rng: &mut impl Rng) -> Option<usize> {
    preferred
        .choose(rng)
        .or_else(|| all.choose(rng))
        .copied()
}

/// Cells where holes and spikes may go.
pub fn safe_cells(grid: &Grid, config: &LakeConfig) -> Vec<Position> {
    grid.cells()
        .filter(|cell| !cell.has_item() && cell.occupant().is_none())
        .map(|cell| cell.position())
        .filter(|&p| !near_entrance(p, config))
        .filter(|&p| !grid.is_next_to_cliff(p))
        .collect()
}

/// Inside the hazard-free box below the entrance.
pub fn near_entrance(pos: Position, config: &LakeConfig) -> bool {
    pos.row < config.entrance_guard_rows
        && pos.col.abs_diff(config.entrance_column()) <= config.entrance_guard_half_width
}

fn place_hazards(
    grid: &mut Grid,
    config: &LakeConfig,
    rng: &mut impl Rng,
) -> Result<(), LakeError> {
    let mut candidates = safe_cells(grid, config);
    candidates.shuffle(rng);
    let mut candidates = candidates.into_iter();

    let mut holes = 0;
    for pos in candidates.by_ref().take(config.holes) {
        grid.place_item(pos, Item::Hazard(HazardKind::Hole))?;
        holes += 1;
    }
    if holes < config.holes {
        log::warn!("placed {holes} of {} holes; no safe cells left", config.holes);
    }

    let mut spikes = 0;
    while spikes < config.spikes {
        let Some(pos) = candidates.next() else {
            log::warn!(
                "placed {spikes} of {} spikes; no safe cells next to a wall left",
                config.spikes
            );
            break;
        };
        if grid.is_next_to_wall(pos) {
            grid.place_item(pos, Item::Hazard(HazardKind::IceSpike))?;
            spikes += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn frame_has_entrance_walls_and_one_cliff_side() {
        let config = LakeConfig::default();
        let grid = build_frame(&config, CliffSide::Left).unwrap();

        assert_eq!(grid.item_at(Position::new(0, 6)), Some(Item::Entrance));
        assert_eq!(grid.count_items(Item::Entrance), 1);
        for row in 1..9 {
            assert_eq!(
                grid.hazard_at(Position::new(row, 0)),
                Some(HazardKind::CliffEdge)
            );
            assert_eq!(grid.item_at(Position::new(row, 12)), Some(Item::Wall));
        }
        assert_eq!(grid.item_at(Position::new(9, 0)), Some(Item::Wall));
        assert_eq!(grid.item_at(Position::new(0, 0)), Some(Item::Wall));
        assert_eq!(grid.count_items(Item::Hazard(HazardKind::CliffEdge)), 8);
    }

    #[test]
    fn bottom_cliff_excludes_corners() {
        let config = LakeConfig::default();
        let grid = build_frame(&config, CliffSide::Bottom).unwrap();
        assert_eq!(grid.item_at(Position::new(9, 0)), Some(Item::Wall));
        assert_eq!(grid.item_at(Position::new(9, 12)), Some(Item::Wall));
        assert_eq!(grid.count_items(Item::Hazard(HazardKind::CliffEdge)), 11);
    }

    #[test]
    fn interior_starts_empty() {
        let config = LakeConfig::default();
        let grid = build_frame(&config, CliffSide::Right).unwrap();
        assert!(grid
            .cells()
            .filter(|c| !grid.is_border(c.position()))
            .all(|c| !c.has_item()));
    }

    #[test]
    fn every_interior_row_gets_an_ice_block() {
        let config = LakeConfig::default();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let grid = generate_map(&config, &mut rng).unwrap();
            for row in 1..=8 {
                let blocks = (0..13)
                    .filter(|&c| grid.item_at(Position::new(row, c)) == Some(ICE_BLOCK))
                    .count();
                assert!(blocks >= 1, "seed {seed} row {row}");
            }
            assert_ne!(grid.item_at(Position::new(1, 6)), Some(ICE_BLOCK));
        }
    }

    #[test]
    fn bottom_cliff_gets_paired_blocks() {
        let config = LakeConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let grid = generate_map_with_cliff(&config, CliffSide::Bottom, &mut rng).unwrap();
        assert_eq!(grid.item_at(Position::new(8, 4)), Some(ICE_BLOCK));
        assert_eq!(grid.item_at(Position::new(8, 8)), Some(ICE_BLOCK));
    }

    #[test]
    fn side_cliff_gets_adjacent_blocks() {
        let config = LakeConfig::default();
        for (side, col) in [(CliffSide::Right, 11), (CliffSide::Left, 1)] {
            for seed in 0..50 {
                let mut rng = StdRng::seed_from_u64(seed);
                let grid = generate_map_with_cliff(&config, side, &mut rng).unwrap();
                let adjacent = (1..=8)
                    .filter(|&r| grid.item_at(Position::new(r, col)) == Some(ICE_BLOCK))
                    .count();
                assert!(adjacent >= 1, "{side:?} seed {seed}");
            }
        }
    }

    #[test]
    fn special_rows_follow_their_rules() {
        let config = LakeConfig::default();
        let block =
            |grid: &Grid, r: usize, c: usize| grid.item_at(Position::new(r, c)) == Some(ICE_BLOCK);
        let mut middle_checks = 0;
        let mut forced_pairs = 0;
        for side in CliffSide::ALL {
            for seed in 0..300 {
                let mut rng = StdRng::seed_from_u64(seed);
                let grid = generate_map_with_cliff(&config, side, &mut rng).unwrap();

                // Middle row takes the entrance column unless an earlier row did.
                if !(1..6).any(|r| block(&grid, r, 6)) {
                    assert!(block(&grid, 6, 6), "{side:?} seed {seed}");
                    middle_checks += 1;
                }

                match cliff_adjacent_column(side, 13) {
                    Some(col) => {
                        let before_last = (1..8).filter(|&r| block(&grid, r, col)).count();
                        assert!(before_last >= 1, "{side:?} seed {seed}");
                        if before_last == 1 {
                            assert!(block(&grid, 8, col), "{side:?} seed {seed}");
                            forced_pairs += 1;
                        }
                    }
                    None => {
                        assert!(block(&grid, 8, 4) && block(&grid, 8, 8), "seed {seed}");
                    }
                }
            }
        }
        assert!(middle_checks > 0);
        assert!(forced_pairs > 0);
    }

    #[test]
    fn hazards_avoid_entrance_and_cliff() {
        let config = LakeConfig::default();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let grid = generate_map(&config, &mut rng).unwrap();
            for cell in grid.cells() {
                let p = cell.position();
                match cell.hazard() {
                    Some(HazardKind::Hole) => {
                        assert!(!near_entrance(p, &config));
                        assert!(!grid.is_next_to_cliff(p));
                    }
                    Some(HazardKind::IceSpike) => {
                        assert!(!near_entrance(p, &config));
                        assert!(!grid.is_next_to_cliff(p));
                        assert!(grid.is_next_to_wall(p), "seed {seed} spike at {p}");
                    }
                    _ => {}
                }
            }
            assert_eq!(grid.count_items(Item::Hazard(HazardKind::Hole)), 3);
        }
    }

    #[test]
    fn same_seed_same_lake() {
        let config = LakeConfig::default();
        let a = generate_map(&config, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate_map(&config, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn spike_loop_terminates_without_wall_cells() {
        let config = LakeConfig {
            spikes: 500,
            ..LakeConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let grid = generate_map(&config, &mut rng).unwrap();
        assert!(grid.count_items(Item::Hazard(HazardKind::IceSpike)) < 500);
    }
}
