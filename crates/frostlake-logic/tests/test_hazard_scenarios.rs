//! Hazard and instrument scenarios on generated lakes.
//!
//! Exercises: generate_map_with_cliff → Researcher::slide → hazard::resolve,
//! and instrument site checks against real layouts.

use frostlake_logic::config::LakeConfig;
use frostlake_logic::generation::generate_map_with_cliff;
use frostlake_logic::grid::{CliffSide, Direction, Grid, Position};
use frostlake_logic::hazard::Resolution;
use frostlake_logic::instrument::{use_instrument, Readings};
use frostlake_logic::item::{
    EquipmentKind, EquipmentStore, GearKind, HazardKind, InstrumentKind, Item, Owner,
};
use frostlake_logic::researcher::Researcher;
use frostlake_logic::LakeError;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Helpers ────────────────────────────────────────────────────────────

const CLIMBING: EquipmentKind = EquipmentKind::Gear(GearKind::Climbing);

struct Fixed;

impl Readings for Fixed {
    fn camera_started(&mut self, _odds: (u32, u32)) -> bool {
        false
    }
    fn sample_weight(&mut self) -> u32 {
        5
    }
    fn temperature(&mut self) -> i32 {
        -12
    }
    fn wind_speed(&mut self) -> u32 {
        17
    }
}

/// Left-cliff lake plus the first interior row whose cell next to the cliff is free.
fn left_cliff_lake(seed: u64) -> (Grid, usize) {
    let config = LakeConfig::default();
    let mut rng = StdRng::seed_from_u64(seed);
    let grid = generate_map_with_cliff(&config, CliffSide::Left, &mut rng).unwrap();
    let row = (1..=8)
        .find(|&r| {
            let p = Position::new(r, 1);
            grid.item_at(p).is_none() && grid.occupant_at(p).is_none()
        })
        .expect("some row has a free cell beside the cliff");
    (grid, row)
}

// ── Cliff scenarios ────────────────────────────────────────────────────

#[test]
fn climbing_gear_neutralizes_left_cliff() {
    for seed in 0..20 {
        let (mut grid, row) = left_cliff_lake(seed);
        let cliff = Position::new(row, 0);
        let mut store = EquipmentStore::with_pool(2);
        let mut researcher = Researcher::new(1, 3).unwrap();
        let climbing = store.find_in_pool(CLIMBING).unwrap();
        researcher.take_from_pool(&mut store, climbing).unwrap();
        grid.place_occupant(Position::new(row, 1), researcher.id())
            .unwrap();

        let report = researcher
            .slide(Direction::Left, &mut grid, &mut store)
            .unwrap();

        assert_eq!(report.to, cliff);
        let encounter = report.encounter.expect("cliff encounter");
        assert_eq!(encounter.hazard, HazardKind::CliffEdge);
        assert_eq!(
            encounter.resolution,
            Resolution::Neutralized {
                gear: climbing,
                kind: GearKind::Climbing
            }
        );
        assert!(researcher.is_alive());
        assert!(researcher.bag().is_empty());
        assert_eq!(grid.item_at(cliff), Some(Item::Equipment(climbing)));
        assert_eq!(store.owner(climbing), Some(Owner::Ground(cliff)));
    }
}

#[test]
fn empty_bag_at_left_cliff_is_fatal() {
    for seed in 0..20 {
        let (mut grid, row) = left_cliff_lake(seed);
        let cliff = Position::new(row, 0);
        let mut store = EquipmentStore::with_pool(2);
        let mut researcher = Researcher::new(1, 3).unwrap();
        grid.place_occupant(Position::new(row, 1), researcher.id())
            .unwrap();

        let report = researcher
            .slide(Direction::Left, &mut grid, &mut store)
            .unwrap();

        assert_eq!(
            report.encounter.map(|e| e.resolution),
            Some(Resolution::Killed)
        );
        assert!(!researcher.is_alive());
        assert_eq!(
            grid.item_at(cliff),
            Some(Item::Hazard(HazardKind::CliffEdge))
        );
    }
}

// ── Blocked moves ──────────────────────────────────────────────────────

#[test]
fn blocked_first_step_is_bit_for_bit_noop() {
    let config = LakeConfig::default();
    for seed in 0..30 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = generate_map_with_cliff(&config, CliffSide::Right, &mut rng).unwrap();
        let mut store = EquipmentStore::with_pool(2);
        let mut researcher = Researcher::new(1, 3).unwrap();
        grid.place_occupant(grid.entry_cell(), researcher.id())
            .unwrap();
        let before = grid.clone();

        // The entrance sits directly above the entry cell.
        let err = researcher
            .slide(Direction::Up, &mut grid, &mut store)
            .unwrap_err();
        assert!(matches!(err, LakeError::UnavailableDirection));
        assert_eq!(grid, before);
    }
}

// ── Instruments ────────────────────────────────────────────────────────

#[test]
fn temperature_detector_beside_ice_block_stays_in_bag() {
    let config = LakeConfig::default();
    let mut rng = StdRng::seed_from_u64(4);
    let mut grid = generate_map_with_cliff(&config, CliffSide::Bottom, &mut rng).unwrap();
    // Row 8 always holds a block at column 4 with a bottom cliff, and the
    // cell beside it touches the cliff, so no hazard is ever placed there.
    let spot = Position::new(8, 3);
    assert_eq!(
        grid.hazard_at(Position::new(8, 4)),
        Some(HazardKind::IceBlock)
    );
    assert_eq!(grid.item_at(spot), None);

    let mut store = EquipmentStore::with_pool(2);
    let mut researcher = Researcher::new(1, 3).unwrap();
    let detector = store
        .find_in_pool(EquipmentKind::Instrument(
            InstrumentKind::TemperatureDetector,
        ))
        .unwrap();
    researcher.take_from_pool(&mut store, detector).unwrap();
    grid.place_occupant(spot, researcher.id()).unwrap();
    let before = grid.clone();

    let err = use_instrument(
        &mut researcher,
        InstrumentKind::TemperatureDetector,
        &mut grid,
        &mut store,
        &mut Fixed,
        config.camera_odds,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        LakeError::IncompatibleLocation(InstrumentKind::TemperatureDetector)
    ));
    assert!(err.is_recoverable());
    assert_eq!(researcher.bag().len(), 1);
    assert_eq!(store.owner(detector), Some(Owner::Bag(researcher.id())));
    assert_eq!(grid, before);
}
