//! Research instruments: site checks, measurements, placement.
//!
//! An instrument is used on the researcher's current cell. The cell must be
//! free of items and satisfy the instrument's own rule:
//!
//! | Instrument           | Site rule                                          |
//! |----------------------|----------------------------------------------------|
//! | Camera               | first hazard toward the cliff side is a cliff edge |
//! | Chisel               | next to an ice block (8 directions)                |
//! | Temperature detector | not on the border, not next to an ice block        |
//! | Wind speed meter     | no hazard on the cell                              |
//!
//! On success the instrument leaves the bag and stays on the cell for good.
//! Measurements are flavor text supplied by a [`Readings`] hook.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::LakeError;
use crate::grid::{Grid, Position};
use crate::item::{
    EquipmentId, EquipmentKind, EquipmentStore, HazardKind, InstrumentKind, Item, Owner,
};
use crate::researcher::Researcher;

/// Source of the cosmetic values reported by instruments.
pub trait Readings {
    /// Whether the camera starts recording, given (successes, out of) odds.
    fn camera_started(&mut self, odds: (u32, u32)) -> bool;
    /// Ice sample weight in grams.
    fn sample_weight(&mut self) -> u32;
    /// Temperature in °C.
    fn temperature(&mut self) -> i32;
    /// Wind speed in m/s.
    fn wind_speed(&mut self) -> u32;
}

/// Draws readings from a random source.
pub struct RngReadings<'a, R: Rng + ?Sized>(pub &'a mut R);

impl<R: Rng + ?Sized> Readings for RngReadings<'_, R> {
    fn camera_started(&mut self, (num, den): (u32, u32)) -> bool {
        den > 0 && num <= den && self.0.gen_ratio(num, den)
    }

    fn sample_weight(&mut self) -> u32 {
        self.0.gen_range(0..=20)
    }

    fn temperature(&mut self) -> i32 {
        self.0.gen_range(-30..=0)
    }

    fn wind_speed(&mut self) -> u32 {
        self.0.gen_range(0..=30)
    }
}

/// A successful instrument use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentUse {
    pub instrument: InstrumentKind,
    pub equipment: EquipmentId,
    pub at: Position,
    /// Result line shown against the matching goal.
    pub message: String,
}

/// Check whether `kind` may be used at `pos`.
pub fn check_site(kind: InstrumentKind, grid: &Grid, pos: Position) -> Result<(), LakeError> {
    let cell = grid.cell(pos).ok_or(LakeError::Grid {
        at: pos,
        reason: "position outside the grid",
    })?;

    let ok = !cell.has_item()
        && match kind {
            InstrumentKind::Camera => camera_faces_cliff(grid, pos),
            InstrumentKind::Chisel => grid.is_next_to_ice_block(pos),
            InstrumentKind::TemperatureDetector => {
                !grid.is_border(pos) && !grid.is_next_to_ice_block(pos)
            }
            InstrumentKind::WindSpeedMeter => cell.hazard().is_none(),
        };

    if ok {
        Ok(())
    } else {
        Err(LakeError::IncompatibleLocation(kind))
    }
}

/// Scan from `pos` toward the cliff side; the first hazard seen must be the cliff.
fn camera_faces_cliff(grid: &Grid, pos: Position) -> bool {
    let Some(side) = grid.cliff_side() else {
        return false;
    };
    let dir = side.facing();
    let mut current = Some(pos);
    while let Some(p) = current {
        if let Some(h) = grid.hazard_at(p) {
            return h == HazardKind::CliffEdge;
        }
        current = grid.step(p, dir);
    }
    false
}

fn reading_message<D: Readings + ?Sized>(
    kind: InstrumentKind,
    readings: &mut D,
    camera_odds: (u32, u32),
) -> String {
    match kind {
        InstrumentKind::Camera => {
            let text = if readings.camera_started(camera_odds) {
                "The camera start recording."
            } else {
                "The camera failed to start recording."
            };
            format!("{}: {}", kind.goal_text(), text)
        }
        InstrumentKind::Chisel => {
            format!("{}: {} gr", kind.goal_text(), readings.sample_weight())
        }
        InstrumentKind::TemperatureDetector => {
            format!("Measured temperature: {} °C", readings.temperature())
        }
        InstrumentKind::WindSpeedMeter => {
            format!("{}: {} m/s", kind.goal_text(), readings.wind_speed())
        }
    }
}

/// Use one held instrument of `kind` where `researcher` stands.
///
/// Preconditions are checked in order (holds any instrument, holds this
/// kind, site is compatible) and nothing changes unless all pass.
pub fn use_instrument<D: Readings + ?Sized>(
    researcher: &mut Researcher,
    kind: InstrumentKind,
    grid: &mut Grid,
    store: &mut EquipmentStore,
    readings: &mut D,
    camera_odds: (u32, u32),
) -> Result<InstrumentUse, LakeError> {
    if !researcher.bag().has_instrument() {
        return Err(LakeError::NoResearchInstrument);
    }
    let entry = researcher
        .bag()
        .find_kind(EquipmentKind::Instrument(kind))
        .ok_or(LakeError::NotHeld(EquipmentKind::Instrument(kind)))?;
    let at = grid.find_occupant(researcher.id()).ok_or(LakeError::Grid {
        at: grid.entry_cell(),
        reason: "researcher is not on the grid",
    })?;
    check_site(kind, grid, at)?;

    grid.place_item(at, Item::Equipment(entry.id))?;
    researcher.bag_mut().remove(entry.id);
    store.set_owner(entry.id, Owner::Ground(at));
    let message = reading_message(kind, readings, camera_odds);
    log::info!("{} placed {} at {}", researcher.id(), kind, at);

    Ok(InstrumentUse {
        instrument: kind,
        equipment: entry.id,
        at,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CliffSide;
    use crate::item::GearKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixed;

    impl Readings for Fixed {
        fn camera_started(&mut self, _: (u32, u32)) -> bool {
            true
        }
        fn sample_weight(&mut self) -> u32 {
            12
        }
        fn temperature(&mut self) -> i32 {
            -7
        }
        fn wind_speed(&mut self) -> u32 {
            4
        }
    }

    /// 9x7 lake with walls everywhere except a right-hand cliff.
    fn lake() -> Grid {
        let mut grid = Grid::new(9, 7);
        for row in 0..7 {
            for col in 0..9 {
                let p = Position::new(row, col);
                if !grid.is_border(p) {
                    continue;
                }
                let corner = (row == 0 || row == 6) && (col == 0 || col == 8);
                let item = if col == 8 && !corner {
                    Item::Hazard(HazardKind::CliffEdge)
                } else {
                    Item::Wall
                };
                grid.place_item(p, item).unwrap();
            }
        }
        grid.set_cliff_side(CliffSide::Right);
        grid
    }

    fn holding(kind: InstrumentKind, store: &mut EquipmentStore) -> Researcher {
        let mut r = Researcher::new(1, 3).unwrap();
        let id = store.find_in_pool(EquipmentKind::Instrument(kind)).unwrap();
        r.take_from_pool(store, id).unwrap();
        r
    }

    #[test]
    fn temperature_next_to_ice_block_is_rejected_without_mutation() {
        let mut grid = lake();
        grid.place_item(Position::new(3, 4), Item::Hazard(HazardKind::IceBlock))
            .unwrap();
        let mut store = EquipmentStore::with_pool(2);
        let mut r = holding(InstrumentKind::TemperatureDetector, &mut store);
        grid.place_occupant(Position::new(2, 3), r.id()).unwrap();
        let before = grid.clone();

        let err = use_instrument(
            &mut r,
            InstrumentKind::TemperatureDetector,
            &mut grid,
            &mut store,
            &mut Fixed,
            (8, 11),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LakeError::IncompatibleLocation(InstrumentKind::TemperatureDetector)
        ));
        assert_eq!(r.bag().len(), 1);
        assert_eq!(grid, before);
    }

    #[test]
    fn temperature_in_open_ice_is_placed() {
        let mut grid = lake();
        let mut store = EquipmentStore::with_pool(2);
        let mut r = holding(InstrumentKind::TemperatureDetector, &mut store);
        let at = Position::new(3, 3);
        grid.place_occupant(at, r.id()).unwrap();

        let used = use_instrument(
            &mut r,
            InstrumentKind::TemperatureDetector,
            &mut grid,
            &mut store,
            &mut Fixed,
            (8, 11),
        )
        .unwrap();
        assert_eq!(used.message, "Measured temperature: -7 °C");
        assert!(r.bag().is_empty());
        assert_eq!(grid.item_at(at), Some(Item::Equipment(used.equipment)));
        assert_eq!(store.owner(used.equipment), Some(Owner::Ground(at)));
    }

    #[test]
    fn camera_needs_clear_view_of_cliff() {
        let mut grid = lake();
        assert!(check_site(InstrumentKind::Camera, &grid, Position::new(2, 2)).is_ok());

        grid.place_item(Position::new(2, 5), Item::Hazard(HazardKind::Hole))
            .unwrap();
        assert!(check_site(InstrumentKind::Camera, &grid, Position::new(2, 2)).is_err());
        // Ground equipment is not a hazard and does not block the view.
        grid.place_item(Position::new(3, 5), Item::Equipment(EquipmentId(0)))
            .unwrap();
        assert!(check_site(InstrumentKind::Camera, &grid, Position::new(3, 2)).is_ok());
    }

    #[test]
    fn camera_without_cliff_side_is_incompatible() {
        let grid = Grid::new(9, 7);
        assert!(check_site(InstrumentKind::Camera, &grid, Position::new(3, 3)).is_err());
    }

    #[test]
    fn chisel_needs_neighbouring_ice_block() {
        let mut grid = lake();
        let p = Position::new(3, 3);
        assert!(check_site(InstrumentKind::Chisel, &grid, p).is_err());
        grid.place_item(Position::new(4, 4), Item::Hazard(HazardKind::IceBlock))
            .unwrap();
        assert!(check_site(InstrumentKind::Chisel, &grid, p).is_ok());
    }

    #[test]
    fn occupied_item_slot_rejects_every_instrument() {
        let mut grid = lake();
        let p = Position::new(3, 3);
        grid.place_item(p, Item::Equipment(EquipmentId(1))).unwrap();
        for kind in InstrumentKind::ALL {
            assert!(check_site(kind, &grid, p).is_err());
        }
    }

    #[test]
    fn gear_bag_has_no_instrument() {
        let mut grid = lake();
        let mut store = EquipmentStore::with_pool(2);
        let mut r = Researcher::new(1, 3).unwrap();
        let helmet = store
            .find_in_pool(EquipmentKind::Gear(GearKind::Helmet))
            .unwrap();
        r.take_from_pool(&mut store, helmet).unwrap();
        grid.place_occupant(Position::new(3, 3), r.id()).unwrap();

        let err = use_instrument(
            &mut r,
            InstrumentKind::WindSpeedMeter,
            &mut grid,
            &mut store,
            &mut Fixed,
            (8, 11),
        )
        .unwrap_err();
        assert!(matches!(err, LakeError::NoResearchInstrument));
    }

    #[test]
    fn instrument_not_held() {
        let mut grid = lake();
        let mut store = EquipmentStore::with_pool(2);
        let mut r = holding(InstrumentKind::Chisel, &mut store);
        grid.place_occupant(Position::new(3, 3), r.id()).unwrap();
        let err = use_instrument(
            &mut r,
            InstrumentKind::Camera,
            &mut grid,
            &mut store,
            &mut Fixed,
            (8, 11),
        )
        .unwrap_err();
        assert!(matches!(err, LakeError::NotHeld(_)));
        assert_eq!(r.bag().len(), 1);
    }

    #[test]
    fn rng_readings_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut readings = RngReadings(&mut rng);
        for _ in 0..200 {
            assert!(readings.sample_weight() <= 20);
            assert!((-30..=0).contains(&readings.temperature()));
            assert!(readings.wind_speed() <= 30);
        }
        assert!(readings.camera_started((1, 1)));
        assert!(!readings.camera_started((0, 1)));
    }
}
