//! Item taxonomy and the equipment arena.
//!
//! Every cell holds at most one [`Item`]. Terrain and hazards are plain
//! values; equipment lives in an [`EquipmentStore`] and cells refer to it by
//! [`EquipmentId`]. Each piece of equipment has exactly one [`Owner`] at any
//! time: the shared pool, one researcher's bag, or one grid cell.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{codes, map_codes};
use crate::grid::Position;
use crate::researcher::ResearcherId;

/// Hazards found on the lake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HazardKind {
    Hole,
    IceBlock,
    IceSpike,
    CliffEdge,
}

impl HazardKind {
    /// Gear that neutralizes this hazard. Ice blocks only block movement.
    pub fn counter(self) -> Option<GearKind> {
        match self {
            HazardKind::Hole => Some(GearKind::WoodenBoard),
            HazardKind::IceSpike => Some(GearKind::Helmet),
            HazardKind::CliffEdge => Some(GearKind::Climbing),
            HazardKind::IceBlock => None,
        }
    }

    pub fn map_code(self) -> &'static str {
        match self {
            HazardKind::Hole => map_codes::HOLE,
            HazardKind::IceBlock => map_codes::ICE_BLOCK,
            HazardKind::IceSpike => map_codes::ICE_SPIKE,
            HazardKind::CliffEdge => map_codes::CLIFF_EDGE,
        }
    }
}

/// Consumable gear that neutralizes exactly one hazard kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GearKind {
    Climbing,
    WoodenBoard,
    Helmet,
}

impl GearKind {
    pub fn neutralizes(self) -> HazardKind {
        match self {
            GearKind::Climbing => HazardKind::CliffEdge,
            GearKind::WoodenBoard => HazardKind::Hole,
            GearKind::Helmet => HazardKind::IceSpike,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GearKind::Climbing => "Climbing equipment",
            GearKind::WoodenBoard => "Large wooden board",
            GearKind::Helmet => "Protective helmet",
        }
    }
}

/// Research instruments. Each one satisfies the goal of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InstrumentKind {
    Camera,
    Chisel,
    TemperatureDetector,
    WindSpeedMeter,
}

impl InstrumentKind {
    pub const ALL: [InstrumentKind; 4] = [
        InstrumentKind::Camera,
        InstrumentKind::Chisel,
        InstrumentKind::TemperatureDetector,
        InstrumentKind::WindSpeedMeter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InstrumentKind::Camera => "Camera",
            InstrumentKind::Chisel => "Chiseling equipment",
            InstrumentKind::TemperatureDetector => "Temperature detector",
            InstrumentKind::WindSpeedMeter => "Wind speed detector",
        }
    }

    /// Title of the research goal this instrument satisfies.
    pub fn goal_text(self) -> &'static str {
        match self {
            InstrumentKind::Camera => "Camera Placement",
            InstrumentKind::Chisel => "Glacial Sampling",
            InstrumentKind::TemperatureDetector => "Temperature Measurement",
            InstrumentKind::WindSpeedMeter => "Wind Speed Measurement",
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Equipment super-category. A bag never mixes the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentCategory {
    HazardGear,
    ResearchInstrument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipmentKind {
    Gear(GearKind),
    Instrument(InstrumentKind),
}

impl EquipmentKind {
    /// All seven kinds, in prompt order.
    pub const ALL: [EquipmentKind; 7] = [
        EquipmentKind::Instrument(InstrumentKind::TemperatureDetector),
        EquipmentKind::Instrument(InstrumentKind::WindSpeedMeter),
        EquipmentKind::Instrument(InstrumentKind::Camera),
        EquipmentKind::Instrument(InstrumentKind::Chisel),
        EquipmentKind::Gear(GearKind::Climbing),
        EquipmentKind::Gear(GearKind::WoodenBoard),
        EquipmentKind::Gear(GearKind::Helmet),
    ];

    pub fn category(self) -> EquipmentCategory {
        match self {
            EquipmentKind::Gear(_) => EquipmentCategory::HazardGear,
            EquipmentKind::Instrument(_) => EquipmentCategory::ResearchInstrument,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            EquipmentKind::Instrument(InstrumentKind::TemperatureDetector) => {
                codes::TEMPERATURE_DETECTOR
            }
            EquipmentKind::Instrument(InstrumentKind::WindSpeedMeter) => codes::WIND_SPEED_METER,
            EquipmentKind::Instrument(InstrumentKind::Camera) => codes::CAMERA,
            EquipmentKind::Instrument(InstrumentKind::Chisel) => codes::CHISEL,
            EquipmentKind::Gear(GearKind::Climbing) => codes::CLIMBING,
            EquipmentKind::Gear(GearKind::WoodenBoard) => codes::WOODEN_BOARD,
            EquipmentKind::Gear(GearKind::Helmet) => codes::HELMET,
        }
    }

    /// Look up a short code. `"no"` and unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            EquipmentKind::Gear(g) => g.name(),
            EquipmentKind::Instrument(i) => i.name(),
        }
    }

    pub fn as_instrument(self) -> Option<InstrumentKind> {
        match self {
            EquipmentKind::Instrument(i) => Some(i),
            EquipmentKind::Gear(_) => None,
        }
    }

    pub fn as_gear(self) -> Option<GearKind> {
        match self {
            EquipmentKind::Gear(g) => Some(g),
            EquipmentKind::Instrument(_) => None,
        }
    }
}

/// Index of a piece of equipment in its [`EquipmentStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EquipmentId(pub u32);

/// Where a piece of equipment currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Pool,
    Bag(ResearcherId),
    /// Placed on the grid. Terminal.
    Ground(Position),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub kind: EquipmentKind,
    pub owner: Owner,
}

/// What a cell can hold besides its occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Item {
    /// Impassable boundary.
    Wall,
    /// Impassable, one per grid.
    Entrance,
    Hazard(HazardKind),
    /// Equipment left on the ice; does not block, but ends a slide.
    Equipment(EquipmentId),
}

impl Item {
    pub fn hazard(self) -> Option<HazardKind> {
        match self {
            Item::Hazard(h) => Some(h),
            _ => None,
        }
    }

    /// Whether the first step of a slide may not land here.
    pub fn blocks_entry(self) -> bool {
        matches!(
            self,
            Item::Wall | Item::Entrance | Item::Hazard(HazardKind::IceBlock)
        )
    }
}

/// Arena of every piece of equipment in a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentStore {
    items: Vec<Equipment>,
}

impl EquipmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose pool holds `copies` of every equipment kind.
    pub fn with_pool(copies: usize) -> Self {
        let mut store = Self::new();
        for kind in EquipmentKind::ALL {
            for _ in 0..copies {
                store.add(kind, Owner::Pool);
            }
        }
        store
    }

    pub fn add(&mut self, kind: EquipmentKind, owner: Owner) -> EquipmentId {
        let id = EquipmentId(self.items.len() as u32);
        self.items.push(Equipment { id, kind, owner });
        id
    }

    pub fn get(&self, id: EquipmentId) -> Option<&Equipment> {
        self.items.get(id.0 as usize)
    }

    pub fn kind(&self, id: EquipmentId) -> Option<EquipmentKind> {
        self.get(id).map(|e| e.kind)
    }

    pub fn owner(&self, id: EquipmentId) -> Option<Owner> {
        self.get(id).map(|e| e.owner)
    }

    pub(crate) fn set_owner(&mut self, id: EquipmentId, owner: Owner) {
        if let Some(e) = self.items.get_mut(id.0 as usize) {
            e.owner = owner;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Equipment> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First pooled piece of the given kind, without moving it.
    pub fn find_in_pool(&self, kind: EquipmentKind) -> Option<EquipmentId> {
        self.items
            .iter()
            .find(|e| e.kind == kind && e.owner == Owner::Pool)
            .map(|e| e.id)
    }

    pub fn pool_count(&self, kind: EquipmentKind) -> usize {
        self.items
            .iter()
            .filter(|e| e.kind == kind && e.owner == Owner::Pool)
            .count()
    }

    /// Pooled counts for every kind still available.
    pub fn pool_counts(&self) -> BTreeMap<EquipmentKind, usize> {
        let mut counts = BTreeMap::new();
        for e in self.items.iter().filter(|e| e.owner == Owner::Pool) {
            *counts.entry(e.kind).or_insert(0) += 1;
        }
        counts
    }
}
