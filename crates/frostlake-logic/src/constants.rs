//! Session constants: reference lake size, counts and equipment short codes.
//!
//! Defaults for [`crate::config::LakeConfig`] live here so that the harness,
//! the tests, and the generator agree on the reference layout.

/// Reference grid width (columns).
pub const COLUMNS: usize = 13;
/// Reference grid height (rows).
pub const ROWS: usize = 10;

/// Holes placed per map.
pub const NUM_HOLES: usize = 3;
/// Ice spikes placed per map.
pub const NUM_SPIKES: usize = 3;

/// Maximum equipment a researcher can carry.
pub const BAG_CAPACITY: usize = 3;
/// Copies of each equipment kind in the shared pool at session start.
pub const POOL_COPIES_PER_KIND: usize = 2;

/// Hazard exclusion box around the entrance: rows `0..ENTRANCE_GUARD_ROWS`.
pub const ENTRANCE_GUARD_ROWS: usize = 3;
/// Hazard exclusion box around the entrance: columns within this distance.
pub const ENTRANCE_GUARD_HALF_WIDTH: usize = 2;

/// Camera recording success odds, `CAMERA_SUCCESS_NUM` in `CAMERA_SUCCESS_DEN`.
pub const CAMERA_SUCCESS_NUM: u32 = 8;
pub const CAMERA_SUCCESS_DEN: u32 = 11;

/// Researcher counts a session may draw from.
pub const RESEARCHER_COUNTS: [u32; 3] = [2, 3, 4];

/// Equipment short codes, as typed at the prompt.
pub mod codes {
    pub const TEMPERATURE_DETECTOR: &str = "td";
    pub const WIND_SPEED_METER: &str = "ws";
    pub const CAMERA: &str = "cm";
    pub const CHISEL: &str = "ch";
    pub const CLIMBING: &str = "cl";
    pub const WOODEN_BOARD: &str = "wb";
    pub const HELMET: &str = "ph";
    /// "Take nothing more" sentinel.
    pub const NONE: &str = "no";

    /// Every code the prompt accepts, sentinel included.
    pub const ALL: [&str; 8] = [
        TEMPERATURE_DETECTOR,
        WIND_SPEED_METER,
        CAMERA,
        CHISEL,
        CLIMBING,
        WOODEN_BOARD,
        HELMET,
        NONE,
    ];
}

/// Short codes used when dumping non-equipment cell items.
pub mod map_codes {
    pub const WALL: &str = "w";
    pub const ENTRANCE: &str = "en";
    pub const CLIFF_EDGE: &str = "ce";
    pub const HOLE: &str = "hi";
    pub const ICE_BLOCK: &str = "ib";
    pub const ICE_SPIKE: &str = "is";
}
