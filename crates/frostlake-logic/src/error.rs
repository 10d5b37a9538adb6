//! Error type shared by every fallible lake operation.
//!
//! Variants listed in [`LakeError::is_recoverable`] are player mistakes: the
//! operation that returned them left the grid, bags, pool and goals untouched.
//! The rest signal bad setup or a broken invariant.

use thiserror::Error;

use crate::config::ConfigError;
use crate::grid::Position;
use crate::item::{EquipmentCategory, EquipmentId, EquipmentKind, InstrumentKind};
use crate::session::Phase;

#[derive(Debug, Error)]
pub enum LakeError {
    /// The first step of a slide is blocked or out of bounds.
    #[error("cannot move in that direction")]
    UnavailableDirection,

    #[error("cannot carry more than {capacity} pieces of equipment")]
    BagFull { capacity: usize },

    #[error("cannot carry {offered:?} equipment in a bag of {held:?} equipment")]
    MixedCategory {
        held: EquipmentCategory,
        offered: EquipmentCategory,
    },

    #[error("researchers cannot head to the lake with an empty bag")]
    EmptyBag,

    #[error("{0} is incompatible with the current location")]
    IncompatibleLocation(InstrumentKind),

    #[error("researcher has no research instrument")]
    NoResearchInstrument,

    #[error("researcher is not holding equipment with code {}", .0.code())]
    NotHeld(EquipmentKind),

    #[error("there is no more {} left in the equipment storage", .0.code())]
    PoolExhausted(EquipmentKind),

    #[error("action not allowed during {0:?}")]
    WrongPhase(Phase),

    #[error("the first action in the lake must be a move")]
    MustMoveFirst,

    #[error("no equipment with id {0:?}")]
    UnknownEquipment(EquipmentId),

    #[error("researcher id must be greater than zero")]
    InvalidResearcherId,

    /// A cell already holds an item, or a position is off the grid.
    #[error("grid error at {at}: {reason}")]
    Grid { at: Position, reason: &'static str },

    #[error("invalid configuration: {}", join_config_errors(.0))]
    InvalidConfig(Vec<ConfigError>),

    #[error("action budget of {0} exhausted before the session finished")]
    ActionBudgetExhausted(usize),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LakeError {
    /// Whether the caller may retry with different input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LakeError::UnavailableDirection
                | LakeError::BagFull { .. }
                | LakeError::MixedCategory { .. }
                | LakeError::EmptyBag
                | LakeError::IncompatibleLocation(_)
                | LakeError::NoResearchInstrument
                | LakeError::NotHeld(_)
                | LakeError::PoolExhausted(_)
                | LakeError::MustMoveFirst
        )
    }
}

fn join_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
