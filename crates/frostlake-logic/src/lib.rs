//! Pure session logic for Frostlake.
//!
//! Researchers cross a generated frozen lake, sliding until something stops
//! them, neutralizing hazards with the right gear and placing research
//! instruments to finish the session's goals. This crate holds all of it
//! with no console I/O: input arrives through [`session::Prompter`] or
//! [`session::Action`] values, output leaves as events and snapshots. All
//! randomness comes from an injected `rand::Rng`.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Lake size, hazard counts, pool composition, validation |
//! | [`constants`] | Reference sizes and equipment short codes |
//! | [`error`] | `LakeError`, shared by every fallible operation |
//! | [`generation`] | Frame, ice-block and hazard placement |
//! | [`goals`] | Outstanding and finished research goals |
//! | [`grid`] | Cells, positions, directions, neighbor queries |
//! | [`hazard`] | Hazard encounters: neutralize with gear or die |
//! | [`instrument`] | Instrument site rules, readings, placement |
//! | [`item`] | Item taxonomy and the equipment arena |
//! | [`movement`] | Slide planning and application |
//! | [`researcher`] | Researchers and their single-category bags |
//! | [`session`] | Phase machine, researcher queue, prompt-driven loop |
//! | [`snapshot`] | Serializable session view for renderers |
//! | [`validation`] | Structural checks for generated lakes |
//!
//! ```
//! use frostlake_logic::config::LakeConfig;
//! use frostlake_logic::session::{Action, Phase, Session};
//!
//! let mut session = Session::with_seed(LakeConfig::default(), 7).unwrap();
//! session.apply(Action::BeginTurn).unwrap();
//! assert_eq!(session.phase(), Phase::Entrance);
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod generation;
pub mod goals;
pub mod grid;
pub mod hazard;
pub mod instrument;
pub mod item;
pub mod movement;
pub mod researcher;
pub mod session;
pub mod snapshot;
pub mod validation;

pub use error::LakeError;
