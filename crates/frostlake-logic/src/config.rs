//! Lake configuration: grid size, hazard counts and pool composition.
//!
//! A `LakeConfig` is fixed for the lifetime of a session. The default is the
//! 13×10 reference lake; harnesses can load variants from JSON.
//!
//! ```
//! use frostlake_logic::config::{validate_config, LakeConfig};
//!
//! let config = LakeConfig::default();
//! assert!(validate_config(&config).is_empty());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;
use crate::error::LakeError;

/// Smallest grid that still has distinct special ice-block rows.
const MIN_ROWS: usize = 8;
const MIN_COLUMNS: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LakeConfig {
    pub columns: usize,
    pub rows: usize,
    pub holes: usize,
    pub spikes: usize,
    pub bag_capacity: usize,
    /// Copies of each of the seven equipment kinds in the shared pool.
    pub pool_copies_per_kind: usize,
    /// Researcher counts a session draws from, uniformly.
    pub researcher_counts: Vec<u32>,
    pub entrance_guard_rows: usize,
    pub entrance_guard_half_width: usize,
    /// Camera recording odds as (successes, out of).
    pub camera_odds: (u32, u32),
}

impl Default for LakeConfig {
    fn default() -> Self {
        Self {
            columns: constants::COLUMNS,
            rows: constants::ROWS,
            holes: constants::NUM_HOLES,
            spikes: constants::NUM_SPIKES,
            bag_capacity: constants::BAG_CAPACITY,
            pool_copies_per_kind: constants::POOL_COPIES_PER_KIND,
            researcher_counts: constants::RESEARCHER_COUNTS.to_vec(),
            entrance_guard_rows: constants::ENTRANCE_GUARD_ROWS,
            entrance_guard_half_width: constants::ENTRANCE_GUARD_HALF_WIDTH,
            camera_odds: (constants::CAMERA_SUCCESS_NUM, constants::CAMERA_SUCCESS_DEN),
        }
    }
}

impl LakeConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, LakeError> {
        let config: LakeConfig = serde_json::from_str(json)?;
        config.validated()
    }

    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LakeError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Consume the config, returning it only if [`validate_config`] passes.
    pub fn validated(self) -> Result<Self, LakeError> {
        let errors = validate_config(&self);
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(LakeError::InvalidConfig(errors))
        }
    }

    /// Column of the entrance on row 0.
    pub fn entrance_column(&self) -> usize {
        self.columns / 2
    }

    /// Row where the middle ice block prefers the entrance column.
    pub fn middle_row(&self) -> usize {
        self.rows - 4
    }

    /// First interior row where a cliff-adjacent ice block may be forced.
    pub fn cliff_row(&self) -> usize {
        self.rows - 3
    }

    /// Last interior row.
    pub fn last_interior_row(&self) -> usize {
        self.rows - 2
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Fewer rows than the ice-block layout needs.
    #[error("grid needs at least {} rows, got {0}", MIN_ROWS)]
    TooFewRows(usize),
    /// Fewer columns than the entrance guard and cliff layout need.
    #[error("grid needs at least {} columns, got {0}", MIN_COLUMNS)]
    TooFewColumns(usize),
    /// Researchers need room for at least one item.
    #[error("bag capacity must be at least 1")]
    ZeroBagCapacity,
    /// The pool must start with every equipment kind.
    #[error("pool must hold at least one copy of each kind")]
    EmptyPool,
    #[error("no researcher counts configured")]
    NoResearcherCounts,
    #[error("researcher count {0} outside 1..=4")]
    InvalidResearcherCount(u32),
    /// Zero denominator or more successes than draws.
    #[error("invalid camera odds {0}/{1}")]
    InvalidCameraOdds(u32, u32),
}

/// Validate a lake configuration, returning all errors found.
pub fn validate_config(config: &LakeConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.rows < MIN_ROWS {
        errors.push(ConfigError::TooFewRows(config.rows));
    }
    if config.columns < MIN_COLUMNS {
        errors.push(ConfigError::TooFewColumns(config.columns));
    }
    if config.bag_capacity == 0 {
        errors.push(ConfigError::ZeroBagCapacity);
    }
    if config.pool_copies_per_kind == 0 {
        errors.push(ConfigError::EmptyPool);
    }
    if config.researcher_counts.is_empty() {
        errors.push(ConfigError::NoResearcherCounts);
    }
    for &n in &config.researcher_counts {
        if !(1..=4).contains(&n) {
            errors.push(ConfigError::InvalidResearcherCount(n));
        }
    }
    let (num, den) = config.camera_odds;
    if den == 0 || num > den {
        errors.push(ConfigError::InvalidCameraOdds(num, den));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&LakeConfig::default()).is_empty());
    }

    #[test]
    fn reference_special_rows() {
        let config = LakeConfig::default();
        assert_eq!(config.entrance_column(), 6);
        assert_eq!(config.middle_row(), 6);
        assert_eq!(config.cliff_row(), 7);
        assert_eq!(config.last_interior_row(), 8);
    }

    #[test]
    fn small_grid_rejected() {
        let config = LakeConfig {
            rows: 5,
            columns: 4,
            ..LakeConfig::default()
        };
        let errors = validate_config(&config);
        assert!(errors.contains(&ConfigError::TooFewRows(5)));
        assert!(errors.contains(&ConfigError::TooFewColumns(4)));
    }

    #[test]
    fn researcher_counts_checked() {
        let mut config = LakeConfig::default();
        config.researcher_counts = vec![];
        assert!(validate_config(&config).contains(&ConfigError::NoResearcherCounts));
        config.researcher_counts = vec![2, 7];
        assert!(validate_config(&config).contains(&ConfigError::InvalidResearcherCount(7)));
    }

    #[test]
    fn camera_odds_checked() {
        let mut config = LakeConfig::default();
        config.camera_odds = (3, 0);
        assert!(validate_config(&config).contains(&ConfigError::InvalidCameraOdds(3, 0)));
    }

    #[test]
    fn json_fills_missing_fields() {
        let config = LakeConfig::from_json_str(r#"{ "holes": 5 }"#).unwrap();
        assert_eq!(config.holes, 5);
        assert_eq!(config.columns, 13);
        assert_eq!(config.researcher_counts, vec![2, 3, 4]);
    }

    #[test]
    fn json_invalid_config_is_error() {
        let err = LakeConfig::from_json_str(r#"{ "rows": 3 }"#).unwrap_err();
        assert!(matches!(
            err,
            LakeError::InvalidConfig(ref e) if e.contains(&ConfigError::TooFewRows(3))
        ));
    }

    #[test]
    fn config_errors_display_their_limits() {
        assert_eq!(
            ConfigError::TooFewRows(5).to_string(),
            "grid needs at least 8 rows, got 5"
        );
        assert_eq!(
            ConfigError::InvalidCameraOdds(3, 0).to_string(),
            "invalid camera odds 3/0"
        );
        let err = LakeError::InvalidConfig(vec![
            ConfigError::ZeroBagCapacity,
            ConfigError::NoResearcherCounts,
        ]);
        assert_eq!(
            err.to_string(),
            "invalid configuration: bag capacity must be at least 1; \
             no researcher counts configured"
        );
    }

    #[test]
    fn json_syntax_error_is_error() {
        assert!(matches!(
            LakeConfig::from_json_str("{ rows"),
            Err(LakeError::Json(_))
        ));
    }
}
