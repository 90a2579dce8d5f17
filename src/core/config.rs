//! Movement configuration with documented defaults
//!
//! Configuration is always passed explicitly. The convenience entry points
//! (`find_path`, `classify_lane`) use `MovementConfig::default()`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::battle::constants::{
    BASE_MOVE_COST, DEFAULT_ZOC_COST, DISENGAGE_ABILITY, LANE_CENTER_HALF_WIDTH,
    REFERENCE_BOARD_WIDTH,
};
use crate::core::error::{Result, TacticsError};

/// Lane partition parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// Board width (in columns) the center half-width was tuned for
    pub reference_width: u32,

    /// Hexes with |q| <= this value are Center on the reference board
    pub center_half_width: i32,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            reference_width: REFERENCE_BOARD_WIDTH,
            center_half_width: LANE_CENTER_HALF_WIDTH,
        }
    }
}

impl LaneConfig {
    /// Center half-width scaled to the given board width.
    ///
    /// On the reference width this is exactly `center_half_width`, as it is
    /// for an unset (zero) reference width.
    pub fn center_half_width_for(&self, board_width: u32) -> i32 {
        if board_width == self.reference_width || self.reference_width == 0 {
            return self.center_half_width;
        }
        let scaled =
            i64::from(self.center_half_width) * i64::from(board_width) / i64::from(self.reference_width);
        scaled.clamp(0, i64::from(i32::MAX)) as i32
    }
}

/// Configuration for movement cost and legality rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Cost of a single step onto plain ground.
    ///
    /// Also the heuristic multiplier, so every edge is floored at this value.
    pub base_move_cost: f32,

    /// Zone-of-Control penalty for entering a hex adjacent to an enemy,
    /// used when the moving unit carries no override
    pub default_zoc_cost: f32,

    /// Ability name that lets an engaged unit leave its hex
    pub disengage_ability: String,

    pub lanes: LaneConfig,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            base_move_cost: BASE_MOVE_COST,
            default_zoc_cost: DEFAULT_ZOC_COST,
            disengage_ability: DISENGAGE_ABILITY.to_string(),
            lanes: LaneConfig::default(),
        }
    }
}

impl MovementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a config from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: MovementConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!("Loaded movement config from {:?}", path);
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.base_move_cost.is_finite() && self.base_move_cost > 0.0) {
            return Err(TacticsError::InvalidConfig(format!(
                "base_move_cost must be positive and finite, got {}",
                self.base_move_cost
            )));
        }

        if !(self.default_zoc_cost.is_finite() && self.default_zoc_cost >= 0.0) {
            return Err(TacticsError::InvalidConfig(format!(
                "default_zoc_cost must be non-negative and finite, got {}",
                self.default_zoc_cost
            )));
        }

        if self.disengage_ability.trim().is_empty() {
            return Err(TacticsError::InvalidConfig(
                "disengage_ability must not be empty".into(),
            ));
        }

        if self.lanes.reference_width == 0 {
            return Err(TacticsError::InvalidConfig(
                "lanes.reference_width must be at least 1".into(),
            ));
        }

        if self.lanes.center_half_width < 0 {
            return Err(TacticsError::InvalidConfig(format!(
                "lanes.center_half_width must be non-negative, got {}",
                self.lanes.center_half_width
            )));
        }

        Ok(())
    }
}
