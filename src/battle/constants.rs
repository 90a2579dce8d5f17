//! Movement constants - all tunable defaults in one place
//!
//! Costs are ADDITIVE on top of the base step cost. No percentage modifiers.

// Movement
pub const BASE_MOVE_COST: f32 = 1.0;
pub const DEFAULT_ZOC_COST: f32 = 1.0;

// Abilities
pub const DISENGAGE_ABILITY: &str = "Disengage";

// Lanes (reference board is 5 columns wide: q in -2..=2 around the center column)
pub const REFERENCE_BOARD_WIDTH: u32 = 5;
pub const LANE_CENTER_HALF_WIDTH: i32 = 1;

// Deployment synergy
pub const SAME_FACTION_SYNERGY: u32 = 1;
pub const SHARED_KEYWORD_SYNERGY: u32 = 1;
