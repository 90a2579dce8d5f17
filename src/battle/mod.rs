//! Tactical movement on a hex battlefield
//!
//! Stateless engine: every call receives a snapshot of zones and units and
//! answers from it alone.
//!
//! - `hex`: axial coordinates, offset conversion, packed keys
//! - `lane`: left/center/right classification
//! - `open_set` + `pathfinding`: A* with zone of control and disengage rules
//! - `deployment`: card placement validation

pub mod battle_map;
pub mod constants;
pub mod deployment;
pub mod engagement;
pub mod hex;
pub mod lane;
pub mod open_set;
pub mod pathfinding;
pub mod scenario;
pub mod terrain;
pub mod units;

// Re-exports for convenient access
pub use battle_map::{board_key, rectangular_board, BattlefieldView, Zone, ZoneOwner, ZoneRow};
pub use constants::*;
pub use deployment::{
    adjacency_synergy, Card, CardCategory, DeploymentError, DeploymentReport, DeploymentRequest,
    DeploymentValidator, FactionRowRestriction, PlacementRule, Resources, TerrainRestriction,
};
pub use engagement::{
    can_disengage, can_disengage_with, engagement_pressure, get_adjacent_enemies, is_engaged,
};
pub use hex::{AxialCoord, HexDirection, HexKey, OffsetCoord};
pub use lane::{classify_lane, cube_distance, Lane};
pub use open_set::{NodeArena, NodeIndex, OpenSet, PathNode};
pub use pathfinding::{
    find_path, find_path_with_config, find_paths, find_route, path_cost, reachable,
    FactionModifierFn, PathQuery, ReachableHex, Route, TerrainCostFn,
};
pub use scenario::{ResolvedScenario, Scenario};
pub use terrain::Terrain;
pub use units::{PlayerId, Unit, UnitId};
