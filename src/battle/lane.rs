//! Lane classification and cube-coordinate helpers
//!
//! The battlefield is split into Left/Center/Right lanes by axial q.
//! Thresholds were tuned for the 5-column reference board; other widths
//! scale the center band proportionally (see `LaneConfig`).

use serde::{Deserialize, Serialize};

use crate::battle::hex::AxialCoord;
use crate::core::config::LaneConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Left,
    Center,
    Right,
}

impl Lane {
    /// Classify with explicit lane parameters
    pub fn classify_with(coord: AxialCoord, board_width: u32, lanes: &LaneConfig) -> Self {
        let half = lanes.center_half_width_for(board_width);
        if coord.q < -half {
            Lane::Left
        } else if coord.q > half {
            Lane::Right
        } else {
            Lane::Center
        }
    }
}

/// Classify a hex into a lane using the default thresholds
/// (q < -1 is Left, q > 1 is Right on the reference board)
pub fn classify_lane(coord: AxialCoord, board_width: u32) -> Lane {
    Lane::classify_with(coord, board_width, &LaneConfig::default())
}

/// Chebyshev distance over cube coordinates
pub fn cube_distance(a: AxialCoord, b: AxialCoord) -> u32 {
    let (ax, ay, az) = a.cube();
    let (bx, by, bz) = b.cube();
    (ax - bx).abs().max((ay - by).abs()).max((az - bz).abs()) as u32
}
