pub mod config;
pub mod error;

pub use config::{LaneConfig, MovementConfig};
pub use error::{Result, TacticsError};
