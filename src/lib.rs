//! Hex Tactics - hex-grid movement and deployment rules for tactical battles

pub mod battle;
pub mod core;
