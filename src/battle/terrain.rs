//! Battlefield terrain types and their movement effects

use serde::{Deserialize, Serialize};

/// Terrain designation carried by a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    #[default]
    Plains,
    Forest,
    Hills,
    Swamp,
    Ruins,
    Chasm, // Impassable
}

impl Terrain {
    /// Cost added on top of the base step cost when entering this terrain
    pub fn extra_move_cost(&self) -> f32 {
        match self {
            Terrain::Plains => 0.0,
            Terrain::Forest => 1.0,
            Terrain::Hills => 1.0,
            Terrain::Swamp => 2.0,
            Terrain::Ruins => 0.5,
            Terrain::Chasm => f32::INFINITY,
        }
    }

    pub fn is_impassable(&self) -> bool {
        self.extra_move_cost().is_infinite()
    }
}
