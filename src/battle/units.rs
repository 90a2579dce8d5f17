//! Units as seen by the movement engine
//!
//! A unit occupies at most one zone, referenced by the zone's position key.
//! Everything else about a unit (stats, combat state) belongs to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// Controlling player (or faction side) of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// A unit on the battlefield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    #[serde(default)]
    pub id: UnitId,
    #[serde(default)]
    pub name: String,
    pub player: PlayerId,
    #[serde(default)]
    pub faction: String,
    #[serde(default)]
    pub unit_type: String,

    /// Key of the zone this unit stands in
    #[serde(default)]
    pub position: Option<String>,

    #[serde(default)]
    pub abilities: Vec<String>,

    /// Per-unit Zone-of-Control penalty, overriding the configured default
    #[serde(default)]
    pub zoc_cost: Option<f32>,

    /// Ethereal units never block a hex
    #[serde(default)]
    pub ethereal: bool,

    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Unit {
    pub fn new(player: PlayerId, faction: impl Into<String>) -> Self {
        Self {
            id: UnitId::new(),
            name: String::new(),
            player,
            faction: faction.into(),
            unit_type: String::new(),
            position: None,
            abilities: Vec::new(),
            zoc_cost: None,
            ethereal: false,
            keywords: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn at(mut self, zone_key: impl Into<String>) -> Self {
        self.position = Some(zone_key.into());
        self
    }

    pub fn with_unit_type(mut self, unit_type: impl Into<String>) -> Self {
        self.unit_type = unit_type.into();
        self
    }

    pub fn with_ability(mut self, ability: impl Into<String>) -> Self {
        self.abilities.push(ability.into());
        self
    }

    pub fn with_zoc_cost(mut self, cost: f32) -> Self {
        self.zoc_cost = Some(cost);
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn ethereal(mut self) -> Self {
        self.ethereal = true;
        self
    }

    pub fn has_ability(&self, ability: &str) -> bool {
        self.abilities.iter().any(|a| a == ability)
    }

    pub fn is_enemy_of(&self, other: &Unit) -> bool {
        self.player != other.player
    }

    /// Does this unit prevent others from entering its hex?
    pub fn blocks_movement(&self) -> bool {
        !self.ethereal
    }
}
