//! Battlefield scenarios loaded from TOML or generated from a seed
//!
//! A scenario describes a rectangular board, terrain overrides, the units on
//! it, and one move order to plan. Used by the CLI and the benchmarks.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::battle::battle_map::{board_key, rectangular_board, BattlefieldView, Zone, ZoneOwner};
use crate::battle::hex::AxialCoord;
use crate::battle::pathfinding::{find_route, PathQuery, Route};
use crate::battle::terrain::Terrain;
use crate::battle::units::{PlayerId, Unit};
use crate::core::config::MovementConfig;
use crate::core::error::{Result, TacticsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSpec {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainOverride {
    pub zone: String,
    pub terrain: Terrain,
}

/// Which unit moves, and where to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveOrder {
    /// Name of the moving unit
    pub unit: String,
    /// Key of the destination zone
    pub goal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub board: BoardSpec,
    #[serde(default)]
    pub terrain: Vec<TerrainOverride>,
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(rename = "move")]
    pub order: MoveOrder,
}

/// A scenario resolved into engine inputs
#[derive(Debug, Clone)]
pub struct ResolvedScenario {
    pub zones: Vec<Zone>,
    pub units: Vec<Unit>,
    pub mover: usize,
    pub start: AxialCoord,
    pub goal: AxialCoord,
}

impl ResolvedScenario {
    pub fn mover(&self) -> &Unit {
        &self.units[self.mover]
    }

    pub fn query(&self) -> PathQuery<'_> {
        PathQuery::new(self.start, self.goal, self.mover(), &self.units, &self.zones)
    }

    pub fn plan(&self, config: &MovementConfig) -> Option<Route> {
        find_route(&self.query(), config)
    }
}

impl Scenario {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let scenario = Self::from_toml_str(&contents)?;
        tracing::info!("Loaded scenario {:?} from {:?}", scenario.name, path);
        Ok(scenario)
    }

    /// Board zones with terrain overrides applied
    pub fn zones(&self) -> Result<Vec<Zone>> {
        let mut zones = rectangular_board(self.board.width, self.board.height);
        for over in &self.terrain {
            let zone = zones
                .iter_mut()
                .find(|z| z.key == over.zone)
                .ok_or_else(|| TacticsError::InvalidScenario(format!("terrain for unknown zone {}", over.zone)))?;
            zone.terrain = Some(over.terrain);
        }
        Ok(zones)
    }

    /// Check references and build engine inputs.
    ///
    /// Units placed on unknown zones are kept but logged; the engine ignores them.
    pub fn resolve(&self) -> Result<ResolvedScenario> {
        if self.board.width == 0 || self.board.height == 0 {
            return Err(TacticsError::InvalidScenario("board must not be empty".into()));
        }

        let zones = self.zones()?;
        let units = self.units.clone();

        let (start, goal) = {
            let view = BattlefieldView::new(&zones, &units);
            for unit in &units {
                if unit.position.is_some() && view.position_of(unit).is_none() {
                    tracing::warn!("Unit {:?} stands on an unknown zone, ignoring it", unit.name);
                }
            }

            let mover = units
                .iter()
                .find(|u| u.name == self.order.unit)
                .ok_or_else(|| TacticsError::InvalidScenario(format!("no unit named {}", self.order.unit)))?;
            let start = view
                .position_of(mover)
                .ok_or_else(|| TacticsError::InvalidScenario(format!("unit {} is not on the board", mover.name)))?;
            let goal = view
                .zone_by_key(&self.order.goal)
                .ok_or_else(|| TacticsError::InvalidScenario(format!("unknown goal zone {}", self.order.goal)))?
                .coord;
            (start, goal)
        };

        let mover = units
            .iter()
            .position(|u| u.name == self.order.unit)
            .ok_or_else(|| TacticsError::InvalidScenario(format!("no unit named {}", self.order.unit)))?;

        Ok(ResolvedScenario {
            zones,
            units,
            mover,
            start,
            goal,
        })
    }

    /// Random skirmish: terrain scatter, two sides on their own halves, and
    /// the first player unit ordered onto a random enemy backline zone.
    pub fn generate_skirmish(width: u32, height: u32, units_per_side: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let zones = rectangular_board(width.max(1), height.max(2));

        let mut terrain = Vec::new();
        for zone in &zones {
            let roll: f32 = rng.gen();
            let kind = if roll < 0.15 {
                Terrain::Forest
            } else if roll < 0.22 {
                Terrain::Hills
            } else if roll < 0.26 {
                Terrain::Swamp
            } else {
                continue;
            };
            terrain.push(TerrainOverride {
                zone: zone.key.clone(),
                terrain: kind,
            });
        }

        let mut player_zones: Vec<&Zone> = zones.iter().filter(|z| z.owner == ZoneOwner::Player).collect();
        let mut enemy_zones: Vec<&Zone> = zones.iter().filter(|z| z.owner == ZoneOwner::Enemy).collect();
        player_zones.shuffle(&mut rng);
        enemy_zones.shuffle(&mut rng);

        let mut units = Vec::new();
        for (i, zone) in player_zones.iter().take(units_per_side).enumerate() {
            let mut unit = Unit::new(PlayerId(1), "sylvan")
                .named(format!("p1-{}", i))
                .at(zone.key.clone());
            if rng.gen_bool(0.25) {
                unit = unit.with_ability("Disengage");
            }
            units.push(unit);
        }
        for (i, zone) in enemy_zones.iter().take(units_per_side).enumerate() {
            let mut unit = Unit::new(PlayerId(2), "ironclad")
                .named(format!("p2-{}", i))
                .at(zone.key.clone());
            if rng.gen_bool(0.1) {
                unit = unit.ethereal();
            }
            units.push(unit);
        }

        let goal = board_key(0, rng.gen_range(0..width.max(1) as i32));
        let mover = units
            .first()
            .map(|u| u.name.clone())
            .unwrap_or_default();

        Self {
            name: format!("skirmish-{}", seed),
            board: BoardSpec {
                width: width.max(1),
                height: height.max(2),
            },
            terrain,
            units,
            order: MoveOrder { unit: mover, goal },
        }
    }
}
