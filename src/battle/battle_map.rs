//! Battlefield zones and the per-call snapshot view
//!
//! Callers hand the engine a flat list of zones and units. `BattlefieldView`
//! indexes that snapshot once per call; it never mutates or outlives it.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::hex::{AxialCoord, OffsetCoord};
use crate::battle::terrain::Terrain;
use crate::battle::units::Unit;

/// Who controls a zone, from the local player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZoneOwner {
    Player,
    Enemy,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZoneRow {
    #[default]
    Frontline,
    Backline,
}

/// A single addressable hex on the battlefield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub key: String,
    pub coord: AxialCoord,
    #[serde(default)]
    pub owner: ZoneOwner,
    #[serde(default)]
    pub row: ZoneRow,
    #[serde(default)]
    pub terrain: Option<Terrain>,
}

impl Zone {
    pub fn new(key: impl Into<String>, coord: AxialCoord) -> Self {
        Self {
            key: key.into(),
            coord,
            owner: ZoneOwner::default(),
            row: ZoneRow::default(),
            terrain: None,
        }
    }

    pub fn with_owner(mut self, owner: ZoneOwner) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_row(mut self, row: ZoneRow) -> Self {
        self.row = row;
        self
    }

    pub fn with_terrain(mut self, terrain: Terrain) -> Self {
        self.terrain = Some(terrain);
        self
    }

    pub fn is_player_controlled(&self) -> bool {
        self.owner == ZoneOwner::Player
    }

    pub fn is_backline(&self) -> bool {
        self.row == ZoneRow::Backline
    }
}

/// Larger boards grow the zone list on demand
const MAX_PREALLOCATED_ZONES: usize = 1 << 16;

/// Position key for a cell of a rectangular board
pub fn board_key(row: i32, col: i32) -> String {
    format!("r{}c{}", row, col)
}

/// Build a rectangular board in odd-row offset layout.
///
/// Columns are centered so the middle column sits at q = 0 on row 0, which
/// lines the board up with lane classification. Rows in the top half are
/// enemy-controlled, rows in the bottom half are player-controlled, and the
/// middle row of an odd-height board is neutral. The outermost row on each
/// side is the backline.
pub fn rectangular_board(width: u32, height: u32) -> Vec<Zone> {
    let capacity = (width as usize).saturating_mul(height as usize);
    let width = width.min(i32::MAX as u32) as i32;
    let height = height.min(i32::MAX as u32) as i32;
    let center_col = width / 2;
    let mut zones = Vec::with_capacity(capacity.min(MAX_PREALLOCATED_ZONES));

    for row in 0..height {
        let doubled = i64::from(row) * 2 + 1;
        let owner = if doubled < i64::from(height) {
            ZoneOwner::Enemy
        } else if doubled > i64::from(height) {
            ZoneOwner::Player
        } else {
            ZoneOwner::Neutral
        };
        let line = if row == 0 || row == height - 1 {
            ZoneRow::Backline
        } else {
            ZoneRow::Frontline
        };

        for col in 0..width {
            let coord = OffsetCoord::new(row, col - center_col).to_axial();
            zones.push(
                Zone::new(board_key(row, col), coord)
                    .with_owner(owner)
                    .with_row(line),
            );
        }
    }

    zones
}

/// Read-only index over one call's zones and units
#[derive(Debug)]
pub struct BattlefieldView<'a> {
    zones_by_coord: AHashMap<AxialCoord, &'a Zone>,
    zones_by_key: AHashMap<&'a str, &'a Zone>,
    occupants: AHashMap<AxialCoord, Vec<&'a Unit>>,
}

impl<'a> BattlefieldView<'a> {
    /// Index a snapshot. Units whose position names no zone are left out.
    pub fn new(zones: &'a [Zone], units: &'a [Unit]) -> Self {
        let mut zones_by_coord = AHashMap::with_capacity(zones.len());
        let mut zones_by_key = AHashMap::with_capacity(zones.len());
        for zone in zones {
            zones_by_coord.entry(zone.coord).or_insert(zone);
            zones_by_key.entry(zone.key.as_str()).or_insert(zone);
        }

        let mut occupants: AHashMap<AxialCoord, Vec<&'a Unit>> = AHashMap::new();
        for unit in units {
            let Some(zone) = unit
                .position
                .as_deref()
                .and_then(|key| zones_by_key.get(key))
            else {
                continue;
            };
            occupants.entry(zone.coord).or_default().push(unit);
        }

        Self {
            zones_by_coord,
            zones_by_key,
            occupants,
        }
    }

    pub fn contains(&self, coord: AxialCoord) -> bool {
        self.zones_by_coord.contains_key(&coord)
    }

    pub fn zone_at(&self, coord: AxialCoord) -> Option<&'a Zone> {
        self.zones_by_coord.get(&coord).copied()
    }

    pub fn zone_by_key(&self, key: &str) -> Option<&'a Zone> {
        self.zones_by_key.get(key).copied()
    }

    /// Coordinate of the zone a unit stands in
    pub fn position_of(&self, unit: &Unit) -> Option<AxialCoord> {
        unit.position
            .as_deref()
            .and_then(|key| self.zone_by_key(key))
            .map(|zone| zone.coord)
    }

    pub fn units_at(&self, coord: AxialCoord) -> &[&'a Unit] {
        self.occupants.get(&coord).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Does a non-ethereal unit stand here?
    pub fn is_blocked(&self, coord: AxialCoord) -> bool {
        self.units_at(coord).iter().any(|u| u.blocks_movement())
    }

    /// Units of another player standing on the neighbors of `position`,
    /// in neighbor order
    pub fn adjacent_enemies(&self, unit: &Unit, position: AxialCoord) -> Vec<&'a Unit> {
        position
            .neighbors()
            .iter()
            .flat_map(|n| self.units_at(*n).iter().copied())
            .filter(|other| other.is_enemy_of(unit))
            .collect()
    }

    pub fn has_adjacent_enemy(&self, unit: &Unit, position: AxialCoord) -> bool {
        position
            .neighbors()
            .iter()
            .any(|n| self.units_at(*n).iter().any(|other| other.is_enemy_of(unit)))
    }
}
