//! Card deployment: placement legality and adjacency synergy
//!
//! Independent of the path search, but shares the snapshot view and the
//! neighbor primitives.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::battle::battle_map::{BattlefieldView, Zone, ZoneOwner, ZoneRow};
use crate::battle::constants::{SAME_FACTION_SYNERGY, SHARED_KEYWORD_SYNERGY};
use crate::battle::hex::AxialCoord;
use crate::battle::lane::Lane;
use crate::battle::terrain::Terrain;
use crate::battle::units::{PlayerId, Unit};
use crate::core::config::LaneConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardCategory {
    Unit,
    Building,
    Trap,
}

/// The parts of a card that matter for placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub category: CardCategory,
    #[serde(default)]
    pub faction: String,
    #[serde(default)]
    pub unit_type: Option<String>,
    #[serde(default)]
    pub energy_cost: u32,
    #[serde(default)]
    pub momentum_cost: u32,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Card {
    pub fn new(name: impl Into<String>, category: CardCategory, faction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category,
            faction: faction.into(),
            unit_type: None,
            energy_cost: 0,
            momentum_cost: 0,
            keywords: Vec::new(),
        }
    }

    pub fn with_cost(mut self, energy: u32, momentum: u32) -> Self {
        self.energy_cost = energy;
        self.momentum_cost = momentum;
        self
    }

    pub fn with_unit_type(mut self, unit_type: impl Into<String>) -> Self {
        self.unit_type = Some(unit_type.into());
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
}

/// Resources available to the deploying player this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resources {
    pub energy: u32,
    pub momentum: u32,
}

impl Resources {
    pub fn new(energy: u32, momentum: u32) -> Self {
        Self { energy, momentum }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeploymentError {
    #[error("Not enough energy: need {required}, have {available}")]
    InsufficientEnergy { required: u32, available: u32 },

    #[error("Not enough momentum: need {required}, have {available}")]
    InsufficientMomentum { required: u32, available: u32 },

    #[error("Zone not found: {0}")]
    UnknownZone(String),

    #[error("{category:?} cards cannot be placed in zone {zone} ({owner:?})")]
    ZoneNotEligible {
        zone: String,
        category: CardCategory,
        owner: ZoneOwner,
    },

    #[error("Buildings require a backline zone, {0} is frontline")]
    RequiresBackline(String),

    #[error("Zone {0} is already occupied")]
    ZoneOccupied(String),

    #[error("Placement in zone {zone} restricted: {reason}")]
    Restricted { zone: String, reason: String },
}

/// Hook for faction- or unit-type-specific placement restrictions
pub trait PlacementRule: Send + Sync {
    fn check(&self, card: &Card, zone: &Zone) -> Result<(), DeploymentError>;
}

/// A unit type may not be placed on a terrain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainRestriction {
    pub unit_type: String,
    pub terrain: Terrain,
}

impl PlacementRule for TerrainRestriction {
    fn check(&self, card: &Card, zone: &Zone) -> Result<(), DeploymentError> {
        let same_type = card.unit_type.as_deref() == Some(self.unit_type.as_str());
        if same_type && zone.terrain == Some(self.terrain) {
            return Err(DeploymentError::Restricted {
                zone: zone.key.clone(),
                reason: format!("{} cannot deploy on {:?}", self.unit_type, self.terrain),
            });
        }
        Ok(())
    }
}

/// A faction's unit cards may only be placed on one zone row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionRowRestriction {
    pub faction: String,
    pub row: ZoneRow,
}

impl PlacementRule for FactionRowRestriction {
    fn check(&self, card: &Card, zone: &Zone) -> Result<(), DeploymentError> {
        if card.category == CardCategory::Unit && card.faction == self.faction && zone.row != self.row {
            return Err(DeploymentError::Restricted {
                zone: zone.key.clone(),
                reason: format!("{} units deploy to {:?} only", self.faction, self.row),
            });
        }
        Ok(())
    }
}

/// Inputs for one placement check
#[derive(Debug, Clone, Copy)]
pub struct DeploymentRequest<'a> {
    pub card: &'a Card,
    pub zone_key: &'a str,
    pub player: PlayerId,
    pub resources: Resources,
    pub zones: &'a [Zone],
    pub units: &'a [Unit],
}

/// Outcome of a successful placement check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentReport {
    pub zone: String,
    pub coord: AxialCoord,
    pub lane: Lane,
    pub synergy: u32,
}

pub struct DeploymentValidator {
    board_width: u32,
    lanes: LaneConfig,
    rules: Vec<Box<dyn PlacementRule>>,
}

impl DeploymentValidator {
    pub fn new(board_width: u32) -> Self {
        Self {
            board_width,
            lanes: LaneConfig::default(),
            rules: Vec::new(),
        }
    }

    /// Report lanes with these parameters instead of the defaults
    pub fn with_lanes(mut self, lanes: LaneConfig) -> Self {
        self.lanes = lanes;
        self
    }

    pub fn with_rule(mut self, rule: impl PlacementRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Check a placement; on success report the lane and synergy score
    pub fn validate(&self, request: &DeploymentRequest<'_>) -> Result<DeploymentReport, DeploymentError> {
        let card = request.card;
        check_resources(card, request.resources)?;

        let view = BattlefieldView::new(request.zones, request.units);
        let zone = view
            .zone_by_key(request.zone_key)
            .ok_or_else(|| DeploymentError::UnknownZone(request.zone_key.to_string()))?;

        check_zone_category(card, zone)?;

        if card.category != CardCategory::Trap && view.is_blocked(zone.coord) {
            return Err(DeploymentError::ZoneOccupied(zone.key.clone()));
        }

        for rule in &self.rules {
            rule.check(card, zone)?;
        }

        let synergy = synergy_in_view(&view, card, request.player, zone.coord);
        tracing::debug!("{} deployable at {} (synergy {})", card.name, zone.key, synergy);

        Ok(DeploymentReport {
            zone: zone.key.clone(),
            coord: zone.coord,
            lane: Lane::classify_with(zone.coord, self.board_width, &self.lanes),
            synergy,
        })
    }

    /// Every zone where the card would pass validation, in zone-list order
    pub fn eligible_zones<'a>(
        &self,
        card: &Card,
        player: PlayerId,
        resources: Resources,
        zones: &'a [Zone],
        units: &[Unit],
    ) -> Vec<&'a Zone> {
        zones
            .iter()
            .filter(|zone| {
                let request = DeploymentRequest {
                    card,
                    zone_key: &zone.key,
                    player,
                    resources,
                    zones,
                    units,
                };
                self.validate(&request).is_ok()
            })
            .collect()
    }
}

fn check_resources(card: &Card, available: Resources) -> Result<(), DeploymentError> {
    if card.energy_cost > available.energy {
        return Err(DeploymentError::InsufficientEnergy {
            required: card.energy_cost,
            available: available.energy,
        });
    }
    if card.momentum_cost > available.momentum {
        return Err(DeploymentError::InsufficientMomentum {
            required: card.momentum_cost,
            available: available.momentum,
        });
    }
    Ok(())
}

fn check_zone_category(card: &Card, zone: &Zone) -> Result<(), DeploymentError> {
    let owner_ok = match card.category {
        CardCategory::Unit | CardCategory::Building => zone.owner == ZoneOwner::Player,
        CardCategory::Trap => matches!(zone.owner, ZoneOwner::Player | ZoneOwner::Neutral),
    };
    if !owner_ok {
        return Err(DeploymentError::ZoneNotEligible {
            zone: zone.key.clone(),
            category: card.category,
            owner: zone.owner,
        });
    }

    if card.category == CardCategory::Building && !zone.is_backline() {
        return Err(DeploymentError::RequiresBackline(zone.key.clone()));
    }

    Ok(())
}

/// Synergy for placing `card` at `position`.
///
/// For each neighboring zone holding a friendly unit: +1 for the same
/// faction, plus one per shared keyword instance (multiset intersection).
pub fn adjacency_synergy(
    card: &Card,
    player: PlayerId,
    position: AxialCoord,
    zones: &[Zone],
    units: &[Unit],
) -> u32 {
    synergy_in_view(&BattlefieldView::new(zones, units), card, player, position)
}

fn synergy_in_view(view: &BattlefieldView<'_>, card: &Card, player: PlayerId, position: AxialCoord) -> u32 {
    let card_keywords = keyword_counts(&card.keywords);

    position
        .neighbors()
        .iter()
        .flat_map(|n| view.units_at(*n).iter())
        .filter(|unit| unit.player == player)
        .map(|unit| {
            let faction = if unit.faction == card.faction {
                SAME_FACTION_SYNERGY
            } else {
                0
            };
            let shared: usize = keyword_counts(&unit.keywords)
                .iter()
                .map(|(kw, n)| card_keywords.get(kw).map_or(0, |m| (*n).min(*m)))
                .sum();
            faction + shared as u32 * SHARED_KEYWORD_SYNERGY
        })
        .sum()
}

fn keyword_counts(keywords: &[String]) -> AHashMap<&str, usize> {
    let mut counts = AHashMap::new();
    for kw in keywords {
        *counts.entry(kw.as_str()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::battle_map::rectangular_board;

    const ME: PlayerId = PlayerId(1);
    const THEM: PlayerId = PlayerId(2);

    fn request<'a>(card: &'a Card, zone_key: &'a str, zones: &'a [Zone], units: &'a [Unit]) -> DeploymentRequest<'a> {
        DeploymentRequest {
            card,
            zone_key,
            player: ME,
            resources: Resources::new(5, 2),
            zones,
            units,
        }
    }

    #[test]
    fn test_unit_on_player_zone() {
        let zones = rectangular_board(5, 5);
        let card = Card::new("Spearman", CardCategory::Unit, "iron").with_cost(3, 0);
        let report = DeploymentValidator::new(5)
            .validate(&request(&card, "r3c2", &zones, &[]))
            .unwrap();
        assert_eq!(report.zone, "r3c2");
        assert_eq!(report.synergy, 0);
    }

    #[test]
    fn test_insufficient_energy() {
        let zones = rectangular_board(5, 5);
        let card = Card::new("Giant", CardCategory::Unit, "iron").with_cost(6, 0);
        let err = DeploymentValidator::new(5)
            .validate(&request(&card, "r3c2", &zones, &[]))
            .unwrap_err();
        assert_eq!(
            err,
            DeploymentError::InsufficientEnergy {
                required: 6,
                available: 5
            }
        );
    }

    #[test]
    fn test_insufficient_momentum() {
        let zones = rectangular_board(5, 5);
        let card = Card::new("Charge", CardCategory::Unit, "iron").with_cost(1, 3);
        let err = DeploymentValidator::new(5)
            .validate(&request(&card, "r3c2", &zones, &[]))
            .unwrap_err();
        assert!(matches!(err, DeploymentError::InsufficientMomentum { .. }));
    }

    #[test]
    fn test_exact_cost_is_affordable() {
        let zones = rectangular_board(5, 5);
        let card = Card::new("Scout", CardCategory::Unit, "iron").with_cost(5, 2);
        assert!(DeploymentValidator::new(5)
            .validate(&request(&card, "r4c0", &zones, &[]))
            .is_ok());
    }

    #[test]
    fn test_unit_rejected_on_enemy_and_neutral_zones() {
        let zones = rectangular_board(5, 5);
        let card = Card::new("Spearman", CardCategory::Unit, "iron");
        let validator = DeploymentValidator::new(5);
        for key in ["r0c2", "r2c2"] {
            let err = validator.validate(&request(&card, key, &zones, &[])).unwrap_err();
            assert!(matches!(err, DeploymentError::ZoneNotEligible { .. }), "{}", key);
        }
    }

    #[test]
    fn test_building_requires_backline() {
        let zones = rectangular_board(5, 5);
        let card = Card::new("Watchtower", CardCategory::Building, "iron");
        let validator = DeploymentValidator::new(5);

        let err = validator.validate(&request(&card, "r3c1", &zones, &[])).unwrap_err();
        assert_eq!(err, DeploymentError::RequiresBackline("r3c1".into()));
        assert!(validator.validate(&request(&card, "r4c1", &zones, &[])).is_ok());
    }

    #[test]
    fn test_trap_on_neutral_zone() {
        let zones = rectangular_board(5, 5);
        let card = Card::new("Snare", CardCategory::Trap, "sylvan");
        let validator = DeploymentValidator::new(5);
        assert!(validator.validate(&request(&card, "r2c2", &zones, &[])).is_ok());
        assert!(validator.validate(&request(&card, "r1c2", &zones, &[])).is_err());
    }

    #[test]
    fn test_unknown_zone() {
        let zones = rectangular_board(5, 5);
        let card = Card::new("Spearman", CardCategory::Unit, "iron");
        let err = DeploymentValidator::new(5)
            .validate(&request(&card, "r9c9", &zones, &[]))
            .unwrap_err();
        assert_eq!(err, DeploymentError::UnknownZone("r9c9".into()));
    }

    #[test]
    fn test_occupied_zone_rejects_unit_but_not_trap() {
        let zones = rectangular_board(5, 5);
        let units = vec![Unit::new(ME, "iron").at("r3c2")];
        let validator = DeploymentValidator::new(5);

        let unit_card = Card::new("Spearman", CardCategory::Unit, "iron");
        let err = validator.validate(&request(&unit_card, "r3c2", &zones, &units)).unwrap_err();
        assert_eq!(err, DeploymentError::ZoneOccupied("r3c2".into()));

        let trap = Card::new("Snare", CardCategory::Trap, "iron");
        assert!(validator.validate(&request(&trap, "r3c2", &zones, &units)).is_ok());
    }

    #[test]
    fn test_terrain_restriction_hook() {
        let mut zones = rectangular_board(5, 5);
        for zone in zones.iter_mut().filter(|z| z.key == "r3c2") {
            zone.terrain = Some(Terrain::Swamp);
        }
        let validator = DeploymentValidator::new(5).with_rule(TerrainRestriction {
            unit_type: "cavalry".into(),
            terrain: Terrain::Swamp,
        });

        let rider = Card::new("Lancer", CardCategory::Unit, "iron").with_unit_type("cavalry");
        let footman = Card::new("Spearman", CardCategory::Unit, "iron").with_unit_type("infantry");

        assert!(matches!(
            validator.validate(&request(&rider, "r3c2", &zones, &[])),
            Err(DeploymentError::Restricted { .. })
        ));
        assert!(validator.validate(&request(&footman, "r3c2", &zones, &[])).is_ok());
        assert!(validator.validate(&request(&rider, "r3c1", &zones, &[])).is_ok());
    }

    #[test]
    fn test_faction_row_restriction_hook() {
        let zones = rectangular_board(5, 5);
        let validator = DeploymentValidator::new(5).with_rule(FactionRowRestriction {
            faction: "sylvan".into(),
            row: ZoneRow::Backline,
        });
        let archer = Card::new("Archer", CardCategory::Unit, "sylvan");

        assert!(validator.validate(&request(&archer, "r3c2", &zones, &[])).is_err());
        assert!(validator.validate(&request(&archer, "r4c2", &zones, &[])).is_ok());
        assert_eq!(validator.rule_count(), 1);
    }

    #[test]
    fn test_synergy_counts_faction_and_keyword_multiset() {
        let zones = rectangular_board(5, 5);
        let view = BattlefieldView::new(&zones, &[]);
        let target = view.zone_by_key("r3c2").unwrap().coord;

        let card = Card::new("Warden", CardCategory::Unit, "sylvan")
            .with_keywords(["guard", "guard", "forest"]);
        let units = vec![
            // Same faction, shares "guard" twice
            Unit::new(ME, "sylvan").at("r3c1").with_keywords(["guard", "guard", "guard"]),
            // Other faction, shares "forest" once
            Unit::new(ME, "iron").at("r3c3").with_keywords(["forest", "stone"]),
            // Enemy never contributes
            Unit::new(THEM, "sylvan").at("r2c2").with_keywords(["guard"]),
            // Not adjacent
            Unit::new(ME, "sylvan").at("r4c0").with_keywords(["guard"]),
        ];

        assert_eq!(adjacency_synergy(&card, ME, target, &zones, &units), (1 + 2) + 1);
    }

    #[test]
    fn test_report_includes_synergy_and_lane() {
        let zones = rectangular_board(5, 5);
        let units = vec![Unit::new(ME, "iron").at("r3c1")];
        let card = Card::new("Spearman", CardCategory::Unit, "iron");
        let report = DeploymentValidator::new(5)
            .validate(&request(&card, "r3c2", &zones, &units))
            .unwrap();
        assert_eq!(report.synergy, 1);
        assert_eq!(report.lane, Lane::Center);
    }

    #[test]
    fn test_eligible_zones_for_building() {
        let zones = rectangular_board(5, 5);
        let units = vec![Unit::new(ME, "iron").at("r4c0")];
        let card = Card::new("Watchtower", CardCategory::Building, "iron");
        let eligible = DeploymentValidator::new(5).eligible_zones(&card, ME, Resources::new(1, 1), &zones, &units);

        let keys: Vec<_> = eligible.iter().map(|z| z.key.as_str()).collect();
        assert_eq!(keys, vec!["r4c1", "r4c2", "r4c3", "r4c4"]);
    }

    #[test]
    fn test_report_uses_configured_lanes() {
        let zones = rectangular_board(5, 5);
        let card = Card::new("Spearman", CardCategory::Unit, "iron");

        let default_report = DeploymentValidator::new(5)
            .validate(&request(&card, "r3c2", &zones, &[]))
            .unwrap();
        assert_eq!(default_report.lane, Lane::Center);

        let narrow = LaneConfig {
            reference_width: 5,
            center_half_width: 0,
        };
        let report = DeploymentValidator::new(5)
            .with_lanes(narrow)
            .validate(&request(&card, "r3c2", &zones, &[]))
            .unwrap();
        assert_eq!(report.coord, AxialCoord::new(-1, 3));
        assert_eq!(report.lane, Lane::Left);
    }
}
