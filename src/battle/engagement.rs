//! Engagement detection between units
//!
//! A unit is engaged when an enemy stands on any neighboring hex. Engaged
//! units may not leave their hex unless they can disengage.

use crate::battle::battle_map::{BattlefieldView, Zone};
use crate::battle::constants::DISENGAGE_ABILITY;
use crate::battle::hex::AxialCoord;
use crate::battle::units::Unit;
use crate::core::config::MovementConfig;

/// Units belonging to a different player on the neighbors of `position`
pub fn get_adjacent_enemies<'a>(
    units: &'a [Unit],
    unit: &Unit,
    position: AxialCoord,
    zones: &'a [Zone],
) -> Vec<&'a Unit> {
    BattlefieldView::new(zones, units).adjacent_enemies(unit, position)
}

/// Is `unit` engaged if it stands at `position`?
pub fn is_engaged(units: &[Unit], unit: &Unit, position: AxialCoord, zones: &[Zone]) -> bool {
    BattlefieldView::new(zones, units).has_adjacent_enemy(unit, position)
}

/// Can this unit leave a hex while engaged? Uses the default ability name.
pub fn can_disengage(unit: &Unit) -> bool {
    unit.has_ability(DISENGAGE_ABILITY)
}

/// Same rule as the pathfinder applies under `config`
pub fn can_disengage_with(unit: &Unit, config: &MovementConfig) -> bool {
    unit.has_ability(&config.disengage_ability)
}

/// Count of adjacent enemies at the unit's current zone (0 if off-board)
pub fn engagement_pressure(units: &[Unit], unit: &Unit, zones: &[Zone]) -> usize {
    let view = BattlefieldView::new(zones, units);
    view.position_of(unit)
        .map(|pos| view.adjacent_enemies(unit, pos).len())
        .unwrap_or(0)
}
