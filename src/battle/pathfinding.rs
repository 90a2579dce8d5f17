//! A* pathfinding for battlefields
//!
//! Respects terrain costs, faction modifiers, Zone of Control, occupancy and
//! engagement. Every query is evaluated against one static snapshot of zones
//! and units; nothing is cached between calls.

use ahash::AHashSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::battle::battle_map::{BattlefieldView, Zone};
use crate::battle::hex::AxialCoord;
use crate::battle::open_set::{NodeArena, OpenSet, PathNode};
use crate::battle::units::Unit;
use crate::core::config::MovementConfig;

/// Extra cost of entering the hex at (q, r)
pub type TerrainCostFn = dyn Fn(i32, i32) -> f32 + Send + Sync;

/// Faction-specific cost adjustment for a unit entering (q, r)
pub type FactionModifierFn = dyn Fn(&Unit, i32, i32) -> f32 + Send + Sync;

/// Inputs for one path search
#[derive(Clone, Copy)]
pub struct PathQuery<'a> {
    pub start: AxialCoord,
    pub goal: AxialCoord,
    pub unit: &'a Unit,
    pub units: &'a [Unit],
    pub zones: &'a [Zone],
    pub terrain_cost: Option<&'a TerrainCostFn>,
    pub faction_modifier: Option<&'a FactionModifierFn>,
}

impl<'a> PathQuery<'a> {
    pub fn new(
        start: AxialCoord,
        goal: AxialCoord,
        unit: &'a Unit,
        units: &'a [Unit],
        zones: &'a [Zone],
    ) -> Self {
        Self {
            start,
            goal,
            unit,
            units,
            zones,
            terrain_cost: None,
            faction_modifier: None,
        }
    }

    pub fn with_terrain_cost(mut self, terrain_cost: &'a TerrainCostFn) -> Self {
        self.terrain_cost = Some(terrain_cost);
        self
    }

    pub fn with_faction_modifier(mut self, faction_modifier: &'a FactionModifierFn) -> Self {
        self.faction_modifier = Some(faction_modifier);
        self
    }
}

/// A found path and its total movement cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub path: Vec<AxialCoord>,
    pub cost: f32,
}

impl Route {
    /// Number of steps taken (path length minus the start hex)
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// A hex the unit can end its move on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReachableHex {
    pub coord: AxialCoord,
    pub cost: f32,
}

/// Movement legality and cost for one query
struct MovementRules<'q, 'v> {
    unit: &'q Unit,
    goal: Option<AxialCoord>,
    view: &'v BattlefieldView<'q>,
    terrain_cost: Option<&'q TerrainCostFn>,
    faction_modifier: Option<&'q FactionModifierFn>,
    base_cost: f32,
    zoc_cost: f32,
    can_disengage: bool,
}

impl<'q, 'v> MovementRules<'q, 'v> {
    fn new(
        query: &PathQuery<'q>,
        goal: Option<AxialCoord>,
        view: &'v BattlefieldView<'q>,
        config: &MovementConfig,
    ) -> Self {
        Self {
            unit: query.unit,
            goal,
            view,
            terrain_cost: query.terrain_cost,
            faction_modifier: query.faction_modifier,
            base_cost: config.base_move_cost,
            zoc_cost: query.unit.zoc_cost.unwrap_or(config.default_zoc_cost),
            can_disengage: query.unit.has_ability(&config.disengage_ability),
        }
    }

    fn heuristic(&self, coord: AxialCoord) -> f32 {
        match self.goal {
            Some(goal) => coord.distance(&goal) as f32 * self.base_cost,
            None => 0.0,
        }
    }

    /// An engaged unit stays put unless it can disengage
    fn can_leave(&self, from: AxialCoord) -> bool {
        self.can_disengage || !self.view.has_adjacent_enemy(self.unit, from)
    }

    /// The hex must exist and be free of blockers (the goal may be occupied)
    fn can_enter(&self, to: AxialCoord) -> bool {
        if !self.view.contains(to) {
            return false;
        }
        Some(to) == self.goal || !self.view.is_blocked(to)
    }

    /// Cost of stepping onto `to`; `None` when the terrain is impassable
    fn step_cost(&self, to: AxialCoord) -> Option<f32> {
        let terrain = match self.terrain_cost {
            Some(f) => f(to.q, to.r),
            None => self
                .view
                .zone_at(to)
                .and_then(|zone| zone.terrain)
                .map(|t| t.extra_move_cost())
                .unwrap_or(0.0),
        };
        let faction = self
            .faction_modifier
            .map(|f| f(self.unit, to.q, to.r))
            .unwrap_or(0.0);
        let zoc = if self.view.has_adjacent_enemy(self.unit, to) {
            self.zoc_cost
        } else {
            0.0
        };

        let cost = self.base_cost + terrain + faction + zoc;
        if !cost.is_finite() {
            return None;
        }

        // Never below one base step, so the heuristic stays admissible
        Some(cost.max(self.base_cost))
    }
}

/// Find the cheapest legal path from `start` to `goal`.
///
/// Returns the coordinates from start to goal inclusive, or an empty vector
/// when the goal is unreachable.
pub fn find_path(query: &PathQuery<'_>) -> Vec<AxialCoord> {
    find_path_with_config(query, &MovementConfig::default())
}

pub fn find_path_with_config(query: &PathQuery<'_>, config: &MovementConfig) -> Vec<AxialCoord> {
    find_route(query, config)
        .map(|route| route.path)
        .unwrap_or_default()
}

/// Find the cheapest legal route, with its cost
pub fn find_route(query: &PathQuery<'_>, config: &MovementConfig) -> Option<Route> {
    if query.start == query.goal {
        return Some(Route {
            path: vec![query.start],
            cost: 0.0,
        });
    }

    let view = BattlefieldView::new(query.zones, query.units);
    if !view.contains(query.goal) {
        tracing::debug!("Goal {} is not a battlefield zone", query.goal);
        return None;
    }

    let rules = MovementRules::new(query, Some(query.goal), &view, config);
    let mut arena = NodeArena::new();
    let mut open = OpenSet::new();
    let mut closed = AHashSet::new();

    open.push_or_improve(
        &mut arena,
        PathNode::new(query.start, 0.0, rules.heuristic(query.start), None),
    );

    while let Some(current_index) = open.pop() {
        let Some((coord, g)) = arena.get(current_index).map(|n| (n.coord, n.g)) else {
            continue;
        };

        if coord == query.goal {
            let path = arena.reconstruct(current_index);
            tracing::debug!(
                "Path {} -> {}: {} steps, cost {}, {} nodes expanded",
                query.start,
                query.goal,
                path.len() - 1,
                g,
                closed.len()
            );
            return Some(Route { path, cost: g });
        }

        closed.insert(coord.key());

        if !rules.can_leave(coord) {
            tracing::trace!("Unit engaged at {}, cannot leave", coord);
            continue;
        }

        for neighbor in coord.neighbors() {
            if closed.contains(&neighbor.key()) || !rules.can_enter(neighbor) {
                continue;
            }
            let Some(step) = rules.step_cost(neighbor) else {
                continue;
            };

            let node = PathNode::new(neighbor, g + step, rules.heuristic(neighbor), Some(current_index));
            open.push_or_improve(&mut arena, node);
        }
    }

    tracing::debug!(
        "No path {} -> {} after expanding {} nodes",
        query.start,
        query.goal,
        closed.len()
    );
    None
}

/// Cost of walking `path` under the same rules as the search.
///
/// Returns `None` when a step is not between adjacent zones or is illegal.
pub fn path_cost(query: &PathQuery<'_>, config: &MovementConfig, path: &[AxialCoord]) -> Option<f32> {
    let (first, rest) = path.split_first()?;
    let view = BattlefieldView::new(query.zones, query.units);
    let goal = path.last().copied();
    let rules = MovementRules::new(query, goal, &view, config);

    let mut cost = 0.0;
    let mut from = *first;
    for &to in rest {
        if !from.is_adjacent(&to) || !rules.can_leave(from) || !rules.can_enter(to) {
            return None;
        }
        cost += rules.step_cost(to)?;
        from = to;
    }
    Some(cost)
}

/// Every hex the unit can legally end on within `budget`, cheapest first.
///
/// Uses the query's start; its goal is ignored. Occupied hexes are never
/// valid end points. A negative or NaN budget reaches nothing.
pub fn reachable(query: &PathQuery<'_>, budget: f32, config: &MovementConfig) -> Vec<ReachableHex> {
    if budget.is_nan() || budget < 0.0 {
        tracing::debug!("Rejecting movement budget {}", budget);
        return Vec::new();
    }

    let view = BattlefieldView::new(query.zones, query.units);
    let rules = MovementRules::new(query, None, &view, config);
    let mut arena = NodeArena::new();
    let mut open = OpenSet::new();
    let mut closed = AHashSet::new();
    let mut result = Vec::new();

    open.push_or_improve(&mut arena, PathNode::new(query.start, 0.0, 0.0, None));

    while let Some(current_index) = open.pop() {
        let Some((coord, g)) = arena.get(current_index).map(|n| (n.coord, n.g)) else {
            continue;
        };
        closed.insert(coord.key());

        if coord != query.start {
            result.push(ReachableHex { coord, cost: g });
        }

        if !rules.can_leave(coord) {
            continue;
        }

        for neighbor in coord.neighbors() {
            if closed.contains(&neighbor.key()) || !rules.can_enter(neighbor) {
                continue;
            }
            let Some(step) = rules.step_cost(neighbor) else {
                continue;
            };
            if g + step > budget {
                continue;
            }
            open.push_or_improve(&mut arena, PathNode::new(neighbor, g + step, 0.0, Some(current_index)));
        }
    }

    tracing::debug!(
        "{} hexes reachable from {} within {}",
        result.len(),
        query.start,
        budget
    );
    result
}

/// Run independent queries in parallel; results are in query order
pub fn find_paths(queries: &[PathQuery<'_>], config: &MovementConfig) -> Vec<Vec<AxialCoord>> {
    queries
        .par_iter()
        .map(|query| find_path_with_config(query, config))
        .collect()
}
