//! Movement engine integration tests

use hex_tactics::battle::*;
use hex_tactics::core::MovementConfig;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn coord(zones: &[Zone], key: &str) -> AxialCoord {
    zones.iter().find(|z| z.key == key).unwrap().coord
}

#[test]
fn test_open_board_takes_shortest_route() {
    let zones = rectangular_board(5, 3);
    let mover = Unit::new(PlayerId(1), "sylvan").at("r2c2");
    let units = vec![mover.clone()];

    let start = coord(&zones, "r2c2");
    let goal = coord(&zones, "r0c2");
    let path = find_path(&PathQuery::new(start, goal, &mover, &units, &zones));

    assert_eq!(
        path,
        vec![AxialCoord::new(-1, 2), AxialCoord::new(-1, 1), AxialCoord::new(0, 0)]
    );
}

#[test]
fn test_engaged_unit_cannot_move() {
    let zones = rectangular_board(5, 3);
    let mover = Unit::new(PlayerId(1), "sylvan").at("r2c2");
    let units = vec![mover.clone(), Unit::new(PlayerId(2), "iron").at("r1c1")];

    let query = PathQuery::new(coord(&zones, "r2c2"), coord(&zones, "r0c2"), &mover, &units, &zones);
    assert!(find_path(&query).is_empty());
}

#[test]
fn test_engaged_unit_with_disengage_moves() {
    let zones = rectangular_board(5, 3);
    let mover = Unit::new(PlayerId(1), "sylvan")
        .at("r2c2")
        .with_ability("Disengage");
    let units = vec![mover.clone(), Unit::new(PlayerId(2), "iron").at("r1c1")];

    let query = PathQuery::new(coord(&zones, "r2c2"), coord(&zones, "r0c2"), &mover, &units, &zones);
    let path = find_path(&query);
    assert_eq!(path.first(), Some(&coord(&zones, "r2c2")));
    assert_eq!(path.last(), Some(&coord(&zones, "r0c2")));
}

#[test]
fn test_friendly_blockers_force_detour() {
    let zones = rectangular_board(5, 3);
    let mover = Unit::new(PlayerId(1), "sylvan").at("r2c2");
    let units = vec![
        mover.clone(),
        Unit::new(PlayerId(1), "sylvan").at("r1c1"),
        Unit::new(PlayerId(1), "sylvan").at("r1c2"),
    ];

    let start = coord(&zones, "r2c2");
    let goal = coord(&zones, "r0c2");
    let path = find_path(&PathQuery::new(start, goal, &mover, &units, &zones));

    assert_eq!(path.len(), 5);
    assert_eq!(path[0], start);
    assert_eq!(path[4], goal);
    for pair in path.windows(2) {
        assert!(pair[0].is_adjacent(&pair[1]));
    }
    assert!(!path.contains(&coord(&zones, "r1c1")));
    assert!(!path.contains(&coord(&zones, "r1c2")));
}

#[test]
fn test_surrounded_start_has_no_path() {
    let zones = rectangular_board(7, 7);
    let start = coord(&zones, "r3c3");
    let goal = coord(&zones, "r0c0");

    // Disengage lets it leave, so only occupancy can stop it
    let mover = Unit::new(PlayerId(1), "sylvan")
        .at("r3c3")
        .with_ability("Disengage");
    let mut units = vec![mover.clone()];
    for neighbor in start.neighbors() {
        let zone = zones.iter().find(|z| z.coord == neighbor).unwrap();
        units.push(Unit::new(PlayerId(2), "iron").at(zone.key.clone()));
    }
    assert_eq!(units.len(), 7);

    let query = PathQuery::new(start, goal, &mover, &units, &zones);
    assert!(find_path(&query).is_empty());
    assert!(reachable(&query, 10.0, &MovementConfig::default()).is_empty());
}

fn corridor() -> Vec<Zone> {
    (0..3)
        .map(|row| Zone::new(board_key(row, 0), OffsetCoord::new(row, 0).to_axial()))
        .collect()
}

#[test]
fn test_corridor_blocked_by_friend() {
    let zones = corridor();
    let mover = Unit::new(PlayerId(1), "sylvan").at("r2c0");
    let units = vec![mover.clone(), Unit::new(PlayerId(1), "sylvan").at("r1c0")];

    let query = PathQuery::new(coord(&zones, "r2c0"), coord(&zones, "r0c0"), &mover, &units, &zones);
    assert!(find_path(&query).is_empty());
}

#[test]
fn test_corridor_passes_ethereal_friend() {
    let zones = corridor();
    let mover = Unit::new(PlayerId(1), "sylvan").at("r2c0");
    let units = vec![
        mover.clone(),
        Unit::new(PlayerId(1), "sylvan").at("r1c0").ethereal(),
    ];

    let query = PathQuery::new(coord(&zones, "r2c0"), coord(&zones, "r0c0"), &mover, &units, &zones);
    let path = find_path(&query);
    assert_eq!(
        path,
        vec![AxialCoord::new(-1, 2), AxialCoord::new(0, 1), AxialCoord::new(0, 0)]
    );
}

#[test]
fn test_zone_of_control_steers_route() {
    let zones = rectangular_board(5, 3);
    let enemy = Unit::new(PlayerId(2), "iron").at("r1c2");
    let start = coord(&zones, "r2c4");
    let goal = coord(&zones, "r0c4");

    let heavy = Unit::new(PlayerId(1), "sylvan").at("r2c4");
    let units = vec![heavy.clone(), enemy.clone()];
    let config = MovementConfig::default();
    let route = find_route(&PathQuery::new(start, goal, &heavy, &units, &zones), &config).unwrap();
    assert_eq!(route.path[1], coord(&zones, "r1c4"));
    assert_eq!(route.cost, 2.0);

    // r1c3 touches the enemy, so passing through it also needs Disengage
    let light = Unit::new(PlayerId(1), "sylvan")
        .at("r2c4")
        .with_zoc_cost(0.0)
        .with_ability("Disengage");
    let units = vec![light.clone(), enemy];
    let route = find_route(&PathQuery::new(start, goal, &light, &units, &zones), &config).unwrap();
    assert_eq!(route.path[1], coord(&zones, "r1c3"));
    assert_eq!(route.cost, 2.0);
}

#[test]
fn test_route_cost_agrees_with_path_cost() {
    let scenario = Scenario::generate_skirmish(9, 7, 4, 11);
    let resolved = scenario.resolve().unwrap();
    let config = MovementConfig::default();

    if let Some(route) = resolved.plan(&config) {
        let walked = path_cost(&resolved.query(), &config, &route.path).unwrap();
        assert!((walked - route.cost).abs() < 1e-4);
    }
}

#[test]
fn test_result_independent_of_input_order() {
    let config = MovementConfig::default();
    for seed in 0..8u64 {
        let resolved = Scenario::generate_skirmish(9, 7, 4, seed).resolve().unwrap();
        let mover = resolved.mover().clone();
        let expected = find_path_with_config(&resolved.query(), &config);

        let mut rng = ChaCha8Rng::seed_from_u64(seed + 100);
        let mut zones = resolved.zones.clone();
        let mut units = resolved.units.clone();
        zones.shuffle(&mut rng);
        units.shuffle(&mut rng);

        let query = PathQuery::new(resolved.start, resolved.goal, &mover, &units, &zones);
        assert_eq!(find_path_with_config(&query, &config), expected, "seed {}", seed);
    }
}

#[test]
fn test_repeated_queries_are_identical() {
    let resolved = Scenario::generate_skirmish(11, 9, 6, 3).resolve().unwrap();
    let config = MovementConfig::default();
    let first = resolved.plan(&config);
    for _ in 0..5 {
        assert_eq!(resolved.plan(&config), first);
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let resolved = Scenario::generate_skirmish(9, 7, 4, 21).resolve().unwrap();
    let config = MovementConfig::default();
    let view = BattlefieldView::new(&resolved.zones, &resolved.units);

    let queries: Vec<PathQuery<'_>> = resolved
        .units
        .iter()
        .filter_map(|unit| {
            let start = view.position_of(unit)?;
            Some(PathQuery::new(start, resolved.goal, unit, &resolved.units, &resolved.zones))
        })
        .collect();
    assert!(!queries.is_empty());

    let parallel = find_paths(&queries, &config);
    let sequential: Vec<_> = queries
        .iter()
        .map(|q| find_path_with_config(q, &config))
        .collect();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_paths_are_contiguous_and_legal() {
    let config = MovementConfig::default();
    for seed in 0..16u64 {
        let resolved = Scenario::generate_skirmish(9, 7, 5, seed).resolve().unwrap();
        let path = find_path_with_config(&resolved.query(), &config);
        if path.is_empty() {
            continue;
        }

        let view = BattlefieldView::new(&resolved.zones, &resolved.units);
        assert_eq!(path[0], resolved.start);
        assert_eq!(*path.last().unwrap(), resolved.goal);
        for pair in path.windows(2) {
            assert_eq!(pair[0].distance(&pair[1]), 1);
        }
        for hex in &path[1..path.len() - 1] {
            assert!(view.contains(*hex));
            assert!(!view.is_blocked(*hex), "seed {} walked through {}", seed, hex);
        }
    }
}

#[test]
fn test_sample_scenarios_resolve() {
    let config = MovementConfig::load("data/movement.toml").unwrap();

    let ford = Scenario::load("data/scenarios/river_ford.toml").unwrap().resolve().unwrap();
    let route = ford.plan(&config).unwrap();
    assert_eq!(route.path.first(), Some(&ford.start));
    assert_eq!(route.path.last(), Some(&ford.goal));

    let pinned = Scenario::load("data/scenarios/pinned_skirmisher.toml")
        .unwrap()
        .resolve()
        .unwrap();
    assert!(is_engaged(&pinned.units, pinned.mover(), pinned.start, &pinned.zones));
    assert!(pinned.plan(&config).is_some());

    let mut stuck = pinned.clone();
    stuck.units[stuck.mover].abilities.clear();
    assert!(stuck.plan(&config).is_none());
}

#[test]
fn test_lanes_on_generated_board() {
    let zones = rectangular_board(5, 3);
    let lanes: Vec<Lane> = zones
        .iter()
        .filter(|z| z.key.starts_with("r0"))
        .map(|z| classify_lane(z.coord, 5))
        .collect();
    assert_eq!(
        lanes,
        vec![Lane::Left, Lane::Center, Lane::Center, Lane::Center, Lane::Right]
    );
}
