//! Hex Tactics route planner
//!
//! Plans one move order on a scenario file or a seeded random skirmish and
//! prints the route as JSON or text.

use clap::Parser;
use serde::Serialize;

use hex_tactics::battle::lane::Lane;
use hex_tactics::battle::pathfinding::reachable;
use hex_tactics::battle::scenario::Scenario;
use hex_tactics::battle::AxialCoord;
use hex_tactics::core::config::MovementConfig;
use hex_tactics::core::error::{Result, TacticsError};

/// Plan a unit's move across a hex battlefield
#[derive(Parser, Debug)]
#[command(name = "hex-tactics")]
#[command(about = "Plan unit movement on a hex battlefield")]
struct Args {
    /// Scenario TOML file (data/scenarios/). A random skirmish is used if omitted
    #[arg(long)]
    scenario: Option<String>,

    /// Seed for the random skirmish
    #[arg(long)]
    seed: Option<u64>,

    /// Skirmish board width in hexes
    #[arg(long, default_value_t = 9)]
    width: u32,

    /// Skirmish board height in hexes
    #[arg(long, default_value_t = 7)]
    height: u32,

    /// Units per side in the skirmish
    #[arg(long, default_value_t = 4)]
    units: usize,

    /// Movement config TOML (defaults to built-in values)
    #[arg(long)]
    config: Option<String>,

    /// Also list hexes reachable within this movement budget
    #[arg(long)]
    budget: Option<f32>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct PlanResult {
    scenario: String,
    unit: String,
    start: AxialCoord,
    goal: AxialCoord,
    goal_lane: Lane,
    found: bool,
    path: Vec<AxialCoord>,
    cost: Option<f32>,
    reachable: Vec<AxialCoord>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "hex_tactics=debug"
    } else {
        "hex_tactics=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.format != "json" && args.format != "text" {
        return Err(TacticsError::InvalidConfig(format!(
            "unknown output format {}",
            args.format
        )));
    }

    let config = match &args.config {
        Some(path) => MovementConfig::load(path)?,
        None => MovementConfig::default(),
    };

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => {
            let seed = args.seed.unwrap_or_else(rand::random);
            tracing::info!("Generating skirmish with seed {}", seed);
            Scenario::generate_skirmish(args.width, args.height, args.units, seed)
        }
    };

    let resolved = scenario.resolve()?;
    let route = resolved.plan(&config);
    let reachable_hexes = args
        .budget
        .map(|budget| {
            reachable(&resolved.query(), budget, &config)
                .into_iter()
                .map(|hex| hex.coord)
                .collect()
        })
        .unwrap_or_default();

    let result = PlanResult {
        scenario: scenario.name.clone(),
        unit: resolved.mover().name.clone(),
        start: resolved.start,
        goal: resolved.goal,
        goal_lane: Lane::classify_with(resolved.goal, scenario.board.width, &config.lanes),
        found: route.is_some(),
        path: route.as_ref().map(|r| r.path.clone()).unwrap_or_default(),
        cost: route.as_ref().map(|r| r.cost),
        reachable: reachable_hexes,
    };

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_text(&result);
    }

    Ok(())
}

fn print_text(result: &PlanResult) {
    println!("=== {} ===", result.scenario);
    println!(
        "{} from {} to {} ({:?} lane)",
        result.unit, result.start, result.goal, result.goal_lane
    );
    match result.cost {
        Some(cost) => {
            let steps: Vec<String> = result.path.iter().map(|c| c.to_string()).collect();
            println!("Route ({} steps, cost {:.1}): {}", steps.len().saturating_sub(1), cost, steps.join(" -> "));
        }
        None => println!("No route"),
    }
    if !result.reachable.is_empty() {
        println!("Reachable hexes: {}", result.reachable.len());
    }
}
