//! Pathward - headless movement runner
//!
//! Loads a navigation config, drops an avatar on the map, walks it to a
//! destination, and prints the outcome plus the fog-of-war map.

use std::sync::Arc;

use clap::Parser;
use pathward::core::config::{load_config, NavConfig};
use pathward::core::error::Result;
use pathward::nav::{
    ActionPointLedger, ActionPoints, GridBounds, HexCoord, HexVisibility, MovementExecutor,
    MovementOutcome, PositionUpdate, SharedPosition, SharedTier, TerrainMap, TerrainSource,
    VisionCapability, VisionState,
};
use serde::Serialize;
use tokio::runtime::Runtime;

/// Walk an avatar across a hex map and report what it cost and what it saw
#[derive(Parser, Debug)]
#[command(name = "pathward")]
#[command(about = "Plan and execute a single hex-map movement")]
struct Args {
    /// Navigation config (TOML)
    #[arg(long, default_value = "data/navigation.toml")]
    config: String,

    /// Starting column
    #[arg(long, default_value_t = 0)]
    from_column: i32,

    /// Starting row
    #[arg(long, default_value_t = 0)]
    from_row: i32,

    /// Destination column
    #[arg(long)]
    to_column: i32,

    /// Destination row
    #[arg(long)]
    to_row: i32,

    /// Exploration tier
    #[arg(long, default_value_t = 0)]
    tier: u32,

    /// Action points available
    #[arg(long, default_value_t = 50)]
    points: u32,

    /// Only show the planned path and cost
    #[arg(long)]
    preview: bool,

    /// Skip the delay between steps
    #[arg(long)]
    instant: bool,

    /// Reveal the whole map in the printed fog map
    #[arg(long)]
    game_master: bool,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct RunReport<'a> {
    outcome: &'a MovementOutcome,
    message: String,
    remaining_points: u32,
    explored: usize,
    updates: &'a [PositionUpdate],
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pathward=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = load_config(&args.config).unwrap_or_else(|e| {
        tracing::warn!("Failed to load config '{}': {}; using defaults", args.config, e);
        NavConfig::default()
    });
    if args.instant {
        config.movement.step_delay_ms = 0;
    }

    let map = config.map.build();
    let start = HexCoord::new(args.from_column, args.from_row);
    let destination = HexCoord::new(args.to_column, args.to_row);

    let executor = MovementExecutor::new(
        Arc::new(ActionPoints::new(args.points)),
        Arc::new(SharedPosition::at_hex(start)),
        Arc::new(SharedTier::new(args.tier)),
        config.terrain_costs.clone(),
        config.movement.clone(),
    );
    executor.refresh_vision(&map.bounds());

    if args.preview {
        let preview = executor.preview_movement(destination, &map)?;
        if args.format == "json" {
            println!("{}", serde_json::to_string_pretty(&preview)?);
        } else if preview.success {
            println!("Path: {:?}", preview.path.iter().map(|c| c.to_string()).collect::<Vec<_>>());
            println!("Cost: {} action points over {} steps", preview.total_cost, preview.steps());
        } else {
            println!("No path from {} to {}", start, destination);
        }
        return Ok(());
    }

    let mut updates_rx = executor.subscribe();
    let rt = Runtime::new()?;
    let outcome = rt.block_on(executor.plan_and_execute(destination, &map))?;

    let mut updates = Vec::new();
    while let Ok(update) = updates_rx.try_recv() {
        updates.push(update);
    }

    let vision = executor.vision();
    let remaining_points = executor.ledger().current_points();

    if args.format == "json" {
        let report = RunReport {
            outcome: &outcome,
            message: outcome.message(),
            remaining_points,
            explored: vision.explored_count(),
            updates: &updates,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for update in &updates {
            println!(
                "  step {}/{} -> {} (cost {})",
                update.step, update.total_steps, update.hex, update.cost
            );
        }
        println!("{}", outcome.message());
        println!("Remaining action points: {}", remaining_points);
        println!();
        let capability = VisionCapability::from_game_master_flag(args.game_master);
        print_fog_map(&map, &vision, capability, executor.current_hex());
    }

    Ok(())
}

/// One character per cell: '@' avatar, terrain initial in vision, '.' explored, ' ' fog
fn print_fog_map(map: &TerrainMap, vision: &VisionState, capability: VisionCapability, avatar: HexCoord) {
    let GridBounds { width, height } = map.bounds();
    for row in 0..height as i32 {
        let mut line = String::with_capacity(width as usize * 2);
        for column in 0..width as i32 {
            let coord = HexCoord::new(column, row);
            let ch = if coord == avatar {
                '@'
            } else {
                match vision.visibility(coord, capability) {
                    HexVisibility::InVision => terrain_symbol(map, coord),
                    HexVisibility::Explored => '.',
                    HexVisibility::Fog => ' ',
                }
            };
            line.push(ch);
            line.push(' ');
        }
        println!("|{}|", line);
    }
}

fn terrain_symbol(map: &TerrainMap, coord: HexCoord) -> char {
    match map.terrain_at(coord) {
        Ok(Some(kind)) => kind.chars().next().unwrap_or('?'),
        _ => '?',
    }
}
