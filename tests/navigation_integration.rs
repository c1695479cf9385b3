//! Navigation integration tests

use std::sync::Arc;

use pathward::core::config::{load_config, MovementConfig};
use pathward::nav::*;

fn executor_at(
    start: HexCoord,
    points: u32,
    tier: u32,
) -> MovementExecutor<Arc<ActionPoints>, Arc<SharedPosition>, Arc<SharedTier>> {
    MovementExecutor::new(
        Arc::new(ActionPoints::new(points)),
        Arc::new(SharedPosition::at_hex(start)),
        Arc::new(SharedTier::new(tier)),
        TerrainCostTable::default(),
        MovementConfig::instant(),
    )
}

#[tokio::test]
async fn test_water_blocks_every_tier() {
    let mut map = TerrainMap::new(3, 1, "plain");
    map.set_terrain(HexCoord::new(2, 0), "water");

    for tier in 0..6 {
        let exec = executor_at(HexCoord::new(0, 0), 50, tier);
        let outcome = exec.plan_and_execute(HexCoord::new(2, 0), &map).await.unwrap();

        assert!(matches!(
            outcome.failure(),
            Some(MovementFailure::NoPathFound { .. })
        ));
        assert!(outcome.planned.path.is_empty());
        assert_eq!(exec.ledger().current_points(), 50);
        assert_eq!(exec.current_hex(), HexCoord::new(0, 0));
    }
}

#[tokio::test]
async fn test_three_step_plain_walk() {
    let map = TerrainMap::new(10, 10, "plain");
    let exec = executor_at(HexCoord::new(0, 0), 50, 0);
    exec.refresh_vision(&map.bounds());
    let mut updates = exec.subscribe();

    let outcome = exec.plan_and_execute(HexCoord::new(3, 0), &map).await.unwrap();

    assert_eq!(outcome.status, MovementStatus::Completed);
    assert_eq!(outcome.planned.total_cost, 3);
    assert_eq!(outcome.spent, 3);
    assert_eq!(exec.ledger().current_points(), 47);

    let vision = exec.vision();
    for coord in HexCoord::new(3, 0).disc(1) {
        if map.in_bounds(coord) {
            assert!(vision.explored().contains(&coord), "{} not explored", coord);
        }
    }
    assert!(vision.explored().is_superset(vision.current()));

    let mut steps = Vec::new();
    while let Ok(update) = updates.try_recv() {
        steps.push(update.hex);
    }
    assert_eq!(steps, outcome.traveled[1..].to_vec());
}

#[tokio::test]
async fn test_explored_never_shrinks_across_moves() {
    let map = TerrainMap::new(15, 15, "plain");
    let exec = executor_at(HexCoord::new(1, 1), 100, 2);
    exec.refresh_vision(&map.bounds());

    let mut previous = exec.vision().explored().clone();
    for destination in [HexCoord::new(6, 2), HexCoord::new(6, 9), HexCoord::new(0, 12)] {
        let outcome = exec.plan_and_execute(destination, &map).await.unwrap();
        assert!(outcome.is_success());

        let vision = exec.vision();
        assert!(vision.explored().is_superset(&previous));
        assert!(vision.explored().is_superset(vision.current()));
        previous = vision.explored().clone();
    }
}

#[tokio::test]
async fn test_tier_upgrade_lowers_cost_on_next_move() {
    let map = TerrainMap::new(6, 1, "hills");
    let tier = Arc::new(SharedTier::new(0));
    let exec = MovementExecutor::new(
        Arc::new(ActionPoints::new(100)),
        Arc::new(SharedPosition::at_hex(HexCoord::new(0, 0))),
        Arc::clone(&tier),
        TerrainCostTable::default(),
        MovementConfig::instant(),
    );

    let before = exec.preview_movement(HexCoord::new(5, 0), &map).unwrap();
    tier.set(2);
    let after = exec.preview_movement(HexCoord::new(5, 0), &map).unwrap();

    assert_eq!(before.total_cost, 15);
    assert_eq!(after.total_cost, 10);
}

#[test]
fn test_uniform_grid_path_shape() {
    let map = TerrainMap::new(20, 20, "forest");
    let costs = TerrainCostTable::default();
    let start = HexCoord::new(2, 3);

    for goal in [HexCoord::new(17, 3), HexCoord::new(9, 15), HexCoord::new(2, 19)] {
        let result = find_path(&map, &costs, start, goal, 0).unwrap();
        let distance = start.distance(&goal);
        assert_eq!(result.path.len(), distance as usize + 1);
        assert_eq!(result.total_cost, distance * 2);
        for pair in result.path.windows(2) {
            assert_eq!(pair[0].distance(&pair[1]), 1);
        }
    }
}

#[tokio::test]
async fn test_shipped_map_walk() {
    let config = load_config("data/navigation.toml").unwrap();
    let map = config.map.build();
    let exec = MovementExecutor::new(
        Arc::new(ActionPoints::new(40)),
        Arc::new(SharedPosition::at_hex(HexCoord::new(0, 0))),
        Arc::new(SharedTier::new(0)),
        config.terrain_costs.clone(),
        MovementConfig::instant(),
    );

    let preview = exec.preview_movement(HexCoord::new(11, 9), &map).unwrap();
    assert!(preview.success);
    for coord in &preview.path {
        let kind = map.terrain_at(*coord).unwrap().unwrap();
        assert!(!is_impassable(config.terrain_costs.base_cost(kind).unwrap()));
    }

    let outcome = exec.plan_and_execute(HexCoord::new(11, 9), &map).await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.spent, preview.total_cost);
    assert_eq!(exec.ledger().current_points(), 40 - preview.total_cost);
}
