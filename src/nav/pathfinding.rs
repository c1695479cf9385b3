//! A* pathfinding over the hex map
//!
//! Respects terrain costs and exploration-tier discounts. Impassable cells
//! never enter the open set.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::nav::hex::HexCoord;
use crate::nav::map::TerrainSource;
use crate::nav::terrain::TerrainCostTable;

/// Outcome of a pathfinding request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathResult {
    /// Start and goal inclusive; empty on failure
    pub path: Vec<HexCoord>,
    /// Sum of step costs for every cell after the start
    pub total_cost: u32,
    pub success: bool,
}

impl PathResult {
    pub fn found(path: Vec<HexCoord>, total_cost: u32) -> Self {
        Self {
            path,
            total_cost,
            success: true,
        }
    }

    pub fn failure() -> Self {
        Self::default()
    }

    /// Number of moves, excluding the start cell
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<HexCoord> {
        self.path.first().copied()
    }

    pub fn destination(&self) -> Option<HexCoord> {
        self.path.last().copied()
    }
}

/// Node in the A* open set
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathNode {
    coord: HexCoord,
    g_cost: u32,
    h_cost: u32,
}

impl PathNode {
    fn f_cost(&self) -> u32 {
        self.g_cost + self.h_cost
    }
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap: smaller f first, then smaller h
        other
            .f_cost()
            .cmp(&self.f_cost())
            .then_with(|| other.h_cost.cmp(&self.h_cost))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cost of stepping onto `coord`, or None if it is off the map or impassable
pub fn step_cost<T: TerrainSource + ?Sized>(
    terrain: &T,
    costs: &TerrainCostTable,
    coord: HexCoord,
    tier: u32,
) -> Result<Option<u32>> {
    Ok(terrain
        .terrain_at(coord)?
        .and_then(|kind| costs.step_cost(kind, tier)))
}

/// Find the cheapest path using A*.
///
/// An off-map start, or an unreachable, off-map or impassable goal yields
/// [`PathResult::failure`]; only a failing terrain lookup is an error.
pub fn find_path<T: TerrainSource + ?Sized>(
    terrain: &T,
    costs: &TerrainCostTable,
    start: HexCoord,
    goal: HexCoord,
    tier: u32,
) -> Result<PathResult> {
    if terrain.terrain_at(start)?.is_none() {
        return Ok(PathResult::failure());
    }
    if start == goal {
        return Ok(match step_cost(terrain, costs, start, tier)? {
            Some(_) => PathResult::found(vec![start], 0),
            None => PathResult::failure(),
        });
    }
    if step_cost(terrain, costs, goal, tier)?.is_none() {
        return Ok(PathResult::failure());
    }

    let mut open_set = BinaryHeap::new();
    let mut closed: HashSet<HexCoord> = HashSet::new();
    let mut came_from: HashMap<HexCoord, HexCoord> = HashMap::new();
    let mut g_scores: HashMap<HexCoord, u32> = HashMap::new();

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        coord: start,
        g_cost: 0,
        h_cost: start.distance(&goal),
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            let path = reconstruct_path(&came_from, current.coord);
            return Ok(PathResult::found(path, current.g_cost));
        }

        // Stale heap entry for an already-settled cell
        if !closed.insert(current.coord) {
            continue;
        }

        for neighbor in current.coord.adjacent() {
            if closed.contains(&neighbor) {
                continue;
            }
            let Some(move_cost) = step_cost(terrain, costs, neighbor, tier)? else {
                continue;
            };

            let tentative_g = current.g_cost + move_cost;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    coord: neighbor,
                    g_cost: tentative_g,
                    h_cost: neighbor.distance(&goal),
                });
            }
        }
    }

    Ok(PathResult::failure())
}

/// Reconstruct path from came_from map
fn reconstruct_path(came_from: &HashMap<HexCoord, HexCoord>, mut current: HexCoord) -> Vec<HexCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Sum of step costs along a path, skipping the start cell.
///
/// Returns None if any later cell is off the map or impassable.
pub fn path_cost<T: TerrainSource + ?Sized>(
    terrain: &T,
    costs: &TerrainCostTable,
    path: &[HexCoord],
    tier: u32,
) -> Result<Option<u32>> {
    let mut total = 0;
    for coord in path.iter().skip(1) {
        match step_cost(terrain, costs, *coord, tier)? {
            Some(cost) => total += cost,
            None => return Ok(None),
        }
    }
    Ok(Some(total))
}

/// Every cell reachable from `start` for at most `budget` points, with its
/// cheapest cost. The start cell is included at cost 0.
pub fn reachable_within<T: TerrainSource + ?Sized>(
    terrain: &T,
    costs: &TerrainCostTable,
    start: HexCoord,
    tier: u32,
    budget: u32,
) -> Result<HashMap<HexCoord, u32>> {
    let mut best: HashMap<HexCoord, u32> = HashMap::new();
    let mut frontier = BinaryHeap::new();

    best.insert(start, 0);
    frontier.push(PathNode {
        coord: start,
        g_cost: 0,
        h_cost: 0,
    });

    while let Some(current) = frontier.pop() {
        if best.get(&current.coord).is_some_and(|&g| g < current.g_cost) {
            continue;
        }

        for neighbor in current.coord.adjacent() {
            let Some(move_cost) = step_cost(terrain, costs, neighbor, tier)? else {
                continue;
            };
            let g = current.g_cost + move_cost;
            if g > budget {
                continue;
            }
            if best.get(&neighbor).map_or(true, |&known| g < known) {
                best.insert(neighbor, g);
                frontier.push(PathNode {
                    coord: neighbor,
                    g_cost: g,
                    h_cost: 0,
                });
            }
        }
    }

    Ok(best)
}
