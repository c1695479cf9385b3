//! Terrain movement costs and exploration-tier discounts
//!
//! Terrain kinds are plain names owned by the map; this table only knows how
//! much it costs to step onto each of them.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::nav::constants::{
    HEAVY_TERRAIN_DISCOUNT_TIER, HEAVY_TERRAIN_MIN_COST, IMPASSABLE_COST,
    LIGHT_TERRAIN_DISCOUNT_TIER, MEDIUM_TERRAIN_DISCOUNT_TIER,
};

/// Is this cost the impassable sentinel (or beyond it)?
pub fn is_impassable(cost: u32) -> bool {
    cost >= IMPASSABLE_COST
}

/// Apply the exploration-tier discount to a base terrain cost.
///
/// Discounts are banded, not proportional:
/// - tier 2+: costs 2-3 drop by one
/// - tier 3+: costs 4-5 drop by one
/// - tier 4+: costs 8 and up are halved
///
/// Costs 1, 6-7 and the impassable sentinel never change. The result is
/// never below 1, so a zero base cost is raised to 1.
pub fn adjusted_cost(base: u32, tier: u32) -> u32 {
    if is_impassable(base) {
        return base;
    }
    if base < 2 {
        return base.max(1);
    }

    match base {
        2..=3 if tier >= LIGHT_TERRAIN_DISCOUNT_TIER => (base - 1).max(1),
        4..=5 if tier >= MEDIUM_TERRAIN_DISCOUNT_TIER => (base - 1).max(1),
        b if b >= HEAVY_TERRAIN_MIN_COST && tier >= HEAVY_TERRAIN_DISCOUNT_TIER => (b / 2).max(1),
        _ => base,
    }
}

/// Base movement cost per terrain kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerrainCostTable {
    costs: AHashMap<String, u32>,
}

impl Default for TerrainCostTable {
    fn default() -> Self {
        Self::from_pairs([
            ("plain", 1),
            ("grassland", 1),
            ("road", 1),
            ("forest", 2),
            ("hills", 3),
            ("swamp", 4),
            ("desert", 5),
            ("jungle", 6),
            ("tundra", 7),
            ("mountain", 8),
            ("snow_peak", 10),
            ("water", IMPASSABLE_COST),
            ("ocean", IMPASSABLE_COST),
        ])
    }
}

impl TerrainCostTable {
    /// Empty table; every lookup is unknown until costs are added
    pub fn new() -> Self {
        Self {
            costs: AHashMap::new(),
        }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        Self {
            costs: pairs
                .into_iter()
                .map(|(name, cost)| (name.to_string(), cost))
                .collect(),
        }
    }

    pub fn insert(&mut self, terrain: impl Into<String>, cost: u32) {
        self.costs.insert(terrain.into(), cost);
    }

    /// Undiscounted cost, or None for a terrain name the table doesn't know
    pub fn base_cost(&self, terrain: &str) -> Option<u32> {
        self.costs.get(terrain).copied()
    }

    /// Cost of entering a terrain at the given tier, or None when it cannot
    /// be entered. Unknown terrain is treated as impassable.
    pub fn step_cost(&self, terrain: &str, tier: u32) -> Option<u32> {
        let base = self.base_cost(terrain)?;
        if is_impassable(base) {
            return None;
        }
        Some(adjusted_cost(base, tier))
    }

    pub fn contains(&self, terrain: &str) -> bool {
        self.costs.contains_key(terrain)
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.costs.iter().map(|(name, cost)| (name.as_str(), *cost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_base_cost_floors_at_one() {
        for tier in 0..6 {
            assert_eq!(adjusted_cost(0, tier), 1);
        }
        let table = TerrainCostTable::from_pairs([("ice", 0)]);
        assert_eq!(table.step_cost("ice", 0), Some(1));
        assert_eq!(table.base_cost("ice"), Some(0));
    }

    #[test]
    fn test_no_discount_at_tier_zero() {
        for base in [1, 2, 3, 4, 5, 6, 7, 8, 10] {
            assert_eq!(adjusted_cost(base, 0), base);
        }
    }

    #[test]
    fn test_light_terrain_discount() {
        assert_eq!(adjusted_cost(2, 1), 2);
        assert_eq!(adjusted_cost(2, 2), 1);
        assert_eq!(adjusted_cost(3, 2), 2);
        // Medium band untouched at tier 2
        assert_eq!(adjusted_cost(4, 2), 4);
    }

    #[test]
    fn test_medium_terrain_discount() {
        assert_eq!(adjusted_cost(4, 3), 3);
        assert_eq!(adjusted_cost(5, 3), 4);
        assert_eq!(adjusted_cost(3, 3), 2);
        assert_eq!(adjusted_cost(8, 3), 8);
    }

    #[test]
    fn test_heavy_terrain_discount() {
        assert_eq!(adjusted_cost(8, 4), 4);
        assert_eq!(adjusted_cost(9, 4), 4);
        assert_eq!(adjusted_cost(10, 4), 5);
    }

    #[test]
    fn test_unbanded_costs_never_change() {
        for tier in 0..10 {
            assert_eq!(adjusted_cost(1, tier), 1);
            assert_eq!(adjusted_cost(6, tier), 6);
            assert_eq!(adjusted_cost(7, tier), 7);
            assert_eq!(adjusted_cost(IMPASSABLE_COST, tier), IMPASSABLE_COST);
        }
    }

    #[test]
    fn test_adjusted_cost_monotone_in_tier() {
        for base in 1..20 {
            for tier in 0..8 {
                assert!(adjusted_cost(base, tier + 1) <= adjusted_cost(base, tier));
                assert!(adjusted_cost(base, tier) >= 1);
            }
        }
    }

    #[test]
    fn test_water_impassable() {
        let table = TerrainCostTable::default();
        assert_eq!(table.step_cost("water", 0), None);
        assert_eq!(table.step_cost("water", 9), None);
        assert_eq!(table.base_cost("water"), Some(IMPASSABLE_COST));
    }

    #[test]
    fn test_unknown_terrain_impassable() {
        let table = TerrainCostTable::default();
        assert_eq!(table.base_cost("lava"), None);
        assert_eq!(table.step_cost("lava", 0), None);
    }

    #[test]
    fn test_step_cost_uses_discount() {
        let table = TerrainCostTable::default();
        assert_eq!(table.step_cost("mountain", 0), Some(8));
        assert_eq!(table.step_cost("mountain", 4), Some(4));
        assert_eq!(table.step_cost("plain", 4), Some(1));
    }
}
