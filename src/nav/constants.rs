//! Navigation constants - all tuned game-balance values in one place
//!
//! Breakpoints here are exact. Changing any of them changes which paths are
//! chosen and how far a player can see.

// Terrain
pub const IMPASSABLE_COST: u32 = 999;

// Vision radius by exploration tier
pub const VISION_RADIUS_BASE: u32 = 1; // tiers 0-1
pub const VISION_RADIUS_SCOUT: u32 = 2; // tiers 2-3
pub const VISION_RADIUS_EXPLORER: u32 = 3; // tier 4+
pub const VISION_SCOUT_TIER: u32 = 2;
pub const VISION_EXPLORER_TIER: u32 = 4;

// Terrain cost discounts by exploration tier
pub const LIGHT_TERRAIN_DISCOUNT_TIER: u32 = 2; // base 2-3, minus 1
pub const MEDIUM_TERRAIN_DISCOUNT_TIER: u32 = 3; // base 4-5, minus 1
pub const HEAVY_TERRAIN_DISCOUNT_TIER: u32 = 4; // base 8+, halved
pub const HEAVY_TERRAIN_MIN_COST: u32 = 8;

// Movement animation
pub const DEFAULT_STEP_DELAY_MS: u64 = 300;
pub const DEFAULT_UPDATE_CAPACITY: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vision_radii_ordered() {
        assert!(VISION_RADIUS_BASE < VISION_RADIUS_SCOUT);
        assert!(VISION_RADIUS_SCOUT < VISION_RADIUS_EXPLORER);
        assert!(VISION_SCOUT_TIER < VISION_EXPLORER_TIER);
    }

    #[test]
    fn test_discount_tiers_ordered() {
        assert!(LIGHT_TERRAIN_DISCOUNT_TIER < MEDIUM_TERRAIN_DISCOUNT_TIER);
        assert!(MEDIUM_TERRAIN_DISCOUNT_TIER < HEAVY_TERRAIN_DISCOUNT_TIER);
        assert!(HEAVY_TERRAIN_MIN_COST < IMPASSABLE_COST);
    }
}
