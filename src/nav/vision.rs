//! Exploration and fog of war
//!
//! What the observer sees right now is a disc around it whose radius grows
//! with the exploration tier. Everything ever seen stays explored.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::nav::constants::{
    VISION_EXPLORER_TIER, VISION_RADIUS_BASE, VISION_RADIUS_EXPLORER, VISION_RADIUS_SCOUT,
    VISION_SCOUT_TIER,
};
use crate::nav::hex::HexCoord;
use crate::nav::map::GridBounds;

/// What the player knows about a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HexVisibility {
    /// Never seen
    #[default]
    Fog,
    /// Seen before, not in view now
    Explored,
    /// In view now
    InVision,
}

impl HexVisibility {
    pub fn is_in_vision(&self) -> bool {
        matches!(self, HexVisibility::InVision)
    }

    /// Anything currently in vision counts as explored
    pub fn is_explored(&self) -> bool {
        !matches!(self, HexVisibility::Fog)
    }

    pub fn is_fog(&self) -> bool {
        matches!(self, HexVisibility::Fog)
    }
}

/// Who is asking. A game master sees the whole map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VisionCapability {
    #[default]
    Player,
    GameMaster,
}

impl VisionCapability {
    pub fn from_game_master_flag(game_master: bool) -> Self {
        if game_master {
            VisionCapability::GameMaster
        } else {
            VisionCapability::Player
        }
    }

    pub fn sees_everything(&self) -> bool {
        matches!(self, VisionCapability::GameMaster)
    }
}

/// Vision radius for an exploration tier
pub fn vision_radius(tier: u32) -> u32 {
    if tier >= VISION_EXPLORER_TIER {
        VISION_RADIUS_EXPLORER
    } else if tier >= VISION_SCOUT_TIER {
        VISION_RADIUS_SCOUT
    } else {
        VISION_RADIUS_BASE
    }
}

/// Cells the observer can see right now
pub fn current_vision(observer: HexCoord, tier: u32, bounds: &GridBounds) -> HashSet<HexCoord> {
    observer
        .disc(vision_radius(tier))
        .into_iter()
        .filter(|coord| bounds.contains(*coord))
        .collect()
}

/// Union of current vision into the explored set, as a new set
pub fn merge_explored(current: &HashSet<HexCoord>, explored: &HashSet<HexCoord>) -> HashSet<HexCoord> {
    explored.union(current).copied().collect()
}

/// Current vision plus everything explored so far
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisionState {
    current: HashSet<HexCoord>,
    explored: HashSet<HexCoord>,
}

impl VisionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vision state for an observer that has just appeared at `observer`
    pub fn observing(observer: HexCoord, tier: u32, bounds: &GridBounds) -> Self {
        let mut state = Self::new();
        state.refresh(observer, tier, bounds);
        state
    }

    /// Recompute current vision and fold it into the explored set
    pub fn refresh(&mut self, observer: HexCoord, tier: u32, bounds: &GridBounds) {
        let current = current_vision(observer, tier, bounds);
        self.explored = merge_explored(&current, &self.explored);
        self.current = current;
    }

    pub fn current(&self) -> &HashSet<HexCoord> {
        &self.current
    }

    pub fn explored(&self) -> &HashSet<HexCoord> {
        &self.explored
    }

    pub fn explored_count(&self) -> usize {
        self.explored.len()
    }

    /// The one place the game-master override is applied
    pub fn visibility(&self, coord: HexCoord, capability: VisionCapability) -> HexVisibility {
        if capability.sees_everything() || self.current.contains(&coord) {
            HexVisibility::InVision
        } else if self.explored.contains(&coord) {
            HexVisibility::Explored
        } else {
            HexVisibility::Fog
        }
    }

    pub fn is_in_vision(&self, coord: HexCoord, capability: VisionCapability) -> bool {
        self.visibility(coord, capability).is_in_vision()
    }

    pub fn is_explored(&self, coord: HexCoord, capability: VisionCapability) -> bool {
        self.visibility(coord, capability).is_explored()
    }
}
