//! Navigation core - what the avatar can see, where it can go, and what it costs
//!
//! - `hex`: offset-grid geometry
//! - `vision`: current vision and the explored set
//! - `pathfinding`: terrain-weighted A*
//! - `movement`: step-by-step movement against the action-point ledger

pub mod constants;
pub mod hex;
pub mod ledger;
pub mod map;
pub mod movement;
pub mod pathfinding;
pub mod terrain;
pub mod vision;

// Re-exports for convenient access
pub use constants::*;
pub use hex::{disc_size, hex_to_world, world_to_hex, HexCoord};
pub use ledger::{
    ActionPointLedger, ActionPoints, PositionStore, SharedPosition, SharedTier, TierProvider,
};
pub use map::{GridBounds, TerrainMap, TerrainSource};
pub use movement::{
    MovementExecutor, MovementFailure, MovementOutcome, MovementPhase, MovementSession,
    MovementStart, MovementStatus, PositionUpdate, StepResult,
};
pub use pathfinding::{find_path, path_cost, reachable_within, step_cost, PathResult};
pub use terrain::{adjusted_cost, is_impassable, TerrainCostTable};
pub use vision::{
    current_vision, merge_explored, vision_radius, HexVisibility, VisionCapability, VisionState,
};
