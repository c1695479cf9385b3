//! Pathward - hex-grid navigation core
//!
//! Odd-column offset hex geometry, tier-aware A* pathfinding, fog-of-war
//! vision, and a cancellable step-by-step movement executor.

pub mod core;
pub mod nav;
