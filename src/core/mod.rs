pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, MapConfig, MovementConfig, NavConfig, TerrainOverride};
pub use error::{NavError, Result};
pub use types::WorldPosition;
