use thiserror::Error;

use crate::nav::hex::HexCoord;

/// Hard failures: caller mistakes and broken collaborators.
///
/// Gameplay outcomes such as an unreachable destination or an empty
/// action-point ledger are not errors; they come back as
/// [`crate::nav::movement::MovementOutcome`] values.
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(HexCoord),

    #[error("Terrain lookup failed at {hex}: {reason}")]
    TerrainLookup { hex: HexCoord, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NavError>;
