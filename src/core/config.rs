//! Navigation configuration with documented defaults
//!
//! Loaded from TOML (see `data/navigation.toml`). Every section is optional;
//! anything left out falls back to the defaults below.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{NavError, Result};
use crate::nav::constants::{DEFAULT_STEP_DELAY_MS, DEFAULT_UPDATE_CAPACITY};
use crate::nav::hex::HexCoord;
use crate::nav::map::TerrainMap;
use crate::nav::terrain::TerrainCostTable;

/// Top-level configuration for the navigation core
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub movement: MovementConfig,
    /// Base cost per terrain kind; 999 marks impassable terrain
    pub terrain_costs: TerrainCostTable,
    pub map: MapConfig,
}

/// Movement animation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Pause between steps while a movement animates (milliseconds)
    ///
    /// The renderer tweens the avatar over this window. Zero makes movement
    /// resolve as fast as the runtime can schedule it.
    pub step_delay_ms: u64,

    /// Buffered position updates per subscriber before the slowest one
    /// starts missing updates
    pub update_capacity: usize,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            update_capacity: DEFAULT_UPDATE_CAPACITY,
        }
    }
}

impl MovementConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// No pause between steps
    pub fn instant() -> Self {
        Self {
            step_delay_ms: 0,
            ..Self::default()
        }
    }
}

/// A single cell whose terrain differs from the map default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainOverride {
    pub column: i32,
    pub row: i32,
    pub terrain: String,
}

/// Map layout for the in-memory terrain source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: u32,
    pub height: u32,
    pub default_terrain: String,
    pub overrides: Vec<TerrainOverride>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            default_terrain: "plain".to_string(),
            overrides: Vec::new(),
        }
    }
}

impl MapConfig {
    pub fn build(&self) -> TerrainMap {
        let mut map = TerrainMap::new(self.width, self.height, self.default_terrain.clone());
        for o in &self.overrides {
            map.set_terrain(HexCoord::new(o.column, o.row), o.terrain.clone());
        }
        map
    }
}

impl NavConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: NavConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.map.width == 0 || self.map.height == 0 {
            return Err(NavError::InvalidConfig(format!(
                "map must be at least 1x1, got {}x{}",
                self.map.width, self.map.height
            )));
        }

        if let Some((name, _)) = self.terrain_costs.iter().find(|(_, cost)| *cost == 0) {
            return Err(NavError::InvalidConfig(format!(
                "terrain '{}' has cost 0; costs must be positive",
                name
            )));
        }

        if !self.terrain_costs.contains(&self.map.default_terrain) {
            return Err(NavError::InvalidConfig(format!(
                "default terrain '{}' has no cost",
                self.map.default_terrain
            )));
        }

        let map = self.map.build();
        for o in &self.map.overrides {
            if !self.terrain_costs.contains(&o.terrain) {
                return Err(NavError::InvalidConfig(format!(
                    "override at ({}, {}) uses unknown terrain '{}'",
                    o.column, o.row, o.terrain
                )));
            }
            if !map.in_bounds(HexCoord::new(o.column, o.row)) {
                return Err(NavError::InvalidConfig(format!(
                    "override at ({}, {}) is outside the {}x{} map",
                    o.column, o.row, self.map.width, self.map.height
                )));
            }
        }

        Ok(())
    }
}

/// Load and validate a TOML config file
pub fn load_config(path: impl AsRef<Path>) -> Result<NavConfig> {
    let content = fs::read_to_string(path.as_ref())?;
    NavConfig::from_toml_str(&content)
}
