//! Terrain lookup: the read-only map the pathfinder walks over
//!
//! The host game owns the real map; [`TerrainSource`] is the seam it plugs
//! into. [`TerrainMap`] is a plain in-memory implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::nav::hex::HexCoord;

/// Rectangular extent of the playable grid: columns 0..width, rows 0..height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub width: u32,
    pub height: u32,
}

impl GridBounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, coord: HexCoord) -> bool {
        coord.column >= 0
            && coord.row >= 0
            && coord.column < self.width as i32
            && coord.row < self.height as i32
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Every in-bounds cell, column-major
    pub fn cells(&self) -> impl Iterator<Item = HexCoord> + '_ {
        (0..self.width as i32)
            .flat_map(move |column| (0..self.height as i32).map(move |row| HexCoord::new(column, row)))
    }
}

/// Read-only terrain lookup supplied by the host game
pub trait TerrainSource {
    /// Terrain kind at `hex`, or `None` when the cell is off the map.
    ///
    /// An `Err` means the lookup itself broke and aborts whatever asked.
    fn terrain_at(&self, hex: HexCoord) -> Result<Option<&str>>;

    fn bounds(&self) -> GridBounds;
}

/// In-memory terrain map: one default terrain plus per-cell overrides
#[derive(Debug, Clone)]
pub struct TerrainMap {
    bounds: GridBounds,
    default_terrain: String,
    overrides: HashMap<HexCoord, String>,
}

impl TerrainMap {
    /// Create a map where every cell has the same terrain
    pub fn new(width: u32, height: u32, default_terrain: impl Into<String>) -> Self {
        Self {
            bounds: GridBounds::new(width, height),
            default_terrain: default_terrain.into(),
            overrides: HashMap::new(),
        }
    }

    /// Set terrain at a coordinate. Out-of-bounds cells are ignored.
    pub fn set_terrain(&mut self, coord: HexCoord, terrain: impl Into<String>) {
        if self.bounds.contains(coord) {
            self.overrides.insert(coord, terrain.into());
        }
    }

    pub fn default_terrain(&self) -> &str {
        &self.default_terrain
    }

    pub fn in_bounds(&self, coord: HexCoord) -> bool {
        self.bounds.contains(coord)
    }

    /// Build a map from text rows, one character per cell.
    ///
    /// Row `i` of `rows` is map row `i`; character `j` is column `j`. Each
    /// character is looked up in `legend`.
    pub fn from_rows(rows: &[&str], legend: &[(char, &str)]) -> Option<Self> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let (_, first) = legend.first()?;
        let mut map = Self::new(width, height, *first);

        for (row, line) in rows.iter().enumerate() {
            for (column, ch) in line.chars().enumerate() {
                let (_, terrain) = legend.iter().find(|(c, _)| *c == ch)?;
                map.set_terrain(HexCoord::new(column as i32, row as i32), *terrain);
            }
        }
        Some(map)
    }
}

impl TerrainSource for TerrainMap {
    fn terrain_at(&self, hex: HexCoord) -> Result<Option<&str>> {
        if !self.bounds.contains(hex) {
            return Ok(None);
        }
        Ok(Some(
            self.overrides
                .get(&hex)
                .map(String::as_str)
                .unwrap_or(self.default_terrain.as_str()),
        ))
    }

    fn bounds(&self) -> GridBounds {
        self.bounds
    }
}

impl<T: TerrainSource + ?Sized> TerrainSource for &T {
    fn terrain_at(&self, hex: HexCoord) -> Result<Option<&str>> {
        (**self).terrain_at(hex)
    }

    fn bounds(&self) -> GridBounds {
        (**self).bounds()
    }
}
