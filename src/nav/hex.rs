//! Hex coordinate system for the strategy map (offset coordinates)
//!
//! Odd-q layout: columns are vertical strips and every odd column sits half a
//! cell lower than its even neighbours. Offset coordinates are what the map
//! stores; cube coordinates are only used for distance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::WorldPosition;

/// Horizontal distance between adjacent column centres
pub const HEX_COLUMN_SPACING: f32 = 1.5;

/// Vertical distance between adjacent row centres (sqrt(3) / 2)
pub const HEX_ROW_SPACING: f32 = 0.866_025_4;

/// Neighbour offsets for even columns: NE, SE, N, S, NW, SW
const EVEN_COLUMN_OFFSETS: [(i32, i32); 6] = [(1, -1), (1, 0), (0, -1), (0, 1), (-1, -1), (-1, 0)];

/// Neighbour offsets for odd columns: NE, SE, N, S, NW, SW
const ODD_COLUMN_OFFSETS: [(i32, i32); 6] = [(1, 0), (1, 1), (0, -1), (0, 1), (-1, 0), (-1, 1)];

/// Offset hex coordinate (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct HexCoord {
    pub column: i32,
    pub row: i32,
}

impl HexCoord {
    pub fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// True for columns shifted half a cell down. Uses the low bit so that
    /// negative columns keep the same alternation.
    pub fn is_odd_column(&self) -> bool {
        self.column & 1 == 1
    }

    /// Both components are non-negative
    pub fn is_valid(&self) -> bool {
        self.column >= 0 && self.row >= 0
    }

    /// Convert to cube coordinates (x, y, z)
    pub fn to_cube(&self) -> (i32, i32, i32) {
        let x = self.column;
        let z = self.row - (self.column - (self.column & 1)) / 2;
        let y = -x - z;
        (x, y, z)
    }

    /// Exact hex distance in steps
    pub fn distance(&self, other: &Self) -> u32 {
        let (ax, ay, az) = self.to_cube();
        let (bx, by, bz) = other.to_cube();
        let dx = (ax - bx).abs();
        let dy = (ay - by).abs();
        let dz = (az - bz).abs();
        ((dx + dy + dz) / 2) as u32
    }

    /// The six neighbouring cells; which six depends on column parity
    pub fn adjacent(&self) -> [HexCoord; 6] {
        let offsets = if self.is_odd_column() {
            &ODD_COLUMN_OFFSETS
        } else {
            &EVEN_COLUMN_OFFSETS
        };
        offsets.map(|(dc, dr)| HexCoord::new(self.column + dc, self.row + dr))
    }

    /// Every cell at exactly `radius` steps, in column-major scan order
    pub fn ring(&self, radius: u32) -> Vec<HexCoord> {
        if radius == 0 {
            return vec![*self];
        }

        let r = radius as i32;
        let mut results = Vec::with_capacity(6 * radius as usize);
        for column in (self.column - r)..=(self.column + r) {
            // Row spread of a ring never exceeds its radius plus the half-cell shift
            for row in (self.row - r - 1)..=(self.row + r + 1) {
                let coord = HexCoord::new(column, row);
                if self.distance(&coord) == radius {
                    results.push(coord);
                }
            }
        }
        results
    }

    /// Every cell within `radius` steps, centre first, then ring by ring
    pub fn disc(&self, radius: u32) -> Vec<HexCoord> {
        let mut results = Vec::with_capacity(disc_size(radius));
        for r in 0..=radius {
            results.extend(self.ring(r));
        }
        results
    }

    /// Centre of this cell in world space
    pub fn to_world(&self) -> WorldPosition {
        hex_to_world(*self)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Number of cells in a disc of the given radius
pub fn disc_size(radius: u32) -> usize {
    let r = radius as usize;
    1 + 3 * r * (r + 1)
}

pub fn hex_to_world(hex: HexCoord) -> WorldPosition {
    WorldPosition::new(
        hex.column as f32 * HEX_COLUMN_SPACING,
        hex.row as f32 * HEX_ROW_SPACING,
    )
}

/// Nearest cell for a world position.
///
/// Rounds each axis independently, so `hex_to_world(world_to_hex(p))` is only
/// the centre of the cell `p` falls in, not `p` itself.
pub fn world_to_hex(pos: WorldPosition) -> HexCoord {
    let column = (pos.x / HEX_COLUMN_SPACING).round() as i32;
    let row = (pos.z / HEX_ROW_SPACING).round() as i32;
    HexCoord::new(column, row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_hex_coord_creation() {
        let coord = HexCoord::new(5, 10);
        assert_eq!(coord.column, 5);
        assert_eq!(coord.row, 10);
    }

    #[test]
    fn test_hex_distance_same() {
        let a = HexCoord::new(3, 3);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn test_hex_distance_along_row() {
        let a = HexCoord::new(0, 0);
        assert_eq!(a.distance(&HexCoord::new(1, 0)), 1);
        assert_eq!(a.distance(&HexCoord::new(3, 0)), 3);
        assert_eq!(a.distance(&HexCoord::new(0, 4)), 4);
    }

    #[test]
    fn test_hex_distance_is_not_manhattan() {
        // (0,0) -> (2,1) is two diagonal steps, Manhattan would say 3
        let a = HexCoord::new(0, 0);
        assert_eq!(a.distance(&HexCoord::new(2, 1)), 2);
    }

    #[test]
    fn test_adjacent_even_column() {
        let n: HashSet<_> = HexCoord::new(2, 2).adjacent().into_iter().collect();
        let expected: HashSet<_> = [(3, 1), (3, 2), (2, 1), (2, 3), (1, 1), (1, 2)]
            .into_iter()
            .map(|(c, r)| HexCoord::new(c, r))
            .collect();
        assert_eq!(n, expected);
    }

    #[test]
    fn test_adjacent_odd_column() {
        let n: HashSet<_> = HexCoord::new(3, 2).adjacent().into_iter().collect();
        let expected: HashSet<_> = [(4, 2), (4, 3), (3, 1), (3, 3), (2, 2), (2, 3)]
            .into_iter()
            .map(|(c, r)| HexCoord::new(c, r))
            .collect();
        assert_eq!(n, expected);
    }

    #[test]
    fn test_adjacent_negative_odd_column() {
        // -1 is odd: shifted down like column 1
        let n: HashSet<_> = HexCoord::new(-1, 0).adjacent().into_iter().collect();
        assert!(n.contains(&HexCoord::new(0, 1)));
        assert!(n.contains(&HexCoord::new(-2, 1)));
        assert!(!n.contains(&HexCoord::new(0, -1)));
    }

    #[test]
    fn test_ring_zero_is_center() {
        let c = HexCoord::new(4, 4);
        assert_eq!(c.ring(0), vec![c]);
    }

    #[test]
    fn test_ring_one_matches_adjacent() {
        for c in [HexCoord::new(4, 4), HexCoord::new(5, 4)] {
            let ring: HashSet<_> = c.ring(1).into_iter().collect();
            let adjacent: HashSet<_> = c.adjacent().into_iter().collect();
            assert_eq!(ring, adjacent);
        }
    }

    #[test]
    fn test_disc_sizes() {
        let c = HexCoord::new(0, 0);
        assert_eq!(c.disc(0).len(), 1);
        assert_eq!(c.disc(1).len(), 7);
        assert_eq!(c.disc(2).len(), 19);
        assert_eq!(c.disc(3).len(), disc_size(3));
    }

    #[test]
    fn test_world_round_trip_from_hex() {
        for c in [HexCoord::new(0, 0), HexCoord::new(3, 7), HexCoord::new(-2, 5)] {
            assert_eq!(world_to_hex(hex_to_world(c)), c);
        }
    }

    #[test]
    fn test_world_round_trip_from_position_is_lossy() {
        let p = WorldPosition::new(1.2, 0.3);
        let snapped = hex_to_world(world_to_hex(p));
        assert_ne!(snapped, p);
        assert_eq!(snapped, WorldPosition::new(1.5, 0.0));
    }

    fn coord() -> impl Strategy<Value = HexCoord> {
        (-50i32..50, -50i32..50).prop_map(|(c, r)| HexCoord::new(c, r))
    }

    proptest! {
        #[test]
        fn prop_distance_symmetric(a in coord(), b in coord()) {
            prop_assert_eq!(a.distance(&b), b.distance(&a));
        }

        #[test]
        fn prop_distance_triangle(a in coord(), b in coord(), c in coord()) {
            prop_assert!(a.distance(&c) <= a.distance(&b) + b.distance(&c));
        }

        #[test]
        fn prop_adjacent_distinct_and_unit(c in coord()) {
            let n = c.adjacent();
            let unique: HashSet<_> = n.iter().copied().collect();
            prop_assert_eq!(unique.len(), 6);
            for neighbor in n {
                prop_assert_eq!(c.distance(&neighbor), 1);
            }
        }

        #[test]
        fn prop_ring_size(c in coord(), r in 0u32..6) {
            let expected = if r == 0 { 1 } else { 6 * r as usize };
            prop_assert_eq!(c.ring(r).len(), expected);
        }
    }
}
