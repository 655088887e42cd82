//! Hex coordinate system (axial coordinates)
//!
//! Uses axial coordinates (q, r); the third cube coordinate is s = -q - r.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Axial hex coordinate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate S (derived from q and r)
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Chebyshev distance in cube space, equal to the step count between hexes
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s() - other.s()).unsigned_abs();
        dq.max(dr).max(ds)
    }

    /// Get all 6 neighboring hex coordinates, in `HexDirection::all()` order
    pub fn neighbors(&self) -> [HexCoord; 6] {
        HexDirection::all().map(|dir| *self + dir.offset())
    }

    /// Get all hexes within range (inclusive), center first row by row
    pub fn hexes_in_range(&self, range: u32) -> Vec<HexCoord> {
        let range = range as i32;
        let mut results = Vec::new();
        for q in -range..=range {
            for r in (-range).max(-q - range)..=range.min(-q + range) {
                results.push(HexCoord::new(self.q + q, self.r + r));
            }
        }
        results
    }

    /// Neighbor that moves closest to `goal` (first in direction order on ties)
    pub fn step_toward(&self, goal: &Self) -> HexCoord {
        if self == goal {
            return *self;
        }
        self.neighbors()
            .into_iter()
            .min_by_key(|n| n.distance(goal))
            .unwrap_or(*self)
    }
}

impl std::ops::Add for HexCoord {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// The six axial directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HexDirection {
    #[default]
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// Get the hex offset for this direction
    pub fn offset(&self) -> HexCoord {
        match self {
            HexDirection::East => HexCoord::new(1, 0),
            HexDirection::NorthEast => HexCoord::new(1, -1),
            HexDirection::NorthWest => HexCoord::new(0, -1),
            HexDirection::West => HexCoord::new(-1, 0),
            HexDirection::SouthWest => HexCoord::new(-1, 1),
            HexDirection::SouthEast => HexCoord::new(0, 1),
        }
    }

    /// All directions
    pub fn all() -> [HexDirection; 6] {
        [
            HexDirection::East,
            HexDirection::NorthEast,
            HexDirection::NorthWest,
            HexDirection::West,
            HexDirection::SouthWest,
            HexDirection::SouthEast,
        ]
    }
}
