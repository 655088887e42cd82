//! Tiles, terrain, structures and the per-tile resource/hazard records

use serde::{Deserialize, Serialize};

use crate::core::types::UnitId;
use crate::faction::economy::Cost;
use crate::faction::house::FactionId;
use crate::map::hex::HexCoord;

/// Terrain kind of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    #[default]
    Sand,
    Rock,
    Spice,
    Crater,
}

impl Terrain {
    /// Sand-category terrain (spice fields sit on sand)
    pub fn is_sandy(&self) -> bool {
        matches!(self, Terrain::Sand | Terrain::Spice)
    }
}

/// Buildable (and auto-placed) structure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// Auto-placed at match start, never buildable
    Base,
    /// The generic structure
    Refinery,
    /// The defensive structure
    Turret,
}

impl StructureKind {
    pub fn max_hp(&self) -> i32 {
        match self {
            StructureKind::Base => 300,
            StructureKind::Refinery => 250,
            StructureKind::Turret => 200,
        }
    }

    /// Build cost, or None when the structure cannot be built
    pub fn cost(&self) -> Option<Cost> {
        match self {
            StructureKind::Base => None,
            StructureKind::Refinery => Some(Cost::new(0, 500)),
            StructureKind::Turret => Some(Cost::new(400, 0)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StructureKind::Base => "Base",
            StructureKind::Refinery => "Refinery",
            StructureKind::Turret => "Turret",
        }
    }
}

/// A structure standing on a tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub kind: StructureKind,
    pub hp: i32,
    pub owner: FactionId,
}

impl Building {
    pub fn new(kind: StructureKind, owner: FactionId) -> Self {
        Self {
            kind,
            hp: kind.max_hp(),
            owner,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Harvestable spice deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpiceField {
    pub yield_per_harvest: u32,
    pub remaining: u32,
}

impl SpiceField {
    pub const DEFAULT_YIELD: u32 = 50;
    pub const DEFAULT_QUANTITY: u32 = 1000;

    pub fn new() -> Self {
        Self {
            yield_per_harvest: Self::DEFAULT_YIELD,
            remaining: Self::DEFAULT_QUANTITY,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.remaining == 0
    }

    /// Take one harvest worth of spice, returning the amount taken
    pub fn harvest(&mut self) -> u32 {
        let taken = self.yield_per_harvest.min(self.remaining);
        self.remaining -= taken;
        taken
    }
}

impl Default for SpiceField {
    fn default() -> Self {
        Self::new()
    }
}

/// Sinkhole hazard record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sinkhole {
    pub risk: f32,
}

/// A single hex cell's persistent record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub coord: HexCoord,
    pub terrain: Terrain,
    /// Occupying unit; must agree with that unit's `hex`
    pub unit: Option<UnitId>,
    pub building: Option<Building>,
    pub owner: Option<FactionId>,
    pub sinkhole: bool,
    pub vortex: u32,
    pub visible: bool,
}

impl Tile {
    pub fn new(coord: HexCoord, terrain: Terrain) -> Self {
        Self {
            coord,
            terrain,
            unit: None,
            building: None,
            owner: None,
            sinkhole: false,
            vortex: 0,
            visible: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.unit.is_none()
    }
}
