//! The hex map: tiles in a dense (q, r) slot array plus the spice-field and
//! hazard registries.
//!
//! Slots for coordinates that generation never visited stay `None`, so lookups
//! distinguish "outside the map" from "inside the box but never generated".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{SimError, SimResult};
use crate::map::hex::HexCoord;
use crate::map::tile::{Building, Sinkhole, SpiceField, Terrain, Tile};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HexMap {
    pub width: u32,
    pub height: u32,
    slots: Vec<Option<Tile>>,
    spice_fields: BTreeMap<HexCoord, SpiceField>,
    sinkholes: BTreeMap<HexCoord, Sinkhole>,
}

impl HexMap {
    /// Create an empty map; every slot is ungenerated
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            slots: vec![None; (width * height) as usize],
            spice_fields: BTreeMap::new(),
            sinkholes: BTreeMap::new(),
        }
    }

    /// Create a map fully filled with sand
    pub fn open(width: u32, height: u32) -> Self {
        let mut map = Self::new(width, height);
        for q in 0..width as i32 {
            for r in 0..height as i32 {
                let coord = HexCoord::new(q, r);
                if let Some(index) = map.index(coord) {
                    map.slots[index] = Some(Tile::new(coord, Terrain::Sand));
                }
            }
        }
        map
    }

    fn index(&self, coord: HexCoord) -> Option<usize> {
        self.in_bounds(coord)
            .then(|| (coord.q as u32 * self.height + coord.r as u32) as usize)
    }

    /// Check if coordinate is within the bounding box
    pub fn in_bounds(&self, coord: HexCoord) -> bool {
        coord.q >= 0
            && coord.r >= 0
            && coord.q < self.width as i32
            && coord.r < self.height as i32
    }

    /// Add (or replace) the tile at `coord`
    ///
    /// Replacing drops the old tile's spice field and sinkhole entries. An
    /// occupied tile cannot be replaced.
    pub fn add_tile(
        &mut self,
        coord: HexCoord,
        terrain: Terrain,
        building: Option<Building>,
    ) -> SimResult<()> {
        let index = self
            .index(coord)
            .ok_or(SimError::InvalidCoordinate(coord))?;
        if self.slots[index].as_ref().is_some_and(|t| t.unit.is_some()) {
            return Err(SimError::Occupied(coord));
        }
        self.spice_fields.remove(&coord);
        self.sinkholes.remove(&coord);
        let mut tile = Tile::new(coord, terrain);
        if let Some(building) = building {
            tile.owner = Some(building.owner);
            tile.building = Some(building);
        }
        self.slots[index] = Some(tile);
        Ok(())
    }

    pub fn get(&self, coord: HexCoord) -> Option<&Tile> {
        self.index(coord).and_then(|i| self.slots[i].as_ref())
    }

    pub fn get_mut(&mut self, coord: HexCoord) -> Option<&mut Tile> {
        let index = self.index(coord)?;
        self.slots[index].as_mut()
    }

    /// Tile lookup that fails for never-generated coordinates
    pub fn tile_at(&self, coord: HexCoord) -> SimResult<&Tile> {
        self.get(coord).ok_or(SimError::InvalidCoordinate(coord))
    }

    pub fn tile_at_mut(&mut self, coord: HexCoord) -> SimResult<&mut Tile> {
        self.get_mut(coord).ok_or(SimError::InvalidCoordinate(coord))
    }

    pub fn contains(&self, coord: HexCoord) -> bool {
        self.get(coord).is_some()
    }

    /// Iterate over all generated tiles in (q, r) order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.slots.iter().flatten()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.slots.iter_mut().flatten()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// Generated tiles within `range` of `center`
    pub fn tiles_in_range(&self, center: HexCoord, range: u32) -> Vec<HexCoord> {
        center
            .hexes_in_range(range)
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }

    /// Nearest generated tile to `center` with no unit, building or sinkhole
    pub fn free_hex_near(&self, center: HexCoord, max_range: u32) -> Option<HexCoord> {
        let mut candidates: Vec<HexCoord> = self
            .tiles_in_range(center, max_range)
            .into_iter()
            .filter(|c| {
                self.get(*c)
                    .is_some_and(|t| t.unit.is_none() && t.building.is_none() && !t.sinkhole)
            })
            .collect();
        candidates.sort_by_key(|c| (center.distance(c), *c));
        candidates.first().copied()
    }

    // === Spice fields ===

    pub fn add_spice_field(&mut self, coord: HexCoord, field: SpiceField) -> SimResult<()> {
        let tile = self.tile_at_mut(coord)?;
        tile.terrain = Terrain::Spice;
        self.spice_fields.insert(coord, field);
        Ok(())
    }

    pub fn spice_field(&self, coord: HexCoord) -> Option<&SpiceField> {
        self.spice_fields.get(&coord)
    }

    pub fn spice_field_mut(&mut self, coord: HexCoord) -> Option<&mut SpiceField> {
        self.spice_fields.get_mut(&coord)
    }

    pub fn spice_fields(&self) -> impl Iterator<Item = (&HexCoord, &SpiceField)> {
        self.spice_fields.iter()
    }

    /// Coordinates of fields that still hold spice
    pub fn live_spice_fields(&self) -> Vec<HexCoord> {
        self.spice_fields
            .iter()
            .filter(|(_, f)| !f.is_spent())
            .map(|(c, _)| *c)
            .collect()
    }

    // === Hazards ===

    /// Place a sinkhole, keeping the tile flag and the registry in sync
    pub fn set_sinkhole(&mut self, coord: HexCoord, risk: f32) -> SimResult<()> {
        self.tile_at_mut(coord)?.sinkhole = true;
        self.sinkholes.insert(coord, Sinkhole { risk });
        Ok(())
    }

    pub fn clear_sinkhole(&mut self, coord: HexCoord) -> Option<Sinkhole> {
        if let Some(tile) = self.get_mut(coord) {
            tile.sinkhole = false;
        }
        self.sinkholes.remove(&coord)
    }

    pub fn is_sinkhole(&self, coord: HexCoord) -> bool {
        self.get(coord).is_some_and(|t| t.sinkhole)
    }

    pub fn sinkholes(&self) -> impl Iterator<Item = (&HexCoord, &Sinkhole)> {
        self.sinkholes.iter()
    }

    pub fn sinkhole_count(&self) -> usize {
        self.sinkholes.len()
    }
}
