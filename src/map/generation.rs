//! Procedural map generation
//!
//! Pass 1 scatters spice tiles; pass 2 fills the rest of the bounding box from
//! the biome mix. Sinkholes are then seeded on plain sand.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::{BiomeMix, MatchConfig};
use crate::map::grid::HexMap;
use crate::map::hex::HexCoord;
use crate::map::tile::{SpiceField, Terrain};

/// Generate the match map
pub fn generate_map(config: &MatchConfig, rng: &mut ChaCha8Rng) -> HexMap {
    let (width, height) = config.map_size.dimensions();
    let mut map = HexMap::new(width, height);

    scatter_spice(&mut map, config.map_size.spice_tile_count(), rng);
    fill_terrain(&mut map, &config.biome, rng);
    seed_sinkholes(&mut map, config.hazard_density.sinkhole_chance(), rng);

    tracing::debug!(
        width,
        height,
        spice_fields = map.live_spice_fields().len(),
        sinkholes = map.sinkhole_count(),
        "Generated map"
    );
    map
}

fn scatter_spice(map: &mut HexMap, count: usize, rng: &mut ChaCha8Rng) {
    let capacity = (map.width * map.height) as usize;
    let target = count.min(capacity);
    let mut placed = 0;

    while placed < target {
        let coord = HexCoord::new(
            rng.gen_range(0..map.width as i32),
            rng.gen_range(0..map.height as i32),
        );
        if map.contains(coord) {
            continue;
        }
        if map.add_tile(coord, Terrain::Spice, None).is_ok()
            && map.add_spice_field(coord, SpiceField::new()).is_ok()
        {
            placed += 1;
        }
    }
}

/// Cumulative-probability bucketing over sand/rock/crater
pub fn sample_terrain(biome: &BiomeMix, roll: f32) -> Terrain {
    let buckets = [
        (Terrain::Sand, biome.sand),
        (Terrain::Rock, biome.rock),
        (Terrain::Crater, biome.crater),
    ];

    let mut cumulative = 0.0;
    for (terrain, p) in buckets {
        cumulative += p;
        if roll < cumulative {
            return terrain;
        }
    }
    Terrain::Sand
}

fn fill_terrain(map: &mut HexMap, biome: &BiomeMix, rng: &mut ChaCha8Rng) {
    for q in 0..map.width as i32 {
        for r in 0..map.height as i32 {
            let coord = HexCoord::new(q, r);
            if map.contains(coord) {
                continue;
            }
            let terrain = sample_terrain(biome, rng.gen::<f32>());
            // Coordinates come from the bounding box, so this cannot fail
            let _ = map.add_tile(coord, terrain, None);
        }
    }
}

fn seed_sinkholes(map: &mut HexMap, chance: f32, rng: &mut ChaCha8Rng) {
    let sand: Vec<HexCoord> = map
        .tiles()
        .filter(|t| t.terrain == Terrain::Sand)
        .map(|t| t.coord)
        .collect();

    for coord in sand {
        if rng.gen::<f32>() < chance {
            let risk = rng.gen_range(0.1..1.0);
            let _ = map.set_sinkhole(coord, risk);
        }
    }
}

/// Pick a random plain-sand tile with no unit, building or sinkhole
pub fn random_open_sand(map: &HexMap, rng: &mut ChaCha8Rng) -> Option<HexCoord> {
    let candidates: Vec<HexCoord> = map
        .tiles()
        .filter(|t| {
            t.terrain == Terrain::Sand && t.unit.is_none() && t.building.is_none() && !t.sinkhole
        })
        .map(|t| t.coord)
        .collect();

    if candidates.is_empty() {
        None
    } else {
        Some(candidates[rng.gen_range(0..candidates.len())])
    }
}

/// A spice blow: a fresh field erupts on a random open sand tile
pub fn spice_blow(map: &mut HexMap, rng: &mut ChaCha8Rng) -> Option<HexCoord> {
    let coord = random_open_sand(map, rng)?;
    map.add_spice_field(coord, SpiceField::new()).ok()?;
    Some(coord)
}
