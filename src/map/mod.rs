//! Map layer - hex coordinates, tiles, procedural generation and weather

pub mod generation;
pub mod grid;
pub mod hex;
pub mod tile;
pub mod weather;

pub use generation::{generate_map, random_open_sand, sample_terrain, spice_blow};
pub use grid::HexMap;
pub use hex::{HexCoord, HexDirection};
pub use tile::{Building, Sinkhole, SpiceField, StructureKind, Terrain, Tile};
pub use weather::{WeatherKind, WeatherState};
