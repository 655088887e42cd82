//! Weather system
//!
//! A single match-wide weather state. Sandstorms stir vortices on the map and
//! let Fremen units slip into stealth (see `unit::update`).

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::map::grid::HexMap;

/// Chance that a weather change rolls a sandstorm
pub const SANDSTORM_CHANCE: f64 = 0.25;
/// Vortex intensity stirred onto a tile when a sandstorm begins
pub const SANDSTORM_VORTEX_INTENSITY: u32 = 10;
/// Tiles stirred per new sandstorm
pub const SANDSTORM_VORTEX_TILES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    #[default]
    Clear,
    Sandstorm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherState {
    pub kind: WeatherKind,
    pub cycles_left: u32,
}

impl Default for WeatherState {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherState {
    pub fn new() -> Self {
        Self {
            kind: WeatherKind::Clear,
            cycles_left: 60,
        }
    }

    pub fn is_sandstorm(&self) -> bool {
        self.kind == WeatherKind::Sandstorm
    }

    /// Advance one tick. Returns the new kind when the weather changed.
    pub fn update(&mut self, map: &mut HexMap, rng: &mut ChaCha8Rng) -> Option<WeatherKind> {
        for tile in map.tiles_mut() {
            tile.vortex = tile.vortex.saturating_sub(1);
        }

        self.cycles_left = self.cycles_left.saturating_sub(1);
        if self.cycles_left > 0 {
            return None;
        }

        if rng.gen_bool(SANDSTORM_CHANCE) {
            let cycles = rng.gen_range(30..=60);
            self.start_sandstorm(cycles, map, rng);
        } else {
            self.kind = WeatherKind::Clear;
            self.cycles_left = rng.gen_range(60..=120);
        }
        Some(self.kind)
    }

    /// Force a sandstorm of the given length
    pub fn start_sandstorm(&mut self, cycles: u32, map: &mut HexMap, rng: &mut ChaCha8Rng) {
        self.kind = WeatherKind::Sandstorm;
        self.cycles_left = cycles;
        stir_vortices(map, rng);
    }
}

fn stir_vortices(map: &mut HexMap, rng: &mut ChaCha8Rng) {
    let coords: Vec<_> = map.tiles().map(|t| t.coord).collect();
    if coords.is_empty() {
        return;
    }
    for _ in 0..SANDSTORM_VORTEX_TILES {
        let coord = coords[rng.gen_range(0..coords.len())];
        if let Some(tile) = map.get_mut(coord) {
            tile.vortex = SANDSTORM_VORTEX_INTENSITY;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_weather_counts_down() {
        let mut map = HexMap::open(5, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut weather = WeatherState {
            kind: WeatherKind::Clear,
            cycles_left: 3,
        };

        assert_eq!(weather.update(&mut map, &mut rng), None);
        assert_eq!(weather.cycles_left, 2);
        assert_eq!(weather.update(&mut map, &mut rng), None);
        assert!(weather.update(&mut map, &mut rng).is_some());
        assert!(weather.cycles_left >= 30);
    }

    #[test]
    fn test_sandstorm_stirs_and_vortex_decays() {
        let mut map = HexMap::open(5, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut weather = WeatherState::new();

        weather.start_sandstorm(40, &mut map, &mut rng);
        assert!(weather.is_sandstorm());
        let stirred: u32 = map.tiles().map(|t| t.vortex).max().unwrap();
        assert_eq!(stirred, SANDSTORM_VORTEX_INTENSITY);

        for _ in 0..SANDSTORM_VORTEX_INTENSITY {
            weather.update(&mut map, &mut rng);
        }
        assert!(map.tiles().all(|t| t.vortex == 0));
    }
}
