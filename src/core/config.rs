//! Match configuration
//!
//! A `MatchConfig` is consumed once at match start. It can be built in code,
//! loaded from TOML, or assembled from CLI flags by the binary.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::personality::{Difficulty, Personality};
use crate::core::error::{SimError, SimResult};
use crate::faction::house::House;

/// How the match is played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Skirmish,
    Campaign,
    Coop,
}

/// Map bounding box presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl MapSize {
    /// (width, height) in hexes
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            MapSize::Small => (20, 20),
            MapSize::Medium => (30, 30),
            MapSize::Large => (40, 40),
        }
    }

    /// Number of spice tiles scattered in the first generation pass
    pub fn spice_tile_count(&self) -> usize {
        match self {
            MapSize::Small => 12,
            MapSize::Medium => 24,
            MapSize::Large => 40,
        }
    }
}

/// Probability of a sand tile receiving a sinkhole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardDensity {
    Low,
    #[default]
    Medium,
    High,
}

impl HazardDensity {
    pub fn sinkhole_chance(&self) -> f32 {
        match self {
            HazardDensity::Low => 0.05,
            HazardDensity::Medium => 0.10,
            HazardDensity::High => 0.15,
        }
    }
}

/// Terrain probabilities for the second generation pass.
///
/// Residual probability mass (1 - sum) falls back to sand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeMix {
    pub sand: f32,
    pub rock: f32,
    pub crater: f32,
}

impl Default for BiomeMix {
    fn default() -> Self {
        Self {
            sand: 0.6,
            rock: 0.25,
            crater: 0.1,
        }
    }
}

/// Complete match setup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub mode: GameMode,
    /// House played by the human faction
    pub house: House,
    pub ai_count: u8,
    pub difficulty: Difficulty,
    /// Personality per AI slot; slots past the end of the list use `Personality::Balanced`
    pub personalities: Vec<Personality>,
    pub map_size: MapSize,
    pub biome: BiomeMix,
    /// 1-based index into the mission table (campaign mode only)
    pub campaign_level: u8,
    pub hazard_density: HazardDensity,
    pub coop_players: u8,
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Skirmish,
            house: House::Atreides,
            ai_count: 1,
            difficulty: Difficulty::Medium,
            personalities: Vec::new(),
            map_size: MapSize::Small,
            biome: BiomeMix::default(),
            campaign_level: 1,
            hazard_density: HazardDensity::Medium,
            coop_players: 0,
            seed: 42,
        }
    }
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> SimResult<Self> {
        let config: MatchConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Personality for the given AI slot
    pub fn personality_for(&self, slot: u8) -> Personality {
        self.personalities
            .get(slot as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> SimResult<()> {
        if !(1..=4).contains(&self.ai_count) {
            return Err(SimError::Config(format!(
                "ai_count ({}) must be between 1 and 4",
                self.ai_count
            )));
        }

        if self.coop_players > 3 {
            return Err(SimError::Config(format!(
                "coop_players ({}) must be at most 3",
                self.coop_players
            )));
        }

        if self.coop_players > 0 && self.mode != GameMode::Coop {
            return Err(SimError::Config(
                "coop_players requires mode = \"coop\"".into(),
            ));
        }

        if !(1..=10).contains(&self.campaign_level) {
            return Err(SimError::Config(format!(
                "campaign_level ({}) must be between 1 and 10",
                self.campaign_level
            )));
        }

        let BiomeMix { sand, rock, crater } = self.biome;
        for (name, p) in [("sand", sand), ("rock", rock), ("crater", crater)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::Config(format!(
                    "biome.{name} ({p}) must be within [0, 1]"
                )));
            }
        }
        if sand + rock + crater > 1.0 + f32::EPSILON {
            return Err(SimError::Config(format!(
                "biome probabilities sum to {} > 1",
                sand + rock + crater
            )));
        }

        Ok(())
    }
}
