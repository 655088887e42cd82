pub mod config;
pub mod error;
pub mod types;

pub use config::{BiomeMix, GameMode, HazardDensity, MapSize, MatchConfig};
pub use error::{SimError, SimResult};
pub use types::{MatchId, Tick, UnitId, WormId};
