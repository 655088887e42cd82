//! Dune Hegemony - hex-grid real-time strategy simulation on Arrakis
//!
//! The crate is a headless engine: a `GameState` advanced by `tick()`,
//! driven by `issue_*` commands and read back through query views.

pub mod ai;
pub mod campaign;
pub mod core;
pub mod faction;
pub mod map;
pub mod pathfinding;
pub mod simulation;
pub mod unit;

pub use crate::core::config::MatchConfig;
pub use crate::core::error::{SimError, SimResult};
pub use crate::simulation::state::GameState;
