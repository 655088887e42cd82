//! Match simulation
//!
//! - `state`: the `GameState` and its placement mutators
//! - `commands`: validated player orders
//! - `tick`: the fixed-order per-tick driver
//! - `query`: serializable views for presentation layers
//! - `events`: what happened during a tick, with sound cues
//! - `invariants`: debug consistency checks

pub mod commands;
pub mod events;
pub mod invariants;
pub mod query;
pub mod state;
pub mod tick;

pub use commands::{fold_cooldown, FOLD_COST};
pub use events::{EventKind, GameEvent, SoundCue};
pub use invariants::{check_invariants, InvariantViolation};
pub use query::{FactionView, MatchSnapshot, MissionView, TileView, UnitView, WormView};
pub use state::{ai_base_sites, Faction, GameState, MatchStatus, Tally, PLAYER_BASE};
pub use tick::{BASE_SOLARIS_INCOME, BASE_SPICE_INCOME, HARVEST_INTERVAL, SIGHT_RADIUS};
