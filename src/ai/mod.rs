//! Computer-controlled factions
//!
//! Architecture: trait + data
//! - `FactionController` is the per-tick interface the simulation drives
//! - `AiController` plays opposing AI slots from a personality and difficulty profile
//! - `CoopController` reinforces the human side in co-op matches

pub mod controller;
pub mod coop;
pub mod personality;
pub mod threat;

pub use controller::AiController;
pub use coop::CoopController;
pub use personality::{AiProfile, Difficulty, Personality};
pub use threat::threat_score;

use std::fmt::Debug;

use crate::faction::house::FactionId;
use crate::simulation::state::GameState;

/// A non-human decision maker for one faction
pub trait FactionController: Debug {
    fn faction(&self) -> FactionId;

    /// Run once per tick before unit updates; acts through the command API
    fn process_tick(&mut self, state: &mut GameState);

    /// Latest threat estimate, for controllers that keep one
    fn threat(&self) -> Option<f32> {
        None
    }
}
