//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a live unit. Allocated sequentially so iteration order is stable.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[display(fmt = "unit#{}", _0)]
pub struct UnitId(pub u32);

/// Identifier for a worm
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[display(fmt = "worm#{}", _0)]
pub struct WormId(pub u32);

/// Unique identifier for a match, carried on every tick span
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(pub Uuid);

impl MatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

/// Game tick counter (simulation time unit)
pub type Tick = u64;
