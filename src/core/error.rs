use thiserror::Error;

use crate::map::hex::HexCoord;

/// Recoverable simulation errors.
///
/// Every `issue_*` command returns one of these on rejection, and a rejected
/// command leaves the game state untouched.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("No tile at {0}")]
    InvalidCoordinate(HexCoord),

    #[error("Insufficient {resource}: need {needed}, have {available}")]
    InsufficientResources {
        resource: &'static str,
        needed: u32,
        available: u32,
    },

    #[error("Target out of range: distance {distance} > range {range}")]
    OutOfRange { distance: u32, range: u32 },

    #[error("No path from {from} to {to}")]
    NoPath { from: HexCoord, to: HexCoord },

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Ability on cooldown for {remaining} more ticks")]
    OnCooldown { remaining: u32 },

    #[error("Tile {0} is occupied")]
    Occupied(HexCoord),

    #[error("Command not allowed: {0}")]
    NotAllowed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type SimResult<T> = std::result::Result<T, SimError>;
