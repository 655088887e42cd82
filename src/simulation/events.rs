//! Events emitted during a tick
//!
//! Events are collected on the `GameState` and drained by the caller after
//! each tick or command. Presentation layers can map the attached sound cue
//! to audio; the simulation never plays anything itself.

use serde::{Deserialize, Serialize};

use crate::campaign::mission::MissionStatus;
use crate::core::types::{Tick, UnitId, WormId};
use crate::faction::house::{FactionId, House};
use crate::map::hex::HexCoord;
use crate::map::tile::StructureKind;
use crate::map::weather::WeatherKind;
use crate::simulation::state::MatchStatus;
use crate::unit::kind::UnitKind;
use crate::unit::unit::Target;

/// Audio cues a front-end may play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Select,
    Move,
    Attack,
    Build,
    Victory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    SelectionChanged {
        count: usize,
    },
    MoveOrdered {
        unit: UnitId,
        to: HexCoord,
    },
    Folded {
        unit: UnitId,
        from: HexCoord,
        to: HexCoord,
    },
    AttackOrdered {
        unit: UnitId,
        target: Target,
    },
    AttackResolved {
        attacker: UnitId,
        target: Target,
        damage: i32,
    },
    UnitSpawned {
        unit: UnitId,
        faction: FactionId,
        kind: UnitKind,
        at: HexCoord,
    },
    UnitKilled {
        unit: UnitId,
        faction: FactionId,
        /// Faction paid at removal; None when the killer was already paid
        credited: Option<FactionId>,
    },
    UnitConverted {
        unit: UnitId,
        from: FactionId,
        to: FactionId,
    },
    BuildingPlaced {
        faction: FactionId,
        kind: StructureKind,
        at: HexCoord,
    },
    BuildingDestroyed {
        kind: StructureKind,
        at: HexCoord,
        owner: FactionId,
    },
    SuperweaponFired {
        unit: UnitId,
        house: House,
        at: HexCoord,
    },
    WormSpawned {
        worm: WormId,
        at: HexCoord,
        great_maker: bool,
    },
    WormBite {
        worm: WormId,
        unit: UnitId,
        damage: i32,
    },
    WormKilled {
        worm: WormId,
        by: FactionId,
    },
    SinkholeTriggered {
        unit: UnitId,
        at: HexCoord,
    },
    SpiceBlow {
        at: HexCoord,
    },
    WeatherChanged {
        kind: WeatherKind,
    },
    MissionResolved {
        key: String,
        status: MissionStatus,
    },
    MatchEnded {
        status: MatchStatus,
    },
}

impl EventKind {
    pub fn cue(&self) -> Option<SoundCue> {
        match self {
            EventKind::SelectionChanged { .. } => Some(SoundCue::Select),
            EventKind::MoveOrdered { .. } | EventKind::Folded { .. } => Some(SoundCue::Move),
            EventKind::AttackOrdered { .. } => Some(SoundCue::Attack),
            EventKind::BuildingPlaced { .. } | EventKind::UnitSpawned { .. } => {
                Some(SoundCue::Build)
            }
            EventKind::MissionResolved {
                status: MissionStatus::Succeeded,
                ..
            }
            | EventKind::MatchEnded {
                status: MatchStatus::Victory,
            } => Some(SoundCue::Victory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub tick: Tick,
    #[serde(flatten)]
    pub kind: EventKind,
    pub cue: Option<SoundCue>,
}

impl GameEvent {
    pub fn new(tick: Tick, kind: EventKind) -> Self {
        let cue = kind.cue();
        Self { tick, kind, cue }
    }
}
