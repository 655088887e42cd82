//! Campaign layer - the ten-mission sequence

pub mod mission;

pub use mission::{
    mission_for_level, MissionDef, MissionGoals, MissionHook, MissionProgress, MissionStatus,
    MISSIONS,
};
