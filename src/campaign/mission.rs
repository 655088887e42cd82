//! Campaign missions
//!
//! Ten missions with fixed cycle limits and goal sets. Progress is evaluated
//! once per tick against the match tally and human spice control.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::error::{SimError, SimResult};
use crate::simulation::state::Tally;

/// Mission-specific AI behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionHook {
    /// AI summons wild worms periodically
    WormSummons,
    /// Bene Gesserit AI units may speak the Voice
    Voice,
    /// AI fortifies as the human side nears the spice goal
    GoldenPath,
}

/// Declared goals; `None` means the goal is not part of the mission
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MissionGoals {
    /// Required fraction of spice fields held by the human side
    pub spice_control: Option<f32>,
    pub worms_killed: Option<u32>,
    pub bases_destroyed: Option<u32>,
    pub units_controlled: Option<u32>,
}

impl MissionGoals {
    const NONE: MissionGoals = MissionGoals {
        spice_control: None,
        worms_killed: None,
        bases_destroyed: None,
        units_controlled: None,
    };

    /// Every declared goal is reached
    pub fn met(&self, tally: &Tally, spice_control: f32) -> bool {
        self.spice_control.map_or(true, |g| spice_control >= g)
            && self.worms_killed.map_or(true, |g| tally.worms_killed >= g)
            && self.bases_destroyed.map_or(true, |g| tally.bases_destroyed >= g)
            && self.units_controlled.map_or(true, |g| tally.units_controlled >= g)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MissionDef {
    pub key: &'static str,
    pub title: &'static str,
    pub cycles: u32,
    pub goals: MissionGoals,
    pub hook: Option<MissionHook>,
}

pub const MISSIONS: [MissionDef; 10] = [
    MissionDef {
        key: "arrakis_dawn",
        title: "Arrakis Dawn",
        cycles: 1500,
        goals: MissionGoals {
            spice_control: Some(0.25),
            ..MissionGoals::NONE
        },
        hook: None,
    },
    MissionDef {
        key: "spice_must_flow",
        title: "The Spice Must Flow",
        cycles: 1800,
        goals: MissionGoals {
            spice_control: Some(0.4),
            ..MissionGoals::NONE
        },
        hook: None,
    },
    MissionDef {
        key: "desert_power",
        title: "Desert Power",
        cycles: 2000,
        goals: MissionGoals {
            bases_destroyed: Some(1),
            ..MissionGoals::NONE
        },
        hook: None,
    },
    MissionDef {
        key: "worms_of_destiny",
        title: "Worms of Destiny",
        cycles: 2000,
        goals: MissionGoals {
            worms_killed: Some(3),
            ..MissionGoals::NONE
        },
        hook: Some(MissionHook::WormSummons),
    },
    MissionDef {
        key: "voice_of_the_sisterhood",
        title: "Voice of the Sisterhood",
        cycles: 2200,
        goals: MissionGoals {
            units_controlled: Some(5),
            ..MissionGoals::NONE
        },
        hook: Some(MissionHook::Voice),
    },
    MissionDef {
        key: "kanly",
        title: "Kanly",
        cycles: 2200,
        goals: MissionGoals {
            bases_destroyed: Some(1),
            spice_control: Some(0.3),
            ..MissionGoals::NONE
        },
        hook: None,
    },
    MissionDef {
        key: "water_of_life",
        title: "The Water of Life",
        cycles: 2400,
        goals: MissionGoals {
            spice_control: Some(0.5),
            worms_killed: Some(1),
            ..MissionGoals::NONE
        },
        hook: None,
    },
    MissionDef {
        key: "guild_compact",
        title: "Guild Compact",
        cycles: 2400,
        goals: MissionGoals {
            spice_control: Some(0.5),
            ..MissionGoals::NONE
        },
        hook: None,
    },
    MissionDef {
        key: "great_convention",
        title: "The Great Convention",
        cycles: 2600,
        goals: MissionGoals {
            bases_destroyed: Some(2),
            units_controlled: Some(3),
            ..MissionGoals::NONE
        },
        hook: None,
    },
    MissionDef {
        key: "golden_path",
        title: "The Golden Path",
        cycles: 3000,
        goals: MissionGoals {
            spice_control: Some(0.75),
            ..MissionGoals::NONE
        },
        hook: Some(MissionHook::GoldenPath),
    },
];

/// Mission for a 1-based campaign level
pub fn mission_for_level(level: u8) -> Option<&'static MissionDef> {
    (level as usize).checked_sub(1).and_then(|i| MISSIONS.get(i))
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    #[display(fmt = "active")]
    Active,
    #[display(fmt = "succeeded")]
    Succeeded,
    #[display(fmt = "failed")]
    Failed,
}

/// A running mission
#[derive(Debug, Clone, Serialize)]
pub struct MissionProgress {
    def: &'static MissionDef,
    pub cycles_left: u32,
    pub status: MissionStatus,
}

impl MissionProgress {
    pub fn new(level: u8) -> SimResult<Self> {
        let def = mission_for_level(level)
            .ok_or_else(|| SimError::Config(format!("no mission for campaign level {level}")))?;
        Ok(Self {
            def,
            cycles_left: def.cycles,
            status: MissionStatus::Active,
        })
    }

    pub fn def(&self) -> &'static MissionDef {
        self.def
    }

    pub fn is_active(&self) -> bool {
        self.status == MissionStatus::Active
    }

    /// Advance one cycle. Returns the final status on the tick it resolves.
    ///
    /// Goals only count while cycles remain: the cycle that empties the
    /// counter fails the mission even if the goals are met on it.
    pub fn evaluate(&mut self, tally: &Tally, spice_control: f32) -> Option<MissionStatus> {
        if !self.is_active() {
            return None;
        }
        self.cycles_left = self.cycles_left.saturating_sub(1);

        if self.cycles_left == 0 {
            self.status = MissionStatus::Failed;
        } else if self.def.goals.met(tally, spice_control) {
            self.status = MissionStatus::Succeeded;
        } else {
            return None;
        }
        Some(self.status)
    }

    /// Localization key for the text matching the current status
    pub fn narrative_key(&self) -> String {
        let part = match self.status {
            MissionStatus::Active => "briefing",
            MissionStatus::Succeeded => "victory",
            MissionStatus::Failed => "defeat",
        };
        format!("mission.{}.{}", self.def.key, part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_lookup() {
        assert_eq!(mission_for_level(1).unwrap().key, "arrakis_dawn");
        assert_eq!(mission_for_level(10).unwrap().key, "golden_path");
        assert!(mission_for_level(0).is_none());
        assert!(mission_for_level(11).is_none());
        assert!(MissionProgress::new(11).is_err());
    }

    #[test]
    fn test_cycle_limits_ascend() {
        let cycles: Vec<u32> = MISSIONS.iter().map(|m| m.cycles).collect();
        assert_eq!(
            cycles,
            vec![1500, 1800, 2000, 2000, 2200, 2200, 2400, 2400, 2600, 3000]
        );
    }

    #[test]
    fn test_all_goals_required() {
        let mut mission = MissionProgress::new(6).unwrap();
        let mut tally = Tally::default();

        assert_eq!(mission.evaluate(&tally, 0.5), None);
        tally.bases_destroyed = 1;
        assert_eq!(mission.evaluate(&tally, 0.29), None);
        assert_eq!(
            mission.evaluate(&tally, 0.3),
            Some(MissionStatus::Succeeded)
        );
        assert_eq!(mission.narrative_key(), "mission.kanly.victory");
        assert_eq!(mission.evaluate(&tally, 0.3), None);
    }

    #[test]
    fn test_mission_fails_when_cycles_run_out() {
        let mut mission = MissionProgress::new(1).unwrap();
        let tally = Tally::default();
        assert_eq!(mission.narrative_key(), "mission.arrakis_dawn.briefing");

        for _ in 0..1499 {
            assert_eq!(mission.evaluate(&tally, 0.0), None);
        }
        assert_eq!(mission.evaluate(&tally, 0.0), Some(MissionStatus::Failed));
        assert_eq!(mission.cycles_left, 0);
        assert_eq!(mission.narrative_key(), "mission.arrakis_dawn.defeat");
    }

    #[test]
    fn test_goals_met_on_last_cycle_are_too_late() {
        let tally = Tally {
            bases_destroyed: 1,
            ..Tally::default()
        };

        let mut mission = MissionProgress::new(3).unwrap();
        mission.cycles_left = 2;
        assert_eq!(mission.evaluate(&tally, 0.0), Some(MissionStatus::Succeeded));
        assert_eq!(mission.cycles_left, 1);

        let mut mission = MissionProgress::new(3).unwrap();
        mission.cycles_left = 1;
        assert_eq!(mission.evaluate(&tally, 0.0), Some(MissionStatus::Failed));
        assert_eq!(mission.cycles_left, 0);
    }

    #[test]
    fn test_hooks() {
        assert_eq!(
            mission_for_level(4).unwrap().hook,
            Some(MissionHook::WormSummons)
        );
        assert_eq!(mission_for_level(5).unwrap().hook, Some(MissionHook::Voice));
        assert_eq!(mission_for_level(1).unwrap().hook, None);
    }
}
