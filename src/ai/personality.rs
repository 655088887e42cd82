//! AI personalities and difficulty presets
//!
//! Personality picks what an AI buys when it is rich; difficulty scales how
//! eagerly it spends (aggression) and how far it plans (foresight).

use serde::{Deserialize, Serialize};

/// Spending style of an AI faction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    /// Builds turrets around its base
    Defensive,
    /// Buys troopers in bulk
    Swarm,
    /// Buys elites and always expands
    Strategic,
    /// Gambles on random events
    Opportunist,
    #[default]
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Numeric knobs derived from difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiProfile {
    /// Multiplies spending thresholds and threat estimates
    pub aggression: f32,
    pub foresight: u32,
}

impl Default for AiProfile {
    fn default() -> Self {
        Difficulty::default().profile()
    }
}

impl Difficulty {
    pub fn profile(&self) -> AiProfile {
        match self {
            Difficulty::Easy => AiProfile {
                aggression: 0.8,
                foresight: 1,
            },
            Difficulty::Medium => AiProfile {
                aggression: 1.0,
                foresight: 2,
            },
            Difficulty::Hard => AiProfile {
                aggression: 1.25,
                foresight: 3,
            },
        }
    }
}

impl AiProfile {
    /// Spice balance above which the AI spends on its personality purchase
    pub fn spice_threshold(&self) -> f32 {
        4000.0 * self.aggression
    }

    /// Solaris balance above which the AI builds a refinery
    pub fn solaris_threshold(&self) -> f32 {
        2000.0 * self.aggression
    }

    /// Owned spice fields below which the AI keeps expanding
    pub fn expansion_target(&self) -> f32 {
        15.0 * self.aggression
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_profiles() {
        assert_eq!(Difficulty::Easy.profile().aggression, 0.8);
        assert_eq!(Difficulty::Medium.profile().foresight, 2);
        assert_eq!(Difficulty::Hard.profile().aggression, 1.25);
    }

    #[test]
    fn test_thresholds_scale_with_aggression() {
        let hard = Difficulty::Hard.profile();
        assert_eq!(hard.spice_threshold(), 5000.0);
        assert_eq!(hard.solaris_threshold(), 2500.0);
        assert_eq!(Difficulty::Medium.profile().expansion_target(), 15.0);
    }

    #[test]
    fn test_personality_serde_names() {
        let parsed: Personality = serde_json::from_str("\"opportunist\"").unwrap();
        assert_eq!(parsed, Personality::Opportunist);
        assert_eq!(Personality::default(), Personality::Balanced);
    }
}
