//! Houses and faction identity

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::faction::economy::Meter;

/// The five great houses
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum House {
    Atreides,
    Harkonnen,
    Fremen,
    #[display(fmt = "Spacing Guild")]
    SpacingGuild,
    #[display(fmt = "Bene Gesserit")]
    BeneGesserit,
}

impl Default for House {
    fn default() -> Self {
        Self::Atreides
    }
}

/// Where a house's superweapon gate is read from and paid out of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateSource {
    /// The faction economy record
    Faction,
    /// The casting unit's own reserve
    Unit,
}

impl House {
    pub fn all() -> [House; 5] {
        [
            House::Atreides,
            House::Harkonnen,
            House::Fremen,
            House::SpacingGuild,
            House::BeneGesserit,
        ]
    }

    /// The house-exclusive meter
    pub fn meter(&self) -> Meter {
        match self {
            House::Atreides => Meter::Choam,
            House::Harkonnen => Meter::Fear,
            House::Fremen => Meter::Faith,
            House::SpacingGuild => Meter::Favor,
            House::BeneGesserit => Meter::Will,
        }
    }

    /// Meter credited to the killer's faction for each enemy killed
    pub fn kill_reward(&self) -> u32 {
        match self {
            House::Atreides => 25,
            House::Harkonnen => 30,
            House::Fremen => 20,
            House::SpacingGuild => 25,
            House::BeneGesserit => 30,
        }
    }

    pub fn gate_source(&self) -> GateSource {
        match self {
            House::Atreides | House::BeneGesserit => GateSource::Faction,
            House::Harkonnen | House::Fremen | House::SpacingGuild => GateSource::Unit,
        }
    }

    /// Name of the house's elite unit
    pub fn elite_name(&self) -> &'static str {
        match self {
            House::Atreides => "Swordmaster",
            House::Harkonnen => "Sardaukar Legion",
            House::Fremen => "Fedaykin",
            House::SpacingGuild => "Guild Escort",
            House::BeneGesserit => "Truthsayer",
        }
    }

    /// Houses other than `self`, in declaration order
    pub fn others(&self) -> Vec<House> {
        House::all().into_iter().filter(|h| h != self).collect()
    }
}

/// Faction identity: the human player, co-op slots and AI slots
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FactionId {
    #[display(fmt = "player")]
    Player,
    #[display(fmt = "coop{}", _0)]
    Coop(u8),
    #[display(fmt = "ai{}", _0)]
    Ai(u8),
}

impl FactionId {
    /// Player and co-op slots share a side
    pub fn is_human_side(&self) -> bool {
        match self {
            FactionId::Player | FactionId::Coop(_) => true,
            FactionId::Ai(_) => false,
        }
    }

    pub fn is_hostile_to(&self, other: &FactionId) -> bool {
        self.is_human_side() != other.is_human_side()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kill_rewards() {
        assert_eq!(House::Atreides.kill_reward(), 25);
        assert_eq!(House::Harkonnen.kill_reward(), 30);
        assert_eq!(House::Fremen.kill_reward(), 20);
        assert_eq!(House::SpacingGuild.kill_reward(), 25);
        assert_eq!(House::BeneGesserit.kill_reward(), 30);
    }

    #[test]
    fn test_gate_source_asymmetry() {
        assert_eq!(House::Atreides.gate_source(), GateSource::Faction);
        assert_eq!(House::BeneGesserit.gate_source(), GateSource::Faction);
        assert_eq!(House::Harkonnen.gate_source(), GateSource::Unit);
        assert_eq!(House::Fremen.gate_source(), GateSource::Unit);
        assert_eq!(House::SpacingGuild.gate_source(), GateSource::Unit);
    }

    #[test]
    fn test_hostility() {
        assert!(!FactionId::Player.is_hostile_to(&FactionId::Coop(0)));
        assert!(FactionId::Player.is_hostile_to(&FactionId::Ai(1)));
        assert!(!FactionId::Ai(0).is_hostile_to(&FactionId::Ai(1)));
        assert!(FactionId::Coop(2).is_hostile_to(&FactionId::Ai(0)));
    }

    #[test]
    fn test_faction_display() {
        assert_eq!(FactionId::Player.to_string(), "player");
        assert_eq!(FactionId::Coop(1).to_string(), "coop1");
        assert_eq!(FactionId::Ai(2).to_string(), "ai2");
        assert_eq!(House::BeneGesserit.to_string(), "Bene Gesserit");
    }

    #[test]
    fn test_others_excludes_self() {
        let others = House::Fremen.others();
        assert_eq!(others.len(), 4);
        assert!(!others.contains(&House::Fremen));
    }
}
