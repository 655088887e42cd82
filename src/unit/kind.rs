//! Unit archetypes and their stat table

use serde::{Deserialize, Serialize};

use crate::faction::economy::Cost;
use crate::faction::house::House;

/// Unit archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Cheap swarm unit
    Trooper,
    /// Basic line unit
    Infantry,
    /// House elite; carries the house superweapon
    Elite,
}

/// Base stats for an archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStats {
    pub max_hp: i32,
    pub damage: i32,
    /// Movement budget granted with each new move order
    pub move_points: u32,
    pub range: u32,
    pub cost: Cost,
}

impl UnitKind {
    pub fn stats(&self) -> UnitStats {
        match self {
            UnitKind::Trooper => UnitStats {
                max_hp: 60,
                damage: 10,
                move_points: 6,
                range: 1,
                cost: Cost::new(50, 0),
            },
            UnitKind::Infantry => UnitStats {
                max_hp: 100,
                damage: 20,
                move_points: 5,
                range: 1,
                cost: Cost::new(200, 0),
            },
            UnitKind::Elite => UnitStats {
                max_hp: 250,
                damage: 45,
                move_points: 4,
                range: 2,
                cost: Cost::new(680, 340),
            },
        }
    }

    pub fn cost(&self) -> Cost {
        self.stats().cost
    }

    pub fn carries_superweapon(&self) -> bool {
        matches!(self, UnitKind::Elite)
    }

    /// Display name, flavoured by house
    pub fn display_name(&self, house: House) -> String {
        match self {
            UnitKind::Trooper => format!("{house} Trooper"),
            UnitKind::Infantry => format!("{house} Infantry"),
            UnitKind::Elite => house.elite_name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elite_price_matches_coop_rule() {
        assert_eq!(UnitKind::Elite.cost(), Cost::new(680, 340));
    }

    #[test]
    fn test_only_elite_carries_superweapon() {
        assert!(UnitKind::Elite.carries_superweapon());
        assert!(!UnitKind::Infantry.carries_superweapon());
        assert!(!UnitKind::Trooper.carries_superweapon());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(UnitKind::Elite.display_name(House::Fremen), "Fedaykin");
        assert_eq!(
            UnitKind::Trooper.display_name(House::SpacingGuild),
            "Spacing Guild Trooper"
        );
    }
}
