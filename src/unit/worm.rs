//! Sandworms: wild worms and the Fremen great maker

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::WormId;
use crate::faction::house::FactionId;
use crate::map::hex::HexCoord;
use crate::simulation::events::EventKind;
use crate::simulation::state::GameState;

/// Ticks between two bites of the same worm
pub const BITE_COOLDOWN: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worm {
    pub id: WormId,
    pub hp: i32,
    pub max_hp: i32,
    pub damage: i32,
    /// Hexes travelled per tick
    pub speed: u32,
    pub hex: HexCoord,
    /// Side the worm fights for; wild worms attack everyone
    pub ally: Option<FactionId>,
    pub bite_cooldown: u32,
}

impl Worm {
    /// Summoned by the Fremen superweapon
    pub fn great_maker(hex: HexCoord, ally: FactionId) -> Self {
        Self {
            id: WormId(0),
            hp: 800,
            max_hp: 800,
            damage: 400,
            speed: 3,
            hex,
            ally: Some(ally),
            bite_cooldown: 0,
        }
    }

    pub fn wild(hex: HexCoord) -> Self {
        Self {
            id: WormId(0),
            hp: 400,
            max_hp: 400,
            damage: 100,
            speed: 2,
            hex,
            ally: None,
            bite_cooldown: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_great_maker(&self) -> bool {
        self.ally.is_some()
    }

    /// True when the worm will not bite `faction`
    pub fn is_allied_with(&self, faction: FactionId) -> bool {
        self.ally.is_some_and(|a| !a.is_hostile_to(&faction))
    }

    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }
}

/// Advance every worm: close on the nearest non-allied unit, bite when adjacent
pub fn update_worms(state: &mut GameState) {
    let ids: Vec<WormId> = state.worms.keys().copied().collect();
    for id in ids {
        let Some(worm) = state.worms.get(&id) else {
            continue;
        };
        let prey = state
            .units
            .iter()
            .filter(|u| u.is_alive() && !worm.is_allied_with(u.faction))
            .min_by_key(|u| (worm.hex.distance(&u.hex), u.id))
            .map(|u| (u.id, u.hex));

        let Some(worm) = state.worms.get_mut(&id) else {
            continue;
        };
        worm.bite_cooldown = worm.bite_cooldown.saturating_sub(1);
        let Some((prey_id, prey_hex)) = prey else {
            continue;
        };

        for _ in 0..worm.speed {
            if worm.hex.distance(&prey_hex) <= 1 {
                break;
            }
            let next = worm.hex.step_toward(&prey_hex);
            if !state.map.contains(next) {
                break;
            }
            worm.hex = next;
        }

        if worm.hex.distance(&prey_hex) > 1 || worm.bite_cooldown > 0 {
            continue;
        }
        worm.bite_cooldown = BITE_COOLDOWN;
        let (damage, ally) = (worm.damage, worm.ally);

        if let Some(unit) = state.units.get_mut(prey_id) {
            unit.take_damage(damage, ally);
            debug!(worm = %id, unit = %prey_id, damage, "worm bite");
        }
        state.emit(EventKind::WormBite {
            worm: id,
            unit: prey_id,
            damage,
        });
    }
}
