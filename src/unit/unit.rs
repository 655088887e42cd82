//! The unit record

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::types::{UnitId, WormId};
use crate::faction::house::{FactionId, House};
use crate::map::hex::HexCoord;
use crate::unit::kind::UnitKind;

/// Ticks of wind-up set by an attack order
pub const ATTACK_WIND_UP: u32 = 3;

/// What a unit is attacking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Unit(UnitId),
    Worm(WormId),
    Building(HexCoord),
}

/// How a move order is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveMode {
    /// Walk a pathfinder route
    #[default]
    Normal,
    /// Spacing Guild fold: paid instantaneous relocation
    Touch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub kind: UnitKind,
    /// House the unit was raised by; survives conversion
    pub house: House,
    pub faction: FactionId,
    pub hp: i32,
    pub max_hp: i32,
    pub damage: i32,
    pub range: u32,
    pub move_points_per_order: u32,
    pub move_points_remaining: u32,
    pub hex: HexCoord,
    pub path: VecDeque<HexCoord>,
    pub target: Option<Target>,
    /// Unit-held meter (fear, faith or favor for the unit-gated houses)
    pub reserve: u32,
    pub cooldown: u32,
    pub super_cooldown: u32,
    pub stealth: u32,
    pub wind_up: u32,
    /// Faction that dealt the most recent damage
    pub last_hit_by: Option<FactionId>,
    /// Set once the kill reward for this unit has been paid
    pub bounty_paid: bool,
    /// Consecutive ticks spent waiting on an occupied step
    pub blocked_ticks: u32,
}

impl Unit {
    pub fn new(kind: UnitKind, house: House, faction: FactionId, hex: HexCoord) -> Self {
        let stats = kind.stats();
        Self {
            id: UnitId(0),
            kind,
            house,
            faction,
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            damage: stats.damage,
            range: stats.range,
            move_points_per_order: stats.move_points,
            move_points_remaining: 0,
            hex,
            path: VecDeque::new(),
            target: None,
            reserve: 0,
            cooldown: 0,
            super_cooldown: 0,
            stealth: 0,
            wind_up: 0,
            last_hit_by: None,
            bounty_paid: false,
            blocked_ticks: 0,
        }
    }

    pub fn name(&self) -> String {
        self.kind.display_name(self.house)
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_stealthed(&self) -> bool {
        self.stealth > 0
    }

    /// No path and no target
    pub fn is_idle(&self) -> bool {
        self.path.is_empty() && self.target.is_none()
    }

    /// Replace the current route; the per-order movement budget is refilled
    pub fn assign_path(&mut self, path: Vec<HexCoord>) {
        self.path = path.into();
        self.move_points_remaining = self.move_points_per_order;
        self.blocked_ticks = 0;
    }

    pub fn take_damage(&mut self, amount: i32, from: Option<FactionId>) {
        self.hp -= amount;
        if from.is_some() {
            self.last_hit_by = from;
        }
    }

    /// Floor-at-zero countdown of all per-tick timers
    pub fn tick_timers(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
        self.super_cooldown = self.super_cooldown.saturating_sub(1);
        self.stealth = self.stealth.saturating_sub(1);
        self.wind_up = self.wind_up.saturating_sub(1);
    }
}
