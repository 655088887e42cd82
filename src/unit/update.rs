//! Per-tick unit state machine
//!
//! Each live unit runs, in order: death check, timer countdown, combat,
//! movement (only when not engaged) and terrain effects.

use rand::Rng;
use tracing::{debug, trace};

use crate::core::types::{UnitId, WormId};
use crate::faction::house::{FactionId, House};
use crate::map::hex::HexCoord;
use crate::map::tile::StructureKind;
use crate::simulation::events::EventKind;
use crate::simulation::state::GameState;
use crate::unit::unit::Target;

/// Damage taken by a unit that steps into a sinkhole
pub const SINKHOLE_DAMAGE: i32 = 200;
/// Fremen regeneration per tick on sand
pub const FREMEN_SAND_REGEN: i32 = 15;
/// Fremen faith needed for the double-damage roll
pub const FREMEN_FAITH_THRESHOLD: u32 = 850;
pub const FREMEN_DOUBLE_DAMAGE_CHANCE: f64 = 0.5;
pub const FREMEN_STEALTH_CHANCE: f64 = 0.15;
pub const FREMEN_STEALTH_TICKS: u32 = 15;
/// Ticks a unit waits on an occupied step before dropping its path
pub const BLOCKED_PATIENCE: u32 = 5;

/// Run one tick of the state machine for `id`
pub fn update_unit(state: &mut GameState, id: UnitId) {
    let Some(unit) = state.units.get_mut(id) else {
        return;
    };
    if !unit.is_alive() {
        retire_unit(state, id);
        return;
    }
    unit.tick_timers();

    if !resolve_target(state, id) {
        advance_along_path(state, id);
    }
    apply_terrain(state, id);
}

/// Remove a dead unit, paying its bounty if no killer has claimed it
fn retire_unit(state: &mut GameState, id: UnitId) {
    let Some(unit) = state.remove_unit(id) else {
        return;
    };
    let credited = if unit.bounty_paid {
        None
    } else {
        let faction = unit.last_hit_by.unwrap_or(unit.faction);
        state.credit_kill(faction, None);
        Some(faction)
    };
    debug!(unit = %id, faction = %unit.faction, "unit removed");
    state.emit(EventKind::UnitKilled {
        unit: id,
        faction: unit.faction,
        credited,
    });
}

/// Attack the current target if it is valid and in range.
///
/// Returns false when the unit is free to move this tick.
fn resolve_target(state: &mut GameState, id: UnitId) -> bool {
    let Some(unit) = state.units.get(id) else {
        return false;
    };
    let Some(target) = unit.target else {
        return false;
    };
    let (faction, hex, range, base_damage, house, reserve) = (
        unit.faction,
        unit.hex,
        unit.range,
        unit.damage,
        unit.house,
        unit.reserve,
    );

    let target_hex = match target {
        Target::Unit(victim) => state
            .units
            .get(victim)
            .filter(|v| v.is_alive() && v.faction.is_hostile_to(&faction))
            .map(|v| v.hex),
        Target::Worm(worm) => state
            .worms
            .get(&worm)
            .filter(|w| w.is_alive() && !w.is_allied_with(faction))
            .map(|w| w.hex),
        Target::Building(at) => state
            .map
            .get(at)
            .and_then(|t| t.building.as_ref())
            .filter(|b| b.owner.is_hostile_to(&faction))
            .map(|_| at),
    };

    let Some(target_hex) = target_hex else {
        clear_target(state, id);
        return false;
    };
    if hex.distance(&target_hex) > range {
        return false;
    }

    let damage = roll_damage(state, house, reserve, base_damage);
    match target {
        Target::Unit(victim) => strike_unit(state, id, faction, victim, damage),
        Target::Worm(worm) => strike_worm(state, id, faction, worm, damage),
        Target::Building(at) => strike_building(state, id, faction, at, damage),
    }
    true
}

fn roll_damage(state: &mut GameState, house: House, reserve: u32, base: i32) -> i32 {
    if house == House::Fremen
        && reserve >= FREMEN_FAITH_THRESHOLD
        && state.rng.gen_bool(FREMEN_DOUBLE_DAMAGE_CHANCE)
    {
        base * 2
    } else {
        base
    }
}

fn clear_target(state: &mut GameState, id: UnitId) {
    if let Some(unit) = state.units.get_mut(id) {
        unit.target = None;
    }
}

fn strike_unit(state: &mut GameState, id: UnitId, faction: FactionId, victim: UnitId, damage: i32) {
    let Some(target) = state.units.get_mut(victim) else {
        return;
    };
    target.take_damage(damage, Some(faction));
    trace!(attacker = %id, victim = %victim, damage, hp = target.hp, "strike");

    let killed = !target.is_alive() && !target.bounty_paid;
    if killed {
        target.bounty_paid = true;
    }
    state.emit(EventKind::AttackResolved {
        attacker: id,
        target: Target::Unit(victim),
        damage,
    });

    if killed {
        clear_target(state, id);
        state.credit_kill(faction, Some(id));
    }
}

fn strike_worm(state: &mut GameState, id: UnitId, faction: FactionId, worm: WormId, damage: i32) {
    let Some(target) = state.worms.get_mut(&worm) else {
        return;
    };
    target.hp -= damage;
    let slain = !target.is_alive();
    state.emit(EventKind::AttackResolved {
        attacker: id,
        target: Target::Worm(worm),
        damage,
    });

    if slain {
        state.worms.remove(&worm);
        if faction.is_human_side() {
            state.tally.worms_killed += 1;
        }
        clear_target(state, id);
        debug!(worm = %worm, by = %faction, "worm slain");
        state.emit(EventKind::WormKilled { worm, by: faction });
    }
}

fn strike_building(state: &mut GameState, id: UnitId, faction: FactionId, at: HexCoord, damage: i32) {
    let Some(tile) = state.map.get_mut(at) else {
        return;
    };
    let Some(building) = tile.building.as_mut() else {
        return;
    };
    building.hp -= damage;
    let destroyed = (building.hp <= 0).then(|| (building.kind, building.owner));
    if destroyed.is_some() {
        tile.building = None;
    }
    state.emit(EventKind::AttackResolved {
        attacker: id,
        target: Target::Building(at),
        damage,
    });

    if let Some((kind, owner)) = destroyed {
        if kind == StructureKind::Base && faction.is_human_side() {
            state.tally.bases_destroyed += 1;
        }
        clear_target(state, id);
        debug!(kind = kind.name(), %at, %owner, "building destroyed");
        state.emit(EventKind::BuildingDestroyed { kind, at, owner });
    }
}

/// Take one step along the path, spending one move point
fn advance_along_path(state: &mut GameState, id: UnitId) {
    let Some(unit) = state.units.get_mut(id) else {
        return;
    };
    if unit.move_points_remaining == 0 {
        return;
    }
    let Some(&next) = unit.path.front() else {
        return;
    };

    if state.map.is_sinkhole(next) {
        unit.take_damage(SINKHOLE_DAMAGE, None);
        unit.path.clear();
        debug!(unit = %id, at = %next, hp = unit.hp, "sinkhole");
        state.emit(EventKind::SinkholeTriggered { unit: id, at: next });
        return;
    }

    match state.map.get(next).map(|t| t.unit.is_some()) {
        None => unit.path.clear(),
        // Occupied: wait with the path intact, then give up
        Some(true) => {
            unit.blocked_ticks += 1;
            if unit.blocked_ticks >= BLOCKED_PATIENCE {
                unit.path.clear();
                unit.blocked_ticks = 0;
                trace!(unit = %id, at = %next, "path abandoned");
            }
        }
        Some(false) => {
            unit.blocked_ticks = 0;
            unit.path.pop_front();
            unit.move_points_remaining -= 1;
            if let Err(err) = state.relocate_unit(id, next) {
                debug!(unit = %id, %err, "move rejected");
            }
        }
    }
}

/// Fremen sand effects: regeneration, and stealth during sandstorms
fn apply_terrain(state: &mut GameState, id: UnitId) {
    let Some(unit) = state.units.get_mut(id) else {
        return;
    };
    if unit.house != House::Fremen || !unit.is_alive() {
        return;
    }
    let on_sand = state
        .map
        .get(unit.hex)
        .is_some_and(|t| t.terrain.is_sandy());
    if !on_sand {
        return;
    }

    unit.hp = (unit.hp + FREMEN_SAND_REGEN).min(unit.max_hp);
    if state.weather.is_sandstorm()
        && unit.stealth == 0
        && state.rng.gen_bool(FREMEN_STEALTH_CHANCE)
    {
        unit.stealth = FREMEN_STEALTH_TICKS;
    }
}
