//! House superweapons and the Bene Gesserit mind control ability
//!
//! Casting is all-or-nothing: every check runs before any state changes.
//! The gate is read from either the faction economy or the caster's own
//! reserve depending on the house (see `House::gate_source`).

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::error::{SimError, SimResult};
use crate::core::types::{UnitId, WormId};
use crate::faction::economy::Meter;
use crate::faction::house::{FactionId, GateSource, House};
use crate::map::hex::HexCoord;
use crate::simulation::events::EventKind;
use crate::simulation::state::GameState;
use crate::unit::kind::UnitKind;
use crate::unit::unit::Unit;
use crate::unit::worm::Worm;

/// Maximum distance between caster and aim point
pub const SUPERWEAPON_RANGE: u32 = 20;
/// Will spent on a single mind control
pub const MIND_CONTROL_COST: u32 = 200;

const ATREIDES_RADIUS: u32 = 8;
const HARKONNEN_RADIUS: u32 = 10;
const HARKONNEN_DAMAGE: i32 = 250;
const GUILD_RADIUS: u32 = 10;
const GUILD_ESCORTS: usize = 8;
const VOICE_RADIUS: u32 = 10;
const VOICE_MAX_CONVERSIONS: usize = 5;

/// Gate, price and recharge of a house superweapon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperweaponSpec {
    pub name: &'static str,
    /// Meter balance required before casting
    pub gate: u32,
    /// Meter deducted on cast
    pub cost: u32,
    pub cooldown: u32,
}

impl SuperweaponSpec {
    pub fn for_house(house: House) -> Self {
        match house {
            House::Atreides => Self {
                name: "CHOAM Embargo",
                gate: 500,
                cost: 500,
                cooldown: 70,
            },
            House::Harkonnen => Self {
                name: "Atomic Barrage",
                gate: 600,
                cost: 600,
                cooldown: 90,
            },
            House::Fremen => Self {
                name: "Great Maker",
                gate: 700,
                cost: 700,
                cooldown: 100,
            },
            House::SpacingGuild => Self {
                name: "Heighliner Drop",
                gate: 800,
                cost: 800,
                cooldown: 120,
            },
            House::BeneGesserit => Self {
                name: "The Voice",
                gate: 800,
                cost: 800,
                cooldown: 120,
            },
        }
    }
}

/// What a successful cast did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuperweaponEffect {
    Embargo { halted: Vec<UnitId> },
    Barrage { struck: Vec<UnitId> },
    GreatMaker { worm: WormId },
    Heighliner { escorts: Vec<UnitId> },
    Voice { converted: Vec<UnitId> },
}

/// Check that `caster` may fire at `at` without changing anything
pub fn check_superweapon(state: &GameState, caster: UnitId, at: HexCoord) -> SimResult<()> {
    let unit = state
        .units
        .get(caster)
        .filter(|u| u.is_alive())
        .ok_or_else(|| SimError::InvalidTarget(format!("no live unit {caster}")))?;
    if unit.super_cooldown > 0 {
        return Err(SimError::OnCooldown {
            remaining: unit.super_cooldown,
        });
    }
    state.map.tile_at(at)?;
    let distance = unit.hex.distance(&at);
    if distance > SUPERWEAPON_RANGE {
        return Err(SimError::OutOfRange {
            distance,
            range: SUPERWEAPON_RANGE,
        });
    }

    let spec = SuperweaponSpec::for_house(unit.house);
    let meter = unit.house.meter();
    let available = gate_balance(state, unit)?;
    if available < spec.gate {
        return Err(SimError::InsufficientResources {
            resource: meter.name(),
            needed: spec.gate,
            available,
        });
    }
    Ok(())
}

fn gate_balance(state: &GameState, unit: &Unit) -> SimResult<u32> {
    match unit.house.gate_source() {
        GateSource::Unit => Ok(unit.reserve),
        GateSource::Faction => state
            .economy(unit.faction)
            .map(|e| e.meter(unit.house.meter()))
            .ok_or_else(|| SimError::InvalidTarget(format!("no faction {}", unit.faction))),
    }
}

/// Fire the caster's house superweapon at `at`.
///
/// Any unit may be the caster; restricting casts to superweapon carriers is
/// the command layer's job.
pub fn fire_superweapon(
    state: &mut GameState,
    caster: UnitId,
    at: HexCoord,
) -> SimResult<SuperweaponEffect> {
    check_superweapon(state, caster, at)?;
    let Some(unit) = state.units.get(caster) else {
        return Err(SimError::InvalidTarget(format!("no live unit {caster}")));
    };
    let (house, faction) = (unit.house, unit.faction);
    let spec = SuperweaponSpec::for_house(house);

    pay_gate(state, caster, house, faction, spec.cost)?;
    if let Some(unit) = state.units.get_mut(caster) {
        unit.super_cooldown = spec.cooldown;
    }

    let effect = match house {
        House::Atreides => embargo(state, at),
        House::Harkonnen => barrage(state, faction, at),
        House::Fremen => great_maker(state, faction, at)?,
        House::SpacingGuild => heighliner(state, faction, at),
        House::BeneGesserit => voice(state, faction, at),
    };

    info!(%caster, %faction, weapon = spec.name, %at, "superweapon fired");
    state.emit(EventKind::SuperweaponFired {
        unit: caster,
        house,
        at,
    });
    Ok(effect)
}

fn pay_gate(
    state: &mut GameState,
    caster: UnitId,
    house: House,
    faction: FactionId,
    cost: u32,
) -> SimResult<()> {
    match house.gate_source() {
        GateSource::Faction => state
            .economy_mut(faction)
            .ok_or_else(|| SimError::InvalidTarget(format!("no faction {faction}")))?
            .spend_meter(house.meter(), cost),
        GateSource::Unit => {
            let unit = state
                .units
                .get_mut(caster)
                .ok_or_else(|| SimError::InvalidTarget(format!("no live unit {caster}")))?;
            if unit.reserve < cost {
                return Err(SimError::InsufficientResources {
                    resource: house.meter().name(),
                    needed: cost,
                    available: unit.reserve,
                });
            }
            unit.reserve -= cost;
            Ok(())
        }
    }
}

/// Units within `radius` of `at`, nearest first
fn units_near(state: &GameState, at: HexCoord, radius: u32) -> Vec<UnitId> {
    let mut near: Vec<(u32, UnitId)> = state
        .units
        .iter()
        .filter(|u| u.is_alive() && u.hex.distance(&at) <= radius)
        .map(|u| (u.hex.distance(&at), u.id))
        .collect();
    near.sort();
    near.into_iter().map(|(_, id)| id).collect()
}

fn embargo(state: &mut GameState, at: HexCoord) -> SuperweaponEffect {
    let halted = units_near(state, at, ATREIDES_RADIUS);
    for id in &halted {
        if let Some(unit) = state.units.get_mut(*id) {
            unit.move_points_remaining = 0;
        }
    }
    SuperweaponEffect::Embargo { halted }
}

fn barrage(state: &mut GameState, faction: FactionId, at: HexCoord) -> SuperweaponEffect {
    let struck = units_near(state, at, HARKONNEN_RADIUS);
    for id in &struck {
        if let Some(unit) = state.units.get_mut(*id) {
            unit.take_damage(HARKONNEN_DAMAGE, Some(faction));
        }
    }
    SuperweaponEffect::Barrage { struck }
}

fn great_maker(
    state: &mut GameState,
    faction: FactionId,
    at: HexCoord,
) -> SimResult<SuperweaponEffect> {
    let worm = state.spawn_worm(Worm::great_maker(at, faction))?;
    Ok(SuperweaponEffect::GreatMaker { worm })
}

fn heighliner(state: &mut GameState, faction: FactionId, at: HexCoord) -> SuperweaponEffect {
    let mut landing: Vec<HexCoord> = state
        .map
        .tiles_in_range(at, GUILD_RADIUS)
        .into_iter()
        .filter(|c| {
            state
                .map
                .get(*c)
                .is_some_and(|t| t.is_empty() && t.building.is_none() && !t.sinkhole)
        })
        .collect();
    landing.shuffle(&mut state.rng);

    let mut escorts = Vec::new();
    for hex in landing.into_iter().take(GUILD_ESCORTS) {
        match state.spawn_unit(faction, UnitKind::Elite, hex) {
            Ok(id) => escorts.push(id),
            Err(err) => debug!(%hex, %err, "escort drop skipped"),
        }
    }
    SuperweaponEffect::Heighliner { escorts }
}

fn voice(state: &mut GameState, faction: FactionId, at: HexCoord) -> SuperweaponEffect {
    let candidates: Vec<UnitId> = units_near(state, at, VOICE_RADIUS)
        .into_iter()
        .filter(|id| {
            state.units.get(*id).is_some_and(|u| {
                u.faction.is_hostile_to(&faction) && u.house != House::BeneGesserit
            })
        })
        .take(VOICE_MAX_CONVERSIONS)
        .collect();

    for id in &candidates {
        convert_unit(state, *id, faction);
    }
    SuperweaponEffect::Voice {
        converted: candidates,
    }
}

/// Hand a unit to `faction`, dropping its orders
fn convert_unit(state: &mut GameState, id: UnitId, faction: FactionId) {
    let Some(unit) = state.units.get_mut(id) else {
        return;
    };
    let from = unit.faction;
    unit.faction = faction;
    unit.target = None;
    unit.path.clear();

    state.selection.remove(&id);
    if faction.is_human_side() && from.is_hostile_to(&faction) {
        state.tally.units_controlled += 1;
    }
    debug!(unit = %id, %from, to = %faction, "unit converted");
    state.emit(EventKind::UnitConverted {
        unit: id,
        from,
        to: faction,
    });
}

/// Spend will to take a single hostile unit
pub fn mind_control(state: &mut GameState, faction: FactionId, target: UnitId) -> SimResult<()> {
    let unit = state
        .units
        .get(target)
        .filter(|u| u.is_alive() && u.faction.is_hostile_to(&faction))
        .ok_or_else(|| SimError::InvalidTarget(format!("no hostile unit {target}")))?;
    if unit.house == House::BeneGesserit {
        return Err(SimError::NotAllowed(format!(
            "{target} is immune to the Voice"
        )));
    }

    state
        .economy_mut(faction)
        .ok_or_else(|| SimError::InvalidTarget(format!("no faction {faction}")))?
        .spend_meter(Meter::Will, MIND_CONTROL_COST)?;
    convert_unit(state, target, faction);
    Ok(())
}
