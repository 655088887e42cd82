//! Per-faction AI controller
//!
//! Runs once per tick for its faction, ahead of unit updates. All actions go
//! through the same command methods a human player uses, so a rejected
//! order is simply skipped.

use rand::Rng;
use tracing::{debug, trace};

use crate::ai::personality::{AiProfile, Personality};
use crate::ai::threat::threat_score;
use crate::ai::FactionController;
use crate::campaign::mission::MissionHook;
use crate::core::types::{Tick, UnitId};
use crate::faction::house::{FactionId, House};
use crate::faction::superweapon::{
    check_superweapon, fire_superweapon, mind_control, MIND_CONTROL_COST, SUPERWEAPON_RANGE,
};
use crate::map::generation::{random_open_sand, spice_blow};
use crate::map::hex::HexCoord;
use crate::map::tile::StructureKind;
use crate::simulation::events::EventKind;
use crate::simulation::state::GameState;
use crate::unit::kind::UnitKind;
use crate::unit::unit::{MoveMode, Target};
use crate::unit::worm::Worm;

/// Search radius around the base for production and construction
pub const PRODUCTION_RADIUS: u32 = 3;
const SWARM_SIZE: usize = 10;
const OPPORTUNIST_EVENT_CHANCE: f64 = 0.3;
const MIND_CONTROL_CHANCE: f64 = 0.15;
const GUILD_CLAIM_CHANCE: f64 = 0.2;
const SISTERHOOD_SINKHOLE_CHANCE: f64 = 0.1;
const PASSIVE_METER_GAIN: u32 = 10;
const WORM_HEAL: i32 = 10;
/// Ticks between wild worm summons on worm missions
pub const WORM_SUMMON_INTERVAL: Tick = 60;
const VOICE_WILL_THRESHOLD: u32 = 800;
const GOLDEN_PATH_PRESSURE: f32 = 0.8;
const GOLDEN_PATH_BUILD_INTERVAL: Tick = 20;

#[derive(Debug, Clone)]
pub struct AiController {
    faction: FactionId,
    personality: Personality,
    profile: AiProfile,
    last_threat: f32,
    last_turret: Option<Tick>,
}

impl AiController {
    pub fn new(faction: FactionId, personality: Personality, profile: AiProfile) -> Self {
        Self {
            faction,
            personality,
            profile,
            last_threat: 0.0,
            last_turret: None,
        }
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn profile(&self) -> AiProfile {
        self.profile
    }

    /// Personality purchase and refinery construction
    fn spend(&mut self, state: &mut GameState, base: HexCoord) {
        let Some(economy) = state.economy(self.faction).cloned() else {
            return;
        };

        if economy.spice as f32 > self.profile.spice_threshold() {
            match self.personality {
                Personality::Swarm => {
                    for _ in 0..SWARM_SIZE {
                        if self.produce(state, UnitKind::Trooper, base).is_none() {
                            break;
                        }
                    }
                }
                Personality::Defensive => {
                    self.build(state, StructureKind::Turret, base);
                }
                Personality::Opportunist => {
                    if state.rng.gen_bool(OPPORTUNIST_EVENT_CHANCE) {
                        if let Some(at) = spice_blow(&mut state.map, &mut state.rng) {
                            debug!(faction = %self.faction, %at, "spice blow");
                            state.emit(EventKind::SpiceBlow { at });
                        }
                    } else {
                        self.produce(state, UnitKind::Infantry, base);
                    }
                }
                Personality::Strategic => {
                    self.produce(state, UnitKind::Elite, base);
                }
                Personality::Balanced => {
                    self.produce(state, UnitKind::Infantry, base);
                }
            }
        }

        if economy.solaris as f32 > self.profile.solaris_threshold() {
            self.build(state, StructureKind::Refinery, base);
        }
    }

    fn produce(&self, state: &mut GameState, kind: UnitKind, base: HexCoord) -> Option<UnitId> {
        let at = state.map.free_hex_near(base, PRODUCTION_RADIUS)?;
        state.issue_unit_production(self.faction, kind, at).ok()
    }

    fn build(&self, state: &mut GameState, kind: StructureKind, base: HexCoord) -> bool {
        let Some(at) = state.map.free_hex_near(base, PRODUCTION_RADIUS) else {
            return false;
        };
        state.issue_build(self.faction, kind, at).is_ok()
    }

    /// Weakest visible enemy: lowest hp, first by id on ties
    fn weakest_enemy(&self, state: &GameState) -> Option<(UnitId, HexCoord)> {
        state
            .units
            .hostile_to(self.faction)
            .filter(|u| !u.is_stealthed())
            .min_by_key(|u| u.hp)
            .map(|u| (u.id, u.hex))
    }

    fn engage(&mut self, state: &mut GameState, house: House) {
        let Some((target, target_hex)) = self.weakest_enemy(state) else {
            return;
        };
        let Some(attacker) = state
            .units
            .owned_by(self.faction)
            .filter(|u| u.is_alive())
            .min_by_key(|u| (u.hex.distance(&target_hex), u.id))
            .map(|u| (u.id, u.hex, u.range, u.kind, u.path.is_empty(), u.target))
        else {
            return;
        };
        let (unit, hex, range, kind, no_path, current) = attacker;

        if hex.distance(&target_hex) <= range {
            if current != Some(Target::Unit(target)) {
                if let Err(err) = state.issue_attack(Some(unit), Target::Unit(target)) {
                    trace!(%unit, %err, "attack skipped");
                }
            }
        } else if no_path {
            approach(state, unit, hex, target_hex);
        }

        if kind.carries_superweapon() && check_superweapon(state, unit, target_hex).is_ok() {
            if let Err(err) = state.issue_superweapon(Some(unit), target_hex) {
                debug!(%unit, %err, "superweapon failed");
            }
        }

        let will = state.economy(self.faction).map_or(0, |e| e.will);
        if house == House::BeneGesserit
            && will >= MIND_CONTROL_COST
            && state.rng.gen_bool(MIND_CONTROL_CHANCE)
        {
            if let Err(err) = mind_control(state, self.faction, target) {
                trace!(%target, %err, "mind control skipped");
            }
        }
    }

    /// Send an idle unit to the nearest unclaimed spice field
    fn expand(&self, state: &mut GameState, base: HexCoord) {
        let owned = state
            .map
            .live_spice_fields()
            .into_iter()
            .filter(|c| state.map.get(*c).and_then(|t| t.owner) == Some(self.faction))
            .count();
        if owned as f32 >= self.profile.expansion_target()
            && self.personality != Personality::Strategic
        {
            return;
        }

        let Some(field) = state
            .map
            .live_spice_fields()
            .into_iter()
            .filter(|c| {
                state
                    .map
                    .get(*c)
                    .is_some_and(|t| t.owner != Some(self.faction) && t.unit.is_none())
            })
            .min_by_key(|c| (base.distance(c), *c))
        else {
            return;
        };
        let Some(mover) = state
            .units
            .owned_by(self.faction)
            .filter(|u| u.is_alive() && u.is_idle())
            .min_by_key(|u| (u.hex.distance(&field), u.id))
            .map(|u| u.id)
        else {
            return;
        };

        if let Err(err) = state.issue_move(Some(mover), field, MoveMode::Normal) {
            trace!(unit = %mover, %err, "expansion move skipped");
        }
    }

    fn mission_hooks(&mut self, state: &mut GameState, house: House, base: HexCoord) {
        let Some(mission) = state.mission.as_ref() else {
            return;
        };
        let (hook, spice_goal) = (mission.def().hook, mission.def().goals.spice_control);

        match hook {
            Some(MissionHook::WormSummons) if state.tick % WORM_SUMMON_INTERVAL == 0 => {
                if let Some(at) = random_open_sand(&state.map, &mut state.rng) {
                    if let Ok(worm) = state.spawn_worm(Worm::wild(at)) {
                        debug!(%worm, %at, "wild worm summoned");
                    }
                }
            }
            Some(MissionHook::Voice) if house == House::BeneGesserit => {
                self.sisterhood_voice(state);
            }
            Some(MissionHook::GoldenPath) => {
                let Some(goal) = spice_goal else {
                    return;
                };
                let due = self
                    .last_turret
                    .map_or(true, |t| state.tick >= t + GOLDEN_PATH_BUILD_INTERVAL);
                if due
                    && state.human_spice_control() >= goal * GOLDEN_PATH_PRESSURE
                    && self.build(state, StructureKind::Turret, base)
                {
                    self.last_turret = Some(state.tick);
                }
            }
            _ => {}
        }
    }

    /// Any sister within reach may speak once will is high enough
    fn sisterhood_voice(&self, state: &mut GameState) {
        let will = state.economy(self.faction).map_or(0, |e| e.will);
        if will < VOICE_WILL_THRESHOLD {
            return;
        }
        let Some((_, target_hex)) = self.weakest_enemy(state) else {
            return;
        };
        let caster = state
            .units
            .owned_by(self.faction)
            .filter(|u| {
                u.is_alive()
                    && u.house == House::BeneGesserit
                    && u.hex.distance(&target_hex) <= SUPERWEAPON_RANGE
            })
            .map(|u| u.id)
            .find(|id| check_superweapon(state, *id, target_hex).is_ok());

        if let Some(caster) = caster {
            if let Err(err) = fire_superweapon(state, caster, target_hex) {
                debug!(%caster, %err, "voice failed");
            }
        }
    }

    fn house_passive(&self, state: &mut GameState, house: House, base: HexCoord) {
        match house {
            House::Fremen => {
                for worm in state.worms.values_mut() {
                    worm.heal(WORM_HEAL);
                }
            }
            House::SpacingGuild if state.rng.gen_bool(GUILD_CLAIM_CHANCE) => {
                let unclaimed = state
                    .map
                    .live_spice_fields()
                    .into_iter()
                    .filter(|c| state.map.get(*c).is_some_and(|t| t.owner.is_none()))
                    .min_by_key(|c| (base.distance(c), *c));
                if let Some(tile) = unclaimed.and_then(|c| state.map.get_mut(c)) {
                    tile.owner = Some(self.faction);
                    self.credit_passive(state, house);
                }
            }
            House::BeneGesserit if state.rng.gen_bool(SISTERHOOD_SINKHOLE_CHANCE) => {
                if self.shift_sinkhole(state) {
                    self.credit_passive(state, house);
                }
            }
            _ => {}
        }
    }

    /// Move an existing sinkhole or open a new one on random sand
    fn shift_sinkhole(&self, state: &mut GameState) -> bool {
        let Some(at) = random_open_sand(&state.map, &mut state.rng) else {
            return false;
        };
        let existing: Vec<HexCoord> = state.map.sinkholes().map(|(c, _)| *c).collect();

        let risk = if !existing.is_empty() && state.rng.gen_bool(0.5) {
            let from = existing[state.rng.gen_range(0..existing.len())];
            state.map.clear_sinkhole(from).map_or(0.5, |s| s.risk)
        } else {
            state.rng.gen_range(0.1..1.0)
        };
        state.map.set_sinkhole(at, risk).is_ok()
    }

    fn credit_passive(&self, state: &mut GameState, house: House) {
        if let Some(economy) = state.economy_mut(self.faction) {
            economy.credit_meter(house.meter(), PASSIVE_METER_GAIN);
        }
    }
}

/// Walk toward the free neighbour of `goal` nearest to `from`
fn approach(state: &mut GameState, unit: UnitId, from: HexCoord, goal: HexCoord) {
    let Some(step) = goal
        .neighbors()
        .into_iter()
        .filter(|c| state.map.get(*c).is_some_and(|t| t.is_empty() && !t.sinkhole))
        .min_by_key(|c| (from.distance(c), *c))
    else {
        return;
    };
    if let Err(err) = state.issue_move(Some(unit), step, MoveMode::Normal) {
        trace!(%unit, %err, "approach skipped");
    }
}

impl FactionController for AiController {
    fn faction(&self) -> FactionId {
        self.faction
    }

    fn process_tick(&mut self, state: &mut GameState) {
        let Some(record) = state.faction(self.faction) else {
            return;
        };
        let (house, base) = (record.house, record.base);

        self.last_threat = threat_score(state, self.faction, base, self.profile.aggression);
        trace!(faction = %self.faction, threat = self.last_threat, "threat assessed");

        self.spend(state, base);
        self.engage(state, house);
        self.expand(state, base);
        self.mission_hooks(state, house, base);
        self.house_passive(state, house, base);
    }

    fn threat(&self) -> Option<f32> {
        Some(self.last_threat)
    }
}
