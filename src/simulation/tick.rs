//! Tick driver - advances a match by one step
//!
//! Phases run in a fixed order:
//! AI -> weather -> income -> units -> turrets -> worms -> fog -> outcome.
//! All randomness draws from the match RNG, so a seed replays exactly.

use ahash::AHashSet;
use tracing::{debug, info, info_span, warn};

use crate::campaign::mission::MissionStatus;
use crate::core::types::{Tick, UnitId};
use crate::faction::house::FactionId;
use crate::map::hex::HexCoord;
use crate::map::tile::StructureKind;
use crate::simulation::events::{EventKind, GameEvent};
use crate::simulation::state::{GameState, MatchStatus};
use crate::unit::update::update_unit;
use crate::unit::worm::update_worms;

/// Spice paid to a base's owner every tick
pub const BASE_SPICE_INCOME: u32 = 5;
/// Solaris paid to a base's owner every tick
pub const BASE_SOLARIS_INCOME: u32 = 2;
/// A unit standing on a live field harvests once every this many ticks
pub const HARVEST_INTERVAL: Tick = 10;
pub const TURRET_RANGE: u32 = 3;
pub const TURRET_DAMAGE: i32 = 15;
/// Fog-of-war sight radius of human-side units and buildings
pub const SIGHT_RADIUS: u32 = 4;

impl GameState {
    /// Advance one tick and return the events it produced
    pub fn tick(&mut self) -> Vec<GameEvent> {
        if !self.is_running() {
            return Vec::new();
        }
        self.tick += 1;
        let span = info_span!("tick", match_id = %self.match_id, tick = self.tick);
        let _enter = span.enter();

        self.run_controllers();
        self.run_weather();
        self.run_income();
        self.run_units();
        self.run_turrets();
        update_worms(self);
        self.update_visibility();
        self.resolve_outcome();

        #[cfg(debug_assertions)]
        for violation in crate::simulation::invariants::check_invariants(self) {
            warn!(%violation, "invariant violated");
        }

        self.take_events()
    }

    /// Run `n` ticks, stopping early when the match ends
    pub fn run(&mut self, n: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..n {
            if !self.is_running() {
                break;
            }
            events.extend(self.tick());
        }
        events
    }

    fn run_controllers(&mut self) {
        let mut controllers = std::mem::take(&mut self.controllers);
        for controller in controllers.iter_mut() {
            controller.process_tick(self);
        }
        self.controllers = controllers;
    }

    fn run_weather(&mut self) {
        if let Some(kind) = self.weather.update(&mut self.map, &mut self.rng) {
            debug!(?kind, cycles = self.weather.cycles_left, "weather changed");
            self.emit(EventKind::WeatherChanged { kind });
        }
    }

    /// Base stipends, then harvesting by units standing on spice
    fn run_income(&mut self) {
        let stipends: Vec<FactionId> = self
            .map
            .tiles()
            .filter_map(|t| t.building.as_ref())
            .filter(|b| b.kind == StructureKind::Base)
            .map(|b| b.owner)
            .collect();
        for owner in stipends {
            if let Some(economy) = self.economy_mut(owner) {
                economy.earn(BASE_SPICE_INCOME, BASE_SOLARIS_INCOME);
            }
        }

        let harvest_due = self.tick % HARVEST_INTERVAL == 0;
        let harvesters: Vec<(HexCoord, FactionId)> = self
            .units
            .iter()
            .filter(|u| u.is_alive())
            .filter(|u| self.map.spice_field(u.hex).is_some_and(|f| !f.is_spent()))
            .map(|u| (u.hex, u.faction))
            .collect();

        for (at, faction) in harvesters {
            if let Some(tile) = self.map.get_mut(at) {
                tile.owner = Some(faction);
            }
            if !harvest_due {
                continue;
            }
            let taken = self.map.spice_field_mut(at).map_or(0, |f| f.harvest());
            if let Some(economy) = self.economy_mut(faction) {
                economy.earn(taken, 0);
            }
        }
    }

    fn run_units(&mut self) {
        for id in self.units.ids() {
            update_unit(self, id);
        }
    }

    /// Each turret hits the nearest hostile unit in range
    fn run_turrets(&mut self) {
        let turrets: Vec<(HexCoord, FactionId)> = self
            .map
            .tiles()
            .filter_map(|t| t.building.as_ref().map(|b| (t.coord, b)))
            .filter(|(_, b)| b.kind == StructureKind::Turret)
            .map(|(c, b)| (c, b.owner))
            .collect();

        for (at, owner) in turrets {
            let target: Option<UnitId> = self
                .units
                .hostile_to(owner)
                .filter(|u| u.hex.distance(&at) <= TURRET_RANGE)
                .min_by_key(|u| (u.hex.distance(&at), u.id))
                .map(|u| u.id);
            if let Some(unit) = target.and_then(|id| self.units.get_mut(id)) {
                unit.take_damage(TURRET_DAMAGE, Some(owner));
            }
        }
    }

    /// Reveal tiles within sight of any human-side unit or building
    pub fn update_visibility(&mut self) {
        let mut eyes: Vec<HexCoord> = self
            .units
            .iter()
            .filter(|u| u.is_alive() && u.faction.is_human_side())
            .map(|u| u.hex)
            .collect();
        eyes.extend(
            self.map
                .tiles()
                .filter(|t| t.building.as_ref().is_some_and(|b| b.owner.is_human_side()))
                .map(|t| t.coord),
        );

        let seen: AHashSet<HexCoord> = eyes
            .iter()
            .flat_map(|e| e.hexes_in_range(SIGHT_RADIUS))
            .collect();
        for tile in self.map.tiles_mut() {
            tile.visible = seen.contains(&tile.coord);
        }
    }

    fn resolve_outcome(&mut self) {
        if self.mission.is_some() {
            self.resolve_mission();
            return;
        }

        let ai_base_standing = self.map.tiles().any(|t| {
            t.building
                .as_ref()
                .is_some_and(|b| b.kind == StructureKind::Base && !b.owner.is_human_side())
        });
        if !ai_base_standing {
            self.finish(MatchStatus::Victory);
            return;
        }

        let player_base_standing = self.map.tiles().any(|t| {
            t.building
                .as_ref()
                .is_some_and(|b| b.kind == StructureKind::Base && b.owner == FactionId::Player)
        });
        let player_has_units = self.units.owned_by(FactionId::Player).next().is_some();
        if !player_base_standing && !player_has_units {
            self.finish(MatchStatus::Defeat);
        }
    }

    /// Campaign matches end when the mission resolves
    fn resolve_mission(&mut self) {
        let control = self.human_spice_control();
        let tally = self.tally;
        let Some(mission) = self.mission.as_mut() else {
            return;
        };
        let Some(status) = mission.evaluate(&tally, control) else {
            return;
        };
        let key = mission.def().key.to_string();
        let narrative = mission.narrative_key();

        info!(mission = %key, %status, %narrative, "mission resolved");
        self.emit(EventKind::MissionResolved { key, status });
        self.finish(match status {
            MissionStatus::Succeeded => MatchStatus::Victory,
            MissionStatus::Active | MissionStatus::Failed => MatchStatus::Defeat,
        });
    }

    fn finish(&mut self, status: MatchStatus) {
        self.status = status;
        info!(?status, tick = self.tick, "match ended");
        self.emit(EventKind::MatchEnded { status });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MatchConfig;
    use crate::map::grid::HexMap;
    use crate::map::tile::{Building, SpiceField};
    use crate::simulation::state::PLAYER_BASE;
    use crate::unit::kind::UnitKind;

    fn open_state() -> GameState {
        GameState::with_map(MatchConfig::default(), HexMap::open(20, 20)).unwrap()
    }

    #[test]
    fn test_tick_counter_and_stipend() {
        let mut state = open_state();
        state.tick();
        assert_eq!(state.tick, 1);
        let economy = state.economy(FactionId::Player).unwrap();
        assert_eq!(economy.spice, 1500 + BASE_SPICE_INCOME);
        assert_eq!(economy.solaris, 750 + BASE_SOLARIS_INCOME);
    }

    #[test]
    fn test_unit_on_field_claims_and_harvests() {
        let mut map = HexMap::open(20, 20);
        let field = HexCoord::new(2, 12);
        map.add_spice_field(field, SpiceField::new()).unwrap();
        let mut state = GameState::with_map(MatchConfig::default(), map).unwrap();
        state
            .spawn_unit(FactionId::Player, UnitKind::Trooper, field)
            .unwrap();

        state.tick();
        assert_eq!(state.map.get(field).unwrap().owner, Some(FactionId::Player));

        state.run(9);
        assert_eq!(state.map.spice_field(field).unwrap().remaining, 950);
        assert_eq!(
            state.economy(FactionId::Player).unwrap().spice,
            1500 + 10 * BASE_SPICE_INCOME + 50
        );
    }

    #[test]
    fn test_turret_hits_nearest_hostile() {
        let mut state = open_state();
        let turret = HexCoord::new(10, 10);
        state.map.get_mut(turret).unwrap().building =
            Some(Building::new(StructureKind::Turret, FactionId::Ai(0)));
        let near = state
            .spawn_unit(FactionId::Player, UnitKind::Infantry, HexCoord::new(11, 10))
            .unwrap();
        let far = state
            .spawn_unit(FactionId::Player, UnitKind::Infantry, HexCoord::new(12, 10))
            .unwrap();

        state.tick();
        assert_eq!(state.units.get(near).unwrap().hp, 100 - TURRET_DAMAGE);
        assert_eq!(state.units.get(far).unwrap().hp, 100);
    }

    #[test]
    fn test_fog_follows_human_side() {
        let mut state = open_state();
        state.tick();
        assert!(state.map.get(HexCoord::new(5, 9)).unwrap().visible);
        assert!(!state.map.get(HexCoord::new(5, 10)).unwrap().visible);
        assert!(!state.map.get(HexCoord::new(14, 14)).unwrap().visible);
    }

    #[test]
    fn test_destroying_last_ai_base_wins() {
        let mut state = open_state();
        state.map.get_mut(HexCoord::new(14, 14)).unwrap().building = None;
        let events = state.tick();
        assert_eq!(state.status, MatchStatus::Victory);
        assert!(events.iter().any(|e| e.kind
            == EventKind::MatchEnded {
                status: MatchStatus::Victory
            }));
        assert!(state.tick().is_empty());
        assert_eq!(state.tick, 1);
    }

    #[test]
    fn test_losing_base_and_army_is_defeat() {
        let mut state = open_state();
        state.map.get_mut(PLAYER_BASE).unwrap().building = None;
        state.tick();
        assert_eq!(state.status, MatchStatus::Defeat);
    }
}
