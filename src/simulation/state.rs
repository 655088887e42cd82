//! The match state and its low-level mutators
//!
//! `GameState` owns everything in a match. Unit placement is mirrored on the
//! tiles, so every placement change goes through `spawn_unit`,
//! `relocate_unit` or `remove_unit`, which update both sides together.

use std::collections::{BTreeMap, BTreeSet};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::{AiController, CoopController, FactionController};
use crate::campaign::mission::MissionProgress;
use crate::core::config::{GameMode, MatchConfig};
use crate::core::error::{SimError, SimResult};
use crate::core::types::{MatchId, Tick, UnitId, WormId};
use crate::faction::economy::Economy;
use crate::faction::house::{FactionId, GateSource, House};
use crate::map::generation::generate_map;
use crate::map::grid::HexMap;
use crate::map::hex::HexCoord;
use crate::map::tile::{Building, StructureKind};
use crate::map::weather::WeatherState;
use crate::simulation::events::{EventKind, GameEvent};
use crate::unit::kind::UnitKind;
use crate::unit::registry::UnitRegistry;
use crate::unit::unit::Unit;
use crate::unit::worm::Worm;

/// Home base of the human player
pub const PLAYER_BASE: HexCoord = HexCoord::new(5, 5);
const COOP_BASES: [HexCoord; 3] = [
    HexCoord::new(9, 5),
    HexCoord::new(5, 9),
    HexCoord::new(9, 9),
];

/// Home bases for AI slots on a `width` x `height` map
pub fn ai_base_sites(width: u32, height: u32) -> [HexCoord; 4] {
    let (w, h) = (width as i32, height as i32);
    [
        HexCoord::new(w - 6, h - 6),
        HexCoord::new(w - 6, 5),
        HexCoord::new(5, h - 6),
        HexCoord::new(w / 2, h / 2),
    ]
}

/// One faction's record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub house: House,
    pub economy: Economy,
    pub base: HexCoord,
}

/// Match-wide counters feeding mission goals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    /// Worms slain by the human side
    pub worms_killed: u32,
    /// AI bases destroyed by the human side
    pub bases_destroyed: u32,
    /// Units converted to the human side
    pub units_controlled: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Running,
    Victory,
    Defeat,
}

#[derive(Debug)]
pub struct GameState {
    pub match_id: MatchId,
    pub config: MatchConfig,
    pub tick: Tick,
    pub map: HexMap,
    pub players: BTreeMap<FactionId, Faction>,
    pub units: UnitRegistry,
    pub worms: BTreeMap<WormId, Worm>,
    next_worm_id: u32,
    pub weather: WeatherState,
    pub mission: Option<MissionProgress>,
    pub tally: Tally,
    /// Units currently selected by the human player
    pub selection: BTreeSet<UnitId>,
    pub status: MatchStatus,
    pub rng: ChaCha8Rng,
    pub(crate) controllers: Vec<Box<dyn FactionController>>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Start a match: generate the map and seat every faction
    pub fn new(config: MatchConfig) -> SimResult<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let map = generate_map(&config, &mut rng);
        Self::assemble(config, map, rng)
    }

    /// Start a match on a prepared map
    pub fn with_map(config: MatchConfig, map: HexMap) -> SimResult<Self> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::assemble(config, map, rng)
    }

    fn assemble(config: MatchConfig, map: HexMap, rng: ChaCha8Rng) -> SimResult<Self> {
        let mission = match config.mode {
            GameMode::Campaign => Some(MissionProgress::new(config.campaign_level)?),
            GameMode::Skirmish | GameMode::Coop => None,
        };

        let mut state = Self {
            match_id: MatchId::new(),
            tick: 0,
            map,
            players: BTreeMap::new(),
            units: UnitRegistry::new(),
            worms: BTreeMap::new(),
            next_worm_id: 1,
            weather: WeatherState::new(),
            mission,
            tally: Tally::default(),
            selection: BTreeSet::new(),
            status: MatchStatus::Running,
            rng,
            controllers: Vec::new(),
            events: Vec::new(),
            config,
        };
        state.seat_factions()?;

        info!(
            match_id = %state.match_id,
            house = %state.config.house,
            mode = ?state.config.mode,
            factions = state.players.len(),
            "match started"
        );
        Ok(state)
    }

    fn seat_factions(&mut self) -> SimResult<()> {
        let human = self.config.house;
        let rivals = human.others();
        let ai_sites = ai_base_sites(self.map.width, self.map.height);

        self.seat(FactionId::Player, human, PLAYER_BASE)?;

        for slot in 0..self.config.ai_count {
            let id = FactionId::Ai(slot);
            let house = rivals[slot as usize % rivals.len()];
            self.seat(id, house, ai_sites[slot as usize])?;

            let personality = self.config.personality_for(slot);
            let profile = self.config.difficulty.profile();
            self.controllers
                .push(Box::new(AiController::new(id, personality, profile)));
        }

        for slot in 0..self.config.coop_players {
            let id = FactionId::Coop(slot);
            let house = rivals[(self.config.ai_count + slot) as usize % rivals.len()];
            self.seat(id, house, COOP_BASES[slot as usize])?;
            self.controllers.push(Box::new(CoopController::new(id)));
        }
        Ok(())
    }

    fn seat(&mut self, id: FactionId, house: House, base: HexCoord) -> SimResult<()> {
        let tile = self
            .map
            .get_mut(base)
            .ok_or_else(|| SimError::Config(format!("base site {base} for {id} is off the map")))?;
        tile.building = Some(Building::new(StructureKind::Base, id));
        tile.owner = Some(id);
        self.map.clear_sinkhole(base);

        debug!(faction = %id, %house, %base, "faction seated");
        self.players.insert(
            id,
            Faction {
                id,
                house,
                economy: Economy::new(),
                base,
            },
        );
        Ok(())
    }

    // === Faction access ===

    pub fn faction(&self, id: FactionId) -> Option<&Faction> {
        self.players.get(&id)
    }

    pub fn faction_mut(&mut self, id: FactionId) -> Option<&mut Faction> {
        self.players.get_mut(&id)
    }

    pub fn economy(&self, id: FactionId) -> Option<&Economy> {
        self.players.get(&id).map(|f| &f.economy)
    }

    pub fn economy_mut(&mut self, id: FactionId) -> Option<&mut Economy> {
        self.players.get_mut(&id).map(|f| &mut f.economy)
    }

    pub fn controllers(&self) -> &[Box<dyn FactionController>] {
        &self.controllers
    }

    /// Credit a kill reward to `faction`, and to the killing unit's own
    /// reserve when its house gates superweapons on the unit
    pub fn credit_kill(&mut self, faction: FactionId, killer: Option<UnitId>) {
        let Some(record) = self.players.get_mut(&faction) else {
            return;
        };
        let reward = record.house.kill_reward();
        record.economy.credit_meter(record.house.meter(), reward);

        if let Some(unit) = killer.and_then(|id| self.units.get_mut(id)) {
            if unit.house.gate_source() == GateSource::Unit {
                unit.reserve = unit.reserve.saturating_add(reward);
            }
        }
    }

    // === Unit placement ===

    /// Create a unit for `faction` on an unoccupied tile
    pub fn spawn_unit(&mut self, faction: FactionId, kind: UnitKind, at: HexCoord) -> SimResult<UnitId> {
        let house = self
            .faction(faction)
            .map(|f| f.house)
            .ok_or_else(|| SimError::InvalidTarget(format!("no faction {faction}")))?;
        let tile = self.map.tile_at(at)?;
        if tile.unit.is_some() {
            return Err(SimError::Occupied(at));
        }

        let id = self.units.insert(Unit::new(kind, house, faction, at));
        if let Some(tile) = self.map.get_mut(at) {
            tile.unit = Some(id);
        }
        self.emit(EventKind::UnitSpawned {
            unit: id,
            faction,
            kind,
            at,
        });
        Ok(id)
    }

    /// Move a unit to an unoccupied tile, keeping both records in sync
    pub fn relocate_unit(&mut self, id: UnitId, to: HexCoord) -> SimResult<()> {
        let from = self
            .units
            .get(id)
            .map(|u| u.hex)
            .ok_or_else(|| SimError::InvalidTarget(format!("no unit {id}")))?;
        let tile = self.map.tile_at(to)?;
        if tile.unit.is_some_and(|other| other != id) {
            return Err(SimError::Occupied(to));
        }

        if let Some(tile) = self.map.get_mut(from) {
            if tile.unit == Some(id) {
                tile.unit = None;
            }
        }
        if let Some(tile) = self.map.get_mut(to) {
            tile.unit = Some(id);
        }
        if let Some(unit) = self.units.get_mut(id) {
            unit.hex = to;
        }
        Ok(())
    }

    /// Drop a unit from the registry, its tile and the selection
    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        let unit = self.units.remove(id)?;
        if let Some(tile) = self.map.get_mut(unit.hex) {
            if tile.unit == Some(id) {
                tile.unit = None;
            }
        }
        self.selection.remove(&id);
        Some(unit)
    }

    pub fn spawn_worm(&mut self, mut worm: Worm) -> SimResult<WormId> {
        self.map.tile_at(worm.hex)?;
        let id = WormId(self.next_worm_id);
        self.next_worm_id += 1;
        worm.id = id;

        let (at, great_maker) = (worm.hex, worm.is_great_maker());
        self.worms.insert(id, worm);
        self.emit(EventKind::WormSpawned {
            worm: id,
            at,
            great_maker,
        });
        Ok(id)
    }

    // === Events ===

    pub fn emit(&mut self, kind: EventKind) {
        self.events.push(GameEvent::new(self.tick, kind));
    }

    /// Events emitted since the last drain
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Territory ===

    /// Fraction of live spice fields owned by any human-side faction
    pub fn human_spice_control(&self) -> f32 {
        let live = self.map.live_spice_fields();
        if live.is_empty() {
            return 0.0;
        }
        let held = live
            .iter()
            .filter(|c| {
                self.map
                    .get(**c)
                    .and_then(|t| t.owner)
                    .is_some_and(|o| o.is_human_side())
            })
            .count();
        held as f32 / live.len() as f32
    }

    pub fn is_running(&self) -> bool {
        self.status == MatchStatus::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::tile::SpiceField;

    fn open_state() -> GameState {
        GameState::with_map(MatchConfig::default(), HexMap::open(20, 20)).unwrap()
    }

    #[test]
    fn test_factions_seated_with_starting_funds() {
        let state = open_state();
        assert_eq!(state.players.len(), 2);
        for faction in state.players.values() {
            assert_eq!(faction.economy.spice, 1500);
            assert_eq!(faction.economy.solaris, 750);
        }
        assert_eq!(state.faction(FactionId::Ai(0)).unwrap().house, House::Harkonnen);
        assert_eq!(state.faction(FactionId::Ai(0)).unwrap().base, HexCoord::new(14, 14));
    }

    #[test]
    fn test_base_placed_and_owned() {
        let state = open_state();
        let tile = state.map.get(PLAYER_BASE).unwrap();
        assert_eq!(tile.owner, Some(FactionId::Player));
        let base = tile.building.as_ref().unwrap();
        assert_eq!(base.kind, StructureKind::Base);
        assert_eq!(base.hp, 300);
    }

    #[test]
    fn test_base_off_map_is_config_error() {
        let result = GameState::with_map(MatchConfig::default(), HexMap::open(4, 4));
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn test_coop_houses_cycle_after_ai() {
        let config = MatchConfig {
            mode: GameMode::Coop,
            ai_count: 2,
            coop_players: 3,
            ..MatchConfig::default()
        };
        let state = GameState::with_map(config, HexMap::open(20, 20)).unwrap();
        let houses: Vec<House> = state.players.values().map(|f| f.house).collect();
        // player, coop0..2, ai0..1 in key order
        assert_eq!(
            houses,
            vec![
                House::Atreides,
                House::SpacingGuild,
                House::BeneGesserit,
                House::Harkonnen,
                House::Harkonnen,
                House::Fremen,
            ]
        );
        assert_eq!(state.controllers().len(), 5);
    }

    #[test]
    fn test_spawn_rejects_occupied_tile() {
        let mut state = open_state();
        let at = HexCoord::new(2, 2);
        state.spawn_unit(FactionId::Player, UnitKind::Trooper, at).unwrap();
        let second = state.spawn_unit(FactionId::Ai(0), UnitKind::Trooper, at);
        assert!(matches!(second, Err(SimError::Occupied(_))));
        assert_eq!(state.units.len(), 1);
    }

    #[test]
    fn test_relocate_and_remove_keep_tiles_in_sync() {
        let mut state = open_state();
        let id = state
            .spawn_unit(FactionId::Player, UnitKind::Trooper, HexCoord::new(2, 2))
            .unwrap();
        state.relocate_unit(id, HexCoord::new(3, 3)).unwrap();
        assert_eq!(state.map.get(HexCoord::new(2, 2)).unwrap().unit, None);
        assert_eq!(state.map.get(HexCoord::new(3, 3)).unwrap().unit, Some(id));

        state.selection.insert(id);
        state.remove_unit(id).unwrap();
        assert_eq!(state.map.get(HexCoord::new(3, 3)).unwrap().unit, None);
        assert!(state.selection.is_empty());
    }

    #[test]
    fn test_credit_kill_pays_unit_reserve_for_unit_gated_houses() {
        let mut state = open_state();
        let killer = state
            .spawn_unit(FactionId::Ai(0), UnitKind::Infantry, HexCoord::new(2, 2))
            .unwrap();
        state.credit_kill(FactionId::Ai(0), Some(killer));
        assert_eq!(state.economy(FactionId::Ai(0)).unwrap().fear, 30);
        assert_eq!(state.units.get(killer).unwrap().reserve, 30);

        let atreides = state
            .spawn_unit(FactionId::Player, UnitKind::Infantry, HexCoord::new(3, 2))
            .unwrap();
        state.credit_kill(FactionId::Player, Some(atreides));
        assert_eq!(state.economy(FactionId::Player).unwrap().choam, 25);
        assert_eq!(state.units.get(atreides).unwrap().reserve, 0);
    }

    #[test]
    fn test_human_spice_control() {
        let mut map = HexMap::open(20, 20);
        for q in 0..4 {
            map.add_spice_field(HexCoord::new(q, 15), SpiceField::new()).unwrap();
        }
        let mut state = GameState::with_map(MatchConfig::default(), map).unwrap();
        assert_eq!(state.human_spice_control(), 0.0);

        state.map.get_mut(HexCoord::new(0, 15)).unwrap().owner = Some(FactionId::Player);
        state.map.get_mut(HexCoord::new(1, 15)).unwrap().owner = Some(FactionId::Ai(0));
        assert_eq!(state.human_spice_control(), 0.25);
    }
}
