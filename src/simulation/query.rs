//! Read-only views for presentation layers
//!
//! Every view is a plain serializable value detached from the state, so a
//! renderer or the headless runner can hold it across ticks.

use serde::Serialize;

use crate::campaign::mission::MissionStatus;
use crate::core::types::{MatchId, Tick, UnitId, WormId};
use crate::faction::economy::Economy;
use crate::faction::house::{FactionId, House};
use crate::map::hex::HexCoord;
use crate::map::tile::{StructureKind, Terrain};
use crate::map::weather::WeatherKind;
use crate::simulation::state::{GameState, MatchStatus, Tally};
use crate::unit::kind::UnitKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileView {
    pub at: HexCoord,
    pub terrain: Terrain,
    pub building: Option<StructureKind>,
    pub unit: Option<UnitId>,
    pub owner: Option<FactionId>,
    pub sinkhole: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitView {
    pub id: UnitId,
    pub name: String,
    pub kind: UnitKind,
    pub faction: FactionId,
    pub at: HexCoord,
    pub hp: i32,
    pub max_hp: i32,
    pub selected: bool,
    pub stealthed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WormView {
    pub id: WormId,
    pub at: HexCoord,
    pub hp: i32,
    pub great_maker: bool,
    pub ally: Option<FactionId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactionView {
    pub id: FactionId,
    pub house: House,
    pub economy: Economy,
    pub units: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionView {
    pub key: &'static str,
    pub title: &'static str,
    pub status: MissionStatus,
    pub cycles_left: u32,
    pub narrative_key: String,
}

/// Whole-match summary, as printed by the headless runner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSnapshot {
    pub match_id: MatchId,
    pub tick: Tick,
    pub status: MatchStatus,
    pub weather: WeatherKind,
    pub factions: Vec<FactionView>,
    pub units: Vec<UnitView>,
    pub worms: Vec<WormView>,
    pub mission: Option<MissionView>,
    pub tally: Tally,
    pub spice_control: f32,
}

impl GameState {
    /// Tiles currently revealed to the human side
    pub fn visible_tiles(&self) -> Vec<TileView> {
        self.map
            .tiles()
            .filter(|t| t.visible)
            .map(|t| TileView {
                at: t.coord,
                terrain: t.terrain,
                building: t.building.as_ref().map(|b| b.kind),
                unit: t.unit,
                owner: t.owner,
                sinkhole: t.sinkhole,
            })
            .collect()
    }

    /// Every live unit, in id order
    pub fn live_units(&self) -> Vec<UnitView> {
        self.units
            .iter()
            .filter(|u| u.is_alive())
            .map(|u| UnitView {
                id: u.id,
                name: u.name(),
                kind: u.kind,
                faction: u.faction,
                at: u.hex,
                hp: u.hp,
                max_hp: u.max_hp,
                selected: self.selection.contains(&u.id),
                stealthed: u.is_stealthed(),
            })
            .collect()
    }

    /// Live units the human side can see: its own, plus hostile units on
    /// revealed tiles that are not stealthed
    pub fn visible_units(&self) -> Vec<UnitView> {
        self.live_units()
            .into_iter()
            .filter(|u| {
                u.faction.is_human_side()
                    || (!u.stealthed && self.map.get(u.at).is_some_and(|t| t.visible))
            })
            .collect()
    }

    pub fn active_worms(&self) -> Vec<WormView> {
        self.worms
            .values()
            .filter(|w| w.is_alive())
            .map(|w| WormView {
                id: w.id,
                at: w.hex,
                hp: w.hp,
                great_maker: w.is_great_maker(),
                ally: w.ally,
            })
            .collect()
    }

    pub fn economy_snapshot(&self) -> Vec<FactionView> {
        self.players
            .values()
            .map(|f| FactionView {
                id: f.id,
                house: f.house,
                economy: f.economy.clone(),
                units: self.units.owned_by(f.id).count(),
            })
            .collect()
    }

    pub fn mission_view(&self) -> Option<MissionView> {
        self.mission.as_ref().map(|m| MissionView {
            key: m.def().key,
            title: m.def().title,
            status: m.status,
            cycles_left: m.cycles_left,
            narrative_key: m.narrative_key(),
        })
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            match_id: self.match_id,
            tick: self.tick,
            status: self.status,
            weather: self.weather.kind,
            factions: self.economy_snapshot(),
            units: self.live_units(),
            worms: self.active_worms(),
            mission: self.mission_view(),
            tally: self.tally,
            spice_control: self.human_spice_control(),
        }
    }
}
