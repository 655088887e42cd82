//! Player-facing commands
//!
//! Every command validates fully before mutating, so a rejected command
//! leaves the state untouched. Unit commands take `None` to act on the
//! current selection; each selected unit is ordered independently.

use tracing::debug;

use crate::core::error::{SimError, SimResult};
use crate::core::types::UnitId;
use crate::faction::economy::Cost;
use crate::faction::house::{FactionId, House};
use crate::faction::superweapon::{fire_superweapon, SuperweaponEffect};
use crate::map::hex::HexCoord;
use crate::map::tile::{Building, StructureKind};
use crate::pathfinding::find_path;
use crate::simulation::events::EventKind;
use crate::simulation::state::GameState;
use crate::unit::kind::UnitKind;
use crate::unit::unit::{MoveMode, Target, Unit, ATTACK_WIND_UP};

/// Spice charged for a Guild fold
pub const FOLD_COST: u32 = 75;
const FOLD_BASE_COOLDOWN: u32 = 20;
const FOLD_MIN_COOLDOWN: u32 = 5;
const FOLD_FAVOR_STEP: u32 = 200;

/// Fold cooldown shortened by Guild favor
pub fn fold_cooldown(favor: u32) -> u32 {
    FOLD_BASE_COOLDOWN
        .saturating_sub(favor / FOLD_FAVOR_STEP)
        .max(FOLD_MIN_COOLDOWN)
}

impl GameState {
    /// Replace the selection; unknown and dead ids are dropped
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = UnitId>) -> usize {
        self.selection = ids
            .into_iter()
            .filter(|id| self.units.get(*id).is_some_and(|u| u.is_alive()))
            .collect();
        let count = self.selection.len();
        self.emit(EventKind::SelectionChanged { count });
        count
    }

    /// Run `order` for one unit, or for every selected unit
    fn for_units<T>(
        &mut self,
        unit: Option<UnitId>,
        mut order: impl FnMut(&mut Self, UnitId) -> SimResult<T>,
    ) -> SimResult<T> {
        if let Some(id) = unit {
            return order(self, id);
        }
        let selected: Vec<UnitId> = self.selection.iter().copied().collect();
        let mut outcome = Err(SimError::InvalidTarget("empty selection".into()));
        for id in selected {
            match order(self, id) {
                Ok(value) => outcome = Ok(value),
                Err(err) => {
                    debug!(unit = %id, %err, "order rejected");
                    if outcome.is_err() {
                        outcome = Err(err);
                    }
                }
            }
        }
        outcome
    }

    pub fn issue_move(&mut self, unit: Option<UnitId>, to: HexCoord, mode: MoveMode) -> SimResult<()> {
        self.for_units(unit, |state, id| match mode {
            MoveMode::Normal => state.order_walk(id, to),
            MoveMode::Touch => state.order_fold(id, to),
        })
    }

    fn order_walk(&mut self, id: UnitId, to: HexCoord) -> SimResult<()> {
        let from = self.live_unit(id)?.hex;
        self.map.tile_at(to)?;
        let path = find_path(&self.map, from, to);
        if path.is_empty() {
            return Err(SimError::NoPath { from, to });
        }

        if let Some(unit) = self.units.get_mut(id) {
            unit.target = None;
            unit.assign_path(path);
        }
        self.emit(EventKind::MoveOrdered { unit: id, to });
        Ok(())
    }

    /// Guild fold: instant, paid relocation to any empty tile
    fn order_fold(&mut self, id: UnitId, to: HexCoord) -> SimResult<()> {
        let unit = self.live_unit(id)?;
        let (faction, from) = (unit.faction, unit.hex);
        if unit.house != House::SpacingGuild {
            return Err(SimError::NotAllowed(format!("{} cannot fold space", unit.name())));
        }
        if unit.cooldown > 0 {
            return Err(SimError::OnCooldown {
                remaining: unit.cooldown,
            });
        }
        if !self.map.tile_at(to)?.is_empty() {
            return Err(SimError::Occupied(to));
        }

        let economy = self
            .economy_mut(faction)
            .ok_or_else(|| SimError::InvalidTarget(format!("no faction {faction}")))?;
        economy.spend(Cost::new(FOLD_COST, 0))?;
        let cooldown = fold_cooldown(economy.favor);

        self.relocate_unit(id, to)?;
        if let Some(unit) = self.units.get_mut(id) {
            unit.path.clear();
            unit.cooldown = cooldown;
        }
        self.emit(EventKind::Folded { unit: id, from, to });
        Ok(())
    }

    pub fn issue_attack(&mut self, unit: Option<UnitId>, target: Target) -> SimResult<()> {
        self.for_units(unit, |state, id| state.order_attack(id, target))
    }

    fn order_attack(&mut self, id: UnitId, target: Target) -> SimResult<()> {
        let unit = self.live_unit(id)?;
        let (faction, hex, range) = (unit.faction, unit.hex, unit.range);

        let target_hex = match target {
            Target::Unit(victim) => self
                .units
                .get(victim)
                .filter(|v| v.is_alive() && v.faction.is_hostile_to(&faction))
                .map(|v| v.hex),
            Target::Worm(worm) => self
                .worms
                .get(&worm)
                .filter(|w| w.is_alive() && !w.is_allied_with(faction))
                .map(|w| w.hex),
            Target::Building(at) => self
                .map
                .get(at)
                .and_then(|t| t.building.as_ref())
                .filter(|b| b.owner.is_hostile_to(&faction))
                .map(|_| at),
        }
        .ok_or_else(|| SimError::InvalidTarget(format!("{target:?} is not a hostile target")))?;

        let distance = hex.distance(&target_hex);
        if distance > range {
            return Err(SimError::OutOfRange { distance, range });
        }

        if let Some(unit) = self.units.get_mut(id) {
            unit.target = Some(target);
            unit.wind_up = ATTACK_WIND_UP;
        }
        self.emit(EventKind::AttackOrdered { unit: id, target });
        Ok(())
    }

    /// Pay for and place a structure on a tile without one
    pub fn issue_build(&mut self, faction: FactionId, kind: StructureKind, at: HexCoord) -> SimResult<()> {
        let cost = kind
            .cost()
            .ok_or_else(|| SimError::NotAllowed(format!("{} cannot be built", kind.name())))?;
        if self.faction(faction).is_none() {
            return Err(SimError::InvalidTarget(format!("no faction {faction}")));
        }
        if self.map.tile_at(at)?.building.is_some() {
            return Err(SimError::Occupied(at));
        }

        if let Some(economy) = self.economy_mut(faction) {
            economy.spend(cost)?;
        }
        let tile = self.map.tile_at_mut(at)?;
        tile.building = Some(Building::new(kind, faction));
        tile.owner = Some(faction);

        debug!(%faction, kind = kind.name(), %at, "structure built");
        self.emit(EventKind::BuildingPlaced { faction, kind, at });
        Ok(())
    }

    /// Pay for and spawn a unit on an unoccupied tile
    pub fn issue_unit_production(
        &mut self,
        faction: FactionId,
        kind: UnitKind,
        at: HexCoord,
    ) -> SimResult<UnitId> {
        let economy = self
            .economy(faction)
            .ok_or_else(|| SimError::InvalidTarget(format!("no faction {faction}")))?;
        let cost = kind.cost();
        if !economy.can_afford(cost) {
            let (resource, needed, available) = if economy.spice < cost.spice {
                ("spice", cost.spice, economy.spice)
            } else {
                ("solaris", cost.solaris, economy.solaris)
            };
            return Err(SimError::InsufficientResources {
                resource,
                needed,
                available,
            });
        }
        if self.map.tile_at(at)?.unit.is_some() {
            return Err(SimError::Occupied(at));
        }

        let id = self.spawn_unit(faction, kind, at)?;
        if let Some(economy) = self.economy_mut(faction) {
            economy.spend(cost)?;
        }
        Ok(id)
    }

    /// Fire a carried superweapon; only elites carry one
    pub fn issue_superweapon(
        &mut self,
        unit: Option<UnitId>,
        at: HexCoord,
    ) -> SimResult<SuperweaponEffect> {
        self.for_units(unit, |state, id| {
            let caster = state.live_unit(id)?;
            if !caster.kind.carries_superweapon() {
                return Err(SimError::NotAllowed(format!(
                    "{} carries no superweapon",
                    caster.name()
                )));
            }
            fire_superweapon(state, id, at)
        })
    }

    fn live_unit(&self, id: UnitId) -> SimResult<&Unit> {
        self.units
            .get(id)
            .filter(|u| u.is_alive())
            .ok_or_else(|| SimError::InvalidTarget(format!("no live unit {id}")))
    }
}
