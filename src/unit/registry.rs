use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::UnitId;
use crate::faction::house::FactionId;
use crate::unit::unit::Unit;

/// Live units keyed by id, iterated in id order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitRegistry {
    units: BTreeMap<UnitId, Unit>,
    next_id: u32,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self {
            units: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Insert a unit, assigning it a fresh id
    pub fn insert(&mut self, mut unit: Unit) -> UnitId {
        let id = UnitId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        unit.id = id;
        self.units.insert(id, unit);
        id
    }

    pub fn remove(&mut self, id: UnitId) -> Option<Unit> {
        self.units.remove(&id)
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn ids(&self) -> Vec<UnitId> {
        self.units.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.values_mut()
    }

    pub fn owned_by(&self, faction: FactionId) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |u| u.faction == faction)
    }

    /// Live units hostile to `faction`
    pub fn hostile_to(&self, faction: FactionId) -> impl Iterator<Item = &Unit> {
        self.units
            .values()
            .filter(move |u| u.is_alive() && u.faction.is_hostile_to(&faction))
    }
}
