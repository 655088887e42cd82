//! Consistency checks over a `GameState`
//!
//! These are bug detectors, not gameplay limits. The tick driver runs them in
//! debug builds and logs anything they report.

use std::fmt;

use crate::core::types::UnitId;
use crate::map::hex::HexCoord;
use crate::simulation::state::GameState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Unit stands on a coordinate that has no tile
    UnitOffMap { unit: UnitId, at: HexCoord },
    /// Unit's hex does not point back at it
    OccupancyMismatch {
        unit: UnitId,
        at: HexCoord,
        found: Option<UnitId>,
    },
    /// Tile names a unit that does not exist
    PhantomOccupant { at: HexCoord, unit: UnitId },
    /// Tile names a unit standing elsewhere
    StaleOccupant {
        at: HexCoord,
        unit: UnitId,
        actual: HexCoord,
    },
    HpAboveMax { unit: UnitId, hp: i32, max_hp: i32 },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnitOffMap { unit, at } => write!(f, "{unit} stands on missing tile {at}"),
            Self::OccupancyMismatch { unit, at, found } => match found {
                Some(other) => write!(f, "{unit} at {at} but tile holds {other}"),
                None => write!(f, "{unit} at {at} but tile is empty"),
            },
            Self::PhantomOccupant { at, unit } => {
                write!(f, "tile {at} holds missing {unit}")
            }
            Self::StaleOccupant { at, unit, actual } => {
                write!(f, "tile {at} holds {unit} which stands at {actual}")
            }
            Self::HpAboveMax { unit, hp, max_hp } => {
                write!(f, "{unit} has hp {hp} above max {max_hp}")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Check every invariant, returning the violations found
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for unit in state.units.iter() {
        match state.map.get(unit.hex) {
            None => violations.push(InvariantViolation::UnitOffMap {
                unit: unit.id,
                at: unit.hex,
            }),
            Some(tile) if tile.unit != Some(unit.id) => {
                violations.push(InvariantViolation::OccupancyMismatch {
                    unit: unit.id,
                    at: unit.hex,
                    found: tile.unit,
                })
            }
            Some(_) => {}
        }
        if unit.hp > unit.max_hp {
            violations.push(InvariantViolation::HpAboveMax {
                unit: unit.id,
                hp: unit.hp,
                max_hp: unit.max_hp,
            });
        }
    }

    for tile in state.map.tiles() {
        let Some(id) = tile.unit else {
            continue;
        };
        match state.units.get(id) {
            None => violations.push(InvariantViolation::PhantomOccupant {
                at: tile.coord,
                unit: id,
            }),
            Some(unit) if unit.hex != tile.coord => {
                violations.push(InvariantViolation::StaleOccupant {
                    at: tile.coord,
                    unit: id,
                    actual: unit.hex,
                })
            }
            Some(_) => {}
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MatchConfig;
    use crate::faction::house::FactionId;
    use crate::map::grid::HexMap;
    use crate::unit::kind::UnitKind;

    fn open_state() -> GameState {
        GameState::with_map(MatchConfig::default(), HexMap::open(20, 20)).unwrap()
    }

    #[test]
    fn test_clean_state_has_no_violations() {
        let mut state = open_state();
        state
            .spawn_unit(FactionId::Player, UnitKind::Trooper, HexCoord::new(8, 8))
            .unwrap();
        assert!(check_invariants(&state).is_empty());
    }

    #[test]
    fn test_detects_desynced_tile() {
        let mut state = open_state();
        let at = HexCoord::new(8, 8);
        let id = state
            .spawn_unit(FactionId::Player, UnitKind::Trooper, at)
            .unwrap();
        state.map.get_mut(at).unwrap().unit = None;

        let violations = check_invariants(&state);
        assert_eq!(
            violations,
            vec![InvariantViolation::OccupancyMismatch {
                unit: id,
                at,
                found: None
            }]
        );
        assert!(violations[0].to_string().contains("tile is empty"));
    }

    #[test]
    fn test_detects_phantom_and_overheal() {
        let mut state = open_state();
        let id = state
            .spawn_unit(FactionId::Player, UnitKind::Trooper, HexCoord::new(8, 8))
            .unwrap();
        state.units.get_mut(id).unwrap().hp = 999;
        state.map.get_mut(HexCoord::new(2, 2)).unwrap().unit = Some(UnitId(77));

        let violations = check_invariants(&state);
        assert!(violations.contains(&InvariantViolation::HpAboveMax {
            unit: id,
            hp: 999,
            max_hp: 60
        }));
        assert!(violations.contains(&InvariantViolation::PhantomOccupant {
            at: HexCoord::new(2, 2),
            unit: UnitId(77)
        }));
    }
}
