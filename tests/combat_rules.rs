//! Combat, reward and hazard integration tests

use dune_hegemony::core::config::MatchConfig;
use dune_hegemony::core::error::SimError;
use dune_hegemony::faction::{FactionId, GateSource, House, SuperweaponEffect};
use dune_hegemony::map::{HexCoord, HexMap, StructureKind};
use dune_hegemony::simulation::{EventKind, GameState};
use dune_hegemony::unit::{Target, UnitKind};

fn sandbox(house: House) -> GameState {
    let config = MatchConfig {
        house,
        ..MatchConfig::default()
    };
    GameState::with_map(config, HexMap::open(20, 20)).unwrap()
}

#[test]
fn test_kill_reward_paid_once_for_every_house() {
    for house in House::all() {
        let mut state = sandbox(house);
        let killer = state
            .spawn_unit(FactionId::Player, UnitKind::Elite, HexCoord::new(8, 8))
            .unwrap();
        let victim = state
            .spawn_unit(FactionId::Ai(0), UnitKind::Trooper, HexCoord::new(9, 8))
            .unwrap();
        state.units.get_mut(victim).unwrap().hp = 1;
        state
            .issue_attack(Some(killer), Target::Unit(victim))
            .unwrap();

        let events = state.tick();
        assert!(!state.units.contains(victim), "{house}: victim not removed");
        assert!(events.iter().any(|e| e.kind
            == EventKind::UnitKilled {
                unit: victim,
                faction: FactionId::Ai(0),
                credited: None,
            }));

        let reward = house.kill_reward();
        let meter = state.economy(FactionId::Player).unwrap().meter(house.meter());
        assert_eq!(meter, reward, "{house}: faction meter");

        let reserve = state.units.get(killer).unwrap().reserve;
        match house.gate_source() {
            GateSource::Unit => assert_eq!(reserve, reward, "{house}: unit reserve"),
            GateSource::Faction => assert_eq!(reserve, 0, "{house}: unit reserve"),
        }

        state.run(3);
        let meter = state.economy(FactionId::Player).unwrap().meter(house.meter());
        assert_eq!(meter, reward, "{house}: paid twice");
    }
}

#[test]
fn test_fremen_faith_doubles_damage_about_half_the_time() {
    for (reserve, expect_doubles) in [(900, true), (800, false)] {
        let mut state = sandbox(House::Fremen);
        let fedaykin = state
            .spawn_unit(FactionId::Player, UnitKind::Elite, HexCoord::new(8, 8))
            .unwrap();
        let dummy = state
            .spawn_unit(FactionId::Ai(0), UnitKind::Infantry, HexCoord::new(9, 8))
            .unwrap();
        for id in [fedaykin, dummy] {
            let unit = state.units.get_mut(id).unwrap();
            unit.hp = 1_000_000;
            unit.max_hp = 1_000_000;
        }
        state.units.get_mut(fedaykin).unwrap().reserve = reserve;
        state
            .issue_attack(Some(fedaykin), Target::Unit(dummy))
            .unwrap();

        let events = state.run(200);
        let strikes: Vec<i32> = events
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::AttackResolved {
                    attacker, damage, ..
                } if attacker == fedaykin => Some(damage),
                _ => None,
            })
            .collect();
        assert_eq!(strikes.len(), 200);
        assert!(strikes.iter().all(|d| *d == 45 || *d == 90));

        let doubled = strikes.iter().filter(|d| **d == 90).count();
        if expect_doubles {
            assert!((60..=140).contains(&doubled), "doubled {doubled} of 200");
        } else {
            assert_eq!(doubled, 0);
        }
    }
}

#[test]
fn test_sinkhole_stops_unit_in_place() {
    let mut state = sandbox(House::Harkonnen);
    let start = HexCoord::new(8, 8);
    let hole = HexCoord::new(9, 8);
    state.map.set_sinkhole(hole, 0.5).unwrap();
    let id = state
        .spawn_unit(FactionId::Player, UnitKind::Infantry, start)
        .unwrap();
    state
        .units
        .get_mut(id)
        .unwrap()
        .assign_path(vec![hole, HexCoord::new(10, 8)]);

    let events = state.tick();
    let unit = state.units.get(id).unwrap();
    assert_eq!(unit.hex, start);
    assert_eq!(unit.hp, 100 - 200);
    assert!(unit.path.is_empty());
    assert_eq!(state.map.get(start).unwrap().unit, Some(id));
    assert_eq!(state.map.get(hole).unwrap().unit, None);
    assert!(events
        .iter()
        .any(|e| e.kind == EventKind::SinkholeTriggered { unit: id, at: hole }));

    // No killer: the bounty falls back to the unit's own faction
    let events = state.tick();
    assert!(!state.units.contains(id));
    assert!(events.iter().any(|e| e.kind
        == EventKind::UnitKilled {
            unit: id,
            faction: FactionId::Player,
            credited: Some(FactionId::Player),
        }));
    assert_eq!(state.economy(FactionId::Player).unwrap().fear, 30);
}

#[test]
fn test_rejected_commands_leave_state_untouched() {
    let mut state = sandbox(House::Atreides);
    let at = HexCoord::new(8, 8);
    state.economy_mut(FactionId::Player).unwrap().solaris = 339;
    state.economy_mut(FactionId::Player).unwrap().spice = 399;
    state.take_events();
    let before = state.economy(FactionId::Player).cloned();

    let err = state
        .issue_unit_production(FactionId::Player, UnitKind::Elite, at)
        .unwrap_err();
    assert!(matches!(err, SimError::InsufficientResources { .. }));
    let err = state
        .issue_build(FactionId::Player, StructureKind::Turret, at)
        .unwrap_err();
    assert!(matches!(
        err,
        SimError::InsufficientResources {
            resource: "spice",
            needed: 400,
            available: 399
        }
    ));

    assert_eq!(state.economy(FactionId::Player).cloned(), before);
    let tile = state.map.get(at).unwrap();
    assert!(tile.unit.is_none());
    assert!(tile.building.is_none());
    assert!(state.units.is_empty());
    assert!(state.pending_events().is_empty());
}

#[test]
fn test_embargo_gated_on_choam() {
    let mut state = sandbox(House::Atreides);
    let caster = state
        .spawn_unit(FactionId::Player, UnitKind::Elite, HexCoord::new(8, 8))
        .unwrap();
    let enemy = state
        .spawn_unit(FactionId::Ai(0), UnitKind::Infantry, HexCoord::new(12, 10))
        .unwrap();
    state
        .units
        .get_mut(enemy)
        .unwrap()
        .assign_path(vec![HexCoord::new(13, 10)]);
    let aim = HexCoord::new(10, 10);

    state.economy_mut(FactionId::Player).unwrap().choam = 499;
    assert!(state.issue_superweapon(Some(caster), aim).is_err());
    assert_eq!(state.units.get(caster).unwrap().super_cooldown, 0);
    assert_eq!(state.economy(FactionId::Player).unwrap().choam, 499);
    assert_eq!(state.units.get(enemy).unwrap().move_points_remaining, 5);

    state.economy_mut(FactionId::Player).unwrap().choam = 500;
    let effect = state.issue_superweapon(Some(caster), aim).unwrap();
    let SuperweaponEffect::Embargo { halted } = effect else {
        panic!("expected embargo, got {effect:?}");
    };
    assert!(halted.contains(&caster));
    assert!(halted.contains(&enemy));
    assert_eq!(state.economy(FactionId::Player).unwrap().choam, 0);
    assert_eq!(state.units.get(caster).unwrap().super_cooldown, 70);
    assert_eq!(state.units.get(enemy).unwrap().move_points_remaining, 0);
}
