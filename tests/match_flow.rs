//! Whole-match integration tests: setup, campaign flow and replay

use dune_hegemony::ai::Personality;
use dune_hegemony::campaign::MissionStatus;
use dune_hegemony::core::config::{GameMode, MatchConfig};
use dune_hegemony::faction::{FactionId, House};
use dune_hegemony::map::{HexCoord, HexMap, StructureKind};
use dune_hegemony::simulation::{EventKind, GameState, MatchStatus, PLAYER_BASE};
use dune_hegemony::unit::{Target, UnitKind};

#[test]
fn test_bene_gesserit_skirmish_setup() {
    let config = MatchConfig {
        house: House::BeneGesserit,
        ai_count: 1,
        personalities: vec![Personality::Defensive],
        ..MatchConfig::default()
    };
    let mut state = GameState::new(config).unwrap();

    assert_eq!(state.players.len(), 2);
    for faction in state.players.values() {
        assert_eq!(faction.economy.spice, 1500);
        assert_eq!(faction.economy.solaris, 750);
    }
    assert_eq!(
        state.faction(FactionId::Ai(0)).unwrap().house,
        House::Atreides
    );

    state.run(10);
    assert_eq!(state.tick, 10);
    assert!(state.units.is_empty());

    let base = state.map.get(PLAYER_BASE).unwrap();
    assert_eq!(base.owner, Some(FactionId::Player));
    let building = base.building.as_ref().unwrap();
    assert_eq!(building.kind, StructureKind::Base);
    assert_eq!(building.hp, 300);
    assert_eq!(state.status, MatchStatus::Running);
}

#[test]
fn test_campaign_mission_resolves_match() {
    let config = MatchConfig {
        mode: GameMode::Campaign,
        campaign_level: 3,
        ..MatchConfig::default()
    };
    let mut state = GameState::with_map(config, HexMap::open(20, 20)).unwrap();
    let ai_base = state.faction(FactionId::Ai(0)).unwrap().base;
    let elite = state
        .spawn_unit(
            FactionId::Player,
            UnitKind::Elite,
            HexCoord::new(ai_base.q - 1, ai_base.r),
        )
        .unwrap();
    state
        .issue_attack(Some(elite), Target::Building(ai_base))
        .unwrap();

    let events = state.run(50);
    assert_eq!(state.tick, 7);
    assert_eq!(state.tally.bases_destroyed, 1);
    assert_eq!(state.status, MatchStatus::Victory);

    let mission = state.mission_view().unwrap();
    assert_eq!(mission.status, MissionStatus::Succeeded);
    assert_eq!(mission.narrative_key, "mission.desert_power.victory");
    assert!(events.iter().any(|e| e.kind
        == EventKind::MissionResolved {
            key: "desert_power".to_string(),
            status: MissionStatus::Succeeded,
        }));
}

#[test]
fn test_campaign_ignores_skirmish_victory_rule() {
    let config = MatchConfig {
        mode: GameMode::Campaign,
        campaign_level: 1,
        ..MatchConfig::default()
    };
    let mut state = GameState::with_map(config, HexMap::open(20, 20)).unwrap();
    let ai_base = state.faction(FactionId::Ai(0)).unwrap().base;
    state.map.get_mut(ai_base).unwrap().building = None;

    state.run(5);
    assert_eq!(state.status, MatchStatus::Running);
    assert_eq!(state.mission_view().unwrap().cycles_left, 1495);
}

#[test]
fn test_same_seed_replays_exactly() {
    let config = MatchConfig {
        ai_count: 3,
        personalities: vec![
            Personality::Swarm,
            Personality::Opportunist,
            Personality::Strategic,
        ],
        seed: 7,
        ..MatchConfig::default()
    };

    let play = || {
        let mut state = GameState::new(config.clone()).unwrap();
        for faction in state.players.values_mut() {
            faction.economy.earn(20_000, 10_000);
        }
        let events = state.run(150);
        (state, events)
    };
    let (a, events_a) = play();
    let (b, events_b) = play();

    assert_eq!(events_a, events_b);
    assert_eq!(a.live_units(), b.live_units());
    assert_eq!(a.economy_snapshot(), b.economy_snapshot());
    assert_eq!(a.active_worms(), b.active_worms());
    assert!(a.map.tiles().eq(b.map.tiles()));
    assert!(!a.units.is_empty());
}
