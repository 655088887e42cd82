//! Property tests: tile occupancy and unit positions never drift apart

use proptest::prelude::*;

use dune_hegemony::ai::Personality;
use dune_hegemony::core::config::{HazardDensity, MatchConfig};
use dune_hegemony::faction::House;
use dune_hegemony::simulation::{check_invariants, GameState};

fn personality(index: u8) -> Personality {
    match index % 5 {
        0 => Personality::Swarm,
        1 => Personality::Strategic,
        2 => Personality::Opportunist,
        3 => Personality::Defensive,
        _ => Personality::Balanced,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_occupancy_consistent(
        seed in any::<u64>(),
        ai_count in 1u8..=4,
        house_index in 0usize..5,
        mix in 0u8..5,
    ) {
        let config = MatchConfig {
            house: House::all()[house_index],
            ai_count,
            personalities: (0..ai_count).map(|i| personality(mix + i)).collect(),
            hazard_density: HazardDensity::High,
            seed,
            ..MatchConfig::default()
        };
        let mut state = GameState::new(config).unwrap();
        for faction in state.players.values_mut() {
            faction.economy.earn(30_000, 10_000);
        }

        for _ in 0..80 {
            state.tick();
            let violations = check_invariants(&state);
            prop_assert!(violations.is_empty(), "tick {}: {:?}", state.tick, violations);

            for unit in state.units.iter() {
                let tile = state.map.get(unit.hex);
                prop_assert!(tile.is_some_and(|t| t.unit == Some(unit.id)));
            }
            let occupied = state.map.tiles().filter(|t| t.unit.is_some()).count();
            prop_assert_eq!(occupied, state.units.len());
        }
    }
}
