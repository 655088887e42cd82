//! Automated co-op partners

use tracing::debug;

use crate::ai::controller::PRODUCTION_RADIUS;
use crate::ai::FactionController;
use crate::faction::house::FactionId;
use crate::simulation::state::GameState;
use crate::unit::kind::UnitKind;

/// Spice balance above which a co-op partner buys an elite
pub const COOP_ELITE_THRESHOLD: u32 = 4000;

/// Co-op slot that reinforces the human side with elites
#[derive(Debug, Clone)]
pub struct CoopController {
    faction: FactionId,
}

impl CoopController {
    pub fn new(faction: FactionId) -> Self {
        Self { faction }
    }
}

impl FactionController for CoopController {
    fn faction(&self) -> FactionId {
        self.faction
    }

    fn process_tick(&mut self, state: &mut GameState) {
        let Some(record) = state.faction(self.faction) else {
            return;
        };
        if record.economy.spice <= COOP_ELITE_THRESHOLD {
            return;
        }
        let Some(at) = state.map.free_hex_near(record.base, PRODUCTION_RADIUS) else {
            return;
        };
        match state.issue_unit_production(self.faction, UnitKind::Elite, at) {
            Ok(unit) => debug!(faction = %self.faction, %unit, "co-op elite deployed"),
            Err(err) => debug!(faction = %self.faction, %err, "co-op elite skipped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{GameMode, MatchConfig};
    use crate::map::grid::HexMap;

    fn coop_state() -> GameState {
        let config = MatchConfig {
            mode: GameMode::Coop,
            coop_players: 1,
            ..MatchConfig::default()
        };
        GameState::with_map(config, HexMap::open(20, 20)).unwrap()
    }

    #[test]
    fn test_coop_buys_elite_when_rich() {
        let mut state = coop_state();
        let mut coop = CoopController::new(FactionId::Coop(0));

        coop.process_tick(&mut state);
        assert_eq!(state.units.len(), 0);

        state.economy_mut(FactionId::Coop(0)).unwrap().spice = 4001;
        coop.process_tick(&mut state);

        let economy = state.economy(FactionId::Coop(0)).unwrap();
        assert_eq!(economy.spice, 4001 - 680);
        assert_eq!(economy.solaris, 750 - 340);
        let elite = state.units.iter().next().unwrap();
        assert_eq!(elite.kind, UnitKind::Elite);
        assert_eq!(elite.faction, FactionId::Coop(0));
    }
}
