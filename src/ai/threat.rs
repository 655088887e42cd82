//! Threat estimate used by the AI for logging and posture decisions

use crate::faction::house::FactionId;
use crate::map::hex::HexCoord;
use crate::simulation::state::GameState;

const HP_WEIGHT: f32 = 0.5;
const DISTANCE_WEIGHT: f32 = 0.3;
const SPICE_FIELD_WEIGHT: f32 = 10.0;

/// Sum over hostile units of hp and proximity to `base`, scaled by aggression.
///
/// Every hostile unit also adds a fixed term per spice field on the map, so
/// resource-rich maps read as more dangerous.
pub fn threat_score(state: &GameState, faction: FactionId, base: HexCoord, aggression: f32) -> f32 {
    let spice_term = state.map.spice_fields().count() as f32 * SPICE_FIELD_WEIGHT;
    let raw: f32 = state
        .units
        .hostile_to(faction)
        .map(|u| {
            u.hp as f32 * HP_WEIGHT - base.distance(&u.hex) as f32 * DISTANCE_WEIGHT + spice_term
        })
        .sum();
    raw * aggression
}
