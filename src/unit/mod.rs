//! Units, the unit registry and sandworms

pub mod kind;
pub mod registry;
#[allow(clippy::module_inception)]
pub mod unit;
pub mod update;
pub mod worm;

pub use kind::{UnitKind, UnitStats};
pub use registry::UnitRegistry;
pub use unit::{MoveMode, Target, Unit, ATTACK_WIND_UP};
pub use update::update_unit;
pub use worm::{update_worms, Worm};
