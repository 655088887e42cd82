//! Houses, faction economies and superweapons

pub mod economy;
pub mod house;
pub mod superweapon;

pub use economy::{Cost, Economy, Meter, STARTING_SOLARIS, STARTING_SPICE};
pub use house::{FactionId, GateSource, House};
pub use superweapon::{
    check_superweapon, fire_superweapon, mind_control, SuperweaponEffect, SuperweaponSpec,
    MIND_CONTROL_COST, SUPERWEAPON_RANGE,
};
