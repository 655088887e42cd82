//! Per-faction resource accounting

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{SimError, SimResult};

pub const STARTING_SPICE: u32 = 1500;
pub const STARTING_SOLARIS: u32 = 750;

/// House-exclusive meters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Meter {
    /// Atreides standing with CHOAM ("prestige")
    Choam,
    Fear,
    Faith,
    Favor,
    Will,
}

impl Meter {
    /// Static name for error reporting
    pub fn name(&self) -> &'static str {
        match self {
            Meter::Choam => "choam",
            Meter::Fear => "fear",
            Meter::Faith => "faith",
            Meter::Favor => "favor",
            Meter::Will => "will",
        }
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Spice/solaris price of a unit or structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cost {
    pub spice: u32,
    pub solaris: u32,
}

impl Cost {
    pub const fn new(spice: u32, solaris: u32) -> Self {
        Self { spice, solaris }
    }

    pub fn times(&self, n: u32) -> Self {
        Self::new(self.spice * n, self.solaris * n)
    }
}

/// Economy record for one faction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economy {
    pub spice: u32,
    pub solaris: u32,
    pub choam: u32,
    pub fear: u32,
    pub faith: u32,
    pub favor: u32,
    pub will: u32,
}

impl Default for Economy {
    fn default() -> Self {
        Self::new()
    }
}

impl Economy {
    /// Starting funds for a fresh match
    pub fn new() -> Self {
        Self {
            spice: STARTING_SPICE,
            solaris: STARTING_SOLARIS,
            choam: 0,
            fear: 0,
            faith: 0,
            favor: 0,
            will: 0,
        }
    }

    pub fn meter(&self, meter: Meter) -> u32 {
        match meter {
            Meter::Choam => self.choam,
            Meter::Fear => self.fear,
            Meter::Faith => self.faith,
            Meter::Favor => self.favor,
            Meter::Will => self.will,
        }
    }

    fn meter_mut(&mut self, meter: Meter) -> &mut u32 {
        match meter {
            Meter::Choam => &mut self.choam,
            Meter::Fear => &mut self.fear,
            Meter::Faith => &mut self.faith,
            Meter::Favor => &mut self.favor,
            Meter::Will => &mut self.will,
        }
    }

    pub fn credit_meter(&mut self, meter: Meter, amount: u32) {
        let value = self.meter_mut(meter);
        *value = value.saturating_add(amount);
    }

    /// Deduct from a meter; fails without change when the balance is short
    pub fn spend_meter(&mut self, meter: Meter, amount: u32) -> SimResult<()> {
        let value = self.meter_mut(meter);
        if *value < amount {
            return Err(SimError::InsufficientResources {
                resource: meter.name(),
                needed: amount,
                available: *value,
            });
        }
        *value -= amount;
        Ok(())
    }

    pub fn can_afford(&self, cost: Cost) -> bool {
        self.spice >= cost.spice && self.solaris >= cost.solaris
    }

    /// Pay `cost`; fails without change when either currency is short
    pub fn spend(&mut self, cost: Cost) -> SimResult<()> {
        if self.spice < cost.spice {
            return Err(SimError::InsufficientResources {
                resource: "spice",
                needed: cost.spice,
                available: self.spice,
            });
        }
        if self.solaris < cost.solaris {
            return Err(SimError::InsufficientResources {
                resource: "solaris",
                needed: cost.solaris,
                available: self.solaris,
            });
        }
        self.spice -= cost.spice;
        self.solaris -= cost.solaris;
        Ok(())
    }

    pub fn earn(&mut self, spice: u32, solaris: u32) {
        self.spice = self.spice.saturating_add(spice);
        self.solaris = self.solaris.saturating_add(solaris);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_funds() {
        let economy = Economy::new();
        assert_eq!(economy.spice, 1500);
        assert_eq!(economy.solaris, 750);
        assert_eq!(economy.will, 0);
    }

    #[test]
    fn test_spend_is_all_or_nothing() {
        let mut economy = Economy::new();
        let before = economy.clone();

        let result = economy.spend(Cost::new(100, 1000));
        assert!(matches!(
            result,
            Err(SimError::InsufficientResources { resource: "solaris", .. })
        ));
        assert_eq!(economy, before);

        economy.spend(Cost::new(680, 340)).unwrap();
        assert_eq!(economy.spice, 820);
        assert_eq!(economy.solaris, 410);
    }

    #[test]
    fn test_meters() {
        let mut economy = Economy::new();
        economy.credit_meter(Meter::Fear, 30);
        assert_eq!(economy.meter(Meter::Fear), 30);
        assert!(economy.spend_meter(Meter::Fear, 31).is_err());
        assert_eq!(economy.fear, 30);
        economy.spend_meter(Meter::Fear, 30).unwrap();
        assert_eq!(economy.fear, 0);
    }

    #[test]
    fn test_meter_names_agree() {
        for meter in [Meter::Choam, Meter::Fear, Meter::Faith, Meter::Favor, Meter::Will] {
            assert_eq!(meter.to_string(), meter.name());
            assert_eq!(
                serde_json::to_string(&meter).unwrap(),
                format!("\"{}\"", meter.name())
            );
        }
    }

    #[test]
    fn test_cost_times() {
        assert_eq!(Cost::new(50, 1).times(10), Cost::new(500, 10));
    }
}
