//! Core identifier and value types for the diagram graph.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for anything on the diagram.
///
/// Pins, wires and parts share one id space and one counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub u32);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete signed voltage carried by pins and wires.
///
/// Positive is "hot" signal, negative is ground/return, zero is no signal.
/// Only the sign is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Voltage(pub i32);

impl Voltage {
    /// No signal.
    pub const NONE: Voltage = Voltage(0);
    /// Signal, as generated by a pickup coil.
    pub const HOT: Voltage = Voltage(1);
    /// Ground / return path, as forced by a jack sleeve.
    pub const GROUND: Voltage = Voltage(-1);

    /// Any non-zero value.
    pub fn is_live(&self) -> bool {
        self.0 != 0
    }

    /// Positive value.
    pub fn is_hot(&self) -> bool {
        self.0 > 0
    }

    /// Negative value.
    pub fn is_ground(&self) -> bool {
        self.0 < 0
    }

    /// Same magnitude, opposite sign.
    pub fn negated(&self) -> Voltage {
        Voltage(-self.0)
    }
}

impl fmt::Display for Voltage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voltage_signs() {
        assert!(!Voltage::NONE.is_live());
        assert!(Voltage::HOT.is_live() && Voltage::HOT.is_hot());
        assert!(Voltage::GROUND.is_live() && Voltage::GROUND.is_ground());
        assert_eq!(Voltage::HOT.negated(), Voltage::GROUND);
        assert_eq!(Voltage::HOT.to_string(), "+1");
        assert_eq!(Voltage::GROUND.to_string(), "-1");
    }
}
