//! Pins: the atomic connection points owned by parts.

use super::types::{ComponentId, Voltage};
use crate::components::VoltageResettable;
use crate::geometry::Point;

/// A connection point on a part.
///
/// A pin can be attached to any number of wires and bonded to at most one
/// other pin. Bonds are always symmetric; they are only changed through
/// [`Diagram::bond_pins`](super::Diagram::bond_pins) and
/// [`Diagram::unbond_pin`](super::Diagram::unbond_pin), which update both
/// sides together.
#[derive(Debug, Clone)]
pub struct Pin {
    pub id: ComponentId,
    /// The part that created this pin
    pub owner: Option<ComponentId>,
    /// Layout name, e.g. "tip" or "pin2"
    pub name: String,
    /// Position relative to the owning part
    pub position: Point,
    voltage: Voltage,
    bonded_pin: Option<ComponentId>,
    is_bond_source: bool,
}

impl Pin {
    /// Create an unbonded pin with no voltage.
    pub fn new(id: ComponentId, owner: Option<ComponentId>, name: impl Into<String>, position: Point) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            position,
            voltage: Voltage::NONE,
            bonded_pin: None,
            is_bond_source: false,
        }
    }

    /// Current voltage.
    pub fn voltage(&self) -> Voltage {
        self.voltage
    }

    /// True for any non-zero voltage.
    pub fn has_voltage(&self) -> bool {
        self.voltage.is_live()
    }

    /// The pin this one is bonded to, if any.
    pub fn bonded_pin_id(&self) -> Option<ComponentId> {
        self.bonded_pin
    }

    /// Whether this pin initiated its bond. Only used for drawing the
    /// internal connector; never affects propagation.
    pub fn is_bond_source(&self) -> bool {
        self.is_bond_source
    }

    pub(crate) fn set_voltage(&mut self, value: Voltage) {
        self.voltage = value;
    }

    pub(crate) fn set_bond(&mut self, other: ComponentId, is_source: bool) {
        self.bonded_pin = Some(other);
        self.is_bond_source = is_source;
    }

    pub(crate) fn clear_bond(&mut self) -> Option<ComponentId> {
        self.is_bond_source = false;
        self.bonded_pin.take()
    }
}

impl VoltageResettable for Pin {
    fn voltage(&self) -> Voltage {
        self.voltage
    }

    fn reset_voltage(&mut self) {
        self.voltage = Voltage::NONE;
    }
}
