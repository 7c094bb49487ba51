//! Voltage propagation.
//!
//! A cascade starts with one [`Diagram::pin_receive_voltage`] call and runs
//! synchronously, by direct recursion, until no pin or wire changes value.
//! For a pin the rules are, in order:
//!
//! 1. If it already holds the value, stop.
//! 2. If it holds a negative value and the value is positive, stop. Ground
//!    is sticky until reset.
//! 3. Store the value, forward it to every attached wire except the one it
//!    arrived on, then to the bonded pin unless it came from there.
//! 4. Notify voltage listeners.
//!
//! A wire ignores a repeat of its current value; otherwise it stores the
//! value, remembers which pin supplied it and forwards it to its other end.
//! Rule 1 on both is what terminates cycles.

use super::types::{ComponentId, Voltage};
use super::Diagram;
use crate::components::VoltageResettable;
use crate::error::Result;

/// Direction of current on a live wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Positive voltage: signal toward the output
    Signal,
    /// Negative voltage: ground return
    Return,
}

/// What the visualizer needs to animate one live wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireActivity {
    pub wire: ComponentId,
    pub voltage: Voltage,
    pub flow: Flow,
    /// Pin the voltage arrived from
    pub from_pin: ComponentId,
    /// Pin the voltage flowed to
    pub to_pin: ComponentId,
}

impl Diagram {
    /// Deliver `value` to a pin and run the cascade to quiescence.
    ///
    /// `from_wire` is the wire the value arrived on, `from_pin` the pin it
    /// came from (used to avoid echoing back across a bond).
    pub fn pin_receive_voltage(
        &mut self,
        pin: ComponentId,
        value: Voltage,
        from_wire: Option<ComponentId>,
        from_pin: Option<ComponentId>,
    ) -> Result<()> {
        let p = self.pin_mut(pin)?;
        let current = p.voltage();
        if current == value {
            log::trace!("pin {} already at {}, not propagating", pin, value);
            return Ok(());
        }
        if current.is_ground() && value.is_hot() {
            log::debug!("pin {} grounded, ignoring {}", pin, value);
            return Ok(());
        }
        p.set_voltage(value);
        log::debug!(
            "pin {} <- {} (wire {:?}, pin {:?})",
            pin,
            value,
            from_wire.map(|id| id.0),
            from_pin.map(|id| id.0)
        );

        for wire in self.wires_attached_to(pin) {
            if Some(wire) != from_wire {
                self.wire_receive_voltage(wire, value, pin)?;
            }
        }

        if let Some(bonded) = self.pin(pin)?.bonded_pin_id() {
            if Some(bonded) != from_pin {
                self.pin_receive_voltage(bonded, value, None, Some(pin))?;
            }
        }

        self.emit_voltage_changed(pin, value)
    }

    /// Deliver `value` to a wire from one of its pins and forward it to the
    /// other end.
    pub fn wire_receive_voltage(&mut self, wire: ComponentId, value: Voltage, from_pin: ComponentId) -> Result<()> {
        let w = self.wire_mut(wire)?;
        if w.voltage() == value {
            return Ok(());
        }
        w.set_voltage(value, from_pin);
        let target = w.other_end(from_pin);
        log::debug!("wire {} carries {} from {} to {}", wire, value, from_pin, target);
        self.pin_receive_voltage(target, value, Some(wire), Some(from_pin))
    }

    /// Zero every pin and wire without propagating.
    pub fn reset_voltages(&mut self) {
        for component in self.components.values_mut() {
            match component {
                super::Component::Pin(p) => p.reset_voltage(),
                super::Component::Wire(w) => w.reset_voltage(),
                super::Component::Part(_) => {}
            }
        }
        log::debug!("all voltages reset");
    }

    /// Every wire that currently carries voltage, in id order.
    pub fn live_wires(&self) -> Vec<WireActivity> {
        self.wires()
            .filter(|w| w.has_voltage())
            .map(|w| {
                let from_pin = w.voltage_source_pin().unwrap_or_else(|| w.start_pin());
                WireActivity {
                    wire: w.id,
                    voltage: w.voltage(),
                    flow: if w.voltage().is_hot() { Flow::Signal } else { Flow::Return },
                    from_pin,
                    to_pin: w.other_end(from_pin),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::components::PartKind;
    use crate::diagram::VoltageListener;
    use crate::error::WiringError;

    #[derive(Debug, Default)]
    struct Counter {
        calls: Cell<usize>,
    }

    impl VoltageListener for Counter {
        fn voltage_changed(&self, _diagram: &mut Diagram, _pin: ComponentId, _value: Voltage) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }
    }

    fn two_caps(diagram: &mut Diagram) -> (ComponentId, ComponentId, ComponentId, ComponentId) {
        let c1 = diagram.add_part(PartKind::CeramicDiscCap).unwrap();
        let c2 = diagram.add_part(PartKind::CeramicDiscCap).unwrap();
        let p1 = diagram.part(c1).unwrap().pins().to_vec();
        let p2 = diagram.part(c2).unwrap().pins().to_vec();
        (p1[0], p1[1], p2[0], p2[1])
    }

    #[test]
    fn test_idempotent_receive() {
        let mut diagram = Diagram::new();
        let (a, _, b, _) = two_caps(&mut diagram);
        let wire = diagram.add_wire(a, b).unwrap();
        let counter = Rc::new(Counter::default());
        diagram.on_voltage_changed(b, counter.clone()).unwrap();

        diagram.pin_receive_voltage(a, Voltage::HOT, None, None).unwrap();
        diagram.pin_receive_voltage(a, Voltage::HOT, None, None).unwrap();

        assert_eq!(counter.calls.get(), 1);
        assert_eq!(diagram.wire(wire).unwrap().voltage(), Voltage::HOT);
        assert_eq!(diagram.wire(wire).unwrap().voltage_source_pin(), Some(a));
    }

    #[test]
    fn test_ground_precedence() {
        let mut diagram = Diagram::new();
        let (a, _, _, _) = two_caps(&mut diagram);
        diagram.pin_receive_voltage(a, Voltage::GROUND, None, None).unwrap();
        diagram.pin_receive_voltage(a, Voltage::HOT, None, None).unwrap();
        assert_eq!(diagram.pin(a).unwrap().voltage(), Voltage::GROUND);
    }

    #[test]
    fn test_positive_overridden_by_ground() {
        let mut diagram = Diagram::new();
        let (a, _, b, _) = two_caps(&mut diagram);
        diagram.add_wire(a, b).unwrap();
        diagram.pin_receive_voltage(a, Voltage::HOT, None, None).unwrap();
        diagram.pin_receive_voltage(a, Voltage::GROUND, None, None).unwrap();
        assert_eq!(diagram.pin(b).unwrap().voltage(), Voltage::GROUND);
    }

    #[test]
    fn test_cycle_of_bond_and_wire_terminates() {
        let mut diagram = Diagram::new();
        let (a, b, c, _) = two_caps(&mut diagram);
        diagram.bond_pins(a, b).unwrap();
        let w1 = diagram.add_wire(a, b).unwrap();
        let w2 = diagram.add_wire(b, c).unwrap();
        let w3 = diagram.add_wire(c, a).unwrap();

        diagram.pin_receive_voltage(a, Voltage::HOT, None, None).unwrap();

        for pin in [a, b, c] {
            assert_eq!(diagram.pin(pin).unwrap().voltage(), Voltage::HOT);
        }
        for wire in [w1, w2, w3] {
            assert_eq!(diagram.wire(wire).unwrap().voltage(), Voltage::HOT);
        }
    }

    #[test]
    fn test_bond_forwards_without_echo() {
        let mut diagram = Diagram::new();
        let (a, b, _, _) = two_caps(&mut diagram);
        diagram.bond_pins(a, b).unwrap();
        let counter = Rc::new(Counter::default());
        diagram.on_voltage_changed(a, counter.clone()).unwrap();

        diagram.pin_receive_voltage(b, Voltage::HOT, None, None).unwrap();
        assert_eq!(diagram.pin(a).unwrap().voltage(), Voltage::HOT);
        assert_eq!(counter.calls.get(), 1);
    }

    #[test]
    fn test_missing_pin_aborts_cascade() {
        let mut diagram = Diagram::new();
        let (a, _, b, _) = two_caps(&mut diagram);
        let wire = diagram.add_wire(a, b).unwrap();
        let cap = diagram.pin(b).unwrap().owner.unwrap();
        diagram.remove(cap).unwrap();

        let err = diagram.pin_receive_voltage(a, Voltage::HOT, None, None);
        assert!(matches!(err, Err(WiringError::ComponentNotFound { .. })));
        assert_eq!(diagram.wire(wire).unwrap().voltage(), Voltage::HOT);
    }

    #[test]
    fn test_reset_voltages() {
        let mut diagram = Diagram::new();
        let (a, _, b, _) = two_caps(&mut diagram);
        let wire = diagram.add_wire(a, b).unwrap();
        diagram.pin_receive_voltage(a, Voltage::HOT, None, None).unwrap();

        diagram.reset_voltages();
        assert!(!diagram.pin(a).unwrap().has_voltage());
        assert!(!diagram.pin(b).unwrap().has_voltage());
        assert!(!diagram.wire(wire).unwrap().has_voltage());
        assert_eq!(diagram.wire(wire).unwrap().voltage_source_pin(), None);
    }

    #[test]
    fn test_live_wires_direction() {
        let mut diagram = Diagram::new();
        let (a, b, c, d) = two_caps(&mut diagram);
        let hot = diagram.add_wire(a, c).unwrap();
        let ground = diagram.add_wire(b, d).unwrap();
        diagram.add_wire(a, b).unwrap();
        diagram.pin_receive_voltage(c, Voltage::HOT, None, None).unwrap();

        let live = diagram.live_wires();
        assert_eq!(live.len(), 3);
        let first = live.iter().find(|w| w.wire == hot).unwrap();
        assert_eq!(first.flow, Flow::Signal);
        assert_eq!(first.from_pin, c);
        assert_eq!(first.to_pin, a);

        diagram.reset_voltages();
        diagram.pin_receive_voltage(d, Voltage::GROUND, None, None).unwrap();
        let live = diagram.live_wires();
        let ret = live.iter().find(|w| w.wire == ground).unwrap();
        assert_eq!(ret.flow, Flow::Return);
        assert_eq!(ret.to_pin, b);
    }
}
