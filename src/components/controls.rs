//! Control parts: switches and the potentiometer.
//!
//! Both keep a small integer actuator state. Changing it never edits bonds
//! incrementally; the diagram drops every bond the part owns and rebonds
//! from the topology's table for the new state.

use std::fmt;

use super::{Flippable, PartKind, PinSlot, Rotatable, Topology};
use crate::diagram::{ComponentId, Diagram, DiagramEvent};
use crate::error::{Result, WiringError};
use crate::geometry::Point;

const DPDT_LAYOUT: [PinSlot; 6] = [
    PinSlot::new("pin6", 10.0, 9.0),
    PinSlot::new("pin3", 32.0, 9.0),
    PinSlot::new("pin5", 10.0, 24.0),
    PinSlot::new("pin2", 32.0, 24.0),
    PinSlot::new("pin4", 10.0, 39.0),
    PinSlot::new("pin1", 32.0, 39.0),
];

// Indices into DPDT_LAYOUT
const PIN6: usize = 0;
const PIN3: usize = 1;
const PIN5: usize = 2;
const PIN2: usize = 3;
const PIN4: usize = 4;
const PIN1: usize = 5;

const TOGGLE_LAYOUT: [PinSlot; 5] = [
    PinSlot::new("pin1", 2.0, 14.0),
    PinSlot::new("pin2", 2.0, 44.0),
    PinSlot::new("pin3", 122.0, 20.0),
    PinSlot::new("pin4", 122.0, 38.0),
    PinSlot::new("ground", 17.0, 29.0),
];

const BLADE_LAYOUT: [PinSlot; 4] = [
    PinSlot::new("common", 4.0, 30.0),
    PinSlot::new("lug1", 40.0, 10.0),
    PinSlot::new("lug2", 40.0, 30.0),
    PinSlot::new("lug3", 40.0, 50.0),
];

const POT_LAYOUT: [PinSlot; 4] = [
    PinSlot::new("pin3", 25.0, 110.0),
    PinSlot::new("wiper", 49.0, 110.0),
    PinSlot::new("pin1", 73.0, 110.0),
    PinSlot::new("ground", 77.0, 64.0),
];

const TWO_POSITION: [i8; 2] = [0, 1];
const THREE_POSITION: [i8; 3] = [-1, 0, 1];

/// Switch types. Each is a [`Topology`] strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchModel {
    /// Two positions: 0 and 1
    DpdtOnOn,
    /// Three positions with an open centre
    DpdtOnOffOn,
    DpdtOnOnOn,
    /// Les Paul style three-way toggle
    ThreeWayToggle,
    /// Single pole lever selector, one lug per position
    ThreeWayBlade,
}

impl SwitchModel {
    pub fn kind(&self) -> PartKind {
        match self {
            SwitchModel::DpdtOnOn => PartKind::DpdtOnOn,
            SwitchModel::DpdtOnOffOn => PartKind::DpdtOnOffOn,
            SwitchModel::DpdtOnOnOn => PartKind::DpdtOnOnOn,
            SwitchModel::ThreeWayToggle => PartKind::ThreeWayToggle,
            SwitchModel::ThreeWayBlade => PartKind::ThreeWayBlade,
        }
    }

    fn is_three_position(&self) -> bool {
        !matches!(self, SwitchModel::DpdtOnOn)
    }

    /// Actuator state remembered as "previous" on a new switch.
    ///
    /// Three-position DPDTs behave as if they arrived at the centre from -1,
    /// so their first flip goes to +1.
    pub fn initial_previous_state(&self) -> i8 {
        match self {
            SwitchModel::DpdtOnOffOn | SwitchModel::DpdtOnOnOn => -1,
            _ => 0,
        }
    }
}

impl Topology for SwitchModel {
    fn pin_layout(&self) -> &'static [PinSlot] {
        match self {
            SwitchModel::DpdtOnOn | SwitchModel::DpdtOnOffOn | SwitchModel::DpdtOnOnOn => {
                &DPDT_LAYOUT
            }
            SwitchModel::ThreeWayToggle => &TOGGLE_LAYOUT,
            SwitchModel::ThreeWayBlade => &BLADE_LAYOUT,
        }
    }

    fn bonds_for(&self, state: i8) -> Option<&'static [(usize, usize)]> {
        match (self, state) {
            (SwitchModel::DpdtOnOn, 0) => Some(&[(PIN2, PIN1), (PIN5, PIN4)]),
            (SwitchModel::DpdtOnOn, 1) => Some(&[(PIN2, PIN3), (PIN5, PIN6)]),

            (SwitchModel::DpdtOnOffOn, -1) => Some(&[(PIN2, PIN3), (PIN5, PIN6)]),
            (SwitchModel::DpdtOnOffOn, 0) => Some(&[]),
            (SwitchModel::DpdtOnOffOn, 1) => Some(&[(PIN2, PIN1), (PIN5, PIN4)]),

            (SwitchModel::DpdtOnOnOn, -1) => Some(&[(PIN2, PIN3), (PIN5, PIN6)]),
            (SwitchModel::DpdtOnOnOn, 0) => Some(&[(PIN2, PIN3), (PIN5, PIN4)]),
            (SwitchModel::DpdtOnOnOn, 1) => Some(&[(PIN2, PIN1), (PIN5, PIN4)]),

            // pin1..pin4 are indices 0..3
            (SwitchModel::ThreeWayToggle, -1) => Some(&[(0, 2)]),
            (SwitchModel::ThreeWayToggle, 0) => Some(&[(0, 2), (1, 3)]),
            (SwitchModel::ThreeWayToggle, 1) => Some(&[(1, 3)]),

            (SwitchModel::ThreeWayBlade, -1) => Some(&[(0, 1)]),
            (SwitchModel::ThreeWayBlade, 0) => Some(&[(0, 2)]),
            (SwitchModel::ThreeWayBlade, 1) => Some(&[(0, 3)]),

            _ => None,
        }
    }

    fn valid_states(&self) -> &'static [i8] {
        if self.is_three_position() {
            &THREE_POSITION
        } else {
            &TWO_POSITION
        }
    }

    fn next_state(&self, current: i8, previous: i8) -> i8 {
        if !self.is_three_position() {
            return if current == 0 { 1 } else { 0 };
        }
        match current {
            0 if previous == -1 => 1,
            0 => -1,
            _ => 0,
        }
    }
}

/// A switch part.
#[derive(Debug, Clone)]
pub struct Switch {
    pub id: ComponentId,
    pub model: SwitchModel,
    pub label: Option<String>,
    pub position: Point,
    pub(crate) pins: Vec<ComponentId>,
    state: i8,
    /// Last non-centre state, used by three-position switches
    previous_state: i8,
}

impl Switch {
    /// Create a switch in the centre (or first) position.
    pub fn new(id: ComponentId, model: SwitchModel, pins: Vec<ComponentId>) -> Self {
        Self {
            id,
            model,
            label: None,
            position: Point::default(),
            pins,
            state: 0,
            previous_state: model.initial_previous_state(),
        }
    }

    pub fn previous_state(&self) -> i8 {
        self.previous_state
    }

    /// Restore a persisted actuator state. An unknown state is logged and
    /// ignored; the switch keeps its last valid state.
    pub fn restore(&mut self, state: i8, previous: i8) -> bool {
        if !self.model.is_valid_state(state) {
            log::warn!("{} ({}): ignoring invalid switch state {}", self.model.kind(), self.id.0, state);
            return false;
        }
        self.state = state;
        self.previous_state = if self.model.is_valid_state(previous) {
            previous
        } else {
            let fallback = self.model.initial_previous_state();
            log::warn!(
                "{} ({}): ignoring invalid previous state {}, using {}",
                self.model.kind(),
                self.id.0,
                previous,
                fallback
            );
            fallback
        };
        true
    }

    /// Pin id by layout name, e.g. `"pin2"`.
    pub fn pin(&self, name: &str) -> Option<ComponentId> {
        self.model
            .pin_layout()
            .iter()
            .position(|slot| slot.name == name)
            .and_then(|idx| self.pins.get(idx).copied())
    }
}

impl Flippable for Switch {
    fn actuator_state(&self) -> i8 {
        self.state
    }

    fn flip(&mut self) -> i8 {
        let next = self.model.next_state(self.state, self.previous_state);
        if self.state != 0 {
            self.previous_state = self.state;
        }
        self.state = next;
        next
    }
}

/// Potentiometer shaft position, simplified to its two ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    /// Wiper bonded to pin3
    #[default]
    CounterClockwise,
    /// Wiper bonded to pin1
    Clockwise,
}

impl Rotation {
    pub fn as_i8(&self) -> i8 {
        match self {
            Rotation::CounterClockwise => -1,
            Rotation::Clockwise => 1,
        }
    }

    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Rotation::CounterClockwise),
            1 => Some(Rotation::Clockwise),
            _ => None,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Rotation::CounterClockwise => Rotation::Clockwise,
            Rotation::Clockwise => Rotation::CounterClockwise,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

/// Topology of the potentiometer. The rotation is the actuator state.
#[derive(Debug, Clone, Copy)]
pub struct PotentiometerTopology;

pub(crate) const POTENTIOMETER: PotentiometerTopology = PotentiometerTopology;

impl Topology for PotentiometerTopology {
    fn pin_layout(&self) -> &'static [PinSlot] {
        &POT_LAYOUT
    }

    fn bonds_for(&self, state: i8) -> Option<&'static [(usize, usize)]> {
        match state {
            -1 => Some(&[(1, 0)]),
            1 => Some(&[(1, 2)]),
            _ => None,
        }
    }

    fn valid_states(&self) -> &'static [i8] {
        &[-1, 1]
    }

    fn next_state(&self, current: i8, _previous: i8) -> i8 {
        -current
    }
}

/// A potentiometer: two end pins, a wiper and a ground lug.
#[derive(Debug, Clone)]
pub struct Potentiometer {
    pub id: ComponentId,
    pub label: Option<String>,
    pub position: Point,
    pub(crate) pins: Vec<ComponentId>,
    rotation: Rotation,
}

impl Potentiometer {
    /// Create a potentiometer turned fully counter-clockwise.
    pub fn new(id: ComponentId, pins: Vec<ComponentId>) -> Self {
        Self {
            id,
            label: None,
            position: Point::default(),
            pins,
            rotation: Rotation::default(),
        }
    }

    /// Restore a persisted rotation value. Anything but -1 or 1 is logged
    /// and ignored.
    pub fn restore(&mut self, value: i8) -> bool {
        match Rotation::from_i8(value) {
            Some(rotation) => {
                self.rotation = rotation;
                true
            }
            None => {
                log::warn!("Potentiometer ({}): ignoring invalid rotation {}", self.id.0, value);
                false
            }
        }
    }

    pub fn wiper(&self) -> Option<ComponentId> {
        self.pins.get(1).copied()
    }
}

impl Rotatable for Potentiometer {
    fn rotation(&self) -> Rotation {
        self.rotation
    }

    fn rotate(&mut self) -> Rotation {
        self.rotation = self.rotation.reversed();
        self.rotation
    }
}

impl Diagram {
    /// Flip a switch: advance its actuator, rebond its pins from scratch and
    /// queue a [`DiagramEvent::SwitchFlipped`].
    pub fn flip(&mut self, id: ComponentId) -> Result<i8> {
        let part = self.part_mut(id)?;
        let name = part.full_name();
        let state = part
            .as_flippable_mut()
            .ok_or_else(|| WiringError::not_capable(name.clone(), "flip"))?
            .flip();
        log::info!("{} flipped to {}", name, state);
        self.rederive_bonds(id)?;
        self.push_event(DiagramEvent::SwitchFlipped { id, state });
        Ok(state)
    }

    /// Rotate a potentiometer to its other end.
    pub fn rotate(&mut self, id: ComponentId) -> Result<Rotation> {
        let part = self.part_mut(id)?;
        let name = part.full_name();
        let rotation = part
            .as_rotatable_mut()
            .ok_or_else(|| WiringError::not_capable(name.clone(), "rotate"))?
            .rotate();
        log::info!("{} rotated to {}", name, rotation);
        self.rederive_bonds(id)?;
        self.push_event(DiagramEvent::PotRotated { id, rotation });
        Ok(rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Part;

    fn bond_of(diagram: &Diagram, part: ComponentId, name: &str) -> Option<ComponentId> {
        let pin = diagram.part(part).unwrap().pin_named(name).unwrap();
        diagram.pin(pin).unwrap().bonded_pin_id()
    }

    fn pin_of(diagram: &Diagram, part: ComponentId, name: &str) -> ComponentId {
        diagram.part(part).unwrap().pin_named(name).unwrap()
    }

    #[test]
    fn test_dpdt_on_on_flip_rebonds() {
        let mut diagram = Diagram::new();
        let sw = diagram.add_part(PartKind::DpdtOnOn).unwrap();

        assert_eq!(bond_of(&diagram, sw, "pin2"), Some(pin_of(&diagram, sw, "pin1")));
        assert_eq!(bond_of(&diagram, sw, "pin5"), Some(pin_of(&diagram, sw, "pin4")));

        assert_eq!(diagram.flip(sw).unwrap(), 1);

        assert_eq!(bond_of(&diagram, sw, "pin2"), Some(pin_of(&diagram, sw, "pin3")));
        assert_eq!(bond_of(&diagram, sw, "pin5"), Some(pin_of(&diagram, sw, "pin6")));
        // Old partners fully released
        assert_eq!(bond_of(&diagram, sw, "pin1"), None);
        assert_eq!(bond_of(&diagram, sw, "pin4"), None);
        assert_eq!(bond_of(&diagram, sw, "pin3"), Some(pin_of(&diagram, sw, "pin2")));
        assert_eq!(bond_of(&diagram, sw, "pin6"), Some(pin_of(&diagram, sw, "pin5")));

        assert_eq!(diagram.flip(sw).unwrap(), 0);
        assert_eq!(bond_of(&diagram, sw, "pin2"), Some(pin_of(&diagram, sw, "pin1")));
    }

    #[test]
    fn test_bond_source_flag() {
        let mut diagram = Diagram::new();
        let sw = diagram.add_part(PartKind::DpdtOnOn).unwrap();
        let pin2 = pin_of(&diagram, sw, "pin2");
        let pin1 = pin_of(&diagram, sw, "pin1");
        assert!(diagram.pin(pin2).unwrap().is_bond_source());
        assert!(!diagram.pin(pin1).unwrap().is_bond_source());
    }

    #[test]
    fn test_three_position_transitions() {
        let model = SwitchModel::DpdtOnOffOn;
        assert_eq!(model.next_state(0, -1), 1);
        assert_eq!(model.next_state(0, 1), -1);
        assert_eq!(model.next_state(-1, 0), 0);
        assert_eq!(model.next_state(1, -1), 0);
    }

    #[test]
    fn test_on_off_on_full_cycle() {
        let mut diagram = Diagram::new();
        let sw = diagram.add_part(PartKind::DpdtOnOffOn).unwrap();

        // Centre is open
        assert_eq!(bond_of(&diagram, sw, "pin2"), None);

        let states: Vec<i8> = (0..4).map(|_| diagram.flip(sw).unwrap()).collect();
        assert_eq!(states, vec![1, 0, -1, 0]);

        // Arrived at centre from -1, so the next flip goes to +1 again
        assert_eq!(diagram.flip(sw).unwrap(), 1);
        assert_eq!(bond_of(&diagram, sw, "pin2"), Some(pin_of(&diagram, sw, "pin1")));
    }

    #[test]
    fn test_on_on_on_bonds() {
        let mut diagram = Diagram::new();
        let sw = diagram.add_part(PartKind::DpdtOnOnOn).unwrap();
        assert_eq!(bond_of(&diagram, sw, "pin2"), Some(pin_of(&diagram, sw, "pin3")));
        assert_eq!(bond_of(&diagram, sw, "pin5"), Some(pin_of(&diagram, sw, "pin4")));

        diagram.flip(sw).unwrap();
        assert_eq!(bond_of(&diagram, sw, "pin2"), Some(pin_of(&diagram, sw, "pin1")));
    }

    #[test]
    fn test_toggle_first_flip_goes_negative() {
        let mut diagram = Diagram::new();
        let sw = diagram.add_part(PartKind::ThreeWayToggle).unwrap();
        assert_eq!(bond_of(&diagram, sw, "pin1"), Some(pin_of(&diagram, sw, "pin3")));
        assert_eq!(bond_of(&diagram, sw, "pin2"), Some(pin_of(&diagram, sw, "pin4")));

        assert_eq!(diagram.flip(sw).unwrap(), -1);
        assert_eq!(bond_of(&diagram, sw, "pin2"), None);
        assert_eq!(bond_of(&diagram, sw, "pin1"), Some(pin_of(&diagram, sw, "pin3")));
    }

    #[test]
    fn test_blade_selects_one_lug() {
        let mut diagram = Diagram::new();
        let sw = diagram.add_part(PartKind::ThreeWayBlade).unwrap();
        assert_eq!(bond_of(&diagram, sw, "common"), Some(pin_of(&diagram, sw, "lug2")));
        diagram.flip(sw).unwrap();
        assert_eq!(bond_of(&diagram, sw, "common"), Some(pin_of(&diagram, sw, "lug1")));
        assert_eq!(bond_of(&diagram, sw, "lug2"), None);
    }

    #[test]
    fn test_pot_rotate() {
        let mut diagram = Diagram::new();
        let pot = diagram.add_part(PartKind::Potentiometer).unwrap();
        assert_eq!(bond_of(&diagram, pot, "wiper"), Some(pin_of(&diagram, pot, "pin3")));

        assert_eq!(diagram.rotate(pot).unwrap(), Rotation::Clockwise);
        assert_eq!(bond_of(&diagram, pot, "wiper"), Some(pin_of(&diagram, pot, "pin1")));
        assert_eq!(bond_of(&diagram, pot, "pin3"), None);

        assert_eq!(diagram.rotate(pot).unwrap(), Rotation::CounterClockwise);
        assert_eq!(bond_of(&diagram, pot, "wiper"), Some(pin_of(&diagram, pot, "pin3")));
    }

    #[test]
    fn test_flip_not_capable() {
        let mut diagram = Diagram::new();
        let pot = diagram.add_part(PartKind::Potentiometer).unwrap();
        assert!(matches!(diagram.flip(pot), Err(WiringError::NotCapable { .. })));
        assert!(matches!(diagram.flip(ComponentId(999)), Err(WiringError::ComponentNotFound { .. })));
    }

    #[test]
    fn test_flip_queues_event() {
        let mut diagram = Diagram::new();
        let sw = diagram.add_part(PartKind::DpdtOnOn).unwrap();
        diagram.drain_events();
        diagram.flip(sw).unwrap();
        assert_eq!(
            diagram.drain_events(),
            vec![DiagramEvent::SwitchFlipped { id: sw, state: 1 }]
        );
    }

    #[test]
    fn test_restore_replaces_invalid_previous_state() {
        let mut sw = Switch::new(ComponentId(1), SwitchModel::DpdtOnOffOn, vec![]);
        assert!(sw.restore(0, 7));
        assert_eq!(sw.actuator_state(), 0);
        assert_eq!(sw.previous_state(), -1);

        let mut toggle = Switch::new(ComponentId(2), SwitchModel::ThreeWayToggle, vec![]);
        assert!(toggle.restore(1, 7));
        assert_eq!(toggle.previous_state(), 0);
        // A valid previous state is kept as given
        assert!(toggle.restore(0, 1));
        assert_eq!(toggle.previous_state(), 1);
    }

    #[test]
    fn test_restore_rejects_invalid_state() {
        let mut sw = Switch::new(ComponentId(1), SwitchModel::DpdtOnOn, vec![]);
        assert!(!sw.restore(-1, 0));
        assert_eq!(sw.actuator_state(), 0);
        assert!(sw.restore(1, 0));
        assert_eq!(Part::Switch(sw).actuator_state(), 1);

        let mut pot = Potentiometer::new(ComponentId(2), vec![]);
        assert!(!pot.restore(0));
        assert_eq!(pot.rotation(), Rotation::CounterClockwise);
    }
}
