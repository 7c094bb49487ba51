//! Parts that can be placed on a wiring diagram.
//!
//! This module provides models for all supported parts:
//! - Pickups: Strat single coil, Humbucker
//! - Jacks: Mono jack
//! - Controls: DPDT switches, three-way toggle and blade, Potentiometer
//! - Passive: Resistors, Capacitors
//!
//! Every part is a fixed list of pins plus a [`Topology`] strategy that
//! supplies the pin layout, the internal bonds for a given actuator state and
//! the actuator transition table. Behaviors are exposed through capability
//! traits ([`Flippable`], [`Rotatable`], [`PickupCapable`], [`JackCapable`]);
//! callers ask a [`Part`] for the capability and get `None` if it has none.

mod controls;
mod jacks;
mod passive;
mod pickups;

pub use controls::{Potentiometer, Rotation, Switch, SwitchModel};
pub use jacks::{GroundReturn, Jack, JackModel};
pub use passive::{PassiveModel, PositivePassThrough, TwoPin};
pub use pickups::{ActiveCoil, CoilSpec, InductionBootstrap, InductionCoil, Pickup, PickupModel};

use std::fmt;

use crate::diagram::{ComponentId, SubscriptionId, Voltage};
use crate::error::{Result, WiringError};
use crate::geometry::Point;

/// A named pin position in a part's layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinSlot {
    pub name: &'static str,
    /// Position relative to the part origin
    pub position: Point,
}

impl PinSlot {
    pub const fn new(name: &'static str, x: f64, y: f64) -> Self {
        Self {
            name,
            position: Point::new(x, y),
        }
    }
}

/// Strategy describing how a part's pins relate to each other.
pub trait Topology {
    /// Pin names and positions, in creation order.
    fn pin_layout(&self) -> &'static [PinSlot];

    /// Pin index pairs bonded in `state`, bond source first.
    /// `None` if `state` is not valid for this part.
    fn bonds_for(&self, state: i8) -> Option<&'static [(usize, usize)]> {
        if state == 0 {
            Some(&[])
        } else {
            None
        }
    }

    /// Actuator states this part accepts.
    fn valid_states(&self) -> &'static [i8] {
        &[0]
    }

    /// Next actuator state after a flip.
    fn next_state(&self, current: i8, _previous: i8) -> i8 {
        current
    }

    /// Whether `state` is accepted.
    fn is_valid_state(&self, state: i8) -> bool {
        self.valid_states().contains(&state)
    }
}

/// Anything holding a voltage that the simulator zeroes on stop.
pub trait VoltageResettable {
    fn voltage(&self) -> Voltage;
    /// Zero the voltage without propagating.
    fn reset_voltage(&mut self);
}

/// Parts with a switch actuator.
pub trait Flippable {
    fn actuator_state(&self) -> i8;

    /// Advance the actuator by the transition table and return the new state.
    /// The caller rederives bonds.
    fn flip(&mut self) -> i8;
}

/// Parts with a rotating shaft.
pub trait Rotatable {
    fn rotation(&self) -> Rotation;

    /// Swap the wiper to the other end and return the new rotation.
    fn rotate(&mut self) -> Rotation;
}

/// Parts that generate signal while the simulation runs.
pub trait PickupCapable {
    /// Coil end pins to induct between.
    fn coils(&self) -> Vec<CoilSpec>;
    fn is_picking_up(&self) -> bool;
    fn attach_coils(&mut self, coils: Vec<ActiveCoil>);
    fn detach_coils(&mut self) -> Vec<ActiveCoil>;
}

/// Parts that provide the ground return path.
pub trait JackCapable {
    fn tip_pin(&self) -> Option<ComponentId>;
    fn sleeve_pin(&self) -> Option<ComponentId>;
    fn is_jacked_in(&self) -> bool;
    fn attach_listeners(&mut self, subscriptions: Vec<SubscriptionId>);
    fn detach_listeners(&mut self) -> Vec<SubscriptionId>;
}

/// Every placeable part type. The names are the persisted type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    StratPickup,
    Humbucker,
    MonoJack,
    DpdtOnOn,
    DpdtOnOffOn,
    DpdtOnOnOn,
    ThreeWayToggle,
    ThreeWayBlade,
    Potentiometer,
    CarbonResistor,
    MetalResistor,
    BumbleBeeCap,
    OrangeDropCap,
    CeramicDiscCap,
    ChicletCap,
    MalloryMustardCap,
    PolystyreneBlueCap,
    PolystyreneRedCap,
    VitaminQCap,
}

impl PartKind {
    pub const ALL: [PartKind; 19] = [
        PartKind::StratPickup,
        PartKind::Humbucker,
        PartKind::MonoJack,
        PartKind::DpdtOnOn,
        PartKind::DpdtOnOffOn,
        PartKind::DpdtOnOnOn,
        PartKind::ThreeWayToggle,
        PartKind::ThreeWayBlade,
        PartKind::Potentiometer,
        PartKind::CarbonResistor,
        PartKind::MetalResistor,
        PartKind::BumbleBeeCap,
        PartKind::OrangeDropCap,
        PartKind::CeramicDiscCap,
        PartKind::ChicletCap,
        PartKind::MalloryMustardCap,
        PartKind::PolystyreneBlueCap,
        PartKind::PolystyreneRedCap,
        PartKind::VitaminQCap,
    ];

    /// Persisted type tag.
    pub fn name(&self) -> &'static str {
        match self {
            PartKind::StratPickup => "StratPickup",
            PartKind::Humbucker => "Humbucker",
            PartKind::MonoJack => "MonoJack",
            PartKind::DpdtOnOn => "DPDTOnOn",
            PartKind::DpdtOnOffOn => "DPDTOnOffOn",
            PartKind::DpdtOnOnOn => "DPDTOnOnOn",
            PartKind::ThreeWayToggle => "ThreeWayToggle",
            PartKind::ThreeWayBlade => "ThreeWayBlade",
            PartKind::Potentiometer => "Potentiometer",
            PartKind::CarbonResistor => "CarbonResistor",
            PartKind::MetalResistor => "MetalResistor",
            PartKind::BumbleBeeCap => "BumbleBeeCap",
            PartKind::OrangeDropCap => "OrangeDropCap",
            PartKind::CeramicDiscCap => "CeramicDiscCap",
            PartKind::ChicletCap => "ChicletCap",
            PartKind::MalloryMustardCap => "MalloryMustardCap",
            PartKind::PolystyreneBlueCap => "PolystyreneBlueCap",
            PartKind::PolystyreneRedCap => "PolystyreneRedCap",
            PartKind::VitaminQCap => "VitaminQCap",
        }
    }

    /// Look up a type tag.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// The topology strategy for this kind.
    pub fn topology(&self) -> &'static dyn Topology {
        match self {
            PartKind::StratPickup => &PickupModel::Strat,
            PartKind::Humbucker => &PickupModel::Humbucker,
            PartKind::MonoJack => &JackModel::Mono,
            PartKind::DpdtOnOn => &SwitchModel::DpdtOnOn,
            PartKind::DpdtOnOffOn => &SwitchModel::DpdtOnOffOn,
            PartKind::DpdtOnOnOn => &SwitchModel::DpdtOnOnOn,
            PartKind::ThreeWayToggle => &SwitchModel::ThreeWayToggle,
            PartKind::ThreeWayBlade => &SwitchModel::ThreeWayBlade,
            PartKind::Potentiometer => &controls::POTENTIOMETER,
            PartKind::CarbonResistor => &PassiveModel::CarbonResistor,
            PartKind::MetalResistor => &PassiveModel::MetalResistor,
            PartKind::BumbleBeeCap => &PassiveModel::BumbleBeeCap,
            PartKind::OrangeDropCap => &PassiveModel::OrangeDropCap,
            PartKind::CeramicDiscCap => &PassiveModel::CeramicDiscCap,
            PartKind::ChicletCap => &PassiveModel::ChicletCap,
            PartKind::MalloryMustardCap => &PassiveModel::MalloryMustardCap,
            PartKind::PolystyreneBlueCap => &PassiveModel::PolystyreneBlueCap,
            PartKind::PolystyreneRedCap => &PassiveModel::PolystyreneRedCap,
            PartKind::VitaminQCap => &PassiveModel::VitaminQCap,
        }
    }

    /// Pin layout, in creation order.
    pub fn pin_layout(&self) -> &'static [PinSlot] {
        self.topology().pin_layout()
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A part placed on the diagram.
#[derive(Debug, Clone)]
pub enum Part {
    Pickup(Pickup),
    Jack(Jack),
    Switch(Switch),
    Potentiometer(Potentiometer),
    Passive(TwoPin),
}

impl Part {
    /// Build a part of `kind` over already-created pins (in layout order).
    pub fn new(id: ComponentId, kind: PartKind, pins: Vec<ComponentId>) -> Self {
        match kind {
            PartKind::StratPickup => Part::Pickup(Pickup::new(id, PickupModel::Strat, pins)),
            PartKind::Humbucker => Part::Pickup(Pickup::new(id, PickupModel::Humbucker, pins)),
            PartKind::MonoJack => Part::Jack(Jack::new(id, JackModel::Mono, pins)),
            PartKind::DpdtOnOn => Part::Switch(Switch::new(id, SwitchModel::DpdtOnOn, pins)),
            PartKind::DpdtOnOffOn => Part::Switch(Switch::new(id, SwitchModel::DpdtOnOffOn, pins)),
            PartKind::DpdtOnOnOn => Part::Switch(Switch::new(id, SwitchModel::DpdtOnOnOn, pins)),
            PartKind::ThreeWayToggle => {
                Part::Switch(Switch::new(id, SwitchModel::ThreeWayToggle, pins))
            }
            PartKind::ThreeWayBlade => Part::Switch(Switch::new(id, SwitchModel::ThreeWayBlade, pins)),
            PartKind::Potentiometer => Part::Potentiometer(Potentiometer::new(id, pins)),
            PartKind::CarbonResistor => Part::Passive(TwoPin::new(id, PassiveModel::CarbonResistor, pins)),
            PartKind::MetalResistor => Part::Passive(TwoPin::new(id, PassiveModel::MetalResistor, pins)),
            PartKind::BumbleBeeCap => Part::Passive(TwoPin::new(id, PassiveModel::BumbleBeeCap, pins)),
            PartKind::OrangeDropCap => Part::Passive(TwoPin::new(id, PassiveModel::OrangeDropCap, pins)),
            PartKind::CeramicDiscCap => Part::Passive(TwoPin::new(id, PassiveModel::CeramicDiscCap, pins)),
            PartKind::ChicletCap => Part::Passive(TwoPin::new(id, PassiveModel::ChicletCap, pins)),
            PartKind::MalloryMustardCap => {
                Part::Passive(TwoPin::new(id, PassiveModel::MalloryMustardCap, pins))
            }
            PartKind::PolystyreneBlueCap => {
                Part::Passive(TwoPin::new(id, PassiveModel::PolystyreneBlueCap, pins))
            }
            PartKind::PolystyreneRedCap => {
                Part::Passive(TwoPin::new(id, PassiveModel::PolystyreneRedCap, pins))
            }
            PartKind::VitaminQCap => Part::Passive(TwoPin::new(id, PassiveModel::VitaminQCap, pins)),
        }
    }

    /// Get the part ID.
    pub fn id(&self) -> ComponentId {
        match self {
            Part::Pickup(p) => p.id,
            Part::Jack(j) => j.id,
            Part::Switch(s) => s.id,
            Part::Potentiometer(p) => p.id,
            Part::Passive(t) => t.id,
        }
    }

    /// Get the part type tag.
    pub fn kind(&self) -> PartKind {
        match self {
            Part::Pickup(p) => match p.model {
                PickupModel::Strat => PartKind::StratPickup,
                PickupModel::Humbucker => PartKind::Humbucker,
            },
            Part::Jack(j) => match j.model {
                JackModel::Mono => PartKind::MonoJack,
            },
            Part::Switch(s) => s.model.kind(),
            Part::Potentiometer(_) => PartKind::Potentiometer,
            Part::Passive(t) => t.model.kind(),
        }
    }

    /// Owned pin ids, in layout order. Fixed at creation.
    pub fn pins(&self) -> &[ComponentId] {
        match self {
            Part::Pickup(p) => &p.pins,
            Part::Jack(j) => &j.pins,
            Part::Switch(s) => &s.pins,
            Part::Potentiometer(p) => &p.pins,
            Part::Passive(t) => &t.pins,
        }
    }

    /// Optional user label.
    pub fn label(&self) -> Option<&str> {
        match self {
            Part::Pickup(p) => p.label.as_deref(),
            Part::Jack(j) => j.label.as_deref(),
            Part::Switch(s) => s.label.as_deref(),
            Part::Potentiometer(p) => p.label.as_deref(),
            Part::Passive(t) => t.label.as_deref(),
        }
    }

    pub fn set_label(&mut self, label: Option<String>) {
        match self {
            Part::Pickup(p) => p.label = label,
            Part::Jack(j) => j.label = label,
            Part::Switch(s) => s.label = label,
            Part::Potentiometer(p) => p.label = label,
            Part::Passive(t) => t.label = label,
        }
    }

    /// Placement on the canvas.
    pub fn position(&self) -> Point {
        match self {
            Part::Pickup(p) => p.position,
            Part::Jack(j) => j.position,
            Part::Switch(s) => s.position,
            Part::Potentiometer(p) => p.position,
            Part::Passive(t) => t.position,
        }
    }

    pub fn move_to(&mut self, position: Point) {
        match self {
            Part::Pickup(p) => p.position = position,
            Part::Jack(j) => j.position = position,
            Part::Switch(s) => s.position = position,
            Part::Potentiometer(p) => p.position = position,
            Part::Passive(t) => t.position = position,
        }
    }

    /// "Neck StratPickup (1)" or "StratPickup (1)".
    pub fn full_name(&self) -> String {
        match self.label() {
            Some(label) => format!("{} {} ({})", label, self.kind(), self.id().0),
            None => format!("{} ({})", self.kind(), self.id().0),
        }
    }

    /// Current actuator state as seen by the topology (0 for stateless parts).
    pub fn actuator_state(&self) -> i8 {
        match self {
            Part::Switch(s) => s.actuator_state(),
            Part::Potentiometer(p) => p.rotation().as_i8(),
            _ => 0,
        }
    }

    /// Pin id for a layout name, e.g. `"tip"`.
    pub fn pin_named(&self, name: &str) -> Result<ComponentId> {
        self.kind()
            .pin_layout()
            .iter()
            .position(|slot| slot.name == name)
            .and_then(|idx| self.pins().get(idx).copied())
            .ok_or_else(|| WiringError::UnknownPin {
                part: self.id(),
                name: name.to_string(),
            })
    }

    /// Bonds for the current state as (source, target) pin ids.
    pub fn bonds(&self) -> Vec<(ComponentId, ComponentId)> {
        let state = self.actuator_state();
        let table: &[(usize, usize)] = match self.kind().topology().bonds_for(state) {
            Some(table) => table,
            None => {
                log::warn!("{}: invalid actuator state {}", self.full_name(), state);
                &[]
            }
        };
        let pins = self.pins();
        table
            .iter()
            .filter_map(|&(a, b)| Some((*pins.get(a)?, *pins.get(b)?)))
            .collect()
    }

    pub fn as_flippable(&self) -> Option<&dyn Flippable> {
        match self {
            Part::Switch(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flippable_mut(&mut self) -> Option<&mut dyn Flippable> {
        match self {
            Part::Switch(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_rotatable(&self) -> Option<&dyn Rotatable> {
        match self {
            Part::Potentiometer(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_rotatable_mut(&mut self) -> Option<&mut dyn Rotatable> {
        match self {
            Part::Potentiometer(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_pickup(&self) -> Option<&dyn PickupCapable> {
        match self {
            Part::Pickup(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_pickup_mut(&mut self) -> Option<&mut dyn PickupCapable> {
        match self {
            Part::Pickup(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_jack(&self) -> Option<&dyn JackCapable> {
        match self {
            Part::Jack(j) => Some(j),
            _ => None,
        }
    }

    pub fn as_jack_mut(&mut self) -> Option<&mut dyn JackCapable> {
        match self {
            Part::Jack(j) => Some(j),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(range: std::ops::Range<u32>) -> Vec<ComponentId> {
        range.map(ComponentId).collect()
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in PartKind::ALL {
            assert_eq!(PartKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(PartKind::from_name("Theremin"), None);
    }

    #[test]
    fn test_part_kind_matches_construction() {
        for kind in PartKind::ALL {
            let n = kind.pin_layout().len() as u32;
            let part = Part::new(ComponentId(100), kind, ids(1..n + 1));
            assert_eq!(part.kind(), kind);
            assert_eq!(part.pins().len(), kind.pin_layout().len());
        }
    }

    #[test]
    fn test_pin_named() {
        let jack = Part::new(ComponentId(1), PartKind::MonoJack, ids(2..4));
        assert_eq!(jack.pin_named("tip").unwrap(), ComponentId(2));
        assert_eq!(jack.pin_named("sleeve").unwrap(), ComponentId(3));
        assert!(jack.pin_named("ring").is_err());
    }

    #[test]
    fn test_capabilities() {
        let pot = Part::new(ComponentId(1), PartKind::Potentiometer, ids(2..6));
        assert!(pot.as_rotatable().is_some());
        assert!(pot.as_flippable().is_none());
        assert!(pot.as_pickup().is_none());

        let sw = Part::new(ComponentId(1), PartKind::DpdtOnOn, ids(2..8));
        assert!(sw.as_flippable().is_some());
        assert!(sw.as_jack().is_none());
    }

    #[test]
    fn test_full_name() {
        let mut pickup = Part::new(ComponentId(7), PartKind::StratPickup, ids(8..10));
        assert_eq!(pickup.full_name(), "StratPickup (7)");
        pickup.set_label(Some("Neck".to_string()));
        assert_eq!(pickup.full_name(), "Neck StratPickup (7)");
    }
}
