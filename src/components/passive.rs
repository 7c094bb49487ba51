//! Two-pin passive parts: resistors and capacitors.
//!
//! Resistors pass positive voltage from one lead to the other. Capacitors
//! hold their two pins and route nothing.

use std::rc::Rc;

use super::{Part, PartKind, PinSlot, Topology};
use crate::diagram::{ComponentId, Diagram, Voltage, VoltageListener};
use crate::error::Result;
use crate::geometry::Point;

const fn leads(x1: f64, y1: f64, x2: f64, y2: f64) -> [PinSlot; 2] {
    [PinSlot::new("pin1", x1, y1), PinSlot::new("pin2", x2, y2)]
}

const RESISTOR_LAYOUT: [PinSlot; 2] = leads(0.0, 3.0, 25.0, 3.0);
const BUMBLE_BEE_LAYOUT: [PinSlot; 2] = leads(2.0, 14.0, 105.0, 14.0);
const ORANGE_DROP_LAYOUT: [PinSlot; 2] = leads(1.0, 42.0, 62.0, 42.0);
const CERAMIC_DISC_LAYOUT: [PinSlot; 2] = leads(3.0, 18.0, 17.0, 18.0);
const CHICLET_LAYOUT: [PinSlot; 2] = leads(2.0, 41.0, 22.0, 41.0);
const MALLORY_MUSTARD_LAYOUT: [PinSlot; 2] = leads(0.0, 7.0, 58.0, 7.0);
const POLYSTYRENE_LAYOUT: [PinSlot; 2] = leads(0.0, 10.0, 50.0, 10.0);
const VITAMIN_Q_LAYOUT: [PinSlot; 2] = leads(1.0, 14.0, 84.0, 14.0);

/// Two-pin part types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassiveModel {
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

impl PassiveModel {
    pub fn kind(&self) -> PartKind {
        match self {
            PassiveModel::CarbonResistor => PartKind::CarbonResistor,
            PassiveModel::MetalResistor => PartKind::MetalResistor,
            PassiveModel::BumbleBeeCap => PartKind::BumbleBeeCap,
            PassiveModel::OrangeDropCap => PartKind::OrangeDropCap,
            PassiveModel::CeramicDiscCap => PartKind::CeramicDiscCap,
            PassiveModel::ChicletCap => PartKind::ChicletCap,
            PassiveModel::MalloryMustardCap => PartKind::MalloryMustardCap,
            PassiveModel::PolystyreneBlueCap => PartKind::PolystyreneBlueCap,
            PassiveModel::PolystyreneRedCap => PartKind::PolystyreneRedCap,
            PassiveModel::VitaminQCap => PartKind::VitaminQCap,
        }
    }

    /// Whether positive voltage flows between the leads.
    pub fn passes_positive(&self) -> bool {
        matches!(self, PassiveModel::CarbonResistor | PassiveModel::MetalResistor)
    }
}

impl Topology for PassiveModel {
    fn pin_layout(&self) -> &'static [PinSlot] {
        match self {
            PassiveModel::CarbonResistor | PassiveModel::MetalResistor => &RESISTOR_LAYOUT,
            PassiveModel::BumbleBeeCap => &BUMBLE_BEE_LAYOUT,
            PassiveModel::OrangeDropCap => &ORANGE_DROP_LAYOUT,
            PassiveModel::CeramicDiscCap => &CERAMIC_DISC_LAYOUT,
            PassiveModel::ChicletCap => &CHICLET_LAYOUT,
            PassiveModel::MalloryMustardCap => &MALLORY_MUSTARD_LAYOUT,
            PassiveModel::PolystyreneBlueCap | PassiveModel::PolystyreneRedCap => &POLYSTYRENE_LAYOUT,
            PassiveModel::VitaminQCap => &VITAMIN_Q_LAYOUT,
        }
    }
}

/// Forwards positive voltage to the other lead if it has none.
#[derive(Debug, Clone, Copy)]
pub struct PositivePassThrough {
    pub a: ComponentId,
    pub b: ComponentId,
}

impl VoltageListener for PositivePassThrough {
    fn voltage_changed(&self, diagram: &mut Diagram, pin: ComponentId, value: Voltage) -> Result<()> {
        if !value.is_hot() {
            return Ok(());
        }
        let other = if pin == self.a { self.b } else { self.a };
        if diagram.pin(other)?.has_voltage() {
            return Ok(());
        }
        diagram.pin_receive_voltage(other, value, None, Some(pin))
    }
}

/// A two-pin passive part.
#[derive(Debug, Clone)]
pub struct TwoPin {
    pub id: ComponentId,
    pub model: PassiveModel,
    pub label: Option<String>,
    pub position: Point,
    pub(crate) pins: Vec<ComponentId>,
}

impl TwoPin {
    pub fn new(id: ComponentId, model: PassiveModel, pins: Vec<ComponentId>) -> Self {
        Self {
            id,
            model,
            label: None,
            position: Point::default(),
            pins,
        }
    }
}

impl Diagram {
    /// Subscribe a resistor's pass-through listener to both leads.
    /// Does nothing for parts that route no voltage.
    pub(crate) fn install_pass_through(&mut self, id: ComponentId) -> Result<()> {
        let (a, b) = match self.part(id)? {
            Part::Passive(t) if t.model.passes_positive() => match t.pins[..] {
                [a, b] => (a, b),
                _ => return Ok(()),
            },
            _ => return Ok(()),
        };
        let listener: Rc<dyn VoltageListener> = Rc::new(PositivePassThrough { a, b });
        self.on_voltage_changed(a, Rc::clone(&listener))?;
        self.on_voltage_changed(b, listener)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resistor_passes_positive_only() {
        let mut diagram = Diagram::new();
        let r = diagram.add_part(PartKind::CarbonResistor).unwrap();
        let pins = diagram.part(r).unwrap().pins().to_vec();

        diagram.pin_receive_voltage(pins[0], Voltage::HOT, None, None).unwrap();
        assert_eq!(diagram.pin(pins[1]).unwrap().voltage(), Voltage::HOT);

        let r2 = diagram.add_part(PartKind::MetalResistor).unwrap();
        let pins2 = diagram.part(r2).unwrap().pins().to_vec();
        diagram.pin_receive_voltage(pins2[1], Voltage::GROUND, None, None).unwrap();
        assert!(!diagram.pin(pins2[0]).unwrap().has_voltage());
    }

    #[test]
    fn test_capacitor_routes_nothing() {
        let mut diagram = Diagram::new();
        let cap = diagram.add_part(PartKind::OrangeDropCap).unwrap();
        let pins = diagram.part(cap).unwrap().pins().to_vec();
        assert_eq!(diagram.listener_count(pins[0]), 0);

        diagram.pin_receive_voltage(pins[0], Voltage::HOT, None, None).unwrap();
        assert!(!diagram.pin(pins[1]).unwrap().has_voltage());
        assert_eq!(diagram.pin(pins[0]).unwrap().bonded_pin_id(), None);
    }

    #[test]
    fn test_resistor_leaves_live_lead_alone() {
        let mut diagram = Diagram::new();
        let r = diagram.add_part(PartKind::CarbonResistor).unwrap();
        let pins = diagram.part(r).unwrap().pins().to_vec();

        diagram.pin_receive_voltage(pins[1], Voltage::GROUND, None, None).unwrap();
        diagram.pin_receive_voltage(pins[0], Voltage::HOT, None, None).unwrap();
        assert_eq!(diagram.pin(pins[1]).unwrap().voltage(), Voltage::GROUND);
    }
}
