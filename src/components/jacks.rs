//! Output jacks: the ground return path.

use std::rc::Rc;

use super::{JackCapable, PinSlot, Topology};
use crate::diagram::{ComponentId, Diagram, SubscriptionId, Voltage, VoltageListener};
use crate::error::{Result, WiringError};
use crate::geometry::Point;

const MONO_LAYOUT: [PinSlot; 2] = [PinSlot::new("tip", 47.0, 10.0), PinSlot::new("sleeve", 48.0, 31.0)];

/// Jack types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JackModel {
    Mono,
}

impl Topology for JackModel {
    fn pin_layout(&self) -> &'static [PinSlot] {
        match self {
            JackModel::Mono => &MONO_LAYOUT,
        }
    }
}

/// When tip or sleeve changes, the other side receives the negated value
/// unless it already has voltage.
#[derive(Debug, Clone, Copy)]
pub struct GroundReturn {
    pub tip: ComponentId,
    pub sleeve: ComponentId,
}

impl VoltageListener for GroundReturn {
    fn voltage_changed(&self, diagram: &mut Diagram, pin: ComponentId, value: Voltage) -> Result<()> {
        let other = if pin == self.tip { self.sleeve } else { self.tip };
        if diagram.pin(other)?.has_voltage() {
            return Ok(());
        }
        diagram.pin_receive_voltage(other, value.negated(), None, None)
    }
}

/// A jack part.
#[derive(Debug, Clone)]
pub struct Jack {
    pub id: ComponentId,
    pub model: JackModel,
    pub label: Option<String>,
    pub position: Point,
    pub(crate) pins: Vec<ComponentId>,
    listeners: Vec<SubscriptionId>,
}

impl Jack {
    pub fn new(id: ComponentId, model: JackModel, pins: Vec<ComponentId>) -> Self {
        Self {
            id,
            model,
            label: None,
            position: Point::default(),
            pins,
            listeners: Vec::new(),
        }
    }
}

impl JackCapable for Jack {
    fn tip_pin(&self) -> Option<ComponentId> {
        self.pins.first().copied()
    }

    fn sleeve_pin(&self) -> Option<ComponentId> {
        self.pins.get(1).copied()
    }

    fn is_jacked_in(&self) -> bool {
        !self.listeners.is_empty()
    }

    fn attach_listeners(&mut self, subscriptions: Vec<SubscriptionId>) {
        self.listeners = subscriptions;
    }

    fn detach_listeners(&mut self) -> Vec<SubscriptionId> {
        std::mem::take(&mut self.listeners)
    }
}

impl Diagram {
    /// Plug the jack in: ground the sleeve if it has no voltage, then start
    /// mirroring tip and sleeve.
    pub fn jack_in(&mut self, id: ComponentId) -> Result<()> {
        let part = self.part(id)?;
        let name = part.full_name();
        let jack = part
            .as_jack()
            .ok_or_else(|| WiringError::not_capable(name.clone(), "jack in"))?;
        if jack.is_jacked_in() {
            return Ok(());
        }
        let (Some(tip), Some(sleeve)) = (jack.tip_pin(), jack.sleeve_pin()) else {
            return Err(WiringError::InvalidTopology {
                message: format!("{} has no tip and sleeve pins", name),
            });
        };

        log::info!("{} jacked in", name);
        if !self.pin(sleeve)?.has_voltage() {
            self.pin_receive_voltage(sleeve, Voltage::GROUND, None, None)?;
        }

        let listener: Rc<dyn VoltageListener> = Rc::new(GroundReturn { tip, sleeve });
        let subscriptions = vec![
            self.on_voltage_changed(tip, Rc::clone(&listener))?,
            self.on_voltage_changed(sleeve, listener)?,
        ];
        if let Some(jack) = self.part_mut(id)?.as_jack_mut() {
            jack.attach_listeners(subscriptions);
        }
        Ok(())
    }

    /// Unplug the jack. Voltages are left for the caller to reset.
    pub fn jack_out(&mut self, id: ComponentId) -> Result<()> {
        let part = self.part_mut(id)?;
        let name = part.full_name();
        let subscriptions = part
            .as_jack_mut()
            .ok_or_else(|| WiringError::not_capable(name.clone(), "jack out"))?
            .detach_listeners();
        for subscription in subscriptions {
            self.off(subscription);
        }
        log::info!("{} jacked out", name);
        Ok(())
    }
}
