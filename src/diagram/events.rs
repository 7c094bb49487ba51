//! Typed notifications.
//!
//! Two kinds of notification exist:
//! - [`VoltageListener`]s are called synchronously, in the middle of a
//!   cascade, whenever a pin's voltage changes. Coils, jacks and resistors
//!   react to their pins this way and may continue the cascade.
//! - [`DiagramEvent`]s are structural changes (parts added, switches flipped,
//!   ...). They are queued and drained by the host, never re-entered.

use std::fmt;
use std::rc::Rc;

use super::types::{ComponentId, Voltage};
use super::Diagram;
use crate::components::Rotation;
use crate::error::Result;

/// Observer of voltage changes on one pin.
pub trait VoltageListener: fmt::Debug {
    /// Called after `pin` stored `value` and fanned it out.
    fn voltage_changed(&self, diagram: &mut Diagram, pin: ComponentId, value: Voltage) -> Result<()>;
}

/// Handle returned by [`Diagram::on_voltage_changed`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

#[derive(Debug, Clone)]
pub(crate) struct Subscription {
    pub id: SubscriptionId,
    pub pin: ComponentId,
    pub listener: Rc<dyn VoltageListener>,
}

/// Structural change on the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramEvent {
    ComponentAdded(ComponentId),
    ComponentRemoved(ComponentId),
    AllComponentsRemoved,
    SwitchFlipped { id: ComponentId, state: i8 },
    PotRotated { id: ComponentId, rotation: Rotation },
    /// Wire geometry or colour changed
    WireChanged(ComponentId),
}

impl Diagram {
    /// Subscribe `listener` to voltage changes on `pin`.
    pub fn on_voltage_changed(
        &mut self,
        pin: ComponentId,
        listener: Rc<dyn VoltageListener>,
    ) -> Result<SubscriptionId> {
        self.pin(pin)?;
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscriptions.push(Subscription { id, pin, listener });
        Ok(id)
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn off(&mut self, subscription: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != subscription);
        self.subscriptions.len() != before
    }

    /// Number of listeners currently attached to `pin`.
    pub fn listener_count(&self, pin: ComponentId) -> usize {
        self.subscriptions.iter().filter(|s| s.pin == pin).count()
    }

    pub(crate) fn emit_voltage_changed(&mut self, pin: ComponentId, value: Voltage) -> Result<()> {
        // Snapshot: listeners may subscribe or unsubscribe while running.
        let listeners: Vec<Rc<dyn VoltageListener>> = self
            .subscriptions
            .iter()
            .filter(|s| s.pin == pin)
            .map(|s| Rc::clone(&s.listener))
            .collect();
        for listener in listeners {
            listener.voltage_changed(self, pin, value)?;
        }
        Ok(())
    }

    pub(crate) fn drop_subscriptions_for(&mut self, pin: ComponentId) {
        self.subscriptions.retain(|s| s.pin != pin);
    }

    pub(crate) fn push_event(&mut self, event: DiagramEvent) {
        log::debug!("diagram event {:?}", event);
        self.events.push(event);
    }

    /// Take all queued structural events.
    pub fn drain_events(&mut self) -> Vec<DiagramEvent> {
        std::mem::take(&mut self.events)
    }
}
