//! The diagram: a registry of pins, wires and parts sharing one id space.
//!
//! A [`Diagram`] is an explicit context object holding the id counter, the
//! id→component map, voltage listeners and queued structural events.
//! Independent diagrams never share state.

mod events;
mod pin;
mod propagation;
mod types;
mod validate;
mod wire;

pub use events::{DiagramEvent, SubscriptionId, VoltageListener};
pub use pin::Pin;
pub use propagation::{Flow, WireActivity};
pub use types::{ComponentId, Voltage};
pub use validate::{dangling_wires, validate_diagram};
pub use wire::{Wire, WireColor};

pub(crate) use events::Subscription;

use std::collections::BTreeMap;

use crate::components::{Part, PartKind};
use crate::error::{Result, WiringError};
use crate::geometry::{self, Point};

/// Anything stored in the registry.
#[derive(Debug, Clone)]
pub enum Component {
    Pin(Pin),
    Wire(Wire),
    Part(Part),
}

/// Type filter for [`Diagram::find_all_of_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Pin,
    Wire,
    Part(PartKind),
    /// Any part, whatever its kind
    AnyPart,
}

impl Component {
    /// Get the component ID.
    pub fn id(&self) -> ComponentId {
        match self {
            Component::Pin(p) => p.id,
            Component::Wire(w) => w.id,
            Component::Part(p) => p.id(),
        }
    }

    /// Persisted type tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Component::Pin(_) => "Pin",
            Component::Wire(_) => "Wire",
            Component::Part(p) => p.kind().name(),
        }
    }

    pub fn is_type(&self, ty: ComponentType) -> bool {
        match (self, ty) {
            (Component::Pin(_), ComponentType::Pin) => true,
            (Component::Wire(_), ComponentType::Wire) => true,
            (Component::Part(_), ComponentType::AnyPart) => true,
            (Component::Part(p), ComponentType::Part(kind)) => p.kind() == kind,
            _ => false,
        }
    }
}

/// A wiring diagram.
#[derive(Debug, Default)]
pub struct Diagram {
    components: BTreeMap<ComponentId, Component>,
    last_issued_id: u32,
    pub(crate) subscriptions: Vec<Subscription>,
    pub(crate) next_subscription: u64,
    pub(crate) events: Vec<DiagramEvent>,
}

impl Diagram {
    /// Create an empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next id. Pins, wires and parts share the counter.
    pub fn next_id(&mut self) -> ComponentId {
        self.last_issued_id += 1;
        ComponentId(self.last_issued_id)
    }

    pub fn last_issued_id(&self) -> u32 {
        self.last_issued_id
    }

    /// Reset the counter to the highest id present (after a load).
    pub(crate) fn sync_id_counter(&mut self) {
        self.last_issued_id = self.components.keys().next_back().map_or(0, |id| id.0);
    }

    /// Number of registered components, pins and wires included.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Register a component under its own id.
    pub fn register(&mut self, component: Component) -> Result<()> {
        let id = component.id();
        if self.components.contains_key(&id) {
            return Err(WiringError::DuplicateId { id });
        }
        self.last_issued_id = self.last_issued_id.max(id.0);
        self.components.insert(id, component);
        Ok(())
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains_key(&id)
    }

    /// Look up any component.
    pub fn get(&self, id: ComponentId) -> Result<&Component> {
        self.components.get(&id).ok_or(WiringError::not_found(id))
    }

    pub fn pin(&self, id: ComponentId) -> Result<&Pin> {
        match self.get(id)? {
            Component::Pin(p) => Ok(p),
            other => Err(WiringError::wrong_type(id, "Pin", other.type_name())),
        }
    }

    pub fn pin_mut(&mut self, id: ComponentId) -> Result<&mut Pin> {
        match self.components.get_mut(&id) {
            Some(Component::Pin(p)) => Ok(p),
            Some(other) => Err(WiringError::wrong_type(id, "Pin", other.type_name())),
            None => Err(WiringError::not_found(id)),
        }
    }

    pub fn wire(&self, id: ComponentId) -> Result<&Wire> {
        match self.get(id)? {
            Component::Wire(w) => Ok(w),
            other => Err(WiringError::wrong_type(id, "Wire", other.type_name())),
        }
    }

    pub fn wire_mut(&mut self, id: ComponentId) -> Result<&mut Wire> {
        match self.components.get_mut(&id) {
            Some(Component::Wire(w)) => Ok(w),
            Some(other) => Err(WiringError::wrong_type(id, "Wire", other.type_name())),
            None => Err(WiringError::not_found(id)),
        }
    }

    pub fn part(&self, id: ComponentId) -> Result<&Part> {
        match self.get(id)? {
            Component::Part(p) => Ok(p),
            other => Err(WiringError::wrong_type(id, "Part", other.type_name())),
        }
    }

    pub fn part_mut(&mut self, id: ComponentId) -> Result<&mut Part> {
        match self.components.get_mut(&id) {
            Some(Component::Part(p)) => Ok(p),
            Some(other) => Err(WiringError::wrong_type(id, "Part", other.type_name())),
            None => Err(WiringError::not_found(id)),
        }
    }

    /// All components matching `predicate`, in id order.
    pub fn find_all<F>(&self, predicate: F) -> Vec<&Component>
    where
        F: Fn(&Component) -> bool,
    {
        self.components.values().filter(|c| predicate(c)).collect()
    }

    /// All components of type `ty` matching `predicate`, in id order.
    pub fn find_all_of_type<F>(&self, ty: ComponentType, predicate: F) -> Vec<&Component>
    where
        F: Fn(&Component) -> bool,
    {
        self.find_all(|c| c.is_type(ty) && predicate(c))
    }

    /// Iterate all components in id order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.components.values().filter_map(|c| match c {
            Component::Pin(p) => Some(p),
            _ => None,
        })
    }

    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.components.values().filter_map(|c| match c {
            Component::Wire(w) => Some(w),
            _ => None,
        })
    }

    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.components.values().filter_map(|c| match c {
            Component::Part(p) => Some(p),
            _ => None,
        })
    }

    /// Ids of the wires attached to `pin`.
    pub fn wires_attached_to(&self, pin: ComponentId) -> Vec<ComponentId> {
        self.wires().filter(|w| w.touches(pin)).map(|w| w.id).collect()
    }

    /// Place a new part at the origin.
    pub fn add_part(&mut self, kind: PartKind) -> Result<ComponentId> {
        self.add_part_at(kind, Point::default(), None)
    }

    /// Place a new part. The part takes the next id and its pins the ids
    /// after it, in layout order.
    pub fn add_part_at(&mut self, kind: PartKind, position: Point, label: Option<&str>) -> Result<ComponentId> {
        let id = self.next_id();
        let mut pins = Vec::with_capacity(kind.pin_layout().len());
        for slot in kind.pin_layout() {
            let pin_id = self.next_id();
            self.register(Component::Pin(Pin::new(pin_id, Some(id), slot.name, slot.position)))?;
            pins.push(pin_id);
        }

        let mut part = Part::new(id, kind, pins);
        part.move_to(position);
        part.set_label(label.map(str::to_string));
        log::info!("added {}", part.full_name());
        self.register(Component::Part(part))?;

        self.attach_part(id)?;
        self.push_event(DiagramEvent::ComponentAdded(id));
        Ok(id)
    }

    /// Derive bonds and install pass-through listeners for a registered part.
    pub(crate) fn attach_part(&mut self, id: ComponentId) -> Result<()> {
        self.rederive_bonds(id)?;
        self.install_pass_through(id)
    }

    /// Absolute canvas position of a pin.
    pub fn pin_position(&self, pin: ComponentId) -> Result<Point> {
        let p = self.pin(pin)?;
        let origin = match p.owner {
            Some(owner) => self.part(owner)?.position(),
            None => Point::default(),
        };
        Ok(Point::new(origin.x + p.position.x, origin.y + p.position.y))
    }

    /// Draw a straight black wire between two pins.
    pub fn add_wire(&mut self, start: ComponentId, end: ComponentId) -> Result<ComponentId> {
        self.check_wire_ends(start, end)?;
        let start_point = self.pin_position(start)?;
        let end_point = self.pin_position(end)?;
        let wire = Wire::new(self.next_id(), start, end).with_points(
            start_point,
            geometry::mid_point(start_point, end_point),
            end_point,
        );
        self.insert_wire(wire)
    }

    /// Register a fully built wire (points and colour already set).
    pub fn insert_wire(&mut self, wire: Wire) -> Result<ComponentId> {
        self.check_wire_ends(wire.start_pin(), wire.end_pin())?;
        let id = wire.id;
        log::info!("wire {} connects {} to {}", id, wire.start_pin(), wire.end_pin());
        self.register(Component::Wire(wire))?;
        self.push_event(DiagramEvent::ComponentAdded(id));
        Ok(id)
    }

    fn check_wire_ends(&self, start: ComponentId, end: ComponentId) -> Result<()> {
        if start == end {
            return Err(WiringError::invalid_wire(format!("both ends on pin {}", start)));
        }
        for pin in [start, end] {
            match self.get(pin) {
                Ok(Component::Pin(_)) => {}
                Ok(other) => {
                    return Err(WiringError::invalid_wire(format!(
                        "{} is a {}, not a pin",
                        pin,
                        other.type_name()
                    )))
                }
                Err(_) => return Err(WiringError::invalid_wire(format!("pin {} does not exist", pin))),
            }
        }
        Ok(())
    }

    pub fn change_wire_color(&mut self, id: ComponentId, color: WireColor) -> Result<()> {
        self.wire_mut(id)?.color = color;
        self.push_event(DiagramEvent::WireChanged(id));
        Ok(())
    }

    /// Move a wire's start point on the canvas. The pins it joins stay fixed.
    pub fn move_wire_start(&mut self, id: ComponentId, point: Point) -> Result<()> {
        self.wire_mut(id)?.update_start_point(point);
        self.push_event(DiagramEvent::WireChanged(id));
        Ok(())
    }

    /// Move a wire's end point on the canvas. The pins it joins stay fixed.
    pub fn move_wire_end(&mut self, id: ComponentId, point: Point) -> Result<()> {
        self.wire_mut(id)?.update_end_point(point);
        self.push_event(DiagramEvent::WireChanged(id));
        Ok(())
    }

    /// Bond two pins. Both are unbonded first, so no third pin keeps a stale
    /// reference. `a` is marked as the bond source.
    pub fn bond_pins(&mut self, a: ComponentId, b: ComponentId) -> Result<()> {
        if a == b {
            return Err(WiringError::SelfBond { id: a });
        }
        self.pin(a)?;
        self.pin(b)?;
        self.unbond_pin(a)?;
        self.unbond_pin(b)?;
        self.pin_mut(a)?.set_bond(b, true);
        self.pin_mut(b)?.set_bond(a, false);
        log::debug!("bonded {} -> {}", a, b);
        Ok(())
    }

    /// Clear a pin's bond on both sides. Returns the former partner.
    pub fn unbond_pin(&mut self, pin: ComponentId) -> Result<Option<ComponentId>> {
        let other = self.pin_mut(pin)?.clear_bond();
        if let Some(other) = other {
            if let Ok(p) = self.pin_mut(other) {
                if p.bonded_pin_id() == Some(pin) {
                    p.clear_bond();
                }
            }
        }
        Ok(other)
    }

    /// Drop every bond a part's pins hold and rebond from its current state.
    pub fn rederive_bonds(&mut self, id: ComponentId) -> Result<()> {
        let part = self.part(id)?;
        let pins = part.pins().to_vec();
        let bonds = part.bonds();
        for pin in pins {
            self.unbond_pin(pin)?;
        }
        for (source, target) in bonds {
            self.bond_pins(source, target)?;
        }
        Ok(())
    }

    /// Pin id of a part by layout name.
    pub fn pin_named(&self, part: ComponentId, name: &str) -> Result<ComponentId> {
        self.part(part)?.pin_named(name)
    }

    /// Human readable name for log lines and listings.
    pub fn full_name(&self, id: ComponentId) -> Result<String> {
        Ok(match self.get(id)? {
            Component::Part(p) => p.full_name(),
            Component::Wire(w) => format!("Wire ({}) {}", w.id.0, w.color),
            Component::Pin(p) => match p.owner {
                Some(owner) => format!("{} {}", self.part(owner)?.full_name(), p.name),
                None => format!("Pin ({})", p.id.0),
            },
        })
    }

    /// Remove a component. A part takes its pins with it (unbonded, with
    /// their listeners). Wires attached to those pins are left in place;
    /// use [`Diagram::remove_with_wires`] to drop them too.
    pub fn remove(&mut self, id: ComponentId) -> Result<Component> {
        let owned: Vec<ComponentId> = match self.get(id)? {
            Component::Part(p) => p.pins().to_vec(),
            _ => Vec::new(),
        };
        for pin in owned {
            if self.contains(pin) {
                self.remove(pin)?;
            }
        }

        if let Component::Pin(_) = self.get(id)? {
            self.unbond_pin(id)?;
            self.drop_subscriptions_for(id);
        }
        let removed = self.components.remove(&id).ok_or(WiringError::not_found(id))?;
        log::debug!("removed {} {}", removed.type_name(), id);
        self.push_event(DiagramEvent::ComponentRemoved(id));
        Ok(removed)
    }

    /// Remove a part together with every wire attached to its pins.
    /// Returns the ids of the removed wires.
    pub fn remove_with_wires(&mut self, id: ComponentId) -> Result<Vec<ComponentId>> {
        let pins: Vec<ComponentId> = match self.get(id)? {
            Component::Part(p) => p.pins().to_vec(),
            Component::Pin(_) => vec![id],
            Component::Wire(_) => Vec::new(),
        };
        let mut wires: Vec<ComponentId> = pins.iter().flat_map(|&pin| self.wires_attached_to(pin)).collect();
        wires.sort();
        wires.dedup();
        for &wire in &wires {
            self.remove(wire)?;
        }
        self.remove(id)?;
        Ok(wires)
    }

    /// Remove everything and restart ids from 1.
    pub fn clear(&mut self) {
        self.components.clear();
        self.subscriptions.clear();
        self.last_issued_id = 0;
        log::info!("diagram cleared");
        self.push_event(DiagramEvent::AllComponentsRemoved);
    }
}
