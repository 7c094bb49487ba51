//! Rebuild a diagram from records.
//!
//! Pins are instantiated first, then parts and wires. Bonds are never
//! stored; they are rederived from each part's actuator state, the same way
//! a freshly placed part gets them.

use std::collections::BTreeSet;

use super::records::{ComponentState, DiagramState};
use crate::components::{Part, PartKind};
use crate::diagram::{Component, ComponentId, Diagram, Pin, Wire, WireColor};
use crate::error::{Result, WiringError};
use crate::geometry::{self, Point};

fn required<T: Copy>(record: &ComponentState, value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(WiringError::MissingField { id: record.id, field })
}

/// Instantiate a diagram from decoded records.
pub fn load_state(state: &DiagramState) -> Result<Diagram> {
    let mut diagram = Diagram::new();

    for record in state.component_states.iter().filter(|r| r.is_pin()) {
        let pin = Pin::new(record.id, None, "", Point::default());
        diagram.register(Component::Pin(pin))?;
    }

    let mut parts = Vec::new();
    let mut claimed = BTreeSet::new();
    for record in state.component_states.iter().filter(|r| !r.is_pin()) {
        if record.is_wire() {
            load_wire(&mut diagram, record)?;
        } else {
            parts.push(load_part(&mut diagram, record, &mut claimed)?);
        }
    }

    for id in parts {
        diagram.attach_part(id)?;
    }
    diagram.sync_id_counter();
    diagram.drain_events();
    log::info!(
        "loaded diagram: {} components, last id {}",
        diagram.len(),
        diagram.last_issued_id()
    );
    Ok(diagram)
}

fn load_part(
    diagram: &mut Diagram,
    record: &ComponentState,
    claimed: &mut BTreeSet<ComponentId>,
) -> Result<ComponentId> {
    let id = record.id;
    let kind = PartKind::from_name(&record.class_name).ok_or_else(|| WiringError::UnknownComponentType {
        id,
        type_name: record.class_name.clone(),
    })?;

    let pin_ids = record
        .pin_ids
        .as_deref()
        .ok_or(WiringError::MissingField { id, field: "pinIds" })?;
    let layout = kind.pin_layout();
    if pin_ids.len() != layout.len() {
        return Err(WiringError::invalid_record(
            id,
            format!("{} needs {} pins, got {}", kind, layout.len(), pin_ids.len()),
        ));
    }

    let mut pins = Vec::with_capacity(layout.len());
    for (slot, &pin_id) in layout.iter().zip(pin_ids) {
        if !claimed.insert(pin_id) {
            return Err(WiringError::invalid_record(
                id,
                format!("pin {} already belongs to another part", pin_id),
            ));
        }
        let pin = diagram
            .pin_mut(pin_id)
            .map_err(|_| WiringError::invalid_record(id, format!("pin {} is not a Pin record", pin_id)))?;
        pin.owner = Some(id);
        pin.name = slot.name.to_string();
        pin.position = slot.position;
        pins.push(pin_id);
    }

    let mut part = Part::new(id, kind, pins);
    if let Some(at) = record.at {
        part.move_to(at);
    }
    if let Some(label) = &record.label {
        part.set_label(Some(label.clone()));
    }
    match &mut part {
        Part::Switch(s) => {
            if let Some(state) = record.state {
                let previous = record.prev.unwrap_or(s.model.initial_previous_state());
                s.restore(state, previous);
            }
        }
        Part::Potentiometer(p) => {
            if let Some(rotation) = record.rotation {
                p.restore(rotation);
            }
        }
        _ => {}
    }

    diagram.register(Component::Part(part))?;
    Ok(id)
}

fn load_wire(diagram: &mut Diagram, record: &ComponentState) -> Result<()> {
    let id = record.id;
    let from = required(record, record.from, "from")?;
    let to = required(record, record.to, "to")?;

    let color = match record.color.as_deref() {
        Some(name) => WireColor::from_name(name).unwrap_or_else(|| {
            log::warn!("wire {}: unknown color '{}', using black", id, name);
            WireColor::default()
        }),
        None => WireColor::default(),
    };
    let start = record.start.unwrap_or_default();
    let end = record.end.unwrap_or_default();
    let mid = record.mid.unwrap_or_else(|| geometry::mid_point(start, end));

    let wire = Wire::new(id, from, to).with_points(start, mid, end).with_color(color);
    diagram.insert_wire(wire)?;
    Ok(())
}
