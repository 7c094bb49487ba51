//! Serialize a diagram to records.

use std::collections::BTreeSet;

use super::records::{ComponentState, DiagramState};
use crate::diagram::{dangling_wires, Component, Diagram};
use crate::error::Result;

/// Build the record list for a diagram, in id order.
///
/// Wires left dangling by a plain part removal are not written; they
/// reference pins that no longer exist and could not be loaded back.
pub fn to_state(diagram: &Diagram) -> DiagramState {
    let dangling: BTreeSet<_> = dangling_wires(diagram).into_iter().collect();
    for wire in &dangling {
        log::debug!("not saving dangling wire {}", wire);
    }

    let component_states = diagram
        .components()
        .filter(|component| !dangling.contains(&component.id()))
        .map(|component| match component {
            Component::Pin(p) => ComponentState::from(p),
            Component::Wire(w) => ComponentState::from(w),
            Component::Part(p) => ComponentState::from(p),
        })
        .collect();

    DiagramState {
        component_states,
        ..DiagramState::default()
    }
}

/// Serialize a diagram to compact JSON.
pub fn save(diagram: &Diagram) -> Result<String> {
    Ok(serde_json::to_string(&to_state(diagram))?)
}

/// Serialize a diagram to indented JSON, for files meant to be read.
pub fn save_pretty(diagram: &Diagram) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_state(diagram))?)
}
