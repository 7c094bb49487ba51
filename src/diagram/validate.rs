//! Diagram validation.

use crate::error::{Result, WiringError};

use super::{Component, ComponentId, Diagram};

/// Validate the structural invariants of a diagram.
///
/// Checks:
/// - Every bond is symmetric and never a self-bond
/// - Every part owns exactly as many pins as its layout names, and each of
///   them names the part as owner
/// - No wire references a missing pin
pub fn validate_diagram(diagram: &Diagram) -> Result<()> {
    for pin in diagram.pins() {
        let Some(other) = pin.bonded_pin_id() else {
            continue;
        };
        if other == pin.id {
            return Err(WiringError::SelfBond { id: pin.id });
        }
        let partner = diagram.pin(other)?;
        if partner.bonded_pin_id() != Some(pin.id) {
            return Err(WiringError::InvalidTopology {
                message: format!("pin {} is bonded to {}, but not the other way round", pin.id, other),
            });
        }
    }

    for part in diagram.parts() {
        let expected = part.kind().pin_layout().len();
        if part.pins().len() != expected {
            return Err(WiringError::InvalidTopology {
                message: format!(
                    "{} owns {} pins, expected {}",
                    part.full_name(),
                    part.pins().len(),
                    expected
                ),
            });
        }
        for &pin in part.pins() {
            if diagram.pin(pin)?.owner != Some(part.id()) {
                return Err(WiringError::InvalidTopology {
                    message: format!("pin {} is not owned by {}", pin, part.full_name()),
                });
            }
        }
    }

    if let Some(&wire) = dangling_wires(diagram).first() {
        return Err(WiringError::InvalidTopology {
            message: format!("wire {} references a missing pin", wire),
        });
    }

    Ok(())
}

/// Wires with at least one end that is no longer a pin in the diagram.
pub fn dangling_wires(diagram: &Diagram) -> Vec<ComponentId> {
    diagram
        .wires()
        .filter(|w| {
            [w.start_pin(), w.end_pin()]
                .into_iter()
                .any(|pin| !matches!(diagram.get(pin), Ok(Component::Pin(_))))
        })
        .map(|w| w.id)
        .collect()
}
