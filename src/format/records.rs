//! Flat serde records, one per component.

use serde::{Deserialize, Serialize};

use crate::components::{Flippable, Part, Rotatable};
use crate::diagram::{ComponentId, Pin, Wire};
use crate::geometry::Point;

/// Newest state layout this crate writes and reads.
pub const FORMAT_VERSION: u32 = 1;

fn default_version() -> u32 {
    FORMAT_VERSION
}

/// Class name of pin records.
pub const PIN_CLASS: &str = "Pin";

/// Class name of wire records.
pub const WIRE_CLASS: &str = "Wire";

/// The whole diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramState {
    #[serde(default = "default_version")]
    pub version: u32,
    pub component_states: Vec<ComponentState>,
}

impl Default for DiagramState {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            component_states: Vec::new(),
        }
    }
}

/// One component. `class_name` is `Pin`, `Wire` or a part type name; the
/// other fields are present only where that class uses them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentState {
    pub class_name: String,
    pub id: ComponentId,

    // parts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_ids: Option<Vec<ComponentId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<i8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<i8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    // wires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ComponentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<ComponentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ComponentState {
    /// A record with only the class name and id set.
    pub fn new(class_name: impl Into<String>, id: ComponentId) -> Self {
        Self {
            class_name: class_name.into(),
            id,
            pin_ids: None,
            at: None,
            state: None,
            prev: None,
            rotation: None,
            label: None,
            from: None,
            to: None,
            start: None,
            mid: None,
            end: None,
            color: None,
        }
    }

    pub fn is_pin(&self) -> bool {
        self.class_name == PIN_CLASS
    }

    pub fn is_wire(&self) -> bool {
        self.class_name == WIRE_CLASS
    }
}

impl From<&Pin> for ComponentState {
    fn from(pin: &Pin) -> Self {
        ComponentState::new(PIN_CLASS, pin.id)
    }
}

impl From<&Wire> for ComponentState {
    fn from(wire: &Wire) -> Self {
        ComponentState {
            from: Some(wire.start_pin()),
            to: Some(wire.end_pin()),
            start: Some(wire.start_point()),
            mid: Some(wire.mid_point()),
            end: Some(wire.end_point()),
            color: Some(wire.color.name().to_string()),
            ..ComponentState::new(WIRE_CLASS, wire.id)
        }
    }
}

impl From<&Part> for ComponentState {
    fn from(part: &Part) -> Self {
        let mut record = ComponentState {
            pin_ids: Some(part.pins().to_vec()),
            at: Some(part.position()),
            label: part.label().map(str::to_string),
            ..ComponentState::new(part.kind().name(), part.id())
        };
        match part {
            Part::Switch(s) => {
                record.state = Some(s.actuator_state());
                record.prev = Some(s.previous_state());
            }
            Part::Potentiometer(p) => record.rotation = Some(p.rotation().as_i8()),
            _ => {}
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::PartKind;

    #[test]
    fn test_pin_record_is_minimal() {
        let pin = Pin::new(ComponentId(4), None, "tip", Point::default());
        let json = serde_json::to_string(&ComponentState::from(&pin)).unwrap();
        assert_eq!(json, r#"{"className":"Pin","id":4}"#);
    }

    #[test]
    fn test_switch_record_fields() {
        let part = Part::new(
            ComponentId(1),
            PartKind::DpdtOnOffOn,
            (2..8).map(ComponentId).collect(),
        );
        let record = ComponentState::from(&part);
        assert_eq!(record.class_name, "DPDTOnOffOn");
        assert_eq!(record.state, Some(0));
        assert_eq!(record.prev, Some(-1));
        assert_eq!(record.rotation, None);
        assert_eq!(record.pin_ids.as_ref().map(Vec::len), Some(6));
    }

    #[test]
    fn test_missing_version_defaults() {
        let state: DiagramState = serde_json::from_str(r#"{"componentStates":[]}"#).unwrap();
        assert_eq!(state.version, FORMAT_VERSION);
        assert!(state.component_states.is_empty());
    }
}
