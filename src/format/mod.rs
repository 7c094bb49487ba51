//! JSON persistence for wiring diagrams.
//!
//! A diagram is saved as a list of flat component records under
//! `componentStates`, one per pin, wire and part, each tagged with its
//! `className`. Bonds are not stored; they are rederived from switch and
//! potentiometer state on load.
//!
//! # Records
//!
//! | `className` | Fields |
//! |------|--------|
//! | `Pin` | `id` |
//! | `Wire` | `id from to start mid end color` |
//! | Switches | `id pinIds at state prev [label]` |
//! | `Potentiometer` | `id pinIds at rotation [label]` |
//! | Other parts | `id pinIds at [label]` |
//!
//! Pin records must exist for every id a part lists; they may appear anywhere
//! in the list.
//!
//! # Example
//!
//! ```json
//! {
//!   "version": 1,
//!   "componentStates": [
//!     {"className": "StratPickup", "id": 1, "pinIds": [2, 3], "at": {"x": 0.0, "y": 0.0}},
//!     {"className": "Pin", "id": 2},
//!     {"className": "Pin", "id": 3},
//!     {"className": "MonoJack", "id": 4, "pinIds": [5, 6], "at": {"x": 300.0, "y": 0.0}},
//!     {"className": "Pin", "id": 5},
//!     {"className": "Pin", "id": 6},
//!     {"className": "Wire", "id": 7, "from": 2, "to": 5, "color": "red",
//!      "start": {"x": 140.0, "y": 105.0}, "mid": {"x": 150.0, "y": 150.0}, "end": {"x": 347.0, "y": 10.0}}
//!   ]
//! }
//! ```

mod codec;
mod loader;
mod records;
mod writer;

pub use codec::{Base64Codec, Codec, PlainCodec};
pub use loader::load_state;
pub use records::{ComponentState, DiagramState, FORMAT_VERSION, PIN_CLASS, WIRE_CLASS};
pub use writer::{save, save_pretty, to_state};

use crate::diagram::Diagram;
use crate::error::{Result, WiringError};

/// Decode saved JSON into records.
pub fn parse(input: &str) -> Result<DiagramState> {
    let state: DiagramState = serde_json::from_str(input)?;
    if state.version > FORMAT_VERSION {
        return Err(WiringError::UnsupportedVersion { version: state.version });
    }
    Ok(state)
}

/// Decode and instantiate a diagram.
pub fn load(input: &str) -> Result<Diagram> {
    load_state(&parse(input)?)
}

/// Decode with `codec`, then load.
pub fn load_encoded(encoded: &str, codec: &dyn Codec) -> Result<Diagram> {
    load(&codec.decompress(encoded)?)
}

/// Save, then encode with `codec`.
pub fn save_encoded(diagram: &Diagram, codec: &dyn Codec) -> Result<String> {
    codec.compress(&save(diagram)?)
}

/// Read and load a diagram file.
#[cfg(feature = "cli")]
pub fn load_file(path: &std::path::Path) -> Result<Diagram> {
    let content = std::fs::read_to_string(path).map_err(|e| WiringError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    load(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::PartKind;
    use crate::diagram::{ComponentId, WireColor};
    use crate::geometry::Point;

    fn sample() -> Diagram {
        let mut diagram = Diagram::new();
        let pickup = diagram
            .add_part_at(PartKind::Humbucker, Point::new(20.0, 30.0), Some("Bridge"))
            .unwrap();
        let sw = diagram.add_part(PartKind::DpdtOnOnOn).unwrap();
        let pot = diagram.add_part(PartKind::Potentiometer).unwrap();
        let cap = diagram.add_part(PartKind::VitaminQCap).unwrap();
        let r = diagram.add_part(PartKind::MetalResistor).unwrap();

        let north = diagram.pin_named(pickup, "north_finish").unwrap();
        let pin2 = diagram.pin_named(sw, "pin2").unwrap();
        let wiper = diagram.pin_named(pot, "wiper").unwrap();
        let pin1 = diagram.pin_named(pot, "pin1").unwrap();
        let cap_lead = diagram.part(cap).unwrap().pins()[0];
        let r_lead = diagram.part(r).unwrap().pins()[1];

        diagram.add_wire(north, pin2).unwrap();
        let w = diagram.add_wire(wiper, cap_lead).unwrap();
        diagram.change_wire_color(w, WireColor::Yellow).unwrap();
        diagram.add_wire(pin1, r_lead).unwrap();

        diagram.flip(sw).unwrap();
        diagram.flip(sw).unwrap();
        diagram.rotate(pot).unwrap();
        diagram
    }

    #[test]
    fn test_save_load_round_trip() {
        let original = sample();
        let text = save(&original).unwrap();
        let restored = load(&text).unwrap();

        assert_eq!(save(&restored).unwrap(), text);
        assert_eq!(restored.last_issued_id(), original.last_issued_id());
        for pin in original.pins() {
            assert_eq!(restored.pin(pin.id).unwrap().bonded_pin_id(), pin.bonded_pin_id());
        }
        let sw = restored.part(ComponentId(7)).unwrap();
        assert_eq!(sw.actuator_state(), original.part(ComponentId(7)).unwrap().actuator_state());
        assert_eq!(restored.part(ComponentId(1)).unwrap().label(), Some("Bridge"));
    }

    #[test]
    fn test_encoded_round_trip() {
        let original = sample();
        let encoded = save_encoded(&original, &Base64Codec).unwrap();
        assert!(!encoded.contains('\n'));
        let restored = load_encoded(&encoded, &Base64Codec).unwrap();
        assert_eq!(save(&restored).unwrap(), save(&original).unwrap());
    }

    #[test]
    fn test_round_trip_after_plain_remove() {
        let mut diagram = Diagram::new();
        let pickup = diagram.add_part(PartKind::StratPickup).unwrap();
        let jack = diagram.add_part(PartKind::MonoJack).unwrap();
        let hot = diagram.pin_named(pickup, "hot").unwrap();
        let tip = diagram.pin_named(jack, "tip").unwrap();
        let wire = diagram.add_wire(hot, tip).unwrap();
        diagram.remove(jack).unwrap();

        let restored = load(&save(&diagram).unwrap()).unwrap();
        assert!(restored.get(wire).is_err());
        assert_eq!(restored.part(pickup).unwrap().pins().len(), 2);
        assert!(crate::diagram::validate_diagram(&restored).is_ok());
    }

    #[test]
    fn test_rejects_newer_version_and_bad_json() {
        assert!(matches!(
            load(r#"{"version": 2, "componentStates": []}"#),
            Err(WiringError::UnsupportedVersion { version: 2 })
        ));
        assert!(matches!(load("Pin 1"), Err(WiringError::Json(_))));
        assert!(matches!(
            load(r#"{"componentStates": [{"className": "Pin"}]}"#),
            Err(WiringError::Json(_))
        ));
    }
}
