//! WASM bindings for Guitar Wiring Core.
//!
//! This module provides JavaScript-friendly bindings for the browser
//! visualizer. The page keeps the diagram state in a URL parameter, so the
//! constructor accepts the base64 encoded form.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmDiagram } from 'guitar_wiring_core';
//!
//! await init();
//!
//! const diagram = new WasmDiagram(new URLSearchParams(location.search).get('state'));
//! diagram.start();
//!
//! for (const id of diagram.live_wire_ids()) {
//!   animateWire(id, diagram.wire_voltage(id));
//! }
//!
//! diagram.flip(7);   // restarts and rederives every voltage
//! history.replaceState(null, '', '?state=' + diagram.save());
//! ```

use wasm_bindgen::prelude::*;

use crate::demos;
use crate::diagram::{ComponentId, Diagram};
use crate::error::WiringError;
use crate::format::{self, Base64Codec};
use crate::simulation::Simulator;

impl From<WiringError> for JsValue {
    fn from(err: WiringError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// A diagram with its running simulation, for the browser.
#[wasm_bindgen]
pub struct WasmDiagram {
    simulator: Simulator,
}

#[wasm_bindgen]
impl WasmDiagram {
    /// Load a diagram from URL-safe base64 state.
    ///
    /// An empty string gives an empty diagram.
    ///
    /// # Example
    /// ```javascript
    /// const diagram = new WasmDiagram(stateParam ?? '');
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(state: &str) -> Result<WasmDiagram, JsValue> {
        let diagram = if state.trim().is_empty() {
            Diagram::new()
        } else {
            format::load_encoded(state, &Base64Codec)?
        };
        crate::diagram::validate_diagram(&diagram)?;
        Ok(WasmDiagram {
            simulator: Simulator::new(diagram),
        })
    }

    /// Build one of the sample diagrams (`"strat"` or `"switch"`).
    #[wasm_bindgen]
    pub fn demo(name: &str) -> Result<WasmDiagram, JsValue> {
        let diagram = match name {
            "strat" => demos::strat_pickup_and_jack()?.0,
            "switch" => demos::strat_through_switch()?.0,
            _ => {
                return Err(WiringError::WasmError {
                    message: format!("unknown demo '{}'", name),
                }
                .into())
            }
        };
        Ok(WasmDiagram {
            simulator: Simulator::new(diagram),
        })
    }

    /// Activate all pickups and jacks.
    #[wasm_bindgen]
    pub fn start(&mut self) -> Result<(), JsValue> {
        Ok(self.simulator.start()?)
    }

    /// Detach all listeners and zero every voltage.
    #[wasm_bindgen]
    pub fn stop(&mut self) -> Result<(), JsValue> {
        Ok(self.simulator.stop()?)
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.simulator.is_running()
    }

    /// Flip a switch, returning its new state (-1, 0 or 1).
    #[wasm_bindgen]
    pub fn flip(&mut self, id: u32) -> Result<i8, JsValue> {
        Ok(self.simulator.flip(ComponentId(id))?)
    }

    /// Rotate a potentiometer, returning its new rotation (-1 or 1).
    #[wasm_bindgen]
    pub fn rotate(&mut self, id: u32) -> Result<i8, JsValue> {
        Ok(self.simulator.rotate(ComponentId(id))?.as_i8())
    }

    /// Ids of the wires currently carrying voltage.
    #[wasm_bindgen]
    pub fn live_wire_ids(&self) -> Vec<u32> {
        self.simulator.live_wires().iter().map(|a| a.wire.0).collect()
    }

    /// Voltage on a wire: 1 for signal, -1 for ground, 0 when dead.
    #[wasm_bindgen]
    pub fn wire_voltage(&self, id: u32) -> Result<i32, JsValue> {
        Ok(self.simulator.diagram().wire(ComponentId(id))?.voltage().0)
    }

    /// Pin the voltage on a wire came from, so the renderer can animate
    /// in the right direction.
    #[wasm_bindgen]
    pub fn wire_source_pin(&self, id: u32) -> Result<Option<u32>, JsValue> {
        let wire = self.simulator.diagram().wire(ComponentId(id))?;
        Ok(wire.voltage_source_pin().map(|pin| pin.0))
    }

    #[wasm_bindgen]
    pub fn pin_voltage(&self, id: u32) -> Result<i32, JsValue> {
        Ok(self.simulator.diagram().pin(ComponentId(id))?.voltage().0)
    }

    /// Encoded state for the URL parameter.
    #[wasm_bindgen]
    pub fn save(&self) -> Result<String, JsValue> {
        Ok(format::save_encoded(self.simulator.diagram(), &Base64Codec)?)
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
