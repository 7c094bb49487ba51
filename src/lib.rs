//! # Guitar Wiring Core
//!
//! Signal-propagation engine for interactive guitar wiring diagrams.
//!
//! This library provides:
//! - A registry of pins, wires and parts with shared monotonic ids
//! - Discrete voltage propagation (`+1` signal, `-1` ground) across wires
//!   and pin bonds
//! - Part models for pickups, jacks, switches, potentiometers, resistors
//!   and capacitors
//! - JSON component records for saving and loading diagrams
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`diagram`] - Registry, pins, wires, listeners and propagation
//! - [`components`] - Part models and their capabilities
//! - [`simulation`] - Whole-diagram start/stop
//! - [`format`] - Persistence and transport codecs
//! - [`geometry`] - Canvas points and wire midpoint helpers
//! - [`demos`] - Sample diagrams
//!
//! ## Propagation Model
//!
//! Voltages are discrete. A pin that receives a value it already holds stops
//! the cascade, which is what makes cyclic wiring terminate. Ground always
//! wins: a pin holding `-1` ignores `+1`. Otherwise the pin stores the value,
//! forwards it along every attached wire except the one it came from, then
//! to its bonded pin, then notifies its listeners.
//!
//! Pickups induce `+1` on whichever coil end is dead once the other end is
//! live; jacks ground their sleeve. Starting a simulation activates the
//! pickups first so they are already listening when the jacks ground the
//! return path.
//!
//! ## Usage
//!
//! ```no_run
//! use guitar_wiring_core::{demos, Simulator};
//!
//! let (diagram, parts) = demos::strat_pickup_and_jack()?;
//! let mut sim = Simulator::new(diagram);
//! sim.start()?;
//! for activity in sim.live_wires() {
//!     println!("wire {} carries {}", activity.wire, activity.voltage);
//! }
//! # let _ = parts;
//! # Ok::<(), guitar_wiring_core::WiringError>(())
//! ```

pub mod components;
pub mod demos;
pub mod diagram;
pub mod error;
pub mod format;
pub mod geometry;
pub mod simulation;

// Re-export main types for convenience
pub use components::{InductionBootstrap, Part, PartKind};
pub use diagram::{ComponentId, Diagram, Voltage};
pub use error::{Result, WiringError};
pub use simulation::{SimulationConfig, Simulator};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmDiagram;
