//! Error types for the wiring diagram engine.
//!
//! This module provides a unified error type [`WiringError`] that covers
//! registry lookups, wiring and bonding mistakes, capability misuse,
//! saved-state decoding and encoding.

use thiserror::Error;

use crate::diagram::ComponentId;

/// Result type alias using [`WiringError`].
pub type Result<T> = std::result::Result<T, WiringError>;

/// Unified error type for all diagram operations.
#[derive(Error, Debug)]
pub enum WiringError {
    // ============ Registry Errors ============
    /// Id not present in the diagram
    #[error("Component {id} not found in diagram")]
    ComponentNotFound { id: ComponentId },

    /// Id present, but it refers to a different kind of component
    #[error("Component {id} is a {found}, expected a {expected}")]
    WrongComponentType {
        id: ComponentId,
        expected: &'static str,
        found: &'static str,
    },

    /// Id already in use (only possible when loading a diagram)
    #[error("Duplicate component id {id}")]
    DuplicateId { id: ComponentId },

    // ============ Wiring Errors ============
    /// A pin cannot be bonded to itself
    #[error("Pin {id} cannot be bonded to itself")]
    SelfBond { id: ComponentId },

    /// Invalid wire endpoints
    #[error("Invalid wire: {message}")]
    InvalidWire { message: String },

    /// Part has no pin with that name
    #[error("Part {part} has no pin named '{name}'")]
    UnknownPin { part: ComponentId, name: String },

    /// Structural invariant violated
    #[error("Invalid diagram topology: {message}")]
    InvalidTopology { message: String },

    // ============ Capability Errors ============
    /// The part does not implement the requested behavior
    #[error("{name} cannot {capability}")]
    NotCapable {
        name: String,
        capability: &'static str,
    },

    // ============ Persistence Errors ============
    /// Saved state is not valid JSON or does not fit the record layout
    #[error("Invalid diagram state: {0}")]
    Json(#[from] serde_json::Error),

    /// Saved by a newer version of the format
    #[error("Unsupported diagram state version {version}")]
    UnsupportedVersion { version: u32 },

    /// Unknown component class name
    #[error("Unknown component type '{type_name}' for component {id}")]
    UnknownComponentType { id: ComponentId, type_name: String },

    /// A record is missing a required field
    #[error("Record {id} is missing field '{field}'")]
    MissingField { id: ComponentId, field: &'static str },

    /// A record references pins that do not fit its layout
    #[error("Record {id}: {message}")]
    InvalidRecord { id: ComponentId, message: String },

    /// Encoded state could not be decoded
    #[error("Codec error: {message}")]
    CodecError { message: String },

    // ============ I/O Errors ============
    /// Error reading a diagram file
    #[error("Failed to read diagram file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl WiringError {
    /// Create a not-found error
    pub fn not_found(id: ComponentId) -> Self {
        Self::ComponentNotFound { id }
    }

    /// Create a wrong-type error
    pub fn wrong_type(id: ComponentId, expected: &'static str, found: &'static str) -> Self {
        Self::WrongComponentType {
            id,
            expected,
            found,
        }
    }

    /// Create a capability error
    pub fn not_capable(name: impl Into<String>, capability: &'static str) -> Self {
        Self::NotCapable {
            name: name.into(),
            capability,
        }
    }

    /// Create an invalid wire error
    pub fn invalid_wire(message: impl Into<String>) -> Self {
        Self::InvalidWire {
            message: message.into(),
        }
    }

    /// Create an invalid record error
    pub fn invalid_record(id: ComponentId, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            id,
            message: message.into(),
        }
    }

    /// Create a codec error
    pub fn codec(message: impl Into<String>) -> Self {
        Self::CodecError {
            message: message.into(),
        }
    }
}
