//! Unified error types for circuit topology and equation assembly.
//!
//! Every stage of the pipeline reports failures through [`CircuitError`].
//! Malformed input (a terminal wired to a pin that does not exist, a current
//! source whose polarity cannot be resolved, more equations than unknowns) is
//! a contract violation of the caller, so `update()` fails fast with one of
//! these variants instead of producing an inconsistent matrix.
//!
//! # Example
//!
//! ```ignore
//! use kirchhoff_core::{CircuitError, CircuitResult};
//!
//! fn rebuild(circuit: &mut Circuit) -> CircuitResult<()> {
//!     circuit.update()?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all circuit operations.
#[derive(Error, Debug)]
pub enum CircuitError {
    /// A terminal references a pin outside `[0, pin_count)` or the pin itself.
    #[error("Invalid pin: element {element} terminal {terminal} links to pin {pin} (pin count {pin_count})")]
    InvalidPin {
        element: usize,
        terminal: usize,
        pin: usize,
        pin_count: usize,
    },

    /// The endpoint that fixes a branch's current direction is not on a node.
    #[error("Branch {branch} cannot be oriented: pin {pin} is not part of a node")]
    UnorientedBranch { branch: usize, pin: usize },

    /// More independent equations than unknown currents.
    #[error("Overdetermined system: {equations} equations for {unknowns} unknown currents")]
    Overdetermined { equations: usize, unknowns: usize },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors (snapshot export)
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results using CircuitError.
pub type CircuitResult<T> = Result<T, CircuitError>;

impl CircuitError {
    /// Category label of the error issue a failed update records.
    pub fn category(&self) -> &'static str {
        match self {
            CircuitError::InvalidPin { .. } => "wiring",
            CircuitError::UnorientedBranch { .. } => "topology",
            CircuitError::Overdetermined { .. } => "equations",
            CircuitError::Config(_) => "config",
            CircuitError::Serialization(_) => "serialization",
            CircuitError::Io(_) => "io",
        }
    }
}
