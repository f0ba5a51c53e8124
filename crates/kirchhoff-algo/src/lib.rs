//! # kirchhoff-algo: Topology Extraction and Equation Assembly
//!
//! Turns a flat list of two-terminal elements into Kirchhoff current-law and
//! voltage-law equations whose coefficients read element values live.
//!
//! ## Pipeline
//!
//! | Stage | Type | Output |
//! |-------|------|--------|
//! | Pin connectivity | [`PinConnectivity`] | closed wire relation over pins |
//! | Nodes | [`Nodes`] | pin groups of three or more |
//! | Branches | [`Branches`] | series chains, current sources last |
//! | Incidence | [`IncidenceMatrix`] | signed branch × node matrix |
//! | Loops | [`Loops`] | signed fundamental cycles |
//! | Equations | [`EquationSystem`] | left/right coefficient matrices |
//!
//! Every stage is rebuilt by [`Circuit::update`]. Changing a value with
//! [`Circuit::set_element_value`] is visible immediately.
//!
//! ## Quick Start
//!
//! ```rust
//! use kirchhoff_algo::Circuit;
//! use kirchhoff_core::{Element, Ohms, Volts};
//!
//! let mut circuit = Circuit::new();
//! circuit.add(Element::voltage_source(Volts(10.0)));
//! circuit.add(Element::resistance(Ohms(4.0)).with_terminals(Some(0), Some(1)));
//! circuit.add(Element::resistance(Ohms(6.0)).with_terminals(Some(0), Some(1)));
//! circuit.update()?;
//!
//! assert_eq!(circuit.node_count(), 2);
//! assert_eq!(circuit.loop_count(), 2);
//!
//! circuit.set_element_value(1, 8.0);
//! assert_eq!(circuit.left_values()[1][1], -8.0 + 1.0);
//! # Ok::<(), kirchhoff_core::CircuitError>(())
//! ```
//!
//! ## Modules
//!
//! - [`topology`] - Pins, nodes, branches, incidence and loops
//! - [`equations`] - Coefficients and equation assembly
//! - [`circuit`] - The [`Circuit`] orchestrator
//! - [`graph`] - petgraph views and topology statistics
//! - [`config`] - TOML configuration
//! - [`snapshot`] - Serializable topology snapshot

pub mod circuit;
pub mod config;
pub mod equations;
pub mod graph;
pub mod snapshot;
pub mod topology;

pub use circuit::Circuit;
pub use config::{AssemblyConfig, CircuitConfig, DiagnosticsConfig};
pub use equations::{Coefficient, ConstantSlots, EquationSystem, SourceIndex, ValueSlot};
pub use graph::{render_dot, topology_stats, unknown_current_graph, TopologyStats};
pub use snapshot::TopologySnapshot;
pub use topology::{Branches, IncidenceMatrix, Loops, Nodes, PinConnectivity, Topology};
