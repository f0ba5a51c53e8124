//! Topology extraction: pins → nodes → branches → incidence → loops.
//!
//! Each stage is a plain value built from the previous ones and never
//! updated in place. [`Topology::build`] runs them in order.

pub mod branches;
pub mod incidence;
pub mod loops;
pub mod nodes;
pub mod pins;

pub use branches::Branches;
pub use incidence::IncidenceMatrix;
pub use loops::Loops;
pub use nodes::Nodes;
pub use pins::PinConnectivity;

use kirchhoff_core::{CircuitResult, Elements};

/// All topology stages for one element sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    pub connectivity: PinConnectivity,
    pub nodes: Nodes,
    pub branches: Branches,
    pub incidence: IncidenceMatrix,
    pub loops: Loops,
}

impl Topology {
    pub fn build(elements: &Elements) -> CircuitResult<Self> {
        let connectivity = PinConnectivity::from_elements(elements)?;
        let nodes = Nodes::from_connectivity(&connectivity);
        let branches = Branches::extract(&connectivity, &nodes, elements);
        let incidence = IncidenceMatrix::build(&nodes, &branches, elements)?;
        let loops = Loops::find(&incidence);
        Ok(Self {
            connectivity,
            nodes,
            branches,
            incidence,
            loops,
        })
    }
}
