//! The [`Circuit`]: element store plus everything derived from it.
//!
//! Adding an element marks the derived structures stale; [`Circuit::update`]
//! rebuilds all of them from scratch. Changing an element value never needs
//! an update because coefficients read values through element ids.

use kirchhoff_core::{CircuitResult, Diagnostics, Element, ElementId, Elements, PinId};
use tracing::{debug, info, warn};

use crate::config::CircuitConfig;
use crate::equations::EquationSystem;
use crate::graph::{topology_stats, TopologyStats};
use crate::snapshot::TopologySnapshot;
use crate::topology::{Branches, IncidenceMatrix, Loops, Nodes, PinConnectivity, Topology};

#[derive(Debug, Clone, Default)]
pub struct Circuit {
    elements: Elements,
    config: CircuitConfig,
    topology: Topology,
    equations: EquationSystem,
    diagnostics: Diagnostics,
    stale: bool,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CircuitConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Append an element. Derived structures stay as they were until the
    /// next [`update`](Self::update).
    pub fn add(&mut self, element: Element) -> ElementId {
        self.stale = true;
        self.elements.add(element)
    }

    /// Rebuild topology and equations from the current element sequence.
    ///
    /// On error nothing is replaced: the previous results stay readable, the
    /// circuit stays stale and the error is added to [`diagnostics`](Self::diagnostics).
    pub fn update(&mut self) -> CircuitResult<()> {
        let (topology, equations) = match self.rebuild() {
            Ok(built) => built,
            Err(err) => {
                warn!(category = err.category(), error = %err, "circuit update failed");
                self.diagnostics.clear_errors();
                self.diagnostics.add_error(err.category(), &err.to_string());
                return Err(err);
            }
        };

        let diagnostics = if self.config.diagnostics.enabled {
            collect_diagnostics(&self.elements, &topology)
        } else {
            Diagnostics::new()
        };
        for issue in diagnostics.warnings() {
            warn!(%issue, "circuit diagnostic");
        }

        info!(
            elements = self.elements.len(),
            nodes = topology.nodes.len(),
            branches = topology.branches.len(),
            unknown = topology.incidence.unknown_count(),
            loops = topology.loops.len(),
            diagnostics = %diagnostics.summary(),
            "circuit updated"
        );

        self.topology = topology;
        self.equations = equations;
        self.diagnostics = diagnostics;
        self.stale = false;
        Ok(())
    }

    fn rebuild(&self) -> CircuitResult<(Topology, EquationSystem)> {
        let topology = Topology::build(&self.elements)?;
        let equations = EquationSystem::assemble(
            &topology.incidence,
            &topology.loops,
            &topology.branches,
            &self.elements,
            self.config.assembly.diagonal_term,
        )?;
        Ok((topology, equations))
    }

    /// Change the value of the element at `index`. Out-of-range indices are
    /// ignored and return `false`.
    pub fn set_element_value(&mut self, index: usize, value: f64) -> bool {
        let changed = self.elements.set_value(index, value);
        if changed {
            debug!(index, value, "element value changed");
        }
        changed
    }

    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    /// True when elements were added after the last successful update.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn connectivity(&self) -> &PinConnectivity {
        &self.topology.connectivity
    }

    pub fn nodes(&self) -> &Nodes {
        &self.topology.nodes
    }

    pub fn node_count(&self) -> usize {
        self.topology.nodes.len()
    }

    pub fn branches(&self) -> &Branches {
        &self.topology.branches
    }

    pub fn branch_count(&self) -> usize {
        self.topology.branches.len()
    }

    pub fn current_source_branch_count(&self) -> usize {
        self.topology.branches.current_source_count()
    }

    pub fn incidence(&self) -> &IncidenceMatrix {
        &self.topology.incidence
    }

    pub fn unknown_count(&self) -> usize {
        self.topology.incidence.unknown_count()
    }

    pub fn loops(&self) -> &Loops {
        &self.topology.loops
    }

    pub fn loop_count(&self) -> usize {
        self.topology.loops.len()
    }

    pub fn equations(&self) -> &EquationSystem {
        &self.equations
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Left matrix evaluated at the current element values.
    pub fn left_values(&self) -> Vec<Vec<f64>> {
        self.equations.left_values(&self.elements)
    }

    /// Right matrix evaluated at the current element values.
    pub fn right_values(&self) -> Vec<Vec<f64>> {
        self.equations.right_values(&self.elements)
    }

    pub fn stats(&self) -> TopologyStats {
        topology_stats(&self.topology)
    }

    pub fn snapshot(&self) -> TopologySnapshot {
        TopologySnapshot::from_topology(&self.topology)
    }
}

impl FromIterator<Element> for Circuit {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut circuit = Circuit::new();
        for element in iter {
            circuit.add(element);
        }
        circuit
    }
}

fn collect_diagnostics(elements: &Elements, topology: &Topology) -> Diagnostics {
    let mut diag = Diagnostics::new();

    let mut linked = vec![false; elements.pin_count()];
    for (_, element) in elements.iter() {
        for pin in element.terminals.iter().flatten() {
            linked[pin.value()] = true;
        }
    }
    for (id, element) in elements.iter() {
        let wired_to = linked[id.first_pin().value()] || linked[id.second_pin().value()];
        if element.is_floating() && !wired_to {
            diag.add_warning_with_entity(
                "wiring",
                &format!("{} element is not wired to anything", element.kind.tag()),
                &id.to_string(),
            );
        }
    }

    for &branch in topology.branches.open_ended() {
        let end = topology
            .branches
            .get(branch)
            .and_then(|pins| pins.last())
            .map_or_else(String::new, PinId::to_string);
        diag.add_warning_with_entity(
            "topology",
            &format!("Branch ends at unwired {end}"),
            &format!("branch {branch}"),
        );
    }

    for id in topology.branches.stray() {
        diag.add_warning_with_entity(
            "topology",
            "Wired element is on no branch",
            &id.to_string(),
        );
    }

    for &seed in topology.loops.discarded() {
        diag.add_warning_with_entity(
            "loops",
            "Unknown-current branch closes no loop",
            &format!("branch {seed}"),
        );
    }

    let stats = topology_stats(topology);
    if stats.connected_components == 1 && !stats.cycle_rank_holds() {
        diag.add_warning(
            "loops",
            &format!(
                "Found {} loops but the unknown-current graph has {} independent cycles",
                stats.loop_count, stats.cycle_rank
            ),
        );
    }

    diag
}
