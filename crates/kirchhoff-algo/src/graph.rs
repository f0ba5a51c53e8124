//! Node/branch graph views of an extracted topology.
//!
//! The incidence matrix is turned into a `petgraph` multigraph: circuit nodes
//! are graph nodes, unknown-current branches that join two nodes are edges.
//! Current-source branches and open-ended branches are left out, matching
//! what the loop search walks over.

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::topology::Topology;

/// Summary of one topology, used for the cycle-rank check and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyStats {
    pub node_count: usize,
    pub branch_count: usize,
    pub unknown_count: usize,
    pub current_source_branches: usize,
    pub open_branches: usize,
    pub loop_count: usize,
    /// Connected components of the unknown-current graph.
    pub connected_components: usize,
    /// Independent cycles of the unknown-current graph (`E - V + C`).
    pub cycle_rank: usize,
}

impl TopologyStats {
    /// Whether the found loops match the graph's independent cycles.
    pub fn cycle_rank_holds(&self) -> bool {
        self.loop_count == self.cycle_rank
    }
}

/// Graph over circuit nodes with one edge per two-ended unknown branch.
/// Edge weights are branch indices.
pub fn unknown_current_graph(topology: &Topology) -> UnGraph<usize, usize> {
    let incidence = &topology.incidence;
    let mut graph = UnGraph::with_capacity(topology.nodes.len(), incidence.unknown_count());
    let indices: Vec<NodeIndex> = (0..topology.nodes.len())
        .map(|node| graph.add_node(node))
        .collect();

    for branch in 0..incidence.unknown_count() {
        let from = incidence.node_with_sign(branch, -1);
        let to = incidence.node_with_sign(branch, 1);
        if let (Some(from), Some(to)) = (from, to) {
            graph.add_edge(indices[from], indices[to], branch);
        }
    }
    graph
}

pub fn topology_stats(topology: &Topology) -> TopologyStats {
    let graph = unknown_current_graph(topology);
    let components = connected_components(&graph);
    let cycle_rank = (graph.edge_count() + components).saturating_sub(graph.node_count());

    TopologyStats {
        node_count: topology.nodes.len(),
        branch_count: topology.branches.len(),
        unknown_count: topology.branches.unknown_count(),
        current_source_branches: topology.branches.current_source_count(),
        open_branches: topology.branches.open_ended().len(),
        loop_count: topology.loops.len(),
        connected_components: components,
        cycle_rank,
    }
}

/// Render the unknown-current graph as Graphviz DOT.
pub fn render_dot(topology: &Topology) -> String {
    let graph = unknown_current_graph(topology);
    let mut buffer = String::new();
    buffer.push_str("graph circuit {\n");
    for node in graph.node_indices() {
        buffer.push_str(&format!("  n{} [label=\"node {}\"];\n", node.index(), graph[node]));
    }
    for edge in graph.edge_references() {
        let source = edge.source().index();
        let target = edge.target().index();
        let branch = edge.weight();
        buffer.push_str(&format!("  n{source} -- n{target} [label=\"b{branch}\"];\n"));
    }
    buffer.push('}');
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use kirchhoff_core::{Amperes, Element, Elements, Ohms, Volts};

    fn parallel_bank(resistors: usize) -> Elements {
        let mut elements = Elements::new();
        elements.add(Element::voltage_source(Volts(10.0)));
        for i in 0..resistors {
            elements.add(Element::resistance(Ohms(1.0 + i as f64)).with_terminals(Some(0), Some(1)));
        }
        elements
    }

    #[test]
    fn test_parallel_bank_stats() {
        let topology = Topology::build(&parallel_bank(3)).unwrap();
        let stats = topology_stats(&topology);

        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.branch_count, 4);
        assert_eq!(stats.connected_components, 1);
        assert_eq!(stats.cycle_rank, 3);
        assert_eq!(stats.loop_count, 3);
        assert!(stats.cycle_rank_holds());
    }

    #[test]
    fn test_source_branches_are_not_edges() {
        let elements: Elements = vec![
            Element::resistance(Ohms(5.0)),
            Element::current_source(Amperes(2.0)).with_terminals(Some(0), Some(1)),
            Element::current_source(Amperes(3.0)).with_terminals(Some(0), Some(1)),
        ]
        .into_iter()
        .collect();
        let topology = Topology::build(&elements).unwrap();
        let graph = unknown_current_graph(&topology);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(topology_stats(&topology).cycle_rank, 0);
    }

    #[test]
    fn test_render_dot() {
        let topology = Topology::build(&parallel_bank(2)).unwrap();
        let dot = render_dot(&topology);
        assert!(dot.starts_with("graph circuit {"));
        assert_eq!(dot.matches(" -- ").count(), 3);
        for branch in 0..3 {
            assert!(dot.contains(&format!("[label=\"b{branch}\"]")));
        }
        assert!(dot.ends_with('}'));
    }

    #[test]
    fn test_empty_topology() {
        let stats = topology_stats(&Topology::default());
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.connected_components, 0);
        assert_eq!(stats.cycle_rank, 0);
    }
}
