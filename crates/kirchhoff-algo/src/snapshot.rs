//! Serializable view of an extracted topology.

use kirchhoff_core::{CircuitError, CircuitResult, PinId};
use serde::Serialize;

use crate::topology::Topology;

/// Everything `update()` derives from the element sequence, except the
/// equation coefficients. Two updates of the same elements produce equal
/// snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologySnapshot {
    pub pin_count: usize,
    pub nodes: Vec<Vec<PinId>>,
    pub branches: Vec<Vec<PinId>>,
    pub current_source_branches: usize,
    pub open_branches: Vec<usize>,
    pub incidence: Vec<Vec<i8>>,
    pub unknown_count: usize,
    pub loops: Vec<Vec<i64>>,
    pub discarded_loop_seeds: Vec<usize>,
}

impl TopologySnapshot {
    pub fn from_topology(topology: &Topology) -> Self {
        Self {
            pin_count: topology.connectivity.pin_count(),
            nodes: topology.nodes.as_vecs().to_vec(),
            branches: topology.branches.as_vecs().to_vec(),
            current_source_branches: topology.branches.current_source_count(),
            open_branches: topology.branches.open_ended().to_vec(),
            incidence: topology.incidence.rows().to_vec(),
            unknown_count: topology.incidence.unknown_count(),
            loops: topology.loops.as_vecs().to_vec(),
            discarded_loop_seeds: topology.loops.discarded().to_vec(),
        }
    }

    pub fn to_json(&self) -> CircuitResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CircuitError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kirchhoff_core::{Element, Elements, Ohms, Volts};

    #[test]
    fn test_snapshot_json_shape() {
        let elements: Elements = vec![
            Element::voltage_source(Volts(1.0)),
            Element::resistance(Ohms(1.0)).with_terminals(Some(0), Some(1)),
            Element::resistance(Ohms(2.0)).with_terminals(Some(0), Some(1)),
        ]
        .into_iter()
        .collect();
        let topology = Topology::build(&elements).unwrap();
        let snapshot = TopologySnapshot::from_topology(&topology);

        assert_eq!(snapshot.pin_count, 6);
        assert_eq!(snapshot.loops, vec![vec![-2, 1], vec![-1, 3]]);

        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(json["nodes"][0], serde_json::json!([0, 2, 4]));
        assert_eq!(json["incidence"][2], serde_json::json!([-1, 1]));
        assert_eq!(json["unknown_count"], 3);
    }
}
