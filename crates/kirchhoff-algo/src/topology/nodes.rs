//! Electrical nodes: groups of pins joined by wires.
//!
//! Two pins sharing a wire are just a series joint and do not form a node.
//! A node needs at least three wired pins, so that a branch walk can stop
//! there. Seeds are taken in ascending pin order; the last two pins are never
//! used as seeds because fewer than three pins remain above them.

use kirchhoff_core::PinId;
use serde::Serialize;
use tracing::debug;

use super::pins::PinConnectivity;

/// Node list plus the reverse pin lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Nodes {
    nodes: Vec<Vec<PinId>>,
    pin_to_node: Vec<Option<usize>>,
    #[serde(skip)]
    node_on_pins: Vec<Vec<bool>>,
}

impl Nodes {
    pub fn from_connectivity(connectivity: &PinConnectivity) -> Self {
        let pin_count = connectivity.pin_count();
        let mut nodes: Vec<Vec<PinId>> = Vec::new();
        let mut pin_to_node = vec![None; pin_count];
        let mut claimed = vec![false; pin_count];

        for seed in 0..pin_count.saturating_sub(2) {
            if claimed[seed] {
                continue;
            }
            let seed_pin = PinId::new(seed);
            let mut second: Option<usize> = None;
            let mut node_index: Option<usize> = None;

            for other in seed + 1..pin_count {
                if claimed[other] || !connectivity.connected(seed_pin, PinId::new(other)) {
                    continue;
                }
                let Some(partner) = second else {
                    second = Some(other);
                    claimed[seed] = true;
                    claimed[other] = true;
                    continue;
                };
                let index = *node_index.get_or_insert_with(|| {
                    nodes.push(vec![seed_pin, PinId::new(partner)]);
                    let index = nodes.len() - 1;
                    pin_to_node[seed] = Some(index);
                    pin_to_node[partner] = Some(index);
                    index
                });
                nodes[index].push(PinId::new(other));
                pin_to_node[other] = Some(index);
                claimed[other] = true;
            }
        }

        let node_on_pins = nodes
            .iter()
            .map(|pins| {
                let mut row = vec![false; pin_count];
                for pin in pins {
                    row[pin.value()] = true;
                }
                row
            })
            .collect();

        debug!(node_count = nodes.len(), pin_count, "nodes extracted");
        Self {
            nodes,
            pin_to_node,
            node_on_pins,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[PinId]> {
        self.nodes.get(index).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[PinId]> {
        self.nodes.iter().map(Vec::as_slice)
    }

    /// Node containing `pin`, if the pin is part of one.
    #[inline]
    pub fn node_of(&self, pin: PinId) -> Option<usize> {
        self.pin_to_node.get(pin.value()).copied().flatten()
    }

    /// Membership row of `node` over all pins.
    pub fn node_on_pins(&self, node: usize) -> &[bool] {
        &self.node_on_pins[node]
    }

    pub fn as_vecs(&self) -> &[Vec<PinId>] {
        &self.nodes
    }
}
