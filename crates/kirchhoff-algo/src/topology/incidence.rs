//! Branch × node incidence with assigned current directions.
//!
//! Entries are `-1` (current leaves the node), `+1` (current enters) or `0`.
//! Unknown-current branches are oriented away from the node of their first
//! pin. Current-source branches follow the source: a source entered through
//! its positive terminal is oriented away from the node of the branch's last
//! pin, otherwise away from the node of its first pin.

use kirchhoff_core::{CircuitError, CircuitResult, ElementKind, Elements, PinId};
use serde::Serialize;
use tracing::debug;

use super::branches::{element_hops, Branches};
use super::nodes::Nodes;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncidenceMatrix {
    rows: Vec<Vec<i8>>,
    unknown_count: usize,
}

impl IncidenceMatrix {
    /// Build the incidence relation and orient every branch.
    pub fn build(nodes: &Nodes, branches: &Branches, elements: &Elements) -> CircuitResult<Self> {
        let node_count = nodes.len();
        let mut rows: Vec<Vec<i8>> = (0..branches.len())
            .map(|branch| {
                let on_pin = branches.branch_on_pin(branch);
                (0..node_count)
                    .map(|node| {
                        let shared = on_pin
                            .iter()
                            .zip(nodes.node_on_pins(node))
                            .any(|(&b, &n)| b && n);
                        i8::from(shared)
                    })
                    .collect()
            })
            .collect();

        let unknown_count = branches.unknown_count();
        for (index, pins) in branches.iter().enumerate() {
            let reference = if index < unknown_count {
                pins.first()
            } else {
                source_reference(pins, elements)
            };
            let Some(&pin) = reference else {
                return Err(CircuitError::UnorientedBranch { branch: index, pin: 0 });
            };
            let node = nodes.node_of(pin).ok_or(CircuitError::UnorientedBranch {
                branch: index,
                pin: pin.value(),
            })?;
            rows[index][node] = -1;
        }

        debug!(
            branch_count = rows.len(),
            node_count, unknown_count, "incidence matrix oriented"
        );
        Ok(Self {
            rows,
            unknown_count,
        })
    }

    /// Build directly from signed rows, taking the first `unknown_count` rows
    /// as unknown-current branches.
    pub fn from_rows(rows: Vec<Vec<i8>>, unknown_count: usize) -> Self {
        Self {
            unknown_count: unknown_count.min(rows.len()),
            rows,
        }
    }

    #[inline]
    pub fn get(&self, branch: usize, node: usize) -> i8 {
        self.rows[branch][node]
    }

    pub fn row(&self, branch: usize) -> &[i8] {
        &self.rows[branch]
    }

    pub fn rows(&self) -> &[Vec<i8>] {
        &self.rows
    }

    pub fn branch_count(&self) -> usize {
        self.rows.len()
    }

    pub fn node_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn unknown_count(&self) -> usize {
        self.unknown_count
    }

    /// First node the branch touches and the sign there.
    pub fn first_incident(&self, branch: usize) -> Option<(usize, i8)> {
        self.rows[branch]
            .iter()
            .enumerate()
            .find(|(_, sign)| **sign != 0)
            .map(|(node, &sign)| (node, sign))
    }

    /// Node where `branch` has the given sign.
    pub fn node_with_sign(&self, branch: usize, sign: i8) -> Option<usize> {
        self.rows[branch].iter().position(|&s| s == sign)
    }
}

/// Endpoint whose node the current of a source branch leaves.
fn source_reference<'a>(pins: &'a [PinId], elements: &Elements) -> Option<&'a PinId> {
    let source = element_hops(pins)
        .find(|&pin| elements.kind_of_pin(pin) == ElementKind::CurrentSource)?;
    if source.is_positive() {
        pins.last()
    } else {
        pins.first()
    }
}
