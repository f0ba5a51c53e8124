//! Branch extraction.
//!
//! A branch is a maximal series chain. The walk starts at a node pin, hops
//! through the element body to the sibling pin, then over the wire to the
//! next element, and so on until it lands on a node pin or on a terminal with
//! no wire at all. Pins at even positions of a branch are the ones the walk
//! entered an element through; the classification and assembly stages only
//! look at those.
//!
//! Branches holding a current source are moved after all other branches,
//! keeping the relative order inside both groups.
//!
//! Walks only start on nodes other than the last one. A wired element that
//! no walk reaches (a series ring touching no node, a chain hanging off the
//! last node) is left out of the branches and listed as stray.

use kirchhoff_core::{ElementId, ElementKind, Elements, PinId};
use serde::Serialize;
use tracing::debug;

use super::nodes::Nodes;
use super::pins::PinConnectivity;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Branches {
    branches: Vec<Vec<PinId>>,
    current_source_count: usize,
    /// Branches whose walk stopped on an unwired terminal.
    open_ended: Vec<usize>,
    /// Wired elements that are on no branch.
    stray: Vec<ElementId>,
    #[serde(skip)]
    branch_on_pin: Vec<Vec<bool>>,
}

impl Branches {
    pub fn extract(
        connectivity: &PinConnectivity,
        nodes: &Nodes,
        elements: &Elements,
    ) -> Self {
        let pin_count = connectivity.pin_count();
        let mut claimed = vec![false; pin_count];
        let mut walks: Vec<(Vec<PinId>, bool)> = Vec::new();

        for node in 0..nodes.len().saturating_sub(1) {
            let Some(node_pins) = nodes.get(node) else {
                continue;
            };
            for &start in node_pins {
                if claimed[start.value()] {
                    continue;
                }
                walks.push(walk(start, connectivity, nodes, &mut claimed));
            }
        }

        let stray: Vec<ElementId> = elements
            .iter()
            .map(|(id, _)| id)
            .filter(|id| {
                let (first, second) = (id.first_pin(), id.second_pin());
                !claimed[first.value()]
                    && (connectivity.neighbors(first).next().is_some()
                        || connectivity.neighbors(second).next().is_some())
            })
            .collect();

        // Stable partition: unknown-current branches first.
        let (unknown, sources): (Vec<_>, Vec<_>) = walks
            .into_iter()
            .partition(|(pins, _)| !has_current_source(pins, elements));
        let current_source_count = sources.len();

        let mut branches = Vec::with_capacity(unknown.len() + sources.len());
        let mut open_ended = Vec::new();
        for (index, (pins, open)) in unknown.into_iter().chain(sources).enumerate() {
            if open {
                open_ended.push(index);
            }
            branches.push(pins);
        }

        let branch_on_pin = branches
            .iter()
            .map(|pins| {
                let mut row = vec![false; pin_count];
                for pin in pins {
                    row[pin.value()] = true;
                }
                row
            })
            .collect();

        debug!(
            branch_count = branches.len(),
            current_source_count,
            open_ended = open_ended.len(),
            stray = stray.len(),
            "branches extracted"
        );
        Self {
            branches,
            current_source_count,
            open_ended,
            stray,
            branch_on_pin,
        }
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[PinId]> {
        self.branches.get(index).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[PinId]> {
        self.branches.iter().map(Vec::as_slice)
    }

    /// Number of branches carrying a current source (stored last).
    pub fn current_source_count(&self) -> usize {
        self.current_source_count
    }

    /// Number of branches whose current is unknown (stored first).
    pub fn unknown_count(&self) -> usize {
        self.branches.len() - self.current_source_count
    }

    pub fn open_ended(&self) -> &[usize] {
        &self.open_ended
    }

    pub fn stray(&self) -> &[ElementId] {
        &self.stray
    }

    pub fn branch_on_pin(&self, branch: usize) -> &[bool] {
        &self.branch_on_pin[branch]
    }

    pub fn as_vecs(&self) -> &[Vec<PinId>] {
        &self.branches
    }
}

/// Pins at even positions: where the walk entered an element.
pub fn element_hops(branch: &[PinId]) -> impl Iterator<Item = PinId> + '_ {
    branch.iter().copied().step_by(2)
}

fn has_current_source(branch: &[PinId], elements: &Elements) -> bool {
    element_hops(branch).any(|pin| elements.kind_of_pin(pin) == ElementKind::CurrentSource)
}

/// Walk one branch from `start`. Returns the pins and whether it ended open.
fn walk(
    start: PinId,
    connectivity: &PinConnectivity,
    nodes: &Nodes,
    claimed: &mut [bool],
) -> (Vec<PinId>, bool) {
    let mut pins = Vec::new();
    let mut pin = start;
    loop {
        let far = pin.sibling();
        pins.extend([pin, far]);
        claimed[pin.value()] = true;
        claimed[far.value()] = true;

        if nodes.node_of(far).is_some() {
            return (pins, false);
        }
        // Off a node a pin has at most one wired partner.
        let Some(next) = connectivity.neighbors(far).next() else {
            return (pins, true);
        };
        pin = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kirchhoff_core::{Amperes, CircuitResult, Element, Ohms, Volts};

    fn extract(elements: Vec<Element>) -> CircuitResult<Branches> {
        let elements: Elements = elements.into_iter().collect();
        let connectivity = PinConnectivity::from_elements(&elements)?;
        let nodes = Nodes::from_connectivity(&connectivity);
        Ok(Branches::extract(&connectivity, &nodes, &elements))
    }

    fn values(pins: &[PinId]) -> Vec<usize> {
        pins.iter().map(PinId::value).collect()
    }

    #[test]
    fn test_current_source_branches_are_moved_last() {
        let branches = extract(vec![
            Element::resistance(Ohms(2.0)),
            Element::resistance(Ohms(6.0)).with_terminals(Some(1), None),
            Element::voltage_source(Volts(2.0)).with_terminals(Some(0), None),
            Element::current_source(Amperes(2.0)).with_terminals(Some(5), Some(3)),
            Element::resistance(Ohms(8.0)).with_terminals(Some(1), Some(5)),
        ])
        .unwrap();

        assert_eq!(branches.len(), 3);
        assert_eq!(values(branches.get(0).unwrap()), vec![1, 0, 4, 5]);
        assert_eq!(values(branches.get(1).unwrap()), vec![8, 9]);
        assert_eq!(values(branches.get(2).unwrap()), vec![2, 3, 7, 6]);
        assert_eq!(branches.current_source_count(), 1);
        assert_eq!(branches.unknown_count(), 2);
        assert!(branches.open_ended().is_empty());
    }

    #[test]
    fn test_branch_on_pin_matches_pins() {
        let branches = extract(vec![
            Element::voltage_source(Volts(10.0)),
            Element::resistance(Ohms(2.0)).with_terminals(Some(1), None),
            Element::resistance(Ohms(3.0)).with_terminals(Some(3), None),
            Element::current_source(Amperes(1.0)).with_terminals(Some(5), Some(0)),
            Element::resistance(Ohms(4.0)).with_terminals(Some(5), Some(0)),
        ])
        .unwrap();

        for (index, pins) in branches.iter().enumerate() {
            let row = branches.branch_on_pin(index);
            let from_row: Vec<usize> = (0..row.len()).filter(|&p| row[p]).collect();
            let mut from_pins = values(pins);
            from_pins.sort_unstable();
            assert_eq!(from_row, from_pins);
        }
        assert_eq!(values(branches.get(0).unwrap()), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_walks_never_start_from_the_last_node() {
        // Element 3 hangs off node 1 only, which is the last node.
        let branches = extract(vec![
            Element::resistance(Ohms(1.0)),
            Element::resistance(Ohms(1.0)).with_terminals(Some(0), Some(1)),
            Element::resistance(Ohms(1.0)).with_terminals(Some(0), Some(1)),
            Element::resistance(Ohms(1.0)).with_terminals(Some(1), None),
        ])
        .unwrap();

        // Node 0 = {0, 2, 4}, node 1 = {1, 3, 5, 6}.
        assert_eq!(branches.len(), 3);
        assert!(branches.open_ended().is_empty());
        assert!(!branches.branch_on_pin(2)[6]);
        assert_eq!(branches.stray(), &[ElementId::new(3)]);
    }

    #[test]
    fn test_ring_without_node_is_stray() {
        let branches = extract(vec![
            Element::voltage_source(Volts(1.0)),
            Element::resistance(Ohms(1.0)).with_terminals(Some(0), Some(1)),
            Element::resistance(Ohms(1.0)).with_terminals(Some(0), Some(1)),
            Element::resistance(Ohms(2.0)),
            Element::resistance(Ohms(3.0)).with_terminals(Some(7), Some(6)),
            Element::resistance(Ohms(4.0)),
        ])
        .unwrap();

        // Elements 3 and 4 form a ring of two-pin groups; element 5 is not wired.
        assert_eq!(branches.len(), 3);
        assert_eq!(branches.stray(), &[ElementId::new(3), ElementId::new(4)]);
        for (index, _) in branches.iter().enumerate() {
            assert!((6..10).all(|pin| !branches.branch_on_pin(index)[pin]));
        }
    }

    #[test]
    fn test_dangling_element_is_reported_open() {
        let branches = extract(vec![
            Element::voltage_source(Volts(1.0)),
            Element::resistance(Ohms(1.0)).with_terminals(Some(0), Some(1)),
            Element::resistance(Ohms(1.0)).with_terminals(Some(0), Some(1)),
            Element::resistance(Ohms(1.0)).with_terminals(Some(0), None),
        ])
        .unwrap();

        // Pin 6 joins node 0; pin 7 is unwired.
        let open: Vec<Vec<usize>> = branches
            .open_ended()
            .iter()
            .map(|&b| values(branches.get(b).unwrap()))
            .collect();
        assert_eq!(open, vec![vec![6, 7]]);
    }

    #[test]
    fn test_empty_when_no_nodes() {
        let branches = extract(vec![Element::resistance(Ohms(1.0))]).unwrap();
        assert!(branches.is_empty());
        assert_eq!(branches.unknown_count(), 0);
        assert!(branches.stray().is_empty());
    }
}
