//! Kirchhoff equation assembly.
//!
//! The left matrix is `unknown × unknown` and holds the coefficients of the
//! unknown branch currents. The right matrix is `unknown × known` and holds
//! the coefficients of the known sources: current sources first, then voltage
//! sources, each group in element order.
//!
//! Rows `0..nodes-1` are current-law rows (one per node, the last node
//! omitted). The following rows are voltage-law rows, one per loop.

use kirchhoff_core::{CircuitError, CircuitResult, ElementId, ElementKind, Elements};
use serde::Serialize;
use tracing::debug;

use super::coefficient::{Coefficient, ConstantSlots};
use crate::topology::branches::element_hops;
use crate::topology::{Branches, IncidenceMatrix, Loops};

/// Lookups between element indices and source ordinals, built once per
/// assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceIndex {
    current_sources: Vec<ElementId>,
    voltage_sources: Vec<ElementId>,
    ordinals: Vec<Option<usize>>,
}

impl SourceIndex {
    pub fn new(elements: &Elements) -> Self {
        let mut index = Self {
            ordinals: vec![None; elements.len()],
            ..Self::default()
        };
        for (id, element) in elements.iter() {
            let group = match element.kind {
                ElementKind::Resistance => continue,
                ElementKind::CurrentSource => &mut index.current_sources,
                ElementKind::VoltageSource => &mut index.voltage_sources,
            };
            index.ordinals[id.value()] = Some(group.len());
            group.push(id);
        }
        index
    }

    /// Element of the `n`th current source.
    pub fn current_source(&self, n: usize) -> Option<ElementId> {
        self.current_sources.get(n).copied()
    }

    /// Element of the `n`th voltage source.
    pub fn voltage_source(&self, n: usize) -> Option<ElementId> {
        self.voltage_sources.get(n).copied()
    }

    /// Position of a source among the sources of its own kind.
    pub fn ordinal(&self, id: ElementId) -> Option<usize> {
        self.ordinals.get(id.value()).copied().flatten()
    }

    pub fn current_source_count(&self) -> usize {
        self.current_sources.len()
    }

    pub fn voltage_source_count(&self) -> usize {
        self.voltage_sources.len()
    }

    /// Right-matrix column of a source element.
    pub fn column(&self, id: ElementId, kind: ElementKind) -> Option<usize> {
        let ordinal = self.ordinal(id)?;
        match kind {
            ElementKind::CurrentSource => Some(ordinal),
            ElementKind::VoltageSource => Some(self.current_source_count() + ordinal),
            ElementKind::Resistance => None,
        }
    }
}

/// Assembled left and right coefficient matrices.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EquationSystem {
    left: Vec<Vec<Coefficient>>,
    right: Vec<Vec<Coefficient>>,
    first_law_rows: usize,
    second_law_rows: usize,
    known_count: usize,
    constants: ConstantSlots,
}

impl EquationSystem {
    pub fn assemble(
        incidence: &IncidenceMatrix,
        loops: &Loops,
        branches: &Branches,
        elements: &Elements,
        diagonal_term: f64,
    ) -> CircuitResult<Self> {
        let sources = SourceIndex::new(elements);
        let unknown = incidence.unknown_count();
        let known = sources.current_source_count() + sources.voltage_source_count();

        let first_law_rows = incidence.node_count().saturating_sub(1);
        let equations = first_law_rows + loops.len();
        if equations > unknown {
            return Err(CircuitError::Overdetermined {
                equations,
                unknowns: unknown,
            });
        }

        let mut left = vec![vec![Coefficient::zero(); unknown]; unknown];
        let mut right = vec![vec![Coefficient::zero(); known]; unknown];

        for (node, (left_row, right_row)) in left
            .iter_mut()
            .zip(right.iter_mut())
            .take(first_law_rows)
            .enumerate()
        {
            for (branch, cell) in left_row.iter_mut().enumerate() {
                let sign = incidence.get(branch, node);
                if sign != 0 {
                    *cell = Coefficient::unit(sign);
                }
            }
            for branch in unknown..incidence.branch_count() {
                let sign = incidence.get(branch, node);
                if sign == 0 {
                    continue;
                }
                let Some(source) = branch_source(branches, branch, elements) else {
                    continue;
                };
                if let Some(column) = sources.column(source, ElementKind::CurrentSource) {
                    right_row[column] = Coefficient::element(source, -sign);
                }
            }
        }

        for (offset, path) in loops.iter().enumerate() {
            let row = first_law_rows + offset;
            for &signed in path {
                let branch = signed.unsigned_abs() as usize - 1;
                let sign: i8 = if signed > 0 { 1 } else { -1 };
                let Some(pins) = branches.get(branch) else {
                    continue;
                };
                for pin in element_hops(pins) {
                    let id = pin.element();
                    match elements[id].kind {
                        ElementKind::Resistance => left[row][branch].attach(id, sign),
                        ElementKind::VoltageSource => {
                            let polarity: i8 = if pin.is_positive() { -1 } else { 1 };
                            if let Some(column) = sources.column(id, ElementKind::VoltageSource) {
                                right[row][column] = Coefficient::element(id, sign * polarity);
                            }
                        }
                        ElementKind::CurrentSource => {}
                    }
                }
            }
        }

        for (index, row) in left.iter_mut().enumerate() {
            row[index].term += diagonal_term;
        }

        debug!(
            unknown,
            known,
            first_law_rows,
            second_law_rows = loops.len(),
            "equations assembled"
        );
        Ok(Self {
            left,
            right,
            first_law_rows,
            second_law_rows: loops.len(),
            known_count: known,
            constants: ConstantSlots::default(),
        })
    }

    pub fn left(&self) -> &[Vec<Coefficient>] {
        &self.left
    }

    pub fn right(&self) -> &[Vec<Coefficient>] {
        &self.right
    }

    pub fn constants(&self) -> &ConstantSlots {
        &self.constants
    }

    pub fn unknown_count(&self) -> usize {
        self.left.len()
    }

    pub fn known_count(&self) -> usize {
        self.known_count
    }

    pub fn first_law_rows(&self) -> usize {
        self.first_law_rows
    }

    pub fn second_law_rows(&self) -> usize {
        self.second_law_rows
    }

    pub fn evaluate_left(&self, row: usize, column: usize, elements: &Elements) -> f64 {
        self.left[row][column].evaluate(elements, &self.constants)
    }

    pub fn evaluate_right(&self, row: usize, column: usize, elements: &Elements) -> f64 {
        self.right[row][column].evaluate(elements, &self.constants)
    }

    /// Dense snapshot of the left matrix at the current element values.
    pub fn left_values(&self, elements: &Elements) -> Vec<Vec<f64>> {
        evaluate_all(&self.left, elements, &self.constants)
    }

    /// Dense snapshot of the right matrix at the current element values.
    pub fn right_values(&self, elements: &Elements) -> Vec<Vec<f64>> {
        evaluate_all(&self.right, elements, &self.constants)
    }
}

fn evaluate_all(
    matrix: &[Vec<Coefficient>],
    elements: &Elements,
    constants: &ConstantSlots,
) -> Vec<Vec<f64>> {
    matrix
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.evaluate(elements, constants))
                .collect()
        })
        .collect()
}

/// First current source on a branch.
fn branch_source(branches: &Branches, branch: usize, elements: &Elements) -> Option<ElementId> {
    let pins = branches.get(branch)?;
    element_hops(pins)
        .map(|pin| pin.element())
        .find(|&id| elements[id].kind == ElementKind::CurrentSource)
}
