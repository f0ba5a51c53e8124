//! Pin connectivity: which pins are joined by wires.
//!
//! The relation is stored as a strictly lower-triangular boolean matrix: row
//! `i` has `i` entries and `rows[i][j]` (with `j < i`) means pins `i` and `j`
//! are on the same wire. Only wires count. The two pins of one element are
//! never connected through the element body.
//!
//! Construction happens in two steps:
//! 1. every declared terminal link marks its symmetric pair,
//! 2. links are propagated through shared endpoints until nothing changes,
//!    which leaves a symmetric, transitive relation.

use kirchhoff_core::{CircuitError, CircuitResult, Elements, PinId};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PinConnectivity {
    rows: Vec<Vec<bool>>,
}

impl PinConnectivity {
    /// Build the closed connectivity relation for `elements`.
    pub fn from_elements(elements: &Elements) -> CircuitResult<Self> {
        let pin_count = elements.pin_count();
        let mut matrix = Self {
            rows: (0..pin_count).map(|i| vec![false; i]).collect(),
        };

        for (id, element) in elements.iter() {
            for terminal in 0..2 {
                let Some(linked) = element.linked_pin(terminal) else {
                    continue;
                };
                let pin = if terminal == 0 {
                    id.first_pin()
                } else {
                    id.second_pin()
                };
                if linked.value() >= pin_count || linked == pin {
                    return Err(CircuitError::InvalidPin {
                        element: id.value(),
                        terminal,
                        pin: linked.value(),
                        pin_count,
                    });
                }
                matrix.set(pin.value(), linked.value());
            }
        }

        let passes = matrix.close();
        debug!(pin_count, passes, "pin connectivity built");
        Ok(matrix)
    }

    pub fn pin_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether pins `a` and `b` share a wire. A pin is not connected to itself.
    #[inline]
    pub fn connected(&self, a: PinId, b: PinId) -> bool {
        self.get(a.value(), b.value())
    }

    /// Lower-triangular row of `pin` (connections to lower-numbered pins).
    pub fn row(&self, pin: PinId) -> &[bool] {
        &self.rows[pin.value()]
    }

    /// All pins wired to `pin`, in ascending order.
    pub fn neighbors(&self, pin: PinId) -> impl Iterator<Item = PinId> + '_ {
        (0..self.pin_count())
            .filter(move |&other| self.get(pin.value(), other))
            .map(PinId::new)
    }

    #[inline]
    fn get(&self, a: usize, b: usize) -> bool {
        if a == b {
            return false;
        }
        let (row, col) = if a > b { (a, b) } else { (b, a) };
        self.rows[row][col]
    }

    #[inline]
    fn set(&mut self, a: usize, b: usize) -> bool {
        let (row, col) = if a > b { (a, b) } else { (b, a) };
        let was_set = self.rows[row][col];
        self.rows[row][col] = true;
        !was_set
    }

    /// For every connected pair, anything wired to one end gets wired to the
    /// other. Repeats until a full pass adds nothing; returns the pass count.
    fn close(&mut self) -> usize {
        let pin_count = self.pin_count();
        let mut passes = 0;
        loop {
            passes += 1;
            let mut changed = false;
            for i in 0..pin_count {
                for j in 0..i {
                    if !self.rows[i][j] {
                        continue;
                    }
                    for k in 0..pin_count {
                        if k == i || k == j {
                            continue;
                        }
                        if self.get(j, k) && self.set(i, k) {
                            changed = true;
                        }
                        if self.get(i, k) && self.set(j, k) {
                            changed = true;
                        }
                    }
                }
            }
            if !changed {
                return passes;
            }
        }
    }
}
