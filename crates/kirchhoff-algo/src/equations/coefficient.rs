//! Symbolic equation coefficients.
//!
//! A coefficient never stores an element value. It stores *where* the value
//! lives (a [`ValueSlot`]) and resolves it against the element store when
//! evaluated, so editing an element after assembly changes every coefficient
//! that refers to it.

use kirchhoff_core::{ElementId, Elements};
use serde::Serialize;

/// The two constant targets used by coefficients that do not refer to an
/// element: KCL entries and empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConstantSlots {
    pub zero: f64,
    pub one: f64,
}

impl Default for ConstantSlots {
    fn default() -> Self {
        Self { zero: 0.0, one: 1.0 }
    }
}

/// What a coefficient's value refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "elements", rename_all = "snake_case")]
pub enum ValueSlot {
    Zero,
    One,
    Element(ElementId),
    /// Resistances in series on one branch; evaluates to their sum.
    Series(Vec<ElementId>),
}

impl ValueSlot {
    pub fn resolve(&self, elements: &Elements, constants: &ConstantSlots) -> f64 {
        match self {
            ValueSlot::Zero => constants.zero,
            ValueSlot::One => constants.one,
            ValueSlot::Element(id) => elements.value(*id),
            ValueSlot::Series(ids) => ids.iter().map(|id| elements.value(*id)).sum(),
        }
    }

    /// Elements this slot reads from.
    pub fn elements(&self) -> &[ElementId] {
        match self {
            ValueSlot::Zero | ValueSlot::One => &[],
            ValueSlot::Element(id) => std::slice::from_ref(id),
            ValueSlot::Series(ids) => ids,
        }
    }
}

/// `slot · sign + term`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coefficient {
    pub slot: ValueSlot,
    pub sign: i8,
    pub term: f64,
}

impl Default for Coefficient {
    fn default() -> Self {
        Self::zero()
    }
}

impl Coefficient {
    pub fn zero() -> Self {
        Self {
            slot: ValueSlot::Zero,
            sign: 1,
            term: 0.0,
        }
    }

    /// `±1`, used by current-law rows.
    pub fn unit(sign: i8) -> Self {
        Self {
            slot: ValueSlot::One,
            sign,
            term: 0.0,
        }
    }

    pub fn element(id: ElementId, sign: i8) -> Self {
        Self {
            slot: ValueSlot::Element(id),
            sign,
            term: 0.0,
        }
    }

    /// Add a series element to this coefficient. The sign is taken from the
    /// latest call; all elements of one branch share it.
    pub fn attach(&mut self, id: ElementId, sign: i8) {
        self.slot = match std::mem::replace(&mut self.slot, ValueSlot::Zero) {
            ValueSlot::Zero | ValueSlot::One => ValueSlot::Element(id),
            ValueSlot::Element(first) => ValueSlot::Series(vec![first, id]),
            ValueSlot::Series(mut ids) => {
                ids.push(id);
                ValueSlot::Series(ids)
            }
        };
        self.sign = sign;
    }

    #[inline]
    pub fn evaluate(&self, elements: &Elements, constants: &ConstantSlots) -> f64 {
        self.slot.resolve(elements, constants) * f64::from(self.sign) + self.term
    }

    /// True when the coefficient evaluates to zero regardless of element values.
    pub fn is_structural_zero(&self) -> bool {
        self.slot == ValueSlot::Zero && self.term == 0.0
    }
}
