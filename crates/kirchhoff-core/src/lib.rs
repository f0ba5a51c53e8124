//! # kirchhoff-core: Circuit Element Model
//!
//! Provides the data model consumed by the topology and equation pipeline in
//! `kirchhoff-algo`.
//!
//! ## Design Philosophy
//!
//! A circuit is a flat, ordered list of two-terminal [`Element`]s:
//! - **Resistances**, **ideal voltage sources**, **ideal current sources**
//! - Element `e` owns pins `2e` and `2e + 1`; pins are never materialized,
//!   they are plain indices wrapped in [`PinId`]
//! - Each terminal optionally names another pin it is wired to
//!
//! Element identity is its position in [`Elements`]. Elements are only ever
//! appended, so an [`ElementId`] stays valid for the lifetime of the store and
//! equation coefficients can refer to element values through it. Changing a
//! value with [`Elements::set_value`] is therefore visible to every
//! coefficient without rebuilding anything.
//!
//! ## Quick Start
//!
//! ```rust
//! use kirchhoff_core::*;
//!
//! let mut elements = Elements::new();
//!
//! // A 10 V source with both terminals left unwired...
//! let source = elements.add(Element::voltage_source(Volts(10.0)));
//! // ...and a 2 Ω resistance whose first terminal is wired to the source's pin 1.
//! let load = elements.add(Element::resistance(Ohms(2.0)).with_terminals(Some(1), None));
//!
//! assert_eq!(elements.pin_count(), 4);
//! assert_eq!(elements.voltage_source_count(), 1);
//! assert_eq!(load.first_pin(), PinId::new(2));
//!
//! // Values are mutable in place; identity is stable.
//! assert!(elements.set_value(source.value(), 12.0));
//! assert_eq!(elements[source].value, 12.0);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Unified error type for the pipeline
//! - [`diagnostics`] - Non-fatal issues reported by `update()`
//! - [`units`] - Unit newtypes for element values

use serde::{Deserialize, Serialize};

pub mod diagnostics;
pub mod error;
pub mod units;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{CircuitError, CircuitResult};
pub use units::{Amperes, Ohms, Volts};

// Newtype wrappers for IDs for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(usize);

impl ElementId {
    #[inline]
    pub fn new(value: usize) -> Self {
        ElementId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }

    /// Pin of terminal 0 (`2e`)
    #[inline]
    pub fn first_pin(&self) -> PinId {
        PinId(self.0 * 2)
    }

    /// Pin of terminal 1 (`2e + 1`)
    #[inline]
    pub fn second_pin(&self) -> PinId {
        PinId(self.0 * 2 + 1)
    }
}

impl PinId {
    #[inline]
    pub fn new(value: usize) -> Self {
        PinId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }

    /// Element owning this pin (`pin / 2`)
    #[inline]
    pub fn element(&self) -> ElementId {
        ElementId(self.0 / 2)
    }

    /// Terminal number on the owning element (`pin % 2`)
    #[inline]
    pub fn terminal(&self) -> usize {
        self.0 % 2
    }

    /// The other terminal of the same element: even pins step up, odd pins step down.
    #[inline]
    pub fn sibling(&self) -> PinId {
        PinId(self.0 ^ 1)
    }

    /// Odd pins are the positive terminal of a source.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 % 2 == 1
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "element {}", self.0)
    }
}

impl std::fmt::Display for PinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pin {}", self.0)
    }
}

/// Kind of a two-terminal element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Resistance,
    VoltageSource,
    CurrentSource,
}

impl ElementKind {
    /// Short SPICE-like tag used in labels (`R`, `E`, `J`).
    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Resistance => "R",
            ElementKind::VoltageSource => "E",
            ElementKind::CurrentSource => "J",
        }
    }
}

/// A two-terminal circuit element.
///
/// `terminals[t]` is the pin that terminal `t` is wired to, if any. The wire
/// is symmetric: declaring it on either side is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub value: f64,
    pub terminals: [Option<PinId>; 2],
}

impl Element {
    pub fn new(kind: ElementKind, value: f64, terminal0: Option<usize>, terminal1: Option<usize>) -> Self {
        Self {
            kind,
            value,
            terminals: [terminal0.map(PinId), terminal1.map(PinId)],
        }
    }

    pub fn resistance(value: Ohms) -> Self {
        Self::new(ElementKind::Resistance, value.value(), None, None)
    }

    pub fn voltage_source(value: Volts) -> Self {
        Self::new(ElementKind::VoltageSource, value.value(), None, None)
    }

    pub fn current_source(value: Amperes) -> Self {
        Self::new(ElementKind::CurrentSource, value.value(), None, None)
    }

    /// Wire both terminals at once (`None` leaves a terminal unconnected).
    pub fn with_terminals(mut self, terminal0: Option<usize>, terminal1: Option<usize>) -> Self {
        self.terminals = [terminal0.map(PinId), terminal1.map(PinId)];
        self
    }

    /// Pin that `terminal` (0 or 1) is wired to.
    #[inline]
    pub fn linked_pin(&self, terminal: usize) -> Option<PinId> {
        self.terminals[terminal % 2]
    }

    pub fn is_floating(&self) -> bool {
        self.terminals.iter().all(Option::is_none)
    }
}

/// Append-only element store.
///
/// Indices handed out by [`Elements::add`] are never invalidated, which is
/// what lets coefficients hold an [`ElementId`] instead of a copy of the value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Elements {
    items: Vec<Element>,
    resistance_count: usize,
    voltage_source_count: usize,
    current_source_count: usize,
}

impl Elements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, element: Element) -> ElementId {
        match element.kind {
            ElementKind::Resistance => self.resistance_count += 1,
            ElementKind::VoltageSource => self.voltage_source_count += 1,
            ElementKind::CurrentSource => self.current_source_count += 1,
        }
        self.items.push(element);
        ElementId(self.items.len() - 1)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.items.get(id.0)
    }

    /// Current value of an element.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this store.
    #[inline]
    pub fn value(&self, id: ElementId) -> f64 {
        self.items[id.0].value
    }

    /// Set the value of the element at `index`. Out-of-range indices are ignored.
    pub fn set_value(&mut self, index: usize, value: f64) -> bool {
        match self.items.get_mut(index) {
            Some(element) => {
                element.value = value;
                true
            }
            None => false,
        }
    }

    /// Kind of the element owning `pin`.
    #[inline]
    pub fn kind_of_pin(&self, pin: PinId) -> ElementKind {
        self.items[pin.element().0].kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn pin_count(&self) -> usize {
        self.items.len() * 2
    }

    pub fn resistance_count(&self) -> usize {
        self.resistance_count
    }

    pub fn voltage_source_count(&self) -> usize {
        self.voltage_source_count
    }

    pub fn current_source_count(&self) -> usize {
        self.current_source_count
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, element)| (ElementId(index), element))
    }
}

impl std::ops::Index<ElementId> for Elements {
    type Output = Element;

    fn index(&self, id: ElementId) -> &Element {
        &self.items[id.0]
    }
}

impl FromIterator<Element> for Elements {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut elements = Elements::new();
        for element in iter {
            elements.add(element);
        }
        elements
    }
}
