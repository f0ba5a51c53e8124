//! Equation assembly over the extracted topology.

pub mod assembler;
pub mod coefficient;

pub use assembler::{EquationSystem, SourceIndex};
pub use coefficient::{Coefficient, ConstantSlots, ValueSlot};
