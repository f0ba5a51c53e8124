//! Unit newtypes for element values.
//!
//! An [`Element`](crate::Element) stores its value as a bare `f64` so that
//! equation coefficients can read it back live. The newtypes here are used at
//! construction time so that a resistance cannot be passed where a source
//! voltage is expected.

use serde::{Deserialize, Serialize};

macro_rules! impl_unit {
    ($type:ty) => {
        impl $type {
            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }
        }
    };
}

/// Resistance in ohms (Ω)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Ohms(pub f64);

impl_unit!(Ohms);

/// Source voltage in volts (V)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Volts(pub f64);

impl_unit!(Volts);

/// Source current in amperes (A)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Amperes(pub f64);

impl_unit!(Amperes);
