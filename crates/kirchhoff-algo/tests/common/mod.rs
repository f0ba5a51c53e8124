//! Circuit builders shared by the integration tests.

#![allow(dead_code)]

use kirchhoff_algo::Circuit;
use kirchhoff_core::{Amperes, Element, Ohms, Volts};

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A single resistor with both terminals unwired.
pub fn lone_resistor() -> Circuit {
    vec![Element::resistance(Ohms(1.0))].into_iter().collect()
}

/// Source in series with 2 Ω and 3 Ω, paralleled by a 4 Ω resistor and a
/// 1 A current source.
pub fn series_source_loop() -> Circuit {
    vec![
        Element::voltage_source(Volts(10.0)),
        Element::resistance(Ohms(2.0)).with_terminals(Some(1), None),
        Element::resistance(Ohms(3.0)).with_terminals(Some(3), None),
        Element::current_source(Amperes(1.0)).with_terminals(Some(5), Some(0)),
        Element::resistance(Ohms(4.0)).with_terminals(Some(5), Some(0)),
    ]
    .into_iter()
    .collect()
}

/// One resistor between two nodes fed by two current sources.
pub fn two_current_sources() -> Circuit {
    vec![
        Element::resistance(Ohms(5.0)),
        Element::current_source(Amperes(2.0)).with_terminals(Some(0), Some(1)),
        Element::current_source(Amperes(3.0)).with_terminals(Some(0), Some(1)),
    ]
    .into_iter()
    .collect()
}

/// Two nodes joined by a 2 Ω + voltage source branch, an 8 Ω branch and a
/// current source branch.
pub fn mixed_two_node() -> Circuit {
    vec![
        Element::resistance(Ohms(2.0)),
        Element::resistance(Ohms(6.0)).with_terminals(Some(1), None),
        Element::voltage_source(Volts(2.0)).with_terminals(Some(0), None),
        Element::current_source(Amperes(2.0)).with_terminals(Some(5), Some(3)),
        Element::resistance(Ohms(8.0)).with_terminals(Some(1), Some(5)),
    ]
    .into_iter()
    .collect()
}

/// A 10 V source with `resistors` resistors across its terminals.
pub fn parallel_bank(resistors: usize) -> Circuit {
    let mut circuit = Circuit::new();
    circuit.add(Element::voltage_source(Volts(10.0)));
    for i in 0..resistors {
        circuit.add(Element::resistance(Ohms(1.0 + i as f64)).with_terminals(Some(0), Some(1)));
    }
    circuit
}

/// Resistive ladder fed by a 10 V source: rung `i` adds a series resistor
/// of `i` Ω and a shunt of `100 + i` Ω back to the source's positive pin.
pub fn ladder(rungs: usize) -> Circuit {
    let mut circuit = Circuit::new();
    circuit.add(Element::voltage_source(Volts(10.0)));
    let mut previous_top = 0;
    for i in 1..=rungs {
        let top = 2 * circuit.elements().len() + 1;
        circuit.add(Element::resistance(Ohms(i as f64)).with_terminals(Some(previous_top), None));
        circuit.add(Element::resistance(Ohms(100.0 + i as f64)).with_terminals(Some(top), Some(1)));
        previous_top = top;
    }
    circuit
}

/// Three nodes A, B, C with two 1 Ω resistors across each pair.
pub fn paired_triangle() -> Circuit {
    vec![
        Element::resistance(Ohms(1.0)),
        Element::resistance(Ohms(1.0)).with_terminals(Some(0), Some(1)),
        Element::resistance(Ohms(1.0)).with_terminals(Some(1), None),
        Element::resistance(Ohms(1.0)).with_terminals(Some(1), Some(5)),
        Element::resistance(Ohms(1.0)).with_terminals(Some(5), Some(0)),
        Element::resistance(Ohms(1.0)).with_terminals(Some(5), Some(0)),
    ]
    .into_iter()
    .collect()
}

pub fn updated(mut circuit: Circuit) -> Circuit {
    init_tracing();
    circuit.update().expect("update should succeed");
    circuit
}

pub fn pin_values(pins: &[kirchhoff_core::PinId]) -> Vec<usize> {
    pins.iter().map(|pin| pin.value()).collect()
}
