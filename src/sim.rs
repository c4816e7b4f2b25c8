//! Two-valued simulation of a circuit, with optional stuck-at fault injection
//!
//! Used to check that a generated pattern actually detects its fault. Faster, multi-pattern
//! simulation methods work on 64 patterns at once.

mod fault;
mod simple_sim;

use crate::network::Circuit;

pub use fault::Fault;
use simple_sim::SimpleSimulator;

/// Simple conversion to 64b format
fn bool_to_multi(values: &[bool]) -> Vec<u64> {
    values.iter().map(|b| if *b { !0 } else { 0 }).collect()
}

/// Simple conversion from 64b format
fn multi_to_bool(values: &[u64]) -> Vec<bool> {
    values.iter().map(|b| *b != 0).collect()
}

/// Pack patterns by groups of 64 for multi-pattern simulation
///
/// Each group has one word per input. The last group is padded by repeating its last pattern.
pub fn pack_patterns(patterns: &[Vec<bool>]) -> Vec<Vec<u64>> {
    let mut ret = Vec::new();
    for chunk in patterns.chunks(64) {
        let nb_inputs = chunk[0].len();
        let mut words = vec![0u64; nb_inputs];
        for bit in 0..64 {
            let p = &chunk[bit.min(chunk.len() - 1)];
            for (w, b) in words.iter_mut().zip(p) {
                if *b {
                    *w |= 1u64 << bit;
                }
            }
        }
        ret.push(words);
    }
    ret
}

/// Simulate a combinatorial circuit; return the output values
pub fn simulate_comb(c: &Circuit, input_values: &[bool]) -> Vec<bool> {
    multi_to_bool(&simulate_comb_multi(c, &bool_to_multi(input_values)))
}

/// Simulate a combinatorial circuit, with a fault injected; return the output values
pub fn simulate_comb_with_fault(c: &Circuit, input_values: &[bool], fault: Fault) -> Vec<bool> {
    let mut sim = SimpleSimulator::from_circuit(c);
    multi_to_bool(&sim.run_with_fault(&bool_to_multi(input_values), fault))
}

/// Simulate a combinatorial circuit with 64b inputs; return the output values
pub fn simulate_comb_multi(c: &Circuit, input_values: &[u64]) -> Vec<u64> {
    let mut sim = SimpleSimulator::from_circuit(c);
    sim.run(input_values)
}

/// Returns whether the pattern detects the fault: some output differs from the good circuit
pub fn detects_fault(c: &Circuit, pattern: &[bool], fault: Fault) -> bool {
    detects_fault_multi(c, &bool_to_multi(pattern), fault) != 0
}

/// Returns which of the 64 patterns detect the fault, as a bitmask
pub fn detects_fault_multi(c: &Circuit, pattern: &[u64], fault: Fault) -> u64 {
    let mut sim = SimpleSimulator::from_circuit(c);
    let good = sim.run(pattern);
    let faulty = sim.run_with_fault(pattern, fault);
    good.iter()
        .zip(faulty.iter())
        .fold(0, |acc, (g, f)| acc | (g ^ f))
}
