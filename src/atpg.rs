//! Test pattern generation with the D-algorithm
//!
//! The search works on a five-valued [`Assignment`] of the circuit. It activates the fault,
//! applies implications, then takes decisions on primary inputs until the fault effect reaches
//! a primary output with every required value justified. Each decision is checkpointed, so
//! that a conflict or a blocked fault effect can be undone exactly.

mod activation;
mod assignment;
mod basis;
mod frontier;
mod implication;
mod search;

use kdam::{tqdm, BarExt};
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::logic::LogicValue;
use crate::network::Circuit;
use crate::sim::{detects_fault, Fault};

pub use activation::{activate, Activation};
pub use assignment::Assignment;
pub use basis::{fault_propagation_path, Basis};
pub use frontier::{d_frontier, is_unjustified, j_frontier};
pub use implication::{Implication, Implicator};
pub use search::{DAlgorithm, Decision, Phase, SearchState, Status};

/// Value given to primary inputs that the search left unknown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Fill {
    /// Set them to 0
    #[default]
    Zero,
    /// Set them to 1
    One,
    /// Set them randomly
    Random,
}

/// Turn a pattern into a Boolean one, filling unknown values according to the policy
pub fn fill_pattern<R: Rng>(pattern: &[LogicValue], fill: Fill, rng: &mut R) -> Vec<bool> {
    pattern
        .iter()
        .map(|v| match (v.to_bool(), fill) {
            (Some(b), _) => b,
            (None, Fill::Zero) => false,
            (None, Fill::One) => true,
            (None, Fill::Random) => rng.gen(),
        })
        .collect()
}

/// Generate a test pattern for a single fault
///
/// Returns the final status of the search and, on success, the filled pattern.
pub fn generate_pattern<R: Rng>(
    circuit: &Circuit,
    fault: Fault,
    fill: Fill,
    rng: &mut R,
) -> Result<(Status, Option<Vec<bool>>)> {
    let mut search = DAlgorithm::new(circuit, fault)?;
    let status = search.run();
    let pattern = match status {
        Status::Success => Some(fill_pattern(&search.pattern(), fill, rng)),
        _ => None,
    };
    Ok((status, pattern))
}

/// Test patterns generated for all the faults of a circuit
#[derive(Clone, Debug, Default)]
pub struct TestSet {
    /// Faults considered, in the order of [`Fault::all`]
    pub faults: Vec<Fault>,
    /// Generated patterns
    pub patterns: Vec<Vec<bool>>,
    /// Whether each fault is detected by some pattern
    pub detected: Vec<bool>,
    /// Whether each fault has been proven untestable
    pub redundant: Vec<bool>,
}

impl TestSet {
    /// Number of faults considered
    pub fn nb_faults(&self) -> usize {
        self.faults.len()
    }

    /// Number of patterns
    pub fn nb_patterns(&self) -> usize {
        self.patterns.len()
    }

    /// Number of faults detected by the patterns
    pub fn nb_detected(&self) -> usize {
        self.detected.iter().filter(|b| **b).count()
    }

    /// Number of faults proven untestable
    pub fn nb_redundant(&self) -> usize {
        self.redundant.iter().filter(|b| **b).count()
    }

    /// Percentage of detected faults
    pub fn coverage(&self) -> f64 {
        if self.faults.is_empty() {
            return 100.0;
        }
        100.0 * (self.nb_detected() as f64) / (self.nb_faults() as f64)
    }

    /// Add a pattern and mark every fault it detects
    ///
    /// Detection by simulation overrides a previous redundancy verdict.
    fn add_pattern(&mut self, circuit: &Circuit, pattern: Vec<bool>) {
        for (i, f) in self.faults.iter().enumerate() {
            if !self.detected[i] && detects_fault(circuit, &pattern, *f) {
                self.detected[i] = true;
                self.redundant[i] = false;
            }
        }
        self.patterns.push(pattern);
    }

    /// Check consistency
    pub fn check(&self) {
        assert_eq!(self.detected.len(), self.nb_faults());
        assert_eq!(self.redundant.len(), self.nb_faults());
        for (d, r) in self.detected.iter().zip(&self.redundant) {
            assert!(!(*d && *r));
        }
    }
}

/// Generate test patterns for every stuck-at fault of a circuit
///
/// Faults already detected by a previous pattern are skipped. Each generated pattern is
/// checked by fault simulation before being kept.
pub fn generate_test_patterns(circuit: &Circuit, fill: Fill, seed: u64) -> Result<TestSet> {
    let faults = Fault::all(circuit);
    let nb_faults = faults.len();
    let mut set = TestSet {
        faults,
        patterns: Vec::new(),
        detected: vec![false; nb_faults],
        redundant: vec![false; nb_faults],
    };
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut progress = tqdm!(total = nb_faults);
    progress.set_description("Faults processed");
    progress.write(format!(
        "Analyzing circuit with {} inputs, {} outputs and {} possible faults",
        circuit.nb_inputs(),
        circuit.nb_outputs(),
        nb_faults,
    ))?;
    for i in 0..nb_faults {
        if set.detected[i] {
            continue;
        }
        let fault = set.faults[i];
        let (status, pattern) = generate_pattern(circuit, fault, fill, &mut rng)?;
        match (status, pattern) {
            (Status::Success, Some(p)) => {
                if detects_fault(circuit, &p, fault) {
                    set.add_pattern(circuit, p);
                } else {
                    warn!("Pattern for {} does not detect it", fault.describe(circuit));
                }
            }
            _ => set.redundant[i] = true,
        }
        progress.set_postfix(format!(
            "patterns={} redundant={}",
            set.nb_patterns(),
            set.nb_redundant()
        ));
        progress.update_to(set.nb_detected() + set.nb_redundant())?;
    }
    progress.write(format!(
        "Generated {} patterns, detecting {}/{} faults ({:.2}% coverage), {} redundant",
        set.nb_patterns(),
        set.nb_detected(),
        set.nb_faults(),
        set.coverage(),
        set.nb_redundant(),
    ))?;
    info!(
        "{} patterns, {:.2}% coverage",
        set.nb_patterns(),
        set.coverage()
    );
    set.check();
    Ok(set)
}
