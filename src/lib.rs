//! Test pattern generation for combinational circuits with the D-algorithm
//!
//! This crate finds input patterns that detect single stuck-at faults in a gate-level circuit,
//! or proves that no such pattern exists.
//!
//! # Usage
//!
//! ```bash
//! # Show available commands
//! # At the moment, only .bench files are supported
//! dalgo help
//! # Show statistics about a circuit
//! dalgo show c17.bench
//! # Generate a pattern for one fault, showing every step of the search
//! dalgo atpg c17.bench --fault 16 --stuck-at 0 --trace
//! # Generate patterns for all faults of the circuit
//! dalgo atpg c17.bench -o c17.test
//! # Check the coverage of the patterns
//! dalgo coverage c17.bench c17.test
//! ```
//!
//! # Algorithm
//!
//! The search uses five-valued logic: 0, 1, X for unknown, D for a line that is 1 in the good
//! circuit and 0 in the faulty one, and D' for the converse.
//! The fault is first activated: the faulty line receives D or D', and its inputs the values
//! implied by its good value. Implications are then propagated through the circuit.
//! Decisions are only taken on primary inputs. They either justify a required value, the good
//! value of the faulty line included, or propagate the fault effect through a dominator or a
//! gate of the D-frontier. Every decision is checkpointed,
//! and a conflict or a blocked fault effect restores the last checkpoint with an untried
//! alternative. The fault is redundant when none is left.
//!
//! The search may be driven step by step to observe intermediate states:
//! ```
//! # use dalgo::atpg::{DAlgorithm, Status};
//! # use dalgo::network::{CircuitDescription, GateKind, NodeKind};
//! # use dalgo::sim::Fault;
//! let mut desc = CircuitDescription::new();
//! desc.node("i1", NodeKind::PrimaryInput)
//!     .node("i2", NodeKind::PrimaryInput)
//!     .node("i3", NodeKind::PrimaryInput)
//!     .node("g1", NodeKind::Gate(GateKind::And))
//!     .node("g2", NodeKind::Gate(GateKind::Or))
//!     .node("out", NodeKind::PrimaryOutput)
//!     .edge("i1", "g1")
//!     .edge("i2", "g1")
//!     .edge("g1", "g2")
//!     .edge("i3", "g2")
//!     .edge("g2", "out");
//! let circuit = desc.build().unwrap();
//!
//! let fault = Fault::by_name(&circuit, "g1", false).unwrap();
//! let mut search = DAlgorithm::new(&circuit, fault).unwrap();
//! assert_eq!(search.sensitize(), Status::Continuing);
//! assert_eq!(search.step(), Status::Success);
//! assert_eq!(search.pattern_bits(), Some(vec![true, true, false]));
//! ```

#![warn(missing_docs)]

pub mod atpg;
pub mod error;
pub mod io;
pub mod logic;
pub mod network;
pub mod sim;

pub use error::{Error, Result};
pub use network::{stats, Circuit, CircuitDescription, GateKind, NodeId, NodeKind};
