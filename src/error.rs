//! Error types
//!
//! Search outcomes such as conflicts or redundant faults are not errors: they are reported
//! through [`Status`](crate::atpg::Status). Errors are caller mistakes, detected before any
//! search begins.

use std::io;

use thiserror::Error;

/// Reason why a circuit description was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformation {
    /// A gate kind that is not supported
    #[error("unknown gate kind {0}")]
    UnknownGateKind(String),
    /// Two nodes share the same name
    #[error("node {0} is defined twice")]
    DuplicateNode(String),
    /// An edge references a node that is not defined
    #[error("edge {from} -> {to} references undefined node {missing}")]
    DanglingEdge {
        /// Source of the edge
        from: String,
        /// Target of the edge
        to: String,
        /// The endpoint that does not exist
        missing: String,
    },
    /// A node has a number of inputs incompatible with its kind
    #[error("{kind} node {name} has {found} inputs, expected {expected}")]
    BadArity {
        /// Name of the node
        name: String,
        /// Kind of the node
        kind: String,
        /// Number of inputs found
        found: usize,
        /// Human-readable description of the expected number
        expected: &'static str,
    },
    /// A primary output is used as the input of another node
    #[error("primary output {0} drives other nodes")]
    DrivingOutput(String),
    /// The circuit is not combinatorial
    #[error("combinatorial loop through node {0}")]
    CombinatorialLoop(String),
}

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    /// The circuit description is invalid
    #[error("malformed circuit: {0}")]
    MalformedCircuit(#[from] Malformation),
    /// The fault site does not exist in the circuit
    #[error("invalid fault site {0}")]
    InvalidFaultSite(String),
    /// Syntax error in an input file
    #[error("line {line}: {message}")]
    Parse {
        /// Line number, starting at 1
        line: usize,
        /// Description of the problem
        message: String,
    },
    /// Error during file IO
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
