//! Representation and handling of combinatorial circuits

mod circuit;
mod gates;
pub mod stats;

pub use circuit::{Circuit, CircuitDescription, Node, NodeId};
pub use gates::{GateKind, NodeKind};
