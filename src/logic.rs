//! Five-valued logic used by the D-algorithm
//!
//! Values are 0, 1, X (unknown), D (1 in the good circuit, 0 in the faulty circuit) and D'
//! (the converse). Gate evaluation is an exhaustive match over [`GateKind`](crate::network::GateKind),
//! with inverting gates computed from their base function.
//!
//! ```
//! # use dalgo::logic::{evaluate_gate, LogicValue};
//! # use dalgo::network::GateKind;
//! use LogicValue::*;
//! assert_eq!(evaluate_gate(GateKind::And, &[One, D]), D);
//! assert_eq!(evaluate_gate(GateKind::Nor, &[Zero, D]), DPrime);
//! assert_eq!(evaluate_gate(GateKind::Or, &[D, DPrime]), One);
//! ```

mod eval;
mod value;

pub use eval::{
    controlled_output, controlling_value, evaluate, evaluate_gate, non_controlling_value,
    required_input, sensitizing_value,
};
pub use value::LogicValue;
