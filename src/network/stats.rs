//! Compute circuit statistics
//!
//! ```
//! # use dalgo::network::CircuitDescription;
//! # let circuit = CircuitDescription::new().build().unwrap();
//! use dalgo::network::stats::stats;
//! let stats = stats(&circuit);
//!
//! // Check that there is no Xor gate
//! assert_eq!(stats.nb_xor, 0);
//!
//! // Show the statistics
//! println!("{}", stats);
//! ```

use std::fmt;

use itertools::Itertools;

use crate::network::{Circuit, GateKind, NodeKind};

/// Number of inputs, outputs and gates in a circuit
#[derive(Clone, Debug)]
pub struct CircuitStats {
    /// Number of inputs
    pub nb_inputs: usize,
    /// Number of outputs
    pub nb_outputs: usize,
    /// Number of And and Nand gates
    pub nb_and: usize,
    /// Number of Or and Nor gates
    pub nb_or: usize,
    /// Number of Xor and Xnor gates
    pub nb_xor: usize,
    /// Number of Not gates
    pub nb_not: usize,
    /// Number of Buf gates
    pub nb_buf: usize,
    /// Number of gates with an inverted output (Nand, Nor, Xnor)
    pub nb_inverted: usize,
    /// Number of gates by number of inputs
    pub arity: Vec<usize>,
    /// Maximum number of gates between an input and an output
    pub depth: usize,
    /// Maximum number of nodes driven by a single node
    pub max_fanout: usize,
}

impl CircuitStats {
    /// Total number of gates, excluding primary inputs and outputs
    pub fn nb_gates(&self) -> usize {
        self.nb_and + self.nb_or + self.nb_xor + self.nb_not + self.nb_buf
    }

    /// Record a new n-ary gate
    fn add_arity(&mut self, sz: usize) {
        if self.arity.len() <= sz {
            self.arity.resize(sz + 1, 0);
        }
        self.arity[sz] += 1;
    }
}

impl fmt::Display for CircuitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats:")?;
        writeln!(f, "  Inputs: {}", self.nb_inputs)?;
        writeln!(f, "  Outputs: {}", self.nb_outputs)?;
        writeln!(f, "  Gates: {}", self.nb_gates())?;
        writeln!(f, "  Depth: {}", self.depth)?;
        writeln!(f, "  Max fanout: {}", self.max_fanout)?;
        if self.nb_and != 0 {
            writeln!(f, "  And: {}", self.nb_and)?;
        }
        if self.nb_or != 0 {
            writeln!(f, "  Or: {}", self.nb_or)?;
        }
        if self.nb_xor != 0 {
            writeln!(f, "  Xor: {}", self.nb_xor)?;
        }
        if self.nb_inverted != 0 {
            writeln!(f, "      inverted: {}", self.nb_inverted)?;
        }
        if self.nb_not != 0 {
            writeln!(f, "  Not: {}", self.nb_not)?;
        }
        if self.nb_buf != 0 {
            writeln!(f, "  Buf: {}", self.nb_buf)?;
        }
        let arities = self
            .arity
            .iter()
            .enumerate()
            .filter(|(_, nb)| **nb != 0)
            .map(|(i, nb)| format!("{}: {}", i, nb))
            .join(", ");
        if !arities.is_empty() {
            writeln!(f, "  Arity: {}", arities)?;
        }
        fmt::Result::Ok(())
    }
}

/// Compute the statistics of the circuit
pub fn stats(c: &Circuit) -> CircuitStats {
    use GateKind::*;
    let mut ret = CircuitStats {
        nb_inputs: c.nb_inputs(),
        nb_outputs: c.nb_outputs(),
        nb_and: 0,
        nb_or: 0,
        nb_xor: 0,
        nb_not: 0,
        nb_buf: 0,
        nb_inverted: 0,
        arity: Vec::new(),
        depth: 0,
        max_fanout: c.node_ids().map(|n| c.fanout(n).len()).max().unwrap_or(0),
    };
    let mut level = vec![0usize; c.nb_nodes()];
    for &n in c.topo_order() {
        let from_inputs = c.fanin(n).iter().map(|s| level[s.index()]).max();
        let NodeKind::Gate(k) = c.kind(n) else {
            level[n.index()] = from_inputs.unwrap_or(0);
            continue;
        };
        level[n.index()] = from_inputs.unwrap_or(0) + 1;
        match k {
            And | Nand => ret.nb_and += 1,
            Or | Nor => ret.nb_or += 1,
            Xor | Xnor => ret.nb_xor += 1,
            Not => ret.nb_not += 1,
            Buf => ret.nb_buf += 1,
        }
        if matches!(k, Nand | Nor | Xnor) {
            ret.nb_inverted += 1;
        }
        ret.add_arity(c.fanin(n).len());
    }
    ret.depth = level.iter().copied().max().unwrap_or(0);
    ret
}
