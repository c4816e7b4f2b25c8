use std::fmt;
use std::str::FromStr;

use crate::error::Malformation;

/// Kinds of logic gates
///
/// All gates have a single output. And, Or, Nand, Nor, Xor and Xnor accept two or more inputs,
/// and are evaluated by folding their inputs pairwise. Not and Buf have a single input.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum GateKind {
    /// N-input And gate
    And,
    /// N-input Or gate
    Or,
    /// N-input Nand gate
    Nand,
    /// N-input Nor gate
    Nor,
    /// N-input Xor gate
    Xor,
    /// N-input Xnor gate
    Xnor,
    /// Inverter
    Not,
    /// Buffer
    Buf,
}

/// Kind of a node in the circuit
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum NodeKind {
    /// Primary input, with no fan-in
    PrimaryInput,
    /// Primary output, observing a single signal
    PrimaryOutput,
    /// Logic gate
    Gate(GateKind),
}

impl GateKind {
    /// All gate kinds, in a fixed order
    pub const ALL: [GateKind; 8] = [
        GateKind::And,
        GateKind::Or,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::Xor,
        GateKind::Xnor,
        GateKind::Not,
        GateKind::Buf,
    ];

    /// Returns whether the output is inverted compared to the base function (And, Or, Xor, Buf)
    pub fn is_inverting(&self) -> bool {
        matches!(
            self,
            GateKind::Nand | GateKind::Nor | GateKind::Xnor | GateKind::Not
        )
    }

    /// Returns whether the gate has a single input
    pub fn is_unary(&self) -> bool {
        matches!(self, GateKind::Not | GateKind::Buf)
    }

    /// Returns whether the gate is a parity gate (Xor or Xnor)
    pub fn is_xor_like(&self) -> bool {
        matches!(self, GateKind::Xor | GateKind::Xnor)
    }
}

impl NodeKind {
    /// Returns the gate kind, if the node is a gate
    pub fn gate(&self) -> Option<GateKind> {
        match self {
            NodeKind::Gate(k) => Some(*k),
            _ => None,
        }
    }

    /// Check the number of inputs; returns a description of the expected number on failure
    pub(crate) fn check_arity(&self, nb_inputs: usize) -> Result<(), &'static str> {
        let ok = match self {
            NodeKind::PrimaryInput => nb_inputs == 0,
            NodeKind::PrimaryOutput => nb_inputs == 1,
            NodeKind::Gate(k) if k.is_unary() => nb_inputs == 1,
            NodeKind::Gate(_) => nb_inputs >= 2,
        };
        if ok {
            Ok(())
        } else {
            Err(match self {
                NodeKind::PrimaryInput => "0",
                NodeKind::Gate(k) if !k.is_unary() => "at least 2",
                _ => "1",
            })
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Nand => "NAND",
            GateKind::Nor => "NOR",
            GateKind::Xor => "XOR",
            GateKind::Xnor => "XNOR",
            GateKind::Not => "NOT",
            GateKind::Buf => "BUF",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::PrimaryInput => write!(f, "INPUT"),
            NodeKind::PrimaryOutput => write!(f, "OUTPUT"),
            NodeKind::Gate(k) => write!(f, "{}", k),
        }
    }
}

impl FromStr for GateKind {
    type Err = Malformation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AND" => Ok(GateKind::And),
            "OR" => Ok(GateKind::Or),
            "NAND" => Ok(GateKind::Nand),
            "NOR" => Ok(GateKind::Nor),
            "XOR" => Ok(GateKind::Xor),
            "XNOR" => Ok(GateKind::Xnor),
            "NOT" | "INV" => Ok(GateKind::Not),
            "BUF" | "BUFF" => Ok(GateKind::Buf),
            _ => Err(Malformation::UnknownGateKind(s.trim().to_string())),
        }
    }
}

impl FromStr for NodeKind {
    type Err = Malformation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INPUT" => Ok(NodeKind::PrimaryInput),
            "OUTPUT" => Ok(NodeKind::PrimaryOutput),
            _ => Ok(NodeKind::Gate(s.parse()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GateKind, NodeKind};
    use crate::error::Malformation;

    #[test]
    fn test_parse() {
        assert_eq!("and".parse::<GateKind>(), Ok(GateKind::And));
        assert_eq!(" BUFF ".parse::<GateKind>(), Ok(GateKind::Buf));
        assert_eq!("Input".parse::<NodeKind>(), Ok(NodeKind::PrimaryInput));
        assert_eq!(
            "xnor".parse::<NodeKind>(),
            Ok(NodeKind::Gate(GateKind::Xnor))
        );
        assert_eq!(
            "DFF".parse::<NodeKind>(),
            Err(Malformation::UnknownGateKind("DFF".to_string()))
        );
        for k in GateKind::ALL {
            assert_eq!(k.to_string().parse::<GateKind>(), Ok(k));
        }
    }

    #[test]
    fn test_arity() {
        assert!(NodeKind::PrimaryInput.check_arity(0).is_ok());
        assert!(NodeKind::PrimaryInput.check_arity(1).is_err());
        assert!(NodeKind::PrimaryOutput.check_arity(1).is_ok());
        assert!(NodeKind::Gate(GateKind::Not).check_arity(2).is_err());
        assert!(NodeKind::Gate(GateKind::And).check_arity(1).is_err());
        assert!(NodeKind::Gate(GateKind::Xor).check_arity(5).is_ok());
    }
}
