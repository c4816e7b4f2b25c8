use std::fmt;

use crate::error::{Error, Result};
use crate::logic::LogicValue;
use crate::network::{Circuit, NodeId};

/// Single stuck-at fault: the output of a node is stuck at a fixed value
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fault {
    /// Node where the fault is located
    pub site: NodeId,
    /// Fault value
    pub value: bool,
}

impl Fault {
    /// Create a fault at the given node
    pub fn new(site: NodeId, value: bool) -> Fault {
        Fault { site, value }
    }

    /// Create a fault from the name of the node
    pub fn by_name(circuit: &Circuit, name: &str, value: bool) -> Result<Fault> {
        circuit
            .find(name)
            .map(|site| Fault { site, value })
            .ok_or_else(|| Error::InvalidFaultSite(name.to_string()))
    }

    /// Get all possible faults in a circuit
    pub fn all(circuit: &Circuit) -> Vec<Fault> {
        let mut ret = Vec::new();
        for site in circuit.node_ids() {
            for value in [false, true] {
                ret.push(Fault { site, value });
            }
        }
        ret
    }

    /// Value of the fault site in the good circuit when the fault is activated
    pub fn good_value(&self) -> bool {
        !self.value
    }

    /// Value carried by the fault site once activated: `D` for stuck-at-0, `DPrime` for stuck-at-1
    pub fn effect(&self) -> LogicValue {
        LogicValue::fault_effect(self.value)
    }

    /// Human-readable description using the node names of the circuit
    pub fn describe(&self, circuit: &Circuit) -> String {
        format!(
            "{} stuck at {}",
            circuit.name(self.site),
            i32::from(self.value)
        )
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node {} stuck at {}", self.site, i32::from(self.value))
    }
}
