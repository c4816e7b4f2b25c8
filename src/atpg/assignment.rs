use std::fmt;
use std::ops::Index;

use itertools::Itertools;

use crate::logic::LogicValue;
use crate::network::{Circuit, NodeId};

/// Value of every node of a circuit
///
/// All nodes start as `Unknown`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Assignment {
    values: Vec<LogicValue>,
}

impl Assignment {
    /// Create an assignment with all nodes unknown
    pub fn new(nb_nodes: usize) -> Assignment {
        Assignment {
            values: vec![LogicValue::Unknown; nb_nodes],
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether the assignment covers no node
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a node
    pub fn get(&self, n: NodeId) -> LogicValue {
        self.values[n.index()]
    }

    /// Set the value of a node
    pub fn set(&mut self, n: NodeId, value: LogicValue) {
        self.values[n.index()] = value;
    }

    /// Values of all nodes, by node index
    pub fn values(&self) -> &[LogicValue] {
        &self.values
    }

    /// Values of the inputs of a node, in input order
    pub fn fanin_values(&self, circuit: &Circuit, n: NodeId) -> Vec<LogicValue> {
        circuit.fanin(n).iter().map(|s| self.get(*s)).collect()
    }

    /// Returns whether some node holds a conflict
    pub fn has_conflict(&self) -> bool {
        self.values.contains(&LogicValue::Conflict)
    }

    /// Reset all nodes to unknown
    pub fn clear(&mut self) {
        self.values.fill(LogicValue::Unknown);
    }
}

impl Index<NodeId> for Assignment {
    type Output = LogicValue;

    fn index(&self, n: NodeId) -> &LogicValue {
        &self.values[n.index()]
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.values.iter().join(""))
    }
}
