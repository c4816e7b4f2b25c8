use std::collections::VecDeque;

use log::trace;

use crate::logic::{evaluate, LogicValue};
use crate::network::{Circuit, NodeId};
use crate::sim::Fault;

use super::activation::{activate, Activation};
use super::Assignment;

/// Result of an implication run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Implication {
    /// All consequences have been applied without conflict
    Stable,
    /// The node received incompatible values; it now holds `Conflict`
    Conflict(NodeId),
}

/// Structure for implication that only touches the nodes whose inputs were modified
///
/// Nodes are processed in first-in first-out order, and a node is queued at most once at a
/// time. Values are only ever refined: an unknown value never overwrites a known one.
pub struct Implicator<'a> {
    /// Circuit being processed
    circuit: &'a Circuit,
    /// Fault under test
    fault: Fault,
    /// Queue of nodes to update
    update_queue: VecDeque<NodeId>,
    /// Whether each node is in the queue
    is_queued: Vec<bool>,
}

impl<'a> Implicator<'a> {
    /// Build an implication engine for a circuit and fault
    pub fn new(circuit: &'a Circuit, fault: Fault) -> Implicator<'a> {
        Implicator {
            circuit,
            fault,
            update_queue: VecDeque::new(),
            is_queued: vec![false; circuit.nb_nodes()],
        }
    }

    fn reset(&mut self) {
        for n in self.update_queue.drain(..) {
            self.is_queued[n.index()] = false;
        }
    }

    fn schedule(&mut self, n: NodeId) {
        if !self.is_queued[n.index()] {
            self.is_queued[n.index()] = true;
            self.update_queue.push_back(n);
        }
    }

    fn schedule_fanout(&mut self, n: NodeId) {
        let circuit = self.circuit;
        for &s in circuit.fanout(n) {
            self.schedule(s);
        }
    }

    /// Apply all consequences of a new value at `seed`
    ///
    /// Processing the fault site applies the activation rule, which may assign its inputs;
    /// every other gate is evaluated from its inputs and merged with its current value.
    /// Stops at the first conflict.
    pub fn propagate(&mut self, assignment: &mut Assignment, seed: NodeId) -> Implication {
        self.reset();
        if seed == self.fault.site {
            self.schedule(seed);
        } else {
            self.schedule_fanout(seed);
        }
        while let Some(n) = self.update_queue.pop_front() {
            self.is_queued[n.index()] = false;
            if n == self.fault.site {
                match activate(self.circuit, self.fault, assignment) {
                    Activation::Conflict(c) => return self.conflict(c),
                    Activation::Applied(changed) => {
                        for i in changed {
                            trace!("Required {} = {}", self.circuit.name(i), assignment[i]);
                            self.schedule_fanout(i);
                        }
                    }
                }
                self.schedule_fanout(n);
                continue;
            }
            let old = assignment[n];
            let implied = evaluate(self.circuit.kind(n), &assignment.fanin_values(self.circuit, n));
            let new = old.merge(implied);
            if new == old {
                continue;
            }
            assignment.set(n, new);
            if new == LogicValue::Conflict {
                return self.conflict(n);
            }
            trace!("Implied {} = {}", self.circuit.name(n), new);
            self.schedule_fanout(n);
        }
        Implication::Stable
    }

    fn conflict(&mut self, n: NodeId) -> Implication {
        trace!("Conflict at {}", self.circuit.name(n));
        self.reset();
        Implication::Conflict(n)
    }
}

#[cfg(test)]
mod tests {
    use super::{Implication, Implicator};
    use crate::atpg::Assignment;
    use crate::logic::LogicValue::*;
    use crate::network::{Circuit, CircuitDescription, GateKind, NodeKind};
    use crate::sim::Fault;

    /// y = (a & b) | c, with a buffer on c
    fn small_circuit() -> Circuit {
        let mut desc = CircuitDescription::new();
        desc.node("a", NodeKind::PrimaryInput)
            .node("b", NodeKind::PrimaryInput)
            .node("c", NodeKind::PrimaryInput)
            .node("g", NodeKind::Gate(GateKind::And))
            .node("h", NodeKind::Gate(GateKind::Buf))
            .node("y", NodeKind::Gate(GateKind::Or))
            .node("o", NodeKind::PrimaryOutput)
            .edge("a", "g")
            .edge("b", "g")
            .edge("c", "h")
            .edge("g", "y")
            .edge("h", "y")
            .edge("y", "o");
        desc.build().unwrap()
    }

    #[test]
    fn test_forward() {
        let c = small_circuit();
        let fault = Fault::by_name(&c, "g", false).unwrap();
        let mut imp = Implicator::new(&c, fault);
        let mut asg = Assignment::new(c.nb_nodes());

        let g = c.find("g").unwrap();
        assert_eq!(imp.propagate(&mut asg, g), Implication::Stable);
        assert_eq!(asg.values(), &[One, One, Unknown, D, Unknown, Unknown, Unknown]);

        let cc = c.find("c").unwrap();
        asg.set(cc, Zero);
        assert_eq!(imp.propagate(&mut asg, cc), Implication::Stable);
        assert_eq!(asg.values(), &[One, One, Zero, D, Zero, D, D]);
    }

    #[test]
    fn test_required_value() {
        let c = small_circuit();
        let fault = Fault::by_name(&c, "g", false).unwrap();
        let mut imp = Implicator::new(&c, fault);
        let mut asg = Assignment::new(c.nb_nodes());

        // A known value is not overwritten by an unknown evaluation
        let h = c.find("h").unwrap();
        asg.set(h, One);
        assert_eq!(imp.propagate(&mut asg, h), Implication::Stable);
        assert_eq!(asg[c.find("y").unwrap()], One);
        assert_eq!(asg[c.find("c").unwrap()], Unknown);

        // Setting c to 0 contradicts the value required at h
        let cc = c.find("c").unwrap();
        asg.set(cc, Zero);
        assert_eq!(imp.propagate(&mut asg, cc), Implication::Conflict(h));
        assert_eq!(asg[h], Conflict);
        assert!(asg.has_conflict());
    }

    #[test]
    fn test_activation_conflict() {
        let c = small_circuit();
        let fault = Fault::by_name(&c, "g", true).unwrap();
        let mut imp = Implicator::new(&c, fault);
        let mut asg = Assignment::new(c.nb_nodes());
        let a = c.find("a").unwrap();
        let b = c.find("b").unwrap();
        asg.set(a, One);
        asg.set(b, One);
        let g = c.find("g").unwrap();
        assert!(matches!(imp.propagate(&mut asg, g), Implication::Conflict(_)));
    }
}
