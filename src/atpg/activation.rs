//! Fault activation: assert the fault effect and require the values that justify it

use crate::logic::{controlled_output, controlling_value, LogicValue};
use crate::network::{Circuit, GateKind, NodeId, NodeKind};
use crate::sim::Fault;

use super::Assignment;

/// Outcome of applying the activation rule at the fault site
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Activation {
    /// The rule was applied; lists the inputs of the fault site whose value changed
    Applied(Vec<NodeId>),
    /// A node received two incompatible requirements
    Conflict(NodeId),
}

/// Set the fault site to its fault effect and require the inputs that produce its good value
///
/// The value of the fault site is asserted, never evaluated from its inputs.
/// Only implied input values are assigned; an input already holding an incompatible value is
/// marked as `Conflict` in the assignment.
///
/// The input requirements depend on the gate:
///   * when the good value is the controlled output, a single controlling input is enough: it
///     is assigned only when it is the last input able to take the controlling value, and
///     there is a conflict if no input can take it;
///   * otherwise every input must hold the non-controlling value;
///   * Not, Buf and primary outputs copy the good value to their single input, inverted for Not;
///   * for Xor and Xnor, the last unknown input is assigned to fix the parity.
///
/// A site whose inputs do not produce the good value yet is left to justification.
pub fn activate(circuit: &Circuit, fault: Fault, assignment: &mut Assignment) -> Activation {
    let site = fault.site;
    let v = assignment[site].merge(fault.effect());
    assignment.set(site, v);
    if v == LogicValue::Conflict {
        return Activation::Conflict(site);
    }

    let mut req = Requirements {
        assignment,
        changed: Vec::new(),
    };
    let good = fault.good_value();
    let inputs = circuit.fanin(site);
    let res = match circuit.kind(site) {
        NodeKind::PrimaryInput => Ok(()),
        NodeKind::PrimaryOutput | NodeKind::Gate(GateKind::Buf) => req.require(inputs[0], good),
        NodeKind::Gate(GateKind::Not) => req.require(inputs[0], !good),
        NodeKind::Gate(k) if k.is_xor_like() => req.require_parity(inputs, good ^ k.is_inverting()),
        NodeKind::Gate(k) => req.require_and_like(inputs, k, good),
    };
    match res {
        Ok(()) => Activation::Applied(req.changed),
        Err(n) => {
            req.assignment.set(n, LogicValue::Conflict);
            Activation::Conflict(n)
        }
    }
}

/// Accumulate input requirements, keeping track of the nodes that changed
struct Requirements<'a> {
    assignment: &'a mut Assignment,
    changed: Vec<NodeId>,
}

impl<'a> Requirements<'a> {
    /// Require a Boolean value at a node; fails with the node on conflict
    fn require(&mut self, n: NodeId, value: bool) -> Result<(), NodeId> {
        let old = self.assignment[n];
        let new = old.merge(LogicValue::from(value));
        if new == LogicValue::Conflict {
            return Err(n);
        }
        if new != old {
            self.assignment.set(n, new);
            self.changed.push(n);
        }
        Ok(())
    }

    fn require_and_like(&mut self, inputs: &[NodeId], kind: GateKind, good: bool) -> Result<(), NodeId> {
        let c = controlling_value(kind) == Some(LogicValue::One);
        if controlled_output(kind) == Some(LogicValue::from(good)) {
            if inputs.iter().any(|i| self.assignment[*i].to_bool() == Some(c)) {
                return Ok(());
            }
            let free: Vec<NodeId> = inputs
                .iter()
                .copied()
                .filter(|i| self.assignment[*i].is_unknown())
                .collect();
            match free.as_slice() {
                [] => return Err(inputs[0]),
                [i] => self.require(*i, c)?,
                _ => {}
            }
        } else {
            for &i in inputs {
                self.require(i, !c)?;
            }
        }
        Ok(())
    }

    fn require_parity(&mut self, inputs: &[NodeId], target: bool) -> Result<(), NodeId> {
        let mut parity = false;
        let mut unknown = Vec::new();
        for &i in inputs {
            let v = self.assignment[i];
            if v.is_unknown() {
                unknown.push(i);
            } else {
                parity ^= v.to_bool().ok_or(i)?;
            }
        }
        match unknown.as_slice() {
            [] if parity != target => Err(inputs[0]),
            [last] => self.require(*last, target ^ parity),
            _ => Ok(()),
        }
    }
}
