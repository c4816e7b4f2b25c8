use crate::logic::{evaluate, LogicValue};
use crate::network::{Circuit, NodeId, NodeKind};
use crate::sim::Fault;

use super::Assignment;

/// Nodes carrying a fault effect with at least one unknown fan-out, in node order
///
/// These are the nodes through which the fault effect may still be propagated further.
pub fn d_frontier(circuit: &Circuit, assignment: &Assignment) -> Vec<NodeId> {
    circuit
        .node_ids()
        .filter(|&n| {
            assignment[n].is_fault_effect()
                && circuit.fanout(n).iter().any(|s| assignment[*s].is_unknown())
        })
        .collect()
}

/// Gates holding a required Boolean value that their inputs do not imply yet, in node order
pub fn j_frontier(circuit: &Circuit, assignment: &Assignment, fault: Fault) -> Vec<NodeId> {
    circuit
        .node_ids()
        .filter(|&n| is_unjustified(circuit, assignment, fault, n))
        .collect()
}

/// Returns whether the value of the node is required but not implied by its inputs
///
/// Primary inputs are never unjustified: their value is a decision. The fault site holds its
/// fault effect, and is unjustified until its inputs produce its good value.
pub fn is_unjustified(circuit: &Circuit, assignment: &Assignment, fault: Fault, n: NodeId) -> bool {
    let kind = circuit.kind(n);
    let required = if n == fault.site {
        assignment[n].is_fault_effect()
    } else {
        assignment[n].is_boolean()
    };
    if kind == NodeKind::PrimaryInput || !required {
        return false;
    }
    let inputs = assignment.fanin_values(circuit, n);
    if inputs.contains(&LogicValue::Conflict) {
        return false;
    }
    evaluate(kind, &inputs).is_unknown()
}

#[cfg(test)]
mod tests {
    use super::{d_frontier, j_frontier};
    use crate::atpg::Assignment;
    use crate::logic::LogicValue::*;
    use crate::network::{CircuitDescription, GateKind, NodeKind};
    use crate::sim::Fault;

    #[test]
    fn test_frontiers() {
        let mut desc = CircuitDescription::new();
        desc.node("a", NodeKind::PrimaryInput)
            .node("b", NodeKind::PrimaryInput)
            .node("c", NodeKind::PrimaryInput)
            .node("g", NodeKind::Gate(GateKind::Or))
            .node("h", NodeKind::Gate(GateKind::And))
            .node("o", NodeKind::PrimaryOutput)
            .edge("a", "g")
            .edge("b", "g")
            .edge("g", "h")
            .edge("c", "h")
            .edge("h", "o");
        let c = desc.build().unwrap();
        let a = c.find("a").unwrap();
        let g = c.find("g").unwrap();
        let h = c.find("h").unwrap();
        let fault = Fault::new(a, false);

        let mut asg = Assignment::new(c.nb_nodes());
        assert!(d_frontier(&c, &asg).is_empty());
        assert!(j_frontier(&c, &asg, fault).is_empty());

        asg.set(a, D);
        assert_eq!(d_frontier(&c, &asg), vec![a]);
        asg.set(g, D);
        assert_eq!(d_frontier(&c, &asg), vec![g]);

        // h is required to be 1 while c is unknown
        asg.set(h, One);
        assert!(d_frontier(&c, &asg).is_empty());
        assert_eq!(j_frontier(&c, &asg, fault), vec![h]);
        asg.set(c.find("c").unwrap(), One);
        assert!(j_frontier(&c, &asg, fault).is_empty());
    }

    #[test]
    fn test_unjustified_site() {
        let mut desc = CircuitDescription::new();
        desc.node("a", NodeKind::PrimaryInput)
            .node("b", NodeKind::PrimaryInput)
            .node("g", NodeKind::Gate(GateKind::Nand))
            .node("o", NodeKind::PrimaryOutput)
            .edge("a", "g")
            .edge("b", "g")
            .edge("g", "o");
        let c = desc.build().unwrap();
        let a = c.find("a").unwrap();
        let g = c.find("g").unwrap();
        // Good value 1, produced by any input at 0
        let fault = Fault::new(g, false);

        let mut asg = Assignment::new(c.nb_nodes());
        assert!(j_frontier(&c, &asg, fault).is_empty());
        asg.set(g, D);
        assert_eq!(j_frontier(&c, &asg, fault), vec![g]);
        asg.set(a, Zero);
        assert!(j_frontier(&c, &asg, fault).is_empty());
    }
}
