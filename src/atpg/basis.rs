use std::collections::VecDeque;

use crate::network::{Circuit, NodeId, NodeKind};

/// Structural analysis of a circuit, independent of the fault and of the assignment
///
/// Basis nodes are the primary inputs: the only nodes on which the search takes decisions.
/// The absolute dominators of a node are the nodes through which every path to a primary
/// output goes, starting with the node itself. The side inputs of the dominators of the fault
/// site are sensitized before any other propagation decision.
#[derive(Clone, Debug)]
pub struct Basis {
    basis_nodes: Vec<NodeId>,
    dominators: Vec<Vec<NodeId>>,
}

impl Basis {
    /// Analyze a circuit
    pub fn new(circuit: &Circuit) -> Basis {
        Basis {
            basis_nodes: circuit.inputs().to_vec(),
            dominators: dominators(circuit),
        }
    }

    /// Nodes on which decisions are taken, in definition order
    pub fn basis_nodes(&self) -> &[NodeId] {
        &self.basis_nodes
    }

    /// Absolute dominators of the node, from the node itself towards the outputs
    ///
    /// Empty if the node cannot reach any primary output.
    pub fn dominators(&self, n: NodeId) -> &[NodeId] {
        &self.dominators[n.index()]
    }

    /// Returns whether some primary output can be reached from the node
    pub fn reaches_output(&self, n: NodeId) -> bool {
        !self.dominators[n.index()].is_empty()
    }
}

/// Compute the absolute dominators of every node, in reverse topological order
///
/// A primary output dominates itself; any other node is dominated by itself and by the nodes
/// dominating all of its fan-outs that reach an output.
fn dominators(circuit: &Circuit) -> Vec<Vec<NodeId>> {
    let mut ret: Vec<Vec<NodeId>> = vec![Vec::new(); circuit.nb_nodes()];
    for &n in circuit.topo_order().iter().rev() {
        if circuit.kind(n) == NodeKind::PrimaryOutput {
            ret[n.index()] = vec![n];
            continue;
        }
        let mut common: Option<Vec<NodeId>> = None;
        for &s in circuit.fanout(n) {
            let dom = &ret[s.index()];
            if dom.is_empty() {
                continue;
            }
            common = Some(match common {
                None => dom.clone(),
                Some(c) => c.into_iter().filter(|d| dom.contains(d)).collect(),
            });
        }
        if let Some(mut c) = common {
            c.insert(0, n);
            ret[n.index()] = c;
        }
    }
    ret
}

/// Nodes reachable from the fault site, in breadth-first order starting from the site
pub fn fault_propagation_path(circuit: &Circuit, site: NodeId) -> Vec<NodeId> {
    let mut visited = vec![false; circuit.nb_nodes()];
    let mut queue = VecDeque::from([site]);
    visited[site.index()] = true;
    let mut ret = Vec::new();
    while let Some(n) = queue.pop_front() {
        ret.push(n);
        for &s in circuit.fanout(n) {
            if !visited[s.index()] {
                visited[s.index()] = true;
                queue.push_back(s);
            }
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::{fault_propagation_path, Basis};
    use crate::network::{CircuitDescription, GateKind, NodeKind};

    #[test]
    fn test_dominators() {
        // a feeds g and h, which reconverge at y; d goes nowhere
        let mut desc = CircuitDescription::new();
        desc.node("a", NodeKind::PrimaryInput)
            .node("b", NodeKind::PrimaryInput)
            .node("g", NodeKind::Gate(GateKind::And))
            .node("h", NodeKind::Gate(GateKind::Or))
            .node("y", NodeKind::Gate(GateKind::Xor))
            .node("d", NodeKind::Gate(GateKind::Not))
            .node("o", NodeKind::PrimaryOutput)
            .edge("a", "g")
            .edge("b", "g")
            .edge("a", "h")
            .edge("b", "h")
            .edge("g", "y")
            .edge("h", "y")
            .edge("a", "d")
            .edge("y", "o");
        let c = desc.build().unwrap();
        let id = |s: &str| c.find(s).unwrap();
        let basis = Basis::new(&c);

        assert_eq!(basis.basis_nodes(), &[id("a"), id("b")]);
        assert_eq!(basis.dominators(id("o")), &[id("o")]);
        assert_eq!(basis.dominators(id("g")), &[id("g"), id("y"), id("o")]);
        assert_eq!(basis.dominators(id("a")), &[id("a"), id("y"), id("o")]);
        assert!(basis.dominators(id("d")).is_empty());
        assert!(!basis.reaches_output(id("d")));
        assert!(basis.reaches_output(id("a")));

        let path = fault_propagation_path(&c, id("a"));
        assert_eq!(path, vec![id("a"), id("g"), id("h"), id("d"), id("y"), id("o")]);
    }
}
