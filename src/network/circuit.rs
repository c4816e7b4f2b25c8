use core::fmt;
use std::collections::VecDeque;

use fxhash::FxHashMap;

use crate::error::{Malformation, Result};
use crate::network::gates::NodeKind;

/// Index of a node in a [`Circuit`]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct NodeId(u32);

impl NodeId {
    /// Create an identifier from a node index
    pub fn new(i: usize) -> NodeId {
        NodeId(i as u32)
    }

    /// Obtain the index of the node
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A node of the circuit: its name and its kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    kind: NodeKind,
}

impl Node {
    /// Name of the node
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of the node
    pub fn kind(&self) -> NodeKind {
        self.kind
    }
}

/// Description of a circuit, as supplied by the caller
///
/// Nodes and edges are referenced by name. The order of the edges defines the order of the
/// inputs of each node. The description is checked and turned into a [`Circuit`] by
/// [`build`](CircuitDescription::build).
///
/// ```
/// # use dalgo::network::{CircuitDescription, GateKind, NodeKind};
/// let mut desc = CircuitDescription::new();
/// desc.node("a", NodeKind::PrimaryInput)
///     .node("b", NodeKind::PrimaryInput)
///     .node("x", NodeKind::Gate(GateKind::And))
///     .node("o", NodeKind::PrimaryOutput)
///     .edge("a", "x")
///     .edge("b", "x")
///     .edge("x", "o");
/// let circuit = desc.build().unwrap();
/// assert_eq!(circuit.nb_nodes(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CircuitDescription {
    nodes: Vec<(String, NodeKind)>,
    edges: Vec<(String, String)>,
}

impl CircuitDescription {
    /// Create an empty description
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node
    pub fn node(&mut self, name: &str, kind: NodeKind) -> &mut Self {
        self.nodes.push((name.to_string(), kind));
        self
    }

    /// Add a directed edge from the output of `source` to an input of `target`
    pub fn edge(&mut self, source: &str, target: &str) -> &mut Self {
        self.edges.push((source.to_string(), target.to_string()));
        self
    }

    /// Check the description and build the circuit
    pub fn build(&self) -> Result<Circuit> {
        let mut names = FxHashMap::default();
        let mut nodes = Vec::new();
        for (name, kind) in &self.nodes {
            let id = NodeId::new(nodes.len());
            if names.insert(name.clone(), id).is_some() {
                return Err(Malformation::DuplicateNode(name.clone()).into());
            }
            nodes.push(Node {
                name: name.clone(),
                kind: *kind,
            });
        }

        let mut fanin = vec![Vec::new(); nodes.len()];
        let mut fanout = vec![Vec::new(); nodes.len()];
        for (from, to) in &self.edges {
            let lookup = |n: &String| {
                names.get(n).copied().ok_or_else(|| Malformation::DanglingEdge {
                    from: from.clone(),
                    to: to.clone(),
                    missing: n.clone(),
                })
            };
            let s = lookup(from)?;
            let t = lookup(to)?;
            if nodes[s.index()].kind == NodeKind::PrimaryOutput {
                return Err(Malformation::DrivingOutput(from.clone()).into());
            }
            fanin[t.index()].push(s);
            fanout[s.index()].push(t);
        }

        for (i, n) in nodes.iter().enumerate() {
            if let Err(expected) = n.kind.check_arity(fanin[i].len()) {
                return Err(Malformation::BadArity {
                    name: n.name.clone(),
                    kind: n.kind.to_string(),
                    found: fanin[i].len(),
                    expected,
                }
                .into());
            }
        }

        let mut ret = Circuit {
            inputs: filter_kind(&nodes, NodeKind::PrimaryInput),
            outputs: filter_kind(&nodes, NodeKind::PrimaryOutput),
            nodes,
            fanin,
            fanout,
            topo_order: Vec::new(),
            names,
        };
        ret.topo_order = ret.compute_topo_order()?;
        ret.check();
        Ok(ret)
    }
}

fn filter_kind(nodes: &[Node], kind: NodeKind) -> Vec<NodeId> {
    nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.kind == kind)
        .map(|(i, _)| NodeId::new(i))
        .collect()
}

/// Representation of a combinatorial circuit as an immutable directed acyclic graph
///
/// Fan-in and fan-out lists are precomputed once, as well as a topological order.
/// The values carried by the nodes are not stored here: they live in an
/// [`Assignment`](crate::atpg::Assignment).
#[derive(Debug, Clone)]
pub struct Circuit {
    nodes: Vec<Node>,
    fanin: Vec<Vec<NodeId>>,
    fanout: Vec<Vec<NodeId>>,
    inputs: Vec<NodeId>,
    outputs: Vec<NodeId>,
    topo_order: Vec<NodeId>,
    names: FxHashMap<String, NodeId>,
}

impl Circuit {
    /// Return the number of nodes, including primary inputs and outputs
    pub fn nb_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of primary inputs
    pub fn nb_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Return the number of primary outputs
    pub fn nb_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Primary inputs, in definition order
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Primary outputs, in definition order
    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    /// Iterate over all node identifiers, in definition order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nb_nodes()).map(NodeId::new)
    }

    /// Get the node with the given identifier
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Kind of the given node
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    /// Name of the given node
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].name
    }

    /// Find a node by name
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Returns whether the identifier refers to a node of this circuit
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nb_nodes()
    }

    /// Nodes driving the given node, in input order
    pub fn fanin(&self, id: NodeId) -> &[NodeId] {
        &self.fanin[id.index()]
    }

    /// Nodes driven by the given node
    pub fn fanout(&self, id: NodeId) -> &[NodeId] {
        &self.fanout[id.index()]
    }

    /// Nodes in topological order: each node comes after all of its inputs
    pub fn topo_order(&self) -> &[NodeId] {
        &self.topo_order
    }

    /// Compute a topological order, breaking ties by definition order
    fn compute_topo_order(&self) -> Result<Vec<NodeId>> {
        let mut count_deps: Vec<usize> = self.fanin.iter().map(|v| v.len()).collect();
        let mut to_visit: VecDeque<NodeId> =
            self.node_ids().filter(|n| count_deps[n.index()] == 0).collect();
        let mut order = Vec::new();
        while let Some(n) = to_visit.pop_front() {
            order.push(n);
            for &s in self.fanout(n) {
                count_deps[s.index()] -= 1;
                if count_deps[s.index()] == 0 {
                    to_visit.push_back(s);
                }
            }
        }
        if order.len() != self.nb_nodes() {
            let stuck = self
                .node_ids()
                .find(|n| count_deps[n.index()] != 0)
                .map(|n| self.name(n).to_string())
                .unwrap_or_default();
            return Err(Malformation::CombinatorialLoop(stuck).into());
        }
        Ok(order)
    }

    /// Check consistency of the datastructure
    pub fn check(&self) {
        assert_eq!(self.fanin.len(), self.nb_nodes());
        assert_eq!(self.fanout.len(), self.nb_nodes());
        assert_eq!(self.topo_order.len(), self.nb_nodes());
        for n in self.node_ids() {
            for &s in self.fanin(n) {
                assert!(self.contains(s), "Invalid input {s} for node {n}");
                assert!(self.fanout(s).contains(&n));
            }
        }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Circuit with {} inputs, {} outputs:",
            self.nb_inputs(),
            self.nb_outputs()
        )?;
        for &n in self.topo_order() {
            if self.kind(n) == NodeKind::PrimaryInput {
                continue;
            }
            let deps = self
                .fanin(n)
                .iter()
                .map(|s| self.name(*s))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "\t{} = {}({})", self.name(n), self.kind(n), deps)?;
        }
        Ok(())
    }
}
