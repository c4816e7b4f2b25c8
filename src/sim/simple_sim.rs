use crate::network::{Circuit, GateKind, NodeId, NodeKind};

use super::Fault;

/// Structure for bit-parallel simulation based directly on the circuit representation
///
/// Each bit of a word is an independent pattern, so that 64 patterns are simulated at once.
#[derive(Clone)]
pub struct SimpleSimulator<'a> {
    circuit: &'a Circuit,
    node_values: Vec<u64>,
}

impl<'a> SimpleSimulator<'a> {
    pub fn from_circuit(circuit: &'a Circuit) -> SimpleSimulator<'a> {
        SimpleSimulator {
            circuit,
            node_values: vec![0; circuit.nb_nodes()],
        }
    }

    /// Simulate the good circuit; return the output values
    pub fn run(&mut self, input_values: &[u64]) -> Vec<u64> {
        self.copy_inputs(input_values);
        self.run_comb(None);
        self.get_output_values()
    }

    /// Simulate the circuit with a fault injected; return the output values
    pub fn run_with_fault(&mut self, input_values: &[u64], fault: Fault) -> Vec<u64> {
        self.copy_inputs(input_values);
        self.run_comb(Some(fault));
        self.get_output_values()
    }

    fn copy_inputs(&mut self, inputs: &[u64]) {
        assert_eq!(inputs.len(), self.circuit.nb_inputs());
        self.node_values.fill(0);
        for (n, v) in self.circuit.inputs().iter().zip(inputs) {
            self.node_values[n.index()] = *v;
        }
    }

    fn run_comb(&mut self, fault: Option<Fault>) {
        for &n in self.circuit.topo_order() {
            let val = match fault {
                Some(f) if f.site == n => {
                    if f.value {
                        !0
                    } else {
                        0
                    }
                }
                _ => self.run_node(n),
            };
            self.node_values[n.index()] = val;
        }
    }

    fn run_node(&self, n: NodeId) -> u64 {
        use GateKind::*;
        let deps = self.circuit.fanin(n);
        match self.circuit.kind(n) {
            NodeKind::PrimaryInput => self.node_values[n.index()],
            NodeKind::PrimaryOutput => self.get_value(deps[0]),
            NodeKind::Gate(k) => match k {
                And => self.compute_andn(deps, false, false),
                Or => self.compute_andn(deps, true, true),
                Nand => self.compute_andn(deps, false, true),
                Nor => self.compute_andn(deps, true, false),
                Xor => self.compute_xorn(deps, false),
                Xnor => self.compute_xorn(deps, true),
                Buf => self.get_value(deps[0]),
                Not => !self.get_value(deps[0]),
            },
        }
    }

    fn get_value(&self, n: NodeId) -> u64 {
        self.node_values[n.index()]
    }

    fn compute_andn(&self, v: &[NodeId], inv_in: bool, inv_out: bool) -> u64 {
        let mut ret = !0u64;
        for s in v {
            let val = self.get_value(*s);
            ret &= if inv_in { !val } else { val };
        }
        if inv_out {
            !ret
        } else {
            ret
        }
    }

    fn compute_xorn(&self, v: &[NodeId], inv_out: bool) -> u64 {
        let mut ret = 0u64;
        for s in v {
            ret ^= self.get_value(*s);
        }
        if inv_out {
            !ret
        } else {
            ret
        }
    }

    fn get_output_values(&self) -> Vec<u64> {
        self.circuit
            .outputs()
            .iter()
            .map(|o| self.get_value(*o))
            .collect()
    }
}
