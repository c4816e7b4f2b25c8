use itertools::Itertools;
use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::logic::{non_controlling_value, required_input, sensitizing_value, LogicValue};
use crate::network::{Circuit, GateKind, NodeId, NodeKind};
use crate::sim::Fault;

use super::basis::{fault_propagation_path, Basis};
use super::frontier::{d_frontier, j_frontier};
use super::implication::{Implication, Implicator};
use super::Assignment;

/// Status reported after each operation of the search
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// The search may proceed
    Continuing,
    /// The last decision led to a conflict; the next step backtracks
    Conflict,
    /// A test pattern has been found
    Success,
    /// No test pattern exists for the fault
    Redundant,
}

/// Phase of the search
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing done yet
    Idle,
    /// The fault has been activated
    Sensitized,
    /// Decisions are being taken
    Searching,
    /// A test pattern has been found
    Success,
    /// The fault has been proven untestable
    Redundant,
    /// Remaining unknown inputs have been filled after success
    Cleanup,
}

/// Value chosen for a basis node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Decision {
    /// Node on which the decision is taken
    pub node: NodeId,
    /// Value given to the node
    pub value: bool,
    /// Whether this is the alternative value, tried after the first one failed
    pub flipped: bool,
}

/// Checkpoint of the search, saved before each decision
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchState {
    /// Assignment before the decision
    pub assignment: Assignment,
    /// D-frontier before the decision
    pub d_frontier: Vec<NodeId>,
    /// Decision taken from this state; `None` for the state right after activation
    pub decision: Option<Decision>,
}

/// D-algorithm test generation for a single stuck-at fault
///
/// The search can be driven one step at a time with [`sensitize`](Self::sensitize),
/// [`step`](Self::step) and [`cleanup`](Self::cleanup), which lets a caller observe every
/// intermediate assignment, or run to completion with [`run`](Self::run).
///
/// ```
/// # use dalgo::atpg::{DAlgorithm, Status};
/// # use dalgo::network::{CircuitDescription, GateKind, NodeKind};
/// # use dalgo::sim::Fault;
/// let mut desc = CircuitDescription::new();
/// desc.node("a", NodeKind::PrimaryInput)
///     .node("b", NodeKind::PrimaryInput)
///     .node("g", NodeKind::Gate(GateKind::Nand))
///     .node("o", NodeKind::PrimaryOutput)
///     .edge("a", "g")
///     .edge("b", "g")
///     .edge("g", "o");
/// let circuit = desc.build().unwrap();
/// let fault = Fault::by_name(&circuit, "g", true).unwrap();
/// let mut search = DAlgorithm::new(&circuit, fault).unwrap();
/// assert_eq!(search.run(), Status::Success);
/// assert_eq!(search.pattern_bits(), Some(vec![true, true]));
/// ```
pub struct DAlgorithm<'a> {
    circuit: &'a Circuit,
    fault: Fault,
    basis: Basis,
    /// Whether each node is reachable from the fault site
    on_propagation_path: Vec<bool>,
    implicator: Implicator<'a>,
    assignment: Assignment,
    d_frontier: Vec<NodeId>,
    stack: Vec<SearchState>,
    /// Alternative decision to apply at the next step, after a backtrack
    pending: Option<Decision>,
    phase: Phase,
}

impl<'a> DAlgorithm<'a> {
    /// Prepare the search for a fault; fails if the fault site is not in the circuit
    pub fn new(circuit: &'a Circuit, fault: Fault) -> Result<DAlgorithm<'a>> {
        if !circuit.contains(fault.site) {
            return Err(Error::InvalidFaultSite(fault.site.to_string()));
        }
        let mut on_propagation_path = vec![false; circuit.nb_nodes()];
        for n in fault_propagation_path(circuit, fault.site) {
            on_propagation_path[n.index()] = true;
        }
        Ok(DAlgorithm {
            circuit,
            fault,
            basis: Basis::new(circuit),
            on_propagation_path,
            implicator: Implicator::new(circuit, fault),
            assignment: Assignment::new(circuit.nb_nodes()),
            d_frontier: Vec::new(),
            stack: Vec::new(),
            pending: None,
            phase: Phase::Idle,
        })
    }

    /// Circuit being processed
    pub fn circuit(&self) -> &'a Circuit {
        self.circuit
    }

    /// Fault under test
    pub fn fault(&self) -> Fault {
        self.fault
    }

    /// Structural analysis of the circuit
    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Status corresponding to the current state
    pub fn status(&self) -> Status {
        match self.phase {
            Phase::Success | Phase::Cleanup => Status::Success,
            Phase::Redundant => Status::Redundant,
            Phase::Idle | Phase::Sensitized | Phase::Searching => {
                if self.detect_conflict() {
                    Status::Conflict
                } else {
                    Status::Continuing
                }
            }
        }
    }

    /// Current value of every node
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Current value of a node
    pub fn value(&self, n: NodeId) -> LogicValue {
        self.assignment[n]
    }

    /// Current D-frontier
    pub fn d_frontier(&self) -> &[NodeId] {
        &self.d_frontier
    }

    /// Gates whose required value is not justified yet
    pub fn j_frontier(&self) -> Vec<NodeId> {
        j_frontier(self.circuit, &self.assignment, self.fault)
    }

    /// Saved checkpoints, oldest first
    pub fn stack(&self) -> &[SearchState] {
        &self.stack
    }

    /// Number of saved checkpoints
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns whether some node holds a conflict
    pub fn detect_conflict(&self) -> bool {
        self.assignment.has_conflict()
    }

    /// Returns whether a fault effect has reached a primary output
    pub fn is_detected(&self) -> bool {
        self.circuit
            .outputs()
            .iter()
            .any(|o| self.assignment[*o].is_fault_effect())
    }

    fn is_complete(&self) -> bool {
        self.is_detected() && self.j_frontier().is_empty()
    }

    /// Values of the primary inputs, in definition order
    ///
    /// A primary input carrying the fault effect is given its good value. Inputs that the
    /// search left unassigned are `Unknown`.
    pub fn pattern(&self) -> Vec<LogicValue> {
        self.circuit
            .inputs()
            .iter()
            .map(|i| {
                let v = self.assignment[*i];
                if v.is_fault_effect() {
                    LogicValue::from(self.fault.good_value())
                } else {
                    v
                }
            })
            .collect()
    }

    /// Boolean values of the primary inputs, if none is left unknown
    pub fn pattern_bits(&self) -> Option<Vec<bool>> {
        self.pattern().iter().map(|v| v.to_bool()).collect()
    }

    /// Go back to the idle phase, forgetting all values and checkpoints
    pub fn reset(&mut self) {
        self.assignment.clear();
        self.d_frontier.clear();
        self.stack.clear();
        self.pending = None;
        self.phase = Phase::Idle;
    }

    /// Activate the fault and apply the resulting implications
    ///
    /// Returns `Redundant` if activation alone leads to a conflict. Does nothing outside of
    /// the idle phase.
    pub fn sensitize(&mut self) -> Status {
        if self.phase != Phase::Idle {
            warn!("Fault is already sensitized");
            return self.status();
        }
        debug!("Sensitizing {}", self.fault.describe(self.circuit));
        let res = self.implicator.propagate(&mut self.assignment, self.fault.site);
        self.d_frontier = d_frontier(self.circuit, &self.assignment);
        if let Implication::Conflict(n) = res {
            debug!("Activation conflicts at {}", self.circuit.name(n));
            self.phase = Phase::Redundant;
            return Status::Redundant;
        }
        self.stack.push(SearchState {
            assignment: self.assignment.clone(),
            d_frontier: self.d_frontier.clone(),
            decision: None,
        });
        self.phase = Phase::Sensitized;
        if self.is_complete() {
            self.phase = Phase::Success;
            return Status::Success;
        }
        Status::Continuing
    }

    /// Advance the search by one decision or one backtrack
    ///
    /// Once the search is over, returns the same status without changing anything.
    pub fn step(&mut self) -> Status {
        match self.phase {
            Phase::Idle => return self.sensitize(),
            Phase::Success | Phase::Cleanup => return Status::Success,
            Phase::Redundant => return Status::Redundant,
            Phase::Sensitized | Phase::Searching => {}
        }
        self.phase = Phase::Searching;

        if self.detect_conflict() {
            return self.backtrack();
        }
        if let Some(decision) = self.pending.take() {
            return self.decide(decision);
        }
        if self.is_complete() {
            self.phase = Phase::Success;
            return Status::Success;
        }
        let propagation = self.propagation_objective();
        if !self.is_detected() && propagation.is_none() {
            debug!("Fault effect is blocked");
            return self.backtrack();
        }
        let objective = self
            .justification_objective()
            .or_else(|| self.dominator_objective())
            .or(propagation);
        let Some(objective) = objective else {
            return self.backtrack();
        };
        match self.backtrace(objective) {
            Some((node, value)) => self.decide(Decision {
                node,
                value,
                flipped: false,
            }),
            None => self.backtrack(),
        }
    }

    /// Fill the primary inputs left unknown after success, where the choice is unambiguous
    ///
    /// Each such input takes the sensitizing value of its fan-out gates if they agree, or the
    /// value required by the first fan-out on the fault propagation path otherwise. A value
    /// that would cause a conflict is reverted.
    pub fn cleanup(&mut self) -> Status {
        if self.phase != Phase::Success {
            warn!("Cleanup requires a successful search");
            return self.status();
        }
        for &i in self.basis.basis_nodes() {
            if !self.assignment[i].is_unknown() {
                continue;
            }
            let Some(value) = self.cleanup_value(i) else {
                continue;
            };
            let saved = self.assignment.clone();
            self.assignment.set(i, LogicValue::from(value));
            if let Implication::Conflict(n) = self.implicator.propagate(&mut self.assignment, i) {
                debug!(
                    "Filling {} conflicts at {}; left unknown",
                    self.circuit.name(i),
                    self.circuit.name(n)
                );
                self.assignment = saved;
            }
        }
        self.d_frontier = d_frontier(self.circuit, &self.assignment);
        self.phase = Phase::Cleanup;
        Status::Success
    }

    /// Run the whole search: sensitize, step until a final status, then cleanup
    pub fn run(&mut self) -> Status {
        let mut status = match self.phase {
            Phase::Idle => self.sensitize(),
            _ => self.status(),
        };
        while matches!(status, Status::Continuing | Status::Conflict) {
            status = self.step();
        }
        if self.phase == Phase::Success {
            self.cleanup();
        }
        match status {
            Status::Success => info!(
                "Found pattern for {} after {} decisions",
                self.fault.describe(self.circuit),
                self.stack.len().saturating_sub(1)
            ),
            _ => info!("{} is redundant", self.fault.describe(self.circuit)),
        }
        status
    }

    /// Save a checkpoint, apply the decision and its implications
    fn decide(&mut self, decision: Decision) -> Status {
        debug!(
            "Decision {} = {}{}",
            self.circuit.name(decision.node),
            i32::from(decision.value),
            if decision.flipped { " (alternative)" } else { "" }
        );
        self.stack.push(SearchState {
            assignment: self.assignment.clone(),
            d_frontier: self.d_frontier.clone(),
            decision: Some(decision),
        });
        self.assignment
            .set(decision.node, LogicValue::from(decision.value));
        let res = self.implicator.propagate(&mut self.assignment, decision.node);
        self.d_frontier = d_frontier(self.circuit, &self.assignment);
        if let Implication::Conflict(n) = res {
            debug!("Conflict at {}", self.circuit.name(n));
            return Status::Conflict;
        }
        if self.is_complete() {
            self.phase = Phase::Success;
            return Status::Success;
        }
        Status::Continuing
    }

    /// Restore the last checkpoint whose decision has an untried alternative
    fn backtrack(&mut self) -> Status {
        while let Some(state) = self.stack.pop() {
            self.assignment = state.assignment;
            self.d_frontier = state.d_frontier;
            if let Some(d) = state.decision {
                if !d.flipped {
                    debug!("Backtracking on {}", self.circuit.name(d.node));
                    self.pending = Some(Decision {
                        node: d.node,
                        value: !d.value,
                        flipped: true,
                    });
                    return Status::Continuing;
                }
            }
        }
        debug!("No alternative left");
        self.phase = Phase::Redundant;
        Status::Redundant
    }

    /// First unjustified gate, with the value it must take
    ///
    /// The fault site must take its good value.
    fn justification_objective(&self) -> Option<(NodeId, bool)> {
        self.j_frontier().into_iter().find_map(|n| {
            if n == self.fault.site {
                Some((n, self.fault.good_value()))
            } else {
                Some((n, self.assignment[n].to_bool()?))
            }
        })
    }

    /// Unknown side input of a dominator of the fault site
    ///
    /// Every path from the fault site to an output goes through its dominators, so their inputs
    /// that the fault effect cannot reach must all hold the non-controlling value.
    fn dominator_objective(&self) -> Option<(NodeId, bool)> {
        for &d in self.basis.dominators(self.fault.site).iter().skip(1) {
            let Some(value) = self
                .circuit
                .kind(d)
                .gate()
                .and_then(non_controlling_value)
                .and_then(|v| v.to_bool())
            else {
                continue;
            };
            let side = self.circuit.fanin(d).iter().find(|i| {
                !self.on_propagation_path[i.index()] && self.assignment[**i].is_unknown()
            });
            if let Some(&side) = side {
                return Some((side, value));
            }
        }
        None
    }

    /// Sensitize a side input of the first D-frontier gate whose output may still reach an
    /// output
    fn propagation_objective(&self) -> Option<(NodeId, bool)> {
        for &n in &self.d_frontier {
            for &t in self.circuit.fanout(n) {
                if !self.assignment[t].is_unknown() || !self.basis.reaches_output(t) {
                    continue;
                }
                let Some(value) = self
                    .circuit
                    .kind(t)
                    .gate()
                    .and_then(sensitizing_value)
                    .and_then(|v| v.to_bool())
                else {
                    continue;
                };
                let side = self
                    .circuit
                    .fanin(t)
                    .iter()
                    .find(|i| self.assignment[**i].is_unknown());
                if let Some(&side) = side {
                    return Some((side, value));
                }
            }
        }
        None
    }

    /// Follow unknown inputs back from an objective to an unassigned basis node
    fn backtrace(&self, objective: (NodeId, bool)) -> Option<(NodeId, bool)> {
        let (mut node, mut value) = objective;
        loop {
            let kind = match self.circuit.kind(node) {
                NodeKind::PrimaryInput => {
                    return self.assignment[node].is_unknown().then_some((node, value));
                }
                NodeKind::PrimaryOutput => GateKind::Buf,
                NodeKind::Gate(k) => k,
            };
            let inputs = self.circuit.fanin(node);
            let next = *inputs
                .iter()
                .find(|i| self.assignment[**i].is_unknown())?;
            let parity = inputs
                .iter()
                .filter_map(|i| self.assignment[*i].to_bool())
                .fold(false, |a, b| a ^ b);
            value = required_input(kind, value, parity);
            node = next;
        }
    }

    /// Value to give an unknown basis node during cleanup, if any
    fn cleanup_value(&self, n: NodeId) -> Option<bool> {
        let required: Vec<(bool, bool)> = self
            .circuit
            .fanout(n)
            .iter()
            .filter_map(|&g| {
                let v = self.circuit.kind(g).gate().and_then(sensitizing_value)?;
                Some((v.to_bool()?, self.on_propagation_path[g.index()]))
            })
            .collect();
        match required.iter().map(|r| r.0).all_equal_value() {
            Ok(v) => Some(v),
            Err(None) => None,
            Err(Some(_)) => required.iter().find(|r| r.1).map(|r| r.0),
        }
    }
}
