use crate::logic::LogicValue::{self, *};
use crate::network::{GateKind, NodeKind};

fn and2(a: LogicValue, b: LogicValue) -> LogicValue {
    match (a, b) {
        (Zero, _) | (_, Zero) => Zero,
        (One, v) | (v, One) => v,
        (Unknown, _) | (_, Unknown) => Unknown,
        (D, D) => D,
        (DPrime, DPrime) => DPrime,
        (D, DPrime) | (DPrime, D) => Zero,
        (Conflict, _) | (_, Conflict) => Conflict,
    }
}

fn or2(a: LogicValue, b: LogicValue) -> LogicValue {
    match (a, b) {
        (One, _) | (_, One) => One,
        (Zero, v) | (v, Zero) => v,
        (Unknown, _) | (_, Unknown) => Unknown,
        (D, D) => D,
        (DPrime, DPrime) => DPrime,
        (D, DPrime) | (DPrime, D) => One,
        (Conflict, _) | (_, Conflict) => Conflict,
    }
}

fn xor2(a: LogicValue, b: LogicValue) -> LogicValue {
    match (a, b) {
        (Conflict, _) | (_, Conflict) => Conflict,
        (Unknown, _) | (_, Unknown) => Unknown,
        (Zero, v) | (v, Zero) => v,
        (One, v) | (v, One) => !v,
        (D, D) | (DPrime, DPrime) => Zero,
        (D, DPrime) | (DPrime, D) => One,
    }
}

/// Evaluate a gate on five-valued inputs
///
/// Multi-input gates are evaluated by folding their inputs pairwise. Inverting gates are
/// computed as the negation of their base function.
pub fn evaluate_gate(kind: GateKind, inputs: &[LogicValue]) -> LogicValue {
    debug_assert!(
        !inputs.contains(&Conflict),
        "Conflicting values cannot be evaluated"
    );
    use GateKind::*;
    match kind {
        And => inputs.iter().fold(One, |acc, v| and2(acc, *v)),
        Or => inputs.iter().fold(Zero, |acc, v| or2(acc, *v)),
        Xor => inputs.iter().fold(Zero, |acc, v| xor2(acc, *v)),
        Nand => !evaluate_gate(And, inputs),
        Nor => !evaluate_gate(Or, inputs),
        Xnor => !evaluate_gate(Xor, inputs),
        Buf => single_input(inputs),
        Not => !single_input(inputs),
    }
}

fn single_input(inputs: &[LogicValue]) -> LogicValue {
    debug_assert_eq!(inputs.len(), 1);
    inputs.first().copied().unwrap_or(Unknown)
}

/// Evaluate a node from the values of its inputs
///
/// Primary outputs pass their single input through. Primary inputs are not determined by
/// any other node, and evaluate to `Unknown`.
pub fn evaluate(kind: NodeKind, inputs: &[LogicValue]) -> LogicValue {
    match kind {
        NodeKind::PrimaryInput => Unknown,
        NodeKind::PrimaryOutput => single_input(inputs),
        NodeKind::Gate(k) => evaluate_gate(k, inputs),
    }
}

/// Input value that alone determines the output of the gate
///
/// Parity gates and single-input gates have no controlling value.
pub fn controlling_value(kind: GateKind) -> Option<LogicValue> {
    use GateKind::*;
    match kind {
        And | Nand => Some(Zero),
        Or | Nor => Some(One),
        Xor | Xnor | Not | Buf => None,
    }
}

/// Input value that lets the other inputs determine the output of the gate
///
/// Parity gates and single-input gates have no non-controlling value.
pub fn non_controlling_value(kind: GateKind) -> Option<LogicValue> {
    controlling_value(kind).map(|v| !v)
}

/// Value to place on the side inputs of a gate to propagate a fault effect through it
///
/// This is the non-controlling value when there is one. Any Boolean value works for parity
/// gates; 0 is used. Single-input gates have no side input.
pub fn sensitizing_value(kind: GateKind) -> Option<LogicValue> {
    if kind.is_xor_like() {
        Some(Zero)
    } else {
        non_controlling_value(kind)
    }
}

/// Output of the gate when one of its inputs holds the controlling value
pub fn controlled_output(kind: GateKind) -> Option<LogicValue> {
    let c = controlling_value(kind)?;
    Some(if kind.is_inverting() { !c } else { c })
}

/// Value required on an input of the gate to move its output towards `target`
///
/// For gates with a controlling value, a single controlling input suffices when the target is
/// the controlled output; otherwise every input must be non-controlling. For parity gates,
/// `known_parity` is the Xor of the inputs that are already assigned.
pub fn required_input(kind: GateKind, target: bool, known_parity: bool) -> bool {
    use GateKind::*;
    match kind {
        Buf => target,
        Not => !target,
        Xor => target ^ known_parity,
        Xnor => !target ^ known_parity,
        And | Or | Nand | Nor => {
            let c = controlling_value(kind) == Some(One);
            let controlled = c ^ kind.is_inverting();
            if target == controlled {
                c
            } else {
                !c
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::GateKind;

    fn eval2(kind: GateKind, a: LogicValue, b: LogicValue) -> LogicValue {
        evaluate_gate(kind, &[a, b])
    }

    #[test]
    fn test_symmetry() {
        for kind in [GateKind::And, GateKind::Or, GateKind::Xor] {
            for a in LogicValue::DOMAIN {
                for b in LogicValue::DOMAIN {
                    assert_eq!(eval2(kind, a, b), eval2(kind, b, a), "{kind} {a} {b}");
                }
            }
        }
    }

    #[test]
    fn test_domination() {
        for v in LogicValue::DOMAIN {
            assert_eq!(eval2(GateKind::And, Zero, v), Zero);
            assert_eq!(eval2(GateKind::Or, One, v), One);
            assert_eq!(eval2(GateKind::Nand, Zero, v), One);
            assert_eq!(eval2(GateKind::Nor, One, v), Zero);
        }
    }

    #[test]
    fn test_fault_algebra() {
        assert_eq!(eval2(GateKind::And, D, DPrime), Zero);
        assert_eq!(eval2(GateKind::Or, D, DPrime), One);
        assert_eq!(eval2(GateKind::Xor, D, DPrime), One);
        assert_eq!(eval2(GateKind::Xor, D, D), Zero);
        assert_eq!(eval2(GateKind::And, One, D), D);
        assert_eq!(eval2(GateKind::And, One, DPrime), DPrime);
        assert_eq!(eval2(GateKind::And, One, One), One);
        assert_eq!(eval2(GateKind::And, Unknown, D), Unknown);
        assert_eq!(eval2(GateKind::Or, Zero, D), D);
        assert_eq!(eval2(GateKind::Or, Unknown, Zero), Unknown);
    }

    #[test]
    fn test_xor() {
        for v in [Zero, One, D, DPrime] {
            assert_eq!(eval2(GateKind::Xor, Zero, v), v);
            assert_eq!(eval2(GateKind::Xor, One, v), !v);
            assert_eq!(eval2(GateKind::Xor, Unknown, v), Unknown);
        }
    }

    #[test]
    fn test_inversion_consistency() {
        for a in LogicValue::DOMAIN {
            for b in LogicValue::DOMAIN {
                assert_eq!(eval2(GateKind::Nand, a, b), !eval2(GateKind::And, a, b));
                assert_eq!(eval2(GateKind::Nor, a, b), !eval2(GateKind::Or, a, b));
                assert_eq!(eval2(GateKind::Xnor, a, b), !eval2(GateKind::Xor, a, b));
            }
        }
    }

    #[test]
    fn test_unary() {
        assert_eq!(evaluate_gate(GateKind::Not, &[Zero]), One);
        assert_eq!(evaluate_gate(GateKind::Not, &[D]), DPrime);
        assert_eq!(evaluate_gate(GateKind::Not, &[Unknown]), Unknown);
        assert_eq!(evaluate_gate(GateKind::Buf, &[DPrime]), DPrime);
        assert_eq!(evaluate(NodeKind::PrimaryOutput, &[D]), D);
        assert_eq!(evaluate(NodeKind::PrimaryInput, &[]), Unknown);
    }

    #[test]
    fn test_nary() {
        let and3 = |a, b, c| evaluate_gate(GateKind::And, &[a, b, c]);
        assert_eq!(and3(One, One, One), One);
        assert_eq!(and3(One, Unknown, Zero), Zero);
        assert_eq!(and3(One, D, One), D);
        let xor3 = |a, b, c| evaluate_gate(GateKind::Xor, &[a, b, c]);
        assert_eq!(xor3(One, One, One), One);
        assert_eq!(xor3(One, D, Zero), DPrime);
    }

    #[test]
    fn test_controlling() {
        assert_eq!(controlling_value(GateKind::And), Some(Zero));
        assert_eq!(controlling_value(GateKind::Nand), Some(Zero));
        assert_eq!(controlling_value(GateKind::Or), Some(One));
        assert_eq!(controlling_value(GateKind::Nor), Some(One));
        assert_eq!(controlling_value(GateKind::Xor), None);
        assert_eq!(controlling_value(GateKind::Not), None);
        assert_eq!(non_controlling_value(GateKind::And), Some(One));
        assert_eq!(non_controlling_value(GateKind::Nor), Some(Zero));
        assert_eq!(non_controlling_value(GateKind::Xnor), None);
        assert_eq!(sensitizing_value(GateKind::Xor), Some(Zero));
        assert_eq!(sensitizing_value(GateKind::Not), None);
        assert_eq!(controlled_output(GateKind::Nand), Some(One));
        assert_eq!(controlled_output(GateKind::Nor), Some(Zero));
    }

    #[test]
    fn test_required_input() {
        // Every required input value must be able to produce the target output
        for kind in GateKind::ALL {
            for target in [false, true] {
                let v = required_input(kind, target, false);
                let nb = if kind.is_unary() { 1 } else { 2 };
                let others = if kind.is_xor_like() {
                    Zero
                } else {
                    LogicValue::from(v)
                };
                let mut inputs = vec![others; nb];
                inputs[0] = LogicValue::from(v);
                assert_eq!(
                    evaluate_gate(kind, &inputs),
                    LogicValue::from(target),
                    "{kind} {target}"
                );
            }
        }
        assert!(!required_input(GateKind::And, false, false));
        assert!(required_input(GateKind::And, true, false));
        assert!(required_input(GateKind::Nor, false, false));
        assert!(required_input(GateKind::Xor, true, false));
        assert!(!required_input(GateKind::Xor, true, true));
    }
}
