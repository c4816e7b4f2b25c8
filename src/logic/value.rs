use std::fmt;
use std::ops::Not;

/// Value carried by a node during test pattern generation
///
/// Besides the usual 0, 1 and unknown values, `D` and `DPrime` represent a difference between
/// the good and the faulty circuit. `Conflict` is never a legitimate circuit value: it marks a
/// node where two incompatible values were required.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum LogicValue {
    /// Logic 0 in both circuits
    Zero,
    /// Logic 1 in both circuits
    One,
    /// Not determined yet
    Unknown,
    /// 1 in the good circuit, 0 in the faulty circuit
    D,
    /// 0 in the good circuit, 1 in the faulty circuit
    DPrime,
    /// Incompatible requirements
    Conflict,
}

impl LogicValue {
    /// All values that may appear as gate inputs, excluding `Conflict`
    pub const DOMAIN: [LogicValue; 5] = [
        LogicValue::Zero,
        LogicValue::One,
        LogicValue::Unknown,
        LogicValue::D,
        LogicValue::DPrime,
    ];

    /// Returns whether the value carries a fault effect (`D` or `DPrime`)
    pub fn is_fault_effect(&self) -> bool {
        matches!(self, LogicValue::D | LogicValue::DPrime)
    }

    /// Returns whether the value is a plain Boolean value
    pub fn is_boolean(&self) -> bool {
        matches!(self, LogicValue::Zero | LogicValue::One)
    }

    /// Returns whether the value is `Unknown`
    pub fn is_unknown(&self) -> bool {
        *self == LogicValue::Unknown
    }

    /// Boolean value, if the value is 0 or 1
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            LogicValue::Zero => Some(false),
            LogicValue::One => Some(true),
            _ => None,
        }
    }

    /// Value in the good circuit, if known
    pub fn good(&self) -> Option<bool> {
        match self {
            LogicValue::Zero | LogicValue::DPrime => Some(false),
            LogicValue::One | LogicValue::D => Some(true),
            _ => None,
        }
    }

    /// Value in the faulty circuit, if known
    pub fn faulty(&self) -> Option<bool> {
        match self {
            LogicValue::Zero | LogicValue::D => Some(false),
            LogicValue::One | LogicValue::DPrime => Some(true),
            _ => None,
        }
    }

    /// Fault effect observed at a node stuck at the given value
    ///
    /// A node stuck at 0 carries `D` when activated, a node stuck at 1 carries `DPrime`.
    pub fn fault_effect(stuck_at: bool) -> LogicValue {
        if stuck_at {
            LogicValue::DPrime
        } else {
            LogicValue::D
        }
    }

    /// Combine an existing value with a newly implied one
    ///
    /// `Unknown` never overrides a known value; two different known values produce `Conflict`.
    pub fn merge(self, other: LogicValue) -> LogicValue {
        match (self, other) {
            (LogicValue::Unknown, v) | (v, LogicValue::Unknown) => v,
            (a, b) if a == b => a,
            _ => LogicValue::Conflict,
        }
    }
}

impl From<bool> for LogicValue {
    fn from(b: bool) -> LogicValue {
        if b {
            LogicValue::One
        } else {
            LogicValue::Zero
        }
    }
}

impl Not for LogicValue {
    type Output = LogicValue;

    fn not(self) -> LogicValue {
        use LogicValue::*;
        match self {
            Zero => One,
            One => Zero,
            D => DPrime,
            DPrime => D,
            Unknown => Unknown,
            Conflict => Conflict,
        }
    }
}

impl fmt::Display for LogicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogicValue::Zero => "0",
            LogicValue::One => "1",
            LogicValue::Unknown => "X",
            LogicValue::D => "D",
            LogicValue::DPrime => "D'",
            LogicValue::Conflict => "#",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::LogicValue::{self, *};

    #[test]
    fn test_not() {
        assert_eq!(!Zero, One);
        assert_eq!(!One, Zero);
        assert_eq!(!D, DPrime);
        assert_eq!(!DPrime, D);
        assert_eq!(!Unknown, Unknown);
        for v in LogicValue::DOMAIN {
            assert_eq!(!!v, v);
        }
    }

    #[test]
    fn test_components() {
        assert_eq!(D.good(), Some(true));
        assert_eq!(D.faulty(), Some(false));
        assert_eq!(DPrime.good(), Some(false));
        assert_eq!(DPrime.faulty(), Some(true));
        assert_eq!(Unknown.good(), None);
        assert_eq!(LogicValue::fault_effect(false), D);
        assert_eq!(LogicValue::fault_effect(true), DPrime);
    }

    #[test]
    fn test_merge() {
        assert_eq!(Unknown.merge(One), One);
        assert_eq!(Zero.merge(Unknown), Zero);
        assert_eq!(D.merge(D), D);
        assert_eq!(Zero.merge(One), Conflict);
        assert_eq!(D.merge(One), Conflict);
        assert_eq!(Conflict.merge(Unknown), Conflict);
        assert_eq!(Unknown.merge(Unknown), Unknown);
    }
}
