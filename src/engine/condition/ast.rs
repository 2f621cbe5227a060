// SPDX-License-Identifier: MIT

//! Parsed form of a single table cell condition

use std::cmp::Ordering;

use crate::engine::value::Value;

/// A parsed condition: operator plus coerced operand
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub op: CompareOp,
    pub operand: Value,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// =
    Eq,
    /// >
    Gt,
    /// >=
    Gte,
    /// <
    Lt,
    /// <=
    Lte,
}

impl CompareOp {
    /// Whether `fact.compare(operand)` returning `ordering` satisfies the operator
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Gte => ordering != Ordering::Less,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.op, self.operand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_op_display() {
        assert_eq!(format!("{}", CompareOp::Eq), "=");
        assert_eq!(format!("{}", CompareOp::Gt), ">");
        assert_eq!(format!("{}", CompareOp::Gte), ">=");
        assert_eq!(format!("{}", CompareOp::Lt), "<");
        assert_eq!(format!("{}", CompareOp::Lte), "<=");
    }

    #[test]
    fn test_accepts() {
        assert!(CompareOp::Gte.accepts(Ordering::Equal));
        assert!(CompareOp::Gte.accepts(Ordering::Greater));
        assert!(!CompareOp::Gt.accepts(Ordering::Equal));
        assert!(CompareOp::Lte.accepts(Ordering::Less));
        assert!(!CompareOp::Lt.accepts(Ordering::Greater));
        assert!(CompareOp::Eq.accepts(Ordering::Equal));
    }

    #[test]
    fn test_condition_display() {
        let condition = Condition {
            op: CompareOp::Gte,
            operand: Value::Int(18),
        };
        assert_eq!(condition.to_string(), ">=18");
    }
}
