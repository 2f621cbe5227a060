// SPDX-License-Identifier: MIT

//! Condition evaluation against a single fact value

use super::ast::{CompareOp, Condition};
use super::parser::parse;
use crate::engine::value::Value;

/// Result of checking one condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOutcome {
    Matched,
    NotMatched,
    /// The cell has no known operator prefix
    Unrecognized,
    /// Fact and operand kinds can't be ordered against each other
    Incomparable,
    /// The fact store has no value for the input
    MissingFact,
}

impl ConditionOutcome {
    pub fn is_match(self) -> bool {
        self == ConditionOutcome::Matched
    }

    fn from_bool(matched: bool) -> Self {
        if matched {
            ConditionOutcome::Matched
        } else {
            ConditionOutcome::NotMatched
        }
    }
}

/// Evaluate a parsed condition against a fact value
pub fn evaluate(condition: &Condition, fact: &Value) -> ConditionOutcome {
    if condition.op == CompareOp::Eq {
        return ConditionOutcome::from_bool(fact.loose_eq(&condition.operand));
    }

    match fact.compare(&condition.operand) {
        Some(ordering) => ConditionOutcome::from_bool(condition.op.accepts(ordering)),
        None => ConditionOutcome::Incomparable,
    }
}

/// Parse and evaluate a raw condition cell against an optional fact
pub fn evaluate_cell(cell: &str, fact: Option<&Value>) -> ConditionOutcome {
    let Some(condition) = parse(cell) else {
        return ConditionOutcome::Unrecognized;
    };
    match fact {
        Some(value) => evaluate(&condition, value),
        None => ConditionOutcome::MissingFact,
    }
}
