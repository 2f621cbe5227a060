// SPDX-License-Identifier: MIT

//! Condition cell parser
//!
//! A cell is an operator prefix followed by the operand text, e.g. `>=18`,
//! `=adult`, `<0.5`. Nothing is trimmed before the prefix is matched.

use super::ast::{CompareOp, Condition};
use crate::engine::value::coerce;

/// Prefixes in match order. Two-character operators come before the
/// one-character operators they start with.
const OPERATORS: [(&str, CompareOp); 5] = [
    (">=", CompareOp::Gte),
    ("<=", CompareOp::Lte),
    ("=", CompareOp::Eq),
    (">", CompareOp::Gt),
    ("<", CompareOp::Lt),
];

/// Parse a condition cell. Returns `None` when no known operator prefixes it.
pub fn parse(input: &str) -> Option<Condition> {
    OPERATORS.iter().find_map(|(prefix, op)| {
        input.strip_prefix(prefix).map(|operand| Condition {
            op: *op,
            operand: coerce(operand),
        })
    })
}
