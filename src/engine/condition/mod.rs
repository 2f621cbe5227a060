// SPDX-License-Identifier: MIT

//! Condition cells for decision tables
//!
//! Each input cell of a rule row is a condition such as:
//! - `>=18`
//! - `=adult`
//! - `<0.5`

mod ast;
mod evaluator;
mod parser;

pub use ast::{CompareOp, Condition};
pub use evaluator::{evaluate, evaluate_cell, ConditionOutcome};
pub use parser::parse;
