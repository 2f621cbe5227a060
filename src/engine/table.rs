// SPDX-License-Identifier: MIT

//! Decision tables: ordered rule rows evaluated first-match-wins

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use super::condition::{evaluate_cell, ConditionOutcome};
use super::facts::{FactStore, Facts};
use super::value::{coerce, Value};
use crate::error::{RuleTableError, TableError};

/// How output cells are written into the fact store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Coerce like condition operands (`"42"` becomes an integer)
    #[default]
    Typed,
    /// Write the cell text verbatim
    Raw,
}

impl FromStr for OutputMode {
    type Err = RuleTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "typed" => Ok(OutputMode::Typed),
            "raw" => Ok(OutputMode::Raw),
            other => Err(RuleTableError::config(format!(
                "unknown output mode '{}', expected 'typed' or 'raw'",
                other
            ))),
        }
    }
}

/// One rule: a condition per input and a value expression per output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    conditions: BTreeMap<String, String>,
    outputs: BTreeMap<String, String>,
}

impl Row {
    pub fn new(conditions: BTreeMap<String, String>, outputs: BTreeMap<String, String>) -> Self {
        Self {
            conditions,
            outputs,
        }
    }

    /// Build a row from `(name, cell)` pairs
    pub fn from_pairs<'a, C, O>(conditions: C, outputs: O) -> Self
    where
        C: IntoIterator<Item = (&'a str, &'a str)>,
        O: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            conditions: conditions
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            outputs: outputs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn condition(&self, input: &str) -> Option<&str> {
        self.conditions.get(input).map(String::as_str)
    }

    pub fn output(&self, name: &str) -> Option<&str> {
        self.outputs.get(name).map(String::as_str)
    }

    pub fn conditions(&self) -> &BTreeMap<String, String> {
        &self.conditions
    }

    pub fn outputs(&self) -> &BTreeMap<String, String> {
        &self.outputs
    }
}

/// Result of evaluating a table against an owned [`Facts`] store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub matched: bool,
    /// Index of the row that fired
    pub row: Option<usize>,
    pub facts: Facts,
}

impl Decision {
    /// JSON report with facts sorted by name. Non-finite floats appear as text.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "matched": self.matched,
            "row": self.row,
            "facts": self.facts.to_json(),
        })
    }
}

/// An immutable decision table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionTable {
    inputs: Vec<String>,
    outputs: Vec<String>,
    rows: Vec<Row>,
    #[serde(skip)]
    output_mode: OutputMode,
}

impl DecisionTable {
    /// Build a table, checking that column names are unique and disjoint and
    /// that every row covers exactly the table's inputs and outputs.
    pub fn new(
        inputs: Vec<String>,
        outputs: Vec<String>,
        rows: Vec<Row>,
    ) -> Result<Self, TableError> {
        check_columns(&inputs, &outputs)?;

        for (index, row) in rows.iter().enumerate() {
            check_keys(index, "condition", &inputs, row.conditions.keys())?;
            check_keys(index, "output", &outputs, row.outputs.keys())?;
        }

        Ok(Self {
            inputs,
            outputs,
            rows,
            output_mode: OutputMode::default(),
        })
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first row whose conditions all hold, without touching the store
    pub fn find_match<F: FactStore + ?Sized>(&self, facts: &F) -> Option<usize> {
        let found = self
            .rows
            .iter()
            .position(|row| self.conditions_met(row, facts));
        match found {
            Some(index) => log::debug!("row {} matched", index),
            None => log::debug!("no row matched out of {}", self.rows.len()),
        }
        found
    }

    /// Apply the first matching row's outputs to `facts`. Returns whether a row matched.
    pub fn evaluate<F: FactStore + ?Sized>(&self, facts: &mut F) -> bool {
        match self.find_match(&*facts) {
            Some(index) => {
                self.apply_outputs(&self.rows[index], facts);
                true
            }
            None => false,
        }
    }

    /// Evaluate against an owned store and report which row fired
    pub fn decide(&self, mut facts: Facts) -> Decision {
        let row = self.find_match(&facts);
        if let Some(index) = row {
            self.apply_outputs(&self.rows[index], &mut facts);
        }
        Decision {
            matched: row.is_some(),
            row,
            facts,
        }
    }

    fn conditions_met<F: FactStore + ?Sized>(&self, row: &Row, facts: &F) -> bool {
        self.inputs.iter().all(|input| {
            let cell = row.condition(input).unwrap_or_default();
            let fact = facts.get(input);
            let outcome = evaluate_cell(cell, fact);
            match outcome {
                ConditionOutcome::Matched => {}
                ConditionOutcome::Incomparable => log::trace!(
                    "condition {}: '{}' cannot compare a {} fact",
                    input,
                    cell,
                    fact.map(Value::kind).unwrap_or("missing")
                ),
                _ => log::trace!("condition {}: '{}' -> {:?}", input, cell, outcome),
            }
            outcome.is_match()
        })
    }

    fn apply_outputs<F: FactStore + ?Sized>(&self, row: &Row, facts: &mut F) {
        for name in &self.outputs {
            let cell = row.output(name).unwrap_or_default();
            let value = match self.output_mode {
                OutputMode::Typed => coerce(cell),
                OutputMode::Raw => Value::Text(cell.to_string()),
            };
            facts.set(name, value);
        }
    }
}

fn check_columns(inputs: &[String], outputs: &[String]) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for name in inputs {
        if !seen.insert(name.as_str()) {
            return Err(TableError::DuplicateColumn(name.clone()));
        }
    }
    let mut seen_outputs = HashSet::new();
    for name in outputs {
        if seen.contains(name.as_str()) {
            return Err(TableError::OverlappingColumn(name.clone()));
        }
        if !seen_outputs.insert(name.as_str()) {
            return Err(TableError::DuplicateColumn(name.clone()));
        }
    }
    Ok(())
}

fn check_keys<'a>(
    row: usize,
    what: &str,
    columns: &[String],
    keys: impl Iterator<Item = &'a String>,
) -> Result<(), TableError> {
    let keys: HashSet<&str> = keys.map(String::as_str).collect();
    if let Some(missing) = columns.iter().find(|c| !keys.contains(c.as_str())) {
        return Err(TableError::RowShape {
            row,
            detail: format!("missing {} for '{}'", what, missing),
        });
    }
    if keys.len() != columns.len() {
        let declared: HashSet<&str> = columns.iter().map(String::as_str).collect();
        let extra = keys
            .iter()
            .find(|k| !declared.contains(*k))
            .copied()
            .unwrap_or_default();
        return Err(TableError::RowShape {
            row,
            detail: format!("unexpected {} '{}'", what, extra),
        });
    }
    Ok(())
}
