// SPDX-License-Identifier: MIT

//! Typed error handling for ruletable-rs
//!
//! Only loading, configuration and fact decoding can fail. Evaluation itself
//! never returns an error: an unmet, unparseable or incomparable condition is
//! ordinary control flow.

use thiserror::Error;

/// Top-level error type for ruletable-rs
#[derive(Debug, Error)]
pub enum RuleTableError {
    /// Malformed table source or table invariant violation
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Configuration errors (bad env values, unreadable config file, missing table path)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fact values that can't be represented as a scalar
    #[error("Invalid fact: {0}")]
    InvalidFact(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Delimited source decoding errors
    #[error(transparent)]
    Csv(#[from] csv_async::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised while building a decision table
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    /// Source has no header row
    #[error("Table source is empty: expected a header row")]
    EmptySource,

    /// Header has no `*` column
    #[error("Header is missing the '*' column separating inputs from outputs")]
    MissingSplitMarker,

    /// Header has more than one `*` column
    #[error("Header contains more than one '*' column")]
    DuplicateSplitMarker,

    /// Header column without a name
    #[error("Header column {index} has an empty name")]
    EmptyColumnName { index: usize },

    /// Same name used twice on one side of the marker
    #[error("Column '{0}' is declared more than once")]
    DuplicateColumn(String),

    /// Same name used both as an input and as an output
    #[error("Column '{0}' is declared as both an input and an output")]
    OverlappingColumn(String),

    /// Data row with fewer cells than the header
    #[error("Row on line {line} has {found} cells, expected {expected}")]
    RowTooShort {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Row whose condition/output keys don't line up with the table columns
    #[error("Row {row} does not match the table columns: {detail}")]
    RowShape { row: usize, detail: String },
}

impl RuleTableError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid fact error
    pub fn invalid_fact(message: impl Into<String>) -> Self {
        Self::InvalidFact(message.into())
    }
}

pub type Result<T> = std::result::Result<T, RuleTableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_too_short_message() {
        let err = TableError::RowTooShort {
            line: 3,
            expected: 3,
            found: 1,
        };
        assert_eq!(err.to_string(), "Row on line 3 has 1 cells, expected 3");
    }

    #[test]
    fn test_table_error_wraps() {
        let err: RuleTableError = TableError::MissingSplitMarker.into();
        assert!(matches!(
            err,
            RuleTableError::Table(TableError::MissingSplitMarker)
        ));
        assert!(err.to_string().contains("'*'"));
    }

    #[test]
    fn test_helpers() {
        assert!(matches!(
            RuleTableError::config("no table"),
            RuleTableError::Config(m) if m == "no table"
        ));
        let err = RuleTableError::invalid_fact("'age' must be a scalar");
        assert!(matches!(&err, RuleTableError::InvalidFact(m) if m.contains("'age'")));
        assert!(err.to_string().contains("'age' must be a scalar"));
    }
}
