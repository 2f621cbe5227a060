// SPDX-License-Identifier: MIT

//! Table loader - delimited file loading and parsing
//!
//! The header names the columns; a single `*` column splits inputs (left)
//! from outputs (right):
//!
//! ```text
//! age;member;*;category
//! >=18;=true;;adult
//! <18;=true;;minor
//! ```
//!
//! Data rows may also leave out the cell under `*` entirely.

use csv_async::{AsyncReaderBuilder, StringRecord};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::io::AsyncRead;

use super::condition::parse;
use super::table::{DecisionTable, Row};
use crate::error::{Result, TableError};

/// Column separating inputs from outputs
pub const SPLIT_MARKER: &str = "*";

/// Default cell delimiter
pub const DEFAULT_DELIMITER: u8 = b';';

/// Loads decision tables from delimited text
#[derive(Debug, Clone)]
pub struct TableLoader {
    delimiter: u8,
}

impl TableLoader {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load a decision table from a file
    pub async fn load<P: AsRef<Path>>(&self, path: P) -> Result<DecisionTable> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        let table = self.from_reader(file).await?;
        log::info!(
            "Loaded table {:?}: {} inputs, {} outputs, {} rows",
            path,
            table.inputs().len(),
            table.outputs().len(),
            table.len()
        );
        Ok(table)
    }

    /// Parse a decision table from a string
    pub async fn parse_str(&self, content: &str) -> Result<DecisionTable> {
        self.from_reader(content.as_bytes()).await
    }

    /// Parse a decision table from any async reader
    pub async fn from_reader<R>(&self, reader: R) -> Result<DecisionTable>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut csv = AsyncReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .create_reader(reader);

        let mut record = StringRecord::new();
        if !csv.read_record(&mut record).await? {
            return Err(TableError::EmptySource.into());
        }
        let layout = Layout::from_header(&record)?;

        let mut rows = Vec::new();
        while csv.read_record(&mut record).await? {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            rows.push(layout.row(&record, line)?);
        }

        Ok(DecisionTable::new(layout.inputs, layout.outputs, rows)?)
    }
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Column layout taken from the header row
struct Layout {
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl Layout {
    fn from_header(header: &StringRecord) -> std::result::Result<Self, TableError> {
        let mut split = None;
        for (index, name) in header.iter().enumerate() {
            if name == SPLIT_MARKER {
                if split.is_some() {
                    return Err(TableError::DuplicateSplitMarker);
                }
                split = Some(index);
            } else if name.is_empty() {
                return Err(TableError::EmptyColumnName { index });
            }
        }
        let split = split.ok_or(TableError::MissingSplitMarker)?;

        let names: Vec<String> = header.iter().map(str::to_string).collect();
        Ok(Self {
            inputs: names[..split].to_vec(),
            outputs: names[split + 1..].to_vec(),
        })
    }

    fn width(&self) -> usize {
        self.inputs.len() + 1 + self.outputs.len()
    }

    fn row(&self, record: &StringRecord, line: u64) -> std::result::Result<Row, TableError> {
        let width = self.width();
        let found = record.len();

        // Outputs start after the marker cell, or right after the inputs when
        // the row leaves the marker cell out.
        let output_start = if found >= width {
            self.inputs.len() + 1
        } else if found == width - 1 {
            self.inputs.len()
        } else {
            return Err(TableError::RowTooShort {
                line,
                expected: width,
                found,
            });
        };
        if found > width {
            log::warn!(
                "line {}: ignoring {} cells beyond the header",
                line,
                found - width
            );
        }

        let mut conditions = BTreeMap::new();
        for (index, input) in self.inputs.iter().enumerate() {
            let cell = record.get(index).unwrap_or_default();
            if parse(cell).is_none() {
                log::warn!(
                    "line {}: condition '{}' for '{}' has no known operator and never matches",
                    line,
                    cell,
                    input
                );
            }
            conditions.insert(input.clone(), cell.to_string());
        }

        let outputs = self
            .outputs
            .iter()
            .enumerate()
            .map(|(offset, name)| {
                let cell = record.get(output_start + offset).unwrap_or_default();
                (name.clone(), cell.to_string())
            })
            .collect();

        Ok(Row::new(conditions, outputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::facts::Facts;
    use crate::engine::value::Value;
    use crate::error::RuleTableError;

    async fn parse_table(content: &str) -> Result<DecisionTable> {
        TableLoader::new().parse_str(content).await
    }

    fn table_error(result: Result<DecisionTable>) -> TableError {
        match result {
            Err(RuleTableError::Table(e)) => e,
            other => panic!("expected a table error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_parse_basic_table() {
        let table = parse_table("age;member;*;category;rate\n>=18;=true;;adult;0.2\n<18;=true;;minor;0.1\n")
            .await
            .unwrap();
        assert_eq!(table.inputs(), ["age", "member"]);
        assert_eq!(table.outputs(), ["category", "rate"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].condition("age"), Some(">=18"));
        assert_eq!(table.rows()[1].output("category"), Some("minor"));
        assert_eq!(table.rows()[1].output("rate"), Some("0.1"));
    }

    #[tokio::test]
    async fn test_marker_cell_may_be_omitted() {
        let table = parse_table("age;*;category\n>=18;adult\n<18;;minor\n")
            .await
            .unwrap();
        assert_eq!(table.rows()[0].output("category"), Some("adult"));
        assert_eq!(table.rows()[1].output("category"), Some("minor"));
    }

    #[tokio::test]
    async fn test_marker_cell_content_is_ignored() {
        let table = parse_table("age;*;category\n>=18;anything;adult\n")
            .await
            .unwrap();
        assert_eq!(table.rows()[0].output("category"), Some("adult"));
    }

    #[tokio::test]
    async fn test_cells_are_not_trimmed() {
        let table = parse_table("a;*;b\n= x; y \n").await.unwrap();
        assert_eq!(table.rows()[0].condition("a"), Some("= x"));
        assert_eq!(table.rows()[0].output("b"), Some(" y "));
    }

    #[tokio::test]
    async fn test_extra_cells_are_ignored() {
        let table = parse_table("a;*;b\n=1;;x;extra;more\n").await.unwrap();
        assert_eq!(table.rows()[0].output("b"), Some("x"));
    }

    #[tokio::test]
    async fn test_blank_lines_are_skipped() {
        let table = parse_table("a;*;b\n\n=1;;x\n\n=2;;y\n").await.unwrap();
        assert_eq!(table.len(), 2);
    }

    #[tokio::test]
    async fn test_header_only() {
        let table = parse_table("a;*;b\n").await.unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_missing_marker() {
        let err = table_error(parse_table("age;category\n>=18;adult\n").await);
        assert_eq!(err, TableError::MissingSplitMarker);
    }

    #[tokio::test]
    async fn test_duplicate_marker() {
        let err = table_error(parse_table("age;*;category;*\n").await);
        assert_eq!(err, TableError::DuplicateSplitMarker);
    }

    #[tokio::test]
    async fn test_empty_source() {
        let err = table_error(parse_table("").await);
        assert_eq!(err, TableError::EmptySource);
    }

    #[tokio::test]
    async fn test_empty_column_name() {
        let err = table_error(parse_table("age;;*;category\n").await);
        assert_eq!(err, TableError::EmptyColumnName { index: 1 });
    }

    #[tokio::test]
    async fn test_duplicate_column() {
        let err = table_error(parse_table("age;age;*;category\n").await);
        assert_eq!(err, TableError::DuplicateColumn("age".to_string()));

        let err = table_error(parse_table("age;*;age\n").await);
        assert_eq!(err, TableError::OverlappingColumn("age".to_string()));
    }

    #[tokio::test]
    async fn test_row_too_short() {
        let err = table_error(parse_table("age;member;*;category\n>=18;=true;;adult\n>=18\n").await);
        assert_eq!(
            err,
            TableError::RowTooShort {
                line: 3,
                expected: 4,
                found: 1
            }
        );
    }

    #[tokio::test]
    async fn test_custom_delimiter() {
        let table = TableLoader::new()
            .with_delimiter(b',')
            .parse_str("age,*,category\n>=18,,adult\n")
            .await
            .unwrap();
        let mut facts = Facts::new().with("age", 30);
        assert!(table.evaluate(&mut facts));
        assert_eq!(facts.get("category"), Some(&Value::from("adult")));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = TableLoader::new().load("/nonexistent/table.csv").await;
        assert!(matches!(result, Err(RuleTableError::Io(_))));
    }
}
