//! Report generation over a SQL-like query collaborator.
//!
//! Reports live outside the orchestration core: they never compose or run
//! steps. They consume a [`QuerySource`], whose `query(statement)` returns
//! an ordered sequence of row mappings, and aggregate its rows into a flat
//! key/value document.

pub mod inventory;

pub use inventory::InventoryReport;

use std::collections::BTreeMap;

use crate::error::Result;

/// One result row: column name to textual value.
pub type Row = BTreeMap<String, String>;

/// Aggregated report output.
pub type ReportData = BTreeMap<String, serde_json::Value>;

/// The query collaborator reports are generated against.
pub trait QuerySource {
    /// Run a statement and return its rows in result order.
    fn query(&self, statement: &str) -> Result<Vec<Row>>;
}

/// Query source backed by a local `psql` client.
///
/// Statements run in unaligned mode with a header row; rows are keyed by
/// the column names psql reports, so statements are free to alias their
/// columns however the report expects them.
pub struct PsqlSource {
    database: String,
}

impl PsqlSource {
    /// Source querying one local database.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
        }
    }

    fn parse(output: &str) -> Vec<Row> {
        let mut lines = output.lines().filter(|l| !l.trim().is_empty());
        let Some(header) = lines.next() else {
            return Vec::new();
        };
        let columns: Vec<&str> = header.split('|').map(str::trim).collect();

        lines
            // psql appends a "(N rows)" footer in header mode
            .filter(|line| !(line.starts_with('(') && line.trim_end().ends_with(')')))
            .map(|line| {
                columns
                    .iter()
                    .zip(line.split('|'))
                    .map(|(column, value)| (column.to_string(), value.trim().to_string()))
                    .collect()
            })
            .collect()
    }
}

impl QuerySource for PsqlSource {
    fn query(&self, statement: &str) -> Result<Vec<Row>> {
        let command = format!("psql -A -F '|' -d {} -c \"{}\"", self.database, statement);
        let result = crate::shell::execute(
            &command,
            &crate::shell::CommandOptions {
                capture_stdout: true,
                capture_stderr: true,
                ..Default::default()
            },
        )?;
        if !result.success {
            return Err(crate::error::UpkeepError::CommandFailed {
                command,
                code: result.exit_code,
            });
        }
        Ok(Self::parse(&result.stdout))
    }
}


/// A report definition.
pub trait Report {
    /// Registry name of this report.
    fn name(&self) -> &'static str;

    /// One-line description.
    fn description(&self) -> &'static str;

    /// Aggregate the report's data from the query source.
    fn run(&self, source: &dyn QuerySource) -> Result<ReportData>;
}
