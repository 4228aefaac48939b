use crate::{ParameterSet, Result, Value};
use std::sync::Arc;

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice aligned by index with its `RowNames`.
pub type Row = Box<[Value]>;

/// Declared shape of one result column.
#[derive(Debug, Clone)]
pub struct ResultField {
    pub name: String,
    /// Empty [`Value`] template describing the column type.
    pub type_template: Value,
}

impl ResultField {
    pub fn new(name: impl Into<String>, type_template: Value) -> Self {
        Self {
            name: name.into(),
            type_template,
        }
    }
}

/// One result produced by a round-trip: an optional rows-affected count and
/// the materialized result rows.
#[derive(Debug, Clone, Default)]
pub struct ResultBatch {
    pub rows_affected: Option<u64>,
    pub rows: Vec<Row>,
}

/// Non-fatal condition surfaced by the server during execution. Chains are
/// appended to in execution order, never replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub code: Option<String>,
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

/// A small materialized result set: the generated-keys secondary result and
/// the rows of an immediate execution.
#[derive(Debug, Clone, Default)]
pub struct Rows {
    pub labels: RowNames,
    pub rows: Vec<Row>,
}

impl Rows {
    pub fn new(labels: RowNames, rows: Vec<Row>) -> Self {
        Self { labels, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get_column(&self, row: usize, name: &str) -> Option<&Value> {
        let column = self.labels.iter().position(|v| v == name)?;
        self.rows.get(row)?.get(column)
    }
}

/// One bind/execute command against a named prepared statement. The command
/// is built once per dispatch sequence; only the bound parameter values
/// change between executions of the same command.
pub trait BindExecCommand {
    /// Replace the bound parameter values for the next execution.
    fn set_parameter_values(&mut self, values: ParameterSet);
    /// Take the result batches produced by the most recent execution.
    fn take_result_batches(&mut self) -> Vec<ResultBatch>;
}

/// The wire-protocol boundary. Implementations own serialization of the
/// binary protocol and the transport; this crate only drives the
/// request/response contract below.
pub trait Protocol {
    type Command: BindExecCommand;

    fn create_bind_exec(
        &mut self,
        portal: Option<&str>,
        statement: &str,
        parameter_types: &[Value],
        parameter_values: ParameterSet,
        result_fields: &[ResultField],
    ) -> Self::Command;

    /// Perform one blocking round-trip. Returns the warnings surfaced by
    /// the server; raises on transport or protocol failure.
    fn execute(&mut self, command: &mut Self::Command, batch_member: bool) -> Result<Vec<Warning>>;
}
