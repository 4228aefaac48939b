#![allow(dead_code)]

use pgbind::{
    BindExecCommand, Error, ParameterSet, Protocol, ResultBatch, ResultField, Row, Value, Warning,
};
use std::{collections::VecDeque, mem};

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Scripted response for one batch entry or immediate execution.
pub struct Respond {
    batches: Vec<ResultBatch>,
    warning: Option<Warning>,
    fail: Option<String>,
}

impl Respond {
    pub fn count(affected: u64) -> Self {
        Self {
            batches: vec![ResultBatch {
                rows_affected: Some(affected),
                rows: Vec::new(),
            }],
            warning: None,
            fail: None,
        }
    }

    pub fn count_with_row(affected: u64, row: Row) -> Self {
        Self {
            batches: vec![ResultBatch {
                rows_affected: Some(affected),
                rows: vec![row],
            }],
            warning: None,
            fail: None,
        }
    }

    pub fn rows(rows: Vec<Row>) -> Self {
        Self {
            batches: vec![ResultBatch {
                rows_affected: None,
                rows,
            }],
            warning: None,
            fail: None,
        }
    }

    /// A response with no usable rows-affected count.
    pub fn no_count() -> Self {
        Self::rows(Vec::new())
    }

    /// A response split into two result batches.
    pub fn split() -> Self {
        Self {
            batches: vec![ResultBatch::default(), ResultBatch::default()],
            warning: None,
            fail: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            batches: Vec::new(),
            warning: None,
            fail: Some(message.into()),
        }
    }

    pub fn with_warning(mut self, message: impl Into<String>) -> Self {
        self.warning = Some(Warning::new(message));
        self
    }
}

#[derive(Default)]
pub struct MockCommand {
    /// Every parameter set bound into the command, in order.
    pub bound: Vec<ParameterSet>,
    batches: Vec<ResultBatch>,
}

impl BindExecCommand for MockCommand {
    fn set_parameter_values(&mut self, values: ParameterSet) {
        self.bound.push(values);
    }

    fn take_result_batches(&mut self) -> Vec<ResultBatch> {
        mem::take(&mut self.batches)
    }
}

/// Wire-protocol stand-in that replays a fixed script of responses and
/// records what the executor asked of it.
pub struct MockProtocol {
    script: VecDeque<Respond>,
    pub commands_created: usize,
    pub round_trips: usize,
    pub statement: Option<String>,
    pub parameter_types: Vec<Value>,
    /// Parameter set in effect at each round-trip, in dispatch order.
    pub bound_history: Vec<ParameterSet>,
}

impl MockProtocol {
    pub fn new(script: impl IntoIterator<Item = Respond>) -> Self {
        Self {
            script: script.into_iter().collect(),
            commands_created: 0,
            round_trips: 0,
            statement: None,
            parameter_types: Vec::new(),
            bound_history: Vec::new(),
        }
    }
}

impl Protocol for MockProtocol {
    type Command = MockCommand;

    fn create_bind_exec(
        &mut self,
        _portal: Option<&str>,
        statement: &str,
        parameter_types: &[Value],
        parameter_values: ParameterSet,
        _result_fields: &[ResultField],
    ) -> Self::Command {
        self.commands_created += 1;
        self.statement = Some(statement.to_owned());
        self.parameter_types = parameter_types.to_vec();
        let mut command = MockCommand::default();
        if !parameter_values.is_empty() {
            command.bound.push(parameter_values);
        }
        command
    }

    fn execute(
        &mut self,
        command: &mut Self::Command,
        _batch_member: bool,
    ) -> pgbind::Result<Vec<Warning>> {
        self.round_trips += 1;
        if let Some(bound) = command.bound.last() {
            self.bound_history.push(bound.clone());
        }
        let Some(respond) = self.script.pop_front() else {
            return Err(Error::Protocol("mock script exhausted".into()));
        };
        if let Some(message) = respond.fail {
            return Err(Error::Protocol(message));
        }
        command.batches = respond.batches;
        Ok(respond.warning.into_iter().collect())
    }
}
