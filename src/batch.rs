use crate::{
    BindExecCommand, Error, ParameterSet, Protocol, Result, ResultBatch, ResultField, Row, Value,
    Warning,
};
use std::mem;

/// Per-entry outcome code of a batch execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The entry executed and reported this many affected rows.
    Affected(u64),
    /// The entry either succeeded without a usable count, or was never
    /// dispatched because an earlier entry aborted the batch.
    SuccessNoInfo,
    /// The entry is known to have failed. Never produced by the executor
    /// itself (an aborting entry is left as `SuccessNoInfo`, mirroring the
    /// reporting contract); available to callers recording failures.
    Failed,
}

/// Ordered accumulation of parameter-set snapshots awaiting bulk dispatch.
///
/// Insertion order is the execution order and the index space of the
/// outcome array. No type or index revalidation happens here; the slots
/// already enforced both when the values were bound.
#[derive(Debug, Default)]
pub struct BatchQueue {
    entries: Vec<ParameterSet>,
}

impl BatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, set: ParameterSet) {
        self.entries.push(set);
    }

    /// Discard all queued entries without executing them.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn take(&mut self) -> Vec<ParameterSet> {
        mem::take(&mut self.entries)
    }
}

pub(crate) struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
    pub generated_keys: Vec<Row>,
}

/// Drive one round-trip per queued entry, in queue order, through a single
/// shared command.
///
/// Exactly one result batch with a known rows-affected count is the only
/// accepted response shape; anything else aborts the remaining batch with
/// the outcomes accumulated so far. Warnings are appended to `warnings` as
/// they arrive, so the chain survives an abort. When `want_keys` is set the
/// first result row of each successful entry is captured.
pub(crate) fn run_batch<P: Protocol>(
    protocol: &mut P,
    statement: &str,
    parameter_types: &[Value],
    result_fields: &[ResultField],
    entries: Vec<ParameterSet>,
    want_keys: bool,
    warnings: &mut Vec<Warning>,
) -> Result<BatchReport> {
    if entries.is_empty() {
        return Ok(BatchReport {
            outcomes: Vec::new(),
            generated_keys: Vec::new(),
        });
    }
    let mut outcomes = vec![BatchOutcome::SuccessNoInfo; entries.len()];
    let mut generated_keys = Vec::new();
    // One command shared across every entry: the statement name, declared
    // parameter types and result shape are fixed, only the values differ.
    let mut command = protocol.create_bind_exec(
        None,
        statement,
        parameter_types,
        ParameterSet::default(),
        result_fields,
    );
    let abort = |entry: usize, reason: String, outcomes: Vec<BatchOutcome>| {
        log::error!("batch `{statement}` aborted at entry {entry}: {reason}");
        Error::BatchAbort {
            entry,
            reason,
            outcomes,
        }
    };
    for (entry, values) in entries.into_iter().enumerate() {
        command.set_parameter_values(values);
        let chain = match protocol.execute(&mut command, true) {
            Ok(chain) => chain,
            Err(e) => return Err(abort(entry, e.to_string(), outcomes)),
        };
        warnings.extend(chain);
        let batches = command.take_result_batches();
        let mut batch = match <[ResultBatch; 1]>::try_from(batches) {
            Ok([batch]) => batch,
            Err(batches) => {
                let reason = format!("expected exactly one result batch, got {}", batches.len());
                return Err(abort(entry, reason, outcomes));
            }
        };
        let Some(affected) = batch.rows_affected else {
            let reason = "rows affected count unavailable".to_owned();
            return Err(abort(entry, reason, outcomes));
        };
        if want_keys && !batch.rows.is_empty() {
            generated_keys.push(batch.rows.swap_remove(0));
        }
        outcomes[entry] = BatchOutcome::Affected(affected);
        log::trace!("batch `{statement}` entry {entry}: {affected} rows");
    }
    Ok(BatchReport {
        outcomes,
        generated_keys,
    })
}
