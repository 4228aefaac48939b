use crate::{
    BatchOutcome, BatchQueue, BindExecCommand, Error, ParameterSlots, Protocol, Result,
    ResultField, RowNames, Rows, Value, Warning,
    batch::run_batch,
    coerce::local_offset,
    stream::{self, StreamLimit, TextEncoding},
};
use rust_decimal::Decimal;
use std::{io::Read, sync::Arc};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
use uuid::Uuid;

/// State shared by every executable statement kind: identity, declared
/// result shape, accumulated warning chain, generated-keys capture and the
/// open/closed flag. Statement kinds compose this rather than extend it.
#[derive(Debug)]
pub struct StatementCore {
    name: String,
    result_fields: Arc<[ResultField]>,
    warnings: Vec<Warning>,
    wants_generated_keys: bool,
    generated_keys: Option<Rows>,
    open: bool,
}

impl StatementCore {
    pub fn new(name: impl Into<String>, result_fields: Arc<[ResultField]>) -> Self {
        Self {
            name: name.into(),
            result_fields,
            warnings: Vec::new(),
            wants_generated_keys: false,
            generated_keys: None,
            open: true,
        }
    }

    fn check_open(&self) -> Result<()> {
        if !self.open {
            return Err(Error::StatementClosed);
        }
        Ok(())
    }

    fn result_labels(&self) -> RowNames {
        self.result_fields
            .iter()
            .map(|f| f.name.clone())
            .collect()
    }
}

/// Result of an immediate (non-batch) execution: the rows-affected count of
/// a modifying statement, or the materialized result rows of a query,
/// whichever the response carried.
#[derive(Debug, Clone, Default)]
pub struct ExecuteResult {
    pub update_count: Option<u64>,
    pub rows: Option<Rows>,
}

/// A server-prepared statement with positional parameter binding and batch
/// accumulation.
///
/// The statement exclusively owns its parameter slots and batch queue; at
/// most one operation may be in flight at a time, which `&mut self`
/// enforces at the type level. The wire protocol is passed in at execution
/// time, so the statement itself carries no transport state.
#[derive(Debug)]
pub struct PreparedStatement {
    core: StatementCore,
    slots: ParameterSlots,
    batch: BatchQueue,
}

impl PreparedStatement {
    pub fn new(
        name: impl Into<String>,
        parameter_types: impl Into<Arc<[Value]>>,
        result_fields: impl Into<Arc<[ResultField]>>,
    ) -> Self {
        Self {
            core: StatementCore::new(name, result_fields.into()),
            slots: ParameterSlots::new(parameter_types.into()),
            batch: BatchQueue::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn parameter_count(&self) -> usize {
        self.slots.len()
    }

    pub fn parameter_types(&self) -> &[Value] {
        self.slots.declared_types()
    }

    pub fn result_fields(&self) -> &[ResultField] {
        &self.core.result_fields
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.core.warnings
    }

    pub fn clear_warnings(&mut self) {
        self.core.warnings.clear();
    }

    pub fn wants_generated_keys(&self) -> bool {
        self.core.wants_generated_keys
    }

    pub fn set_wants_generated_keys(&mut self, wants: bool) {
        self.core.wants_generated_keys = wants;
    }

    /// Generated-keys rows captured by the most recent execution, keyed by
    /// the statement's declared result fields.
    pub fn generated_keys(&self) -> Option<&Rows> {
        self.core.generated_keys.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        !self.core.open
    }

    /// Close the statement and drop all parameter and batch state. Every
    /// subsequent operation fails with [`Error::StatementClosed`].
    /// Idempotent.
    pub fn close(&mut self) {
        if !self.core.open {
            return;
        }
        self.core.open = false;
        self.slots.clear();
        self.batch.clear();
        self.core.generated_keys = None;
    }

    /// Bind a pre-built [`Value`], interpreting ambiguous wall-clock
    /// temporals in the platform-local zone.
    pub fn set_value(&mut self, index: usize, value: Value) -> Result<()> {
        self.set_value_tz(index, value, local_offset())
    }

    /// Bind a pre-built [`Value`] with an explicit zone for temporal
    /// interpretation. The zone only affects the coercion of this value; it
    /// is not statement state.
    pub fn set_value_tz(&mut self, index: usize, value: Value, zone: UtcOffset) -> Result<()> {
        self.core.check_open()?;
        self.slots.set(index, value, zone)
    }

    pub fn set_null(&mut self, index: usize) -> Result<()> {
        self.set_value(index, Value::Null)
    }

    pub fn set_bool(&mut self, index: usize, value: bool) -> Result<()> {
        self.set_value(index, value.into())
    }

    pub fn set_i8(&mut self, index: usize, value: i8) -> Result<()> {
        self.set_value(index, value.into())
    }

    pub fn set_i16(&mut self, index: usize, value: i16) -> Result<()> {
        self.set_value(index, value.into())
    }

    pub fn set_i32(&mut self, index: usize, value: i32) -> Result<()> {
        self.set_value(index, value.into())
    }

    pub fn set_i64(&mut self, index: usize, value: i64) -> Result<()> {
        self.set_value(index, value.into())
    }

    pub fn set_f32(&mut self, index: usize, value: f32) -> Result<()> {
        self.set_value(index, value.into())
    }

    pub fn set_f64(&mut self, index: usize, value: f64) -> Result<()> {
        self.set_value(index, value.into())
    }

    pub fn set_decimal(&mut self, index: usize, value: Decimal) -> Result<()> {
        self.set_value(index, value.into())
    }

    pub fn set_string(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        self.set_value(index, Value::Varchar(Some(value.into())))
    }

    pub fn set_bytes(&mut self, index: usize, value: impl Into<Box<[u8]>>) -> Result<()> {
        self.set_value(index, Value::Blob(Some(value.into())))
    }

    pub fn set_uuid(&mut self, index: usize, value: Uuid) -> Result<()> {
        self.set_value(index, value.into())
    }

    pub fn set_date(&mut self, index: usize, value: Date) -> Result<()> {
        self.set_value(index, value.into())
    }

    pub fn set_date_tz(&mut self, index: usize, value: Date, zone: UtcOffset) -> Result<()> {
        self.set_value_tz(index, value.into(), zone)
    }

    pub fn set_time(&mut self, index: usize, value: Time) -> Result<()> {
        self.set_value(index, value.into())
    }

    pub fn set_time_tz(&mut self, index: usize, value: Time, zone: UtcOffset) -> Result<()> {
        self.set_value_tz(index, value.into(), zone)
    }

    pub fn set_timestamp(&mut self, index: usize, value: PrimitiveDateTime) -> Result<()> {
        self.set_value(index, value.into())
    }

    pub fn set_timestamp_tz(
        &mut self,
        index: usize,
        value: PrimitiveDateTime,
        zone: UtcOffset,
    ) -> Result<()> {
        self.set_value_tz(index, value.into(), zone)
    }

    pub fn set_timestamp_with_timezone(
        &mut self,
        index: usize,
        value: OffsetDateTime,
    ) -> Result<()> {
        self.set_value(index, value.into())
    }

    /// Bind a binary stream, reading it to exhaustion. A missing stream
    /// binds SQL NULL.
    pub fn set_binary_stream<R: Read>(&mut self, index: usize, stream: Option<R>) -> Result<()> {
        self.bind_binary(index, stream, StreamLimit::Unbounded)
    }

    /// Bind a binary stream with a declared byte length. The stream must
    /// produce exactly `length` bytes; a missing stream is only accepted
    /// with a declared length of zero.
    pub fn set_binary_stream_len<R: Read>(
        &mut self,
        index: usize,
        stream: Option<R>,
        length: u64,
    ) -> Result<()> {
        self.bind_binary(index, stream, StreamLimit::Exactly(length))
    }

    pub fn set_ascii_stream<R: Read>(&mut self, index: usize, stream: Option<R>) -> Result<()> {
        self.bind_text(index, stream, StreamLimit::Unbounded, TextEncoding::Ascii)
    }

    pub fn set_ascii_stream_len<R: Read>(
        &mut self,
        index: usize,
        stream: Option<R>,
        length: u64,
    ) -> Result<()> {
        self.bind_text(
            index,
            stream,
            StreamLimit::Exactly(length),
            TextEncoding::Ascii,
        )
    }

    pub fn set_character_stream<R: Read>(&mut self, index: usize, stream: Option<R>) -> Result<()> {
        self.bind_text(index, stream, StreamLimit::Unbounded, TextEncoding::Utf8)
    }

    /// Bind a UTF-8 character stream with a declared length counted in
    /// decoded characters, not bytes.
    pub fn set_character_stream_len<R: Read>(
        &mut self,
        index: usize,
        stream: Option<R>,
        length: u64,
    ) -> Result<()> {
        self.bind_text(
            index,
            stream,
            StreamLimit::Exactly(length),
            TextEncoding::Utf8,
        )
    }

    /// Legacy UTF-8 variant of the character-stream setter, always with an
    /// explicit declared length.
    pub fn set_unicode_stream<R: Read>(
        &mut self,
        index: usize,
        stream: Option<R>,
        length: u64,
    ) -> Result<()> {
        self.set_character_stream_len(index, stream, length)
    }

    fn bind_binary<R: Read>(
        &mut self,
        index: usize,
        stream: Option<R>,
        limit: StreamLimit,
    ) -> Result<()> {
        self.core.check_open()?;
        let value = match stream::read_binary(stream, limit)? {
            Some(bytes) => Value::Blob(Some(bytes)),
            None => Value::Null,
        };
        self.slots.set(index, value, local_offset())
    }

    fn bind_text<R: Read>(
        &mut self,
        index: usize,
        stream: Option<R>,
        limit: StreamLimit,
        encoding: TextEncoding,
    ) -> Result<()> {
        self.core.check_open()?;
        let value = match stream::read_text(stream, limit, encoding)? {
            Some(text) => Value::Varchar(Some(text)),
            None => Value::Null,
        };
        self.slots.set(index, value, local_offset())
    }

    /// Reset every slot to null. Slot count and declared types are
    /// untouched.
    pub fn clear_parameters(&mut self) -> Result<()> {
        self.core.check_open()?;
        self.slots.clear();
        Ok(())
    }

    /// Snapshot the live parameter set onto the batch queue and reset the
    /// slots, so later edits never reach the queued entry.
    pub fn add_batch(&mut self) -> Result<()> {
        self.core.check_open()?;
        let snapshot = self.slots.snapshot_and_reset();
        self.batch.push(snapshot);
        Ok(())
    }

    /// Discard all queued entries without executing them.
    pub fn clear_batch(&mut self) -> Result<()> {
        self.core.check_open()?;
        self.batch.clear();
        Ok(())
    }

    pub fn batch_size(&self) -> usize {
        self.batch.len()
    }

    /// Dispatch the queued entries, one round-trip each, in queue order.
    ///
    /// An empty queue returns an empty outcome array with no protocol
    /// interaction. On abort the queue has already been drained and the
    /// raised [`Error::BatchAbort`] carries the partial outcome array.
    pub fn execute_batch<P: Protocol>(&mut self, protocol: &mut P) -> Result<Vec<BatchOutcome>> {
        self.core.check_open()?;
        let entries = self.batch.take();
        let report = run_batch(
            protocol,
            &self.core.name,
            self.slots.declared_types(),
            &self.core.result_fields,
            entries,
            self.core.wants_generated_keys,
            &mut self.core.warnings,
        )?;
        self.core.generated_keys = Some(Rows::new(
            self.core.result_labels(),
            report.generated_keys,
        ));
        Ok(report.outcomes)
    }

    /// Execute the live parameter set in a single dispatch. The slots are
    /// left as they are, so the same set can be executed again.
    pub fn execute<P: Protocol>(&mut self, protocol: &mut P) -> Result<ExecuteResult> {
        self.core.check_open()?;
        let values: crate::ParameterSet = self.slots.values().to_vec().into();
        let mut command = protocol.create_bind_exec(
            None,
            &self.core.name,
            self.slots.declared_types(),
            values,
            &self.core.result_fields,
        );
        let chain = protocol.execute(&mut command, false).inspect_err(|e| {
            log::error!("statement `{}` failed: {e:#}", self.core.name);
        })?;
        self.core.warnings.extend(chain);
        let mut result = ExecuteResult::default();
        if let Some(batch) = command.take_result_batches().into_iter().next() {
            result.update_count = batch.rows_affected;
            result.rows = Some(Rows::new(self.core.result_labels(), batch.rows));
        }
        if self.core.wants_generated_keys {
            self.core.generated_keys = result.rows.clone();
        }
        Ok(result)
    }

    /// Ad-hoc SQL does not belong on a prepared statement.
    pub fn execute_sql(&self, _sql: &str) -> Result<ExecuteResult> {
        Err(Error::NotAllowedOnPrepared)
    }

    pub fn execute_update_sql(&self, _sql: &str) -> Result<u64> {
        Err(Error::NotAllowedOnPrepared)
    }

    pub fn execute_query_sql(&self, _sql: &str) -> Result<Rows> {
        Err(Error::NotAllowedOnPrepared)
    }

    pub fn add_batch_sql(&mut self, _sql: &str) -> Result<()> {
        Err(Error::NotAllowedOnPrepared)
    }

    // Rich column types the protocol mapping does not cover. Rejected
    // outright rather than silently degraded.

    pub fn set_xml(&mut self, _index: usize, _xml: &str) -> Result<()> {
        self.core.check_open()?;
        Err(Error::NotImplemented { what: "XML" })
    }

    pub fn set_row_id(&mut self, _index: usize, _id: &[u8]) -> Result<()> {
        self.core.check_open()?;
        Err(Error::NotImplemented { what: "row id" })
    }

    pub fn set_ref(&mut self, _index: usize, _name: &str) -> Result<()> {
        self.core.check_open()?;
        Err(Error::NotImplemented { what: "row reference" })
    }

    pub fn set_nstring(&mut self, _index: usize, _value: &str) -> Result<()> {
        self.core.check_open()?;
        Err(Error::NotImplemented {
            what: "national character",
        })
    }

    pub fn set_clob<R: Read>(&mut self, _index: usize, _stream: R) -> Result<()> {
        self.core.check_open()?;
        Err(Error::NotImplemented { what: "CLOB" })
    }

    pub fn set_nclob<R: Read>(&mut self, _index: usize, _stream: R) -> Result<()> {
        self.core.check_open()?;
        Err(Error::NotImplemented { what: "NCLOB" })
    }

    pub fn set_ncharacter_stream<R: Read>(&mut self, _index: usize, _stream: R) -> Result<()> {
        self.core.check_open()?;
        Err(Error::NotImplemented {
            what: "national character stream",
        })
    }
}
