use crate::{Error, Result, Value};
use std::{mem, sync::Arc};

/// An ordered sequence of bound values, one per slot, frozen at a point in
/// time. Snapshots queued for batch execution are never touched again by
/// later edits of the live slots.
pub type ParameterSet = Box<[Value]>;

/// Positional storage of a prepared statement's bound parameter values.
///
/// The slot count is fixed at construction to the statement's declared
/// parameter count and never changes. Indexes at the API surface are
/// 1-based, matching the placeholder numbering of the SQL text.
#[derive(Debug)]
pub struct ParameterSlots {
    types: Arc<[Value]>,
    values: Box<[Value]>,
}

impl ParameterSlots {
    pub fn new(types: Arc<[Value]>) -> Self {
        let values = vec![Value::Null; types.len()].into();
        Self { types, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn declared_types(&self) -> &[Value] {
        &self.types
    }

    fn check_index(&self, index: usize) -> Result<usize> {
        if index < 1 || index > self.values.len() {
            return Err(Error::ParameterIndexOutOfBounds {
                index,
                count: self.values.len(),
            });
        }
        Ok(index - 1)
    }

    /// Bind `value` at the 1-based `index`, coercing it to the slot's
    /// declared type. `Value::Null` is stored as-is without a coercion
    /// call. Overwrites whatever the slot held.
    pub fn set(&mut self, index: usize, value: Value, zone: time::UtcOffset) -> Result<()> {
        let index = self.check_index(index)?;
        let value = if let Value::Null = value {
            value
        } else {
            value.try_coerce(&self.types[index], zone)?
        };
        self.values[index] = value;
        Ok(())
    }

    /// Reset every slot to null. Count and declared types are untouched.
    pub fn clear(&mut self) {
        for value in &mut self.values {
            *value = Value::Null;
        }
    }

    /// Return the current set and install a fresh all-null set of the same
    /// size, so edits made after queuing never reach the returned snapshot.
    pub fn snapshot_and_reset(&mut self) -> ParameterSet {
        let fresh = vec![Value::Null; self.values.len()].into();
        mem::replace(&mut self.values, fresh)
    }

    /// Read-only view of the live set, for immediate execution.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}
