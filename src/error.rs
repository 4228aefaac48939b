use crate::BatchOutcome;
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything in here is a terminal condition for the operation that raised
/// it; no variant is retried internally.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller addressed a parameter slot outside `1..=count`.
    #[error("parameter index {index} is out of bounds (1..={count})")]
    ParameterIndexOutOfBounds { index: usize, count: usize },

    /// A bound value cannot be represented as the declared parameter type.
    #[error("cannot coerce {value} into {target}")]
    TypeCoercion { value: String, target: &'static str },

    /// Nonsensical declared stream length, e.g. a missing stream paired with
    /// a non-zero declared length.
    #[error("invalid declared stream length {declared}")]
    InvalidStreamLength { declared: u64 },

    /// The stream was exhausted before producing the declared number of
    /// bytes or characters.
    #[error("stream produced {actual} of {declared} declared units")]
    StreamLengthMismatch { declared: u64, actual: u64 },

    /// I/O failure while draining a parameter stream.
    #[error("failed to drain parameter stream")]
    StreamRead(#[from] io::Error),

    /// Ad-hoc SQL execution attempted through a prepared statement.
    #[error("operation not allowed on a prepared statement")]
    NotAllowedOnPrepared,

    /// Explicitly unsupported parameter kind.
    #[error("{what} parameters are not supported")]
    NotImplemented { what: &'static str },

    /// A batch entry produced an unexpected or absent result shape, or its
    /// round-trip failed. Carries the outcomes recorded before the abort so
    /// the caller can tell applied entries from unattempted ones.
    #[error("batch aborted at entry {entry}: {reason}")]
    BatchAbort {
        entry: usize,
        reason: String,
        outcomes: Vec<BatchOutcome>,
    },

    /// Access to an identity the savepoint does not hold, or any access
    /// after invalidation.
    #[error("{0}")]
    SavepointState(&'static str),

    /// The statement was closed; all parameter and batch state is gone.
    #[error("the statement is closed")]
    StatementClosed,

    /// Transport or protocol failure surfaced by the command layer.
    #[error("protocol failure: {0}")]
    Protocol(String),
}

impl Error {
    pub(crate) fn coercion(value: &crate::Value, target: &crate::Value) -> Self {
        Error::TypeCoercion {
            value: format!("{} `{}`", value.type_name(), value),
            target: target.type_name(),
        }
    }
}
