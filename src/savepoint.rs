use crate::{Error, Result};
use std::fmt::{self, Display};

/// Reference to a savepoint established in the owning session.
///
/// A savepoint is created holding either a numeric identity (automatic
/// savepoints) or a name, and consults only the one it was created with.
/// Invalidation, e.g. after the savepoint is released or rolled over by the
/// transaction, clears both fields permanently; there is no way back to a
/// valid state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Savepoint {
    id: Option<u32>,
    name: Option<String>,
}

impl Savepoint {
    pub fn numeric(id: u32) -> Self {
        Self {
            id: Some(id),
            name: None,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    pub fn id(&self) -> Result<u32> {
        self.id
            .ok_or(Error::SavepointState("named savepoints have no id"))
    }

    pub fn name(&self) -> Result<&str> {
        self.name
            .as_deref()
            .ok_or(Error::SavepointState("automatic savepoints have no name"))
    }

    pub fn is_valid(&self) -> bool {
        self.id.is_some() || self.name.is_some()
    }

    /// Clear both identities. Terminal: every later accessor fails and
    /// `is_valid` stays false.
    pub fn invalidate(&mut self) {
        self.id = None;
        self.name = None;
    }
}

impl Display for Savepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, self.id) {
            (Some(name), _) => write!(f, "{name}"),
            (None, Some(id)) => write!(f, "{id}"),
            (None, None) => write!(f, "<invalidated>"),
        }
    }
}

/// Issues savepoint identities for one session. Numeric ids are handed out
/// from a monotonically increasing counter so every automatic savepoint in
/// the session is distinct.
#[derive(Debug, Default)]
pub struct SavepointRegistry {
    next_id: u32,
}

impl SavepointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> Savepoint {
        let id = self.next_id;
        self.next_id += 1;
        Savepoint::numeric(id)
    }

    pub fn create_named(&mut self, name: impl Into<String>) -> Savepoint {
        Savepoint::named(name)
    }

    /// Invalidate a savepoint that is being released or rolled back over.
    pub fn release(&mut self, savepoint: &mut Savepoint) -> Result<()> {
        if !savepoint.is_valid() {
            return Err(Error::SavepointState("the savepoint is already invalid"));
        }
        savepoint.invalidate();
        Ok(())
    }
}
