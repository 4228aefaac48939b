//! Parameter binding and batch execution engine for prepared statements
//! sitting above a PostgreSQL-style wire protocol. The protocol itself is a
//! collaborator behind the [`Protocol`] trait; this crate owns typed slot
//! storage, stream materialization, batch accumulation and dispatch, and
//! savepoint lifecycle tracking.
mod batch;
mod coerce;
mod error;
mod protocol;
mod savepoint;
mod slots;
mod statement;
mod stream;
mod value;

pub use batch::*;
pub use coerce::local_offset;
pub use error::*;
pub use protocol::*;
pub use savepoint::*;
pub use slots::*;
pub use statement::*;
pub use stream::*;
pub use value::*;
