//! Storage layer
//!
//! Best-effort persistence for the quote collection: a durable slot under
//! the data directory and a session-scoped slot for the last displayed
//! quote. Callers must not assume a write succeeded; the in-memory store is
//! the source of truth.

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::{DurableSlot, SessionSlot};
