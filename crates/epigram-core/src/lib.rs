//! Epigram Core Library
//!
//! This crate provides the core functionality for epigram, a quote
//! collection manager with category filtering and server-wins sync against
//! a mock REST backend.
//!
//! # Architecture
//!
//! The in-memory `QuoteStore` is the source of truth. Persistence is a
//! best-effort adapter underneath it; the sync engine reconciles the store
//! against the remote collection. Rendering lives in the CLI crate and is
//! deliberately absent here - callers read snapshots through the store's
//! query operations.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = QuoteStore::open()?;
//!
//! // Add a quote
//! let quote = store.add("First, solve the problem.", "Programming")?;
//!
//! // Query
//! let categories = store.categories();
//! let pick = store.random_quote(Some("Programming"));
//! ```
//!
//! # Modules
//!
//! - `store`: owned quote collection (main entry point)
//! - `models`: quote record and tagged-origin identifier
//! - `category`: derived category index
//! - `storage`: durable and session persistence slots
//! - `sync`: remote client and pull/push/merge engine
//! - `transfer`: JSON file export/import
//! - `config`: application configuration

pub mod category;
pub mod config;
pub mod models;
pub mod storage;
pub mod store;
pub mod sync;
pub mod transfer;

pub use category::categories_of;
pub use config::Config;
pub use models::{Quote, QuoteId, ValidationError};
pub use storage::{DurableSlot, SessionSlot, StorageError};
pub use store::{ImportReport, QuoteStore};
pub use sync::{RemoteClient, SyncEngine, SyncOutcome, SyncSummary};
