//! Server synchronization
//!
//! Reconciles the local collection against the remote quote collection.
//!
//! ## Cycle
//!
//! 1. Pull a bounded batch from the server
//! 2. Push local-only quotes and promote them to their server ids
//! 3. Merge the pulled batch, server wins on divergence
//! 4. Record the sync time and report a summary
//!
//! ## Usage
//!
//! ```ignore
//! let engine = SyncEngine::new(RemoteClient::from_config(store.config())?);
//! match engine.sync_once(&mut store).await? {
//!     SyncOutcome::Completed(summary) => println!("Synced: {}", summary),
//!     SyncOutcome::SkippedInFlight => {}
//! }
//! ```

mod client;
mod engine;

pub use client::RemoteClient;
pub use engine::{SyncEngine, SyncOutcome, SyncSummary};
