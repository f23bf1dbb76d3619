//! Sync cycle orchestration
//!
//! One cycle runs four sequential phases:
//!
//! 1. **Pull** - fetch a bounded batch from the remote collection
//! 2. **Push** - create every local-only quote on the server and replace it
//!    with its promoted copy; already-remote quotes are untouched
//! 3. **Merge** - server-wins reconciliation of the pulled batch
//! 4. **Finalize** - record the sync time and report a summary
//!
//! A failure in any phase aborts the rest of the cycle; progress from the
//! phases that completed stays applied (no rollback). The engine is
//! single-flight: a cycle requested while one is active is dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::models::{Quote, QuoteId};
use crate::store::QuoteStore;

use super::client::RemoteClient;

/// What a completed sync cycle changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Quotes fetched from the server
    pub pulled: usize,
    /// Local-only quotes created on the server
    pub pushed: usize,
    /// Server quotes inserted locally
    pub added: usize,
    /// Diverging local quotes overwritten by the server copy
    pub conflicts: usize,
}

impl SyncSummary {
    /// Whether the merge left the collection as it was
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.conflicts == 0
    }
}

impl std::fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_noop() {
            write!(f, "no changes")
        } else {
            write!(
                f,
                "{} new from server, {} conflict{} resolved (server wins)",
                self.added,
                self.conflicts,
                if self.conflicts == 1 { "" } else { "s" }
            )
        }
    }
}

/// Result of asking the engine for a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The cycle ran to completion
    Completed(SyncSummary),
    /// Another cycle was already in flight; this request was dropped
    SkippedInFlight,
}

/// Pull/push/merge engine over the remote quote collection
pub struct SyncEngine {
    client: RemoteClient,
    in_flight: AtomicBool,
}

impl SyncEngine {
    /// Create an engine over the given client
    pub fn new(client: RemoteClient) -> Self {
        Self {
            client,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Run one sync cycle against the store
    ///
    /// Returns `SkippedInFlight` without touching the store if a cycle is
    /// already active. Any phase failure aborts the remaining phases; the
    /// in-flight flag is released on every exit path.
    pub async fn sync_once(&self, store: &mut QuoteStore) -> Result<SyncOutcome> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            warn!("sync cycle already in flight, dropping this trigger");
            return Ok(SyncOutcome::SkippedInFlight);
        };

        info!("sync cycle started");

        // 1. Pull
        let remote = self
            .client
            .fetch_quotes()
            .await
            .context("Pull phase failed")?;
        debug!("pulled {} quotes from server", remote.len());

        // 2. Push
        let pushed = self
            .push_local_only(store)
            .await
            .context("Push phase failed")?;

        // 3. Merge (server wins)
        let (added, conflicts) = merge_server_wins(store, &remote);

        // 4. Finalize
        store.set_last_sync(Utc::now());

        let summary = SyncSummary {
            pulled: remote.len(),
            pushed,
            added,
            conflicts,
        };
        info!(
            "sync cycle complete: pulled={} pushed={} added={} conflicts={}",
            summary.pulled, summary.pushed, summary.added, summary.conflicts
        );

        Ok(SyncOutcome::Completed(summary))
    }

    /// Create every local-only quote on the server
    ///
    /// Each acknowledged quote is replaced by a promoted copy carrying the
    /// server's id; the already-remote subset is left untouched. Returns
    /// the number of quotes pushed.
    async fn push_local_only(&self, store: &mut QuoteStore) -> Result<usize> {
        let local_only: Vec<Quote> = store
            .all()
            .iter()
            .filter(|q| !q.id.is_remote())
            .cloned()
            .collect();

        if local_only.is_empty() {
            return Ok(0);
        }

        let mut promoted = Vec::with_capacity(local_only.len());
        for quote in &local_only {
            let id = self.client.create_quote(quote).await?;
            promoted.push(quote.promoted(id));
        }

        let pushed = promoted.len();
        let mut next: Vec<Quote> = store
            .all()
            .iter()
            .filter(|q| q.id.is_remote())
            .cloned()
            .collect();
        next.extend(promoted);
        store.replace_all(next);

        debug!("pushed {} local quotes to server", pushed);
        Ok(pushed)
    }
}

/// Server-wins reconciliation of a pulled batch into the store
///
/// A pulled quote absent locally is appended; one present with diverging
/// content overwrites the local copy. Returns `(added, conflicts)`.
fn merge_server_wins(store: &mut QuoteStore, remote: &[Quote]) -> (usize, usize) {
    let mut merged: Vec<Quote> = store.all().to_vec();
    let mut index: HashMap<QuoteId, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, q)| (q.id.clone(), i))
        .collect();

    let mut added = 0;
    let mut conflicts = 0;

    for incoming in remote {
        match index.get(&incoming.id) {
            None => {
                index.insert(incoming.id.clone(), merged.len());
                merged.push(incoming.clone());
                added += 1;
            }
            Some(&at) => {
                if merged[at].differs_from(incoming) {
                    merged[at].text = incoming.text.clone();
                    merged[at].category = incoming.category.clone();
                    merged[at].updated_at = incoming.updated_at;
                    conflicts += 1;
                }
            }
        }
    }

    store.replace_all(merged);
    (added, conflicts)
}

/// Clears the in-flight flag when the cycle exits, success or not
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
            .then(|| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn test_store(temp_dir: &TempDir) -> QuoteStore {
        QuoteStore::open_with_config(Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        })
    }

    fn remote_quote(id: &str, text: &str, category: &str) -> Quote {
        Quote::with_id(QuoteId::remote(id), text, category)
    }

    #[test]
    fn test_merge_addition() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        store.replace_all(vec![remote_quote("1", "A", "X")]);

        let (added, conflicts) = merge_server_wins(&mut store, &[remote_quote("9", "new", "Y")]);

        assert_eq!((added, conflicts), (1, 0));
        assert!(store.find_by_id(&QuoteId::remote("9")).is_some());
    }

    #[test]
    fn test_merge_conflict_server_wins() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        store.replace_all(vec![remote_quote("1", "A", "X")]);

        let (added, conflicts) = merge_server_wins(&mut store, &[remote_quote("1", "B", "X")]);

        assert_eq!((added, conflicts), (0, 1));
        assert_eq!(store.find_by_id(&QuoteId::remote("1")).unwrap().text, "B");
    }

    #[test]
    fn test_merge_identical_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        store.replace_all(vec![remote_quote("1", "A", "X")]);

        let (added, conflicts) = merge_server_wins(&mut store, &[remote_quote("1", "A", "X")]);

        assert_eq!((added, conflicts), (0, 0));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        store.replace_all(vec![remote_quote("1", "A", "X")]);

        let batch = vec![
            remote_quote("1", "B", "X"),
            remote_quote("2", "fresh", "Y"),
        ];

        let first = merge_server_wins(&mut store, &batch);
        assert_eq!(first, (1, 1));
        let after_first: Vec<Quote> = store.all().to_vec();

        let second = merge_server_wins(&mut store, &batch);
        assert_eq!(second, (0, 0));
        assert_eq!(store.all(), after_first.as_slice());
    }

    #[test]
    fn test_merge_local_quotes_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let local = Quote::new("mine", "Local").unwrap();
        store.replace_all(vec![local.clone()]);

        merge_server_wins(&mut store, &[remote_quote("1", "theirs", "X")]);

        assert_eq!(store.find_by_id(&local.id), Some(&local));
        assert_eq!(store.all().len(), 2);
    }

    #[test]
    fn test_summary_wording() {
        assert_eq!(SyncSummary::default().to_string(), "no changes");
        assert_eq!(
            SyncSummary {
                pulled: 5,
                pushed: 0,
                added: 2,
                conflicts: 1
            }
            .to_string(),
            "2 new from server, 1 conflict resolved (server wins)"
        );
        assert_eq!(
            SyncSummary {
                pulled: 5,
                pushed: 0,
                added: 0,
                conflicts: 3
            }
            .to_string(),
            "0 new from server, 3 conflicts resolved (server wins)"
        );
    }

    #[tokio::test]
    async fn test_pull_failure_leaves_store_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let before: Vec<Quote> = store.all().to_vec();

        // Nothing listens here; the pull phase fails immediately
        let engine = SyncEngine::new(RemoteClient::new("http://127.0.0.1:9", 5).unwrap());
        let result = engine.sync_once(&mut store).await;

        assert!(result.is_err());
        assert_eq!(store.all(), before.as_slice());
        assert!(store.last_sync().is_none());
    }

    #[tokio::test]
    async fn test_in_flight_cycle_is_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);

        let engine = SyncEngine::new(RemoteClient::new("http://127.0.0.1:9", 5).unwrap());
        engine.in_flight.store(true, Ordering::SeqCst);

        let outcome = engine.sync_once(&mut store).await.unwrap();
        assert_eq!(outcome, SyncOutcome::SkippedInFlight);

        // The dropped request must not release the active cycle's flag
        assert!(engine.in_flight.load(Ordering::SeqCst));
    }
}
