//! Unified store interface
//!
//! The `QuoteStore` owns the in-memory quote collection and coordinates the
//! persistence slots. All mutation goes through its operations; nothing
//! outside this module touches the backing collection directly.
//!
//! Persistence is best-effort: every mutating operation attempts a save,
//! but the in-memory collection stays authoritative whether or not the
//! write lands.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = QuoteStore::open()?;
//!
//! let quote = store.add("First, solve the problem.", "Programming")?;
//! let categories = store.categories();
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;

use crate::category::categories_of;
use crate::config::Config;
use crate::models::{Quote, QuoteId, ValidationError};
use crate::storage::{DurableSlot, SessionSlot, StorageError};

/// Filter value stored when no category is selected
const FILTER_ALL: &str = "all";

/// Outcome of an import: how many items were kept and how many dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Valid-shaped items appended to the store
    pub added: usize,
    /// Items dropped for not having string `text` and `category`
    pub skipped: usize,
}

/// Owned, encapsulated quote collection
pub struct QuoteStore {
    /// Records in insertion order
    quotes: Vec<Quote>,
    /// Durable slot: collection, filter selection, last-sync marker
    durable: DurableSlot,
    /// Session slot: last displayed quote
    session: SessionSlot,
}

impl QuoteStore {
    /// Open the store, seeding the starter collection on first run
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Ok(Self::open_with_config(config))
    }

    /// Open the store with a specific configuration
    ///
    /// Loads the stored collection if one is readable; otherwise starts
    /// from the built-in starter quotes and persists them.
    pub fn open_with_config(config: Config) -> Self {
        let session = SessionSlot::new(config.session_quote_path());
        let mut durable = DurableSlot::new(config);

        let quotes = match durable.load_quotes() {
            Some(stored) => stored,
            None => {
                let seeded = starter_quotes();
                durable.save_quotes(&seeded);
                seeded
            }
        };

        Self {
            quotes,
            durable,
            session,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        self.durable.config()
    }

    // ==================== Quote Operations ====================

    /// Add a new local-origin quote
    ///
    /// Validates that text and category are non-empty after trimming; on
    /// failure the store is unchanged.
    pub fn add(
        &mut self,
        text: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Quote, ValidationError> {
        let quote = Quote::new(text, category)?;
        self.quotes.push(quote.clone());
        self.persist();
        Ok(quote)
    }

    /// All quotes in insertion order
    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    /// Atomically replace the full collection (used after sync reconciliation)
    pub fn replace_all(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
        self.persist();
    }

    /// Look up a quote by id
    pub fn find_by_id(&self, id: &QuoteId) -> Option<&Quote> {
        self.quotes.iter().find(|q| &q.id == id)
    }

    /// Append valid-shaped items from an import payload
    ///
    /// Items without string `text` and `category` are dropped; missing ids
    /// and timestamps are backfilled. The collection is persisted once.
    pub fn import(&mut self, items: &[serde_json::Value]) -> ImportReport {
        let mut added = 0;
        for item in items {
            if let Some(quote) = Quote::from_loose(item) {
                self.quotes.push(quote);
                added += 1;
            }
        }
        self.persist();
        ImportReport {
            added,
            skipped: items.len() - added,
        }
    }

    // ==================== Category Operations ====================

    /// Distinct categories, sorted and deduplicated (recomputed per call)
    pub fn categories(&self) -> Vec<String> {
        categories_of(&self.quotes)
    }

    /// Quotes in a category, or the full collection for `None`
    pub fn quotes_in(&self, category: Option<&str>) -> Vec<&Quote> {
        match category {
            Some(wanted) => self
                .quotes
                .iter()
                .filter(|q| q.category == wanted)
                .collect(),
            None => self.quotes.iter().collect(),
        }
    }

    /// Uniform random pick from the category's pool
    pub fn random_quote(&self, category: Option<&str>) -> Option<&Quote> {
        self.quotes_in(category)
            .choose(&mut rand::thread_rng())
            .copied()
    }

    // ==================== Filter Selection ====================

    /// The persisted category filter, `None` meaning "all categories"
    pub fn selected_category(&self) -> Option<String> {
        self.durable
            .load_filter()
            .filter(|value| value != FILTER_ALL)
    }

    /// Persist the category filter selection
    pub fn select_category(&mut self, category: Option<&str>) {
        self.durable.save_filter(category.unwrap_or(FILTER_ALL));
    }

    // ==================== Session ====================

    /// Record the most recently displayed quote for this session
    pub fn record_displayed(&mut self, quote: &Quote) {
        self.session.save(quote);
    }

    /// The quote last displayed this session, if any
    pub fn last_displayed(&self) -> Option<Quote> {
        self.session.load()
    }

    // ==================== Sync Bookkeeping ====================

    /// When the last successful sync cycle finished
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.durable.load_last_sync()
    }

    /// Record a successful sync cycle
    pub fn set_last_sync(&mut self, at: DateTime<Utc>) {
        self.durable.save_last_sync(at);
    }

    // ==================== Persistence ====================

    /// The most recent durable write failure, if the last write was skipped
    ///
    /// Best-effort contract: callers must not assume a write succeeded, and
    /// core logic never depends on it. This exists for diagnostics.
    pub fn last_persist_error(&self) -> Option<&StorageError> {
        self.durable.last_write_error()
    }

    fn persist(&mut self) {
        self.durable.save_quotes(&self.quotes);
    }
}

/// The collection a fresh install starts with
fn starter_quotes() -> Vec<Quote> {
    [
        (
            "local-1",
            "The secret of getting ahead is getting started.",
            "Motivation",
        ),
        (
            "local-2",
            "In the middle of difficulty lies opportunity.",
            "Inspiration",
        ),
        (
            "local-3",
            "Simplicity is the soul of efficiency.",
            "Productivity",
        ),
        (
            "local-4",
            "Code is like humor. When you have to explain it, it's bad.",
            "Programming",
        ),
        (
            "local-5",
            "First, solve the problem. Then, write the code.",
            "Programming",
        ),
    ]
    .into_iter()
    .map(|(id, text, category)| Quote::with_id(QuoteId::Local(id.to_string()), text, category))
    .collect()
}
