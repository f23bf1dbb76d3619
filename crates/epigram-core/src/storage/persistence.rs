//! Quote collection persistence
//!
//! Two independent slots back the in-memory store:
//!
//! - `DurableSlot` - the full quote collection, the selected category
//!   filter, and the last successful sync marker, as files under the data
//!   directory. Uses atomic writes (write to temp file, then rename).
//! - `SessionSlot` - the single most-recently-displayed quote, under the
//!   system temp directory so it does not outlive the machine session.
//!
//! Persistence is best-effort: reads fall back to empty/absent results and
//! writes swallow failures. The in-memory store stays the source of truth
//! either way. The most recent write failure is retained on the slot and
//! can be inspected with `last_write_error`.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use crate::config::Config;
use crate::models::Quote;
use crate::storage::error::{StorageError, StorageResult};

/// Durable storage slot for the quote collection and its side-car keys
pub struct DurableSlot {
    config: Config,
    last_write: Option<StorageError>,
}

impl DurableSlot {
    /// Create a slot over the configured data directory
    pub fn new(config: Config) -> Self {
        Self {
            config,
            last_write: None,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if a stored collection exists on disk
    pub fn exists(&self) -> bool {
        self.config.quotes_path().exists()
    }

    /// The most recent write failure, if the last write did not succeed
    pub fn last_write_error(&self) -> Option<&StorageError> {
        self.last_write.as_ref()
    }

    /// Load the stored quote collection
    ///
    /// Returns `None` when no readable collection exists (missing file,
    /// corrupt payload, or a non-array top level), letting the caller fall
    /// back to its defaults. Partially-invalid entries are dropped and
    /// missing ids/timestamps are backfilled.
    pub fn load_quotes(&self) -> Option<Vec<Quote>> {
        let path = self.config.quotes_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("no stored quotes at {:?}: {}", path, e);
                return None;
            }
        };

        let parsed: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                debug!("corrupt quote collection at {:?}: {}", path, e);
                return None;
            }
        };

        let items = parsed.as_array()?;
        Some(items.iter().filter_map(Quote::from_loose).collect())
    }

    /// Persist the quote collection, best-effort
    pub fn save_quotes(&mut self, quotes: &[Quote]) {
        let result = self.try_save_quotes(quotes);
        self.record(result);
    }

    fn try_save_quotes(&self, quotes: &[Quote]) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(quotes)?;
        atomic_write(&self.config.quotes_path(), json.as_bytes())
    }

    /// Load the persisted category filter selection
    pub fn load_filter(&self) -> Option<String> {
        let value = fs::read_to_string(self.config.filter_path()).ok()?;
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// Persist the category filter selection, best-effort
    pub fn save_filter(&mut self, value: &str) {
        let result = atomic_write(&self.config.filter_path(), value.as_bytes());
        self.record(result);
    }

    /// Load the last successful sync time
    ///
    /// Stored as stringified epoch milliseconds.
    pub fn load_last_sync(&self) -> Option<DateTime<Utc>> {
        let raw = fs::read_to_string(self.config.last_sync_path()).ok()?;
        let millis: i64 = raw.trim().parse().ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }

    /// Persist the last successful sync time, best-effort
    pub fn save_last_sync(&mut self, at: DateTime<Utc>) {
        let result = atomic_write(
            &self.config.last_sync_path(),
            at.timestamp_millis().to_string().as_bytes(),
        );
        self.record(result);
    }

    fn record(&mut self, result: StorageResult<()>) {
        match result {
            Ok(()) => self.last_write = None,
            Err(e) => {
                debug!("durable write skipped: {}", e);
                self.last_write = Some(e);
            }
        }
    }
}

/// Session-scoped slot for the last displayed quote
pub struct SessionSlot {
    path: PathBuf,
    last_write: Option<StorageError>,
}

impl SessionSlot {
    /// Create a slot at the given path
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            last_write: None,
        }
    }

    /// The most recent write failure, if the last write did not succeed
    pub fn last_write_error(&self) -> Option<&StorageError> {
        self.last_write.as_ref()
    }

    /// Load the last displayed quote, if one was recorded this session
    pub fn load(&self) -> Option<Quote> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let value: serde_json::Value = serde_json::from_str(&raw).ok()?;
        Quote::from_loose(&value)
    }

    /// Record the last displayed quote, best-effort
    pub fn save(&mut self, quote: &Quote) {
        let result = serde_json::to_string(quote)
            .map_err(StorageError::from)
            .and_then(|json| atomic_write(&self.path, json.as_bytes()));

        match result {
            Ok(()) => self.last_write = None,
            Err(e) => {
                debug!("session write skipped: {}", e);
                self.last_write = Some(e);
            }
        }
    }

    /// Forget the recorded quote
    pub fn clear(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;

    Ok(())
}
