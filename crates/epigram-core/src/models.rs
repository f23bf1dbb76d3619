//! Data model for epigram
//!
//! Defines the quote record and its tagged-origin identifier. A quote is
//! either local-born (created on this machine, not yet acknowledged by the
//! server) or remote-known (carries the server's identifier).

use chrono::{DateTime, TimeZone, Utc};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Prefix used for remote identifiers at the serialization boundary.
///
/// Inside the process the origin is carried by the enum variant; the prefix
/// only exists on disk and on the wire, where ids are plain strings.
const REMOTE_PREFIX: &str = "srv-";

/// Validation failures for user-supplied quote data
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Quote text was empty after trimming
    #[error("Quote text is required.")]
    EmptyText,

    /// Category was empty after trimming
    #[error("Quote category is required.")]
    EmptyCategory,

    /// Import payload was not a JSON array
    #[error("Invalid import payload: expected an array.")]
    NotAnArray,
}

/// Identifier for a quote, tagged with its origin
///
/// `Local` ids are generated on this machine before any remote
/// acknowledgment; `Remote` ids carry the server's native identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QuoteId {
    /// Assigned locally (opaque, UUID v4 text)
    Local(String),
    /// Assigned by the remote collection
    Remote(String),
}

impl QuoteId {
    /// Generate a fresh local-origin id
    pub fn fresh_local() -> Self {
        QuoteId::Local(Uuid::new_v4().to_string())
    }

    /// Wrap a remote identifier
    pub fn remote(raw: impl Into<String>) -> Self {
        QuoteId::Remote(raw.into())
    }

    /// Whether this id is known to the remote collection
    pub fn is_remote(&self) -> bool {
        matches!(self, QuoteId::Remote(_))
    }

    /// Parse the stored string form
    ///
    /// `srv-<raw>` is a remote id; anything else is treated as local, which
    /// keeps ids from older exports importable.
    pub fn parse(s: &str) -> Self {
        match s.strip_prefix(REMOTE_PREFIX) {
            Some(raw) => QuoteId::Remote(raw.to_string()),
            None => QuoteId::Local(s.to_string()),
        }
    }
}

impl std::fmt::Display for QuoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteId::Local(raw) => write!(f, "{}", raw),
            QuoteId::Remote(raw) => write!(f, "{}{}", REMOTE_PREFIX, raw),
        }
    }
}

impl Serialize for QuoteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QuoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(QuoteId::parse(&s))
    }
}

/// A single quote record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    /// Unique identifier, tagged with origin
    pub id: QuoteId,
    /// The quote text
    pub text: String,
    /// Grouping key; the category set is derived from records on demand
    pub category: String,
    /// When this record was created or last overwritten
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    /// Create a new local-origin quote
    ///
    /// Both fields are trimmed; empty values are rejected.
    pub fn new(
        text: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let text = text.into().trim().to_string();
        let category = category.into().trim().to_string();

        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }

        Ok(Self {
            id: QuoteId::fresh_local(),
            text,
            category,
            updated_at: Utc::now(),
        })
    }

    /// Create a quote with a specific id (for seeding and tests)
    pub fn with_id(id: QuoteId, text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            category: category.into(),
            updated_at: Utc::now(),
        }
    }

    /// Build a quote from a loosely-shaped JSON value
    ///
    /// Used when reading stored collections and import files. Items whose
    /// `text` or `category` are not strings are dropped (`None`). A missing
    /// id gets a fresh local one and a missing timestamp gets the current
    /// time. Timestamps are accepted as epoch milliseconds or RFC 3339.
    pub fn from_loose(value: &serde_json::Value) -> Option<Self> {
        let obj = value.as_object()?;
        let text = obj.get("text")?.as_str()?.to_string();
        let category = obj.get("category")?.as_str()?.to_string();

        let id = obj
            .get("id")
            .and_then(serde_json::Value::as_str)
            .map(QuoteId::parse)
            .unwrap_or_else(QuoteId::fresh_local);

        let updated_at = obj
            .get("updatedAt")
            .and_then(loose_timestamp)
            .unwrap_or_else(Utc::now);

        Some(Self {
            id,
            text,
            category,
            updated_at,
        })
    }

    /// Copy of this quote under a new identity with a refreshed timestamp
    ///
    /// Used by the push phase when the server acknowledges a local quote.
    pub fn promoted(&self, id: QuoteId) -> Self {
        Self {
            id,
            text: self.text.clone(),
            category: self.category.clone(),
            updated_at: Utc::now(),
        }
    }

    /// Whether another record carries different content for the same id
    pub fn differs_from(&self, other: &Quote) -> bool {
        self.text != other.text || self.category != other.category
    }
}

/// Parse a timestamp from a loose JSON value
///
/// Accepts epoch milliseconds (the legacy stored format) or an RFC 3339
/// string (the current serialized form).
fn loose_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    if let Some(ms) = value.as_i64() {
        return Utc.timestamp_millis_opt(ms).single();
    }
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
