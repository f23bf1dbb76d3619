//! Remote collection client
//!
//! HTTP client for the mock quote backend. The backend speaks the
//! jsonplaceholder post shape: `title` carries the category and `body`
//! carries the quote text. It assigns ids but has no authoritative
//! timestamp, so pulled quotes are stamped with the local clock.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::{Quote, QuoteId};

/// Request timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Category assigned to remote items with no usable title
const FALLBACK_CATEGORY: &str = "General";

/// Client for the remote quote collection endpoint
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
    pull_limit: usize,
}

/// Payload for creating a post from a local quote
#[derive(Serialize)]
struct NewPost<'a> {
    title: &'a str,
    body: &'a str,
}

/// A post as returned by the collection endpoint
#[derive(Deserialize)]
struct RemotePost {
    id: serde_json::Number,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
}

/// Create response; some backends omit the assigned id
#[derive(Deserialize)]
struct CreatedPost {
    #[serde(default)]
    id: Option<serde_json::Number>,
}

impl RemoteClient {
    /// Create a client for the given backend
    pub fn new(base_url: &str, pull_limit: usize) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT))
            .user_agent("epigram/0.4")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            pull_limit,
        })
    }

    /// Create a client from the application configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.server_url, config.pull_limit)
    }

    /// Pull a bounded batch of quotes from the collection
    pub async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
        let url = format!("{}/posts?_limit={}", self.base_url, self.pull_limit);

        let posts: Vec<RemotePost> = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to reach the quote server")?
            .error_for_status()
            .context("Quote server rejected the fetch")?
            .json()
            .await
            .context("Failed to parse fetched quotes")?;

        Ok(posts.into_iter().map(RemotePost::into_quote).collect())
    }

    /// Create a local quote on the server, returning its assigned id
    ///
    /// Falls back to a fresh local id when the response omits one.
    pub async fn create_quote(&self, quote: &Quote) -> Result<QuoteId> {
        let url = format!("{}/posts", self.base_url);

        let created: CreatedPost = self
            .http
            .post(&url)
            .json(&NewPost {
                title: &quote.category,
                body: &quote.text,
            })
            .send()
            .await
            .context("Failed to reach the quote server")?
            .error_for_status()
            .context("Quote server rejected the create")?
            .json()
            .await
            .context("Failed to parse create response")?;

        Ok(match created.id {
            Some(id) => QuoteId::remote(id.to_string()),
            None => QuoteId::fresh_local(),
        })
    }
}

impl RemotePost {
    /// Map the backend's post shape into the local record shape
    fn into_quote(self) -> Quote {
        let category = if self.title.is_empty() {
            FALLBACK_CATEGORY.to_string()
        } else {
            self.title
        };

        Quote {
            id: QuoteId::remote(self.id.to_string()),
            text: self.body,
            category,
            updated_at: Utc::now(),
        }
    }
}
