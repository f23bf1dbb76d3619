//! JSON file export and import
//!
//! Export writes the whole collection as a pretty-printed JSON array.
//! Import requires a top-level array and hands the raw items to the store,
//! which keeps the valid-shaped ones.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{Quote, ValidationError};

/// Write the collection as a pretty-printed JSON array
pub fn write_quote_file(path: &Path, quotes: &[Quote]) -> Result<()> {
    let json = serde_json::to_string_pretty(quotes).context("Failed to serialize quotes")?;
    fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

/// Read an import file's raw items
///
/// The top-level value must be a JSON array; anything else is a
/// `ValidationError::NotAnArray`. Item shapes are not checked here - the
/// store drops invalid ones and reports the counts.
pub fn read_quote_file(path: &Path) -> Result<Vec<serde_json::Value>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).context("Failed to parse import file as JSON")?;

    match value {
        serde_json::Value::Array(items) => Ok(items),
        _ => Err(ValidationError::NotAnArray.into()),
    }
}
