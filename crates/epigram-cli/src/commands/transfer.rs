//! Export and import command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};

use epigram_core::{transfer, QuoteStore};

use crate::output::Output;

/// Export the collection to a JSON file
pub fn export(store: &QuoteStore, path: PathBuf, output: &Output) -> Result<()> {
    transfer::write_quote_file(&path, store.all()).context("Failed to export quotes")?;

    output.success(&format!(
        "Exported {} quote(s) to {}",
        store.all().len(),
        path.display()
    ));
    Ok(())
}

/// Import quotes from a JSON file
///
/// The file must contain a JSON array; valid-shaped items are kept even
/// when siblings are dropped.
pub fn import(store: &mut QuoteStore, path: PathBuf, output: &Output) -> Result<()> {
    let items = transfer::read_quote_file(&path)?;
    let report = store.import(&items);

    output.success("Quotes imported successfully!");
    if report.skipped > 0 {
        output.message(&format!(
            "Imported {} quote(s), skipped {} invalid item(s).",
            report.added, report.skipped
        ));
    } else {
        output.message(&format!("Imported {} quote(s).", report.added));
    }
    Ok(())
}
