//! Category command handlers

use anyhow::Result;

use epigram_core::QuoteStore;

use crate::output::Output;

/// List all categories derived from the current collection
pub fn list(store: &QuoteStore, output: &Output) -> Result<()> {
    let categories = store.categories();
    output.print_categories(&categories);
    Ok(())
}
