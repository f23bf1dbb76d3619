//! Quote command handlers

use anyhow::{bail, Result};

use epigram_core::QuoteStore;

use crate::output::Output;

/// Show a random quote from the active filter's pool
///
/// `--category` narrows the pool and becomes the persisted filter;
/// `--all` clears the filter. With neither, the saved filter applies.
/// The displayed quote is recorded in the session slot.
pub fn show(
    store: &mut QuoteStore,
    category: Option<String>,
    all: bool,
    output: &Output,
) -> Result<()> {
    let filter = if all {
        store.select_category(None);
        None
    } else if let Some(category) = category {
        store.select_category(Some(&category));
        Some(category)
    } else {
        store.selected_category()
    };

    match store.random_quote(filter.as_deref()).cloned() {
        Some(quote) => {
            output.print_quote(&quote);
            store.record_displayed(&quote);
        }
        None => {
            output.message("No quote found for this category.");
        }
    }

    Ok(())
}

/// Show the quote displayed last in this session
pub fn last(store: &QuoteStore, output: &Output) -> Result<()> {
    match store.last_displayed() {
        Some(quote) => output.print_quote(&quote),
        None => output.message("No quote displayed yet this session."),
    }
    Ok(())
}

/// Add a new quote
pub fn add(store: &mut QuoteStore, text: String, category: String, output: &Output) -> Result<()> {
    let quote = match store.add(text, category) {
        Ok(quote) => quote,
        Err(e) => bail!("{}", e),
    };

    output.success("Quote added locally. It will sync with the server shortly.");
    output.print_quote(&quote);

    Ok(())
}

/// List quotes, optionally filtered by category
pub fn list(store: &QuoteStore, category: Option<String>, output: &Output) -> Result<()> {
    let quotes = store.quotes_in(category.as_deref());
    output.print_quotes(&quotes);
    Ok(())
}
