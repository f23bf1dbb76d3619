//! Derived category index
//!
//! Categories are a grouping key on quote records, never stored on their
//! own. The set is recomputed from the current records on every call; the
//! collection is small enough that caching would only risk staleness.

use crate::models::Quote;

/// Distinct category values, deduplicated and sorted
///
/// Ordering is case-insensitive with a case-sensitive tiebreak, the closest
/// stable analogue of locale-aware comparison for this data.
pub fn categories_of(quotes: &[Quote]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for quote in quotes {
        if !categories.contains(&quote.category) {
            categories.push(quote.category.clone());
        }
    }
    categories.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuoteId;

    fn quote(category: &str) -> Quote {
        Quote::with_id(QuoteId::fresh_local(), "text", category)
    }

    #[test]
    fn test_sorted_and_deduplicated() {
        let quotes = vec![quote("B"), quote("A"), quote("A")];
        assert_eq!(categories_of(&quotes), vec!["A", "B"]);
    }

    #[test]
    fn test_case_insensitive_ordering() {
        let quotes = vec![quote("banana"), quote("Apple"), quote("cherry")];
        assert_eq!(categories_of(&quotes), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(categories_of(&[]).is_empty());
    }

    #[test]
    fn test_exact_duplicates_only() {
        // "Life" and "life" are distinct values; only exact matches collapse
        let quotes = vec![quote("Life"), quote("life"), quote("Life")];
        assert_eq!(categories_of(&quotes), vec!["Life", "life"]);
    }
}
