//! Book search query validation and result merging.
//!
//! Local matches always come first. The external catalog is consulted only
//! when the local table returns fewer than [`LOCAL_RESULT_THRESHOLD`] hits.

use std::collections::HashSet;

use super::BookSummary;

/// Minimum trimmed query length; shorter queries return no results.
pub const SEARCH_MIN_CHARS: usize = 2;
/// Maximum trimmed query length.
pub const SEARCH_MAX_CHARS: usize = 200;
/// Local hit count at which the external catalog is skipped.
pub const LOCAL_RESULT_THRESHOLD: usize = 5;
/// Row limit for the local title lookup; matches [`LOCAL_RESULT_THRESHOLD`].
pub const LOCAL_SEARCH_LIMIT: i64 = 5;
/// Number of volumes requested from the external catalog.
pub const CATALOG_RESULT_LIMIT: usize = 5;
/// Number of profiles returned by reader search.
pub const USER_SEARCH_LIMIT: i64 = 20;

/// Trimmed free-text query of at least [`SEARCH_MIN_CHARS`] characters.
///
/// # Examples
/// ```
/// use shelfmate::domain::SearchQuery;
///
/// assert!(SearchQuery::parse(" a ").is_none());
/// assert_eq!(SearchQuery::parse(" dune ").map(|q| q.as_str().to_owned()), Some("dune".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Returns `None` for queries too short to search.
    ///
    /// Overlong queries are truncated rather than rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < SEARCH_MIN_CHARS {
            return None;
        }
        Some(Self(trimmed.chars().take(SEARCH_MAX_CHARS).collect()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// `ILIKE` pattern matching the query anywhere, with wildcards escaped.
    pub fn like_pattern(&self) -> String {
        let mut escaped = String::with_capacity(self.0.len() + 2);
        escaped.push('%');
        for c in self.0.chars() {
            if matches!(c, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped.push('%');
        escaped
    }
}

/// True when local results are enough to skip the external catalog.
pub fn local_results_suffice(local: &[BookSummary]) -> bool {
    local.len() >= LOCAL_RESULT_THRESHOLD
}

/// Append external hits after local ones, dropping external volumes whose
/// ISBN is already present locally.
pub fn merge_results(local: Vec<BookSummary>, external: Vec<BookSummary>) -> Vec<BookSummary> {
    let local_isbns: HashSet<String> = local
        .iter()
        .filter_map(|book| book.isbn.as_deref())
        .map(normalize_isbn)
        .collect();
    let mut merged = local;
    merged.extend(external.into_iter().filter(|book| {
        book.isbn
            .as_deref()
            .is_none_or(|isbn| !local_isbns.contains(&normalize_isbn(isbn)))
    }));
    merged
}

fn normalize_isbn(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::BookSource;
    use rstest::rstest;

    fn summary(id: &str, isbn: Option<&str>, source: BookSource) -> BookSummary {
        BookSummary {
            id: id.to_owned(),
            title: format!("Book {id}"),
            author: "Author".to_owned(),
            cover_url: None,
            isbn: isbn.map(str::to_owned),
            publisher: None,
            published_date: None,
            page_count: None,
            description: None,
            source,
        }
    }

    #[rstest]
    #[case("", false)]
    #[case(" x ", false)]
    #[case("xy", true)]
    #[case("  şu  ", true)]
    fn query_requires_two_characters(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(SearchQuery::parse(raw).is_some(), accepted);
    }

    #[rstest]
    fn like_pattern_escapes_wildcards() {
        let query = SearchQuery::parse("50%_off").expect("valid query");
        assert_eq!(query.like_pattern(), "%50\\%\\_off%");
    }

    #[rstest]
    fn merge_keeps_local_first_and_drops_duplicate_isbns() {
        let local = vec![summary("l1", Some("978-0-441-01359-3"), BookSource::Local)];
        let external = vec![
            summary("google_a", Some("9780441013593"), BookSource::Google),
            summary("google_b", None, BookSource::Google),
            summary("google_c", Some("123"), BookSource::Google),
        ];
        let ids: Vec<_> = merge_results(local, external)
            .into_iter()
            .map(|book| book.id)
            .collect();
        assert_eq!(ids, ["l1", "google_b", "google_c"]);
    }

    #[rstest]
    #[case(4, false)]
    #[case(5, true)]
    fn threshold_controls_fallback(#[case] count: usize, #[case] suffice: bool) {
        let local: Vec<_> = (0..count)
            .map(|i| summary(&i.to_string(), None, BookSource::Local))
            .collect();
        assert_eq!(local_results_suffice(&local), suffice);
    }

    #[rstest]
    fn local_limit_matches_threshold() {
        assert_eq!(
            usize::try_from(LOCAL_SEARCH_LIMIT).ok(),
            Some(LOCAL_RESULT_THRESHOLD)
        );
    }
}
