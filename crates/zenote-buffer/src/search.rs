//! In-note search.
//!
//! Matching is a plain case-insensitive substring scan. Matches are
//! non-overlapping: after a hit the scan resumes at the end of that hit,
//! so searching "aa" in "aaaa" yields two matches, not three.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::Selection;

/// A hit, as char offsets into the searched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    /// First char of the hit
    pub start: usize,
    /// One past the last char
    pub end: usize,
}

impl Match {
    /// Length of the hit in chars.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Never true: empty queries produce no matches.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// The hit as a selection, for highlighting.
    pub fn selection(&self) -> Selection {
        Selection::new(self.start, self.end)
    }
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Finds every non-overlapping, case-insensitive occurrence of `query`.
///
/// Matches come back in ascending order. An empty query matches nothing.
pub fn find(query: &str, text: &str) -> Vec<Match> {
    let needle: Vec<char> = query.chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let haystack: Vec<char> = text.chars().collect();
    let mut matches = Vec::new();
    let mut i = 0;

    while i + needle.len() <= haystack.len() {
        let hit = haystack[i..i + needle.len()]
            .iter()
            .zip(&needle)
            .all(|(&a, &b)| chars_eq_ignore_case(a, b));

        if hit {
            matches.push(Match {
                start: i,
                end: i + needle.len(),
            });
            i += needle.len();
        } else {
            i += 1;
        }
    }

    matches
}

fn fingerprint(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

/// Search state for one open note: query, matches and the current hit.
///
/// Matches are only meaningful for the exact text they were computed
/// from. The index remembers a fingerprint of that text so callers can
/// check [`SearchIndex::is_stale`] before navigating.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    query: String,
    matches: Vec<Match>,
    current: Option<usize>,
    source: Option<u64>,
}

impl SearchIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `query` against `text` and moves to the first hit.
    ///
    /// An empty query clears the matches and the current hit.
    pub fn search(&mut self, query: &str, text: &str) -> &[Match] {
        self.query = query.to_string();
        self.matches = find(query, text);
        self.current = if self.matches.is_empty() { None } else { Some(0) };
        self.source = Some(fingerprint(text));

        tracing::debug!(query, matches = self.matches.len(), "search updated");
        &self.matches
    }

    /// Re-runs the stored query against changed text.
    pub fn refresh(&mut self, text: &str) -> &[Match] {
        let query = std::mem::take(&mut self.query);
        self.search(&query, text)
    }

    /// Forgets the query and all matches.
    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.current = None;
        self.source = None;
    }

    /// Moves to the next hit, wrapping from the last to the first.
    pub fn next(&mut self) -> Option<Match> {
        let len = self.matches.len();
        let current = self.current?;
        self.current = Some(if current + 1 == len { 0 } else { current + 1 });
        self.current_match()
    }

    /// Moves to the previous hit, wrapping from the first to the last.
    pub fn previous(&mut self) -> Option<Match> {
        let len = self.matches.len();
        let current = self.current?;
        self.current = Some(if current == 0 { len - 1 } else { current - 1 });
        self.current_match()
    }

    /// The hit the cursor is on.
    pub fn current_match(&self) -> Option<Match> {
        self.current.and_then(|i| self.matches.get(i).copied())
    }

    /// Index of the current hit.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// All hits, ascending.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// The active query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns true if the matches were computed against different text.
    pub fn is_stale(&self, text: &str) -> bool {
        match self.source {
            Some(source) => source != fingerprint(text),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_case_insensitive() {
        let matches = find("rust", "Rust and RUST and rust");
        assert_eq!(
            matches,
            vec![
                Match { start: 0, end: 4 },
                Match { start: 9, end: 13 },
                Match { start: 18, end: 22 },
            ]
        );
    }

    #[test]
    fn test_non_overlapping() {
        let matches = find("aa", "aaaa");
        assert_eq!(matches, vec![Match { start: 0, end: 2 }, Match { start: 2, end: 4 }]);
    }

    #[test]
    fn test_empty_query() {
        assert!(find("", "anything").is_empty());

        let mut index = SearchIndex::new();
        index.search("any", "anything");
        assert_eq!(index.current_index(), Some(0));

        index.search("", "anything");
        assert!(index.matches().is_empty());
        assert_eq!(index.current_match(), None);
    }

    #[test]
    fn test_offsets_are_chars() {
        let matches = find("wörld", "héllo WÖRLD");
        assert_eq!(matches, vec![Match { start: 6, end: 11 }]);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut index = SearchIndex::new();
        index.search("a", "a-a-a");
        assert_eq!(index.current_index(), Some(0));

        assert_eq!(index.previous(), Some(Match { start: 4, end: 5 }));
        assert_eq!(index.next(), Some(Match { start: 0, end: 1 }));
        assert_eq!(index.next(), Some(Match { start: 2, end: 3 }));
        assert_eq!(index.next(), Some(Match { start: 4, end: 5 }));
        assert_eq!(index.next(), Some(Match { start: 0, end: 1 }));
    }

    #[test]
    fn test_navigation_without_matches() {
        let mut index = SearchIndex::new();
        index.search("zzz", "abc");
        assert_eq!(index.next(), None);
        assert_eq!(index.previous(), None);
    }

    #[test]
    fn test_staleness() {
        let mut index = SearchIndex::new();
        assert!(!index.is_stale("abc"));

        index.search("b", "abc");
        assert!(!index.is_stale("abc"));
        assert!(index.is_stale("abcb"));

        index.refresh("abcb");
        assert_eq!(index.matches().len(), 2);
        assert_eq!(index.query(), "b");
    }

    proptest! {
        #[test]
        fn prop_matches_ascending_and_disjoint(
            query in "[ab]{1,3}",
            text in "[abAB ]{0,60}",
        ) {
            let matches = find(&query, &text);
            for pair in matches.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
            }
            for m in &matches {
                prop_assert!(m.end > m.start);
                let hit = m.selection().extract(&text);
                prop_assert_eq!(hit.to_lowercase(), query.to_lowercase());
            }
        }
    }
}
