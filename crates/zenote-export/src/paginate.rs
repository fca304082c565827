//! Splitting a note into fixed-size cards.
//!
//! ## How Weighting Works
//!
//! There is no layout engine here, so the rendered height of a card is
//! approximated by a weight per line:
//! - Plain lines weigh their length in chars
//! - Headings weigh a fixed amount (bigger type, more margin)
//! - Blank lines weigh a fixed "breathing room" amount
//! - List items weigh their length plus a bonus for the bullet indent
//!
//! Lines are packed onto a page until the next one would overflow the
//! capacity. When that happens in the middle of a paragraph, the page is
//! cut back to the last sentence end or blank line so a card doesn't stop
//! mid-thought.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ExportError;

/// Default capacity of a 3:4 card.
pub const THREE_FOUR_CAPACITY: usize = 950;

/// How much text fits on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// At most this much weight per page
    Bounded(usize),
    /// No pagination at all
    Unbounded,
}

/// Output shape of an exported card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageMode {
    /// One long card, no fixed aspect ratio
    #[default]
    #[serde(rename = "full")]
    Full,
    /// Portrait 3:4 cards
    #[serde(rename = "3:4")]
    ThreeFour,
}

impl PageMode {
    /// Capacity used when the caller does not pick one.
    pub fn default_capacity(&self) -> Capacity {
        match self {
            PageMode::Full => Capacity::Unbounded,
            PageMode::ThreeFour => Capacity::Bounded(THREE_FOUR_CAPACITY),
        }
    }

    /// Weight preset for this mode.
    pub fn weights(&self) -> LineWeights {
        match self {
            PageMode::Full => LineWeights::FULL,
            PageMode::ThreeFour => LineWeights::THREE_FOUR,
        }
    }
}

impl fmt::Display for PageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageMode::Full => f.write_str("full"),
            PageMode::ThreeFour => f.write_str("3:4"),
        }
    }
}

impl FromStr for PageMode {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(PageMode::Full),
            "3:4" | "three-four" | "portrait" => Ok(PageMode::ThreeFour),
            _ => Err(ExportError::UnknownMode(s.to_string())),
        }
    }
}

/// Per-line weights. Tunable; nothing derives them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWeights {
    /// `# ` lines
    pub heading1: usize,
    /// `## ` lines
    pub heading2: usize,
    /// `### ` lines
    pub heading3: usize,
    /// Lines with nothing but whitespace
    pub blank_line: usize,
    /// Added to the length of `- ` and `1. ` lines
    pub list_item_bonus: usize,
}

impl LineWeights {
    /// Preset for full-length cards.
    pub const FULL: LineWeights = LineWeights {
        heading1: 150,
        heading2: 120,
        heading3: 100,
        blank_line: 50,
        list_item_bonus: 30,
    };

    /// Preset for 3:4 cards, which render with more spacing.
    pub const THREE_FOUR: LineWeights = LineWeights {
        heading1: 180,
        heading2: 150,
        heading3: 130,
        blank_line: 60,
        list_item_bonus: 40,
    };

    /// Weight of a single line (without its newline).
    pub fn line_weight(&self, line: &str) -> usize {
        if line.starts_with("# ") {
            self.heading1
        } else if line.starts_with("## ") {
            self.heading2
        } else if line.starts_with("### ") {
            self.heading3
        } else if line.trim().is_empty() {
            self.blank_line
        } else if line.starts_with("- ") || line.starts_with("1. ") {
            line.chars().count() + self.list_item_bonus
        } else {
            line.chars().count()
        }
    }
}

impl Default for LineWeights {
    fn default() -> Self {
        Self::FULL
    }
}

/// Splits text into pages using a weight preset.
#[derive(Debug, Clone, Copy, Default)]
pub struct Paginator {
    weights: LineWeights,
}

impl Paginator {
    /// Paginator using the preset for `mode`.
    pub fn new(mode: PageMode) -> Self {
        Self {
            weights: mode.weights(),
        }
    }

    /// Paginator with custom weights.
    pub fn with_weights(weights: LineWeights) -> Self {
        Self { weights }
    }

    /// The weights in use.
    pub fn weights(&self) -> &LineWeights {
        &self.weights
    }

    /// Splits `text` into pages.
    ///
    /// Always returns at least one page. Concatenating the pages gives back
    /// `text`, except that a trailing whitespace-only page is dropped.
    pub fn paginate(&self, text: &str, capacity: Capacity) -> Vec<String> {
        let capacity = match capacity {
            Capacity::Unbounded => return vec![text.to_string()],
            Capacity::Bounded(capacity) => capacity,
        };
        if text.is_empty() {
            return vec![String::new()];
        }

        let lines: Vec<&str> = text.split('\n').collect();
        let mut pages: Vec<String> = Vec::new();
        let mut page = String::new();
        let mut weight = 0;

        for (i, line) in lines.iter().enumerate() {
            let line_weight = self.weights.line_weight(line);

            // An empty page always takes the line, however heavy.
            if weight + line_weight <= capacity || page.trim().is_empty() {
                push_line(&mut page, line);
                weight += line_weight;
                continue;
            }

            let previous = if i > 0 { lines[i - 1].trim() } else { "" };
            let mid_paragraph = !previous.is_empty() && !previous.ends_with(['.', '!', '?']);

            if mid_paragraph {
                if let Some(cut) = clean_break(&page) {
                    let rest = page.split_off(cut);
                    pages.push(std::mem::replace(&mut page, rest));
                    push_line(&mut page, line);
                    weight = line_weight;
                    continue;
                }
            }

            pages.push(std::mem::take(&mut page));
            push_line(&mut page, line);
            weight = line_weight;
        }
        pages.push(page);

        // Every line got a newline, including the last one which had none.
        if let Some(last) = pages.last_mut() {
            last.pop();
        }
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }

        tracing::debug!(pages = pages.len(), capacity, "paginated note");
        pages
    }
}

fn push_line(page: &mut String, line: &str) {
    page.push_str(line);
    page.push('\n');
}

/// Byte offset just past the last sentence end or paragraph break.
///
/// A break that would leave only whitespace on the finished page is
/// ignored.
fn clean_break(page: &str) -> Option<usize> {
    let sentence_end = [".\n", "!\n", "?\n"]
        .iter()
        .filter_map(|end| page.rfind(end))
        .max();

    let idx = sentence_end.or_else(|| page.rfind("\n\n"))?;
    let cut = idx + 2;
    if page[..cut].trim().is_empty() {
        None
    } else {
        Some(cut)
    }
}

/// Splits `text` into pages using the preset for `mode`.
pub fn paginate(text: &str, capacity: Capacity, mode: PageMode) -> Vec<String> {
    Paginator::new(mode).paginate(text, capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn full(text: &str, capacity: usize) -> Vec<String> {
        paginate(text, Capacity::Bounded(capacity), PageMode::Full)
    }

    #[test]
    fn test_unbounded_returns_input() {
        let text = "# Title\n\nSome text.\n\nMore text.\n";
        assert_eq!(paginate(text, Capacity::Unbounded, PageMode::Full), vec![text]);
        assert_eq!(paginate("", Capacity::Unbounded, PageMode::ThreeFour), vec![""]);
    }

    #[test]
    fn test_single_page_equals_input() {
        let text = "# Title\n\nSome text.\n\nMore text.";
        assert_eq!(full(text, 100_000), vec![text]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(full("", 10), vec![""]);
    }

    #[test]
    fn test_breaks_after_sentence() {
        let text = "First sentence.\nSecond part\ncontinues here\nmore";
        assert_eq!(
            full(text, 30),
            vec!["First sentence.\n", "Second part\ncontinues here\nmore"]
        );
    }

    #[test]
    fn test_breaks_at_paragraph() {
        let text = format!("para one\n\npara two\nstill two\n{}", "x".repeat(50));
        assert_eq!(
            full(&text, 120),
            vec!["para one\n\n".to_string(), format!("para two\nstill two\n{}", "x".repeat(50))]
        );
    }

    #[test]
    fn test_hard_split_without_break_point() {
        let text = "aaaaaaaaaa\nbbbbbbbbbb\ncccccccccc";
        assert_eq!(full(text, 20), vec!["aaaaaaaaaa\nbbbbbbbbbb\n", "cccccccccc"]);
    }

    #[test]
    fn test_oversized_line_gets_own_page() {
        let long = "x".repeat(50);
        let text = format!("short\n{long}\nend");
        assert_eq!(
            full(&text, 5),
            vec!["short\n".to_string(), format!("{long}\n"), "end".to_string()]
        );
        assert_eq!(full(&long, 5), vec![long.clone()]);
    }

    #[test]
    fn test_trailing_blank_page_dropped() {
        assert_eq!(full("aaaaaaaaaa\n\n", 10), vec!["aaaaaaaaaa\n"]);
    }

    #[test]
    fn test_line_weights() {
        let w = LineWeights::THREE_FOUR;
        assert_eq!(w.line_weight("# Big"), 180);
        assert_eq!(w.line_weight("## Medium"), 150);
        assert_eq!(w.line_weight("### Small"), 130);
        assert_eq!(w.line_weight("   "), 60);
        assert_eq!(w.line_weight("- item"), 6 + 40);
        assert_eq!(w.line_weight("1. first"), 8 + 40);
        assert_eq!(w.line_weight("#tag"), 4);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("full".parse::<PageMode>().unwrap(), PageMode::Full);
        assert_eq!("3:4".parse::<PageMode>().unwrap(), PageMode::ThreeFour);
        assert!(matches!("16:9".parse::<PageMode>(), Err(ExportError::UnknownMode(_))));
        assert_eq!(PageMode::ThreeFour.default_capacity(), Capacity::Bounded(950));
        assert_eq!(PageMode::Full.default_capacity(), Capacity::Unbounded);
    }

    fn note_text() -> impl Strategy<Value = String> {
        let line = prop_oneof![
            Just(String::new()),
            "# [a-z ]{0,10}",
            "- [a-z ]{0,20}",
            "[a-z ]{0,60}[.!?]?",
        ];
        prop::collection::vec(line, 0..30).prop_map(|lines| lines.join("\n"))
    }

    proptest! {
        #[test]
        fn prop_pages_reconstruct_text(text in note_text(), capacity in 1usize..400) {
            let pages = full(&text, capacity);
            prop_assert!(!pages.is_empty());

            let joined = pages.concat();
            prop_assert!(text.starts_with(&joined));
            prop_assert!(text[joined.len()..].trim().is_empty());
        }

        #[test]
        fn prop_unbounded_is_identity(text in note_text()) {
            prop_assert_eq!(paginate(&text, Capacity::Unbounded, PageMode::ThreeFour), vec![text]);
        }

        #[test]
        fn prop_only_last_page_can_be_blank(text in note_text(), capacity in 1usize..400) {
            let pages = full(&text, capacity);
            if pages.len() > 1 {
                prop_assert!(!pages.last().unwrap().trim().is_empty());
            }
        }
    }
}
