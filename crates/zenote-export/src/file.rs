//! Export file naming and contents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ExportError;
use crate::paginate::{Capacity, PageMode};

/// Prefix shared by every exported file.
pub const FILE_PREFIX: &str = "zenote";

/// Stem used when the title has nothing left after sanitizing.
pub const FALLBACK_STEM: &str = "note";

/// Prepended to text exports so editors on Windows detect UTF-8.
pub const UTF8_BOM: char = '\u{FEFF}';

/// Plain-text export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    #[serde(rename = "md")]
    Markdown,
    #[serde(rename = "txt")]
    Text,
}

impl ExportFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "txt" | "text" => Ok(ExportFormat::Text),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Persisted export preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Card shape
    pub mode: PageMode,

    /// Overrides the mode's default capacity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

impl ExportSettings {
    /// Capacity to paginate with.
    pub fn capacity(&self) -> Capacity {
        match self.capacity {
            Some(capacity) => Capacity::Bounded(capacity),
            None => self.mode.default_capacity(),
        }
    }
}

/// File name for a note exported as text.
///
/// Every char outside `[A-Za-z0-9]` becomes `_` and the result is
/// lowercased: `"My Note!"` exports as `zenote_my_note_.md`.
pub fn file_name(title: &str, format: ExportFormat) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.is_empty() { FALLBACK_STEM } else { &stem };
    format!("{FILE_PREFIX}_{stem}.{}", format.extension())
}

/// Bytes written for a text export: the content behind a UTF-8 BOM.
pub fn file_contents(content: &str) -> String {
    let mut out = String::with_capacity(content.len() + UTF8_BOM.len_utf8());
    out.push(UTF8_BOM);
    out.push_str(content);
    out
}

/// `-<n>` (1-based) for multi-page exports, empty for a single page.
pub fn page_file_suffix(index: usize, total: usize) -> String {
    if total > 1 {
        format!("-{}", index + 1)
    } else {
        String::new()
    }
}

/// File name of one rendered card image.
pub fn page_image_name(index: usize, total: usize) -> String {
    format!("{FILE_PREFIX}{}.png", page_file_suffix(index, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_sanitizes_title() {
        assert_eq!(file_name("My Note!", ExportFormat::Markdown), "zenote_my_note_.md");
        assert_eq!(file_name("Groceries", ExportFormat::Text), "zenote_groceries.txt");
        assert_eq!(file_name("café 2026", ExportFormat::Text), "zenote_caf__2026.txt");
        assert_eq!(file_name("", ExportFormat::Markdown), "zenote_note.md");
    }

    #[test]
    fn test_file_contents_has_bom() {
        let contents = file_contents("hello");
        assert!(contents.starts_with('\u{FEFF}'));
        assert_eq!(contents.as_bytes()[..3], [0xEF, 0xBB, 0xBF]);
        assert_eq!(&contents[3..], "hello");
    }

    #[test]
    fn test_page_names() {
        assert_eq!(page_image_name(0, 1), "zenote.png");
        assert_eq!(page_image_name(0, 3), "zenote-1.png");
        assert_eq!(page_image_name(2, 3), "zenote-3.png");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("MD".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!(matches!("pdf".parse::<ExportFormat>(), Err(ExportError::UnknownFormat(_))));
    }

    #[test]
    fn test_settings_capacity() {
        let mut settings = ExportSettings::default();
        assert_eq!(settings.capacity(), Capacity::Unbounded);

        settings.mode = PageMode::ThreeFour;
        assert_eq!(settings.capacity(), Capacity::Bounded(950));

        settings.capacity = Some(500);
        assert_eq!(settings.capacity(), Capacity::Bounded(500));
    }

    #[test]
    fn test_settings_toml() {
        let settings: ExportSettings = toml::from_str("mode = \"3:4\"\n").unwrap();
        assert_eq!(settings.mode, PageMode::ThreeFour);
        assert_eq!(settings.capacity, None);

        let out = toml::to_string(&ExportSettings::default()).unwrap();
        assert_eq!(out.trim(), "mode = \"full\"");
    }
}
