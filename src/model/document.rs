//! Document-level types.

use super::Page;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The structured record for one parsed document.
///
/// Constructed fresh per parse invocation and never mutated afterwards.
/// Serializes to the persisted `{"pages": [...]}` artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source file path. Not part of the persisted record.
    #[serde(skip)]
    pub source: PathBuf,

    /// Pages in physical order.
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document for the given source path.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            pages: Vec::new(),
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// The source file path.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Leading slice of the plain text, for summarization consumers that
    /// only read the first few thousand characters. Char-boundary safe.
    pub fn summary_text(&self, max_chars: usize) -> String {
        self.plain_text().chars().take(max_chars).collect()
    }

    /// Serialize the structured record to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        let json = match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(self)?,
            JsonFormat::Compact => serde_json::to_string(self)?,
        };
        Ok(json)
    }
}

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with 2-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new("report.pdf");
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
        assert!(doc.get_page(1).is_none());
    }

    #[test]
    fn test_get_page_one_indexed() {
        let mut doc = Document::new("report.pdf");
        doc.add_page(Page::new(1));
        doc.add_page(Page::new(2));

        assert_eq!(doc.get_page(1).unwrap().page_num, 1);
        assert_eq!(doc.get_page(2).unwrap().page_num, 2);
        assert!(doc.get_page(0).is_none());
        assert!(doc.get_page(3).is_none());
    }

    #[test]
    fn test_json_omits_source() {
        let doc = Document::new("secret/location.pdf");
        let json = doc.to_json(JsonFormat::Compact).unwrap();
        assert_eq!(json, "{\"pages\":[]}");
    }

    #[test]
    fn test_summary_text_truncates() {
        let mut doc = Document::new("a.pdf");
        let mut page = Page::new(1);
        page.add_paragraph("abcdefghij");
        doc.add_page(page);

        assert_eq!(doc.summary_text(4), "abcd");
        assert_eq!(doc.summary_text(100), "abcdefghij");
    }

    #[test]
    fn test_plain_text_skips_empty_pages() {
        let mut doc = Document::new("a.pdf");
        let mut first = Page::new(1);
        first.add_paragraph("Hello");
        doc.add_page(first);
        doc.add_page(Page::new(2));

        assert_eq!(doc.plain_text(), "Hello");
    }
}
