//! Page-level types.

use super::{FigureRef, TableGrid};
use serde::{Deserialize, Serialize};

/// A single page of the structured record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed, contiguous, physical order)
    pub page_num: u32,

    /// Content elements in the fixed assembly order:
    /// headings, then tables, then figures, then paragraphs.
    pub elements: Vec<Element>,
}

impl Page {
    /// Create a new empty page.
    pub fn new(page_num: u32) -> Self {
        Self {
            page_num,
            elements: Vec::new(),
        }
    }

    /// Add a heading element.
    pub fn add_heading(&mut self, content: impl Into<String>) {
        self.elements.push(Element::Heading {
            content: content.into(),
        });
    }

    /// Add a table element.
    pub fn add_table(&mut self, table: TableGrid) {
        self.elements.push(Element::Table(table));
    }

    /// Add a figure element.
    pub fn add_figure(&mut self, figure: FigureRef) {
        self.elements.push(Element::Figure(figure));
    }

    /// Add a paragraph element.
    pub fn add_paragraph(&mut self, content: impl Into<String>) {
        self.elements.push(Element::Paragraph {
            content: content.into(),
        });
    }

    /// Check if the page has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of elements on the page.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Plain text content of the page.
    ///
    /// Built from paragraphs and tables. Headings are omitted because their
    /// text also appears in the paragraph elements.
    pub fn plain_text(&self) -> String {
        self.elements
            .iter()
            .filter_map(|element| match element {
                Element::Paragraph { content } => Some(content.clone()),
                Element::Table(t) => Some(t.plain_text()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// One typed unit of page content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    /// A heading line
    Heading {
        /// Heading text, trimmed and non-empty
        content: String,
    },

    /// A table grid
    Table(TableGrid),

    /// A persisted figure reference
    Figure(FigureRef),

    /// A paragraph of body text
    Paragraph {
        /// Paragraph text, trimmed and non-empty
        content: String,
    },
}

impl Element {
    /// Check if this element is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Element::Heading { .. })
    }

    /// Check if this element is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Element::Table(_))
    }

    /// Check if this element is a figure.
    pub fn is_figure(&self) -> bool {
        matches!(self, Element::Figure(_))
    }

    /// Check if this element is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Element::Paragraph { .. })
    }
}
