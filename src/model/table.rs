//! Table grid type.

use serde::{Deserialize, Serialize};

/// A table extracted from a page: a grid of cell strings.
///
/// Rows may have uneven lengths when the producing strategy emitted ragged
/// output; cells are never force-padded to a rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableGrid {
    /// Cell contents, row-major.
    pub data: Vec<Vec<String>>,

    /// Name of the strategy that produced this table. Not part of the
    /// persisted record.
    #[serde(skip)]
    pub source: Option<&'static str>,
}

impl TableGrid {
    /// Create a table from row-major cell data.
    pub fn new(data: Vec<Vec<String>>) -> Self {
        Self { data, source: None }
    }

    /// Create a table from string slices, for tests and fixtures.
    pub fn from_rows<S: Into<String>>(rows: Vec<Vec<S>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Tag the table with the producing strategy and return self.
    pub fn with_source(mut self, source: &'static str) -> Self {
        self.source = Some(source);
        self
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Number of columns, as the widest row.
    pub fn column_count(&self) -> usize {
        self.data.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Tab-separated plain text representation.
    pub fn plain_text(&self) -> String {
        self.data
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_counts() {
        let table = TableGrid::from_rows(vec![vec!["Name", "Age"], vec!["Alice", "30"]]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_ragged_rows_not_padded() {
        let table = TableGrid::from_rows(vec![vec!["a", "b", "c"], vec!["d"]]);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.data[1].len(), 1);
    }

    #[test]
    fn test_source_tag_not_serialized() {
        let table = TableGrid::from_rows(vec![vec!["x"]]).with_source("stream");
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("\"data\""));
        assert!(!json.contains("stream"));
    }

    #[test]
    fn test_plain_text() {
        let table = TableGrid::from_rows(vec![vec!["a", "b"], vec!["c", "d"]]);
        assert_eq!(table.plain_text(), "a\tb\nc\td");
    }
}
