//! Gap-based table detection.
//!
//! The fallback table strategy: a simpler, page-local detector that splits
//! each baseline row into cells wherever a wide horizontal gap separates
//! spans, then keeps runs of consecutive multi-cell rows. Rows keep their
//! own cell counts, so the output may be ragged.

use crate::error::Result;
use crate::model::TableGrid;

use super::backend::PdfBackend;
use super::layout::{group_into_rows, LayoutAnalyzer, RowBand, TextSpan};
use super::tables::TableStrategy;

/// Configuration for gap-based detection.
#[derive(Debug, Clone)]
pub struct GapTableConfig {
    /// Minimum consecutive multi-cell rows to accept as a table
    pub min_rows: usize,
    /// Minimum cells per row for the row to count as tabular
    pub min_cells: usize,
    /// Horizontal gap (points) that separates two cells
    pub min_gap: f32,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
}

impl Default for GapTableConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_cells: 2,
            min_gap: 12.0,
            y_tolerance_factor: 0.4,
        }
    }
}

/// Fallback table strategy: cell splitting on horizontal gaps.
#[derive(Debug, Clone, Default)]
pub struct GapTableStrategy {
    config: GapTableConfig,
}

impl GapTableStrategy {
    /// Create a strategy with default configuration.
    pub fn new() -> Self {
        Self {
            config: GapTableConfig::default(),
        }
    }

    /// Create a strategy with custom configuration.
    pub fn with_config(config: GapTableConfig) -> Self {
        Self { config }
    }

    /// Detect tables in a page's spans.
    pub fn detect(&self, spans: Vec<TextSpan>) -> Vec<TableGrid> {
        let rows = group_into_rows(spans, self.config.y_tolerance_factor);
        if rows.len() < self.config.min_rows {
            return Vec::new();
        }

        // Split every row into cells, then keep runs of tabular rows.
        let row_cells: Vec<Vec<String>> = rows.iter().map(|r| self.split_cells(r)).collect();

        let mut tables = Vec::new();
        let mut run: Vec<Vec<String>> = Vec::new();
        for cells in row_cells {
            if cells.len() >= self.config.min_cells {
                run.push(cells);
            } else {
                self.flush_run(&mut run, &mut tables);
            }
        }
        self.flush_run(&mut run, &mut tables);

        tables
    }

    fn flush_run(&self, run: &mut Vec<Vec<String>>, tables: &mut Vec<TableGrid>) {
        if run.len() >= self.config.min_rows {
            tables.push(TableGrid::new(std::mem::take(run)));
        } else {
            run.clear();
        }
    }

    /// Split one row's spans into cells on wide gaps.
    fn split_cells(&self, row: &RowBand) -> Vec<String> {
        let mut cells: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut prev_right: Option<f32> = None;

        for span in &row.spans {
            if let Some(right) = prev_right {
                if span.x - right > self.config.min_gap {
                    cells.push(std::mem::take(&mut current).trim().to_string());
                } else if !current.ends_with(' ') {
                    current.push(' ');
                }
            }
            current.push_str(&span.text);
            prev_right = Some(span.right());
        }
        if !current.trim().is_empty() {
            cells.push(current.trim().to_string());
        }

        cells
    }
}

impl TableStrategy for GapTableStrategy {
    fn name(&self) -> &'static str {
        "gap"
    }

    fn extract(&self, backend: &dyn PdfBackend, page_num: u32) -> Result<Vec<TableGrid>> {
        let spans = LayoutAnalyzer::new(backend).page_spans(page_num)?;
        Ok(self.detect(spans))
    }
}
