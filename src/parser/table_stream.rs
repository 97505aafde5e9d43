//! Stream-flavor table detection from text alignment.
//!
//! Detects tables by analyzing whitespace-separated column alignment of
//! positioned text, without relying on ruled lines. This is the primary
//! table strategy; it runs against the whole-document handle filtered to
//! one page.

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::model::TableGrid;

use super::backend::PdfBackend;
use super::layout::{group_into_rows, LayoutAnalyzer, RowBand};
use super::tables::TableStrategy;

/// Configuration for stream-flavor detection.
#[derive(Debug, Clone)]
pub struct StreamTableConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum fraction of a row's spans that must sit on column edges
    pub min_alignment_ratio: f32,
    /// Minimum gap between column edges (points)
    pub min_column_gap: f32,
}

impl Default for StreamTableConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Primary table strategy: whitespace-alignment detection.
#[derive(Debug, Clone, Default)]
pub struct StreamTableStrategy {
    config: StreamTableConfig,
}

impl StreamTableStrategy {
    /// Create a strategy with default configuration.
    pub fn new() -> Self {
        Self {
            config: StreamTableConfig::default(),
        }
    }

    /// Create a strategy with custom configuration.
    pub fn with_config(config: StreamTableConfig) -> Self {
        Self { config }
    }

    /// Detect tables in a page's spans.
    pub fn detect(&self, spans: Vec<super::layout::TextSpan>) -> Vec<TableGrid> {
        if spans.len() < self.config.min_rows * self.config.min_columns {
            return Vec::new();
        }

        let rows = group_into_rows(spans, self.config.y_tolerance_factor);
        if rows.len() < self.config.min_rows {
            return Vec::new();
        }

        let columns = self.detect_column_edges(&rows);
        log::debug!(
            "stream detector: {} rows, column edges {:?}",
            rows.len(),
            columns
        );
        if columns.len() < self.config.min_columns {
            return Vec::new();
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_aligned_regions(&rows, &columns) {
            let region = &rows[start..=end];

            // Column edges re-derived within the region are tighter than
            // the page-wide ones.
            let region_columns = self.detect_column_edges(region);
            if region_columns.len() < self.config.min_columns {
                continue;
            }
            if region_columns.len() > self.config.max_columns {
                log::debug!(
                    "stream detector: skipping region with {} columns",
                    region_columns.len()
                );
                continue;
            }
            if is_list_pattern(region, &region_columns) {
                log::debug!("stream detector: skipping list-shaped region");
                continue;
            }

            tables.push(self.region_to_grid(region, &region_columns));
        }

        tables
    }

    /// Find X positions where span left edges align across rows.
    fn detect_column_edges(&self, rows: &[RowBand]) -> Vec<f32> {
        if rows.is_empty() {
            return Vec::new();
        }

        const BUCKET_SIZE: f32 = 5.0;

        // Rows with a single span carry no column information; only count
        // multi-span rows when enough exist.
        let multi_span_rows: Vec<&RowBand> =
            rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let counted: Vec<&RowBand> = if multi_span_rows.len() >= self.config.min_rows {
            multi_span_rows
        } else {
            rows.iter().collect()
        };

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &counted {
            let mut row_buckets: HashSet<i32> = HashSet::new();
            for span in &row.spans {
                row_buckets.insert((span.x / BUCKET_SIZE).round() as i32);
            }
            for bucket in row_buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((counted.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * BUCKET_SIZE)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Merge edges closer than the minimum column gap
        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Find contiguous runs of rows whose spans align with the edges.
    fn find_aligned_regions(&self, rows: &[RowBand], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut run_start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            if alignment_score(row, columns) >= self.config.min_alignment_ratio {
                run_start.get_or_insert(i);
            } else {
                if let Some(start) = run_start.take() {
                    if i - start >= self.config.min_rows {
                        regions.push((start, i - 1));
                    }
                }
            }
        }
        if let Some(start) = run_start {
            if rows.len() - start >= self.config.min_rows {
                regions.push((start, rows.len() - 1));
            }
        }

        regions
    }

    /// Convert an aligned region into a cell grid.
    fn region_to_grid(&self, region: &[RowBand], columns: &[f32]) -> TableGrid {
        let right_x = region
            .iter()
            .flat_map(|r| r.spans.iter())
            .map(|s| s.right())
            .fold(0.0, f32::max);

        let mut data = Vec::with_capacity(region.len());
        for row in region {
            let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
            for span in &row.spans {
                let col = column_for_span(span.x, columns, right_x);
                cells[col].push(span.text.trim());
            }
            data.push(cells.into_iter().map(|c| c.join(" ")).collect());
        }

        TableGrid::new(data)
    }
}

impl TableStrategy for StreamTableStrategy {
    fn name(&self) -> &'static str {
        "stream"
    }

    fn extract(&self, backend: &dyn PdfBackend, page_num: u32) -> Result<Vec<TableGrid>> {
        let spans = LayoutAnalyzer::new(backend).page_spans(page_num)?;
        Ok(self.detect(spans))
    }
}

/// Fraction of a row's spans sitting on a column edge.
fn alignment_score(row: &RowBand, columns: &[f32]) -> f32 {
    if row.spans.is_empty() || columns.is_empty() {
        return 0.0;
    }

    const TOLERANCE: f32 = 5.0;
    let aligned = row
        .spans
        .iter()
        .filter(|span| columns.iter().any(|col| (span.x - col).abs() <= TOLERANCE))
        .count();

    aligned as f32 / row.spans.len() as f32
}

/// Assign a span to the column whose range contains its left edge, with
/// a small tolerance for spans starting slightly before the edge.
fn column_for_span(span_x: f32, columns: &[f32], right_x: f32) -> usize {
    for (i, &col_start) in columns.iter().enumerate() {
        let col_end = columns.get(i + 1).copied().unwrap_or(right_x + 100.0);
        if span_x >= col_start - 10.0 && span_x < col_end - 10.0 {
            return i;
        }
    }

    // Fall back to the nearest edge
    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (span_x - **a)
                .abs()
                .partial_cmp(&(span_x - **b).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Check if an aligned region is really a bulleted or numbered list.
///
/// List markers and their text become separate spans at two X positions,
/// which mimics a two-column table.
fn is_list_pattern(rows: &[RowBand], columns: &[f32]) -> bool {
    if columns.len() < 2 || rows.is_empty() {
        return false;
    }

    let mut bullets = 0;
    let mut numbers = 0;
    for row in rows {
        let first = row.spans.first().map(|s| s.text.trim()).unwrap_or("");
        if is_bullet_marker(first) {
            bullets += 1;
        } else if is_number_marker(first) {
            numbers += 1;
        }
    }

    let bullet_ratio = bullets as f32 / rows.len() as f32;
    if bullet_ratio >= 0.5 {
        return true;
    }

    // Numbered first columns only disqualify two-column regions; wider
    // tables legitimately start with row numbers.
    let marker_ratio = (bullets + numbers) as f32 / rows.len() as f32;
    columns.len() == 2 && marker_ratio >= 0.5
}

/// Check if text is a bullet marker.
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "■" | "●" | "□" | "◆" | "▶"
    )
}

/// Check if text is a number-style list marker: "1.", "12)", "a.", or a
/// bare number.
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let prefix = &cleaned[..pos];
        let suffix = &cleaned[pos..];
        if !prefix.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }

    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    let chars: Vec<char> = cleaned.chars().collect();
    chars.len() == 2 && chars[0].is_alphabetic() && (chars[1] == '.' || chars[1] == ')')
}
