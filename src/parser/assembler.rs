//! Page assembly: drives the extractors and persists the structured record.

use std::fs;
use std::path::{Path, PathBuf};

use crate::detect;
use crate::error::Result;
use crate::model::{Document, JsonFormat, Page};

use super::backend::{LopdfBackend, PdfBackend};
use super::figures::FigureExtractor;
use super::headings::HeadingDetector;
use super::layout::LayoutAnalyzer;
use super::paragraphs::segment_paragraphs;
use super::tables::{TableExtractor, TableStrategy};
use super::text::PageTextExtractor;

/// Output locations for one assembler.
///
/// Both roots are explicit configuration; nothing is resolved from the
/// process working directory. The assembler creates them on demand.
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// Directory receiving `<basename>.json` structured records.
    pub structured_dir: PathBuf,
    /// Directory receiving `page<N>_fig<K>.png` figure files.
    pub figures_dir: PathBuf,
}

impl AssemblerConfig {
    /// Create a config from the two output roots.
    pub fn new(structured_dir: impl Into<PathBuf>, figures_dir: impl Into<PathBuf>) -> Self {
        Self {
            structured_dir: structured_dir.into(),
            figures_dir: figures_dir.into(),
        }
    }
}

/// Result of one parse invocation.
#[derive(Debug)]
pub struct ParseOutput {
    /// The in-memory structured record.
    pub document: Document,
    /// Path of the persisted JSON artifact.
    pub structured_path: PathBuf,
}

/// Drives per-page extraction and assembles the structured record.
///
/// Pages are processed strictly in physical order, and each page's
/// elements are concatenated in the fixed order headings, tables,
/// figures, paragraphs. The underlying document handle is opened once per
/// parse and shared by every extractor.
pub struct PageAssembler {
    config: AssemblerConfig,
    headings: HeadingDetector,
    text: PageTextExtractor,
    tables: TableExtractor,
}

impl PageAssembler {
    /// Create an assembler with the default extractors.
    pub fn new(config: AssemblerConfig) -> Self {
        Self {
            config,
            headings: HeadingDetector::new(),
            text: PageTextExtractor::new(),
            tables: TableExtractor::new(),
        }
    }

    /// Replace the table strategy list, keeping its fixed-order fallback
    /// semantics.
    pub fn with_table_strategies(mut self, strategies: Vec<Box<dyn TableStrategy>>) -> Self {
        self.tables = TableExtractor::with_strategies(strategies);
        self
    }

    /// Parse a document, deriving the output basename from the input
    /// file name.
    pub fn parse<P: AsRef<Path>>(&self, path: P) -> Result<ParseOutput> {
        let path = path.as_ref();
        let basename = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());
        self.parse_named(path, &basename)
    }

    /// Parse a document with an explicit output basename.
    ///
    /// Batch callers pass a collision-free basename here; single-document
    /// callers use [`PageAssembler::parse`].
    ///
    /// Fails fast with a document-level error when the file cannot be
    /// opened; no partial artifacts are written in that case. Failures
    /// below page level degrade to missing elements of that kind.
    pub fn parse_named<P: AsRef<Path>>(&self, path: P, basename: &str) -> Result<ParseOutput> {
        let path = path.as_ref();

        detect::detect_format_from_path(path)?;
        let backend = LopdfBackend::load_file(path)?;

        fs::create_dir_all(&self.config.structured_dir)?;
        let figures = FigureExtractor::new(self.config.figures_dir.clone());
        figures.ensure_dir()?;

        let layout = LayoutAnalyzer::new(&backend);
        let mut document = Document::new(path);

        let pages = backend.pages();
        for (idx, (&physical_num, &page_id)) in pages.iter().enumerate() {
            let page_num = idx as u32 + 1;
            let mut page = Page::new(page_num);

            // A page without a decodable text layer is valid and empty.
            let lines = match layout.page_lines(physical_num) {
                Ok(lines) => lines,
                Err(err) => {
                    log::warn!("page {}: no extractable text: {}", page_num, err);
                    Vec::new()
                }
            };

            for heading in self.headings.detect(&lines) {
                page.add_heading(heading);
            }

            for table in self.tables.extract(&backend, physical_num) {
                page.add_table(table);
            }

            if let Some(found) = figures
                .extract(&backend, page_id, page_num)
                .collapse("figure", page_num)
            {
                for figure in found {
                    page.add_figure(figure);
                }
            }

            let text = self.text.page_text(&lines);
            for paragraph in segment_paragraphs(&text) {
                page.add_paragraph(paragraph);
            }

            document.add_page(page);
        }

        let json = document.to_json(JsonFormat::Pretty)?;
        let structured_path = self.config.structured_dir.join(format!("{}.json", basename));
        fs::write(&structured_path, json)?;

        log::debug!(
            "parsed {} pages from {} into {}",
            document.page_count(),
            path.display(),
            structured_path.display()
        );

        Ok(ParseOutput {
            document,
            structured_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_fails_without_artifacts() {
        let dir = tempdir().unwrap();
        let structured = dir.path().join("structured");
        let config = AssemblerConfig::new(&structured, dir.path().join("figures"));

        let result = PageAssembler::new(config).parse(dir.path().join("missing.pdf"));
        assert!(result.is_err());
        assert!(!structured.exists());
    }

    #[test]
    fn test_non_pdf_rejected() {
        let dir = tempdir().unwrap();
        let bogus = dir.path().join("notes.pdf");
        fs::write(&bogus, b"plain text, not a pdf").unwrap();

        let config =
            AssemblerConfig::new(dir.path().join("structured"), dir.path().join("figures"));
        let result = PageAssembler::new(config).parse(&bogus);
        assert!(matches!(result, Err(crate::error::Error::UnknownFormat)));
    }
}
