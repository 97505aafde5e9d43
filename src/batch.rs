//! Batch processing of multiple documents.
//!
//! Each document's parse is independent and shares no mutable state, so
//! files are processed in parallel. The shared output directories are
//! kept collision-free by deriving every document's basename from its
//! content hash, which doubles as the dedup key downstream stores record.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use md5::{Digest, Md5};
use rayon::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::parser::{AssemblerConfig, PageAssembler};

/// Result of one successfully processed file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    /// Source file path.
    pub source: PathBuf,
    /// Path of the persisted structured record.
    pub structured_path: PathBuf,
    /// Page count of the document.
    pub pages: u32,
    /// Total element count across all pages.
    pub elements: usize,
    /// Wall-clock duration of the parse in milliseconds.
    pub duration_ms: u128,
    /// MD5 content hash of the source file.
    pub content_hash: String,
}

/// A file that failed to process.
#[derive(Debug, Clone, Serialize)]
pub struct FailedFile {
    /// Source file path.
    pub source: PathBuf,
    /// Error description.
    pub error: String,
}

/// Summary of one batch run.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    /// Successfully processed files, in completion order.
    pub processed: Vec<FileResult>,
    /// Failed files with their errors.
    pub failed: Vec<FailedFile>,
    /// Total pages across processed files.
    pub total_pages: u32,
    /// Wall-clock duration of the whole batch in milliseconds.
    pub duration_ms: u128,
}

impl BatchSummary {
    /// Fraction of files that processed successfully.
    pub fn success_rate(&self) -> f32 {
        let total = self.processed.len() + self.failed.len();
        if total == 0 {
            return 1.0;
        }
        self.processed.len() as f32 / total as f32
    }

    /// Check if every file processed successfully.
    pub fn is_all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Processes many PDFs through the extraction pipeline.
pub struct BatchProcessor {
    structured_dir: PathBuf,
    figures_root: PathBuf,
    write_plain_text: bool,
}

impl BatchProcessor {
    /// Create a processor writing into the given output roots.
    pub fn new(structured_dir: impl Into<PathBuf>, figures_root: impl Into<PathBuf>) -> Self {
        Self {
            structured_dir: structured_dir.into(),
            figures_root: figures_root.into(),
            write_plain_text: false,
        }
    }

    /// Also write a `<basename>.txt` plain-text sidecar per document.
    pub fn with_plain_text(mut self, write: bool) -> Self {
        self.write_plain_text = write;
        self
    }

    /// Process all files, in parallel. One file's failure never aborts
    /// the batch.
    pub fn process(&self, paths: &[PathBuf]) -> BatchSummary {
        self.process_with_progress(paths, |_| {})
    }

    /// Process all files, invoking `on_done` as each file finishes.
    pub fn process_with_progress(
        &self,
        paths: &[PathBuf],
        on_done: impl Fn(&Path) + Sync,
    ) -> BatchSummary {
        let started = Instant::now();

        let results: Vec<std::result::Result<FileResult, FailedFile>> = paths
            .par_iter()
            .map(|path| {
                let outcome = self.process_one(path).map_err(|err| FailedFile {
                    source: path.clone(),
                    error: err.to_string(),
                });
                on_done(path);
                outcome
            })
            .collect();

        let mut processed = Vec::new();
        let mut failed = Vec::new();
        for result in results {
            match result {
                Ok(file) => processed.push(file),
                Err(file) => failed.push(file),
            }
        }

        let total_pages = processed.iter().map(|f| f.pages).sum();
        BatchSummary {
            processed,
            failed,
            total_pages,
            duration_ms: started.elapsed().as_millis(),
        }
    }

    fn process_one(&self, path: &Path) -> Result<FileResult> {
        let bytes = fs::read(path)?;
        let content_hash = content_hash(&bytes);
        drop(bytes);

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());
        let basename = format!("{}-{}", stem, &content_hash[..8]);

        // Each document gets its own figures namespace so concurrent
        // parses never collide on page<N>_fig<K>.png names.
        let config = AssemblerConfig::new(
            self.structured_dir.clone(),
            self.figures_root.join(&basename),
        );

        let started = Instant::now();
        let output = PageAssembler::new(config).parse_named(path, &basename)?;
        let duration_ms = started.elapsed().as_millis();

        if self.write_plain_text {
            let text_path = self.structured_dir.join(format!("{}.txt", basename));
            fs::write(text_path, output.document.plain_text())?;
        }

        Ok(FileResult {
            source: path.to_path_buf(),
            structured_path: output.structured_path,
            pages: output.document.page_count(),
            elements: output
                .document
                .pages
                .iter()
                .map(|p| p.element_count())
                .sum(),
            duration_ms,
            content_hash,
        })
    }
}

/// Hex MD5 digest of a byte slice.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
