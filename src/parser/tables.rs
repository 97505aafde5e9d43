//! Table extraction with ordered strategy fallback.

use crate::error::Result;
use crate::model::TableGrid;

use super::backend::PdfBackend;
use super::outcome::{outcome_from_list, StrategyOutcome};
use super::table_gap::GapTableStrategy;
use super::table_stream::StreamTableStrategy;

/// One concrete table-detection algorithm.
pub trait TableStrategy {
    /// Short strategy name, used as the table source tag and in logs.
    fn name(&self) -> &'static str;

    /// Extract the tables of one page against the shared document handle.
    fn extract(&self, backend: &dyn PdfBackend, page_num: u32) -> Result<Vec<TableGrid>>;
}

/// Runs an ordered list of table strategies per page.
///
/// Strategies are tried in fixed priority order; the first one to produce
/// a non-empty result wins and later strategies do not run. Outputs are
/// never merged. A strategy failure is logged and treated the same as an
/// empty result, so it falls through to the next strategy instead of
/// aborting the page.
pub struct TableExtractor {
    strategies: Vec<Box<dyn TableStrategy>>,
}

impl TableExtractor {
    /// Create an extractor with the default strategy order:
    /// stream detection first, gap detection as fallback.
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(StreamTableStrategy::new()),
            Box::new(GapTableStrategy::new()),
        ])
    }

    /// Create an extractor with a custom strategy list.
    pub fn with_strategies(strategies: Vec<Box<dyn TableStrategy>>) -> Self {
        Self { strategies }
    }

    /// Extract tables for one page.
    ///
    /// Always succeeds; every failure mode degrades to an empty list.
    pub fn extract(&self, backend: &dyn PdfBackend, page_num: u32) -> Vec<TableGrid> {
        for strategy in &self.strategies {
            let outcome: StrategyOutcome<Vec<TableGrid>> =
                outcome_from_list(strategy.extract(backend, page_num));

            if let Some(mut tables) = outcome.collapse(strategy.name(), page_num) {
                for table in &mut tables {
                    table.source.get_or_insert(strategy.name());
                }
                log::debug!(
                    "page {}: {} table(s) via {} strategy",
                    page_num,
                    tables.len(),
                    strategy.name()
                );
                return tables;
            }
        }

        Vec::new()
    }
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new()
    }
}
