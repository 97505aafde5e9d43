//! Per-strategy extraction outcome.

use crate::error::Error;

/// Result of one extraction strategy call on one page.
///
/// Failures are recorded here instead of being silently swallowed; the
/// owning extractor logs them at its boundary and collapses everything
/// non-successful to "no elements of this kind" so a page parse never
/// aborts.
#[derive(Debug)]
pub enum StrategyOutcome<T> {
    /// The strategy produced data.
    Extracted(T),
    /// The strategy ran cleanly and found nothing.
    Empty,
    /// The strategy failed internally.
    Failed(Error),
}

impl<T> StrategyOutcome<T> {
    /// Check for the empty outcome.
    pub fn is_empty(&self) -> bool {
        matches!(self, StrategyOutcome::Empty)
    }

    /// Check for the failure outcome.
    pub fn is_failed(&self) -> bool {
        matches!(self, StrategyOutcome::Failed(_))
    }

    /// Collapse the outcome at the error boundary.
    ///
    /// Failures are logged with the label and page number, then discarded;
    /// only extracted data crosses into the page record.
    pub fn collapse(self, label: &str, page_num: u32) -> Option<T> {
        match self {
            StrategyOutcome::Extracted(data) => Some(data),
            StrategyOutcome::Empty => None,
            StrategyOutcome::Failed(err) => {
                log::warn!("{} extraction failed on page {}: {}", label, page_num, err);
                None
            }
        }
    }
}

/// Build an outcome from a list-producing strategy result: an empty list
/// becomes [`StrategyOutcome::Empty`], an error becomes
/// [`StrategyOutcome::Failed`].
pub fn outcome_from_list<U>(result: crate::error::Result<Vec<U>>) -> StrategyOutcome<Vec<U>> {
    match result {
        Ok(items) if items.is_empty() => StrategyOutcome::Empty,
        Ok(items) => StrategyOutcome::Extracted(items),
        Err(err) => StrategyOutcome::Failed(err),
    }
}
