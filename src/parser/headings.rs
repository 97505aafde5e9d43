//! Heading detection from positioned text lines.

use super::layout::TextLine;

/// Font size above which a line is classified as a heading.
pub const HEADING_SIZE_THRESHOLD: f32 = 12.0;

/// Classifies page lines as headings.
///
/// A line qualifies when its largest character font size exceeds the size
/// threshold, or when any of its spans uses a bold-marked font. Lines that
/// do not qualify are left for the paragraph segmenter, which runs
/// independently over the same page; a qualifying line is intentionally
/// not removed from the paragraph text.
#[derive(Debug, Clone)]
pub struct HeadingDetector {
    size_threshold: f32,
}

impl HeadingDetector {
    /// Create a detector with the default 12 pt threshold.
    pub fn new() -> Self {
        Self {
            size_threshold: HEADING_SIZE_THRESHOLD,
        }
    }

    /// Create a detector with a custom size threshold.
    pub fn with_threshold(size_threshold: f32) -> Self {
        Self { size_threshold }
    }

    /// Lazily yield heading strings in top-to-bottom layout order.
    ///
    /// Whitespace-only qualifying lines are dropped. Pages without font
    /// metadata carry no oversized or bold spans and yield nothing.
    pub fn detect<'a>(&'a self, lines: &'a [TextLine]) -> impl Iterator<Item = String> + 'a {
        lines
            .iter()
            .filter(move |line| self.qualifies(line))
            .map(|line| line.text().trim().to_string())
            .filter(|text| !text.is_empty())
    }

    fn qualifies(&self, line: &TextLine) -> bool {
        line.max_font_size() > self.size_threshold || line.has_bold_span()
    }
}

impl Default for HeadingDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::layout::TextSpan;

    fn line(text: &str, size: f32, font: &str) -> TextLine {
        TextLine::from_spans(vec![TextSpan::new(
            text.to_string(),
            72.0,
            700.0,
            size,
            font.to_string(),
        )])
    }

    #[test]
    fn test_large_line_is_heading() {
        let lines = vec![line("Big Title", 18.0, "Helvetica"), line("body", 10.0, "Helvetica")];
        let headings: Vec<String> = HeadingDetector::new().detect(&lines).collect();
        assert_eq!(headings, vec!["Big Title"]);
    }

    #[test]
    fn test_bold_line_is_heading_at_body_size() {
        let lines = vec![
            line("Summary", 10.0, "Helvetica-Bold"),
            line("details", 10.0, "Helvetica"),
        ];
        let headings: Vec<String> = HeadingDetector::new().detect(&lines).collect();
        assert_eq!(headings, vec!["Summary"]);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // exactly 12 pt does not qualify
        let lines = vec![line("borderline", 12.0, "Helvetica")];
        assert_eq!(HeadingDetector::new().detect(&lines).count(), 0);
    }

    #[test]
    fn test_whitespace_heading_dropped() {
        let lines = vec![line("   ", 18.0, "Helvetica")];
        assert_eq!(HeadingDetector::new().detect(&lines).count(), 0);
    }

    #[test]
    fn test_order_follows_layout() {
        let mut first = line("First", 18.0, "Helvetica");
        first.y = 700.0;
        let mut second = line("Second", 16.0, "Helvetica");
        second.y = 500.0;

        let headings: Vec<String> = HeadingDetector::new().detect(&[first, second]).collect();
        assert_eq!(headings, vec!["First", "Second"]);
    }
}
