//! Page plain-text extraction.

use super::layout::TextLine;

/// Builds a page's plain text from its layout lines.
///
/// Lines are joined top to bottom with newlines. A blank line is inserted
/// where the vertical gap between baselines is large relative to the page's
/// average line spacing, so paragraph boundaries survive into the text and
/// can be recovered by the paragraph segmenter. Pages without a text layer
/// produce an empty string, never an error.
#[derive(Debug, Clone)]
pub struct PageTextExtractor {
    /// Gap factor over average spacing that marks a paragraph break.
    break_factor: f32,
}

impl PageTextExtractor {
    /// Create an extractor with the default break factor.
    pub fn new() -> Self {
        Self { break_factor: 1.5 }
    }

    /// Build the page's plain text.
    pub fn page_text(&self, lines: &[TextLine]) -> String {
        if lines.is_empty() {
            return String::new();
        }

        let avg_spacing = average_line_spacing(lines);
        let break_threshold = avg_spacing * self.break_factor;

        let mut text = String::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                let gap = (lines[i - 1].y - line.y).abs();
                text.push('\n');
                if gap > break_threshold {
                    text.push('\n');
                }
            }
            text.push_str(&line.text());
        }

        text
    }
}

impl Default for PageTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Average distance between consecutive baselines.
fn average_line_spacing(lines: &[TextLine]) -> f32 {
    if lines.len() < 2 {
        return 12.0;
    }

    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::layout::{TextLine, TextSpan};

    fn line(text: &str, y: f32) -> TextLine {
        TextLine::from_spans(vec![TextSpan::new(
            text.to_string(),
            72.0,
            y,
            10.0,
            "Helvetica".to_string(),
        )])
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(PageTextExtractor::new().page_text(&[]), "");
    }

    #[test]
    fn test_single_line() {
        let text = PageTextExtractor::new().page_text(&[line("only", 700.0)]);
        assert_eq!(text, "only");
    }

    #[test]
    fn test_blank_line_on_wide_gap() {
        // spacings 12, 12, 60 -> average 28, threshold 42
        let lines = vec![
            line("a", 700.0),
            line("b", 688.0),
            line("c", 676.0),
            line("d", 616.0),
        ];
        let text = PageTextExtractor::new().page_text(&lines);
        assert_eq!(text, "a\nb\nc\n\nd");
    }

    #[test]
    fn test_uniform_spacing_no_breaks() {
        let lines = vec![line("a", 700.0), line("b", 688.0), line("c", 676.0)];
        let text = PageTextExtractor::new().page_text(&lines);
        assert_eq!(text, "a\nb\nc");
    }
}
