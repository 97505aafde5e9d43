//! Paragraph segmentation.

use regex::Regex;

/// Split page plain text into paragraphs on blank-line boundaries.
///
/// A boundary is a run of two or more consecutive newlines. Candidates are
/// trimmed and empty results discarded. Pure function: always returns a
/// (possibly empty) ordered list.
pub fn segment_paragraphs(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let boundary = Regex::new(r"\n{2,}").unwrap();
    boundary
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_split() {
        assert_eq!(segment_paragraphs("A\n\nB\n\n\nC"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_single_newline_not_a_boundary() {
        assert_eq!(segment_paragraphs("line one\nline two"), vec!["line one\nline two"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(segment_paragraphs("").is_empty());
        assert!(segment_paragraphs("   \n\n  \n").is_empty());
    }

    #[test]
    fn test_trims_candidates() {
        assert_eq!(segment_paragraphs("  A  \n\n  B  "), vec!["A", "B"]);
    }

    #[test]
    fn test_leading_and_trailing_boundaries() {
        assert_eq!(segment_paragraphs("\n\nA\n\nB\n\n"), vec!["A", "B"]);
    }
}
