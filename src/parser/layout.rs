//! Layout analysis for PDF pages.
//!
//! Walks a page's content stream and produces positioned text spans with
//! font size and font name, then groups them into baseline rows and lines.
//! Heading detection, plain-text building, and both table strategies all
//! operate on this output.

use std::collections::HashMap;

use crate::error::{Error, Result};

use super::backend::{get_number_from_value, ContentOp, PdfBackend, PdfValue};

/// A text span with position and style information.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Whether the font name carries a bold-style marker
    pub is_bold: bool,
}

impl TextSpan {
    /// Create a new text span. Width is estimated from the character count
    /// since glyph metrics are not tracked.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let lowered = font_name.to_lowercase();
        let is_bold = lowered.contains("bold") || lowered.contains("black") || lowered.contains("heavy");
        let width = text.chars().count() as f32 * font_size * 0.5;

        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name,
            is_bold,
        }
    }

    /// Right edge of the span.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// A row of spans sharing one baseline.
#[derive(Debug, Clone)]
pub struct RowBand {
    /// Average Y position of the row
    pub y: f32,
    /// Spans in this row, sorted by X
    pub spans: Vec<TextSpan>,
}

/// A text line composed of the spans on one baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
    /// Y position (baseline)
    pub y: f32,
    /// Leftmost X position
    pub x: f32,
}

impl TextLine {
    /// Create a text line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        let y = spans.first().map(|s| s.y).unwrap_or(0.0);
        let x = spans.first().map(|s| s.x).unwrap_or(0.0);
        Self { spans, y, x }
    }

    /// Combined text of all spans, inserting a space where the horizontal
    /// gap between adjacent spans is wide enough to indicate one.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                let gap = span.x - prev.right();
                let threshold = span.font_size * 0.2;
                if gap > threshold
                    && !result.ends_with(' ')
                    && !span.text.starts_with(' ')
                {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
        }

        result
    }

    /// Largest character font size on the line.
    pub fn max_font_size(&self) -> f32 {
        self.spans
            .iter()
            .map(|s| s.font_size)
            .fold(0.0, f32::max)
    }

    /// Whether any span on the line uses a bold-marked font.
    pub fn has_bold_span(&self) -> bool {
        self.spans.iter().any(|s| s.is_bold)
    }
}

/// Group spans into baseline rows.
///
/// Spans are sorted top-to-bottom (PDF Y is bottom-up) then left-to-right,
/// and collected into rows while their Y stays within `tolerance_factor`
/// of the row's reference baseline, scaled by font size.
pub fn group_into_rows(spans: Vec<TextSpan>, tolerance_factor: f32) -> Vec<RowBand> {
    if spans.is_empty() {
        return Vec::new();
    }

    let mut spans = spans;
    spans.sort_by(|a, b| {
        let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut rows: Vec<RowBand> = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * tolerance_factor;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    rows.push(finish_row(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        rows.push(finish_row(current));
    }

    rows
}

fn finish_row(mut spans: Vec<TextSpan>) -> RowBand {
    let y = spans.iter().map(|s| s.y).sum::<f32>() / spans.len() as f32;
    spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    RowBand { y, spans }
}

/// Layout analyzer bound to one open document handle.
pub struct LayoutAnalyzer<'a> {
    backend: &'a dyn PdfBackend,
}

/// Y grouping tolerance for text lines, as a fraction of font size.
const LINE_TOLERANCE_FACTOR: f32 = 0.3;

impl<'a> LayoutAnalyzer<'a> {
    /// Create a new layout analyzer over a shared backend.
    pub fn new(backend: &'a dyn PdfBackend) -> Self {
        Self { backend }
    }

    /// Extract positioned text spans from a page.
    pub fn page_spans(&self, page_num: u32) -> Result<Vec<TextSpan>> {
        let pages = self.backend.pages();
        let page_id = *pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;

        // Missing font metadata degrades to resource-name font names; it
        // never fails the page.
        let fonts: HashMap<Vec<u8>, String> = self
            .backend
            .page_fonts(page_id)
            .unwrap_or_default()
            .into_iter()
            .map(|f| (f.name, f.base_font))
            .collect();

        let content = self.backend.page_content(page_id)?;
        let ops = self.backend.decode_content(&content)?;
        Ok(self.walk_content(page_id, &ops, &fonts))
    }

    /// Extract a page's text lines, grouped by baseline, top to bottom.
    pub fn page_lines(&self, page_num: u32) -> Result<Vec<TextLine>> {
        let spans = self.page_spans(page_num)?;
        Ok(Self::lines_from_spans(spans))
    }

    /// Group spans into lines.
    pub fn lines_from_spans(spans: Vec<TextSpan>) -> Vec<TextLine> {
        group_into_rows(spans, LINE_TOLERANCE_FACTOR)
            .into_iter()
            .map(|row| TextLine::from_spans(row.spans))
            .collect()
    }

    /// Walk the content stream operations and emit text spans.
    fn walk_content(
        &self,
        page_id: super::backend::PageId,
        ops: &[ContentOp],
        fonts: &HashMap<Vec<u8>, String>,
    ) -> Vec<TextSpan> {
        let mut spans = Vec::new();
        let mut current_font_res: Vec<u8> = Vec::new();
        let mut current_font = String::new();
        let mut current_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in ops {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let PdfValue::Name(res_name) = &op.operands[0] {
                            current_font_res = res_name.clone();
                            current_font = fonts
                                .get(res_name.as_slice())
                                .cloned()
                                .unwrap_or_else(|| {
                                    String::from_utf8_lossy(res_name).to_string()
                                });
                        }
                        current_size = get_number_from_value(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(
                            get_number_from_value(&op.operands[0]).unwrap_or(1.0),
                            get_number_from_value(&op.operands[1]).unwrap_or(0.0),
                            get_number_from_value(&op.operands[2]).unwrap_or(0.0),
                            get_number_from_value(&op.operands[3]).unwrap_or(1.0),
                            get_number_from_value(&op.operands[4]).unwrap_or(0.0),
                            get_number_from_value(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    matrix.next_line();
                }
                "Tj" | "TJ" => {
                    if !in_text_block {
                        continue;
                    }
                    let text = if op.operator == "TJ" {
                        if let Some(PdfValue::Array(items)) = op.operands.first() {
                            self.decode_tj_array(page_id, &current_font_res, items)
                        } else {
                            String::new()
                        }
                    } else if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                        self.backend.decode_text(page_id, &current_font_res, bytes)
                    } else {
                        String::new()
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = matrix.position();
                        let effective_size = current_size * matrix.scale();
                        spans.push(TextSpan::new(text, x, y, effective_size, current_font.clone()));
                    }
                }
                "'" | "\"" => {
                    matrix.next_line();
                    if !in_text_block {
                        continue;
                    }
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(PdfValue::Str(bytes)) = op.operands.get(text_idx) {
                        let text = self.backend.decode_text(page_id, &current_font_res, bytes);
                        if !text.trim().is_empty() {
                            let (x, y) = matrix.position();
                            let effective_size = current_size * matrix.scale();
                            spans.push(TextSpan::new(
                                text,
                                x,
                                y,
                                effective_size,
                                current_font.clone(),
                            ));
                        }
                    }
                }
                _ => {}
            }
        }

        spans
    }

    /// Decode a TJ array: strings interleaved with kerning adjustments.
    /// Large negative adjustments stand in for word spaces.
    fn decode_tj_array(
        &self,
        page_id: super::backend::PageId,
        font_res: &[u8],
        items: &[PdfValue],
    ) -> String {
        // 200/1000 text space units is a reliable word-break indicator
        // across common fonts.
        const SPACE_THRESHOLD: f32 = 200.0;

        let mut combined = String::new();
        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    combined.push_str(&self.backend.decode_text(page_id, font_res, bytes));
                }
                PdfValue::Integer(n) => {
                    if -(*n as f32) > SPACE_THRESHOLD {
                        push_tj_space(&mut combined);
                    }
                }
                PdfValue::Real(n) => {
                    if -n > SPACE_THRESHOLD {
                        push_tj_space(&mut combined);
                    }
                }
                _ => {}
            }
        }
        combined
    }
}

fn push_tj_space(combined: &mut String) {
    if combined.is_empty() || combined.ends_with(' ') {
        return;
    }
    // CJK text does not use word spaces
    if combined.chars().last().map(is_cjk_char).unwrap_or(false) {
        return;
    }
    combined.push(' ');
}

/// Check if a character belongs to a script without word spaces
/// (Chinese ideographs, kana).
fn is_cjk_char(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x3040..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}

/// Text matrix for tracking position in the content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; a TL operator would refine this
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}
