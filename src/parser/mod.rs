//! The structural extraction pipeline.

mod assembler;
mod backend;
mod figures;
mod headings;
mod layout;
mod outcome;
mod paragraphs;
mod table_gap;
mod table_stream;
mod tables;
mod text;

pub use assembler::{AssemblerConfig, PageAssembler, ParseOutput};
pub use backend::{
    decode_text_simple, BackendFontInfo, ColorSpaceInfo, ContentOp, ImageFilter, ImageObject,
    LopdfBackend, PageId, PdfBackend, PdfValue,
};
pub use figures::FigureExtractor;
pub use headings::{HeadingDetector, HEADING_SIZE_THRESHOLD};
pub use layout::{group_into_rows, LayoutAnalyzer, RowBand, TextLine, TextSpan};
pub use outcome::{outcome_from_list, StrategyOutcome};
pub use paragraphs::segment_paragraphs;
pub use table_gap::{GapTableConfig, GapTableStrategy};
pub use table_stream::{StreamTableConfig, StreamTableStrategy};
pub use tables::{TableExtractor, TableStrategy};
pub use text::PageTextExtractor;
