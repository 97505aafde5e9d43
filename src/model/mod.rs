//! Document model types for structured page content.
//!
//! The model is the write-once output of one parse invocation: a document
//! owns pages in physical order, each page owns its typed content elements.
//! Serialization with serde_json produces the persisted structured record.

mod document;
mod figure;
mod page;
mod table;

pub use document::{Document, JsonFormat};
pub use figure::FigureRef;
pub use page::{Element, Page};
pub use table::TableGrid;
