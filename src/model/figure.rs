//! Figure reference type.

use serde::{Deserialize, Serialize};

/// A reference to an image persisted in the figures directory.
///
/// Only the filename enters the persisted record; the originating page
/// number and per-page index are kept for in-memory consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureRef {
    /// Filename relative to the figures directory.
    pub filename: String,

    /// 1-based page number the image was embedded on.
    #[serde(skip)]
    pub page_num: u32,

    /// 1-based index among the page's embedded images, in embedding order.
    #[serde(skip)]
    pub index: u32,
}

impl FigureRef {
    /// Create a reference with the deterministic `page<N>_fig<K>.png` name.
    pub fn new(page_num: u32, index: u32) -> Self {
        Self {
            filename: format!("page{}_fig{}.png", page_num, index),
            page_num,
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_filename() {
        let fig = FigureRef::new(3, 2);
        assert_eq!(fig.filename, "page3_fig2.png");
        assert_eq!(fig.page_num, 3);
        assert_eq!(fig.index, 2);
    }

    #[test]
    fn test_only_filename_serialized() {
        let fig = FigureRef::new(1, 1);
        let json = serde_json::to_value(&fig).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["filename"], "page1_fig1.png");
    }
}
