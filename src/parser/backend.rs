//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for PDF document access, isolating the
//! concrete PDF library (lopdf) from the extraction logic. One backend
//! instance is opened per parse and shared by every extractor; it is
//! released when the owning assembler returns.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// Font information returned by the backend.
#[derive(Debug, Clone)]
pub struct BackendFontInfo {
    /// Font resource name (key in the page's font dictionary).
    pub name: Vec<u8>,
    /// Base font name (e.g., "Helvetica-Bold").
    pub base_font: String,
}

/// A value from a PDF content stream operand.
#[derive(Debug, Clone)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

/// Color space of an embedded image, reduced to what the figure filter
/// and PNG export need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpaceInfo {
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
    /// ICC profile stream with its /N component count.
    IccBased(u8),
    /// Palette lookup; carries the component count of the base space.
    Indexed(u8),
    Separation,
    DeviceN(u8),
    /// A color space this backend does not resolve further.
    Named(String),
}

impl ColorSpaceInfo {
    /// Number of color components per sample.
    pub fn components(&self) -> u8 {
        match self {
            ColorSpaceInfo::DeviceGray | ColorSpaceInfo::Separation => 1,
            ColorSpaceInfo::DeviceRgb => 3,
            ColorSpaceInfo::DeviceCmyk => 4,
            ColorSpaceInfo::IccBased(n) | ColorSpaceInfo::Indexed(n) | ColorSpaceInfo::DeviceN(n) => {
                *n
            }
            // Unresolved spaces are treated as RGB-like and fail later at
            // decode time if they are not.
            ColorSpaceInfo::Named(_) => 3,
        }
    }

    /// Channel count as color components plus one alpha channel.
    ///
    /// Process-color images (CMYK and wider) land at 5 or more and are
    /// rejected by the figure filter.
    pub fn channel_count(&self) -> u8 {
        self.components() + 1
    }
}

/// Compression filter of an embedded image stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageFilter {
    /// Uncompressed or flate-compressed raw samples.
    Raw,
    /// DCTDecode; the stream content is a complete JPEG file.
    Jpeg,
    /// A filter this backend cannot decode (JPXDecode, CCITT, ...).
    Unsupported(String),
}

/// An embedded raster image pulled from a page's resources.
#[derive(Debug, Clone)]
pub struct ImageObject {
    /// XObject resource name.
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bits per color component.
    pub bits_per_component: u8,
    /// Resolved color space.
    pub color: ColorSpaceInfo,
    /// Compression filter the data is still wrapped in.
    pub filter: ImageFilter,
    /// Sample data: raw (decompressed) samples, or a JPEG byte stream.
    pub data: Vec<u8>,
}

impl ImageObject {
    /// Channel count used by the figure filter.
    pub fn channel_count(&self) -> u8 {
        self.color.channel_count()
    }
}

/// Abstract interface for PDF document access.
///
/// Implementations provide page enumeration, font info, content stream
/// decoding, text decoding, and image enumeration without exposing any
/// concrete PDF library types.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId), ascending.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return font info for a given page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>>;

    /// Return the raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the font's encoding on the given
    /// page. Falls back to simple decoding if the encoding is unavailable.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;

    /// Return the embedded raster images of a page, in embedding order.
    fn page_images(&self, page: PageId) -> Result<Vec<ImageObject>>;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM marker
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Fallback: Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// LopdfBackend — concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Ok(Self { doc })
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Ok(Self { doc })
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Resolve a dictionary that may be stored inline or behind a reference.
    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Resolve the /ColorSpace entry of an image dictionary.
    fn resolve_color_space(&self, dict: &Dictionary) -> ColorSpaceInfo {
        let Ok(cs) = dict.get(b"ColorSpace") else {
            // ImageMask and stencil images carry no color space entry.
            return ColorSpaceInfo::DeviceGray;
        };

        let cs = match cs {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(resolved) => resolved,
                Err(_) => return ColorSpaceInfo::Named("unresolved".to_string()),
            },
            other => other,
        };

        match cs {
            Object::Name(n) => color_space_from_name(n),
            Object::Array(arr) => self.color_space_from_array(arr),
            _ => ColorSpaceInfo::Named("unknown".to_string()),
        }
    }

    fn color_space_from_array(&self, arr: &[Object]) -> ColorSpaceInfo {
        let family = arr
            .first()
            .and_then(|o| o.as_name_str().ok())
            .unwrap_or_default();

        match family {
            "ICCBased" => {
                let n = arr
                    .get(1)
                    .and_then(|o| o.as_reference().ok())
                    .and_then(|r| self.doc.get_object(r).ok())
                    .and_then(|o| match o {
                        Object::Stream(s) => s.dict.get(b"N").ok().and_then(|n| n.as_i64().ok()),
                        _ => None,
                    })
                    .unwrap_or(3);
                ColorSpaceInfo::IccBased(n as u8)
            }
            "Indexed" => {
                let base = arr
                    .get(1)
                    .map(|o| match o {
                        Object::Name(n) => color_space_from_name(n),
                        Object::Array(inner) => self.color_space_from_array(inner),
                        _ => ColorSpaceInfo::Named("unknown".to_string()),
                    })
                    .unwrap_or(ColorSpaceInfo::DeviceRgb);
                ColorSpaceInfo::Indexed(base.components())
            }
            "Separation" => ColorSpaceInfo::Separation,
            "DeviceN" => {
                let n = arr
                    .get(1)
                    .and_then(|o| o.as_array().ok())
                    .map(|names| names.len() as u8)
                    .unwrap_or(4);
                ColorSpaceInfo::DeviceN(n)
            }
            other => ColorSpaceInfo::Named(other.to_string()),
        }
    }

    /// Build an [`ImageObject`] from an image XObject stream.
    fn image_from_stream(&self, name: &[u8], stream: &lopdf::Stream) -> Option<ImageObject> {
        let dict = &stream.dict;

        let subtype = dict.get(b"Subtype").ok().and_then(|s| s.as_name_str().ok());
        if subtype != Some("Image") {
            return None;
        }

        let width = dict.get(b"Width").ok().and_then(|w| w.as_i64().ok())? as u32;
        let height = dict.get(b"Height").ok().and_then(|h| h.as_i64().ok())? as u32;
        let bits = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|b| b.as_i64().ok())
            .unwrap_or(8) as u8;

        let filter_names = image_filter_names(dict);
        let filter = if filter_names.iter().any(|f| f == "DCTDecode") {
            ImageFilter::Jpeg
        } else if filter_names
            .iter()
            .all(|f| f == "FlateDecode" || f == "LZWDecode")
        {
            ImageFilter::Raw
        } else {
            ImageFilter::Unsupported(filter_names.join("+"))
        };

        let data = match filter {
            ImageFilter::Raw => stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
            _ => stream.content.clone(),
        };

        Some(ImageObject {
            name: String::from_utf8_lossy(name).to_string(),
            width,
            height,
            bits_per_component: bits,
            color: self.resolve_color_space(dict),
            filter,
            data,
        })
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut result = Vec::with_capacity(lopdf_fonts.len());
        for (name, font_dict) in &lopdf_fonts {
            let base_font = font_dict
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            result.push(BackendFontInfo {
                name: name.clone(),
                base_font,
            });
        }
        Ok(result)
    }

    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        // Uncompressed streams have no /Filter entry; fall back to their
        // raw bytes.
        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return Ok(s
                        .decompressed_content()
                        .unwrap_or_else(|_| s.content.clone()));
                }
                Err(Error::PdfParse("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            let data = s
                                .decompressed_content()
                                .unwrap_or_else(|_| s.content.clone());
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(lopdf_fonts) = self.doc.get_page_fonts(page) {
            if let Some(font_dict) = lopdf_fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }

    fn page_images(&self, page_id: PageId) -> Result<Vec<ImageObject>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let Some(res_dict) = page_dict
            .get(b"Resources")
            .ok()
            .and_then(|r| self.resolve_dict(r))
        else {
            return Ok(Vec::new());
        };

        let Some(xobj_dict) = res_dict
            .get(b"XObject")
            .ok()
            .and_then(|x| self.resolve_dict(x))
        else {
            return Ok(Vec::new());
        };

        let mut images = Vec::new();
        for (name, obj) in xobj_dict.iter() {
            let Ok(obj_ref) = obj.as_reference() else {
                continue;
            };
            if let Ok(Object::Stream(stream)) = self.doc.get_object(obj_ref) {
                if let Some(image) = self.image_from_stream(name, stream) {
                    images.push(image);
                }
            }
        }
        Ok(images)
    }
}

/// Collect the names of the /Filter entry of an image dictionary.
fn image_filter_names(dict: &Dictionary) -> Vec<String> {
    match dict.get(b"Filter") {
        Ok(Object::Name(n)) => vec![String::from_utf8_lossy(n).to_string()],
        Ok(Object::Array(arr)) => arr
            .iter()
            .filter_map(|o| o.as_name_str().ok())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn color_space_from_name(name: &[u8]) -> ColorSpaceInfo {
    match name {
        b"DeviceGray" | b"CalGray" | b"G" => ColorSpaceInfo::DeviceGray,
        b"DeviceRGB" | b"CalRGB" | b"RGB" => ColorSpaceInfo::DeviceRgb,
        b"DeviceCMYK" | b"CMYK" => ColorSpaceInfo::DeviceCmyk,
        other => ColorSpaceInfo::Named(String::from_utf8_lossy(other).to_string()),
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

/// Helper: extract a number from a [`PdfValue`].
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        // 0xE9 = 'é' in Latin-1
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        // UTF-16BE BOM + "Hi"
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_get_number_from_value() {
        assert_eq!(get_number_from_value(&PdfValue::Integer(42)), Some(42.0));
        assert_eq!(get_number_from_value(&PdfValue::Real(3.5)), Some(3.5));
        assert_eq!(get_number_from_value(&PdfValue::Other), None);
    }

    #[test]
    fn test_channel_counts() {
        assert_eq!(ColorSpaceInfo::DeviceGray.channel_count(), 2);
        assert_eq!(ColorSpaceInfo::DeviceRgb.channel_count(), 4);
        assert_eq!(ColorSpaceInfo::DeviceCmyk.channel_count(), 5);
        assert_eq!(ColorSpaceInfo::IccBased(4).channel_count(), 5);
        assert_eq!(ColorSpaceInfo::Indexed(3).channel_count(), 4);
    }

    #[test]
    fn test_color_space_from_name() {
        assert_eq!(
            color_space_from_name(b"DeviceRGB"),
            ColorSpaceInfo::DeviceRgb
        );
        assert_eq!(
            color_space_from_name(b"DeviceCMYK"),
            ColorSpaceInfo::DeviceCmyk
        );
        assert!(matches!(
            color_space_from_name(b"Lab"),
            ColorSpaceInfo::Named(_)
        ));
    }
}
