//! Figure extraction: embedded raster images persisted as PNGs.

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat, RgbImage};

use crate::error::{Error, Result};
use crate::model::FigureRef;

use super::backend::{ColorSpaceInfo, ImageFilter, ImageObject, PageId, PdfBackend};
use super::outcome::StrategyOutcome;

/// Channel counts at or above this value mark process-color images
/// (CMYK and wider) that are skipped instead of converted.
const MAX_CHANNELS: u8 = 5;

/// Extracts a page's embedded images into the figures directory.
///
/// Images are enumerated in document-embedding order and written as
/// `page<N>_fig<K>.png`, where K is the image's 1-based position in that
/// order. K counts every embedded image, so skipped images leave gaps in
/// the persisted filenames. Re-running overwrites same-named files.
pub struct FigureExtractor {
    figures_dir: PathBuf,
}

impl FigureExtractor {
    /// Create an extractor writing into the given directory.
    pub fn new(figures_dir: PathBuf) -> Self {
        Self { figures_dir }
    }

    /// Create the figures directory if absent. Safe to call repeatedly.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.figures_dir)?;
        Ok(())
    }

    /// Extract and persist the qualifying images of one page.
    ///
    /// Process-color images are silently skipped. A failure to decode or
    /// write one image skips that image only. Failure to enumerate the
    /// page's images at all is reported as a strategy failure for the
    /// caller's error boundary.
    pub fn extract(
        &self,
        backend: &dyn PdfBackend,
        page_id: PageId,
        page_num: u32,
    ) -> StrategyOutcome<Vec<FigureRef>> {
        let images = match backend.page_images(page_id) {
            Ok(images) => images,
            Err(err) => return StrategyOutcome::Failed(err),
        };

        let mut refs = Vec::new();
        // Consuming the vector lets each image's decode buffer drop as
        // soon as its PNG is written.
        for (idx, img) in images.into_iter().enumerate() {
            let index = idx as u32 + 1;

            if img.channel_count() >= MAX_CHANNELS {
                log::debug!(
                    "page {}: skipping image {} ({} channels)",
                    page_num,
                    index,
                    img.channel_count()
                );
                continue;
            }

            let figure = FigureRef::new(page_num, index);
            let path = self.figures_dir.join(&figure.filename);
            match write_png(&path, img) {
                Ok(()) => refs.push(figure),
                Err(err) => {
                    log::warn!("page {}: image {} not persisted: {}", page_num, index, err);
                }
            }
        }

        if refs.is_empty() {
            StrategyOutcome::Empty
        } else {
            StrategyOutcome::Extracted(refs)
        }
    }
}

/// Decode one image object and write it as a PNG file.
fn write_png(path: &Path, img: ImageObject) -> Result<()> {
    match img.filter {
        ImageFilter::Jpeg => {
            let decoded = image::load_from_memory(&img.data)
                .map_err(|e| Error::ImageExtract(e.to_string()))?;
            decoded
                .save_with_format(path, ImageFormat::Png)
                .map_err(|e| Error::ImageExtract(e.to_string()))?;
        }
        ImageFilter::Raw => {
            let samples = expand_samples(&img)?;
            save_samples(path, &img, samples)?;
        }
        ImageFilter::Unsupported(name) => {
            return Err(Error::ImageExtract(format!(
                "unsupported image filter: {}",
                name
            )));
        }
    }
    Ok(())
}

/// Expand raw stream samples into 8-bit-per-component pixel data.
fn expand_samples(img: &ImageObject) -> Result<Vec<u8>> {
    let components = img.color.components() as usize;
    let width = img.width as usize;
    let height = img.height as usize;

    match img.bits_per_component {
        8 => {
            let expected = width * height * components;
            if img.data.len() < expected {
                return Err(Error::ImageExtract(format!(
                    "image data too short: {} < {}",
                    img.data.len(),
                    expected
                )));
            }
            Ok(img.data[..expected].to_vec())
        }
        1 if components == 1 => {
            // Bi-level data is row-padded to byte boundaries
            let stride = width.div_ceil(8);
            if img.data.len() < stride * height {
                return Err(Error::ImageExtract("bitmap data too short".to_string()));
            }
            let mut out = Vec::with_capacity(width * height);
            for row in 0..height {
                let row_bytes = &img.data[row * stride..(row + 1) * stride];
                for col in 0..width {
                    let bit = (row_bytes[col / 8] >> (7 - col % 8)) & 1;
                    out.push(if bit == 1 { 255 } else { 0 });
                }
            }
            Ok(out)
        }
        bits => Err(Error::ImageExtract(format!(
            "unsupported bit depth: {}",
            bits
        ))),
    }
}

/// Write expanded samples through the matching image buffer type.
fn save_samples(path: &Path, img: &ImageObject, samples: Vec<u8>) -> Result<()> {
    match img.color {
        ColorSpaceInfo::DeviceGray => {
            let buffer = GrayImage::from_raw(img.width, img.height, samples)
                .ok_or_else(|| Error::ImageExtract("gray buffer size mismatch".to_string()))?;
            buffer
                .save_with_format(path, ImageFormat::Png)
                .map_err(|e| Error::ImageExtract(e.to_string()))
        }
        _ if img.color.components() == 3 => {
            let buffer = RgbImage::from_raw(img.width, img.height, samples)
                .ok_or_else(|| Error::ImageExtract("rgb buffer size mismatch".to_string()))?;
            buffer
                .save_with_format(path, ImageFormat::Png)
                .map_err(|e| Error::ImageExtract(e.to_string()))
        }
        _ if img.color.components() == 1 => {
            let buffer = GrayImage::from_raw(img.width, img.height, samples)
                .ok_or_else(|| Error::ImageExtract("gray buffer size mismatch".to_string()))?;
            buffer
                .save_with_format(path, ImageFormat::Png)
                .map_err(|e| Error::ImageExtract(e.to_string()))
        }
        ref other => Err(Error::ImageExtract(format!(
            "cannot export color space {:?} without conversion",
            other
        ))),
    }
}
