//! leafstitch-io - Segment ingest and composite persistence
//!
//! The alignment and compositing crates perform no I/O of their own; this
//! crate is the surrounding application's toolkit for getting rasters in
//! and out:
//!
//! - **JPEG**: captured segments arrive as camera JPEGs; the finished
//!   composite is persisted as JPEG at quality 95
//! - **PNG**: lossless format for regression goldens and debug dumps
//!
//! Format support is feature-gated (`jpeg` and `png-format`, both on by
//! default).

mod error;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;

pub use error::{IoError, IoResult};

use leafstitch_core::RasterImage;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Supported image file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JFIF JPEG
    Jpeg,
    /// PNG
    Png,
}

impl ImageFormat {
    /// Guess the format from a file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            _ => Err(IoError::UnsupportedFormat(format!(
                "unrecognized extension: {:?}",
                path.as_ref()
            ))),
        }
    }

    /// Get the conventional file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }
}

/// Read an image from a file path, dispatching on the extension.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<RasterImage> {
    let format = ImageFormat::from_path(&path)?;
    let reader = BufReader::new(File::open(&path)?);
    match format {
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(reader),
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(reader),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{:?} support not compiled in",
            other
        ))),
    }
}

/// Write an image to a file path, dispatching on the extension.
///
/// JPEG output uses [`jpeg::DEFAULT_JPEG_QUALITY`]; call
/// [`jpeg::write_jpeg`] directly for other qualities.
pub fn write_image<P: AsRef<Path>>(image: &RasterImage, path: P) -> IoResult<()> {
    let format = ImageFormat::from_path(&path)?;
    let writer = BufWriter::new(File::create(&path)?);
    match format {
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::write_jpeg(writer, image, jpeg::DEFAULT_JPEG_QUALITY),
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(writer, image),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{:?} support not compiled in",
            other
        ))),
    }
}
