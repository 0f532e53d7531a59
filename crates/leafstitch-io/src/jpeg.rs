//! JPEG image format support
//!
//! Reads with the `jpeg-decoder` crate and writes with `jpeg-encoder`.
//! Captured segments arrive as 24-bit RGB camera JPEGs and are widened to
//! RGBA internally; on encode the alpha channel is dropped, which is why
//! the alignment stages fill exposed canvas with opaque white rather than
//! transparency.

use crate::{IoError, IoResult};
use jpeg_decoder::{Decoder, PixelFormat};
use jpeg_encoder::{ColorType, Encoder};
use leafstitch_core::{RasterImage, Rgba};
use std::io::{Read, Write};

/// Encode quality used when persisting composites.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Read a JPEG image from a reader.
///
/// Supports 8-bit grayscale and 24-bit RGB streams; both decode to RGBA.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<RasterImage> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG stream has no header info".to_string()))?;

    let width = info.width as u32;
    let height = info.height as u32;

    let image = RasterImage::new(width, height)?;
    let mut out = image.try_into_mut().unwrap();

    match info.pixel_format {
        PixelFormat::L8 => {
            for y in 0..height {
                for x in 0..width {
                    let v = pixels[(y * width + x) as usize];
                    out.set_rgba_unchecked(x, y, Rgba::opaque(v, v, v));
                }
            }
        }
        PixelFormat::RGB24 => {
            for y in 0..height {
                for x in 0..width {
                    let idx = ((y * width + x) * 3) as usize;
                    out.set_rgba_unchecked(
                        x,
                        y,
                        Rgba::opaque(pixels[idx], pixels[idx + 1], pixels[idx + 2]),
                    );
                }
            }
        }
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported JPEG pixel format: {:?}",
                other
            )));
        }
    }

    Ok(out.into())
}

/// Write a JPEG image to a writer.
///
/// `quality` is 1-100; the alpha channel is discarded.
pub fn write_jpeg<W: Write>(mut writer: W, image: &RasterImage, quality: u8) -> IoResult<()> {
    let width = image.width();
    let height = image.height();
    if width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(IoError::EncodeError(format!(
            "image {}x{} exceeds the JPEG dimension limit of {}",
            width,
            height,
            u16::MAX
        )));
    }

    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for &pixel in image.row(y) {
            let c = Rgba::unpack(pixel);
            rgb.push(c.r);
            rgb.push(c.g);
            rgb.push(c.b);
        }
    }

    let mut encoded = Vec::new();
    let encoder = Encoder::new(&mut encoded, quality);
    encoder
        .encode(&rgb, width as u16, height as u16, ColorType::Rgb)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))?;

    writer.write_all(&encoded)?;
    Ok(())
}
