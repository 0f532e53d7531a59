//! PNG image format support
//!
//! Lossless RGBA round-tripping for regression goldens and debug output,
//! using the `png` crate. Grayscale, grayscale-alpha, and RGB sources are
//! widened to RGBA on read; writes are always 8-bit RGBA.

use crate::{IoError, IoResult};
use leafstitch_core::{RasterImage, Rgba};
use png::{BitDepth, ColorType, Decoder, Encoder};
use std::io::{Cursor, Read, Write};

/// Read a PNG image.
pub fn read_png<R: Read>(mut reader: R) -> IoResult<RasterImage> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let decoder = Decoder::new(Cursor::new(bytes));
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    if bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG bit depth: {:?}",
            bit_depth
        )));
    }

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let image = RasterImage::new(width, height)?;
    let mut out = image.try_into_mut().unwrap();

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];

    match color_type {
        ColorType::Grayscale => {
            for y in 0..height {
                let row = y as usize * bytes_per_row;
                for x in 0..width {
                    let v = data[row + x as usize];
                    out.set_rgba_unchecked(x, y, Rgba::opaque(v, v, v));
                }
            }
        }
        ColorType::GrayscaleAlpha => {
            for y in 0..height {
                let row = y as usize * bytes_per_row;
                for x in 0..width {
                    let idx = row + (x as usize) * 2;
                    let v = data[idx];
                    out.set_rgba_unchecked(x, y, Rgba::new(v, v, v, data[idx + 1]));
                }
            }
        }
        ColorType::Rgb => {
            for y in 0..height {
                let row = y as usize * bytes_per_row;
                for x in 0..width {
                    let idx = row + (x as usize) * 3;
                    out.set_rgba_unchecked(
                        x,
                        y,
                        Rgba::opaque(data[idx], data[idx + 1], data[idx + 2]),
                    );
                }
            }
        }
        ColorType::Rgba => {
            for y in 0..height {
                let row = y as usize * bytes_per_row;
                for x in 0..width {
                    let idx = row + (x as usize) * 4;
                    out.set_rgba_unchecked(
                        x,
                        y,
                        Rgba::new(data[idx], data[idx + 1], data[idx + 2], data[idx + 3]),
                    );
                }
            }
        }
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG color type: {:?}",
                other
            )));
        }
    }

    Ok(out.into())
}

/// Write a PNG image as 8-bit RGBA.
pub fn write_png<W: Write>(writer: W, image: &RasterImage) -> IoResult<()> {
    let width = image.width();
    let height = image.height();

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for &pixel in image.row(y) {
            let c = Rgba::unpack(pixel);
            data.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
    }

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    Ok(())
}
