//! leafstitch-core - Raster data structures for leaf panorama stitching
//!
//! This crate provides the pixel buffer abstraction shared by the alignment
//! and compositing crates:
//!
//! - [`RasterImage`]: an RGBA raster with shared ownership (cheap to clone)
//! - [`RasterMut`]: the exclusive mutable form, converted back via `Into`
//! - [`Rgba`]: an 8-bit-per-channel color value with packing helpers
//!
//! # Pixel layout
//!
//! Each pixel is one `u32` with red in the most significant byte
//! (`r<<24 | g<<16 | b<<8 | a`). Rows are stored contiguously, `width`
//! pixels per row.
//!
//! # Ownership model
//!
//! `RasterImage` uses `Arc` for efficient cloning. The stitching algorithms
//! never mutate an input in place: every transform (crop, scale, shift,
//! blend) allocates a new buffer through [`RasterMut`] and freezes it with
//! `Into<RasterImage>`. Callers decide when to drop intermediate buffers.

mod color;
mod error;
mod raster;

pub use color::Rgba;
pub use error::{Error, Result};
pub use raster::{RasterImage, RasterMut};
