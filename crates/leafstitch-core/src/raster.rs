//! The RGBA raster container
//!
//! [`RasterImage`] is the image type every alignment and compositing
//! operation works on. It is reference counted; mutation goes through
//! [`RasterMut`], which guarantees exclusive access at compile time.

use crate::color::Rgba;
use crate::error::{Error, Result};
use std::sync::Arc;

/// Internal raster data
#[derive(Debug)]
struct RasterData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Pixel data, one RGBA word per pixel, row-major
    data: Vec<u32>,
}

impl RasterData {
    fn alloc(width: u32, height: u32, fill: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = (width as usize) * (height as usize);
        Ok(RasterData {
            width,
            height,
            data: vec![fill; len],
        })
    }
}

/// RGBA raster image with shared ownership
///
/// Cloning is cheap (reference counted). To modify pixel data, convert to
/// [`RasterMut`] via [`RasterImage::try_into_mut`] or [`RasterImage::to_mut`],
/// then convert back with `Into<RasterImage>`.
///
/// # Examples
///
/// ```
/// use leafstitch_core::{RasterImage, Rgba};
///
/// let img = RasterImage::new_filled(640, 480, Rgba::WHITE).unwrap();
/// assert_eq!(img.width(), 640);
/// assert_eq!(img.height(), 480);
/// assert_eq!(img.get_rgba(0, 0), Some(Rgba::WHITE));
/// ```
#[derive(Debug, Clone)]
pub struct RasterImage {
    inner: Arc<RasterData>,
}

impl RasterImage {
    /// Create a new raster initialized to transparent black.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(RasterImage {
            inner: Arc::new(RasterData::alloc(width, height, 0)?),
        })
    }

    /// Create a new raster with every pixel set to `fill`.
    pub fn new_filled(width: u32, height: u32, fill: Rgba) -> Result<Self> {
        Ok(RasterImage {
            inner: Arc::new(RasterData::alloc(width, height, fill.pack())?),
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get raw access to the pixel data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get one row of pixels.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u32] {
        let w = self.inner.width as usize;
        let start = (y as usize) * w;
        &self.inner.data[start..start + w]
    }

    /// Get a pixel word at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel word without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        self.inner.data[(y as usize) * (self.inner.width as usize) + (x as usize)]
    }

    /// Get the color at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_rgba(&self, x: u32, y: u32) -> Option<Rgba> {
        self.get_pixel(x, y).map(Rgba::unpack)
    }

    /// Get the number of strong references to this raster.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Check if two rasters have the same width and height.
    pub fn sizes_equal(&self, other: &RasterImage) -> bool {
        self.inner.width == other.inner.width && self.inner.height == other.inner.height
    }

    /// Create a completely independent copy of this raster.
    ///
    /// Unlike `clone()`, which shares data via `Arc`, this duplicates the
    /// pixel buffer.
    pub fn deep_clone(&self) -> Self {
        RasterImage {
            inner: Arc::new(RasterData {
                width: self.inner.width,
                height: self.inner.height,
                data: self.inner.data.clone(),
            }),
        }
    }

    /// Try to get mutable access to the pixel data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<RasterMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(RasterMut { inner: data }),
            Err(arc) => Err(RasterImage { inner: arc }),
        }
    }

    /// Create a mutable copy of this raster.
    pub fn to_mut(&self) -> RasterMut {
        RasterMut {
            inner: RasterData {
                width: self.inner.width,
                height: self.inner.height,
                data: self.inner.data.clone(),
            },
        }
    }

    /// Extract a rectangular sub-region as a new raster.
    ///
    /// If the rectangle extends beyond the image bounds it is clipped to the
    /// valid region.
    ///
    /// # Errors
    ///
    /// Returns an error if `w` or `h` is 0, or if the rectangle origin lies
    /// entirely outside the image.
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Result<RasterImage> {
        if w == 0 || h == 0 {
            return Err(Error::InvalidParameter(format!(
                "crop rectangle has zero dimension: {}x{}",
                w, h
            )));
        }

        let src_w = self.width();
        let src_h = self.height();
        if x >= src_w || y >= src_h {
            return Err(Error::InvalidParameter(format!(
                "crop origin ({}, {}) is outside image bounds ({}x{})",
                x, y, src_w, src_h
            )));
        }

        let clip_w = w.min(src_w - x);
        let clip_h = h.min(src_h - y);

        let mut out = RasterImage::new(clip_w, clip_h)?.try_into_mut().unwrap();
        for dy in 0..clip_h {
            let src_row = self.row(y + dy);
            out.row_mut(dy)
                .copy_from_slice(&src_row[x as usize..(x + clip_w) as usize]);
        }
        Ok(out.into())
    }

    /// Resample with nearest-neighbor sampling.
    ///
    /// Output dimensions are `round(width * scale_x)` by
    /// `round(height * scale_y)`, clamped to at least 1x1.
    ///
    /// # Errors
    ///
    /// Returns an error if either scale factor is not positive.
    pub fn scale_by_sampling(&self, scale_x: f32, scale_y: f32) -> Result<RasterImage> {
        if scale_x <= 0.0 || scale_y <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "scale factors must be positive: {}x{}",
                scale_x, scale_y
            )));
        }

        let src_w = self.width();
        let src_h = self.height();
        let dst_w = ((src_w as f32 * scale_x).round() as u32).max(1);
        let dst_h = ((src_h as f32 * scale_y).round() as u32).max(1);

        let mut out = RasterImage::new(dst_w, dst_h)?.try_into_mut().unwrap();
        for dy in 0..dst_h {
            let sy = (((dy as f32 + 0.5) / scale_y) as u32).min(src_h - 1);
            for dx in 0..dst_w {
                let sx = (((dx as f32 + 0.5) / scale_x) as u32).min(src_w - 1);
                out.set_pixel_unchecked(dx, dy, self.get_pixel_unchecked(sx, sy));
            }
        }
        Ok(out.into())
    }

    /// Downscale so the result fits within `max_w` x `max_h`, preserving
    /// aspect ratio. Images already within the bounds are deep-copied
    /// unchanged; this never upscales.
    pub fn scale_to_fit(&self, max_w: u32, max_h: u32) -> Result<RasterImage> {
        if max_w == 0 || max_h == 0 {
            return Err(Error::InvalidDimension {
                width: max_w,
                height: max_h,
            });
        }
        let w = self.width();
        let h = self.height();
        if w <= max_w && h <= max_h {
            return Ok(self.deep_clone());
        }
        let factor = (max_w as f32 / w as f32).min(max_h as f32 / h as f32);
        self.scale_by_sampling(factor, factor)
    }
}

/// Mutable raster
///
/// Allows modification of pixel data. Convert back to an immutable
/// [`RasterImage`] using `Into<RasterImage>`.
#[derive(Debug)]
pub struct RasterMut {
    inner: RasterData,
}

impl RasterMut {
    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get raw access to the pixel data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get mutable raw access to the pixel data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.inner.data
    }

    /// Get mutable access to one row of pixels.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let w = self.inner.width as usize;
        let start = (y as usize) * w;
        &mut self.inner.data[start..start + w]
    }

    /// Get a pixel word at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(self.inner.data[(y as usize) * (self.inner.width as usize) + (x as usize)])
    }

    /// Set a pixel word at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the coordinates are outside the
    /// image.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        if x >= self.inner.width || y >= self.inner.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.inner.width,
                height: self.inner.height,
            });
        }
        self.set_pixel_unchecked(x, y, val);
        Ok(())
    }

    /// Set a pixel word without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        self.inner.data[(y as usize) * (self.inner.width as usize) + (x as usize)] = val;
    }

    /// Set a color without bounds checking.
    #[inline]
    pub fn set_rgba_unchecked(&mut self, x: u32, y: u32, color: Rgba) {
        self.set_pixel_unchecked(x, y, color.pack());
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Rgba) {
        self.inner.data.fill(color.pack());
    }
}

impl From<RasterMut> for RasterImage {
    fn from(raster_mut: RasterMut) -> Self {
        RasterImage {
            inner: Arc::new(raster_mut.inner),
        }
    }
}
