//! Left-to-right gradient-blend composition
//!
//! # Algorithm Overview
//!
//! 1. **Align**: express every segment in a common vertical frame
//!    (midrib detection, manual offsets, or nothing).
//! 2. **Size**: canvas width is the first image's width plus each later
//!    image's width minus its pair overlap; height is the tallest aligned
//!    image. The canvas is pre-filled with the background color so height
//!    mismatches render as light-table white, not undefined black.
//! 3. **Compose**: draw image 0 at x=0, then for each neighbor blend a
//!    strip of the pair overlap width with a linear left-to-right factor
//!    and draw the remainder unblended. Strictly sequential; each seam
//!    reads the previous image's trailing edge.
//!
//! Blending interpolates all four channels linearly with rounding; no
//! gamma correction.

use crate::{StitchError, StitchResult};
use leafstitch_align::correlate::{CorrelationOptions, find_offset};
use leafstitch_align::midrib::MidribOptions;
use leafstitch_align::planner::{apply_offsets, plan_and_apply};
use leafstitch_core::{RasterImage, Rgba};

/// Upper bound on composite canvas size, in pixels. A canvas beyond this
/// would risk an allocation abort instead of a recoverable error.
const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// How the segments are brought into a common vertical frame before
/// composition.
#[derive(Debug, Clone, Default)]
pub enum AlignmentMode {
    /// Compose the segments as captured
    #[default]
    None,
    /// Detect each segment's midrib and align on the first segment's row
    Midrib(MidribOptions),
    /// Operator-supplied vertical offsets, one per segment
    Manual(Vec<i32>),
}

/// Options for panorama composition
#[derive(Debug, Clone)]
pub struct StitchOptions {
    /// Fraction of each segment's width expected to overlap its neighbor
    /// (default: 0.10). Must be in (0, 1).
    pub overlap_fraction: f32,

    /// Vertical pre-alignment of the segments
    pub alignment: AlignmentMode,

    /// Canvas background color (default: white, the light-table color)
    pub background: Rgba,
}

impl Default for StitchOptions {
    fn default() -> Self {
        Self {
            overlap_fraction: 0.10,
            alignment: AlignmentMode::None,
            background: Rgba::WHITE,
        }
    }
}

impl StitchOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expected overlap fraction
    pub fn with_overlap_fraction(mut self, fraction: f32) -> Self {
        self.overlap_fraction = fraction;
        self
    }

    /// Set the alignment mode
    pub fn with_alignment(mut self, alignment: AlignmentMode) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the canvas background color
    pub fn with_background(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    /// Validate options
    pub fn validate(&self) -> StitchResult<()> {
        if !(self.overlap_fraction > 0.0 && self.overlap_fraction < 1.0) {
            return Err(StitchError::InvalidParameter(format!(
                "overlap_fraction must be in (0, 1), got {}",
                self.overlap_fraction
            )));
        }
        Ok(())
    }
}

/// Progress notification, one per seam
#[derive(Debug, Clone, Copy)]
pub struct StitchProgress {
    /// Seam being composed, 1-based
    pub pair: usize,
    /// Total number of seams
    pub total: usize,
}

/// Stitch a left-to-right sequence of segments into one composite.
///
/// # Errors
///
/// - [`StitchError::NoImages`] for an empty sequence
/// - [`StitchError::CanvasTooLarge`] when the composite would exceed the
///   pixel budget
/// - alignment errors from the midrib/manual pre-pass
///
/// A single image is returned as a pixel-identical copy.
pub fn stitch(images: &[RasterImage], options: &StitchOptions) -> StitchResult<RasterImage> {
    stitch_with_progress(images, options, |_| true)
}

/// [`stitch`] with a per-seam progress callback.
///
/// The callback runs before each seam is composed; returning `false`
/// cancels the operation with [`StitchError::Cancelled`]. This is the
/// cancellation granularity: pixel loops themselves are not interruptible.
pub fn stitch_with_progress(
    images: &[RasterImage],
    options: &StitchOptions,
    on_progress: impl FnMut(StitchProgress) -> bool,
) -> StitchResult<RasterImage> {
    options.validate()?;

    if images.is_empty() {
        return Err(StitchError::NoImages);
    }
    if images.len() == 1 {
        return Ok(images[0].deep_clone());
    }

    let aligned = align_segments(images, options)?;
    let overlaps = pair_overlaps(&aligned, options.overlap_fraction);
    compose(&aligned, &overlaps, options.background, on_progress)
}

/// Automatic variant for captures without per-segment alignment: estimates
/// a small (dx, dy) per seam by correlation over the edge strips.
///
/// A match at or above `correlation.min_score` shifts that pair's
/// effective overlap by dx and the segment's vertical placement by the
/// accumulated dy; below the floor the pair falls back to plain
/// concatenation at the configured overlap.
pub fn stitch_auto(
    images: &[RasterImage],
    options: &StitchOptions,
    correlation: &CorrelationOptions,
) -> StitchResult<RasterImage> {
    options.validate()?;
    correlation.validate().map_err(StitchError::Align)?;

    if images.is_empty() {
        return Err(StitchError::NoImages);
    }
    if images.len() == 1 {
        return Ok(images[0].deep_clone());
    }

    let nominal = pair_overlaps(images, options.overlap_fraction);
    let mut overlaps = Vec::with_capacity(nominal.len());
    let mut offsets = vec![0i32; images.len()];

    for i in 1..images.len() {
        let ow = nominal[i - 1];
        if ow == 0 {
            overlaps.push(0);
            offsets[i] = offsets[i - 1];
            continue;
        }

        let prev = &images[i - 1];
        let cur = &images[i];
        let left_strip = prev.crop(prev.width() - ow, 0, ow, prev.height())?;
        let right_strip = cur.crop(0, 0, ow, cur.height())?;
        let matched = find_offset(&left_strip, &right_strip, correlation)?;

        if matched.is_reliable(correlation.min_score) {
            let effective = (ow as i32 - matched.dx).clamp(0, ow as i32) as u32;
            overlaps.push(effective.min(prev.width()).min(cur.width()));
            offsets[i] = offsets[i - 1] + matched.dy;
        } else {
            log::debug!(
                "seam {}: correlation score {:.1} below floor {:.1}, concatenating",
                i,
                matched.score,
                correlation.min_score
            );
            overlaps.push(ow);
            offsets[i] = offsets[i - 1];
        }
    }

    let aligned = if offsets.iter().any(|&o| o != 0) {
        apply_offsets(images, &offsets, options.background)?
    } else {
        images.to_vec()
    };

    compose(&aligned, &overlaps, options.background, |_| true)
}

/// Run the configured vertical pre-alignment.
fn align_segments(
    images: &[RasterImage],
    options: &StitchOptions,
) -> StitchResult<Vec<RasterImage>> {
    match &options.alignment {
        AlignmentMode::None => Ok(images.to_vec()),
        AlignmentMode::Midrib(midrib_options) => {
            let (shifted, _) = plan_and_apply(images, None, midrib_options, options.background)?;
            Ok(shifted)
        }
        AlignmentMode::Manual(offsets) => {
            Ok(apply_offsets(images, offsets, options.background)?)
        }
    }
}

/// Effective overlap width for each adjacent pair: the configured width
/// clamped by both neighbors, so narrow segments degrade to butt placement
/// instead of failing.
fn pair_overlaps(images: &[RasterImage], overlap_fraction: f32) -> Vec<u32> {
    let configured = (images[0].width() as f32 * overlap_fraction).round() as u32;
    images
        .windows(2)
        .map(|pair| configured.min(pair[0].width()).min(pair[1].width()))
        .collect()
}

/// Sequential left-to-right composition over pre-computed pair overlaps.
fn compose(
    images: &[RasterImage],
    overlaps: &[u32],
    background: Rgba,
    mut on_progress: impl FnMut(StitchProgress) -> bool,
) -> StitchResult<RasterImage> {
    let total_width = images[0].width() as u64
        + images[1..]
            .iter()
            .zip(overlaps)
            .map(|(img, &ow)| (img.width() - ow) as u64)
            .sum::<u64>();
    let height = images.iter().map(|img| img.height()).max().unwrap() as u64;

    if total_width * height > MAX_CANVAS_PIXELS || total_width > u32::MAX as u64 {
        return Err(StitchError::CanvasTooLarge {
            width: total_width,
            height,
        });
    }

    let mut canvas = RasterImage::new_filled(total_width as u32, height as u32, background)?
        .try_into_mut()
        .unwrap();

    // First image verbatim at x=0
    let first = &images[0];
    for y in 0..first.height() {
        canvas.row_mut(y)[..first.width() as usize].copy_from_slice(first.row(y));
    }
    let mut cursor = first.width();

    let seams = images.len() - 1;
    for i in 1..images.len() {
        if !on_progress(StitchProgress {
            pair: i,
            total: seams,
        }) {
            return Err(StitchError::Cancelled);
        }

        let prev = &images[i - 1];
        let cur = &images[i];
        let ow = overlaps[i - 1];

        if ow > 0 {
            // Blend strip over the previous image's trailing columns
            let strip_x = cursor - ow;
            let prev_x0 = prev.width() - ow;
            for sx in 0..ow {
                let t = sx as f32 / ow as f32;
                for y in 0..height as u32 {
                    let from_prev = prev.get_pixel(prev_x0 + sx, y);
                    let from_cur = cur.get_pixel(sx, y);
                    let blended = match (from_prev, from_cur) {
                        (Some(p), Some(c)) => blend_pixel(p, c, t),
                        (Some(p), None) => p,
                        (None, Some(c)) => c,
                        (None, None) => continue,
                    };
                    canvas.set_pixel_unchecked(strip_x + sx, y, blended);
                }
            }
        }

        // Remainder of the current image, unblended
        for y in 0..cur.height() {
            let row = cur.row(y);
            let dst = &mut canvas.row_mut(y)[cursor as usize..(cursor + cur.width() - ow) as usize];
            dst.copy_from_slice(&row[ow as usize..]);
        }
        cursor += cur.width() - ow;

        log::debug!("composed seam {}/{} (cursor at {})", i, seams, cursor);
    }

    Ok(canvas.into())
}

/// Linear per-channel interpolation with rounding. `t` = 0 gives `prev`,
/// `t` = 1 gives `cur`.
fn blend_pixel(prev: u32, cur: u32, t: f32) -> u32 {
    let p = Rgba::unpack(prev);
    let c = Rgba::unpack(cur);
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Rgba::new(
        lerp(p.r, c.r),
        lerp(p.g, c.g),
        lerp(p.b, c.b),
        lerp(p.a, c.a),
    )
    .pack()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, color: Rgba) -> RasterImage {
        RasterImage::new_filled(w, h, color).unwrap()
    }

    #[test]
    fn test_options_validation() {
        assert!(StitchOptions::default().validate().is_ok());
        assert!(StitchOptions::new().with_overlap_fraction(0.0).validate().is_err());
        assert!(StitchOptions::new().with_overlap_fraction(1.0).validate().is_err());
    }

    #[test]
    fn test_empty_input_is_error() {
        let result = stitch(&[], &StitchOptions::default());
        assert!(matches!(result, Err(StitchError::NoImages)));
    }

    #[test]
    fn test_single_image_identical_copy() {
        let img = solid(120, 90, Rgba::opaque(10, 200, 30));
        let out = stitch(&[img.clone()], &StitchOptions::default()).unwrap();
        assert!(out.sizes_equal(&img));
        assert_eq!(out.data(), img.data());
        // A copy, not a shared handle
        assert_ne!(out.data().as_ptr(), img.data().as_ptr());
    }

    #[test]
    fn test_width_invariant() {
        // W + (N-1) * (W - round(W*p)) for equal widths
        let imgs: Vec<_> = (0..4).map(|_| solid(200, 100, Rgba::WHITE)).collect();
        let opts = StitchOptions::new().with_overlap_fraction(0.15);
        let out = stitch(&imgs, &opts).unwrap();
        assert_eq!(out.width(), 200 + 3 * (200 - 30));
        assert_eq!(out.height(), 100);
    }

    #[test]
    fn test_blend_boundaries() {
        let red = Rgba::opaque(255, 0, 0);
        let blue = Rgba::opaque(0, 0, 255);
        let opts = StitchOptions::new().with_overlap_fraction(0.10);
        let out = stitch(&[solid(400, 100, red), solid(400, 100, blue)], &opts).unwrap();

        // Strip spans columns 360..400; factor 0 at its left edge
        assert_eq!(out.get_rgba(360, 50), Some(red));
        // Midpoint column: factor 20/40 = 0.5, a 50/50 mix
        assert_eq!(out.get_rgba(380, 50), Some(Rgba::opaque(128, 0, 128)));
        // Just past the strip: pure current image
        assert_eq!(out.get_rgba(400, 50), Some(blue));
        // Last strip column approaches the current image
        let near_end = out.get_rgba(399, 50).unwrap();
        assert!(near_end.b > 240 && near_end.r < 15);
    }

    #[test]
    fn test_height_mismatch_fills_background() {
        let tall = solid(100, 120, Rgba::opaque(50, 50, 50));
        let short = solid(100, 80, Rgba::opaque(200, 200, 200));
        let opts = StitchOptions::new().with_overlap_fraction(0.10);
        let out = stitch(&[tall, short], &opts).unwrap();

        assert_eq!(out.height(), 120);
        // Below the short image's extent, right side is background white
        assert_eq!(out.get_rgba(150, 110), Some(Rgba::WHITE));
        // In the strip below the short image, the tall side shows through
        assert_eq!(out.get_rgba(95, 110), Some(Rgba::opaque(50, 50, 50)));
    }

    #[test]
    fn test_progress_reported_per_seam() {
        let imgs: Vec<_> = (0..3).map(|_| solid(100, 50, Rgba::WHITE)).collect();
        let mut seen = Vec::new();
        stitch_with_progress(&imgs, &StitchOptions::default(), |p| {
            seen.push((p.pair, p.total));
            true
        })
        .unwrap();
        assert_eq!(seen, vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_cancellation() {
        let imgs: Vec<_> = (0..3).map(|_| solid(100, 50, Rgba::WHITE)).collect();
        let result = stitch_with_progress(&imgs, &StitchOptions::default(), |p| p.pair < 2);
        assert!(matches!(result, Err(StitchError::Cancelled)));
    }

    #[test]
    fn test_manual_alignment_expands_canvas() {
        let imgs = vec![solid(100, 60, Rgba::WHITE), solid(100, 60, Rgba::WHITE)];
        let opts = StitchOptions::new()
            .with_overlap_fraction(0.10)
            .with_alignment(AlignmentMode::Manual(vec![0, 15]));
        let out = stitch(&imgs, &opts).unwrap();
        assert_eq!(out.height(), 75);
    }

    #[test]
    fn test_narrow_image_degrades_to_concatenation() {
        // Second image narrower than the configured overlap: the pair
        // overlap clamps to the narrow width and the remainder is empty
        let wide = solid(400, 50, Rgba::opaque(10, 10, 10));
        let narrow = solid(30, 50, Rgba::opaque(250, 250, 250));
        let opts = StitchOptions::new().with_overlap_fraction(0.10);
        let out = stitch(&[wide, narrow], &opts).unwrap();
        // Overlap clamps to 30: width 400 + 30 - 30
        assert_eq!(out.width(), 400);
    }

    #[test]
    fn test_stitch_auto_identical_edges() {
        // Identical flat images correlate perfectly at zero offset; the
        // result matches the plain stitcher
        let imgs = vec![
            solid(200, 100, Rgba::opaque(120, 140, 90)),
            solid(200, 100, Rgba::opaque(120, 140, 90)),
        ];
        let opts = StitchOptions::new().with_overlap_fraction(0.10);
        let auto = stitch_auto(&imgs, &opts, &CorrelationOptions::default()).unwrap();
        let plain = stitch(&imgs, &opts).unwrap();
        assert_eq!(auto.data(), plain.data());
    }

    #[test]
    fn test_blend_pixel_rounding() {
        let a = Rgba::opaque(10, 0, 0).pack();
        let b = Rgba::opaque(11, 0, 0).pack();
        // 10.5 rounds away from zero
        assert_eq!(Rgba::unpack(blend_pixel(a, b, 0.5)).r, 11);
        assert_eq!(blend_pixel(a, b, 0.0), a);
        assert_eq!(blend_pixel(a, b, 1.0), b);
    }
}
