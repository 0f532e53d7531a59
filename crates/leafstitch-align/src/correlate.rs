//! Correlation-based offset search
//!
//! Estimates a small 2D displacement between the trailing edge of one
//! segment and the leading edge of the next by exhaustive search over a
//! grayscale-difference score. Used by the automatic stitcher variant for
//! captures without per-segment crop/alignment pre-processing.
//!
//! # Algorithm Overview
//!
//! 1. **Reduce**: both edge strips are downsampled by a fixed factor.
//! 2. **Sweep**: every candidate (dx, dy) in the reduced search window is
//!    scored by sampling a grid of pixel pairs, converting each to
//!    grayscale (mean of R, G, B) and accumulating `255 - |gl - gr|`.
//! 3. **Scale back**: the winning offset is multiplied by the reduction
//!    factor. The normalized score rides along as a confidence proxy.
//!
//! The search is brute force; the reduction factor and the sample stride
//! are the only performance mitigations.

use crate::{AlignError, AlignResult};
use leafstitch_core::{RasterImage, Rgba};

/// Candidate overlap fractions tried by [`estimate_overlap`].
const OVERLAP_CANDIDATES: [f32; 7] = [0.10, 0.15, 0.20, 0.25, 0.30, 0.35, 0.40];

/// Options for correlation offset search
#[derive(Debug, Clone)]
pub struct CorrelationOptions {
    /// Horizontal search range in full-scale pixels (default: 20)
    pub search_range_x: u32,

    /// Vertical search range in full-scale pixels (default: 50)
    pub search_range_y: u32,

    /// Downsample factor applied to both strips: 1, 2, 4, or 8 (default: 4)
    pub reduction: u32,

    /// Sample every Nth pixel in both dimensions when scoring (default: 2)
    pub sample_stride: u32,

    /// Confidence floor in [0, 255] (default: 160). Matches scoring below
    /// this are reported but flagged unreliable; the automatic stitcher
    /// falls back to plain concatenation for them.
    pub min_score: f32,
}

impl Default for CorrelationOptions {
    fn default() -> Self {
        Self {
            search_range_x: 20,
            search_range_y: 50,
            reduction: 4,
            sample_stride: 2,
            min_score: 160.0,
        }
    }
}

impl CorrelationOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal search range (full-scale pixels)
    pub fn with_search_range_x(mut self, range: u32) -> Self {
        self.search_range_x = range;
        self
    }

    /// Set the vertical search range (full-scale pixels)
    pub fn with_search_range_y(mut self, range: u32) -> Self {
        self.search_range_y = range;
        self
    }

    /// Set the downsample factor
    pub fn with_reduction(mut self, reduction: u32) -> Self {
        self.reduction = reduction;
        self
    }

    /// Set the scoring sample stride
    pub fn with_sample_stride(mut self, stride: u32) -> Self {
        self.sample_stride = stride;
        self
    }

    /// Set the confidence floor
    pub fn with_min_score(mut self, score: f32) -> Self {
        self.min_score = score;
        self
    }

    /// Validate options
    pub fn validate(&self) -> AlignResult<()> {
        if !matches!(self.reduction, 1 | 2 | 4 | 8) {
            return Err(AlignError::InvalidParameter(format!(
                "reduction must be 1, 2, 4, or 8, got {}",
                self.reduction
            )));
        }
        if self.sample_stride == 0 {
            return Err(AlignError::InvalidParameter(
                "sample_stride must be at least 1".to_string(),
            ));
        }
        if !(0.0..=255.0).contains(&self.min_score) {
            return Err(AlignError::InvalidParameter(format!(
                "min_score must be in [0, 255], got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}

/// Result of a correlation offset search
///
/// `dx` positive means the right strip's content matches when shifted
/// right; `dy` positive when shifted down. The score is the mean per-pixel
/// similarity in [0, 255]; it has no absolute meaning across image pairs
/// and is best treated comparatively.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationMatch {
    pub dx: i32,
    pub dy: i32,
    pub score: f32,
}

impl CorrelationMatch {
    /// Whether the score clears the given confidence floor.
    pub fn is_reliable(&self, floor: f32) -> bool {
        self.score >= floor
    }
}

/// Find the offset between two edge strips with the best correlation score.
///
/// `left_edge` is the trailing columns of the previous segment and
/// `right_edge` the leading columns of the next one. The returned offset is
/// expressed in full-scale pixels.
///
/// # Errors
///
/// Propagates option validation and downsampling errors.
pub fn find_offset(
    left_edge: &RasterImage,
    right_edge: &RasterImage,
    options: &CorrelationOptions,
) -> AlignResult<CorrelationMatch> {
    options.validate()?;

    let reduced = if options.reduction > 1 {
        let factor = 1.0 / options.reduction as f32;
        Some((
            left_edge.scale_by_sampling(factor, factor)?,
            right_edge.scale_by_sampling(factor, factor)?,
        ))
    } else {
        None
    };
    let (left, right) = match &reduced {
        Some((l, r)) => (l, r),
        None => (left_edge, right_edge),
    };

    let range_x = (options.search_range_x / options.reduction) as i32;
    let range_y = (options.search_range_y / options.reduction) as i32;

    let mut best_dx = 0i32;
    let mut best_dy = 0i32;
    let mut best_score = f32::MIN;

    for dy in -range_y..=range_y {
        for dx in -range_x..=range_x {
            let score = similarity_at(left, right, dx, dy, options.sample_stride);
            // Ties go to the smaller displacement, so featureless regions
            // report no offset instead of a search-window corner
            let better = score > best_score
                || (score == best_score && dx.abs() + dy.abs() < best_dx.abs() + best_dy.abs());
            if better {
                best_score = score;
                best_dx = dx;
                best_dy = dy;
            }
        }
    }

    let matched = CorrelationMatch {
        dx: best_dx * options.reduction as i32,
        dy: best_dy * options.reduction as i32,
        score: best_score.max(0.0),
    };

    log::trace!(
        "correlation winner ({}, {}) score {:.1}",
        matched.dx,
        matched.dy,
        matched.score
    );

    Ok(matched)
}

/// Estimate the overlap fraction between two adjacent whole segments.
///
/// Tries each candidate fraction from 10% to 40%, scores the matching edge
/// strips at zero offset, and returns the best-scoring fraction. Used to
/// auto-detect capture overlap when it is not fixed by a physical guide.
pub fn estimate_overlap(
    left: &RasterImage,
    right: &RasterImage,
    options: &CorrelationOptions,
) -> AlignResult<f32> {
    options.validate()?;

    let base_width = left.width().min(right.width());
    let factor = 1.0 / options.reduction as f32;

    let mut best_fraction = OVERLAP_CANDIDATES[0];
    let mut best_score = f32::MIN;

    for &fraction in &OVERLAP_CANDIDATES {
        let overlap_w = ((base_width as f32 * fraction).round() as u32).max(1);
        let left_strip = left.crop(left.width() - overlap_w, 0, overlap_w, left.height())?;
        let right_strip = right.crop(0, 0, overlap_w, right.height())?;

        let (a, b) = if options.reduction > 1 {
            (
                left_strip.scale_by_sampling(factor, factor)?,
                right_strip.scale_by_sampling(factor, factor)?,
            )
        } else {
            (left_strip, right_strip)
        };

        let score = similarity_at(&a, &b, 0, 0, options.sample_stride);
        if score > best_score {
            best_score = score;
            best_fraction = fraction;
        }
    }

    Ok(best_fraction)
}

/// Mean grayscale similarity of two images under a candidate offset.
///
/// Samples every `stride`-th pixel; pairs where either side falls outside
/// its image are skipped. Returns 0 when nothing overlaps.
pub(crate) fn similarity_at(
    a: &RasterImage,
    b: &RasterImage,
    dx: i32,
    dy: i32,
    stride: u32,
) -> f32 {
    let mut total = 0u64;
    let mut count = 0u64;

    let mut y = 0u32;
    while y < a.height() {
        let by = y as i32 - dy;
        if by >= 0 && (by as u32) < b.height() {
            let mut x = 0u32;
            while x < a.width() {
                let bx = x as i32 - dx;
                if bx >= 0 && (bx as u32) < b.width() {
                    let ga = Rgba::unpack(a.get_pixel_unchecked(x, y)).gray() as i64;
                    let gb = Rgba::unpack(b.get_pixel_unchecked(bx as u32, by as u32)).gray() as i64;
                    total += (255 - (ga - gb).abs()) as u64;
                    count += 1;
                }
                x += stride;
            }
        }
        y += stride;
    }

    if count == 0 {
        return 0.0;
    }
    total as f32 / count as f32
}
