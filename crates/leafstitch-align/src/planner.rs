//! Vertical alignment planning
//!
//! Hand-held capture drifts vertically between segments. This module turns
//! per-segment midrib rows (or operator-supplied corrections) into one
//! signed vertical offset per segment, then re-expresses every segment on a
//! common expanded canvas so the compositor can concatenate them without
//! re-deriving vertical geometry.
//!
//! # Sign convention
//!
//! A positive offset shifts that image's content DOWN on the canvas:
//! content at row `y` lands at row `y + offset`. Offsets are computed as
//! `reference_y - detected_y`, so a midrib detected above the reference row
//! receives a positive offset and moves down onto it.
//!
//! Detected and manual offsets are two producers of the same offset list;
//! both flow through the single [`apply_offsets`] canvas-expansion routine.

use crate::midrib::{MidribOptions, MidribResult, find_midrib};
use crate::{AlignError, AlignResult};
use leafstitch_core::{RasterImage, Rgba};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Compute one vertical offset per image from detected midrib rows.
///
/// When `reference_y` is `None`, the first image's detected midrib row is
/// the reference, so `offsets[0]` is 0.
///
/// # Errors
///
/// Returns [`AlignError::EmptyInput`] for an empty image list and
/// propagates option validation errors.
pub fn plan_offsets(
    images: &[RasterImage],
    reference_y: Option<u32>,
    options: &MidribOptions,
) -> AlignResult<Vec<i32>> {
    if images.is_empty() {
        return Err(AlignError::EmptyInput("no images to align"));
    }
    options.validate()?;

    let detections = detect_all(images, options)?;
    let reference = reference_y.unwrap_or(detections[0].center_y);

    let offsets: Vec<i32> = detections
        .iter()
        .map(|d| reference as i32 - d.center_y as i32)
        .collect();

    log::debug!(
        "planned offsets for {} segments (reference row {}): {:?}",
        images.len(),
        reference,
        offsets
    );

    Ok(offsets)
}

/// Detect the midrib in every image.
///
/// Detection is a pure per-image read, so with the `rayon` feature enabled
/// the images are processed in parallel.
#[cfg(feature = "rayon")]
fn detect_all(images: &[RasterImage], options: &MidribOptions) -> AlignResult<Vec<MidribResult>> {
    images
        .par_iter()
        .map(|img| find_midrib(img, options))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn detect_all(images: &[RasterImage], options: &MidribOptions) -> AlignResult<Vec<MidribResult>> {
    images
        .iter()
        .map(|img| find_midrib(img, options))
        .collect()
}

/// Shift every image vertically onto a common expanded canvas.
///
/// All outputs share one canvas height,
/// `max(heights) + |min(offset)| + |max(offset)|`, tall enough that no
/// shift ever clips. Content is drawn at `offset + adjustment` where
/// `adjustment = |min(offset)|` when the minimum offset is negative, so no
/// image needs negative canvas coordinates. Unoccupied rows take `fill`
/// (white for transmittance captures; the composite is JPEG-encoded
/// downstream, which has no alpha channel).
///
/// Offsets may come from [`plan_offsets`] or directly from an operator;
/// both paths use this one routine.
///
/// # Errors
///
/// Returns [`AlignError::OffsetCountMismatch`] when the lists disagree and
/// [`AlignError::EmptyInput`] for empty input.
pub fn apply_offsets(
    images: &[RasterImage],
    offsets: &[i32],
    fill: Rgba,
) -> AlignResult<Vec<RasterImage>> {
    if images.is_empty() {
        return Err(AlignError::EmptyInput("no images to align"));
    }
    if images.len() != offsets.len() {
        return Err(AlignError::OffsetCountMismatch {
            expected: images.len(),
            actual: offsets.len(),
        });
    }

    let min_offset = *offsets.iter().min().unwrap();
    let max_offset = *offsets.iter().max().unwrap();
    let adjustment = if min_offset < 0 { -min_offset } else { 0 };

    let max_height = images.iter().map(|img| img.height()).max().unwrap();
    let required = max_height as u64
        + min_offset.unsigned_abs() as u64
        + max_offset.unsigned_abs() as u64;
    let Ok(canvas_height) = u32::try_from(required) else {
        return Err(AlignError::InvalidParameter(format!(
            "offsets expand the canvas to {} rows",
            required
        )));
    };

    let mut shifted = Vec::with_capacity(images.len());
    for (image, &offset) in images.iter().zip(offsets) {
        let top = (offset + adjustment) as u32;
        let mut out = RasterImage::new_filled(image.width(), canvas_height, fill)?
            .try_into_mut()
            .unwrap();
        for y in 0..image.height() {
            out.row_mut(top + y).copy_from_slice(image.row(y));
        }
        shifted.push(out.into());
    }

    Ok(shifted)
}

/// Detect midribs and apply the resulting offsets in one call.
///
/// # Returns
/// The shifted images and the offsets that produced them.
pub fn plan_and_apply(
    images: &[RasterImage],
    reference_y: Option<u32>,
    options: &MidribOptions,
    fill: Rgba,
) -> AlignResult<(Vec<RasterImage>, Vec<i32>)> {
    let offsets = plan_offsets(images, reference_y, options)?;
    let shifted = apply_offsets(images, &offsets, fill)?;
    Ok((shifted, offsets))
}

/// Low-resolution preview of [`apply_offsets`] for interactive review.
///
/// Every image is downscaled by `scale` (nearest neighbor) and the offsets
/// are scaled by the same factor with rounding, then the scaled inputs go
/// through the identical canvas-expansion routine. The full-resolution
/// path is only run once, on confirmation.
///
/// # Errors
///
/// Returns [`AlignError::InvalidParameter`] unless `scale` is in (0, 1].
pub fn apply_offsets_preview(
    images: &[RasterImage],
    offsets: &[i32],
    scale: f32,
    fill: Rgba,
) -> AlignResult<Vec<RasterImage>> {
    if !(scale > 0.0 && scale <= 1.0) {
        return Err(AlignError::InvalidParameter(format!(
            "preview scale must be in (0, 1], got {}",
            scale
        )));
    }

    let scaled: Vec<RasterImage> = images
        .iter()
        .map(|img| img.scale_by_sampling(scale, scale))
        .collect::<Result<_, _>>()?;
    let scaled_offsets: Vec<i32> = offsets
        .iter()
        .map(|&off| (off as f32 * scale).round() as i32)
        .collect();

    apply_offsets(&scaled, &scaled_offsets, fill)
}
