//! Live overlap guide scoring
//!
//! While the user slides the leaf to the next segment, the capture screen
//! shows a 0-100 quality score comparing the previous segment's trailing
//! edge with the live frame's leading edge. The score uses the same
//! grayscale-difference primitive as the correlation aligner, at zero
//! offset, over strips downscaled to a small fixed comparison size.
//!
//! The previous-edge reference is session state owned by the capture
//! collaborator and passed in explicitly on every call; the scorer itself
//! is stateless.

use crate::correlate::similarity_at;
use leafstitch_core::RasterImage;

/// Comparison strips are downscaled to fit this size.
pub const GUIDE_MAX_WIDTH: u32 = 200;
pub const GUIDE_MAX_HEIGHT: u32 = 100;

/// Score returned when either edge is absent, so the UI never blocks a
/// first capture.
pub const NEUTRAL_SCORE: u32 = 100;

/// Score the alignment quality of two edge strips, 0-100.
///
/// 100 means identical edges; 0 means maximal difference. Either input
/// absent yields [`NEUTRAL_SCORE`].
///
/// # Example
/// ```
/// use leafstitch_align::guide::score_overlap;
/// use leafstitch_core::{RasterImage, Rgba};
///
/// let edge = RasterImage::new_filled(40, 300, Rgba::opaque(120, 160, 90)).unwrap();
/// assert_eq!(score_overlap(Some(&edge), Some(&edge)), 100);
/// assert_eq!(score_overlap(None, Some(&edge)), 100);
/// ```
pub fn score_overlap(previous: Option<&RasterImage>, current: Option<&RasterImage>) -> u32 {
    let (Some(previous), Some(current)) = (previous, current) else {
        return NEUTRAL_SCORE;
    };

    let Ok(prev) = previous.scale_to_fit(GUIDE_MAX_WIDTH, GUIDE_MAX_HEIGHT) else {
        return NEUTRAL_SCORE;
    };
    let Ok(cur) = current.scale_to_fit(GUIDE_MAX_WIDTH, GUIDE_MAX_HEIGHT) else {
        return NEUTRAL_SCORE;
    };

    let similarity = similarity_at(&prev, &cur, 0, 0, 1);
    (100.0 * similarity / 255.0).round() as u32
}
