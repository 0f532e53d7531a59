//! Midrib detection
//!
//! Under transmittance (backlit) illumination a corn leaf's central vein
//! transmits more light than the surrounding tissue and reads as a
//! distinctly greener, brighter horizontal band. This module locates that
//! band so segments captured at slightly different heights can be brought
//! into a common vertical frame.
//!
//! # Algorithm Overview
//!
//! 1. **Row profile**: for every row in the search band, compute the
//!    green-channel dominance (green sum over total channel sum) and the
//!    mean green value.
//! 2. **Sliding window**: slide a window of ~3% of the image height over the
//!    band and score each position by a weighted mix of average dominance
//!    and average brightness. A windowed average is more robust to
//!    single-row noise than a per-row maximum.
//! 3. **Confidence**: how far the winning window's dominance exceeds the
//!    band-wide average, normalized to [0, 1].

use crate::{AlignError, AlignResult};
use leafstitch_core::{RasterImage, Rgba};

/// Fraction of the image height used as the sliding window height.
const BAND_FRACTION: f32 = 0.03;

/// Minimum sliding window height in rows.
const MIN_BAND_HEIGHT: u32 = 3;

/// Score weight for green-channel dominance.
const DOMINANCE_WEIGHT: f64 = 0.6;

/// Score weight for mean green brightness.
const BRIGHTNESS_WEIGHT: f64 = 0.4;

/// Options for midrib detection
#[derive(Debug, Clone)]
pub struct MidribOptions {
    /// Fraction of the image height to search, centered vertically
    /// (default: 0.5). Must be in (0, 1]. A correctly framed capture has
    /// the midrib near the vertical center, so the top and bottom margins
    /// are excluded from the search.
    pub search_tolerance: f32,
}

impl Default for MidribOptions {
    fn default() -> Self {
        Self {
            search_tolerance: 0.5,
        }
    }
}

impl MidribOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search tolerance (fraction of height searched)
    pub fn with_search_tolerance(mut self, tolerance: f32) -> Self {
        self.search_tolerance = tolerance;
        self
    }

    /// Validate options
    pub fn validate(&self) -> AlignResult<()> {
        if !(self.search_tolerance > 0.0 && self.search_tolerance <= 1.0) {
            return Err(AlignError::InvalidParameter(format!(
                "search_tolerance must be in (0, 1], got {}",
                self.search_tolerance
            )));
        }
        Ok(())
    }
}

/// Result of midrib detection
#[derive(Debug, Clone, Copy)]
pub struct MidribResult {
    /// Detected band center row
    pub center_y: u32,

    /// Confidence in [0, 1]: how much the winning band's green dominance
    /// exceeds the search-band average. Low values mean the image has no
    /// distinguishing band; callers may fall back to manual alignment.
    pub confidence: f32,

    /// Height of the detected band in rows
    pub band_height: u32,
}

/// Per-row green statistics over the search band
struct RowProfile {
    /// Green sum / total channel sum per row, 0 for black rows
    dominance: Vec<f64>,
    /// Mean green value per row
    green_mean: Vec<f64>,
}

/// Find the midrib band in a single backlit leaf image.
///
/// This is a read-only scan: it allocates no images and is safe to run
/// concurrently across different images.
///
/// # Arguments
/// * `image` - Backlit leaf segment
/// * `options` - Detection options
///
/// # Returns
/// The detected band center, confidence, and band height. A flat or noisy
/// image is not an error: the detector falls back to the vertical center
/// with zero confidence.
///
/// # Example
/// ```
/// use leafstitch_align::midrib::{find_midrib, MidribOptions};
/// use leafstitch_core::{RasterImage, Rgba};
///
/// let img = RasterImage::new_filled(200, 100, Rgba::opaque(40, 180, 40)).unwrap();
/// let result = find_midrib(&img, &MidribOptions::default()).unwrap();
/// assert!(result.center_y < 100);
/// ```
pub fn find_midrib(image: &RasterImage, options: &MidribOptions) -> AlignResult<MidribResult> {
    options.validate()?;

    let height = image.height();
    let window = band_height_for(height);

    // Centered search band
    let search_h = ((height as f32 * options.search_tolerance).round() as u32).clamp(1, height);
    let band_top = (height - search_h) / 2;

    if search_h < window {
        // Degenerate: band too small to hold a single window
        return Ok(fallback_result(height, window));
    }

    let profile = row_profile(image, band_top, search_h);

    // Band-wide mean dominance, for the confidence normalization
    let band_mean_dominance: f64 =
        profile.dominance.iter().sum::<f64>() / profile.dominance.len() as f64;

    // Slide the window over the band, tracking the best weighted score
    let mut best_score = f64::MIN;
    let mut best_start = 0usize;
    let mut best_dominance = 0.0f64;

    let mut window_dom: f64 = profile.dominance[..window as usize].iter().sum();
    let mut window_green: f64 = profile.green_mean[..window as usize].iter().sum();
    let positions = (search_h - window) as usize;

    for start in 0..=positions {
        let avg_dom = window_dom / window as f64;
        let avg_green = window_green / window as f64;
        let score = DOMINANCE_WEIGHT * avg_dom + BRIGHTNESS_WEIGHT * (avg_green / 255.0);

        if score > best_score {
            best_score = score;
            best_start = start;
            best_dominance = avg_dom;
        }

        if start < positions {
            window_dom += profile.dominance[start + window as usize] - profile.dominance[start];
            window_green += profile.green_mean[start + window as usize] - profile.green_mean[start];
        }
    }

    if best_score == f64::MIN {
        return Ok(fallback_result(height, window));
    }

    let center_y = band_top + best_start as u32 + window / 2;
    let confidence = if band_mean_dominance > 0.0 {
        (((best_dominance - band_mean_dominance) / band_mean_dominance) as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };

    log::debug!(
        "midrib at row {} (confidence {:.3}, band {} rows)",
        center_y,
        confidence,
        window
    );

    Ok(MidribResult {
        center_y,
        confidence,
        band_height: window,
    })
}

/// Sliding window height for a given image height.
fn band_height_for(height: u32) -> u32 {
    ((height as f32 * BAND_FRACTION).round() as u32).max(MIN_BAND_HEIGHT)
}

/// Vertical-center fallback for degenerate images.
fn fallback_result(height: u32, window: u32) -> MidribResult {
    MidribResult {
        center_y: height / 2,
        confidence: 0.0,
        band_height: window,
    }
}

/// Compute per-row green dominance and mean green over `rows` rows starting
/// at `top`.
fn row_profile(image: &RasterImage, top: u32, rows: u32) -> RowProfile {
    let width = image.width();
    let mut dominance = Vec::with_capacity(rows as usize);
    let mut green_mean = Vec::with_capacity(rows as usize);

    for y in top..top + rows {
        let mut green_sum = 0u64;
        let mut total_sum = 0u64;
        for &pixel in image.row(y) {
            let c = Rgba::unpack(pixel);
            green_sum += c.g as u64;
            total_sum += c.r as u64 + c.g as u64 + c.b as u64;
        }
        dominance.push(if total_sum > 0 {
            green_sum as f64 / total_sum as f64
        } else {
            0.0
        });
        green_mean.push(green_sum as f64 / width as f64);
    }

    RowProfile {
        dominance,
        green_mean,
    }
}
