//! Deterministic synthetic test images
//!
//! Segments captured on a real light table cannot ship with the
//! repository, so the regression tests build what they need: solid
//! patches, embedded green bands (fake midribs), gradients, and seeded
//! noise.

use leafstitch_core::{RasterImage, Rgba};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

/// Background used around synthetic midrib bands: dull olive tissue with
/// no green dominance, so detection confidence is meaningful.
pub const TISSUE: Rgba = Rgba::opaque(120, 110, 80);

/// Band color for synthetic midribs: bright transmitted green.
pub const MIDRIB: Rgba = Rgba::opaque(60, 230, 60);

/// A solid single-color image.
pub fn solid_image(width: u32, height: u32, color: Rgba) -> RasterImage {
    RasterImage::new_filled(width, height, color).unwrap()
}

/// Tissue-colored image with a solid horizontal midrib band.
///
/// The band spans `band_height` rows centered on `center_y` (clipped to
/// the image).
pub fn green_band_image(width: u32, height: u32, center_y: u32, band_height: u32) -> RasterImage {
    let mut m = RasterImage::new_filled(width, height, TISSUE)
        .unwrap()
        .try_into_mut()
        .unwrap();
    let top = center_y.saturating_sub(band_height / 2);
    for y in top..(top + band_height).min(height) {
        for x in 0..width {
            m.set_rgba_unchecked(x, y, MIDRIB);
        }
    }
    m.into()
}

/// Left-to-right linear blend between two colors.
pub fn horizontal_gradient(width: u32, height: u32, left: Rgba, right: Rgba) -> RasterImage {
    let mut m = RasterImage::new(width, height).unwrap().try_into_mut().unwrap();
    let span = (width - 1).max(1) as f32;
    for x in 0..width {
        let t = x as f32 / span;
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        let color = Rgba::new(
            lerp(left.r, right.r),
            lerp(left.g, right.g),
            lerp(left.b, right.b),
            lerp(left.a, right.a),
        );
        for y in 0..height {
            m.set_rgba_unchecked(x, y, color);
        }
    }
    m.into()
}

/// Opaque uniform noise from a seeded generator; the same seed always
/// produces the same image.
pub fn noise_image(width: u32, height: u32, seed: u64) -> RasterImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut m = RasterImage::new(width, height).unwrap().try_into_mut().unwrap();
    for y in 0..height {
        for x in 0..width {
            m.set_rgba_unchecked(
                x,
                y,
                Rgba::opaque(rng.random(), rng.random(), rng.random()),
            );
        }
    }
    m.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_green_band_placement() {
        let img = green_band_image(50, 100, 40, 10);
        assert_eq!(img.get_rgba(25, 40), Some(MIDRIB));
        assert_eq!(img.get_rgba(25, 33), Some(TISSUE));
        assert_eq!(img.get_rgba(25, 47), Some(TISSUE));
    }

    #[test]
    fn test_gradient_endpoints() {
        let img = horizontal_gradient(100, 10, Rgba::BLACK, Rgba::WHITE);
        assert_eq!(img.get_rgba(0, 5), Some(Rgba::BLACK));
        assert_eq!(img.get_rgba(99, 5), Some(Rgba::WHITE));
    }

    #[test]
    fn test_noise_deterministic() {
        let a = noise_image(30, 30, 42);
        let b = noise_image(30, 30, 42);
        let c = noise_image(30, 30, 43);
        assert_eq!(a.data(), b.data());
        assert_ne!(a.data(), c.data());
    }
}
