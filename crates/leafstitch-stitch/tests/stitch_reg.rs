//! Compositor regression test
//!
//! Covers the contract properties: single-image idempotence, the exact
//! width invariant, blend boundary values, the empty-input error, and the
//! three-color end-to-end scenario.

use leafstitch_core::Rgba;
use leafstitch_stitch::{AlignmentMode, StitchError, StitchOptions, stitch};
use leafstitch_test::{RegParams, synth};

#[test]
fn stitch_reg() {
    let mut rp = RegParams::new("stitch");

    // --- Test 1: empty input is an error outcome, never a panic ---
    let result = stitch(&[], &StitchOptions::default());
    rp.compare_values(
        1.0,
        if matches!(result, Err(StitchError::NoImages)) { 1.0 } else { 0.0 },
        0.0,
    );

    // --- Test 2: single-image stitch is pixel-identical for any overlap ---
    let single = synth::green_band_image(400, 300, 150, 10);
    for &fraction in &[0.05, 0.10, 0.25, 0.9] {
        let out = stitch(
            std::slice::from_ref(&single),
            &StitchOptions::new().with_overlap_fraction(fraction),
        )
        .expect("single image stitch");
        rp.compare_rasters(&out, &single);
    }

    // --- Test 3: width invariant W + (N-1)*(W - round(W*p)) ---
    for &(n, fraction) in &[(2usize, 0.10f32), (3, 0.10), (4, 0.15), (5, 0.25)] {
        let images: Vec<_> = (0..n)
            .map(|_| synth::solid_image(200, 100, Rgba::WHITE))
            .collect();
        let out = stitch(
            &images,
            &StitchOptions::new().with_overlap_fraction(fraction),
        )
        .expect("stitch");
        let overlap = (200.0 * fraction).round();
        let expected = 200.0 + (n as f64 - 1.0) * (200.0 - overlap as f64);
        rp.compare_values(expected, out.width() as f64, 0.0);
        rp.compare_values(100.0, out.height() as f64, 0.0);
    }

    // --- Test 4: blend boundary values on a red|blue pair ---
    let red = Rgba::opaque(255, 0, 0);
    let blue = Rgba::opaque(0, 0, 255);
    let pair = vec![
        synth::solid_image(400, 100, red),
        synth::solid_image(400, 100, blue),
    ];
    let out = stitch(&pair, &StitchOptions::new().with_overlap_fraction(0.10))
        .expect("stitch pair");
    // Factor 0 at the strip's left edge: pure previous image
    rp.compare_values(255.0, out.get_rgba(360, 50).unwrap().r as f64, 0.0);
    rp.compare_values(0.0, out.get_rgba(360, 50).unwrap().b as f64, 0.0);
    // Midpoint column: 50/50 mix
    let mid = out.get_rgba(380, 50).unwrap();
    rp.compare_values(128.0, mid.r as f64, 1.0);
    rp.compare_values(128.0, mid.b as f64, 1.0);
    // Rightmost strip column approaches the current image
    let last = out.get_rgba(399, 50).unwrap();
    rp.compare_values(0.0, last.r as f64, 7.0);
    rp.compare_values(255.0, last.b as f64, 7.0);

    // --- Test 5: three-color end-to-end scenario ---
    // 400x1000 segments A|B|C at overlap 0.10 (40px): composite is
    // 1120x1000 with gradients only in columns 360..400 and 760..800
    let a = Rgba::opaque(220, 40, 40);
    let b = Rgba::opaque(40, 220, 40);
    let c = Rgba::opaque(40, 40, 220);
    let trio = vec![
        synth::solid_image(400, 1000, a),
        synth::solid_image(400, 1000, b),
        synth::solid_image(400, 1000, c),
    ];
    let out = stitch(&trio, &StitchOptions::new().with_overlap_fraction(0.10))
        .expect("stitch trio");
    rp.compare_values(1120.0, out.width() as f64, 0.0);
    rp.compare_values(1000.0, out.height() as f64, 0.0);

    let y = 500;
    // Solid regions
    rp.compare_values(1.0, if out.get_rgba(0, y) == Some(a) { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, if out.get_rgba(359, y) == Some(a) { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, if out.get_rgba(400, y) == Some(b) { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, if out.get_rgba(759, y) == Some(b) { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, if out.get_rgba(800, y) == Some(c) { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, if out.get_rgba(1119, y) == Some(c) { 1.0 } else { 0.0 }, 0.0);
    // Gradient midpoints
    let ab = out.get_rgba(380, y).unwrap();
    rp.compare_values(130.0, ab.r as f64, 1.0);
    rp.compare_values(130.0, ab.g as f64, 1.0);
    let bc = out.get_rgba(780, y).unwrap();
    rp.compare_values(130.0, bc.g as f64, 1.0);
    rp.compare_values(130.0, bc.b as f64, 1.0);
    // Gradients are monotonic across each strip
    for x in 361..400 {
        let left = out.get_rgba(x - 1, y).unwrap();
        let here = out.get_rgba(x, y).unwrap();
        if here.r > left.r || here.g < left.g {
            rp.compare_values(0.0, 1.0, 0.0);
            break;
        }
    }

    // --- Test 6: midrib alignment mode expands and stitches ---
    let segments = vec![
        synth::green_band_image(200, 400, 200, 12),
        synth::green_band_image(200, 400, 170, 12),
        synth::green_band_image(200, 400, 230, 12),
    ];
    let opts = StitchOptions::new()
        .with_overlap_fraction(0.10)
        .with_alignment(AlignmentMode::Midrib(Default::default()));
    let out = stitch(&segments, &opts).expect("midrib-aligned stitch");
    // Offsets 0, +30, -30 expand the canvas to 400 + 30 + 30
    rp.compare_values(460.0, out.height() as f64, 2.0);
    rp.compare_values(200.0 + 2.0 * 180.0, out.width() as f64, 0.0);

    // --- Test 7: manual offsets through the same path ---
    let opts = StitchOptions::new()
        .with_overlap_fraction(0.10)
        .with_alignment(AlignmentMode::Manual(vec![0, 30, -30]));
    let manual = stitch(&segments, &opts).expect("manually aligned stitch");
    rp.compare_rasters(&manual, &out);

    assert!(rp.cleanup(), "stitch regression test failed");
}
