//! Correlation aligner and overlap guide regression test
//!
//! Recovers a known vertical shift between two strips cut from the same
//! noise field, exercises the overlap estimator, and checks the guide
//! score boundaries.

use leafstitch_align::correlate::{CorrelationOptions, estimate_overlap, find_offset};
use leafstitch_align::guide::{NEUTRAL_SCORE, score_overlap};
use leafstitch_core::{RasterImage, Rgba};
use leafstitch_test::{RegParams, synth};

#[test]
fn correlate_reg() {
    let mut rp = RegParams::new("correlate");

    // Two windows into the same noise field, eight rows apart: the right
    // strip's content sits eight rows higher, so it matches when shifted
    // down by eight
    let field = synth::noise_image(60, 400, 11);
    let left = field.crop(0, 20, 60, 300).expect("crop left");
    let right = field.crop(0, 28, 60, 300).expect("crop right");

    // --- Test 1: full-resolution search recovers the exact shift ---
    let opts = CorrelationOptions::new()
        .with_reduction(1)
        .with_sample_stride(1);
    let matched = find_offset(&left, &right, &opts).expect("find_offset");
    eprintln!(
        "full-res match: ({}, {}) score {:.1}",
        matched.dx, matched.dy, matched.score
    );
    rp.compare_values(0.0, matched.dx as f64, 0.0);
    rp.compare_values(8.0, matched.dy as f64, 0.0);
    rp.compare_values(255.0, matched.score as f64, 0.5);
    rp.compare_values(1.0, if matched.is_reliable(opts.min_score) { 1.0 } else { 0.0 }, 0.0);

    // --- Test 2: reduced search still lands within the reduction step ---
    let opts = CorrelationOptions::new()
        .with_reduction(2)
        .with_sample_stride(1);
    let matched = find_offset(&left, &right, &opts).expect("find_offset reduced");
    eprintln!(
        "reduced match: ({}, {}) score {:.1}",
        matched.dx, matched.dy, matched.score
    );
    rp.compare_values(8.0, matched.dy as f64, 2.0);

    // --- Test 3: unrelated noise scores well below identical strips ---
    let other = synth::noise_image(60, 300, 99);
    let unrelated = find_offset(&left, &other, &opts).expect("find_offset unrelated");
    eprintln!("unrelated score: {:.1}", unrelated.score);
    rp.compare_values(
        1.0,
        if unrelated.score < matched.score { 1.0 } else { 0.0 },
        0.0,
    );

    // --- Test 4: overlap estimation picks the planted candidate ---
    // The right image opens with the left image's trailing quarter
    let base = synth::noise_image(260, 80, 5);
    let left_img = base.crop(0, 0, 200, 80).expect("crop");
    let mut right_m = RasterImage::new(200, 80).unwrap().try_into_mut().unwrap();
    for y in 0..80u32 {
        for x in 0..200u32 {
            let v = if x < 50 {
                base.get_pixel_unchecked(150 + x, y)
            } else {
                Rgba::opaque(30, 30, 30).pack()
            };
            right_m.set_pixel_unchecked(x, y, v);
        }
    }
    let right_img: RasterImage = right_m.into();
    let opts = CorrelationOptions::new()
        .with_reduction(1)
        .with_sample_stride(1);
    let fraction = estimate_overlap(&left_img, &right_img, &opts).expect("estimate_overlap");
    eprintln!("estimated overlap: {}", fraction);
    rp.compare_values(0.25, fraction as f64, 0.001);

    // --- Test 5: guide score boundaries ---
    let edge = synth::solid_image(40, 300, Rgba::opaque(120, 160, 90));
    rp.compare_values(
        100.0,
        score_overlap(Some(&edge), Some(&edge.deep_clone())) as f64,
        1.0,
    );
    let white = synth::solid_image(40, 300, Rgba::WHITE);
    let black = synth::solid_image(40, 300, Rgba::BLACK);
    rp.compare_values(0.0, score_overlap(Some(&white), Some(&black)) as f64, 1.0);

    // --- Test 6: absent edges never block a first capture ---
    rp.compare_values(NEUTRAL_SCORE as f64, score_overlap(None, Some(&edge)) as f64, 0.0);
    rp.compare_values(NEUTRAL_SCORE as f64, score_overlap(None, None) as f64, 0.0);

    assert!(rp.cleanup(), "correlate regression test failed");
}
