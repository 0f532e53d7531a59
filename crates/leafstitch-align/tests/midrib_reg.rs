//! Midrib detection regression test
//!
//! Verifies that a synthetic midrib band embedded in tissue-colored
//! background is recovered within one row, with usable confidence, and
//! that degenerate images degrade gracefully.

use leafstitch_align::midrib::{MidribOptions, find_midrib};
use leafstitch_test::{RegParams, synth};

#[test]
fn midrib_reg() {
    let mut rp = RegParams::new("midrib");
    let options = MidribOptions::default();

    // --- Test 1: band at the vertical center ---
    // Band height matches the 3% sliding window (12 rows at h=400) so the
    // winning window position is unambiguous
    let img = synth::green_band_image(300, 400, 200, 12);
    let result = find_midrib(&img, &options).expect("find_midrib");
    eprintln!(
        "centered band: y={} confidence={:.3}",
        result.center_y, result.confidence
    );
    rp.compare_values(200.0, result.center_y as f64, 1.0);
    rp.compare_values(1.0, if result.confidence > 0.5 { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(12.0, result.band_height as f64, 0.0);

    // --- Test 2: bands off center, still inside the search band ---
    for &true_y in &[160u32, 185, 230] {
        let img = synth::green_band_image(300, 400, true_y, 12);
        let result = find_midrib(&img, &options).expect("find_midrib");
        rp.compare_values(true_y as f64, result.center_y as f64, 1.0);
    }

    // --- Test 3: tighter tolerance cannot see a far band ---
    let img = synth::green_band_image(300, 400, 40, 12);
    let result = find_midrib(&img, &MidribOptions::new().with_search_tolerance(0.2))
        .expect("find_midrib");
    let inside = result.center_y >= 160 && result.center_y < 240;
    rp.compare_values(1.0, if inside { 1.0 } else { 0.0 }, 0.0);

    // --- Test 4: flat tissue has no distinguishing band ---
    let flat = synth::solid_image(300, 400, synth::TISSUE);
    let result = find_midrib(&flat, &options).expect("find_midrib");
    eprintln!("flat: confidence={:.3}", result.confidence);
    rp.compare_values(1.0, if result.confidence < 0.1 { 1.0 } else { 0.0 }, 0.0);

    // --- Test 5: noise is not an error, just low confidence ---
    let noise = synth::noise_image(300, 400, 7);
    let result = find_midrib(&noise, &options).expect("find_midrib on noise");
    eprintln!("noise: y={} confidence={:.3}", result.center_y, result.confidence);
    rp.compare_values(1.0, if result.confidence < 0.5 { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "midrib regression test failed");
}
