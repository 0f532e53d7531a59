//! Image I/O regression test
//!
//! PNG round trips must be lossless; JPEG round trips are lossy but stay
//! near the input at quality 95. All streams are in-memory so the test
//! needs no fixture files.

use leafstitch_io::jpeg::{DEFAULT_JPEG_QUALITY, read_jpeg, write_jpeg};
use leafstitch_io::png::{read_png, write_png};
use leafstitch_test::{RegParams, synth};

#[test]
fn roundtrip_reg() {
    let mut rp = RegParams::new("roundtrip");

    let image = synth::noise_image(120, 90, 3);

    // --- Test 1: PNG is lossless ---
    let mut buffer = Vec::new();
    write_png(&mut buffer, &image).expect("write_png");
    let decoded = read_png(buffer.as_slice()).expect("read_png");
    rp.compare_rasters(&decoded, &image);

    // --- Test 2: JPEG preserves dimensions ---
    let gradient = synth::horizontal_gradient(
        200,
        80,
        leafstitch_core::Rgba::opaque(20, 80, 20),
        leafstitch_core::Rgba::opaque(230, 250, 210),
    );
    let mut buffer = Vec::new();
    write_jpeg(&mut buffer, &gradient, DEFAULT_JPEG_QUALITY).expect("write_jpeg");
    let decoded = read_jpeg(buffer.as_slice()).expect("read_jpeg");
    rp.compare_values(200.0, decoded.width() as f64, 0.0);
    rp.compare_values(80.0, decoded.height() as f64, 0.0);

    // --- Test 3: JPEG at quality 95 stays near the input ---
    let mut max_err = 0i32;
    for y in (0..80).step_by(13) {
        for x in (0..200).step_by(17) {
            let a = gradient.get_rgba(x, y).unwrap();
            let b = decoded.get_rgba(x, y).unwrap();
            max_err = max_err
                .max((a.r as i32 - b.r as i32).abs())
                .max((a.g as i32 - b.g as i32).abs())
                .max((a.b as i32 - b.b as i32).abs());
        }
    }
    eprintln!("max JPEG channel error: {}", max_err);
    rp.compare_values(1.0, if max_err <= 16 { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "roundtrip regression test failed");
}
