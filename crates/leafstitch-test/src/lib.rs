//! leafstitch-test - Regression test framework for leafstitch
//!
//! Provides a regression harness in three modes:
//!
//! - **Generate**: create golden files for comparison
//! - **Compare**: compare results with golden files (default)
//! - **Display**: run tests without comparison
//!
//! plus deterministic synthetic images for exercising the detector and
//! compositor without shipping captured test data.
//!
//! # Usage
//!
//! ```ignore
//! use leafstitch_test::{RegParams, synth};
//!
//! let mut rp = RegParams::new("stitch");
//! rp.compare_values(1120.0, composite.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: set to "generate", "compare", or "display"

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // leafstitch-test is at crates/leafstitch-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
