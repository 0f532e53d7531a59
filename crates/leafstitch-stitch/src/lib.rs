//! leafstitch-stitch - Horizontal panorama composition
//!
//! Concatenates a left-to-right ordered sequence of leaf segments into one
//! composite, blending each overlap region with a linear gradient. Vertical
//! hand-drift is corrected first, either from detected midrib rows or from
//! operator-supplied offsets; an automatic variant estimates per-pair
//! offsets by correlation instead.
//!
//! # Quick Start
//!
//! ```
//! use leafstitch_stitch::{StitchOptions, stitch};
//! use leafstitch_core::{RasterImage, Rgba};
//!
//! let segments = vec![
//!     RasterImage::new_filled(400, 300, Rgba::opaque(200, 60, 60)).unwrap(),
//!     RasterImage::new_filled(400, 300, Rgba::opaque(60, 60, 200)).unwrap(),
//! ];
//! let composite = stitch(&segments, &StitchOptions::default()).unwrap();
//! assert_eq!(composite.width(), 400 + 400 - 40);
//! ```
//!
//! All composition is CPU-bound and synchronous; run it from a background
//! task and deliver the result to the UI via whatever future or callback
//! the caller prefers. Cancellation is cooperative at seam granularity
//! through the progress callback.

mod compositor;
mod error;

pub use compositor::{
    AlignmentMode, StitchOptions, StitchProgress, stitch, stitch_auto, stitch_with_progress,
};
pub use error::{StitchError, StitchResult};

// Re-export the crates callers typically need alongside
pub use leafstitch_align;
pub use leafstitch_core;
