//! Leafstitch - Leaf panorama alignment and stitching
//!
//! Takes an ordered sequence of overlapping leaf-segment photographs
//! captured under transmittance (backlit) illumination and produces one
//! seamless composite, optionally auto-correcting vertical hand-drift with
//! a midrib detector.
//!
//! # Overview
//!
//! - Midrib (central vein) detection via green-channel dominance search
//! - Vertical alignment planning from detected rows or manual offsets
//! - Horizontal composition with linear gradient blending at each seam
//! - Correlation-based offset estimation for unaligned captures
//! - Live overlap quality scoring for the capture UI
//! - JPEG/PNG ingest and persistence
//!
//! # Example
//!
//! ```
//! use leafstitch::{RasterImage, Rgba};
//! use leafstitch::stitch::{StitchOptions, stitch};
//!
//! let segments = vec![
//!     RasterImage::new_filled(400, 300, Rgba::opaque(180, 200, 120)).unwrap(),
//!     RasterImage::new_filled(400, 300, Rgba::opaque(160, 210, 110)).unwrap(),
//! ];
//! let composite = stitch(&segments, &StitchOptions::default()).unwrap();
//! assert_eq!(composite.height(), 300);
//! ```
//!
//! All operations are synchronous and CPU-bound; invoke them from a
//! background task and hand the result back to the UI however the host
//! application prefers.

// Re-export core types (primary data structures used everywhere)
pub use leafstitch_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use leafstitch_align as align;
pub use leafstitch_io as io;
pub use leafstitch_stitch as stitch;
