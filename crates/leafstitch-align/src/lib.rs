//! leafstitch-align - Segment alignment for leaf panoramas
//!
//! This crate provides the signal-analysis half of the stitching pipeline:
//!
//! - **Midrib detection**: find the leaf's central vein in a backlit capture
//!   via green-channel dominance search
//! - **Vertical alignment planning**: turn per-image midrib rows (or manual
//!   corrections) into per-image vertical offsets and apply them on an
//!   expanded canvas
//! - **Correlation alignment**: estimate a small 2D offset between two edge
//!   strips by exhaustive downsampled search
//! - **Overlap guide scoring**: a 0-100 live alignment quality score for the
//!   capture UI
//!
//! # Quick Start
//!
//! ```
//! use leafstitch_align::{MidribOptions, plan_offsets, apply_offsets};
//! use leafstitch_core::{RasterImage, Rgba};
//!
//! let segments = vec![
//!     RasterImage::new_filled(400, 300, Rgba::WHITE).unwrap(),
//!     RasterImage::new_filled(400, 300, Rgba::WHITE).unwrap(),
//! ];
//! let offsets = plan_offsets(&segments, None, &MidribOptions::default()).unwrap();
//! let aligned = apply_offsets(&segments, &offsets, Rgba::WHITE).unwrap();
//! assert_eq!(aligned.len(), 2);
//! ```
//!
//! # Modules
//!
//! - [`midrib`]: midrib (central vein) detection
//! - [`planner`]: vertical offset planning and application
//! - [`correlate`]: correlation-based 2D offset search
//! - [`guide`]: live overlap quality scoring

pub mod correlate;
mod error;
pub mod guide;
pub mod midrib;
pub mod planner;

pub use error::{AlignError, AlignResult};

// Re-export commonly used types
pub use correlate::{CorrelationMatch, CorrelationOptions, estimate_overlap, find_offset};
pub use guide::score_overlap;
pub use midrib::{MidribOptions, MidribResult, find_midrib};
pub use planner::{apply_offsets, apply_offsets_preview, plan_and_apply, plan_offsets};

// Re-export core for convenience
pub use leafstitch_core;
