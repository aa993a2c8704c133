//! Histogram of Oriented Gradients over a single detection window.
//!
//! The descriptor follows the Dalal-Triggs layout:
//! - centered-difference gradients, unsigned orientations in `[0, π)`;
//! - each pixel votes into its two nearest orientation bins and, inside a
//!   block, into up to four cells by bilinear spatial weighting;
//! - block pixels are additionally weighted by a Gaussian centered on the
//!   block;
//! - every block histogram is L2-Hys normalized independently.
//!
//! Length of one window descriptor:
//! `nbins * cells_per_block.area() * blocks_per_window.area()`, see
//! [`HogGeometry::descriptor_size`].
//!
//! The input must already be resized to the window; this crate does not scan
//! windows over a larger image.

mod descriptor;
mod error;
mod geometry;
pub mod gradient;

pub use descriptor::{HogDescriptor, HogParams, normalize_l2_hys};
pub use error::Error;
pub use geometry::HogGeometry;
pub use gradient::OrientedGradients;
