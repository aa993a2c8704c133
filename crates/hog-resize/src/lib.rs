//! Exact-size resize of 8-bit single-channel images.
//!
//! Destination pixel `d` maps to the source coordinate
//! `s = (d + 0.5) * (src_len / dst_len) - 0.5` along each axis, so pixel
//! centers of both grids line up. Reads beyond the source are clamped to the
//! edge pixel.
//!
//! - [`Interpolation::Bilinear`] blends the 2x2 neighborhood, rounds to
//!   nearest and saturates to `u8`.
//! - [`Interpolation::Nearest`] rounds the mapped coordinate.
//!
//! A same-size resize is an exact copy for both modes.

mod resize;

pub use resize::{Interpolation, resize_u8, resize_u8_into};
