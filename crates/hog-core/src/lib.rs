//! Foundational primitives for the HOG workspace.
//!
//! ## Image Views and Stride
//! Images are row-major. `stride` is the distance, in elements, between
//! adjacent row starts and may be greater than `width`, which allows borrowed
//! views over padded buffers and subviews.
//!
//! Host matrices are column-major; [`Image::from_col_major`] converts them on
//! entry so every algorithm in the workspace sees a row-major image.
//!
//! ## Border Modes
//! Index mapping supports clamp and reflect-101 behavior. Reflect-101
//! mirrors around edge pixels without repeating edge elements.
//!
//! ## Sampling Coordinates
//! Integer coordinates refer to pixel centers. Nearest-neighbor uses
//! round-to-nearest indices; bilinear uses the floor-based 2x2 neighborhood.

mod border;
mod error;
mod geom;
mod image;
mod sample;

pub use border::{BorderMode, map_index, neighbor_pair};
pub use error::Error;
pub use geom::Size2;
pub use image::{Image, ImageView};
pub use sample::{sample_bilinear_f32, sample_nearest};
