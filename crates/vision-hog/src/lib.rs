//! Umbrella crate for the HOG workspace.
//!
//! Re-exports the image containers, the resampler, the descriptor and the
//! host command layer so downstream code can depend on a single crate.

pub use hog_core::*;
pub use hog_features::{
    HogDescriptor, HogGeometry, HogParams, OrientedGradients, normalize_l2_hys,
};
pub use hog_host::*;
pub use hog_resize::*;

/// Feature-layer errors, kept apart from `hog_core::Error`.
pub use hog_features::Error as FeatureError;
