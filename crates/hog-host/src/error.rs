use thiserror::Error;

use crate::value::ElementClass;

/// Failure of a single host call. The session state is unchanged when one is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("incorrect number of inputs: expected 1 or 2, got {got}")]
    InvalidArgumentCount { got: usize },
    #[error("incorrect number of outputs: expected 1, got {got}")]
    InvalidOutputCount { got: usize },
    #[error("compute expects an image argument")]
    MissingImage,
    #[error("image must be a non-empty 2-D matrix, got dimensions {dims:?}")]
    InvalidImageShape { dims: Vec<usize> },
    #[error("image must be uint8, got {class}")]
    InvalidPixelType { class: ElementClass },
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),
    #[error("descriptor not constructed")]
    NotConstructed,
    #[error(transparent)]
    InvalidGeometry(#[from] hog_features::Error),
    #[error(transparent)]
    Image(#[from] hog_core::Error),
}
