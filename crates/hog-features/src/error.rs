use hog_core::Size2;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid HOG geometry: {0}")]
    InvalidGeometry(String),
    #[error("window size mismatch: expected {expected}, got {actual}")]
    WindowSizeMismatch { expected: Size2, actual: Size2 },
}
