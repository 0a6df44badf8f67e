use std::time::Duration;

use thiserror::Error;

/// Result type for annotator operations.
pub type Result<T> = std::result::Result<T, AnnotatorError>;

/// Errors from the assisted annotation path.
///
/// The heuristic engine is total and never produces these; callers of the
/// service engine see them only through logs, since every failure falls
/// back to heuristic output.
#[derive(Error, Debug)]
pub enum AnnotatorError {
    /// Transport-level failure talking to the annotation service.
    #[error("annotation request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service did not answer within the configured deadline.
    #[error("annotation request timed out after {0:?}")]
    Timeout(Duration),

    /// The service answered with something that is not the agreed JSON.
    #[error("malformed annotation response: {0}")]
    InvalidResponse(String),
}
