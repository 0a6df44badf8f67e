use thiserror::Error;

/// Result type for formatter operations.
pub type Result<T> = std::result::Result<T, FormatError>;

/// Errors that can occur while aggregating or rendering chunks.
#[derive(Error, Debug)]
pub enum FormatError {
    /// A chunk was requested for an empty slide group. This is a contract
    /// violation by the caller, not a recoverable input condition.
    #[error("cannot build a chunk from an empty slide group")]
    EmptySlideGroup,

    /// Front-matter serialization failed.
    #[error("front-matter serialization failed: {0}")]
    Serialize(String),

    /// A document could not be parsed back into front-matter.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}
