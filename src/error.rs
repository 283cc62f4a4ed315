use thiserror::Error;

/// Errors surfaced by learners and their configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LearnerError {
    /// The observation was rejected before any state was touched.
    #[error("invalid observation: {0}")]
    InvalidObservation(String),

    /// An internal tree invariant does not hold. Indicates a bug.
    #[error("malformed tree: {0}")]
    MalformedTree(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, LearnerError>;
