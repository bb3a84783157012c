use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Reset threshold {0} must be between 0.01 and 0.99 (inclusive)")]
    OutOfRange(f64),

    /// Every distinct dataset value is already in the key's history
    #[error("No unused data points left for key {0}")]
    Exhausted(String),
}

impl Error {
    pub(crate) fn key_exists<K: std::fmt::Debug>(key: &K) -> Self {
        Error::AlreadyExists(format!("history key {key:?}"))
    }

    pub(crate) fn key_missing<K: std::fmt::Debug>(key: &K) -> Self {
        Error::NotFound(format!("history key {key:?}"))
    }

    /// True for the two domain errors, as opposed to argument validation failures.
    pub fn is_domain(&self) -> bool {
        matches!(self, Error::AlreadyExists(_) | Error::NotFound(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidArgument(err.to_string())
    }
}
