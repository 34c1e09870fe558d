use thiserror::Error;

/// Errors surfaced by the prioritization core.
#[derive(Error, Debug)]
pub enum Error {
    /// An observation was rejected; the store was left untouched.
    #[error("Invalid observation for patient '{patient_id}': {reason}")]
    Validation { patient_id: String, reason: String },

    #[error("Patient '{0}' is not in the store")]
    NotFound(String),

    /// Threshold or settings inconsistency, detected when settings are loaded or applied.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Malformed feed payload: {0}")]
    Feed(#[from] serde_json::Error),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
