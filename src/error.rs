//! Crate-wide error types.

use thiserror::Error;

/// Errors surfaced by catalog loading, model construction, and profile
/// generation.
///
/// Configuration and invalid-argument errors propagate to the caller without
/// retry. A `Runtime` error aborts the whole run: losing one appliance would
/// silently bias the aggregate, so there is no partial-results contract.
#[derive(Debug, Error)]
pub enum Error {
    /// Structural violation detected at load or construction time.
    #[error("configuration error: {field}: {message}")]
    Configuration { field: String, message: String },

    /// A call-time argument outside its documented domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Internal invariant failure, unreachable when configuration rules hold.
    #[error("internal error: {0}")]
    Runtime(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Configuration error with a dotted field path, e.g. `"run.num_profiles"`.
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
