//! Error types for command compilation.

use thiserror::Error;

/// Errors that can occur while compiling a query into a [`crate::Command`].
///
/// Builders never fail while clauses are being added; every value is stored
/// as given and only checked when it is turned into a protocol token.
#[derive(Error, Debug)]
pub enum QueryError {
    /// A numeric clause argument was NaN or infinite and has no protocol literal.
    #[error("{clause}: non-finite value {value} cannot be encoded")]
    NonFinite { clause: &'static str, value: f64 },

    /// A JSON payload or JSON query description could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout tile38-query.
pub type Result<T> = std::result::Result<T, QueryError>;
