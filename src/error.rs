//! Comanda error types

/// Comanda error types.
///
/// The enum derives [`Clone`] because a failed fetch is fanned out to every
/// coalesced waiter through a shared future; each waiter receives its own
/// copy of the error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComandaError {
    // Transport/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("authentication required")]
    Unauthenticated,

    #[error("not found: {0}")]
    NotFound(String),

    // Input rejected before any network call
    #[error("validation failed: {0}")]
    Validation(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(String),

    #[error("data error: {0}")]
    Data(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for ComandaError {
    fn from(err: reqwest::Error) -> Self {
        ComandaError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for ComandaError {
    fn from(err: serde_json::Error) -> Self {
        ComandaError::Json(err.to_string())
    }
}

/// Map a non-success HTTP status (plus server-reported message) to an error.
pub(crate) fn from_status(status: u16, message: String) -> ComandaError {
    match status {
        401 | 403 => ComandaError::Unauthenticated,
        404 => ComandaError::NotFound(message),
        400 | 422 => ComandaError::Validation(message),
        _ => ComandaError::Api { status, message },
    }
}

/// Result type alias for Comanda operations
pub type Result<T> = std::result::Result<T, ComandaError>;
