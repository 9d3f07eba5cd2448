use thiserror::Error;

/// Application-wide error types.
///
/// Variants carrying a `String` hold diagnostic detail for the logs only.
/// The HTTP conversion in `api::errors` never copies it into a response body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Requested path escapes the site root")]
    PathEscape,

    #[error("Not found")]
    NotFound,

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Index load failure: {0}")]
    IndexLoad(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => AppError::NotFound,
            _ => AppError::Internal(err.to_string()),
        }
    }
}
