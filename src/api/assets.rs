use axum::extract::State;
use axum::http::Uri;
use axum::response::Response;

use crate::app::AppState;
use crate::error::AppError;
use crate::static_files::resolver::{resolve_entry, ENTRY_DOCUMENT};
use crate::static_files::server::serve;

/// Fallback handler: everything that is not an API route is a static asset
/// request.
///
/// Order of checks: decode, resolve inside the root (400 on escape), a
/// lexical allow-list check (404), directory redirect, the allow-list again
/// on the redirected path, then stream.
pub async fn static_handler(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Response, AppError> {
    let requested = requested_path(uri.path())?;
    let safe = state.resolver.resolve(&requested)?;
    if !state.policy.admits(&safe) {
        return Err(AppError::NotFound);
    }

    let safe = resolve_entry(safe).await?;

    if !state.policy.allows(&safe) {
        return Err(AppError::NotFound);
    }

    serve(&safe).await
}

/// JSON 404 for API paths hit with an unsupported method.
pub async fn not_found_handler() -> AppError {
    AppError::NotFound
}

/// Turn the raw URI path into a decoded path relative to the site root.
fn requested_path(raw: &str) -> Result<String, AppError> {
    if raw == "/" {
        return Ok(ENTRY_DOCUMENT.to_string());
    }

    let trimmed = raw.trim_start_matches('/');
    urlencoding::decode(trimmed)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| AppError::PathEscape)
}
