use std::path::Path;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

use crate::error::AppError;
use crate::static_files::resolver::SafePath;

/// Fallback for extensions missing from the table below.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type for a file, decided by its (case-insensitive) extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Stream the file at `path` as the response body.
///
/// No existence pre-check is trusted here: the file may vanish after the
/// router looked at it, so the open itself decides. `NotFound` from the OS
/// becomes a 404, every other I/O failure a 500. The body is capped at the
/// length advertised in `Content-Length`, so bytes appended mid-stream are
/// not sent.
pub async fn serve(path: &SafePath) -> Result<Response, AppError> {
    let file = tokio::fs::File::open(path.as_path()).await?;
    let meta = file.metadata().await?;
    if !meta.is_file() {
        return Err(AppError::NotFound);
    }

    let content_type = content_type_for(path.as_path());
    let length = meta.len();
    let body = Body::from_stream(ReaderStream::new(file.take(length)));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_LENGTH, length.to_string()),
        ],
        body,
    )
        .into_response())
}
