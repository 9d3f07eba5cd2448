use std::net::SocketAddr;

use axum::body::{Body, Bytes};
use axum::extract::{ConnectInfo, Request, State};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use http_body_util::LengthLimitError;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::app::AppState;
use crate::error::AppError;
use crate::feedback::store::FeedbackStore;

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub ok: bool,
}

/// Core feedback logic, separated from the HTTP layer for testability.
///
/// Parses `body` as JSON (an empty body counts as `{}`), stamps it with the
/// submission time and client address, and appends it to the store.
pub async fn process_feedback(
    store: &dyn FeedbackStore,
    body: &[u8],
    remote: Option<SocketAddr>,
) -> Result<FeedbackResponse, AppError> {
    let payload: Value = if body.is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(body).map_err(|e| AppError::MalformedInput(e.to_string()))?
    };

    let entry = stamp(payload, remote);
    store.append(entry).await?;

    Ok(FeedbackResponse { ok: true })
}

fn stamp(payload: Value, remote: Option<SocketAddr>) -> Value {
    let time = Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
    let ip = remote
        .map(|addr| Value::String(addr.ip().to_string()))
        .unwrap_or(Value::Null);

    let mut entry = match payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("payload".to_string(), other);
            map
        }
    };
    entry.insert("time".to_string(), time);
    entry.insert("ip".to_string(), ip);
    Value::Object(entry)
}

/// Axum handler for `POST /api/feedback`.
///
/// The body is read up to `max_body_bytes`; anything longer is dropped
/// without being buffered further.
pub async fn feedback_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<FeedbackResponse>, AppError> {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let body = read_body(request.into_body(), state.max_body_bytes).await?;
    let response = process_feedback(state.feedback_store.as_ref(), &body, remote).await?;
    Ok(Json(response))
}

/// Buffer at most `limit` bytes of `body`.
///
/// Only an exceeded limit is a 413; a body that breaks off mid-stream is
/// treated as malformed input.
async fn read_body(body: Body, limit: usize) -> Result<Bytes, AppError> {
    axum::body::to_bytes(body, limit).await.map_err(|e| {
        if exceeds_limit(&e) {
            tracing::warn!("Rejected feedback body over {limit} bytes");
            AppError::PayloadTooLarge
        } else {
            tracing::warn!("Failed to read feedback body: {e}");
            AppError::MalformedInput(format!("Failed to read body: {e}"))
        }
    })
}

fn exceeds_limit(err: &axum::Error) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}
