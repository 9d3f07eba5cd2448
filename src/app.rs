use std::sync::Arc;

use axum::routing::{any, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::feedback::store::FeedbackStore;
use crate::search::index::DocumentIndex;
use crate::search::source::DocumentSource;
use crate::static_files::resolver::{PathResolver, ServePolicy};

/// Default cap on request bodies, in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1_000_000;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<DocumentIndex>,
    pub document_source: Arc<dyn DocumentSource>,
    pub feedback_store: Arc<dyn FeedbackStore>,
    pub resolver: Arc<PathResolver>,
    pub policy: Arc<ServePolicy>,
    pub max_body_bytes: usize,
}

impl AppState {
    /// Reload the search index from the configured document source.
    pub async fn reload_index(&self) -> usize {
        self.index.load(self.document_source.as_ref()).await
    }
}

/// Build the Axum router.
///
/// Exact API paths win; every other path is treated as a static asset
/// request by the fallback.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", any(api::health::health_handler))
        .route("/api/search", any(api::search::search_handler))
        .route(
            "/api/feedback",
            post(api::feedback::feedback_handler).fallback(api::assets::not_found_handler),
        )
        .fallback(api::assets::static_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
