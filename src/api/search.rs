use axum::extract::{RawQuery, State};
use axum::Json;

use crate::app::AppState;
use crate::models::search::SearchResponse;

/// Axum handler for `/api/search?q=<text>`.
///
/// Always answers 200. A missing, empty, or unparseable `q` yields an empty
/// `results` array, and index problems never reach the client.
pub async fn search_handler(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Json<SearchResponse> {
    let query = raw.as_deref().map(query_text).unwrap_or_default();
    let results = state.index.search(&query);

    tracing::debug!("Search for {:?} returned {} results", query, results.len());

    Json(SearchResponse { results })
}

/// The first `q` parameter of a raw query string, or an empty string.
fn query_text(raw: &str) -> String {
    url::form_urlencoded::parse(raw.as_bytes())
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}
