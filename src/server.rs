//! HTTP endpoint for disease code lookups.
//!
//! # Routes
//!
//! - `GET /api/kcd/search?q=<text>&limit=<n>` returns `{ "items": [...] }`. A blank or
//!   missing `q` returns no items. `limit` defaults to 20 when absent or not an integer and
//!   is clamped to at most 50. If the dataset cannot be loaded the response is a
//!   `500 Internal Server Error` with `{ "items": [], "error": "<message>" }`.
//! - `GET /health` reports whether the dataset has been loaded yet.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::search::{parse_limit, Catalog, SearchResult};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

/// Raw query parameters. Both are kept as strings so that a bad `limit` never
/// causes a rejection.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

impl SearchParams {
    /// Pick `q` and `limit` out of the decoded query pairs. When a parameter is repeated
    /// the first value wins; unknown parameters are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> SearchParams {
        let mut params = SearchParams::default();
        for (name, value) in pairs {
            let slot = match name.as_str() {
                "q" => &mut params.q,
                "limit" => &mut params.limit,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct SearchResponse {
    pub items: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            error: Some(message.into()),
        }
    }
}

pub fn create_app(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/api/kcd/search", get(search_handler))
        .route("/health", get(health_handler))
        .with_state(AppState { catalog })
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = SearchParams::from_pairs(pairs);
    let query = params.q.unwrap_or_default();
    let limit = parse_limit(params.limit.as_deref());
    debug!(%query, ?limit, "Processing KCD search request");

    // The first search reads and parses the whole file.
    let catalog = state.catalog.clone();
    let outcome =
        tokio::task::spawn_blocking(move || catalog.search(&query, limit).map_err(|e| e.to_string()))
            .await;

    match outcome {
        Ok(Ok(items)) => Json(SearchResponse { items, error: None }).into_response(),
        Ok(Err(message)) => {
            error!(%message, "KCD dataset could not be loaded");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SearchResponse::failed(message)),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "KCD search task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SearchResponse::failed("search task failed")),
            )
                .into_response()
        }
    }
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "loaded": state.catalog.is_loaded(),
    }))
}
