use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::value::RawValue;
use std::sync::Arc;

use crate::{refresh::Refresher, store::RECORD_KEY};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub refresher: Arc<Refresher>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageResponse {
    fn not_found() -> Response {
        let body = MessageResponse {
            message: "No data found".to_string(),
            error: None,
        };
        (StatusCode::NOT_FOUND, Json(body)).into_response()
    }

    fn internal(error: impl ToString) -> Response {
        let body = MessageResponse {
            message: "Error fetching data".to_string(),
            error: Some(error.to_string()),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// `GET /`: refresh first if the cache is stale, then serve the cached record
/// exactly as stored. A failed read counts as no data.
pub async fn get_record(State(state): State<AppState>) -> Response {
    state.refresher.refresh_if_stale().await;

    let cached = match state.refresher.store().get(RECORD_KEY).await {
        Ok(Some(cached)) => cached,
        Ok(None) => return MessageResponse::not_found(),
        Err(e) => {
            tracing::error!("Failed to read cached record: {}", e);
            return MessageResponse::not_found();
        }
    };

    // Validate only; the stored text goes out byte for byte.
    if let Err(e) = serde_json::from_str::<&RawValue>(&cached) {
        tracing::error!("Cached record is not valid JSON: {}", e);
        return MessageResponse::internal(e);
    }

    ([(header::CONTENT_TYPE, "application/json")], cached).into_response()
}

// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new().route("/", get(get_record)).with_state(state)
}
