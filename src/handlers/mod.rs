// handlers/mod.rs - request handlers
//
// Each handler is a thin axum adapter: extract the caller and the typed body,
// delegate to the matching operation in `services`, map its error to `ApiError`.

pub mod itinerary;
pub mod trips;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Itinerary API",
        "version": version,
        "description": "Trip records and generated day-by-day itineraries",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "trips": "POST /trips (credential required)",
            "generate": "POST /generate-itinerary (credential required)",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok",
                "generation_mode": state.generator.mode(),
            })),
        )),
        Err(e) => {
            tracing::warn!(error = %e, "store health check failed");
            Err(ApiError::service_unavailable("store unavailable"))
        }
    }
}
