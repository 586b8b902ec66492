use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::Authenticated;
use crate::services::{self, CreateTripRequest, TripCreated};

/// POST /trips - create a trip owned by the caller
pub async fn create_trip(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    payload: Result<Json<CreateTripRequest>, JsonRejection>,
) -> Result<Json<TripCreated>, ApiError> {
    let Json(request) = payload?;
    let created = services::create_trip(state.store.as_ref(), &caller, request).await?;
    Ok(Json(created))
}
