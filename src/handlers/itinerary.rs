use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::Authenticated;
use crate::services::{self, ItineraryGenerated};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateItineraryRequest {
    pub trip_id: String,
    pub days: i64,
}

/// POST /generate-itinerary - generate content for every itinerary row of a trip
pub async fn generate_itinerary(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    payload: Result<Json<GenerateItineraryRequest>, JsonRejection>,
) -> Result<Json<ItineraryGenerated>, ApiError> {
    let Json(request) = payload?;
    let generated = services::generate_itinerary(
        state.store.as_ref(),
        state.generator.as_ref(),
        &caller,
        &request.trip_id,
        request.days,
    )
    .await?;
    Ok(Json(generated))
}
