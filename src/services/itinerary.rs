use serde::Serialize;
use tracing::{debug, error, info};

use crate::auth::CallerIdentity;
use crate::database::models::{GeneratedContent, TripStatus};
use crate::database::TripStore;
use crate::services::error::ServiceError;
use crate::services::generator::ContentGenerator;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryGenerated {
    pub message: String,
    pub content: GeneratedContent,
}

/// Generates content for a trip and writes it to every itinerary row, then marks the
/// trip completed.
///
/// The row updates and the status flip are separate writes. A failure part way
/// leaves the earlier rows updated and the trip status unchanged.
pub async fn generate_itinerary(
    store: &dyn TripStore,
    generator: &ContentGenerator,
    caller: &CallerIdentity,
    trip_id: &str,
    days: i64,
) -> Result<ItineraryGenerated, ServiceError> {
    info!(trip_id, days, caller = caller.as_str(), mode = %generator.mode(), "generating itinerary");

    let trip = store.fetch_trip(trip_id, caller).await?;
    debug!(
        trip_id = %trip.id,
        destination = %trip.destination,
        status = %trip.status,
        "trip loaded"
    );

    let itineraries = store.list_itineraries_for_trip(&trip.id).await?;
    debug!(trip_id = %trip.id, count = itineraries.len(), "itinerary rows loaded");

    let content = generator
        .generate(&trip.destination, days, trip.budget)
        .await
        .map_err(|e| {
            error!(trip_id = %trip.id, error = %e, "itinerary generation failed");
            ServiceError::from(e)
        })?;

    for itinerary in &itineraries {
        store
            .update_itinerary_content(&itinerary.id, &content)
            .await
            .map_err(|e| {
                error!(itinerary_id = %itinerary.id, error = %e, "itinerary update failed");
                ServiceError::WriteFailed(format!("Failed to update itinerary {}", itinerary.id))
            })?;
        debug!(itinerary_id = %itinerary.id, day = itinerary.day_number, "itinerary updated");
    }

    store
        .set_trip_status(&trip.id, TripStatus::Completed)
        .await
        .map_err(|e| {
            error!(trip_id = %trip.id, error = %e, "trip status update failed");
            ServiceError::WriteFailed(e.to_string())
        })?;

    info!(trip_id = %trip.id, rows = itineraries.len(), "itinerary generated");

    Ok(ItineraryGenerated {
        message: "Itinerary generated".to_string(),
        content,
    })
}
