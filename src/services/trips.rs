use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::auth::CallerIdentity;
use crate::database::models::NewTrip;
use crate::database::TripStore;
use crate::services::error::ServiceError;

/// Body of a trip creation request.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTripRequest {
    /// Accepted for compatibility; the owner always comes from the caller.
    #[serde(default)]
    pub user_id: Option<String>,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub budget: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripCreated {
    pub message: String,
    pub trip_id: String,
}

/// Owner recorded for a new trip: the resolved caller, `service_role` for the service identity.
pub fn resolve_owner(caller: &CallerIdentity) -> String {
    caller.as_str().to_string()
}

pub async fn create_trip(
    store: &dyn TripStore,
    caller: &CallerIdentity,
    request: CreateTripRequest,
) -> Result<TripCreated, ServiceError> {
    let owner = resolve_owner(caller);
    if request.user_id.as_deref().is_some_and(|requested| requested != owner) {
        info!(requested = ?request.user_id, owner = %owner, "payload owner overridden by caller identity");
    }

    let trip = NewTrip {
        destination: request.destination,
        start_date: request.start_date,
        end_date: request.end_date,
        budget: request.budget,
    };
    info!(owner = %owner, destination = %trip.destination, "creating trip");

    let trip_id = store.create_trip(trip, &owner).await.map_err(|e| {
        error!(owner = %owner, error = %e, "trip insert failed");
        ServiceError::WriteFailed(e.to_string())
    })?;

    Ok(TripCreated {
        message: "Trip created successfully".to_string(),
        trip_id,
    })
}
