use async_trait::async_trait;

use crate::auth::CallerIdentity;
use crate::database::error::StoreError;
use crate::database::models::{GeneratedContent, Itinerary, NewTrip, Trip, TripStatus};

/// Ownership-aware access to trips and their itinerary rows.
///
/// Implementations never create itinerary rows; those are provisioned elsewhere.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Exactly one trip by id, additionally scoped to the caller unless the caller
    /// is the service identity.
    async fn fetch_trip(&self, trip_id: &str, caller: &CallerIdentity) -> Result<Trip, StoreError>;

    /// Inserts a draft trip owned by `owner` and returns its id.
    async fn create_trip(&self, trip: NewTrip, owner: &str) -> Result<String, StoreError>;

    /// All itinerary rows of a trip ordered by day. Empty is `NotFound`.
    async fn list_itineraries_for_trip(&self, trip_id: &str) -> Result<Vec<Itinerary>, StoreError>;

    async fn update_itinerary_content(
        &self,
        itinerary_id: &str,
        content: &GeneratedContent,
    ) -> Result<(), StoreError>;

    async fn set_trip_status(&self, trip_id: &str, status: TripStatus) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
