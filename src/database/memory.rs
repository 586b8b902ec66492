use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::CallerIdentity;
use crate::database::error::StoreError;
use crate::database::models::{GeneratedContent, Itinerary, NewTrip, Trip, TripStatus};
use crate::database::store::TripStore;

/// In-process [`TripStore`] used for local development (`STORE_BACKEND=memory`) and tests.
#[derive(Default)]
pub struct MemoryTripStore {
    trips: RwLock<HashMap<String, Trip>>,
    itineraries: RwLock<Vec<Itinerary>>,
}

impl MemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provisions an empty itinerary row, standing in for the external process that
    /// normally creates them.
    pub async fn seed_itinerary(&self, trip_id: &str, day_number: i32) -> Itinerary {
        let now = Utc::now();
        let itinerary = Itinerary {
            id: Uuid::new_v4().to_string(),
            trip_id: trip_id.to_string(),
            day_number,
            generated_content: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.itineraries.write().await.push(itinerary.clone());
        itinerary
    }

    /// Unscoped read, for inspection.
    pub async fn trip(&self, trip_id: &str) -> Option<Trip> {
        self.trips.read().await.get(trip_id).cloned()
    }

    pub async fn itineraries(&self, trip_id: &str) -> Vec<Itinerary> {
        let mut rows: Vec<Itinerary> = self
            .itineraries
            .read()
            .await
            .iter()
            .filter(|i| i.trip_id == trip_id)
            .cloned()
            .collect();
        rows.sort_by_key(|i| i.day_number);
        rows
    }
}

#[async_trait]
impl TripStore for MemoryTripStore {
    async fn fetch_trip(&self, trip_id: &str, caller: &CallerIdentity) -> Result<Trip, StoreError> {
        let trips = self.trips.read().await;
        trips
            .get(trip_id)
            .filter(|trip| caller.owner_filter().map_or(true, |owner| trip.user_id == owner))
            .cloned()
            .ok_or_else(|| StoreError::NotFound("Trip not found".to_string()))
    }

    async fn create_trip(&self, trip: NewTrip, owner: &str) -> Result<String, StoreError> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let record = Trip {
            id: id.clone(),
            user_id: owner.to_string(),
            destination: trip.destination,
            start_date: trip.start_date,
            end_date: trip.end_date,
            budget: trip.budget,
            status: TripStatus::Draft,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.trips.write().await.insert(id.clone(), record);
        Ok(id)
    }

    async fn list_itineraries_for_trip(&self, trip_id: &str) -> Result<Vec<Itinerary>, StoreError> {
        let rows = self.itineraries(trip_id).await;
        if rows.is_empty() {
            return Err(StoreError::NotFound("No itineraries found for this trip".to_string()));
        }
        Ok(rows)
    }

    async fn update_itinerary_content(
        &self,
        itinerary_id: &str,
        content: &GeneratedContent,
    ) -> Result<(), StoreError> {
        let payload = content
            .to_json()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let mut itineraries = self.itineraries.write().await;
        let row = itineraries
            .iter_mut()
            .find(|i| i.id == itinerary_id)
            .ok_or_else(|| StoreError::WriteFailed(format!("Failed to update itinerary {}", itinerary_id)))?;
        row.generated_content = Some(payload);
        row.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn set_trip_status(&self, trip_id: &str, status: TripStatus) -> Result<(), StoreError> {
        let mut trips = self.trips.write().await;
        let trip = trips
            .get_mut(trip_id)
            .ok_or_else(|| StoreError::WriteFailed(format!("Failed to update status of trip {}", trip_id)))?;
        trip.status = status;
        trip.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
