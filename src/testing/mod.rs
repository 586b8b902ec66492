//! Fakes shared by the unit tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

use crate::auth::CallerIdentity;
use crate::database::models::{GeneratedContent, Itinerary, NewTrip, Trip, TripStatus};
use crate::database::{MemoryTripStore, StoreError, TripStore};
use crate::services::completion::CompletionProvider;
use crate::services::generator::GenerationError;

pub fn new_trip(destination: &str) -> NewTrip {
    NewTrip {
        destination: destination.to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
        budget: None,
    }
}

/// Store operation that [`FlakyStore`] fails.
#[derive(Debug, Clone, PartialEq)]
pub enum FailPoint {
    FetchTrip,
    CreateTrip,
    ListItineraries,
    /// Fails only the update of this itinerary id.
    UpdateItinerary(String),
    SetStatus,
}

/// Delegates to a [`MemoryTripStore`] except at one failure point.
pub struct FlakyStore {
    inner: Arc<MemoryTripStore>,
    fail: FailPoint,
}

impl FlakyStore {
    pub fn new(inner: Arc<MemoryTripStore>, fail: FailPoint) -> Self {
        Self { inner, fail }
    }
}

#[async_trait]
impl TripStore for FlakyStore {
    async fn fetch_trip(&self, trip_id: &str, caller: &CallerIdentity) -> Result<Trip, StoreError> {
        if self.fail == FailPoint::FetchTrip {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner.fetch_trip(trip_id, caller).await
    }

    async fn create_trip(&self, trip: NewTrip, owner: &str) -> Result<String, StoreError> {
        if self.fail == FailPoint::CreateTrip {
            return Err(StoreError::WriteFailed("insert rejected".to_string()));
        }
        self.inner.create_trip(trip, owner).await
    }

    async fn list_itineraries_for_trip(&self, trip_id: &str) -> Result<Vec<Itinerary>, StoreError> {
        if self.fail == FailPoint::ListItineraries {
            return Err(StoreError::Unavailable("connection reset".to_string()));
        }
        self.inner.list_itineraries_for_trip(trip_id).await
    }

    async fn update_itinerary_content(
        &self,
        itinerary_id: &str,
        content: &GeneratedContent,
    ) -> Result<(), StoreError> {
        if matches!(&self.fail, FailPoint::UpdateItinerary(id) if id == itinerary_id) {
            return Err(StoreError::WriteFailed("row locked".to_string()));
        }
        self.inner.update_itinerary_content(itinerary_id, content).await
    }

    async fn set_trip_status(&self, trip_id: &str, status: TripStatus) -> Result<(), StoreError> {
        if self.fail == FailPoint::SetStatus {
            return Err(StoreError::WriteFailed("status update rejected".to_string()));
        }
        self.inner.set_trip_status(trip_id, status).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.inner.health_check().await
    }
}

/// Completion provider with a canned answer that records every call.
pub struct ScriptedProvider {
    reply: Result<String, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedProvider {
    pub fn reply(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn fail(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(system, prompt)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        self.reply.clone().map_err(GenerationError::Provider)
    }
}
