use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::IdentityResolver;
use crate::database::TripStore;
use crate::handlers;
use crate::services::ContentGenerator;

/// Handles shared by every request. Built once at startup, read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<IdentityResolver>,
    pub store: Arc<dyn TripStore>,
    pub generator: Arc<ContentGenerator>,
}

impl AppState {
    pub fn new(resolver: IdentityResolver, store: Arc<dyn TripStore>, generator: ContentGenerator) -> Self {
        Self {
            resolver: Arc::new(resolver),
            store,
            generator: Arc::new(generator),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Credential required
        .merge(trip_routes())
        .with_state(state)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn trip_routes() -> Router<AppState> {
    Router::new()
        .route("/trips", post(handlers::trips::create_trip))
        .route("/trips/", post(handlers::trips::create_trip))
        .route("/generate-itinerary", post(handlers::itinerary::generate_itinerary))
        .route("/generate-itinerary/", post(handlers::itinerary::generate_itinerary))
}
