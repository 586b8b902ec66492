pub mod completion;
pub mod error;
pub mod generator;
pub mod itinerary;
pub mod trips;

pub use completion::{CompletionProvider, OpenAiClient};
pub use error::ServiceError;
pub use generator::{ContentGenerator, GenerationError, GenerationMode};
pub use itinerary::{generate_itinerary, ItineraryGenerated};
pub use trips::{create_trip, CreateTripRequest, TripCreated};
