pub mod itinerary;
pub mod trip;

pub use itinerary::{ContentStatus, GeneratedContent, Itinerary};
pub use trip::{NewTrip, Trip, TripStatus};
