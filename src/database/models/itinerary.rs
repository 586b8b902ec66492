use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pre-created itinerary row. Generation only ever rewrites `generated_content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub id: String,
    pub trip_id: String,
    pub day_number: i32,
    pub generated_content: Option<serde_json::Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Completed,
}

/// Output of one generation call, written verbatim to every itinerary row of a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratedContent {
    pub content: String,
    pub interests: Vec<String>,
    pub preferences: Vec<String>,
    pub status: ContentStatus,
    pub day: i32,
}

impl GeneratedContent {
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
