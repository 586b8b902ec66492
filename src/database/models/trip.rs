use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TripStatus {
    #[default]
    Draft,
    Completed,
    /// Any status written by another process that this service does not manage.
    Other(String),
}

impl TripStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TripStatus::Draft => "draft",
            TripStatus::Completed => "completed",
            TripStatus::Other(s) => s,
        }
    }
}

impl From<String> for TripStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "draft" => TripStatus::Draft,
            "completed" => TripStatus::Completed,
            _ => TripStatus::Other(value),
        }
    }
}

impl From<TripStatus> for String {
    fn from(status: TripStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub user_id: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Option<Decimal>,
    pub status: TripStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Caller-supplied trip fields. The owner is never taken from here.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Option<Decimal>,
}
