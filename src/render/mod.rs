//! Trip document export.
//!
//! A [`TripDocument`] is laid out into pages by [`layout::layout_document`], a pure
//! function, and then written to `itinerary_{id}.pdf` by [`pdf::render_itinerary_pdf`].

pub mod layout;
pub mod pdf;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub use layout::{layout_document, FontWeight, Page, PlacedLine};
pub use pdf::{output_path, render_itinerary_pdf};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Invalid trip document: {0}")]
    InvalidDocument(String),
}

/// Input of the document renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDocument {
    pub id: String,
    pub destinations: Vec<String>,
    /// Days.
    pub duration: i64,
    /// Day label to activities, in document order.
    #[serde(with = "ordered_days")]
    pub itinerary: Vec<(String, Vec<String>)>,
}

impl TripDocument {
    pub fn from_json(input: &str) -> Result<Self, RenderError> {
        serde_json::from_str(input).map_err(|e| RenderError::InvalidDocument(e.to_string()))
    }
}

/// JSON object <-> ordered pairs, keeping key order as written.
mod ordered_days {
    use super::*;

    pub fn serialize<S: Serializer>(days: &[(String, Vec<String>)], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(days.len()))?;
        for (label, activities) in days {
            map.serialize_entry(label, activities)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<(String, Vec<String>)>, D::Error> {
        deserializer.deserialize_map(DaysVisitor)
    }

    struct DaysVisitor;

    impl<'de> Visitor<'de> for DaysVisitor {
        type Value = Vec<(String, Vec<String>)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of day label to a list of activities")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut days = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((label, activities)) = access.next_entry::<String, Vec<String>>()? {
                days.push((label, activities));
            }
            Ok(days)
        }
    }
}
