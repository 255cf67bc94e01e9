//! The venue record and its extraction schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Untyped venue record as returned by the LLM.
///
/// Filtering works on the raw object so that records with missing or extra
/// fields can be inspected before they are accepted.
pub type VenueRecord = serde_json::Map<String, serde_json::Value>;

/// A listing entry: a person with a position, a study program and research
/// interests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Venue {
    pub name: String,
    pub title: String,
    pub study_program: String,
    pub research_interests: String,
}

impl TryFrom<VenueRecord> for Venue {
    type Error = serde_json::Error;

    fn try_from(record: VenueRecord) -> Result<Self, Self::Error> {
        serde_json::from_value(serde_json::Value::Object(record))
    }
}

/// JSON schema handed to the extraction strategy.
#[must_use]
pub fn venue_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(Venue)).unwrap_or_default()
}
