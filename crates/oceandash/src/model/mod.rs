//! Document types for oceandash.
//!
//! Each persisted entity maps to exactly one [`Collection`]. Entities are
//! built from untyped JSON payloads through [`Document::from_payload`]: the
//! payload is decoded into the entity's create input, checked, and converted
//! with documented defaults filled in.

mod entities;
pub mod validate;

use chrono::{DateTime, Utc};
use garde::Validate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

pub use entities::{
    CreateCrewLog, CreateMission, CreateTelemetry, CreateVessel, CrewLog, Mission, Telemetry,
    Vessel,
};

/// The closed set of collections held in the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Research vessels.
    Vessel,
    /// Missions run by vessels.
    Mission,
    /// Free-form crew log entries.
    CrewLog,
    /// Position and sensor readings.
    Telemetry,
}

impl Collection {
    /// Every collection, in a stable order.
    pub const ALL: [Self; 4] = [Self::Vessel, Self::Mission, Self::CrewLog, Self::Telemetry];

    /// The collection's name inside the store.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vessel => "vessel",
            Self::Mission => "mission",
            Self::CrewLog => "crewlog",
            Self::Telemetry => "telemetry",
        }
    }

    /// Number of documents a list call returns when no limit is given.
    #[must_use]
    pub const fn default_limit(self) -> usize {
        match self {
            Self::Vessel | Self::Mission => 50,
            Self::CrewLog => 100,
            Self::Telemetry => 200,
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An entity that lives in one collection of the document store.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The collection this entity is stored in.
    const COLLECTION: Collection;

    /// The create payload, with its validation rules.
    type Input: DeserializeOwned + Validate<Context = ()> + Into<Self>;

    /// Validate an inbound payload and normalize it into an entity.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the offending fields. No entity
    /// is produced in that case.
    fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        validate::validate_payload::<Self::Input, Self>(payload)
    }
}

/// A document as returned from the store, with its identifier as a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stored<T> {
    /// Store-generated identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// The entity fields.
    #[serde(flatten)]
    pub document: T,
    /// When the document was inserted.
    pub created_at: DateTime<Utc>,
    /// Last write time. Equal to `created_at` since documents are immutable.
    pub updated_at: DateTime<Utc>,
}
