//! The four persisted entity types and their create payloads.
//!
//! Status and severity strings are documented with a small set of values
//! (`active | docked | maintenance`, `ongoing | planned | complete`,
//! `info | notice | warning | critical`) but any string is accepted.
//! `vessel_id` references are not checked against the vessel collection.
//!
//! Defaults fill in absent fields only. An explicit `null` is kept on
//! nullable fields (`heading`, `speed`, `severity`) and rejected on `status`.

use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};

use super::validate::deserialize_datetime;
use super::{Collection, Document};

#[allow(clippy::unnecessary_wraps)]
fn zero() -> Option<f64> {
    Some(0.0)
}

/// A research vessel and its last known position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    /// Vessel name.
    pub name: String,
    /// International Maritime Organization number.
    pub imo: Option<String>,
    /// Radio callsign.
    pub callsign: Option<String>,
    /// Current latitude, -90..=90.
    pub lat: f64,
    /// Current longitude, -180..=180.
    pub lng: f64,
    /// Heading in degrees, 0..=360.
    pub heading: Option<f64>,
    /// Speed in knots, never negative.
    pub speed: Option<f64>,
    /// Operational status.
    pub status: String,
}

impl Vessel {
    /// Status given to vessels created without one.
    pub const DEFAULT_STATUS: &'static str = "active";
}

/// Create payload for a [`Vessel`].
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVessel {
    #[garde(required)]
    name: Option<String>,
    #[garde(skip)]
    imo: Option<String>,
    #[garde(skip)]
    callsign: Option<String>,
    #[garde(required, range(min = -90.0, max = 90.0))]
    lat: Option<f64>,
    #[garde(required, range(min = -180.0, max = 180.0))]
    lng: Option<f64>,
    #[serde(default = "zero")]
    #[garde(range(min = 0.0, max = 360.0))]
    heading: Option<f64>,
    #[serde(default = "zero")]
    #[garde(range(min = 0.0))]
    speed: Option<f64>,
    #[serde(default = "CreateVessel::default_status")]
    #[garde(skip)]
    status: String,
}

impl CreateVessel {
    fn default_status() -> String {
        Vessel::DEFAULT_STATUS.to_string()
    }
}

// `required` fields are always set once validation has passed.
impl From<CreateVessel> for Vessel {
    fn from(input: CreateVessel) -> Self {
        Self {
            name: input.name.unwrap_or_default(),
            imo: input.imo,
            callsign: input.callsign,
            lat: input.lat.unwrap_or_default(),
            lng: input.lng.unwrap_or_default(),
            heading: input.heading,
            speed: input.speed,
            status: input.status,
        }
    }
}

impl Document for Vessel {
    const COLLECTION: Collection = Collection::Vessel;
    type Input = CreateVessel;
}

/// A research mission, optionally tied to a vessel.
///
/// `end_date` is not required to follow `start_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    /// Associated vessel id.
    pub vessel_id: Option<String>,
    /// Mission title.
    pub title: String,
    /// Short summary.
    pub summary: Option<String>,
    /// Oceanic region.
    pub region: Option<String>,
    /// Start date.
    pub start_date: Option<DateTime<Utc>>,
    /// End date, if completed.
    pub end_date: Option<DateTime<Utc>>,
    /// Mission status.
    pub status: String,
}

impl Mission {
    /// Status given to missions created without one.
    pub const DEFAULT_STATUS: &'static str = "ongoing";
}

/// Create payload for a [`Mission`].
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMission {
    #[garde(skip)]
    vessel_id: Option<String>,
    #[garde(required)]
    title: Option<String>,
    #[garde(skip)]
    summary: Option<String>,
    #[garde(skip)]
    region: Option<String>,
    #[serde(default, deserialize_with = "deserialize_datetime")]
    #[garde(skip)]
    start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_datetime")]
    #[garde(skip)]
    end_date: Option<DateTime<Utc>>,
    #[serde(default = "CreateMission::default_status")]
    #[garde(skip)]
    status: String,
}

impl CreateMission {
    fn default_status() -> String {
        Mission::DEFAULT_STATUS.to_string()
    }
}

impl From<CreateMission> for Mission {
    fn from(input: CreateMission) -> Self {
        Self {
            vessel_id: input.vessel_id,
            title: input.title.unwrap_or_default(),
            summary: input.summary,
            region: input.region,
            start_date: input.start_date,
            end_date: input.end_date,
            status: input.status,
        }
    }
}

impl Document for Mission {
    const COLLECTION: Collection = Collection::Mission;
    type Input = CreateMission;
}

/// A crew log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewLog {
    /// Associated vessel id.
    pub vessel_id: Option<String>,
    /// Crew member name.
    pub author: String,
    /// Crew role.
    pub role: Option<String>,
    /// Log entry text.
    pub message: String,
    /// Entry severity.
    pub severity: Option<String>,
}

impl CrewLog {
    /// Severity given to entries created without one.
    pub const DEFAULT_SEVERITY: &'static str = "info";
}

/// Create payload for a [`CrewLog`].
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCrewLog {
    #[garde(skip)]
    vessel_id: Option<String>,
    #[garde(required)]
    author: Option<String>,
    #[garde(skip)]
    role: Option<String>,
    #[garde(required)]
    message: Option<String>,
    #[serde(default = "CreateCrewLog::default_severity")]
    #[garde(skip)]
    severity: Option<String>,
}

impl CreateCrewLog {
    #[allow(clippy::unnecessary_wraps)]
    fn default_severity() -> Option<String> {
        Some(CrewLog::DEFAULT_SEVERITY.to_string())
    }
}

impl From<CreateCrewLog> for CrewLog {
    fn from(input: CreateCrewLog) -> Self {
        Self {
            vessel_id: input.vessel_id,
            author: input.author.unwrap_or_default(),
            role: input.role,
            message: input.message.unwrap_or_default(),
            severity: input.severity,
        }
    }
}

impl Document for CrewLog {
    const COLLECTION: Collection = Collection::CrewLog;
    type Input = CreateCrewLog;
}

/// A single telemetry reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Associated vessel id.
    pub vessel_id: Option<String>,
    /// Latitude, -90..=90.
    pub lat: f64,
    /// Longitude, -180..=180.
    pub lng: f64,
    /// Depth in meters, never negative.
    pub depth: Option<f64>,
    /// Sea temperature in degrees Celsius.
    pub temperature: Option<f64>,
    /// Salinity in PSU.
    pub salinity: Option<f64>,
}

/// Create payload for a [`Telemetry`] reading.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTelemetry {
    #[garde(skip)]
    vessel_id: Option<String>,
    #[garde(required, range(min = -90.0, max = 90.0))]
    lat: Option<f64>,
    #[garde(required, range(min = -180.0, max = 180.0))]
    lng: Option<f64>,
    #[garde(range(min = 0.0))]
    depth: Option<f64>,
    #[garde(skip)]
    temperature: Option<f64>,
    #[garde(skip)]
    salinity: Option<f64>,
}

impl From<CreateTelemetry> for Telemetry {
    fn from(input: CreateTelemetry) -> Self {
        Self {
            vessel_id: input.vessel_id,
            lat: input.lat.unwrap_or_default(),
            lng: input.lng.unwrap_or_default(),
            depth: input.depth,
            temperature: input.temperature,
            salinity: input.salinity,
        }
    }
}

impl Document for Telemetry {
    const COLLECTION: Collection = Collection::Telemetry;
    type Input = CreateTelemetry;
}
