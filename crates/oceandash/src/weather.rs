//! Deterministic sea-state lookup.
//!
//! No external service is called and nothing is persisted. The same
//! coordinates always produce the same report.

use std::fmt;

use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::model::validate::validate_payload;

/// Coordinates for a weather lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherQuery {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl WeatherQuery {
    /// Validate a JSON payload into a query. Both coordinates are required
    /// numbers; neither is range checked.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the missing or mistyped fields.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        validate_payload::<WeatherRequest, Self>(payload)
    }
}

#[derive(Debug, Deserialize, Validate)]
struct WeatherRequest {
    #[garde(required)]
    lat: Option<f64>,
    #[garde(required)]
    lng: Option<f64>,
}

impl From<WeatherRequest> for WeatherQuery {
    fn from(request: WeatherRequest) -> Self {
        Self {
            lat: request.lat.unwrap_or_default(),
            lng: request.lng.unwrap_or_default(),
        }
    }
}

/// Sea state category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum SeaState {
    Calm,
    Slight,
    Moderate,
    Rough,
}

impl SeaState {
    /// Bucket the coordinates: `floor((|lat| + |lng|) mod 4)`.
    ///
    /// Non-finite input lands in [`SeaState::Calm`].
    #[must_use]
    pub fn from_coordinates(lat: f64, lng: f64) -> Self {
        let sum = lat.abs() + lng.abs();
        if !sum.is_finite() {
            return Self::Calm;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bucket = (sum % 4.0).floor() as u8;
        match bucket {
            1 => Self::Slight,
            2 => Self::Moderate,
            3 => Self::Rough,
            _ => Self::Calm,
        }
    }

    /// Bucket index, 0 through 3.
    #[must_use]
    pub const fn bucket(self) -> u32 {
        match self {
            Self::Calm => 0,
            Self::Slight => 1,
            Self::Moderate => 2,
            Self::Rough => 3,
        }
    }

    /// Display label, e.g. "Calm".
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Calm => "Calm",
            Self::Slight => "Slight",
            Self::Moderate => "Moderate",
            Self::Rough => "Rough",
        }
    }
}

impl fmt::Display for SeaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Synthetic weather report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    /// e.g. "Calm seas".
    pub summary: String,
    /// Wind speed in knots.
    pub wind_kts: u32,
    /// Visibility in kilometers.
    pub visibility_km: u32,
    /// Wave height in meters, one decimal place.
    pub wave_m: f64,
}

/// Produce the report for a query.
#[must_use]
pub fn forecast(query: &WeatherQuery) -> WeatherReport {
    let state = SeaState::from_coordinates(query.lat, query.lng);
    let bucket = state.bucket();

    WeatherReport {
        summary: format!("{state} seas"),
        wind_kts: 8 + bucket * 5,
        visibility_km: 20 - bucket * 3,
        wave_m: ((0.5 + f64::from(bucket) * 0.7) * 10.0).round() / 10.0,
    }
}
