//! Payload decoding and validation.
//!
//! A payload is first decoded with serde into a typed input struct, which
//! stops at the first field of the wrong type. The decoded input is then
//! checked with `garde`, which reports every missing or out-of-range field
//! in one pass.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use garde::{Report, Validate};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{FieldViolation, ValidationError, ViolationKind};

/// Field name used when the payload itself is not a JSON object.
pub const BODY_FIELD: &str = "body";

/// Message `garde` gives an unset `required` field.
const NOT_SET: &str = "not set";

/// Decode `payload` into `I`, validate it, and convert it into `T`.
///
/// # Errors
///
/// Returns a [`ValidationError`] for a non-object payload, for the first
/// field serde cannot decode, or for every rule `garde` finds broken.
pub fn validate_payload<I, T>(payload: &Value) -> Result<T, ValidationError>
where
    I: DeserializeOwned + Validate + Into<T>,
    I::Context: Default,
{
    let input: I = decode(payload)?;
    input.validate().map_err(|report| from_report(&report))?;
    Ok(input.into())
}

fn decode<I: DeserializeOwned>(payload: &Value) -> Result<I, ValidationError> {
    if !payload.is_object() {
        return Err(ValidationError::single(
            BODY_FIELD,
            ViolationKind::WrongType,
            "expected a JSON object",
        ));
    }

    serde_path_to_error::deserialize(payload).map_err(|err| {
        let field = match err.path().to_string() {
            root if root == "." => BODY_FIELD.to_string(),
            path => path,
        };
        ValidationError::single(field, ViolationKind::WrongType, err.into_inner().to_string())
    })
}

fn from_report(report: &Report) -> ValidationError {
    let violations = report
        .iter()
        .map(|(path, error)| {
            let field = path.to_string();
            if error.message() == NOT_SET {
                FieldViolation::missing(field)
            } else {
                FieldViolation::new(field, ViolationKind::OutOfRange, error.message())
            }
        })
        .collect();
    ValidationError::new(violations)
}

/// Deserialize an optional UTC date-time.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC) or a bare
/// `YYYY-MM-DD` (midnight UTC). `null` decodes to `None`.
///
/// # Errors
///
/// Fails for non-string values and strings in none of those formats.
pub fn deserialize_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_datetime(&text).map(Some).ok_or_else(|| {
        D::Error::custom(format!(
            "invalid date-time `{text}`, expected RFC 3339 or YYYY-MM-DD"
        ))
    })
}

fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
