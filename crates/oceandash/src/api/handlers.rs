//! Request handlers.
//!
//! Create and list handlers are generic over [`Document`], so every entity
//! shares one validate-then-insert and one query path.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::error::{ValidationError, ViolationKind};
use crate::gateway::Diagnostics;
use crate::model::{Document, Stored};
use crate::weather::{self, WeatherQuery, WeatherReport};

/// Message served at `/`.
pub const ROOT_MESSAGE: &str = "Oceanographic Dashboard Backend Running";

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    /// Always [`ROOT_MESSAGE`].
    pub message: &'static str,
}

/// Body of a successful create.
#[derive(Debug, Serialize)]
pub struct Created {
    /// Identifier of the new document.
    pub id: String,
}

/// Query parameters accepted by list endpoints.
///
/// `limit` is kept as text so a bad value is reported as a field violation.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Maximum number of documents; `0` means no limit.
    pub limit: Option<String>,
}

pub async fn root() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: ROOT_MESSAGE,
    })
}

pub async fn diagnostics(State(state): State<AppState>) -> Json<Diagnostics> {
    Json(state.gateway.diagnostics().await)
}

pub async fn create<D: Document>(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Created>> {
    let Json(payload) = payload.map_err(|rejection| ApiError::body_rejected(&rejection))?;
    let document = D::from_payload(&payload)?;

    let id = state.gateway.insert(&document).await?;
    info!(collection = %D::COLLECTION, %id, "Document created");

    Ok(Json(Created { id }))
}

pub async fn list<D: Document>(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Stored<D>>>> {
    let Query(params) = params.map_err(|rejection| ApiError::query_rejected(&rejection))?;
    let default = state.limits.for_collection(D::COLLECTION);
    let limit = resolve_limit(params.limit.as_deref(), default)?;

    let documents = state.gateway.query::<D>(limit).await?;
    debug!(
        collection = %D::COLLECTION,
        count = documents.len(),
        ?limit,
        "Documents listed"
    );

    Ok(Json(documents))
}

pub async fn weather(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Json<WeatherReport>> {
    let Json(payload) = payload.map_err(|rejection| ApiError::body_rejected(&rejection))?;
    let query = WeatherQuery::from_payload(&payload)?;
    Ok(Json(weather::forecast(&query)))
}

/// Turn the raw `limit` parameter into a store limit.
///
/// Absent means `default`; `0` means unlimited (`None`).
fn resolve_limit(raw: Option<&str>, default: usize) -> Result<Option<usize>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(Some(default));
    };

    let value: i64 = raw.trim().parse().map_err(|_| {
        ValidationError::single("limit", ViolationKind::WrongType, "expected an integer")
    })?;

    match usize::try_from(value) {
        Ok(0) => Ok(None),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(ValidationError::single(
            "limit",
            ViolationKind::OutOfRange,
            "lower than 0",
        )),
    }
}
