use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::schema::{Issue, Payload, Shape, UnknownKeys, ValidationError};
use crate::web::state::AppState;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unknown shape: {0}")]
    UnknownShape(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Serialize)]
struct ValidationFailure<'a> {
    error: String,
    shape: &'static str,
    issues: &'a [Issue],
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::UnknownShape(name) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("Unknown shape '{}'", name) })),
            )
                .into_response(),
            ApiError::MalformedBody(rejection) => (
                rejection.status(),
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response(),
            ApiError::Invalid(err) => {
                let body = ValidationFailure {
                    error: err.to_string(),
                    shape: err.shape,
                    issues: &err.issues,
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
        }
    }
}

// System status

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: i64,
    pub shape_count: usize,
    pub unknown_keys: UnknownKeys,
}

// API Implementations

pub async fn list_schemas() -> Json<Vec<&'static str>> {
    Json(Shape::names())
}

pub async fn validate_payload(
    State(state): State<Arc<AppState>>,
    Path(shape_name): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Payload>, ApiError> {
    // The shape is resolved before the body so an unknown shape is a 404
    // whatever was posted.
    let shape = Shape::from_name(&shape_name).ok_or_else(|| {
        warn!("Validation requested for unknown shape '{}'", shape_name);
        ApiError::UnknownShape(shape_name.clone())
    })?;
    let Json(payload) = payload.inspect_err(|rejection| {
        info!("Rejected {} request body: {}", shape, rejection.body_text());
    })?;

    match shape.validate(&payload, &state.validation) {
        Ok(validated) => Ok(Json(validated)),
        Err(e) => {
            info!("Rejected {} payload with {} issue(s)", shape, e.issues.len());
            Err(e.into())
        }
    }
}

pub async fn system_status(State(state): State<Arc<AppState>>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        shape_count: Shape::ALL.len(),
        unknown_keys: state.validation.unknown_keys,
    })
}
