//! Application error taxonomy.
//!
//! Every operation returns one of four failures: `Validation` (field-level
//! rule failures, collected into a map), `Conflict` (a uniqueness violation,
//! whether caught by the pre-write check or by the storage layer's own
//! constraint), `NotFound`, or `Storage` (any other backend fault). Both
//! conflict paths normalize to the same shape, so callers cannot tell a
//! race outcome from a pre-check outcome.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rollbook_store::StoreError;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use validator::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(BTreeMap<String, String>),

    #[error("A {entity} with this {label} already exists")]
    Conflict {
        entity: &'static str,
        field: &'static str,
        label: &'static str,
    },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Storage(anyhow::Error),
}

impl AppError {
    pub fn validation(errors: ValidationErrors) -> Self {
        Self::Validation(field_error_map(&errors))
    }

    /// A validation failure on a single field, for errors detected outside
    /// the record validator (e.g. at the JSON boundary).
    pub fn validation_field(field: &str, message: &str) -> Self {
        Self::Validation(BTreeMap::from([(field.to_string(), message.to_string())]))
    }

    pub fn conflict(entity: &'static str, field: &'static str) -> Self {
        let label = if field == "email" { "email" } else { "ID" };
        Self::Conflict {
            entity,
            field,
            label,
        }
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound(entity)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Re-classify a storage fault: duplicate-key faults become the same
    /// conflict shape the pre-write check produces, everything else is an
    /// opaque storage failure.
    pub fn from_store(entity: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => Self::conflict(entity, field),
            StoreError::Backend(e) => Self::Storage(e),
        }
    }
}

fn field_error_map(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let message = errors
                .iter()
                .find_map(|error| error.message.as_ref().map(|msg| msg.to_string()))
                .unwrap_or_else(|| format!("{} is invalid", field));
            (field.to_string(), message)
        })
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict { .. } | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            Self::Validation(errors) => json!({
                "error": self.to_string(),
                "errors": errors,
            }),
            Self::Conflict { field, .. } => json!({
                "error": self.to_string(),
                "field": field,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Error body shape, for the OpenAPI document.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
