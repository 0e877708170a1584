use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::utils::errors::AppError;

/// JSON body extractor that reports deserialization problems in the same
/// field-error shape the record validator produces.
///
/// Type-level rules are enforced here: a missing field maps to `required`,
/// a non-numeric identifier or an unknown enum value maps to a field error
/// on the offending field. Record-level validation itself runs in the
/// services, not in the extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(map_rejection)?;

        Ok(JsonBody(value))
    }
}

fn map_rejection(rejection: JsonRejection) -> AppError {
    let error_msg = rejection.body_text();

    if let Some(field) = error_msg
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        return AppError::validation_field(field, "This field is required");
    }

    if error_msg.contains("invalid type") {
        if let Some(field) = rejected_field(&error_msg) {
            return AppError::validation_field(field, "Has an invalid type");
        }
    }

    // Unknown enum variants, unparsable dates and similar data errors all
    // carry a field path; anything else is a malformed body.
    if let Some(field) = rejected_field(&error_msg) {
        return AppError::validation_field(field, "Is not a valid value");
    }

    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request("Missing 'Content-Type: application/json' header");
    }

    AppError::bad_request("Invalid request body")
}

/// axum prefixes body data errors with the serde path of the failing value
/// ("... target type: gender: unknown variant ..."); pull the leading path
/// segment out when it looks like a field name.
fn rejected_field(message: &str) -> Option<&str> {
    let rest = message.split("target type: ").nth(1)?;
    let candidate = rest.split(':').next()?.trim();
    let is_identifier = !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    is_identifier.then_some(candidate)
}
