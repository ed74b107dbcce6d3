//! HTTP handlers for the four member operations.
//!
//! This is the adapter boundary: requests are unpacked into workflow inputs,
//! workflow outcomes are packed into responses, and the error taxonomy is
//! mapped onto status codes here and nowhere else.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::domains::member::{Confirmation, MemberError, MemberRecord, RegisteredMember};
use crate::kernel::FieldMap;
use crate::server::app::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    #[serde(default)]
    pub name: Option<String>,
}

/// POST /members — register a new member.
///
/// A missing or malformed body is treated the same as missing fields; the
/// workflow answers with its own 400 rather than axum's rejection.
pub async fn register_member(
    Extension(state): Extension<AppState>,
    payload: Option<Json<RegisterPayload>>,
) -> Result<(StatusCode, Json<RegisteredMember>), ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let registered = state
        .members
        .register(payload.name.as_deref(), payload.email.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(registered)))
}

/// GET /members?name= — look up a member by exact name.
pub async fn find_member_by_name(
    Extension(state): Extension<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<MemberRecord>, ApiError> {
    let record = state.members.find_by_name(query.name.as_deref()).await?;
    Ok(Json(record))
}

/// PUT /members?name= — merge-patch the member's fields.
pub async fn update_member_by_name(
    Extension(state): Extension<AppState>,
    Query(query): Query<NameQuery>,
    updates: Option<Json<FieldMap>>,
) -> Result<Json<Confirmation>, ApiError> {
    let confirmation = state
        .members
        .update_by_name(query.name.as_deref(), updates.map(|Json(u)| u))
        .await?;

    Ok(Json(confirmation))
}

/// DELETE /members?name= — remove the member, subject to the age gate.
pub async fn remove_member_by_name(
    Extension(state): Extension<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Confirmation>, ApiError> {
    let confirmation = state.members.remove_by_name(query.name.as_deref()).await?;
    Ok(Json(confirmation))
}

/// Workflow error carried to the HTTP layer.
#[derive(Debug)]
pub struct ApiError(MemberError);

impl From<MemberError> for ApiError {
    fn from(err: MemberError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            MemberError::MissingFields
            | MemberError::MissingName
            | MemberError::MissingParameters
            | MemberError::DisallowedScript
            | MemberError::InvalidEmailShape => StatusCode::BAD_REQUEST,
            MemberError::TooSoon => StatusCode::FORBIDDEN,
            MemberError::NotFound => StatusCode::NOT_FOUND,
            MemberError::CorruptRecord(_) | MemberError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Refusals read as a message, faults as an error
        let body = match &self.0 {
            MemberError::NotFound | MemberError::TooSoon => {
                json!({ "message": self.0.to_string() })
            }
            _ => json!({ "error": self.0.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uuid::Uuid;

    use crate::kernel::StoreError;

    fn status_of(err: MemberError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn test_input_errors_map_to_400() {
        assert_eq!(status_of(MemberError::MissingFields), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(MemberError::MissingName), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(MemberError::MissingParameters),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(MemberError::DisallowedScript),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(MemberError::InvalidEmailShape),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_refusals_and_not_found_keep_their_codes() {
        assert_eq!(status_of(MemberError::TooSoon), StatusCode::FORBIDDEN);
        assert_eq!(status_of(MemberError::NotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_failures_map_to_500() {
        assert_eq!(
            status_of(MemberError::Store(StoreError::MissingDocument(
                Uuid::new_v4()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(MemberError::CorruptRecord(Uuid::new_v4())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
