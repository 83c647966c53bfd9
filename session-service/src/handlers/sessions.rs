//! The `/api/sessions` resource: create, list, read, replace, delete.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde_json::Value;
use service_core::error::AppError;

use crate::dtos::{DeleteResponse, SaveResponse};
use crate::models::Session;
use crate::services::SessionStore;
use crate::startup::AppState;

/// Store the request body as a new session and return its assigned id.
pub async fn create_session(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SaveResponse>, AppError> {
    let data = require_json_object(body)?;

    let id = state.store.insert(data).await?;
    tracing::info!(session_id = %id, "Session created");

    Ok(Json(SaveResponse {
        id,
        message: "Session created".to_string(),
    }))
}

/// All stored sessions; an empty array when there are none.
pub async fn list_sessions(State(state): State<AppState>) -> Result<Json<Vec<Session>>, AppError> {
    let sessions = state.store.find_all().await?;
    Ok(Json(sessions))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Session>, AppError> {
    let session = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(session_not_found)?;
    Ok(Json(session))
}

/// Replace a session's payload wholesale.
///
/// The body is validated before the id is looked up, so an empty body sent
/// to an unknown id is still a 400, not a 404.
pub async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SaveResponse>, AppError> {
    let data = require_json_object(body)?;

    state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(session_not_found)?;

    // The session can vanish between lookup and replace; report that the
    // same as an unknown id.
    if !state.store.replace(&id, data).await? {
        return Err(session_not_found());
    }

    tracing::info!(session_id = %id, "Session updated");

    Ok(Json(SaveResponse {
        id,
        message: "Session updated".to_string(),
    }))
}

/// Remove a session. Unknown ids succeed too; deletion is idempotent.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = state.store.delete_by_id(&id).await?;
    tracing::info!(session_id = %id, deleted, "Session delete handled");

    Ok(Json(DeleteResponse {
        message: "Successfully deleted".to_string(),
    }))
}

fn session_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Invalid URL"))
}

/// Admit only bodies that parsed as a JSON object with at least one key;
/// everything else (missing, unparsable, `{}`, arrays, scalars, `null`)
/// gets the fixed validation error.
fn require_json_object(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    match body {
        Ok(Json(value)) if is_non_empty_object(&value) => Ok(value),
        Ok(Json(_)) => {
            tracing::debug!("Rejected payload that is not a non-empty JSON object");
            Err(json_data_required())
        }
        Err(rejection) => {
            tracing::debug!(reason = %rejection, "Rejected unreadable request body");
            Err(json_data_required())
        }
    }
}

fn is_non_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(|map| !map.is_empty())
}

fn json_data_required() -> AppError {
    AppError::BadRequest(anyhow::anyhow!("Some JSON data required."))
}
