//! Session creation from the user-info step.

use axum::{extract::State, Json};
use dagform_common::Owner;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::handlers::ApiJson;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct UserInfoForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "role")]
    pub position: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub success: bool,
    pub session_id: String,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::MissingField(field)),
    }
}

/// POST /submit_user_info
pub async fn submit_user_info(
    State(state): State<SharedState>,
    ApiJson(form): ApiJson<UserInfoForm>,
) -> Result<Json<SessionCreated>, ApiError> {
    let owner = Owner {
        name: required(form.name, "name")?,
        position: required(form.position, "position")?,
        email: required(form.email, "email")?,
    };

    let id = state.sessions.create(owner).await;
    debug!(session_id = %id, "session started");

    Ok(Json(SessionCreated { success: true, session_id: id.to_string() }))
}
