use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::handlers::{Ack, ApiJson};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct VariablesForm {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub variables: Vec<String>,
}

/// POST /submit_variables: replaces the session's variables and drops every dependency.
///
/// Names are stored trimmed (`" A "` becomes `"A"`), so later dependency
/// requests must use the trimmed names reported by `/get_dependency_options`.
/// Blank or repeated names (after trimming) are rejected with 400.
pub async fn submit_variables(
    State(state): State<SharedState>,
    ApiJson(form): ApiJson<VariablesForm>,
) -> Result<Json<Ack>, ApiError> {
    let count = form.variables.len();
    state
        .sessions
        .update(&form.session_id, |s| s.set_variables(form.variables))
        .await?;

    debug!(session_id = %form.session_id, count, "variables set");
    Ok(Json(Ack::ok()))
}
