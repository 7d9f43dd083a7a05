//! Save: persist the session's snapshot to the results sink, then freeze the session.

use axum::{extract::State, Json};
use chrono::Utc;
use dagform_session::SessionError;
use tracing::info;

use crate::error::ApiError;
use crate::handlers::{Ack, ApiQuery, SessionQuery};
use crate::state::SharedState;

/// POST /save_results?session_id=
///
/// The session stays locked while the sink call is in flight, so a double
/// submit cannot append the same snapshot twice. On sink failure the session
/// remains editable and the save can be retried.
pub async fn save_results(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<SessionQuery>,
) -> Result<Json<Ack>, ApiError> {
    let mut session = state.sessions.lock(&query.session_id).await?;
    if session.is_saved() {
        return Err(SessionError::AlreadySaved(query.session_id).into());
    }

    let now = Utc::now();
    let snapshot = session.snapshot(now);
    state.sink.append(&snapshot).await?;
    session.mark_saved(now)?;

    info!(
        session_id = %session.id(),
        variables = snapshot.variables.len(),
        dependencies = snapshot.dependencies.len(),
        sink = state.sink.name(),
        "results saved"
    );
    Ok(Json(Ack::ok()))
}
