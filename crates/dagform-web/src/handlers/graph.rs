use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::handlers::{ApiQuery, ImageResponse, SessionQuery};
use crate::state::SharedState;

/// GET /get_current_graph?session_id=
pub async fn current_graph(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<SessionQuery>,
) -> Result<Json<ImageResponse>, ApiError> {
    let session = state.sessions.lock(&query.session_id).await?;
    Ok(Json(ImageResponse::ok(session.current_image(state.renderer.as_ref()))))
}
