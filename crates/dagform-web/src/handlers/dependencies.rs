//! Pairwise dependency questions: candidate listing, add (with cycle rejection), remove.

use axum::{extract::State, Json};
use dagform_common::Dependency;
use dagform_graph::{AddOutcome, RenderedImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::handlers::{ApiJson, ApiQuery, ImageResponse, SessionQuery};
use crate::state::SharedState;

pub const CYCLE_MESSAGE: &str = "Adding this dependency would create a loop, which is not allowed";

#[derive(Debug, Deserialize)]
pub struct DependencyForm {
    #[serde(default)]
    pub session_id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Serialize)]
pub struct PairsResponse {
    pub success: bool,
    pub pairs: Vec<Dependency>,
}

/// Result of an add attempt. A rejected cycle is a business outcome, not an HTTP error:
/// `success` is false, `error` explains why and `image` shows the unchanged graph.
#[derive(Debug, Serialize)]
pub struct EdgeResponse {
    pub success: bool,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    pub image: RenderedImage,
}

fn outcome_label(outcome: AddOutcome) -> &'static str {
    match outcome {
        AddOutcome::Accepted => "accepted",
        AddOutcome::AlreadyPresent => "already_present",
        AddOutcome::RejectedCycle => "cycle",
    }
}

/// GET /get_dependency_options?session_id=
pub async fn dependency_options(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<SessionQuery>,
) -> Result<Json<PairsResponse>, ApiError> {
    let session = state.sessions.lock(&query.session_id).await?;
    Ok(Json(PairsResponse { success: true, pairs: session.candidate_pairs() }))
}

/// POST /add_dependency
pub async fn add_dependency(
    State(state): State<SharedState>,
    ApiJson(form): ApiJson<DependencyForm>,
) -> Result<Json<EdgeResponse>, ApiError> {
    let renderer = state.renderer.as_ref();
    let update = state
        .sessions
        .update(&form.session_id, |s| s.add_dependency(&form.source, &form.target, renderer))
        .await?;

    let rejected = update.outcome.is_rejected();
    if rejected {
        info!(from = %form.source, to = %form.target, "dependency rejected: would close a cycle");
    } else {
        debug!(from = %form.source, to = %form.target, outcome = ?update.outcome, "dependency added");
    }

    Ok(Json(EdgeResponse {
        success: !rejected,
        outcome: outcome_label(update.outcome),
        error: rejected.then_some(CYCLE_MESSAGE),
        image: update.image,
    }))
}

/// POST /remove_dependency
pub async fn remove_dependency(
    State(state): State<SharedState>,
    ApiJson(form): ApiJson<DependencyForm>,
) -> Result<Json<ImageResponse>, ApiError> {
    let renderer = state.renderer.as_ref();
    let image = state
        .sessions
        .update(&form.session_id, |s| s.remove_dependency(&form.source, &form.target, renderer))
        .await?;

    debug!(from = %form.source, to = %form.target, "dependency removed");
    Ok(Json(ImageResponse::ok(image)))
}
