//! Handler-boundary errors and the uniform `{success:false, error}` envelope.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dagform_graph::GraphError;
use dagform_session::SessionError;
use dagform_sink::SinkError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Body or query string could not be decoded.
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        ApiError::Session(SessionError::Graph(err))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Session(SessionError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Session(SessionError::AlreadySaved(_)) => StatusCode::CONFLICT,
            ApiError::Session(SessionError::Graph(GraphError::DependencyNotFound { .. })) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Session(SessionError::Graph(_)) => StatusCode::BAD_REQUEST,
            ApiError::Sink(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Sink(e) => error!(error = %e, "results sink failure"),
            other => warn!(status = status.as_u16(), error = %other, "request rejected"),
        }
        let body = ErrorBody { success: false, error: self.to_string() };
        (status, Json(body)).into_response()
    }
}
