//! HTTP handlers for all web routes.

pub mod dependencies;
pub mod graph;
pub mod health;
pub mod index;
pub mod results;
pub mod session;
pub mod variables;

use axum::extract::{FromRequest, FromRequestParts};
use dagform_graph::RenderedImage;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// `axum::Json` whose rejection is rendered in the API error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` whose rejection is rendered in the API error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// `?session_id=` for the read and save endpoints. A missing id is an unknown session.
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(default)]
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub success: bool,
    pub image: RenderedImage,
}

impl ImageResponse {
    pub fn ok(image: RenderedImage) -> Self {
        Self { success: true, image }
    }
}
