//! Axum router: maps all URL paths to handlers.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::{
    dependencies::{add_dependency, dependency_options, remove_dependency},
    graph::current_graph,
    health::health,
    index::index,
    results::save_results,
    session::submit_user_info,
    variables::submit_variables,
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.static_dir);
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Page
        .route("/", get(index))

        // Form flow (paths kept stable for the bundled front end)
        .route("/submit_user_info",       post(submit_user_info))
        .route("/submit_variables",       post(submit_variables))
        .route("/get_dependency_options", get(dependency_options))
        .route("/add_dependency",         post(add_dependency))
        .route("/remove_dependency",      post(remove_dependency))
        .route("/get_current_graph",      get(current_graph))
        .route("/save_results",           post(save_results))

        .route("/health", get(health))

        // Static files
        .nest_service("/static", static_dir)

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
