//! Shared application state for the web server.

use std::path::PathBuf;
use std::sync::Arc;

use dagform_common::Config;
use dagform_graph::{GraphRenderer, SpringRenderer};
use dagform_session::{SessionPolicy, SessionStore};
use dagform_sink::{build_sink, ResultsSink};

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub sink: Arc<dyn ResultsSink>,
    pub renderer: Arc<dyn GraphRenderer>,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        sessions: SessionStore,
        sink: Arc<dyn ResultsSink>,
        renderer: Arc<dyn GraphRenderer>,
    ) -> Self {
        Self { sessions, sink, renderer, static_dir: PathBuf::from("static") }
    }

    /// Wire store, sink and renderer from the loaded configuration.
    pub fn from_config(config: &Config) -> dagform_sink::Result<Self> {
        let sink = build_sink(&config.sink)?;
        let renderer = Arc::new(SpringRenderer::from_config(&config.render));
        let sessions = SessionStore::new(SessionPolicy::from(&config.sessions));

        Ok(Self::new(sessions, sink, renderer).with_static_dir(&config.server.static_dir))
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }
}

pub type SharedState = Arc<AppState>;
