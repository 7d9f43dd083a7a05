//! dagform-common: Shared models, configuration and errors used across all dagform crates.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, RenderConfig, ServerConfig, SessionConfig, SinkConfig, SinkKind};
pub use error::{ConfigError, Result};
pub use models::{Dependency, Owner, Snapshot, SNAPSHOT_TIMESTAMP_FORMAT};
