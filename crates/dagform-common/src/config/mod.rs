//! Configuration loading for dagform.
//! Reads dagform.toml from the current directory or the path in the DAGFORM_CONFIG env var.
//! Every field has a default, so a missing file simply yields the built-in configuration.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::path::Path;

use crate::error::{ConfigError, Result};

pub const CONFIG_PATH_ENV: &str = "DAGFORM_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "dagform.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sessions: SessionConfig,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host()       -> String { "127.0.0.1".to_string() }
fn default_port()       -> u16    { 5000 }
fn default_static_dir() -> String { "static".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), static_dir: default_static_dir() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Sessions untouched for this long are evicted.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    /// Hard upper bound on a session's age, regardless of activity.
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
}

fn default_idle_timeout() -> u64 { 3_600 }
fn default_max_lifetime() -> u64 { 86_400 }
fn default_max_sessions() -> u64 { 10_000 }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            max_sessions: default_max_sessions(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Remote JSON bin reached over HTTP (read-modify-write).
    Jsonbin,
    /// Local append-only JSON lines file.
    File,
    #[default]
    Memory,
}

impl SinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Jsonbin => "jsonbin",
            SinkKind::File    => "file",
            SinkKind::Memory  => "memory",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SinkConfig {
    #[serde(default)]
    pub kind: SinkKind,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub bin_id: String,
    /// Pre-shared secret sent in `key_header`. Prefer DAGFORM_SINK_API_KEY over the file.
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_key_header")]
    pub key_header: String,
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url()    -> String { "https://api.jsonbin.io/v3/b".to_string() }
fn default_key_header()  -> String { "X-Master-Key".to_string() }
fn default_results_dir() -> String { "results".to_string() }
fn default_timeout()     -> u64    { 30 }

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::default(),
            base_url: default_base_url(),
            bin_id: String::new(),
            api_key: None,
            key_header: default_key_header(),
            results_dir: default_results_dir(),
            timeout_secs: default_timeout(),
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(SecretString::from))
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_node_radius")]
    pub node_radius: f64,
}

fn default_width()       -> u32 { 800 }
fn default_height()      -> u32 { 600 }
fn default_iterations()  -> u32 { 50 }
fn default_node_radius() -> f64 { 36.0 }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            iterations: default_iterations(),
            node_radius: default_node_radius(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String { "info".to_string() }

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}


impl Config {
    /// Load configuration for the server binary.
    /// Loads `.env` first, then the TOML file (if any), then environment overrides.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let path = std::env::var(CONFIG_PATH_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            Self::load_from(&path)?
        } else {
            tracing::info!(path = %path, "Config file not found, using defaults");
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without applying environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply DAGFORM_* overrides. `lookup` is `std::env::var` in production.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DAGFORM_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("DAGFORM_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("DAGFORM_PORT is not a port: {}", port)))?;
        }
        if let Some(key) = lookup("DAGFORM_SINK_API_KEY").filter(|k| !k.is_empty()) {
            self.sink.api_key = Some(SecretString::from(key));
        }
        if let Some(level) = lookup("DAGFORM_LOG") {
            self.log.level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".to_string()));
        }
        if self.sessions.max_sessions == 0 {
            return Err(ConfigError::Invalid("sessions.max_sessions must be at least 1".to_string()));
        }
        if self.render.width == 0 || self.render.height == 0 {
            return Err(ConfigError::Invalid("render.width and render.height must be non-zero".to_string()));
        }
        if self.sink.kind == SinkKind::Jsonbin {
            if self.sink.bin_id.trim().is_empty() {
                return Err(ConfigError::Invalid("sink.bin_id is required for the jsonbin sink".to_string()));
            }
            let has_key = self
                .sink
                .api_key
                .as_ref()
                .is_some_and(|k| !k.expose_secret().is_empty());
            if !has_key {
                return Err(ConfigError::Invalid(
                    "the jsonbin sink needs an API key (sink.api_key or DAGFORM_SINK_API_KEY)".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
