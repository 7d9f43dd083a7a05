//! JSON bin client.
//!
//! Endpoints (relative to `base_url`):
//!   GET {bin_id}/latest  → `{ "record": [...], ... }`
//!   PUT {bin_id}         ← full JSON array
//!
//! The bin offers no atomic append, so `append` reads the whole collection,
//! pushes the snapshot and writes everything back. Appends from this process
//! are serialized; two processes writing the same bin can still lose one.

use std::time::Duration;

use async_trait::async_trait;
use dagform_common::{SinkConfig, Snapshot};
use reqwest::header::HeaderValue;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, SinkError, SinkStage};
use crate::ResultsSink;

pub const DEFAULT_KEY_HEADER: &str = "X-Master-Key";

pub struct JsonBinSink {
    client: Client,
    base_url: String,
    bin_id: String,
    key_header: String,
    api_key: SecretString,
    write_lock: Mutex<()>,
}

impl JsonBinSink {
    pub fn new(
        base_url: impl Into<String>,
        bin_id: impl Into<String>,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self> {
        let bin_id = bin_id.into();
        if bin_id.trim().is_empty() {
            return Err(SinkError::Misconfigured("bin id is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SinkError::Misconfigured(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bin_id,
            key_header: DEFAULT_KEY_HEADER.to_string(),
            api_key,
            write_lock: Mutex::new(()),
        })
    }

    pub fn from_config(config: &SinkConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .map(|k| SecretString::from(k.expose_secret().to_owned()))
            .ok_or_else(|| SinkError::Misconfigured("no API key for the jsonbin sink".to_string()))?;

        Ok(Self::new(
            config.base_url.clone(),
            config.bin_id.clone(),
            api_key,
            Duration::from_secs(config.timeout_secs),
        )?
        .with_key_header(config.key_header.clone()))
    }

    pub fn with_key_header(mut self, header: impl Into<String>) -> Self {
        self.key_header = header.into();
        self
    }

    fn latest_url(&self) -> String {
        format!("{}/{}/latest", self.base_url, self.bin_id)
    }

    fn bin_url(&self) -> String {
        format!("{}/{}", self.base_url, self.bin_id)
    }

    fn key_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(self.api_key.expose_secret())
            .map_err(|_| SinkError::Misconfigured("API key is not a valid header value".to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Current collection, kept as raw JSON so foreign entries survive a rewrite.
    async fn fetch_records(&self) -> Result<Vec<Value>> {
        let resp = self
            .client
            .get(self.latest_url())
            .header(self.key_header.as_str(), self.key_value()?)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "results store read failed");
            return Err(SinkError::Upstream { stage: SinkStage::Read, status: status.as_u16(), body });
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| SinkError::Decode(e.to_string()))?;

        Ok(match body {
            Value::Object(mut map) => match map.remove("record") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        })
    }

    async fn store_records(&self, records: &[Value]) -> Result<()> {
        let resp = self
            .client
            .put(self.bin_url())
            .header(self.key_header.as_str(), self.key_value()?)
            .json(records)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "results store write failed");
            return Err(SinkError::Upstream { stage: SinkStage::Write, status: status.as_u16(), body });
        }
        Ok(())
    }
}

#[async_trait]
impl ResultsSink for JsonBinSink {
    fn name(&self) -> &'static str {
        "jsonbin"
    }

    #[instrument(skip_all, fields(bin = %self.bin_id))]
    async fn append(&self, snapshot: &Snapshot) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.fetch_records().await?;
        debug!(existing = records.len(), "fetched results collection");
        records.push(serde_json::to_value(snapshot)?);
        self.store_records(&records).await?;

        info!(total = records.len(), "snapshot appended to results store");
        Ok(())
    }

    #[instrument(skip_all, fields(bin = %self.bin_id))]
    async fn list(&self) -> Result<Vec<Snapshot>> {
        let records = self.fetch_records().await?;
        Ok(records
            .into_iter()
            .filter_map(|r| serde_json::from_value(r).ok())
            .collect())
    }
}
