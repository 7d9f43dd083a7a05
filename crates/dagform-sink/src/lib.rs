//! dagform-sink: durable shared list of saved snapshots.
//!
//! Backends:
//!   JsonBinSink: remote JSON bin, read-modify-write over HTTP GET/PUT
//!   FileSink   : local JSON-lines file, one atomic append per snapshot
//!   MemorySink : in-process list for development and tests

pub mod error;
pub mod file;
pub mod jsonbin;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use dagform_common::{SinkConfig, SinkKind, Snapshot};

pub use error::{Result, SinkError, SinkStage};
pub use file::FileSink;
pub use jsonbin::JsonBinSink;
pub use memory::MemorySink;

#[async_trait]
pub trait ResultsSink: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn name(&self) -> &'static str;

    /// Append one snapshot to the end of the shared list.
    async fn append(&self, snapshot: &Snapshot) -> Result<()>;

    /// Every stored snapshot in append order. Entries that are not snapshots are skipped.
    async fn list(&self) -> Result<Vec<Snapshot>>;
}

/// Build the sink selected by `config.kind`.
pub fn build_sink(config: &SinkConfig) -> Result<Arc<dyn ResultsSink>> {
    let sink: Arc<dyn ResultsSink> = match config.kind {
        SinkKind::Jsonbin => Arc::new(JsonBinSink::from_config(config)?),
        SinkKind::File    => Arc::new(FileSink::new(&config.results_dir)?),
        SinkKind::Memory  => Arc::new(MemorySink::new()),
    };
    tracing::info!(sink = sink.name(), "results sink ready");
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sink_by_kind() {
        let memory = build_sink(&SinkConfig::default()).unwrap();
        assert_eq!(memory.name(), "memory");

        let dir = tempfile::tempdir().unwrap();
        let file = build_sink(&SinkConfig {
            kind: SinkKind::File,
            results_dir: dir.path().join("out").display().to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(file.name(), "file");
    }

    #[test]
    fn test_jsonbin_without_key_is_misconfigured() {
        let result = build_sink(&SinkConfig {
            kind: SinkKind::Jsonbin,
            bin_id: "abc".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(SinkError::Misconfigured(_))));
    }
}
