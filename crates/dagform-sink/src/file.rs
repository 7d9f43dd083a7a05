//! Local JSON-lines results file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dagform_common::Snapshot;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::Result;
use crate::ResultsSink;

pub const RESULTS_FILE: &str = "results.jsonl";

pub struct FileSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSink {
    /// Creates `dir` if needed; snapshots go to `dir/results.jsonl`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(RESULTS_FILE),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResultsSink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn append(&self, snapshot: &Snapshot) -> Result<()> {
        let mut line = serde_json::to_vec(snapshot)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        info!(path = %self.path.display(), "snapshot appended to results file");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Snapshot>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut snapshots = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Snapshot>(line) {
                Ok(s) => snapshots.push(s),
                Err(e) => warn!(line = lineno + 1, error = %e, "skipping malformed results line"),
            }
        }
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dagform_common::{Dependency, Owner};

    fn snapshot(name: &str) -> Snapshot {
        let owner = Owner {
            name: name.to_string(),
            position: "Analyst".to_string(),
            email: format!("{}@example.org", name.to_lowercase()),
        };
        Snapshot::new(
            &owner,
            vec!["A".into(), "B".into()],
            vec![Dependency::new("A", "B")],
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_missing_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path()).unwrap();
        assert!(sink.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_appends_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("nested")).unwrap();

        sink.append(&snapshot("Ada")).await.unwrap();
        sink.append(&snapshot("Grace")).await.unwrap();

        let names: Vec<_> = sink.list().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Ada", "Grace"]);

        let raw = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.contains("\"timestamp\":\"20240501_093000\""));
    }

    #[tokio::test]
    async fn test_malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path()).unwrap();
        sink.append(&snapshot("Ada")).await.unwrap();

        let mut raw = std::fs::read_to_string(sink.path()).unwrap();
        raw.push_str("{not json}\n");
        std::fs::write(sink.path(), raw).unwrap();
        sink.append(&snapshot("Grace")).await.unwrap();

        assert_eq!(sink.list().await.unwrap().len(), 2);
    }
}
