use async_trait::async_trait;
use dagform_common::Snapshot;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::ResultsSink;

/// In-process sink. Contents are lost on restart.
#[derive(Default)]
pub struct MemorySink {
    snapshots: Mutex<Vec<Snapshot>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.snapshots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ResultsSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn append(&self, snapshot: &Snapshot) -> Result<()> {
        self.snapshots.lock().await.push(snapshot.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Snapshot>> {
        Ok(self.snapshots.lock().await.clone())
    }
}
