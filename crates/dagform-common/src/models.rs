/// Core data types shared by the graph engine, the session store and the results sink.
/// These are also the wire shapes of the JSON API and of persisted snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout written into every persisted snapshot.
pub const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ---------------------------------------------------------------------------
// Dependency
// ---------------------------------------------------------------------------

/// A directed "source affects target" pair between two session variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub source: String,
    pub target: String,
}

impl Dependency {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self { source: source.into(), target: target.into() }
    }

    pub fn matches(&self, source: &str, target: &str) -> bool {
        self.source == source && self.target == target
    }
}

// ---------------------------------------------------------------------------
// Owner
// ---------------------------------------------------------------------------

/// The person filling in the form. Fields are opaque, only presence is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub position: String,
    pub email: String,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Immutable record appended to the results sink when a session is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: String,
    pub name: String,
    pub position: String,
    pub email: String,
    pub variables: Vec<String>,
    pub dependencies: Vec<Dependency>,
}

impl Snapshot {
    pub fn new(
        owner: &Owner,
        variables: Vec<String>,
        dependencies: Vec<Dependency>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp: at.format(SNAPSHOT_TIMESTAMP_FORMAT).to_string(),
            name: owner.name.clone(),
            position: owner.position.clone(),
            email: owner.email.clone(),
            variables,
            dependencies,
        }
    }
}
