//! A single form-filling session: who is answering, and the graph built so far.

use chrono::{DateTime, Utc};
use dagform_common::{Dependency, Owner, Snapshot};
use dagform_graph::{AddOutcome, DependencyGraph, GraphRenderer, RenderedImage};
use uuid::Uuid;

use crate::error::{Result, SessionError};

/// Outcome of an add attempt plus the image of the graph afterwards
/// (the unmodified graph when the edge was rolled back).
#[derive(Debug, Clone)]
pub struct EdgeUpdate {
    pub outcome: AddOutcome,
    pub image: RenderedImage,
}

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    owner: Owner,
    graph: DependencyGraph,
    created_at: DateTime<Utc>,
    saved_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(id: Uuid, owner: Owner) -> Self {
        Self {
            id,
            owner,
            graph: DependencyGraph::new(),
            created_at: Utc::now(),
            saved_at: None,
        }
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn owner(&self) -> &Owner { &self.owner }
    pub fn graph(&self) -> &DependencyGraph { &self.graph }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn saved_at(&self) -> Option<DateTime<Utc>> { self.saved_at }

    pub fn is_saved(&self) -> bool {
        self.saved_at.is_some()
    }

    /// Replace the variable set; all previous dependencies are dropped.
    pub fn set_variables(&mut self, variables: Vec<String>) -> Result<()> {
        self.ensure_editable()?;
        self.graph.set_variables(variables)?;
        Ok(())
    }

    pub fn candidate_pairs(&self) -> Vec<Dependency> {
        self.graph.candidate_pairs()
    }

    pub fn add_dependency(
        &mut self,
        source: &str,
        target: &str,
        renderer: &dyn GraphRenderer,
    ) -> Result<EdgeUpdate> {
        self.ensure_editable()?;
        let outcome = self.graph.add_dependency(source, target)?;
        Ok(EdgeUpdate { outcome, image: renderer.render(&self.graph) })
    }

    pub fn remove_dependency(
        &mut self,
        source: &str,
        target: &str,
        renderer: &dyn GraphRenderer,
    ) -> Result<RenderedImage> {
        self.ensure_editable()?;
        self.graph.remove_dependency(source, target)?;
        Ok(renderer.render(&self.graph))
    }

    pub fn current_image(&self, renderer: &dyn GraphRenderer) -> RenderedImage {
        renderer.render(&self.graph)
    }

    pub fn snapshot(&self, at: DateTime<Utc>) -> Snapshot {
        Snapshot::new(
            &self.owner,
            self.graph.variables().to_vec(),
            self.graph.dependencies().to_vec(),
            at,
        )
    }

    /// Freeze the session after its snapshot reached the sink.
    pub fn mark_saved(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.ensure_editable()?;
        self.saved_at = Some(at);
        Ok(())
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.is_saved() {
            return Err(SessionError::AlreadySaved(self.id.to_string()));
        }
        Ok(())
    }
}
