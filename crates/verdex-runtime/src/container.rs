//! Deployed container instances and the resolve-only registry
//!
//! Containers are deployed, versioned and owned externally. This module is
//! the read side a dispatch call needs: resolve an id to the instance, read
//! its release coordinates, open sessions against its engine backend.

use crate::engine::DecisionBackend;
use crate::error::{Result, RuntimeError};
use crate::session::{Session, SessionTracker};
use dashmap::DashMap;
use std::sync::Arc;
use verdex_core::ReleaseId;

/// One deployed container holding evaluable models
pub struct ContainerInstance {
    container_id: String,
    release: ReleaseId,
    backend: Arc<dyn DecisionBackend>,
    sessions: SessionTracker,
}

impl ContainerInstance {
    pub fn new(
        container_id: impl Into<String>,
        release: ReleaseId,
        backend: Arc<dyn DecisionBackend>,
    ) -> Self {
        Self {
            container_id: container_id.into(),
            release,
            backend,
            sessions: SessionTracker::default(),
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn release(&self) -> &ReleaseId {
        &self.release
    }

    /// This container's session acquire/release counters
    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    /// Open a fresh session against this container's engine backend
    pub fn open_session(self: &Arc<Self>) -> Result<Session> {
        let runtime = self
            .backend
            .open_runtime()
            .map_err(|e| RuntimeError::SessionCreation {
                container_id: self.container_id.clone(),
                reason: e.to_string(),
            })?;
        Ok(Session::new(self.clone(), runtime))
    }
}

impl std::fmt::Debug for ContainerInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerInstance")
            .field("container_id", &self.container_id)
            .field("release", &self.release)
            .finish()
    }
}

/// Registry of the containers currently deployed in this process
#[derive(Debug, Default)]
pub struct ContainerRegistry {
    containers: DashMap<String, Arc<ContainerInstance>>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a deployed container, replacing any previous deployment
    /// under the same id
    pub fn register(&self, container: ContainerInstance) -> Arc<ContainerInstance> {
        let container = Arc::new(container);
        self.containers
            .insert(container.container_id().to_string(), container.clone());
        container
    }

    /// Remove a container; returns the removed instance if it existed
    pub fn remove(&self, container_id: &str) -> Option<Arc<ContainerInstance>> {
        self.containers.remove(container_id).map(|(_, c)| c)
    }

    /// Resolve a container id to its deployed instance
    pub fn resolve(&self, container_id: &str) -> Result<Arc<ContainerInstance>> {
        self.containers
            .get(container_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RuntimeError::ContainerNotFound(container_id.to_string()))
    }
}
