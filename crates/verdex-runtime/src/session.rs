//! Session lifecycle
//!
//! A session is an ephemeral execution handle scoped to exactly one
//! dispatch call. It owns the engine runtime it was opened with and
//! releases it when dropped, so release happens on every exit path of the
//! calling operation.

use crate::container::ContainerInstance;
use crate::engine::DecisionRuntime;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Unique id of one session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Acquire/release counters of a container's sessions
///
/// Shared between a container and its sessions so callers can observe that
/// every acquired session was released.
#[derive(Debug, Default)]
pub struct SessionTracker {
    acquired: AtomicU64,
    released: AtomicU64,
}

impl SessionTracker {
    pub(crate) fn mark_acquired(&self) {
        self.acquired.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn mark_released(&self) {
        self.released.fetch_add(1, Ordering::Relaxed);
    }

    /// Sessions acquired so far
    pub fn acquired(&self) -> u64 {
        self.acquired.load(Ordering::Relaxed)
    }

    /// Sessions released so far
    pub fn released(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }

    /// Sessions currently alive
    pub fn active(&self) -> u64 {
        self.acquired() - self.released()
    }
}

/// An execution session scoped to one dispatch call
///
/// Exclusively owned by the call that opened it; never shared across
/// requests, never retained past the call. Dropping the session disposes
/// the engine runtime exactly once.
pub struct Session {
    id: SessionId,
    container: Arc<ContainerInstance>,
    runtime: Box<dyn DecisionRuntime>,
}

impl Session {
    pub(crate) fn new(
        container: Arc<ContainerInstance>,
        runtime: Box<dyn DecisionRuntime>,
    ) -> Self {
        let id = SessionId::new();
        container.sessions().mark_acquired();
        debug!(session = %id, container = container.container_id(), "session acquired");
        Self {
            id,
            container,
            runtime,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn container(&self) -> &Arc<ContainerInstance> {
        &self.container
    }

    /// The engine runtime handle scoped to this session
    pub fn runtime(&self) -> &dyn DecisionRuntime {
        self.runtime.as_ref()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.runtime.dispose();
        self.container.sessions().mark_released();
        debug!(session = %self.id, container = self.container.container_id(), "session released");
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("container", &self.container.container_id())
            .finish()
    }
}
