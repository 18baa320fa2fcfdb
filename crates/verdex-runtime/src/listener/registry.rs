//! Process-wide listener registry
//!
//! Maps (listener kind, scope key) to an immutable, already-merged listener
//! list. The first request for a key constructs the list (the built-in
//! listener for that kind followed by every provider's listener); every
//! later request returns the same list, so re-attaching on the same scope
//! never duplicates listeners or metric observations. Construction happens
//! at most once per key, including under concurrent first access.
//!
//! Session- and solver-scoped caches are size-bounded: once the capacity is
//! reached the oldest key is evicted. Job and deployment listeners are
//! process-wide and live for the process lifetime.

use crate::container::ContainerInstance;
use crate::listener::builtin::{
    AgendaMetricsListener, DecisionMetricsListener, DeploymentMetricsListener, JobMetricsListener,
    SolverMetricsListener,
};
use crate::listener::{
    AgendaEventListener, AgendaListeners, AsyncJobListener, DecisionEventListener,
    DecisionListeners, DeploymentListener, DeploymentListeners, JobListeners, ListenerProvider,
    PhaseListeners, SolverPhaseListener,
};
use crate::metrics::RuntimeMetrics;
use crate::session::SessionId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Default bound on cached scope keys per kind
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Size-bounded lookup-or-create cache for one listener kind
struct ScopedCache<L: ?Sized> {
    entries: DashMap<String, Arc<Vec<Arc<L>>>>,
    order: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl<L: ?Sized> ScopedCache<L> {
    fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// Return the cached list for `key`, constructing it at most once
    fn get_or_build<F>(&self, key: &str, build: F) -> Arc<Vec<Arc<L>>>
    where
        F: FnOnce() -> Vec<Arc<L>>,
    {
        if let Some(existing) = self.entries.get(key) {
            return existing.value().clone();
        }

        // The vacant entry holds its shard locked, so a concurrent first
        // access for the same key waits here instead of building twice.
        let (list, inserted) = match self.entries.entry(key.to_string()) {
            Entry::Occupied(entry) => (entry.get().clone(), false),
            Entry::Vacant(entry) => {
                let list = Arc::new(build());
                entry.insert(list.clone());
                (list, true)
            }
        };

        if inserted {
            let evicted = {
                let mut order = self.order.lock().unwrap();
                order.push_back(key.to_string());
                let mut evicted = Vec::new();
                while order.len() > self.capacity {
                    if let Some(oldest) = order.pop_front() {
                        evicted.push(oldest);
                    }
                }
                evicted
            };
            for oldest in evicted {
                self.entries.remove(&oldest);
                debug!(scope = %oldest, "evicted listener scope");
            }
        }

        list
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Process-wide cache of merged listener lists
pub struct ListenerRegistry {
    metrics: Arc<RuntimeMetrics>,
    providers: Vec<Arc<dyn ListenerProvider>>,
    decision: ScopedCache<dyn DecisionEventListener>,
    agenda: ScopedCache<dyn AgendaEventListener>,
    phase: ScopedCache<dyn SolverPhaseListener>,
    job: OnceCell<JobListeners>,
    deployment: OnceCell<DeploymentListeners>,
}

impl ListenerRegistry {
    /// Create a registry with the given providers and scope-cache capacity
    pub fn new(
        metrics: Arc<RuntimeMetrics>,
        providers: Vec<Arc<dyn ListenerProvider>>,
        capacity: usize,
    ) -> Self {
        Self {
            metrics,
            providers,
            decision: ScopedCache::new(capacity),
            agenda: ScopedCache::new(capacity),
            phase: ScopedCache::new(capacity),
            job: OnceCell::new(),
            deployment: OnceCell::new(),
        }
    }

    /// Decision listeners for one session
    pub fn decision_listeners(
        &self,
        session_id: &SessionId,
        container: &Arc<ContainerInstance>,
    ) -> DecisionListeners {
        self.decision.get_or_build(&session_id.to_string(), || {
            let mut listeners: Vec<Arc<dyn DecisionEventListener>> = vec![Arc::new(
                DecisionMetricsListener::new(self.metrics.clone(), container.clone()),
            )];
            for provider in &self.providers {
                if let Some(listener) = provider.decision_listener(session_id, container) {
                    listeners.push(listener);
                }
            }
            listeners
        })
    }

    /// Agenda listeners for one rule session
    pub fn agenda_listeners(
        &self,
        session_id: &SessionId,
        container: &Arc<ContainerInstance>,
    ) -> AgendaListeners {
        self.agenda.get_or_build(&session_id.to_string(), || {
            let mut listeners: Vec<Arc<dyn AgendaEventListener>> = vec![Arc::new(
                AgendaMetricsListener::new(self.metrics.clone(), container.clone()),
            )];
            for provider in &self.providers {
                if let Some(listener) = provider.agenda_listener(session_id, container) {
                    listeners.push(listener);
                }
            }
            listeners
        })
    }

    /// Phase listeners for one solver
    pub fn phase_listeners(&self, solver_id: &str) -> PhaseListeners {
        self.phase.get_or_build(solver_id, || {
            let mut listeners: Vec<Arc<dyn SolverPhaseListener>> =
                vec![Arc::new(SolverMetricsListener::new(self.metrics.clone()))];
            for provider in &self.providers {
                if let Some(listener) = provider.phase_listener(solver_id) {
                    listeners.push(listener);
                }
            }
            listeners
        })
    }

    /// Process-wide asynchronous job listeners
    pub fn job_listeners(&self) -> JobListeners {
        self.job
            .get_or_init(|| {
                let mut listeners: Vec<Arc<dyn AsyncJobListener>> =
                    vec![Arc::new(JobMetricsListener::new(self.metrics.clone()))];
                for provider in &self.providers {
                    if let Some(listener) = provider.job_listener() {
                        listeners.push(listener);
                    }
                }
                Arc::new(listeners)
            })
            .clone()
    }

    /// Process-wide deployment listeners
    pub fn deployment_listeners(&self) -> DeploymentListeners {
        self.deployment
            .get_or_init(|| {
                let mut listeners: Vec<Arc<dyn DeploymentListener>> = vec![Arc::new(
                    DeploymentMetricsListener::new(self.metrics.clone()),
                )];
                for provider in &self.providers {
                    if let Some(listener) = provider.deployment_listener() {
                        listeners.push(listener);
                    }
                }
                Arc::new(listeners)
            })
            .clone()
    }

    /// Number of cached decision scopes (bounded by the capacity)
    pub fn cached_decision_scopes(&self) -> usize {
        self.decision.len()
    }
}
