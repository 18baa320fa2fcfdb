//! Engine event value objects
//!
//! Events are plain values. An after-event owns a reference to its paired
//! before-event, so the elapsed time of a decision evaluation is always
//! computed from the start instant of that specific pairing, at any nesting
//! depth. There is no shared "last start time" anywhere.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use verdex_core::DecisionResult;

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identity of a decision as seen by the event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionHandle {
    pub id: String,
    pub name: String,
    pub model_name: String,
    pub model_namespace: String,
}

impl DecisionHandle {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        model_name: impl Into<String>,
        model_namespace: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            model_name: model_name.into(),
            model_namespace: model_namespace.into(),
        }
    }
}

/// Emitted when a decision's evaluation starts
///
/// The start instant is stamped at construction; the token is unique for
/// the process lifetime and pairs this event with its after-event.
#[derive(Debug)]
pub struct BeforeDecisionEvent {
    token: u64,
    decision: DecisionHandle,
    started_at: Instant,
}

impl BeforeDecisionEvent {
    pub fn new(decision: DecisionHandle) -> Self {
        Self {
            token: NEXT_TOKEN.fetch_add(1, Ordering::Relaxed),
            decision,
            started_at: Instant::now(),
        }
    }

    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn decision(&self) -> &DecisionHandle {
        &self.decision
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

/// Emitted when a decision's evaluation ends
///
/// Carries the before-event it pairs with and the result set as of the end
/// of this decision's evaluation.
#[derive(Debug)]
pub struct AfterDecisionEvent {
    before: Arc<BeforeDecisionEvent>,
    results: Vec<DecisionResult>,
}

impl AfterDecisionEvent {
    pub fn new(before: Arc<BeforeDecisionEvent>, results: Vec<DecisionResult>) -> Self {
        Self { before, results }
    }

    pub fn before(&self) -> &BeforeDecisionEvent {
        &self.before
    }

    pub fn results(&self) -> &[DecisionResult] {
        &self.results
    }

    /// Look up a decision's result by id in the event's result set
    pub fn result_for(&self, decision_id: &str) -> Option<&DecisionResult> {
        self.results.iter().find(|r| r.decision_id == decision_id)
    }
}

/// Observation point: a context entry is being evaluated
#[derive(Debug, Clone)]
pub struct ContextEntryEvent {
    pub variable_name: String,
}

/// Observation point: a decision table is being evaluated
#[derive(Debug, Clone)]
pub struct DecisionTableEvent {
    pub name: String,
}

/// Observation point: a business-knowledge-model invocation
#[derive(Debug, Clone)]
pub struct InvocationEvent {
    pub name: String,
}

/// Observation point: a decision service is being evaluated
#[derive(Debug, Clone)]
pub struct DecisionServiceEvent {
    pub id: String,
    pub name: String,
}

/// A rule match in a rule session's agenda
#[derive(Debug, Clone)]
pub struct RuleMatchEvent {
    pub rule_name: String,
}

/// A solver phase transition
#[derive(Debug, Clone)]
pub struct SolverPhaseEvent {
    pub solver_id: String,
    pub phase: String,
}

/// An asynchronous job lifecycle event
#[derive(Debug, Clone)]
pub struct JobEvent {
    pub job_type: String,
}

/// A deployment lifecycle event
#[derive(Debug, Clone)]
pub struct DeploymentEvent {
    pub deployment_id: String,
}
