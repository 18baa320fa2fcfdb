//! External decision-engine contracts
//!
//! The engine's evaluation algorithm is an external collaborator. This
//! module defines the seams it must satisfy: a backend that opens one
//! runtime handle per session, and the runtime operations a dispatch call
//! invokes on it. During evaluation the engine emits before/after events to
//! the supplied listeners, depth-first, on the calling thread.

use crate::error::Result;
use crate::listener::DecisionEventListener;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use verdex_core::{DecisionModel, EvaluationContext, EvaluationResult};

/// Engine-side backend of one deployed container
pub trait DecisionBackend: Send + Sync {
    /// Open a fresh runtime handle scoped to one session
    fn open_runtime(&self) -> Result<Box<dyn DecisionRuntime>>;
}

/// Engine runtime handle scoped to one session
pub trait DecisionRuntime: Send {
    /// Snapshot of the models currently loaded in this runtime
    fn models(&self) -> Vec<DecisionModel>;

    /// Evaluate the requested selection against the supplied input
    ///
    /// The engine emits before/after decision events to `listeners` while
    /// it evaluates; nested decision evaluations nest their events inside
    /// the enclosing pair.
    fn evaluate(
        &self,
        request: &EvaluationRequest,
        listeners: &[Arc<dyn DecisionEventListener>],
    ) -> Result<EvaluationResult>;

    /// Release engine-side resources; invoked exactly once when the owning
    /// session is dropped
    fn dispose(&mut self) {}
}

/// The selection handed to the engine, verbatim from the caller's context
///
/// Precedence among the three selection forms is the engine's own policy;
/// this type exists so nothing between the caller and the engine reorders
/// or interprets them.
#[derive(Debug, Clone, Default)]
pub struct EvaluationRequest {
    pub model_namespace: Option<String>,
    pub model_name: Option<String>,
    pub input: HashMap<String, Value>,
    pub decision_names: Vec<String>,
    pub decision_ids: Vec<String>,
    pub decision_service_name: Option<String>,
}

impl From<EvaluationContext> for EvaluationRequest {
    fn from(context: EvaluationContext) -> Self {
        Self {
            model_namespace: context.model_namespace,
            model_name: context.model_name,
            input: context.input,
            decision_names: context.decision_names,
            decision_ids: context.decision_ids,
            decision_service_name: context.decision_service_name,
        }
    }
}
