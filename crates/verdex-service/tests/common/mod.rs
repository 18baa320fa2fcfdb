//! Common test utilities for service integration tests

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use verdex_core::{
    DecisionModel, DecisionNode, DecisionResult, DecisionServiceNode, EvaluationResult, InputNode,
    ReleaseId,
};
use verdex_runtime::{
    AfterDecisionEvent, BeforeDecisionEvent, ContainerInstance, DecisionBackend,
    DecisionEventListener, DecisionHandle, DecisionRuntime, EvaluationRequest, ListenerProvider,
    Result as RuntimeResult, RuntimeError, SessionId,
};
use verdex_service::ModelEvaluatorService;

pub type DecisionFn = Arc<dyn Fn(&HashMap<String, Value>) -> Result<Value, String> + Send + Sync>;

/// One decision of a scripted model
pub struct ScriptedDecision {
    pub id: String,
    pub name: String,
    pub work: Duration,
    pub depends_on: Vec<String>,
    pub eval: DecisionFn,
}

impl ScriptedDecision {
    /// A decision that always yields the same value
    pub fn returning(id: &str, name: &str, value: Value) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            work: Duration::ZERO,
            depends_on: Vec::new(),
            eval: Arc::new(move |_| Ok(value.clone())),
        }
    }

    /// A decision computed from the input variables
    pub fn computed<F>(id: &str, name: &str, eval: F) -> Self
    where
        F: Fn(&HashMap<String, Value>) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            work: Duration::ZERO,
            depends_on: Vec::new(),
            eval: Arc::new(eval),
        }
    }

    /// A decision whose evaluation always fails
    pub fn failing(id: &str, name: &str, message: &str) -> Self {
        let message = message.to_string();
        Self {
            id: id.to_string(),
            name: name.to_string(),
            work: Duration::ZERO,
            depends_on: Vec::new(),
            eval: Arc::new(move |_| Err(message.clone())),
        }
    }

    /// Synthetic evaluation time of this decision's own work
    pub fn with_work(mut self, work: Duration) -> Self {
        self.work = work;
        self
    }

    /// Evaluate another decision inside this one's evaluation
    pub fn depends_on(mut self, id: &str) -> Self {
        self.depends_on.push(id.to_string());
        self
    }
}

struct Script {
    model: DecisionModel,
    decisions: Vec<ScriptedDecision>,
}

impl Script {
    fn decision_by_id(&self, id: &str) -> Option<&ScriptedDecision> {
        self.decisions.iter().find(|d| d.id == id)
    }

    fn decision_by_name(&self, name: &str) -> Option<&ScriptedDecision> {
        self.decisions.iter().find(|d| d.name == name)
    }
}

/// Engine backend driven by a scripted model
///
/// Evaluation is single-threaded and depth-first: a decision's dependencies
/// are evaluated inside its own before/after pair, the way a real engine
/// resolves requirements. Selection policy (local to this stub): decision
/// names win over decision ids, ids win over "evaluate all".
pub struct ScriptedBackend {
    script: Arc<Script>,
}

impl ScriptedBackend {
    pub fn new(model: DecisionModel, decisions: Vec<ScriptedDecision>) -> Self {
        Self {
            script: Arc::new(Script { model, decisions }),
        }
    }
}

impl DecisionBackend for ScriptedBackend {
    fn open_runtime(&self) -> RuntimeResult<Box<dyn DecisionRuntime>> {
        Ok(Box::new(ScriptedRuntime {
            script: self.script.clone(),
        }))
    }
}

struct ScriptedRuntime {
    script: Arc<Script>,
}

impl ScriptedRuntime {
    fn evaluate_decision(
        &self,
        decision: &ScriptedDecision,
        request: &EvaluationRequest,
        listeners: &[Arc<dyn DecisionEventListener>],
        results: &mut Vec<DecisionResult>,
    ) {
        if results.iter().any(|r| r.decision_id == decision.id) {
            return;
        }

        let model = &self.script.model;
        let before = Arc::new(BeforeDecisionEvent::new(DecisionHandle::new(
            decision.id.clone(),
            decision.name.clone(),
            model.name.clone(),
            model.namespace.clone(),
        )));
        for listener in listeners {
            listener.before_decision(&before);
        }

        for dep_id in &decision.depends_on {
            if let Some(dep) = self.script.decision_by_id(dep_id) {
                self.evaluate_decision(dep, request, listeners, results);
            }
        }

        if !decision.work.is_zero() {
            thread::sleep(decision.work);
        }

        let result = match (decision.eval)(&request.input) {
            Ok(value) => DecisionResult::succeeded(decision.id.clone(), decision.name.clone(), value),
            Err(message) => {
                DecisionResult::failed(decision.id.clone(), decision.name.clone(), message)
            }
        };
        results.push(result);

        let after = AfterDecisionEvent::new(before, results.clone());
        for listener in listeners {
            listener.after_decision(&after);
        }
    }
}

impl DecisionRuntime for ScriptedRuntime {
    fn models(&self) -> Vec<DecisionModel> {
        vec![self.script.model.clone()]
    }

    fn evaluate(
        &self,
        request: &EvaluationRequest,
        listeners: &[Arc<dyn DecisionEventListener>],
    ) -> RuntimeResult<EvaluationResult> {
        let selected: Vec<&ScriptedDecision> = if !request.decision_names.is_empty() {
            request
                .decision_names
                .iter()
                .map(|name| {
                    self.script
                        .decision_by_name(name)
                        .ok_or_else(|| RuntimeError::EngineEvaluation(format!(
                            "unknown decision: {}",
                            name
                        )))
                })
                .collect::<RuntimeResult<Vec<_>>>()?
        } else if !request.decision_ids.is_empty() {
            request
                .decision_ids
                .iter()
                .map(|id| {
                    self.script
                        .decision_by_id(id)
                        .ok_or_else(|| RuntimeError::EngineEvaluation(format!(
                            "unknown decision id: {}",
                            id
                        )))
                })
                .collect::<RuntimeResult<Vec<_>>>()?
        } else {
            self.script.decisions.iter().collect()
        };

        let mut results = Vec::new();
        for decision in selected {
            self.evaluate_decision(decision, request, listeners, &mut results);
        }

        Ok(EvaluationResult {
            model_namespace: self.script.model.namespace.clone(),
            model_name: self.script.model.name.clone(),
            results,
        })
    }
}

/// Backend whose runtime always fails to evaluate
pub struct ErroringBackend;

impl DecisionBackend for ErroringBackend {
    fn open_runtime(&self) -> RuntimeResult<Box<dyn DecisionRuntime>> {
        Ok(Box::new(ErroringRuntime))
    }
}

struct ErroringRuntime;

impl DecisionRuntime for ErroringRuntime {
    fn models(&self) -> Vec<DecisionModel> {
        Vec::new()
    }

    fn evaluate(
        &self,
        _request: &EvaluationRequest,
        _listeners: &[Arc<dyn DecisionEventListener>],
    ) -> RuntimeResult<EvaluationResult> {
        Err(RuntimeError::EngineEvaluation("engine exploded".to_string()))
    }
}

/// Backend whose runtime opens a decision evaluation and never closes it
pub struct UnmatchedBeforeBackend {
    model: DecisionModel,
}

impl UnmatchedBeforeBackend {
    pub fn new(model: DecisionModel) -> Self {
        Self { model }
    }
}

impl DecisionBackend for UnmatchedBeforeBackend {
    fn open_runtime(&self) -> RuntimeResult<Box<dyn DecisionRuntime>> {
        Ok(Box::new(UnmatchedBeforeRuntime {
            model: self.model.clone(),
        }))
    }
}

struct UnmatchedBeforeRuntime {
    model: DecisionModel,
}

impl DecisionRuntime for UnmatchedBeforeRuntime {
    fn models(&self) -> Vec<DecisionModel> {
        vec![self.model.clone()]
    }

    fn evaluate(
        &self,
        _request: &EvaluationRequest,
        listeners: &[Arc<dyn DecisionEventListener>],
    ) -> RuntimeResult<EvaluationResult> {
        let before = Arc::new(BeforeDecisionEvent::new(DecisionHandle::new(
            "ghost",
            "Ghost",
            self.model.name.clone(),
            self.model.namespace.clone(),
        )));
        for listener in listeners {
            listener.before_decision(&before);
        }
        // No after-event: the dispatcher's completion hook has to clean up.
        Ok(EvaluationResult {
            model_namespace: self.model.namespace.clone(),
            model_name: self.model.name.clone(),
            results: Vec::new(),
        })
    }
}

/// Backend that records every request its runtimes were asked to evaluate
pub struct CapturingBackend {
    pub seen: Arc<Mutex<Vec<EvaluationRequest>>>,
    model: DecisionModel,
}

impl CapturingBackend {
    pub fn new(model: DecisionModel) -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
            model,
        }
    }
}

impl DecisionBackend for CapturingBackend {
    fn open_runtime(&self) -> RuntimeResult<Box<dyn DecisionRuntime>> {
        Ok(Box::new(CapturingRuntime {
            seen: self.seen.clone(),
            model: self.model.clone(),
        }))
    }
}

struct CapturingRuntime {
    seen: Arc<Mutex<Vec<EvaluationRequest>>>,
    model: DecisionModel,
}

impl DecisionRuntime for CapturingRuntime {
    fn models(&self) -> Vec<DecisionModel> {
        vec![self.model.clone()]
    }

    fn evaluate(
        &self,
        request: &EvaluationRequest,
        _listeners: &[Arc<dyn DecisionEventListener>],
    ) -> RuntimeResult<EvaluationResult> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(EvaluationResult {
            model_namespace: self.model.namespace.clone(),
            model_name: self.model.name.clone(),
            results: Vec::new(),
        })
    }
}

/// Listener that counts the callbacks it receives
#[derive(Default)]
pub struct RecordingListener {
    pub before_count: AtomicUsize,
    pub after_count: AtomicUsize,
    pub completed_count: AtomicUsize,
}

impl DecisionEventListener for RecordingListener {
    fn before_decision(&self, _event: &BeforeDecisionEvent) {
        self.before_count.fetch_add(1, Ordering::SeqCst);
    }

    fn after_decision(&self, _event: &AfterDecisionEvent) {
        self.after_count.fetch_add(1, Ordering::SeqCst);
    }

    fn evaluation_completed(&self) {
        self.completed_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Provider handing out one shared recording listener
pub struct RecordingProvider {
    pub listener: Arc<RecordingListener>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self {
            listener: Arc::new(RecordingListener::default()),
        }
    }
}

impl ListenerProvider for RecordingProvider {
    fn decision_listener(
        &self,
        _session_id: &SessionId,
        _container: &Arc<ContainerInstance>,
    ) -> Option<Arc<dyn DecisionEventListener>> {
        Some(self.listener.clone())
    }
}

/// The driving model used by most evaluation tests
pub fn driving_model() -> DecisionModel {
    DecisionModel::new("https://acme.example/driving", "Driving", "defs-driving")
        .with_decision(DecisionNode::new("d1", "CanDrive"))
        .with_input(InputNode::new("i1", "Age"))
}

/// A `CanDrive` decision gated on the `Age` input
pub fn can_drive_backend() -> ScriptedBackend {
    ScriptedBackend::new(
        driving_model(),
        vec![ScriptedDecision::computed("d1", "CanDrive", |input| {
            let age = input
                .get("Age")
                .and_then(Value::as_f64)
                .ok_or_else(|| "required input missing: Age".to_string())?;
            Ok(json!(age >= 18.0))
        })],
    )
}

/// Register a container with the service under the given id and release
pub fn deploy(
    service: &ModelEvaluatorService,
    container_id: &str,
    release: ReleaseId,
    backend: impl DecisionBackend + 'static,
) -> Arc<ContainerInstance> {
    service.containers().register(ContainerInstance::new(
        container_id,
        release,
        Arc::new(backend),
    ))
}

/// A model with two decisions, three inputs and one decision service
pub fn catalog_model() -> DecisionModel {
    DecisionModel::new("https://acme.example/loans", "Loans", "defs-loans")
        .with_decision(DecisionNode::new("d1", "Approval"))
        .with_decision(DecisionNode::new("d2", "Risk Score"))
        .with_decision_service(DecisionServiceNode::new("ds1", "Scoring Service"))
        .with_input(InputNode::new("i1", "Applicant"))
        .with_input(InputNode::new("i2", "Amount"))
        .with_input(InputNode::new("i3", "Term"))
}
