//! Built-in listeners
//!
//! One default listener per kind. The decision listener is the heart of the
//! instrumentation: it pairs before/after events through the correlator and
//! emits the evaluation-time histogram and failure counter. The remaining
//! kinds keep small counters.

use crate::container::ContainerInstance;
use crate::event::{
    AfterDecisionEvent, BeforeDecisionEvent, DeploymentEvent, JobEvent, RuleMatchEvent,
    SolverPhaseEvent,
};
use crate::listener::correlator::MetricsCorrelator;
use crate::listener::{
    AgendaEventListener, AsyncJobListener, DecisionEventListener, DeploymentListener,
    SolverPhaseListener,
};
use crate::metrics::RuntimeMetrics;
use std::sync::Arc;
use tracing::debug;

/// Built-in decision listener: evaluation timing and failure metrics
pub struct DecisionMetricsListener {
    metrics: Arc<RuntimeMetrics>,
    container: Arc<ContainerInstance>,
    correlator: MetricsCorrelator,
}

impl DecisionMetricsListener {
    pub fn new(metrics: Arc<RuntimeMetrics>, container: Arc<ContainerInstance>) -> Self {
        Self {
            metrics,
            container,
            correlator: MetricsCorrelator::new(),
        }
    }
}

impl DecisionEventListener for DecisionMetricsListener {
    fn before_decision(&self, event: &BeforeDecisionEvent) {
        self.correlator.opened(event);
    }

    fn after_decision(&self, event: &AfterDecisionEvent) {
        let elapsed = match self.correlator.closed(event) {
            Some(elapsed) => elapsed,
            None => return,
        };

        let decision = event.before().decision();
        self.metrics
            .observe_evaluation(&self.container, decision, elapsed);

        let failed = event
            .result_for(&decision.id)
            .map(|result| result.has_errors())
            .unwrap_or(false);
        if failed {
            self.metrics
                .record_evaluation_failure(&self.container, decision);
        }

        debug!(
            decision = %decision.name,
            elapsed_ns = elapsed.as_nanos() as u64,
            "decision evaluated"
        );
    }

    fn evaluation_completed(&self) {
        // Leftover frames are an engine contract violation; the correlator
        // logs them. Clearing keeps this cached listener correct for the
        // next call on the same session.
        self.correlator.completed();
    }
}

/// Built-in agenda listener: counts fired rule matches
pub struct AgendaMetricsListener {
    metrics: Arc<RuntimeMetrics>,
    container: Arc<ContainerInstance>,
}

impl AgendaMetricsListener {
    pub fn new(metrics: Arc<RuntimeMetrics>, container: Arc<ContainerInstance>) -> Self {
        Self { metrics, container }
    }
}

impl AgendaEventListener for AgendaMetricsListener {
    fn after_match_fired(&self, event: &RuleMatchEvent) {
        self.metrics
            .record_rule_fired(&self.container, &event.rule_name);
    }
}

/// Built-in solver listener: counts phase transitions
pub struct SolverMetricsListener {
    metrics: Arc<RuntimeMetrics>,
}

impl SolverMetricsListener {
    pub fn new(metrics: Arc<RuntimeMetrics>) -> Self {
        Self { metrics }
    }
}

impl SolverPhaseListener for SolverMetricsListener {
    fn phase_started(&self, event: &SolverPhaseEvent) {
        self.metrics
            .record_solver_phase(&event.solver_id, &event.phase, "started");
    }

    fn phase_ended(&self, event: &SolverPhaseEvent) {
        self.metrics
            .record_solver_phase(&event.solver_id, &event.phase, "ended");
    }
}

/// Built-in job listener: counts job lifecycle events
pub struct JobMetricsListener {
    metrics: Arc<RuntimeMetrics>,
}

impl JobMetricsListener {
    pub fn new(metrics: Arc<RuntimeMetrics>) -> Self {
        Self { metrics }
    }
}

impl AsyncJobListener for JobMetricsListener {
    fn job_scheduled(&self, event: &JobEvent) {
        self.metrics.record_job_event(&event.job_type, "scheduled");
    }

    fn job_executed(&self, event: &JobEvent) {
        self.metrics.record_job_event(&event.job_type, "executed");
    }

    fn job_cancelled(&self, event: &JobEvent) {
        self.metrics.record_job_event(&event.job_type, "cancelled");
    }
}

/// Built-in deployment listener: counts deployment lifecycle events
pub struct DeploymentMetricsListener {
    metrics: Arc<RuntimeMetrics>,
}

impl DeploymentMetricsListener {
    pub fn new(metrics: Arc<RuntimeMetrics>) -> Self {
        Self { metrics }
    }
}

impl DeploymentListener for DeploymentMetricsListener {
    fn deployed(&self, _event: &DeploymentEvent) {
        self.metrics.record_deployment_event("deployed");
    }

    fn undeployed(&self, _event: &DeploymentEvent) {
        self.metrics.record_deployment_event("undeployed");
    }
}
