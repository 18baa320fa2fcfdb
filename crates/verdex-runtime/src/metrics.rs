//! Prometheus metric vectors backing the built-in listeners

use crate::container::ContainerInstance;
use crate::error::Result;
use crate::event::DecisionHandle;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use std::time::Duration;

/// Histogram buckets for decision evaluation time, in nanoseconds
/// (1ms .. 60s)
const EVALUATION_TIME_BUCKETS: &[f64] = &[
    1e6, 2e6, 5e6, 1e7, 2e7, 5e7, 1e8, 2e8, 5e8, 1e9, 2e9, 5e9, 1e10, 3e10, 6e10,
];

const EVALUATION_LABELS: &[&str] = &[
    "container_id",
    "group_id",
    "artifact_id",
    "version",
    "model_name",
    "model_namespace",
];

/// Metric vectors emitted by the built-in listeners
///
/// Registered against the registry supplied by the embedder, so scraping
/// stays the embedder's concern and tests can use isolated registries.
pub struct RuntimeMetrics {
    evaluation_time: HistogramVec,
    evaluation_failures: IntCounterVec,
    rule_firings: IntCounterVec,
    solver_phases: IntCounterVec,
    jobs: IntCounterVec,
    deployments: IntCounterVec,
}

impl RuntimeMetrics {
    /// Create the metric vectors and register them
    pub fn new(registry: &Registry) -> Result<Self> {
        let evaluation_time = HistogramVec::new(
            HistogramOpts::new(
                "decision_evaluation_time_nanoseconds",
                "Time of individual decision evaluations in nanoseconds",
            )
            .buckets(EVALUATION_TIME_BUCKETS.to_vec()),
            EVALUATION_LABELS,
        )?;
        let evaluation_failures = IntCounterVec::new(
            Opts::new(
                "decision_evaluation_failures_total",
                "Decision evaluations that ended in an error state",
            ),
            EVALUATION_LABELS,
        )?;
        let rule_firings = IntCounterVec::new(
            Opts::new("rule_firings_total", "Rule matches fired per rule"),
            &["container_id", "rule_name"],
        )?;
        let solver_phases = IntCounterVec::new(
            Opts::new(
                "solver_phase_transitions_total",
                "Solver phase transitions per solver",
            ),
            &["solver_id", "phase", "transition"],
        )?;
        let jobs = IntCounterVec::new(
            Opts::new("async_jobs_total", "Asynchronous job lifecycle events"),
            &["job_type", "event"],
        )?;
        let deployments = IntCounterVec::new(
            Opts::new("deployments_total", "Deployment lifecycle events"),
            &["event"],
        )?;

        registry.register(Box::new(evaluation_time.clone()))?;
        registry.register(Box::new(evaluation_failures.clone()))?;
        registry.register(Box::new(rule_firings.clone()))?;
        registry.register(Box::new(solver_phases.clone()))?;
        registry.register(Box::new(jobs.clone()))?;
        registry.register(Box::new(deployments.clone()))?;

        Ok(Self {
            evaluation_time,
            evaluation_failures,
            rule_firings,
            solver_phases,
            jobs,
            deployments,
        })
    }

    fn evaluation_labels<'a>(
        container: &'a ContainerInstance,
        decision: &'a DecisionHandle,
    ) -> [&'a str; 6] {
        let release = container.release();
        [
            container.container_id(),
            &release.group_id,
            &release.artifact_id,
            &release.version,
            &decision.model_name,
            &decision.model_namespace,
        ]
    }

    /// Record the elapsed time of one decision evaluation
    pub fn observe_evaluation(
        &self,
        container: &ContainerInstance,
        decision: &DecisionHandle,
        elapsed: Duration,
    ) {
        self.evaluation_time
            .with_label_values(&Self::evaluation_labels(container, decision))
            .observe(elapsed.as_nanos() as f64);
    }

    /// Count one failed decision evaluation
    pub fn record_evaluation_failure(
        &self,
        container: &ContainerInstance,
        decision: &DecisionHandle,
    ) {
        self.evaluation_failures
            .with_label_values(&Self::evaluation_labels(container, decision))
            .inc();
    }

    /// Count one fired rule match
    pub fn record_rule_fired(&self, container: &ContainerInstance, rule_name: &str) {
        self.rule_firings
            .with_label_values(&[container.container_id(), rule_name])
            .inc();
    }

    /// Count one solver phase transition
    pub fn record_solver_phase(&self, solver_id: &str, phase: &str, transition: &str) {
        self.solver_phases
            .with_label_values(&[solver_id, phase, transition])
            .inc();
    }

    /// Count one asynchronous job lifecycle event
    pub fn record_job_event(&self, job_type: &str, event: &str) {
        self.jobs.with_label_values(&[job_type, event]).inc();
    }

    /// Count one deployment lifecycle event
    pub fn record_deployment_event(&self, event: &str) {
        self.deployments.with_label_values(&[event]).inc();
    }

    /// The evaluation-time histogram, for inspection and tests
    pub fn evaluation_time(&self) -> &HistogramVec {
        &self.evaluation_time
    }

    /// The evaluation-failure counter, for inspection and tests
    pub fn evaluation_failures(&self) -> &IntCounterVec {
        &self.evaluation_failures
    }

    /// The rule-firing counter, for inspection and tests
    pub fn rule_firings(&self) -> &IntCounterVec {
        &self.rule_firings
    }

    /// The solver-phase counter, for inspection and tests
    pub fn solver_phases(&self) -> &IntCounterVec {
        &self.solver_phases
    }

    /// The async-job counter, for inspection and tests
    pub fn jobs(&self) -> &IntCounterVec {
        &self.jobs
    }

    /// The deployment counter, for inspection and tests
    pub fn deployments(&self) -> &IntCounterVec {
        &self.deployments
    }
}
