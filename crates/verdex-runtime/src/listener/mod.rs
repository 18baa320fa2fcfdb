//! Listener contracts and the provider extension point
//!
//! Five listener kinds exist, each with a built-in default (see
//! [`builtin`]) and zero or more externally provided extensions. Every
//! callback has an empty default body so implementations only override the
//! observation points they care about.

pub mod builtin;
pub mod correlator;
pub mod registry;

use crate::container::ContainerInstance;
use crate::event::{
    AfterDecisionEvent, BeforeDecisionEvent, ContextEntryEvent, DecisionServiceEvent,
    DecisionTableEvent, DeploymentEvent, InvocationEvent, JobEvent, RuleMatchEvent,
    SolverPhaseEvent,
};
use crate::session::SessionId;
use std::sync::Arc;

/// Listener over a session's decision evaluation events
pub trait DecisionEventListener: Send + Sync {
    fn before_decision(&self, _event: &BeforeDecisionEvent) {}
    fn after_decision(&self, _event: &AfterDecisionEvent) {}
    fn before_context_entry(&self, _event: &ContextEntryEvent) {}
    fn after_context_entry(&self, _event: &ContextEntryEvent) {}
    fn before_decision_table(&self, _event: &DecisionTableEvent) {}
    fn after_decision_table(&self, _event: &DecisionTableEvent) {}
    fn before_invocation(&self, _event: &InvocationEvent) {}
    fn after_invocation(&self, _event: &InvocationEvent) {}
    fn before_decision_service(&self, _event: &DecisionServiceEvent) {}
    fn after_decision_service(&self, _event: &DecisionServiceEvent) {}

    /// Invoked by the dispatcher when the evaluation call has completed, on
    /// success and on failure alike
    fn evaluation_completed(&self) {}
}

/// Listener over a rule session's agenda events
pub trait AgendaEventListener: Send + Sync {
    fn match_created(&self, _event: &RuleMatchEvent) {}
    fn match_cancelled(&self, _event: &RuleMatchEvent) {}
    fn before_match_fired(&self, _event: &RuleMatchEvent) {}
    fn after_match_fired(&self, _event: &RuleMatchEvent) {}
}

/// Listener over a solver's phase transitions
pub trait SolverPhaseListener: Send + Sync {
    fn phase_started(&self, _event: &SolverPhaseEvent) {}
    fn phase_ended(&self, _event: &SolverPhaseEvent) {}
}

/// Listener over asynchronous job lifecycle events
pub trait AsyncJobListener: Send + Sync {
    fn job_scheduled(&self, _event: &JobEvent) {}
    fn job_executed(&self, _event: &JobEvent) {}
    fn job_cancelled(&self, _event: &JobEvent) {}
}

/// Listener over deployment lifecycle events
pub trait DeploymentListener: Send + Sync {
    fn deployed(&self, _event: &DeploymentEvent) {}
    fn undeployed(&self, _event: &DeploymentEvent) {}
}

/// Extension point for externally provided listeners
///
/// Implementations are registered with the listener registry at startup;
/// there is no runtime discovery. Every factory is optional: returning
/// `None` opts the provider out of that kind, it is never an error.
pub trait ListenerProvider: Send + Sync {
    fn decision_listener(
        &self,
        _session_id: &SessionId,
        _container: &Arc<ContainerInstance>,
    ) -> Option<Arc<dyn DecisionEventListener>> {
        None
    }

    fn agenda_listener(
        &self,
        _session_id: &SessionId,
        _container: &Arc<ContainerInstance>,
    ) -> Option<Arc<dyn AgendaEventListener>> {
        None
    }

    fn phase_listener(&self, _solver_id: &str) -> Option<Arc<dyn SolverPhaseListener>> {
        None
    }

    fn job_listener(&self) -> Option<Arc<dyn AsyncJobListener>> {
        None
    }

    fn deployment_listener(&self) -> Option<Arc<dyn DeploymentListener>> {
        None
    }
}

/// Immutable, already-merged listener list for the decision kind
pub type DecisionListeners = Arc<Vec<Arc<dyn DecisionEventListener>>>;
/// Immutable, already-merged listener list for the agenda kind
pub type AgendaListeners = Arc<Vec<Arc<dyn AgendaEventListener>>>;
/// Immutable, already-merged listener list for the solver-phase kind
pub type PhaseListeners = Arc<Vec<Arc<dyn SolverPhaseListener>>>;
/// Immutable, already-merged listener list for the async-job kind
pub type JobListeners = Arc<Vec<Arc<dyn AsyncJobListener>>>;
/// Immutable, already-merged listener list for the deployment kind
pub type DeploymentListeners = Arc<Vec<Arc<dyn DeploymentListener>>>;
