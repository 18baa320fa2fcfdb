//! Verdex Runtime - Execution machinery for the Verdex decision service
//!
//! This crate provides everything a dispatch call needs around the external
//! decision engine: container resolution, session lifecycle with guaranteed
//! release, the listener registry with its built-in metrics listeners, and
//! the before/after correlation that times individual decision evaluations.

pub mod container;
pub mod engine;
pub mod error;
pub mod event;
pub mod listener;
pub mod metrics;
pub mod session;

// Re-export main types
pub use container::{ContainerInstance, ContainerRegistry};
pub use engine::{DecisionBackend, DecisionRuntime, EvaluationRequest};
pub use error::{Result, RuntimeError};
pub use event::{
    AfterDecisionEvent, BeforeDecisionEvent, ContextEntryEvent, DecisionHandle,
    DecisionServiceEvent, DecisionTableEvent, DeploymentEvent, InvocationEvent, JobEvent,
    RuleMatchEvent, SolverPhaseEvent,
};
pub use listener::registry::ListenerRegistry;
pub use listener::{
    AgendaEventListener, AsyncJobListener, DecisionEventListener, DeploymentListener,
    ListenerProvider, SolverPhaseListener,
};
pub use metrics::RuntimeMetrics;
pub use session::{Session, SessionId};

// The metrics crate is part of this crate's public API (registry injection).
pub use prometheus;
