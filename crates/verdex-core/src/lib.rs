//! Verdex Core - Core types for the Verdex decision-model evaluation service
//!
//! This crate provides the fundamental types used across the Verdex ecosystem:
//! - Release coordinates identifying deployed model containers
//! - The live model snapshot supplied by the decision engine
//! - The transfer-safe descriptor tree returned by model discovery
//! - Evaluation context, outcome and per-decision result types

pub mod context;
pub mod descriptor;
pub mod error;
pub mod model;
pub mod release;
pub mod result;

// Re-export commonly used types
pub use context::EvaluationContext;
pub use descriptor::{
    describe, AllowedValues, DecisionDescriptor, DecisionServiceDescriptor, InputDescriptor,
    ItemDefinitionDescriptor, ModelDescriptor,
};
pub use error::CoreError;
pub use model::{
    DecisionModel, DecisionNode, DecisionServiceNode, InputNode, ItemDefinition, TypeRef,
    UnaryTests,
};
pub use release::ReleaseId;
pub use result::{DecisionResult, DecisionStatus, EvaluationOutcome, EvaluationResult};
