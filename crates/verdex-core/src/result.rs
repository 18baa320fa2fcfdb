//! Evaluation results and outcome envelope payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Terminal state of one decision evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStatus {
    NotEvaluated,
    Succeeded,
    Skipped,
    Failed,
}

/// The engine's result for a single decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub decision_id: String,
    pub decision_name: String,
    pub result: Value,
    pub status: DecisionStatus,
    #[serde(default)]
    pub messages: Vec<String>,
}

impl DecisionResult {
    /// Result of a successfully evaluated decision
    pub fn succeeded(
        decision_id: impl Into<String>,
        decision_name: impl Into<String>,
        result: Value,
    ) -> Self {
        Self {
            decision_id: decision_id.into(),
            decision_name: decision_name.into(),
            result,
            status: DecisionStatus::Succeeded,
            messages: Vec::new(),
        }
    }

    /// Result of a failed decision evaluation
    pub fn failed(
        decision_id: impl Into<String>,
        decision_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            decision_id: decision_id.into(),
            decision_name: decision_name.into(),
            result: Value::Null,
            status: DecisionStatus::Failed,
            messages: vec![message.into()],
        }
    }

    /// Whether this decision's evaluation carries an error state
    pub fn has_errors(&self) -> bool {
        self.status == DecisionStatus::Failed
    }
}

/// Raw result set produced by one engine evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub model_namespace: String,
    pub model_name: String,
    pub results: Vec<DecisionResult>,
}

impl EvaluationResult {
    /// Look up a decision's result by id
    pub fn result_for(&self, decision_id: &str) -> Option<&DecisionResult> {
        self.results.iter().find(|r| r.decision_id == decision_id)
    }
}

/// Outcome returned by one evaluation call
///
/// Pairs the evaluated model's identity and the originally requested
/// decision names with the engine's raw result set. Per-decision errors
/// live inside `results`; they never turn the call itself into a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub model_namespace: String,
    pub model_name: String,
    #[serde(default)]
    pub decision_names: Vec<String>,
    pub results: Vec<DecisionResult>,
}
