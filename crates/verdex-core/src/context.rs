//! Evaluation context submitted by callers

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The caller's evaluation request payload
///
/// Carries the model identity, the input variables and the decision
/// selection. The selection is expressed as exactly one of decision names,
/// decision ids or a decision-service name; precedence among them when more
/// than one is set is the evaluation engine's own policy and is not decided
/// here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationContext {
    /// Namespace of the model to evaluate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_namespace: Option<String>,

    /// Name of the model to evaluate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// Input variables, keyed by variable name
    #[serde(default)]
    pub input: HashMap<String, Value>,

    /// Selection by decision name
    #[serde(default)]
    pub decision_names: Vec<String>,

    /// Selection by decision id
    #[serde(default)]
    pub decision_ids: Vec<String>,

    /// Selection by decision-service name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_service_name: Option<String>,
}

impl EvaluationContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Target a model by namespace and name
    pub fn for_model(mut self, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        self.model_namespace = Some(namespace.into());
        self.model_name = Some(name.into());
        self
    }

    /// Add an input variable
    pub fn with_input(mut self, name: impl Into<String>, value: Value) -> Self {
        self.input.insert(name.into(), value);
        self
    }

    /// Select a decision by name
    pub fn with_decision_name(mut self, name: impl Into<String>) -> Self {
        self.decision_names.push(name.into());
        self
    }

    /// Select a decision by id
    pub fn with_decision_id(mut self, id: impl Into<String>) -> Self {
        self.decision_ids.push(id.into());
        self
    }

    /// Select a decision service by name
    pub fn with_decision_service(mut self, name: impl Into<String>) -> Self {
        self.decision_service_name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_builder() {
        let context = EvaluationContext::new()
            .for_model("https://acme.example/loans", "Loans")
            .with_input("Age", json!(17))
            .with_decision_name("CanDrive");

        assert_eq!(context.model_name.as_deref(), Some("Loans"));
        assert_eq!(context.input.get("Age"), Some(&json!(17)));
        assert_eq!(context.decision_names, vec!["CanDrive"]);
        assert!(context.decision_ids.is_empty());
        assert!(context.decision_service_name.is_none());
    }

    #[test]
    fn test_context_deserializes_with_defaults() {
        let context: EvaluationContext =
            serde_json::from_str(r#"{"input": {"Age": 17}}"#).unwrap();

        assert!(context.model_name.is_none());
        assert!(context.decision_names.is_empty());
        assert_eq!(context.input.len(), 1);
    }

    #[test]
    fn test_context_round_trip() {
        let context = EvaluationContext::new()
            .with_input("Amount", json!(1200.5))
            .with_decision_id("d1");

        let text = serde_json::to_string(&context).unwrap();
        let back: EvaluationContext = serde_json::from_str(&text).unwrap();

        assert_eq!(back.decision_ids, vec!["d1"]);
        assert_eq!(back.input.get("Amount"), Some(&json!(1200.5)));
    }
}
