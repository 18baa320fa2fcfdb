//! Live model snapshot types
//!
//! These types describe a model as the decision engine holds it in memory.
//! They are handed to this core by the engine on discovery and are the input
//! of the descriptor builder; they are never sent over the wire themselves.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A qualified type reference
///
/// Analogue of an XML qualified name: a local part plus the prefix it was
/// written with and the namespace the prefix resolves to. The namespace may
/// be empty when the reference has not been resolved against its document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub prefix: String,
    pub local_part: String,
    pub namespace: String,
}

impl TypeRef {
    /// Create a fully resolved type reference
    pub fn new(
        prefix: impl Into<String>,
        local_part: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            local_part: local_part.into(),
            namespace: namespace.into(),
        }
    }

    /// Create a type reference whose namespace is still unresolved
    pub fn unresolved(prefix: impl Into<String>, local_part: impl Into<String>) -> Self {
        Self::new(prefix, local_part, "")
    }
}

/// Allowed-values constraint on an item definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnaryTests {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_language: Option<String>,
}

/// A decision node of the live model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionNode {
    pub id: String,
    pub name: String,
}

impl DecisionNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A decision service node of the live model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionServiceNode {
    pub id: String,
    pub name: String,
}

impl DecisionServiceNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// An input node of the live model
///
/// Inputs carry their document's prefix-to-namespace table because an
/// input's type reference is resolved by prefix inside its original
/// document and may reach this core with an empty namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputNode {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeRef>,
    /// Prefix -> namespace table of the owning document
    #[serde(default)]
    pub namespaces: HashMap<String, String>,
}

impl InputNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            type_ref: None,
            namespaces: HashMap::new(),
        }
    }

    /// Set the input's type reference
    pub fn with_type_ref(mut self, type_ref: TypeRef) -> Self {
        self.type_ref = Some(type_ref);
        self
    }

    /// Register a prefix -> namespace binding of the owning document
    pub fn with_namespace(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.namespaces.insert(prefix.into(), namespace.into());
        self
    }
}

/// An item (type) definition of the live model
///
/// Nested components form an owned tree; their order is meaningful and must
/// be preserved by every consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<UnaryTests>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_language: Option<String>,
    #[serde(default)]
    pub is_collection: bool,
    #[serde(default)]
    pub components: Vec<ItemDefinition>,
}

impl ItemDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            type_ref: None,
            allowed_values: None,
            type_language: None,
            is_collection: false,
            components: Vec::new(),
        }
    }

    pub fn with_type_ref(mut self, type_ref: TypeRef) -> Self {
        self.type_ref = Some(type_ref);
        self
    }

    pub fn with_allowed_values(mut self, allowed_values: UnaryTests) -> Self {
        self.allowed_values = Some(allowed_values);
        self
    }

    pub fn with_component(mut self, component: ItemDefinition) -> Self {
        self.components.push(component);
        self
    }

    pub fn collection(mut self) -> Self {
        self.is_collection = true;
        self
    }
}

/// Snapshot of one live model inside a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionModel {
    pub namespace: String,
    pub name: String,
    /// Id of the model's definitions element; absent on malformed models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions_id: Option<String>,
    #[serde(default)]
    pub decisions: Vec<DecisionNode>,
    #[serde(default)]
    pub decision_services: Vec<DecisionServiceNode>,
    #[serde(default)]
    pub inputs: Vec<InputNode>,
    #[serde(default)]
    pub item_definitions: Vec<ItemDefinition>,
}

impl DecisionModel {
    /// Create an empty model snapshot
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        definitions_id: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            definitions_id: Some(definitions_id.into()),
            decisions: Vec::new(),
            decision_services: Vec::new(),
            inputs: Vec::new(),
            item_definitions: Vec::new(),
        }
    }

    pub fn with_decision(mut self, decision: DecisionNode) -> Self {
        self.decisions.push(decision);
        self
    }

    pub fn with_decision_service(mut self, service: DecisionServiceNode) -> Self {
        self.decision_services.push(service);
        self
    }

    pub fn with_input(mut self, input: InputNode) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_item_definition(mut self, item_definition: ItemDefinition) -> Self {
        self.item_definitions.push(item_definition);
        self
    }
}
