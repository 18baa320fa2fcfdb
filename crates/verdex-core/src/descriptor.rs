//! Transfer-safe model descriptors and the descriptor builder
//!
//! Descriptors are the discovery payload: an acyclic, serializable rendering
//! of a live model. They are built fresh on every discovery call and never
//! cached.

use crate::error::{CoreError, Result};
use crate::model::{
    DecisionModel, DecisionNode, DecisionServiceNode, InputNode, ItemDefinition, TypeRef,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Descriptor of a single decision
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionDescriptor {
    pub id: String,
    pub name: String,
}

/// Descriptor of a decision service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionServiceDescriptor {
    pub id: String,
    pub name: String,
}

/// Descriptor of a model input
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeRef>,
}

/// Allowed-values constraint carried by an item definition descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllowedValues {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_language: Option<String>,
}

/// Descriptor of an item (type) definition
///
/// The top-level item definitions of a model form an unordered set, but the
/// `components` of each definition are an ordered list and keep their order
/// at every nesting depth.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemDefinitionDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<AllowedValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_language: Option<String>,
    pub is_collection: bool,
    #[serde(default)]
    pub components: Vec<ItemDefinitionDescriptor>,
}

/// Transfer-safe descriptor of one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub namespace: String,
    pub name: String,
    pub id: String,
    pub decisions: HashSet<DecisionDescriptor>,
    pub decision_services: HashSet<DecisionServiceDescriptor>,
    pub inputs: HashSet<InputDescriptor>,
    pub item_definitions: HashSet<ItemDefinitionDescriptor>,
}

/// Build the descriptor of a live model
///
/// Pure function of the supplied snapshot. A model without a definitions id
/// is malformed and yields an error; the caller converts it into a response
/// failure.
pub fn describe(model: &DecisionModel) -> Result<ModelDescriptor> {
    let id = model
        .definitions_id
        .clone()
        .ok_or_else(|| CoreError::MissingDefinitionsId(model.name.clone()))?;

    Ok(ModelDescriptor {
        namespace: model.namespace.clone(),
        name: model.name.clone(),
        id,
        decisions: model.decisions.iter().map(decision_to_descriptor).collect(),
        decision_services: model
            .decision_services
            .iter()
            .map(decision_service_to_descriptor)
            .collect(),
        inputs: model.inputs.iter().map(input_to_descriptor).collect(),
        item_definitions: model
            .item_definitions
            .iter()
            .map(item_definition_to_descriptor)
            .collect(),
    })
}

fn decision_to_descriptor(node: &DecisionNode) -> DecisionDescriptor {
    DecisionDescriptor {
        id: node.id.clone(),
        name: node.name.clone(),
    }
}

fn decision_service_to_descriptor(node: &DecisionServiceNode) -> DecisionServiceDescriptor {
    DecisionServiceDescriptor {
        id: node.id.clone(),
        name: node.name.clone(),
    }
}

fn input_to_descriptor(input: &InputNode) -> InputDescriptor {
    // An input's type reference is resolved by prefix inside its original
    // document; an empty namespace here means the binding was never applied.
    let type_ref = input.type_ref.as_ref().map(|type_ref| {
        if type_ref.namespace.is_empty() {
            match input.namespaces.get(&type_ref.prefix) {
                Some(namespace) => TypeRef {
                    prefix: type_ref.prefix.clone(),
                    local_part: type_ref.local_part.clone(),
                    namespace: namespace.clone(),
                },
                None => type_ref.clone(),
            }
        } else {
            type_ref.clone()
        }
    });

    InputDescriptor {
        id: input.id.clone(),
        name: input.name.clone(),
        type_ref,
    }
}

fn item_definition_to_descriptor(item: &ItemDefinition) -> ItemDefinitionDescriptor {
    ItemDefinitionDescriptor {
        id: item.id.clone(),
        name: item.name.clone(),
        type_ref: item.type_ref.clone(),
        allowed_values: item.allowed_values.as_ref().map(|av| AllowedValues {
            text: av.text.clone(),
            expression_language: av.expression_language.clone(),
        }),
        type_language: item.type_language.clone(),
        is_collection: item.is_collection,
        components: item
            .components
            .iter()
            .map(item_definition_to_descriptor)
            .collect(),
    }
}
