//! Integration tests for the model discovery path

mod common;

use common::*;
use std::collections::HashSet;
use verdex_core::{
    DecisionModel, InputNode, ItemDefinition, ModelDescriptor, ReleaseId, TypeRef,
};
use verdex_service::ModelEvaluatorService;

fn service() -> ModelEvaluatorService {
    ModelEvaluatorService::builder().build().unwrap()
}

#[test]
fn test_get_models_returns_exact_cardinalities() {
    let service = service();
    deploy(
        &service,
        "c1",
        ReleaseId::new("g", "a", "1.0"),
        ScriptedBackend::new(catalog_model(), Vec::new()),
    );

    let response = service.models("c1");
    assert!(response.is_success());
    assert_eq!(
        response.message,
        "OK models successfully retrieved from container 'c1'"
    );

    let descriptors = response.payload.unwrap();
    assert_eq!(descriptors.len(), 1);

    let descriptor = &descriptors[0];
    assert_eq!(descriptor.name, "Loans");
    assert_eq!(descriptor.id, "defs-loans");
    assert_eq!(descriptor.decisions.len(), 2);
    assert_eq!(descriptor.decision_services.len(), 1);
    assert_eq!(descriptor.inputs.len(), 3);

    let decision_ids: HashSet<&str> = descriptor.decisions.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(decision_ids.len(), descriptor.decisions.len());
    let input_ids: HashSet<&str> = descriptor.inputs.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(input_ids.len(), descriptor.inputs.len());
}

#[test]
fn test_item_definition_component_order_round_trips() {
    let address = ItemDefinition::new("t2", "tAddress")
        .with_component(ItemDefinition::new("t2.1", "street"))
        .with_component(ItemDefinition::new("t2.2", "city"))
        .with_component(ItemDefinition::new("t2.3", "zip"));
    let applicant = ItemDefinition::new("t1", "tApplicant")
        .with_component(ItemDefinition::new("t1.1", "name"))
        .with_component(ItemDefinition::new("t1.2", "age"))
        .with_component(address);
    let model = catalog_model().with_item_definition(applicant);

    let service = service();
    deploy(
        &service,
        "c1",
        ReleaseId::new("g", "a", "1.0"),
        ScriptedBackend::new(model, Vec::new()),
    );

    let response = service.models("c1");
    let descriptors = response.payload.unwrap();

    // Order survives the wire format at every depth, even though the
    // top-level collections are unordered sets.
    let text = serde_json::to_string(&descriptors).unwrap();
    let decoded: Vec<ModelDescriptor> = serde_json::from_str(&text).unwrap();

    let item = decoded[0].item_definitions.iter().next().unwrap();
    let names: Vec<&str> = item.components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["name", "age", "tAddress"]);

    let nested: Vec<&str> = item.components[2]
        .components
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(nested, vec!["street", "city", "zip"]);
}

#[test]
fn test_input_type_ref_namespace_is_resolved() {
    let model = DecisionModel::new("https://acme.example/loans", "Loans", "defs").with_input(
        InputNode::new("i1", "Applicant")
            .with_type_ref(TypeRef::unresolved("tns", "tApplicant"))
            .with_namespace("tns", "https://acme.example/types"),
    );

    let service = service();
    deploy(
        &service,
        "c1",
        ReleaseId::new("g", "a", "1.0"),
        ScriptedBackend::new(model, Vec::new()),
    );

    let descriptors = service.models("c1").payload.unwrap();
    let input = descriptors[0].inputs.iter().next().unwrap();
    assert_eq!(
        input.type_ref.as_ref().unwrap().namespace,
        "https://acme.example/types"
    );
}

#[test]
fn test_malformed_model_yields_failure() {
    let mut model = catalog_model();
    model.definitions_id = None;

    let service = service();
    deploy(
        &service,
        "c1",
        ReleaseId::new("g", "a", "1.0"),
        ScriptedBackend::new(model, Vec::new()),
    );

    let response = service.models("c1");
    assert!(!response.is_success());
    assert!(response.payload.is_none());
    assert!(response.message.contains("c1"));
}

#[test]
fn test_discovery_releases_its_session() {
    let service = service();
    let container = deploy(
        &service,
        "c1",
        ReleaseId::new("g", "a", "1.0"),
        ScriptedBackend::new(catalog_model(), Vec::new()),
    );

    assert!(service.models("c1").is_success());
    assert!(service.models("c1").is_success());

    assert_eq!(container.sessions().acquired(), 2);
    assert_eq!(container.sessions().released(), 2);
}

#[test]
fn test_unknown_container_yields_failure() {
    let service = service();
    let response = service.models("ghost");
    assert!(!response.is_success());
    assert!(response.message.contains("ghost"));
}
