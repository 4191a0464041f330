//! Tests for graph value types.

use serde_json::json;

use super::types::{props_match, EdgeSpec, Properties, VertexId, VertexSpec};

// ── VertexId ───────────────────────────────────────────────────────────

#[test]
fn test_vertex_id_serializes_untagged() {
    assert_eq!(serde_json::to_value(VertexId::Int(7)).unwrap(), json!(7));
    assert_eq!(
        serde_json::to_value(VertexId::Text("thor".into())).unwrap(),
        json!("thor")
    );
}

#[test]
fn test_vertex_id_deserializes_untagged() {
    let id: VertexId = serde_json::from_value(json!(42)).unwrap();
    assert_eq!(id, VertexId::Int(42));
    let id: VertexId = serde_json::from_value(json!("odin")).unwrap();
    assert_eq!(id, VertexId::Text("odin".into()));
}

#[test]
fn test_vertex_id_display() {
    assert_eq!(VertexId::Int(3).to_string(), "3");
    assert_eq!(VertexId::Text("loki".into()).to_string(), "loki");
}

#[test]
fn test_vertex_id_conversions() {
    assert_eq!(VertexId::from(5u64), VertexId::Int(5));
    assert_eq!(VertexId::from("x"), VertexId::Text("x".into()));
    assert_eq!(VertexId::from("x".to_string()), VertexId::Text("x".into()));
}

// ── Specs ──────────────────────────────────────────────────────────────

#[test]
fn test_vertex_spec_builder() {
    let spec = VertexSpec::new()
        .with_id("thor")
        .with_property("name", json!("Thor"))
        .with_property("age", json!(1500));

    assert_eq!(spec.id, Some(VertexId::Text("thor".into())));
    assert_eq!(spec.properties.get("name"), Some(&json!("Thor")));
    assert_eq!(spec.properties.get("age"), Some(&json!(1500)));
}

#[test]
fn test_vertex_spec_defaults_to_auto_id() {
    let spec = VertexSpec::new();
    assert!(spec.id.is_none());
    assert!(spec.properties.is_empty());
}

#[test]
fn test_edge_spec_builder() {
    let spec = EdgeSpec::new("a", "b", "knows").with_property("since", json!(2020));
    assert_eq!(spec.from, VertexId::Text("a".into()));
    assert_eq!(spec.to, VertexId::Text("b".into()));
    assert_eq!(spec.label, "knows");
    assert_eq!(spec.properties.get("since"), Some(&json!(2020)));
}

// ── Property matching ──────────────────────────────────────────────────

#[test]
fn test_props_match_requires_all_keys() {
    let mut props = Properties::new();
    props.insert("name".into(), json!("Thor"));
    props.insert("realm".into(), json!("Asgard"));

    let mut filter = Properties::new();
    filter.insert("name".into(), json!("Thor"));
    assert!(props_match(&props, &filter));

    filter.insert("realm".into(), json!("Midgard"));
    assert!(!props_match(&props, &filter));

    filter.insert("realm".into(), json!("Asgard"));
    filter.insert("absent".into(), json!(true));
    assert!(!props_match(&props, &filter));
}

#[test]
fn test_props_match_empty_filter_matches_everything() {
    let props = Properties::new();
    assert!(props_match(&props, &Properties::new()));
}
