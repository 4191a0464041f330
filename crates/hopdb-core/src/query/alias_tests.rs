//! Tests for alias registration and expansion.

use serde_json::json;

use crate::graph::{EdgeSpec, Graph, VertexSpec};

use super::alias::AliasTarget;
use super::step::{Arg, Step};

/// Three generations: thor → odin → bor over `parent`, plus thor → loki
/// over `sibling` and odin → frigg over `spouse`.
fn dynasty() -> Graph {
    let mut g = Graph::new();
    for (id, name) in [
        ("thor", "Thor"),
        ("odin", "Odin"),
        ("bor", "Bor"),
        ("loki", "Loki"),
        ("frigg", "Frigg"),
    ] {
        g.add_vertex(VertexSpec::new().with_id(id).with_property("name", json!(name)))
            .unwrap();
    }
    g.add_edge(EdgeSpec::new("thor", "odin", "parent")).unwrap();
    g.add_edge(EdgeSpec::new("odin", "bor", "parent")).unwrap();
    g.add_edge(EdgeSpec::new("thor", "loki", "sibling")).unwrap();
    g.add_edge(EdgeSpec::new("odin", "frigg", "spouse")).unwrap();
    g
}

// ── Built-in aliases ───────────────────────────────────────────────────

#[test]
fn test_built_in_aliases_match_their_expansions() {
    let g = dynasty();
    assert_eq!(g.v("thor").parents().run(), g.v("thor").out("parent").run());
    assert_eq!(g.v("odin").children().run(), g.v("odin").in_("parent").run());
    assert_eq!(g.v("thor").siblings().run(), g.v("thor").out("sibling").run());
    assert_eq!(g.v("odin").spouse().run(), g.v("odin").out("spouse").run());
}

#[test]
fn test_built_in_aliases_are_placeholders() {
    let g = dynasty();
    for name in ["parents", "children", "siblings", "spouse"] {
        assert!(g.dialect().is_placeholder(name));
    }
    assert!(!g.dialect().is_placeholder("out"));
}

#[test]
fn test_aliases_chain_like_any_step() {
    let g = dynasty();
    let names = g.v("thor").parents().parents().property("name").run();
    assert_eq!(names, vec![json!("Bor")]);
}

// ── Custom single-step aliases ─────────────────────────────────────────

#[test]
fn test_custom_alias_uses_defaults_when_given_no_args() {
    let mut g = dynasty();
    g.dialect_mut().add_alias(
        "ancestors",
        AliasTarget::step("out", vec![Arg::Value(json!("parent"))]),
    );
    let names = g.v("thor").step("ancestors", Vec::new()).property("name").run();
    assert_eq!(names, vec![json!("Odin")]);
}

#[test]
fn test_custom_alias_explicit_args_override_defaults() {
    let mut g = dynasty();
    g.dialect_mut().add_alias(
        "related",
        AliasTarget::step("out", vec![Arg::Value(json!("parent"))]),
    );
    let names = g
        .v("thor")
        .step("related", vec![Arg::Value(json!("sibling"))])
        .property("name")
        .run();
    assert_eq!(names, vec![json!("Loki")]);
}

// ── Sequence aliases ───────────────────────────────────────────────────

#[test]
fn test_sequence_alias_splices_its_steps() {
    let mut g = dynasty();
    g.dialect_mut().add_alias(
        "grandparents",
        AliasTarget::Sequence(vec![
            Step::new("out", vec![Arg::Value(json!("parent"))]),
            Step::new("out", vec![Arg::Value(json!("parent"))]),
        ]),
    );
    let names = g.v("thor").step("grandparents", Vec::new()).property("name").run();
    assert_eq!(names, vec![json!("Bor")]);
}

#[test]
fn test_sequence_alias_ignores_arguments() {
    let mut g = dynasty();
    g.dialect_mut().add_alias(
        "grandparents",
        AliasTarget::Sequence(vec![
            Step::new("out", vec![Arg::Value(json!("parent"))]),
            Step::new("out", vec![Arg::Value(json!("parent"))]),
        ]),
    );
    let names = g
        .v("thor")
        .step("grandparents", vec![Arg::Value(json!("sibling"))])
        .property("name")
        .run();
    assert_eq!(names, vec![json!("Bor")]);
}

#[test]
fn test_alias_expansion_is_visible_in_the_program() {
    let g = dynasty();
    let mut q = g.v("thor").children();
    q.run();
    let program = q.program();
    assert_eq!(program[1].name, "in");
    assert_eq!(program[1].args, vec![Arg::Value(json!("parent"))]);
}
