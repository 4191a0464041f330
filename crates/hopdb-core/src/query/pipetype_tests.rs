//! Behavioral tests for the individual step evaluators, driven through
//! small whole-pipeline runs.

use serde_json::json;

use crate::config::EngineConfig;
use crate::dialect::Dialect;
use crate::graph::{EdgeSpec, Graph, Properties, VertexSpec};

use super::step::{Arg, VertexFilter};

/// A graph whose dialect applies no rewrites, so programs execute exactly
/// as written.
fn plain_graph() -> Graph {
    let config = EngineConfig {
        default_aliases: false,
        pushdown_rewrite: false,
        ..EngineConfig::default()
    };
    Graph::with_dialect(Dialect::with_config(config))
}

/// thor → odin, thor → frigg over `parent`; thor → loki over `sibling`.
fn family() -> Graph {
    let mut g = plain_graph();
    for (id, name) in [
        ("thor", "Thor"),
        ("odin", "Odin"),
        ("frigg", "Frigg"),
        ("loki", "Loki"),
    ] {
        g.add_vertex(VertexSpec::new().with_id(id).with_property("name", json!(name)))
            .unwrap();
    }
    g.add_edge(EdgeSpec::new("thor", "odin", "parent")).unwrap();
    g.add_edge(EdgeSpec::new("thor", "frigg", "parent")).unwrap();
    g.add_edge(EdgeSpec::new("thor", "loki", "sibling")).unwrap();
    g
}

// ── out / in ───────────────────────────────────────────────────────────

#[test]
fn test_out_unfiltered_follows_every_edge() {
    let g = family();
    let names = g.v("thor").out(()).property("name").run();
    assert_eq!(names, vec![json!("Odin"), json!("Frigg"), json!("Loki")]);
}

#[test]
fn test_out_label_list_filter() {
    let g = family();
    let names = g
        .v("thor")
        .out(["parent", "sibling"].as_slice())
        .property("name")
        .run();
    assert_eq!(names, vec![json!("Odin"), json!("Frigg"), json!("Loki")]);
}

#[test]
fn test_out_edge_property_filter() {
    let mut g = plain_graph();
    g.add_vertex(VertexSpec::new().with_id("a")).unwrap();
    g.add_vertex(VertexSpec::new().with_id("b")).unwrap();
    g.add_vertex(VertexSpec::new().with_id("c")).unwrap();
    g.add_edge(EdgeSpec::new("a", "b", "road").with_property("toll", json!(true)))
        .unwrap();
    g.add_edge(EdgeSpec::new("a", "c", "road")).unwrap();

    let mut filter = Properties::new();
    filter.insert("toll".into(), json!(true));
    let out = g.v("a").out(filter).run();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["_id"], json!("b"));
}

#[test]
fn test_in_walks_edges_backwards() {
    let g = family();
    let names = g.v("odin").in_("parent").property("name").run();
    assert_eq!(names, vec![json!("Thor")]);
}

#[test]
fn test_traversal_from_dead_end_is_empty() {
    let g = family();
    assert!(g.v("loki").out("parent").run().is_empty());
}

// ── property ───────────────────────────────────────────────────────────

#[test]
fn test_property_discards_cursors_lacking_it() {
    let mut g = plain_graph();
    g.add_vertex(VertexSpec::new().with_id("named").with_property("name", json!("N")))
        .unwrap();
    g.add_vertex(VertexSpec::new().with_id("anon")).unwrap();
    g.add_vertex(VertexSpec::new().with_id("nulled").with_property("name", json!(null)))
        .unwrap();

    assert_eq!(g.v(()).property("name").run(), vec![json!("N")]);
}

// ── unique ─────────────────────────────────────────────────────────────

#[test]
fn test_unique_deduplicates_within_a_run() {
    // Diamond: both paths from a converge on d.
    let mut g = plain_graph();
    for id in ["a", "b", "c", "d"] {
        g.add_vertex(VertexSpec::new().with_id(id)).unwrap();
    }
    g.add_edge(EdgeSpec::new("a", "b", "to")).unwrap();
    g.add_edge(EdgeSpec::new("a", "c", "to")).unwrap();
    g.add_edge(EdgeSpec::new("b", "d", "to")).unwrap();
    g.add_edge(EdgeSpec::new("c", "d", "to")).unwrap();

    let out = g.v("a").out(()).out(()).unique().run();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["_id"], json!("d"));
}

// ── filter ─────────────────────────────────────────────────────────────

#[test]
fn test_filter_by_property_object() {
    let g = family();
    let mut wanted = Properties::new();
    wanted.insert("name".into(), json!("Frigg"));
    let out = g.v("thor").out("parent").filter(wanted).run();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["_id"], json!("frigg"));
}

#[test]
fn test_filter_by_predicate() {
    let g = family();
    let out = g
        .v("thor")
        .out("parent")
        .filter(VertexFilter::matching(|v, _| {
            v.property("name").and_then(|n| n.as_str()) == Some("Odin")
        }))
        .run();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["_id"], json!("odin"));
}

#[test]
fn test_filter_with_invalid_argument_fails_open() {
    let g = family();
    let out = g
        .v("thor")
        .out("parent")
        .step("filter", vec![Arg::Value(json!(42))])
        .run();
    assert_eq!(out.len(), 2);
}

// ── take ───────────────────────────────────────────────────────────────

#[test]
fn test_take_limits_results() {
    let g = family();
    assert_eq!(g.v("thor").out(()).take(2).run().len(), 2);
    assert_eq!(g.v("thor").out(()).take(10).run().len(), 3);
    assert!(g.v("thor").out(()).take(0).run().is_empty());
}

#[test]
fn test_take_stops_pulling_upstream() {
    let g = family();
    let names = g.v("thor").out(()).take(1).property("name").run();
    assert_eq!(names, vec![json!("Odin")]);
}

// ── as / back / except ─────────────────────────────────────────────────

#[test]
fn test_back_returns_to_bound_vertex() {
    let g = family();
    let names = g
        .v("thor")
        .as_("start")
        .out("parent")
        .back("start")
        .property("name")
        .run();
    // Once per parent edge walked.
    assert_eq!(names, vec![json!("Thor"), json!("Thor")]);
}

#[test]
fn test_back_on_unbound_label_discards() {
    let g = family();
    assert!(g.v("thor").out("parent").back("nope").run().is_empty());
}

#[test]
fn test_except_drops_the_bound_vertex() {
    let mut g = family();
    // A self sibling edge that except must filter out.
    g.add_edge(EdgeSpec::new("thor", "thor", "sibling")).unwrap();

    let names = g
        .v("thor")
        .as_("me")
        .out("sibling")
        .except("me")
        .property("name")
        .run();
    assert_eq!(names, vec![json!("Loki")]);
}

// ── merge ──────────────────────────────────────────────────────────────

#[test]
fn test_merge_emits_bound_vertices_per_input() {
    let g = family();
    let names = g
        .v("thor")
        .as_("me")
        .out("parent")
        .as_("p")
        .merge(&["me", "p"])
        .property("name")
        .run();
    // One (me, p) pair per parent edge, in binding-argument order.
    assert_eq!(
        names,
        vec![json!("Thor"), json!("Odin"), json!("Thor"), json!("Frigg")]
    );
}

#[test]
fn test_merge_skips_unbound_labels() {
    let g = family();
    let names = g
        .v("thor")
        .as_("me")
        .out("parent")
        .merge(&["me", "missing"])
        .property("name")
        .run();
    assert_eq!(names, vec![json!("Thor"), json!("Thor")]);
}

#[test]
fn test_merge_with_no_bindings_emits_nothing() {
    let g = family();
    assert!(g.v("thor").out("parent").merge(&["missing"]).run().is_empty());
}

// ── maxDepth ───────────────────────────────────────────────────────────

#[test]
fn test_max_depth_bounds_chained_hops() {
    // Chain a → b → c.
    let mut g = plain_graph();
    for id in ["a", "b", "c"] {
        g.add_vertex(VertexSpec::new().with_id(id)).unwrap();
    }
    g.add_edge(EdgeSpec::new("a", "b", "next")).unwrap();
    g.add_edge(EdgeSpec::new("b", "c", "next")).unwrap();

    // Each hop increments the branch depth; the second hop exceeds 1.
    let within_one = g
        .v("a")
        .out("next")
        .max_depth(1)
        .out("next")
        .max_depth(1)
        .run();
    assert!(within_one.is_empty());

    let within_two = g
        .v("a")
        .out("next")
        .max_depth(2)
        .out("next")
        .max_depth(2)
        .run();
    assert_eq!(within_two.len(), 1);
    assert_eq!(within_two[0]["_id"], json!("c"));
}

// ── Unrecognized steps ─────────────────────────────────────────────────

#[test]
fn test_unknown_step_passes_tokens_through() {
    let g = family();
    let names = g
        .v("thor")
        .step("frobnicate", Vec::new())
        .out("parent")
        .property("name")
        .run();
    assert_eq!(names, vec![json!("Odin"), json!("Frigg")]);
}
