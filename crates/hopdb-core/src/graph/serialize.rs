//! Canonical JSON text form of a graph.
//!
//! The shape is `{"V": [...], "E": [...]}`: each V entry is a vertex's own
//! properties plus `"_id"`, each E entry is an edge's properties plus
//! `"_label"`, `"_out"` (source id), and `"_in"` (target id). Adjacency is
//! never serialized — deserialization replays vertex and edge insertion in
//! array order, which reproduces the id index and edge-list orderings
//! exactly. Insertion order matters: traversal emission order and the
//! shortest-path tie-break depend on it.

use serde_json::{Map, Value};

use crate::dialect::Dialect;
use crate::error::{Error, Result};

use super::store::Graph;
use super::types::{Edge, EdgeSpec, Properties, Vertex, VertexId, VertexSpec};

/// Renders a vertex as a canonical V entry.
pub(crate) fn vertex_to_value(vertex: &Vertex) -> Value {
    let mut map = Map::new();
    for (key, value) in vertex.properties() {
        map.insert(key.clone(), value.clone());
    }
    map.insert("_id".to_string(), id_to_value(vertex.id()));
    Value::Object(map)
}

fn edge_to_value(edge: &Edge) -> Value {
    let mut map = Map::new();
    for (key, value) in edge.properties() {
        map.insert(key.clone(), value.clone());
    }
    map.insert("_label".to_string(), Value::String(edge.label().to_string()));
    map.insert("_out".to_string(), id_to_value(edge.source()));
    map.insert("_in".to_string(), id_to_value(edge.target()));
    Value::Object(map)
}

fn id_to_value(id: &VertexId) -> Value {
    match id {
        VertexId::Int(n) => Value::from(*n),
        VertexId::Text(s) => Value::String(s.clone()),
    }
}

fn value_to_id(value: &Value) -> Result<VertexId> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(VertexId::Int)
            .ok_or_else(|| Error::InvalidDocument(format!("non-integer vertex id: {n}"))),
        Value::String(s) => Ok(VertexId::Text(s.clone())),
        other => Err(Error::InvalidDocument(format!(
            "vertex id must be a number or string, got {other}"
        ))),
    }
}

impl Graph {
    /// Renders this graph to its canonical JSON text form.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` if a property value fails to encode.
    pub fn to_json(&self) -> Result<String> {
        let v: Vec<Value> = self.vertices().map(vertex_to_value).collect();
        let e: Vec<Value> = self.edges().map(edge_to_value).collect();
        Ok(format!(
            "{{\"V\":{},\"E\":{}}}",
            serde_json::to_string(&v)?,
            serde_json::to_string(&e)?
        ))
    }

    /// Reconstructs a graph from its canonical JSON text form, using the
    /// default dialect.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` for malformed JSON and
    /// `Error::InvalidDocument` when the document structure is wrong;
    /// insertion failures during replay propagate as their own errors.
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_json_with_dialect(text, Dialect::default())
    }

    /// Reconstructs a graph from its canonical JSON text form with an
    /// explicit dialect.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Graph::from_json`].
    pub fn from_json_with_dialect(text: &str, dialect: Dialect) -> Result<Self> {
        let doc: Value = serde_json::from_str(text)?;
        let root = doc
            .as_object()
            .ok_or_else(|| Error::InvalidDocument("document root must be an object".into()))?;
        let v = section(root, "V")?;
        let e = section(root, "E")?;

        let mut graph = Self::with_dialect(dialect);
        for entry in v {
            graph.add_vertex(vertex_spec(entry)?)?;
        }
        for entry in e {
            graph.add_edge(edge_spec(entry)?)?;
        }
        Ok(graph)
    }
}

fn section<'a>(root: &'a Map<String, Value>, key: &str) -> Result<&'a Vec<Value>> {
    root.get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::InvalidDocument(format!("missing or non-array \"{key}\" section")))
}

fn vertex_spec(entry: &Value) -> Result<VertexSpec> {
    let map = entry
        .as_object()
        .ok_or_else(|| Error::InvalidDocument("V entries must be objects".into()))?;
    let mut spec = VertexSpec::new();
    for (key, value) in map {
        if key == "_id" {
            spec.id = Some(value_to_id(value)?);
        } else {
            spec.properties.insert(key.clone(), value.clone());
        }
    }
    Ok(spec)
}

fn edge_spec(entry: &Value) -> Result<EdgeSpec> {
    let map = entry
        .as_object()
        .ok_or_else(|| Error::InvalidDocument("E entries must be objects".into()))?;
    let from = value_to_id(
        map.get("_out")
            .ok_or_else(|| Error::InvalidDocument("edge missing \"_out\"".into()))?,
    )?;
    let to = value_to_id(
        map.get("_in")
            .ok_or_else(|| Error::InvalidDocument("edge missing \"_in\"".into()))?,
    )?;
    let label = map
        .get("_label")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidDocument("edge missing string \"_label\"".into()))?;

    let mut properties = Properties::new();
    for (key, value) in map {
        if key != "_out" && key != "_in" && key != "_label" {
            properties.insert(key.clone(), value.clone());
        }
    }
    Ok(EdgeSpec {
        from,
        to,
        label: label.to_string(),
        properties,
    })
}
