//! Graph value types: vertex identities, vertices, and edges.
//!
//! Vertices and edges carry open-ended property maps with `serde_json::Value`
//! values. Edge membership is tracked in the store's adjacency tables, not on
//! the vertex value itself, so these types stay acyclic and cheaply clonable.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An open-ended set of named properties.
pub type Properties = HashMap<String, Value>;

/// A vertex identity: either an auto-assignable integer or a caller-chosen
/// text key.
///
/// Serialized untagged, so the canonical JSON form is a plain number or
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VertexId {
    /// Integer identity. Auto-assigned ids are always this variant.
    Int(u64),
    /// Text identity, e.g. `"thor"`.
    Text(String),
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for VertexId {
    fn from(n: u64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for VertexId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for VertexId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A vertex: a stable identity plus an open property set.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    id: VertexId,
    properties: Properties,
}

impl Vertex {
    pub(crate) fn new(id: VertexId, properties: Properties) -> Self {
        Self { id, properties }
    }

    /// Returns the vertex ID.
    #[must_use]
    pub fn id(&self) -> &VertexId {
        &self.id
    }

    /// Returns all properties of this vertex.
    #[must_use]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Returns a specific property value, if it exists.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Sets a property value.
    pub fn set_property(&mut self, name: &str, value: Value) {
        self.properties.insert(name.to_string(), value);
    }
}

/// A directed edge between two vertices, resolved at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: VertexId,
    target: VertexId,
    label: String,
    properties: Properties,
}

impl Edge {
    pub(crate) fn new(
        source: VertexId,
        target: VertexId,
        label: String,
        properties: Properties,
    ) -> Self {
        Self {
            source,
            target,
            label,
            properties,
        }
    }

    /// Returns the source vertex ID.
    #[must_use]
    pub fn source(&self) -> &VertexId {
        &self.source
    }

    /// Returns the target vertex ID.
    #[must_use]
    pub fn target(&self) -> &VertexId {
        &self.target
    }

    /// Returns the edge label (relationship tag used by traversal filters).
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns all properties of this edge.
    #[must_use]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Returns a specific property value, if it exists.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// What a caller hands to [`Graph::add_vertex`](crate::Graph::add_vertex):
/// an optional identity plus properties. When `id` is `None` the store
/// assigns the next auto id.
#[derive(Debug, Clone, Default)]
pub struct VertexSpec {
    /// Explicit identity, or `None` to auto-assign.
    pub id: Option<VertexId>,
    /// Initial properties.
    pub properties: Properties,
}

impl VertexSpec {
    /// Creates an empty spec with an auto-assigned id.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit id (builder pattern).
    #[must_use]
    pub fn with_id(mut self, id: impl Into<VertexId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds a property (builder pattern).
    #[must_use]
    pub fn with_property(mut self, name: &str, value: Value) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }
}

/// What a caller hands to [`Graph::add_edge`](crate::Graph::add_edge).
/// Endpoints are given by id and resolved against the graph at insertion.
#[derive(Debug, Clone)]
pub struct EdgeSpec {
    /// Source vertex id.
    pub from: VertexId,
    /// Target vertex id.
    pub to: VertexId,
    /// Edge label.
    pub label: String,
    /// Edge properties.
    pub properties: Properties,
}

impl EdgeSpec {
    /// Creates an edge spec with the given endpoints and label.
    #[must_use]
    pub fn new(from: impl Into<VertexId>, to: impl Into<VertexId>, label: &str) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: label.to_string(),
            properties: Properties::new(),
        }
    }

    /// Adds a property (builder pattern).
    #[must_use]
    pub fn with_property(mut self, name: &str, value: Value) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }
}

/// Exact-equality property match: every key listed in `filter` must be
/// present in `props` with an equal value.
pub(crate) fn props_match(props: &Properties, filter: &Properties) -> bool {
    filter
        .iter()
        .all(|(key, want)| props.get(key) == Some(want))
}
