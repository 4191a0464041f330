//! In-memory graph store: vertex/edge arenas with identity indexes.
//!
//! Vertices and edges live in append-only arenas addressed by index; the id
//! index and the two adjacency tables are derived views over the edge arena,
//! kept consistent by the mutation API. Insertion order is semantically
//! significant — it fixes traversal emission order and the shortest-path
//! tie-break — so arenas preserve it.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::warn;

use crate::dialect::Dialect;
use crate::error::{EndpointSide, Error, Result};
use crate::query::Query;

use super::types::{props_match, Edge, EdgeSpec, Properties, Vertex, VertexId, VertexSpec};

/// How to select source vertices: everything, an explicit id list, or an
/// exact-equality property match.
#[derive(Debug, Clone, PartialEq)]
pub enum VertexQuery {
    /// All vertices, in insertion order.
    All,
    /// Deduplicated id lookups, in the order they succeed; unmatched ids
    /// are silently dropped.
    Ids(Vec<VertexId>),
    /// All vertices whose listed properties equal the given values.
    Props(Properties),
}

impl From<()> for VertexQuery {
    fn from((): ()) -> Self {
        Self::All
    }
}

impl From<VertexId> for VertexQuery {
    fn from(id: VertexId) -> Self {
        Self::Ids(vec![id])
    }
}

impl From<&str> for VertexQuery {
    fn from(id: &str) -> Self {
        Self::Ids(vec![id.into()])
    }
}

impl From<u64> for VertexQuery {
    fn from(id: u64) -> Self {
        Self::Ids(vec![id.into()])
    }
}

impl From<Vec<VertexId>> for VertexQuery {
    fn from(ids: Vec<VertexId>) -> Self {
        Self::Ids(ids)
    }
}

impl From<&[&str]> for VertexQuery {
    fn from(ids: &[&str]) -> Self {
        Self::Ids(ids.iter().map(|&id| id.into()).collect())
    }
}

impl From<Properties> for VertexQuery {
    fn from(props: Properties) -> Self {
        Self::Props(props)
    }
}

/// An embedded, in-memory, directed multigraph.
///
/// Owns the vertex and edge arenas, the id index, and the two adjacency
/// tables, plus the engine [`Dialect`] that queries over this graph use.
/// Single logical owner: callers must not mutate a graph while a traversal
/// over it is in flight (the borrow checker enforces this).
#[derive(Debug)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    /// id → vertex arena index.
    index: HashMap<VertexId, usize>,
    /// source id → edge arena indices, in insertion order.
    outgoing: HashMap<VertexId, Vec<usize>>,
    /// target id → edge arena indices, in insertion order.
    incoming: HashMap<VertexId, Vec<usize>>,
    next_id: u64,
    dialect: Dialect,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Creates an empty graph with the default dialect.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dialect(Dialect::default())
    }

    /// Creates an empty graph with an explicit dialect.
    #[must_use]
    pub fn with_dialect(dialect: Dialect) -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            index: HashMap::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
            next_id: 1,
            dialect,
        }
    }

    /// Returns the dialect queries over this graph use.
    #[must_use]
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Mutable access to the dialect, for registering custom transformers
    /// and aliases.
    pub fn dialect_mut(&mut self) -> &mut Dialect {
        &mut self.dialect
    }

    // ── Mutation ───────────────────────────────────────────────────────

    /// Adds a vertex. Assigns the next auto id when the spec carries none.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateVertexId` if the given id already exists;
    /// the graph is left unchanged.
    pub fn add_vertex(&mut self, spec: VertexSpec) -> Result<VertexId> {
        let id = match spec.id {
            Some(id) => {
                if self.index.contains_key(&id) {
                    return Err(Error::DuplicateVertexId(id));
                }
                // Keep the auto counter ahead of caller-chosen integer ids.
                if let VertexId::Int(n) = id {
                    self.next_id = self.next_id.max(n + 1);
                }
                id
            }
            None => {
                let id = VertexId::Int(self.next_id);
                self.next_id += 1;
                id
            }
        };

        self.index.insert(id.clone(), self.vertices.len());
        self.outgoing.entry(id.clone()).or_default();
        self.incoming.entry(id.clone()).or_default();
        self.vertices.push(Vertex::new(id.clone(), spec.properties));
        Ok(id)
    }

    /// Adds each vertex in order, logging and skipping failures.
    ///
    /// Returns the ids of the vertices that were inserted.
    pub fn add_vertices(&mut self, specs: Vec<VertexSpec>) -> Vec<VertexId> {
        let mut ids = Vec::with_capacity(specs.len());
        for spec in specs {
            match self.add_vertex(spec) {
                Ok(id) => ids.push(id),
                Err(e) => warn!("{e}"),
            }
        }
        ids
    }

    /// Adds an edge. Both endpoints must already exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingEdgeEndpoint` naming the unresolved side;
    /// the edge set is left unchanged.
    pub fn add_edge(&mut self, spec: EdgeSpec) -> Result<()> {
        if !self.index.contains_key(&spec.from) {
            return Err(Error::MissingEdgeEndpoint {
                side: EndpointSide::Source,
                id: spec.from,
            });
        }
        if !self.index.contains_key(&spec.to) {
            return Err(Error::MissingEdgeEndpoint {
                side: EndpointSide::Target,
                id: spec.to,
            });
        }

        let ix = self.edges.len();
        self.outgoing.entry(spec.from.clone()).or_default().push(ix);
        self.incoming.entry(spec.to.clone()).or_default().push(ix);
        self.edges
            .push(Edge::new(spec.from, spec.to, spec.label, spec.properties));
        Ok(())
    }

    /// Adds each edge in order, logging and skipping failures.
    pub fn add_edges(&mut self, specs: Vec<EdgeSpec>) {
        for spec in specs {
            if let Err(e) = self.add_edge(spec) {
                warn!("{e}");
            }
        }
    }

    // ── Lookup ─────────────────────────────────────────────────────────

    /// O(1) vertex lookup by id.
    #[must_use]
    pub fn vertex(&self, id: &VertexId) -> Option<&Vertex> {
        self.index.get(id).map(|&ix| &self.vertices[ix])
    }

    /// Resolves a [`VertexQuery`] to vertices.
    #[must_use]
    pub fn find_vertices(&self, query: &VertexQuery) -> Vec<&Vertex> {
        self.find_vertex_indices(query)
            .into_iter()
            .map(|ix| &self.vertices[ix])
            .collect()
    }

    /// Outgoing edges of a vertex, in insertion order.
    #[must_use]
    pub fn out_edges(&self, id: &VertexId) -> Vec<&Edge> {
        self.out_edge_indices(id)
            .iter()
            .map(|&ix| &self.edges[ix])
            .collect()
    }

    /// Incoming edges of a vertex, in insertion order.
    #[must_use]
    pub fn in_edges(&self, id: &VertexId) -> Vec<&Edge> {
        self.in_edge_indices(id)
            .iter()
            .map(|&ix| &self.edges[ix])
            .collect()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All vertices, in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    // ── Shortest path ──────────────────────────────────────────────────

    /// Breadth-first shortest path over outgoing edges only (directed).
    ///
    /// Returns the vertex id sequence from `from` to `to` inclusive, or
    /// `None` when unreachable. Among equal-length paths the one found
    /// follows edge insertion order within each vertex's outgoing list
    /// (FIFO tie-break — a stable artifact of insertion order, not a
    /// canonical choice).
    #[must_use]
    pub fn find_shortest_path(&self, from: &VertexId, to: &VertexId) -> Option<Vec<VertexId>> {
        let start = *self.index.get(from)?;
        self.index.get(to)?;

        let mut visited: HashSet<usize> = HashSet::new();
        let mut predecessor: HashMap<usize, usize> = HashMap::new();
        let mut frontier: VecDeque<usize> = VecDeque::new();

        visited.insert(start);
        frontier.push_back(start);

        while let Some(current) = frontier.pop_front() {
            if self.vertices[current].id() == to {
                return Some(self.unwind_path(start, current, &predecessor));
            }
            for &eix in self.out_edge_indices(self.vertices[current].id()) {
                let next = self.index[self.edges[eix].target()];
                if visited.insert(next) {
                    predecessor.insert(next, current);
                    frontier.push_back(next);
                }
            }
        }

        None
    }

    fn unwind_path(
        &self,
        start: usize,
        end: usize,
        predecessor: &HashMap<usize, usize>,
    ) -> Vec<VertexId> {
        let mut path = vec![self.vertices[end].id().clone()];
        let mut current = end;
        while current != start {
            current = predecessor[&current];
            path.push(self.vertices[current].id().clone());
        }
        path.reverse();
        path
    }

    // ── Query construction ─────────────────────────────────────────────

    /// Starts a traversal query from the vertices selected by `query`.
    ///
    /// ```
    /// use hopdb_core::{Graph, VertexSpec, EdgeSpec};
    /// use serde_json::json;
    ///
    /// let mut g = Graph::new();
    /// g.add_vertex(VertexSpec::new().with_id("a")).unwrap();
    /// g.add_vertex(VertexSpec::new().with_id("b")).unwrap();
    /// g.add_edge(EdgeSpec::new("a", "b", "knows")).unwrap();
    ///
    /// let out = g.v("a").out("knows").run();
    /// assert_eq!(out.len(), 1);
    /// ```
    #[must_use]
    pub fn v(&self, query: impl Into<VertexQuery>) -> Query<'_> {
        Query::source(self, query.into())
    }

    // ── Internal (arena) surface ───────────────────────────────────────

    pub(crate) fn vertex_at(&self, ix: usize) -> &Vertex {
        &self.vertices[ix]
    }

    pub(crate) fn edge_at(&self, ix: usize) -> &Edge {
        &self.edges[ix]
    }

    pub(crate) fn vertex_index_of(&self, id: &VertexId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn out_edge_indices(&self, id: &VertexId) -> &[usize] {
        self.outgoing.get(id).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn in_edge_indices(&self, id: &VertexId) -> &[usize] {
        self.incoming.get(id).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn find_vertex_indices(&self, query: &VertexQuery) -> Vec<usize> {
        match query {
            VertexQuery::All => (0..self.vertices.len()).collect(),
            VertexQuery::Props(filter) => (0..self.vertices.len())
                .filter(|&ix| props_match(self.vertices[ix].properties(), filter))
                .collect(),
            VertexQuery::Ids(ids) => {
                let mut seen: HashSet<&VertexId> = HashSet::new();
                ids.iter()
                    .filter(|id| seen.insert(id))
                    .filter_map(|id| self.index.get(id).copied())
                    .collect()
            }
        }
    }
}
