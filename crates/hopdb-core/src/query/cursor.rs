//! Traversal tokens ("gremlins").
//!
//! A cursor is the ephemeral value that moves through the pipeline: the
//! vertex currently visited, a per-branch state bag (label bindings and a
//! depth counter), and an optional computed result set by value-extracting
//! steps. Branch state is cloned into derived cursors, so each branch owns
//! its bindings.

use std::collections::HashMap;

use serde_json::Value;

use crate::graph::{Graph, Vertex};

/// Per-branch traversal state: label → vertex bindings and a depth counter.
#[derive(Debug, Clone, Default)]
pub(crate) struct BranchState {
    /// Bindings made by `as`, keyed by label, holding vertex arena indices.
    pub bindings: HashMap<String, usize>,
    /// Depth counter incremented by `max_depth`.
    pub depth: u64,
}

/// An in-flight traversal token.
#[derive(Debug, Clone)]
pub struct Cursor {
    vertex: usize,
    pub(crate) state: BranchState,
    pub(crate) result: Option<Value>,
}

impl Cursor {
    pub(crate) fn new(vertex: usize, state: BranchState) -> Self {
        Self {
            vertex,
            state,
            result: None,
        }
    }

    /// Derives a cursor at another vertex, carrying this branch's state
    /// forward and dropping any computed result.
    pub(crate) fn to_vertex(&self, vertex: usize) -> Self {
        Self::new(vertex, self.state.clone())
    }

    pub(crate) fn vertex_ix(&self) -> usize {
        self.vertex
    }

    /// Resolves the vertex this cursor currently visits.
    #[must_use]
    pub fn vertex<'g>(&self, graph: &'g Graph) -> &'g Vertex {
        graph.vertex_at(self.vertex)
    }

    /// The branch's depth counter (incremented by `max_depth` passes).
    #[must_use]
    pub fn depth(&self) -> u64 {
        self.state.depth
    }

    /// Resolves the vertex bound to `label` on this branch, if any.
    #[must_use]
    pub fn bound<'g>(&self, graph: &'g Graph, label: &str) -> Option<&'g Vertex> {
        self.state
            .bindings
            .get(label)
            .map(|&ix| graph.vertex_at(ix))
    }
}
