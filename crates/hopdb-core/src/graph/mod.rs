//! Graph storage: value types, the in-memory store, and the canonical
//! JSON text form.

mod store;
mod types;

pub(crate) mod serialize;

#[cfg(test)]
mod types_tests;

pub use store::{Graph, VertexQuery};
pub use types::{Edge, EdgeSpec, Properties, Vertex, VertexId, VertexSpec};
