//! Error types for the hopdb engine.
//!
//! Mutation failures (`DuplicateVertexId`, `MissingEdgeEndpoint`) surface as
//! `Err` values and leave the graph untouched. Query-time anomalies
//! (`UnrecognizedStep`, `InvalidFilterArgument`, `RewriteNonConvergence`)
//! are logged through `tracing` and the pipeline fails open — execution
//! continues with degraded behavior instead of aborting. That posture is a
//! deliberate availability-over-strictness tradeoff.

use thiserror::Error;

use crate::graph::VertexId;

/// Which endpoint of an edge failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSide {
    /// The edge's source vertex.
    Source,
    /// The edge's target vertex.
    Target,
}

impl std::fmt::Display for EndpointSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Engine error types.
#[derive(Error, Debug)]
pub enum Error {
    /// A vertex with the given ID is already present in the graph.
    #[error("a vertex with id {0} already exists")]
    DuplicateVertexId(VertexId),

    /// An edge referenced an endpoint that is not in the graph.
    #[error("that edge's {side} vertex {id} wasn't found")]
    MissingEdgeEndpoint {
        /// Which side of the edge failed to resolve.
        side: EndpointSide,
        /// The unresolved vertex ID.
        id: VertexId,
    },

    /// A program step name resolved to no known evaluator.
    #[error("unrecognized step: {0}")]
    UnrecognizedStep(String),

    /// A `filter` step was given an argument that is neither a
    /// property-match object nor a predicate.
    #[error("invalid filter argument: {0}")]
    InvalidFilterArgument(String),

    /// A rewrite rule failed to reach a fixpoint within the iteration cap.
    #[error("rewrite did not converge after {0} iterations")]
    RewriteNonConvergence(usize),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A canonical graph document was structurally malformed.
    #[error("invalid graph document: {0}")]
    InvalidDocument(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
