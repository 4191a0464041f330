//! # hopdb Core
//!
//! An embedded, in-memory, directed-multigraph database with a lazy,
//! composable traversal query pipeline.
//!
//! hopdb serves applications that model relationship data — org charts,
//! dependency graphs, social graphs — and want to query it with chained
//! traversal steps, without running a separate database process.
//!
//! ## Quick Start
//!
//! ```rust
//! use hopdb_core::{Graph, VertexSpec, EdgeSpec};
//! use serde_json::json;
//!
//! let mut g = Graph::new();
//! g.add_vertex(VertexSpec::new().with_id("thor").with_property("name", json!("Thor"))).unwrap();
//! g.add_vertex(VertexSpec::new().with_id("odin").with_property("name", json!("Odin"))).unwrap();
//! g.add_edge(EdgeSpec::new("thor", "odin", "parent")).unwrap();
//!
//! let names = g.v("thor").out("parent").property("name").run();
//! assert_eq!(names, vec![json!("Odin")]);
//! ```
//!
//! ## Design
//!
//! - **Lazy pull pipeline**: each step produces work only when its
//!   downstream neighbor demands it, realized with explicit pointer
//!   movement rather than coroutines.
//! - **Program rewriting**: aliases and optimizations are transformer
//!   rules applied to a fixpoint (with an iteration cap) before execution.
//! - **Owned dialects**: every graph carries its own step/alias/rewrite
//!   configuration — there is no process-wide mutable registry.
//! - **Fail open**: query-time anomalies are logged and degrade gracefully;
//!   mutation failures return typed errors and leave the graph unchanged.
//!
//! Single-threaded by design: a graph has one logical owner, and the borrow
//! checker keeps mutation and in-flight traversals apart.

#![warn(missing_docs)]

pub mod config;
pub mod dialect;
pub mod error;
pub mod graph;
pub mod query;


pub use config::EngineConfig;
pub use dialect::Dialect;
pub use error::{EndpointSide, Error, Result};
pub use graph::{Edge, EdgeSpec, Graph, Properties, Vertex, VertexId, VertexQuery, VertexSpec};
pub use query::{AliasTarget, Arg, Cursor, EdgeFilter, Predicate, Program, Query, Step, VertexFilter};
