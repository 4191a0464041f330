//! The traversal query engine: program representation, cursors, step
//! evaluators, the pipeline VM, rewrite rules, and alias expansion.

pub(crate) mod alias;
mod cursor;
mod pipeline;
pub(crate) mod pipetype;
pub(crate) mod step;
pub(crate) mod transform;

#[cfg(test)]
mod alias_tests;
#[cfg(test)]
mod pipetype_tests;
#[cfg(test)]
mod transform_tests;

pub use alias::AliasTarget;
pub use cursor::Cursor;
pub use pipeline::Query;
pub use step::{Arg, EdgeFilter, Predicate, Program, Step, VertexFilter};
