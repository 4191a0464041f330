//! Program representation: named steps with argument lists.
//!
//! Programs are values. Rewrite rules copy and replace them, never mutate
//! them behind a caller's back, and convergence checking relies on the
//! value-level `PartialEq` implemented here. Predicate arguments cannot be
//! compared structurally, so they compare by closure identity.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::graph::{Properties, Vertex};

use super::cursor::Cursor;

/// A caller-supplied vertex predicate for the `filter` step.
pub type Predicate = Arc<dyn Fn(&Vertex, &Cursor) -> bool + Send + Sync>;

/// One step argument: a JSON value (ids, labels, counts, property-match
/// objects) or an opaque predicate.
#[derive(Clone)]
pub enum Arg {
    /// A structured value argument.
    Value(Value),
    /// A predicate over the cursor's vertex. Compares by identity.
    Predicate(Predicate),
}

impl Arg {
    /// Returns the argument as a string, if it is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(v) => v.as_str(),
            Self::Predicate(_) => None,
        }
    }

    /// Returns the argument as an unsigned integer, if it is one.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Value(v) => v.as_u64(),
            Self::Predicate(_) => None,
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Predicate(_) => write!(f, "<predicate>"),
        }
    }
}

impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Predicate(a), Self::Predicate(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// One traversal operation: a step name plus its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// The step name, resolved through the step-kind lookup at run time.
    pub name: String,
    /// The step arguments.
    pub args: Vec<Arg>,
}

impl Step {
    /// Creates a step.
    #[must_use]
    pub fn new(name: &str, args: Vec<Arg>) -> Self {
        Self {
            name: name.to_string(),
            args,
        }
    }
}

/// An ordered sequence of steps forming one query.
pub type Program = Vec<Step>;

/// Edge selection for the `out`/`in` traversal steps.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeFilter {
    /// Follow every edge.
    Any,
    /// Follow edges with exactly this label.
    Label(String),
    /// Follow edges whose label is in this list.
    Labels(Vec<String>),
    /// Follow edges whose listed properties equal the given values.
    Props(Properties),
}

impl From<()> for EdgeFilter {
    fn from((): ()) -> Self {
        Self::Any
    }
}

impl From<&str> for EdgeFilter {
    fn from(label: &str) -> Self {
        Self::Label(label.to_string())
    }
}

impl From<&[&str]> for EdgeFilter {
    fn from(labels: &[&str]) -> Self {
        Self::Labels(labels.iter().map(|&l| l.to_string()).collect())
    }
}

impl From<Vec<String>> for EdgeFilter {
    fn from(labels: Vec<String>) -> Self {
        Self::Labels(labels)
    }
}

impl From<Properties> for EdgeFilter {
    fn from(props: Properties) -> Self {
        Self::Props(props)
    }
}

impl EdgeFilter {
    /// Encodes this filter as step arguments.
    pub(crate) fn into_args(self) -> Vec<Arg> {
        match self {
            Self::Any => Vec::new(),
            Self::Label(l) => vec![Arg::Value(Value::String(l))],
            Self::Labels(ls) => vec![Arg::Value(Value::Array(
                ls.into_iter().map(Value::String).collect(),
            ))],
            Self::Props(props) => vec![Arg::Value(Value::Object(
                props.into_iter().collect(),
            ))],
        }
    }
}

/// Vertex selection for the `filter` step: a property-match object or a
/// caller predicate.
#[derive(Clone)]
pub enum VertexFilter {
    /// Keep vertices whose listed properties equal the given values.
    Props(Properties),
    /// Keep vertices the predicate accepts.
    Where(Predicate),
}

impl From<Properties> for VertexFilter {
    fn from(props: Properties) -> Self {
        Self::Props(props)
    }
}

impl VertexFilter {
    /// Wraps a closure as a predicate filter.
    pub fn matching(f: impl Fn(&Vertex, &Cursor) -> bool + Send + Sync + 'static) -> Self {
        Self::Where(Arc::new(f))
    }

    pub(crate) fn into_arg(self) -> Arg {
        match self {
            Self::Props(props) => Arg::Value(Value::Object(props.into_iter().collect())),
            Self::Where(pred) => Arg::Predicate(pred),
        }
    }
}
