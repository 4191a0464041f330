//! Step evaluators implementing the pull protocol.
//!
//! Each evaluator is a pure function of the graph, the step's arguments, the
//! incoming token (or absence), and that step's own scratch state. It answers
//! with one of four signals: a cursor to hand downstream, `Empty` (advance
//! with nothing — the discarded-token sentinel), `Pull` (ask upstream for
//! another input), or `Done` (permanently exhausted).
//!
//! Step kinds form a closed enumeration dispatched by name; names that
//! resolve to no kind and are not alias placeholders log an unrecognized-step
//! error and act as a pass-through, so execution never aborts on a bad name.

use std::collections::{HashSet, VecDeque};

use serde_json::{Map, Value};
use tracing::warn;

use crate::dialect::Dialect;
use crate::error::Error;
use crate::graph::{Edge, Graph, Properties, VertexQuery};

use super::cursor::{BranchState, Cursor};
use super::step::{Arg, EdgeFilter, Step};

/// What one evaluator invocation tells the driver.
#[derive(Debug)]
pub(crate) enum PipeSignal {
    /// A token to hand downstream.
    Emit(Cursor),
    /// No token, but advance anyway (a discarded input).
    Empty,
    /// Ask the step upstream for another input.
    Pull,
    /// This step will never produce output again.
    Done,
}

/// The closed set of built-in step kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepKind {
    Vertex,
    Out,
    In,
    Property,
    Unique,
    Filter,
    Take,
    As,
    Back,
    Except,
    Merge,
    MaxDepth,
}

impl StepKind {
    /// Resolves a step name to its kind.
    pub(crate) fn lookup(name: &str) -> Option<Self> {
        match name {
            "vertex" => Some(Self::Vertex),
            "out" => Some(Self::Out),
            "in" => Some(Self::In),
            "property" => Some(Self::Property),
            "unique" => Some(Self::Unique),
            "filter" => Some(Self::Filter),
            "take" => Some(Self::Take),
            "as" => Some(Self::As),
            "back" => Some(Self::Back),
            "except" => Some(Self::Except),
            "merge" => Some(Self::Merge),
            "maxDepth" => Some(Self::MaxDepth),
            _ => None,
        }
    }
}

/// Per-step scratch state, created on first touch and scoped to one `run()`.
#[derive(Debug, Default)]
pub(crate) enum PipeState {
    /// Not yet touched this run.
    #[default]
    Untouched,
    /// `vertex` source: vertices still to emit.
    Source { pending: VecDeque<usize> },
    /// `out`/`in`: the cursor being fanned out and its remaining edges.
    Traverse {
        cursor: Option<Cursor>,
        edges: VecDeque<usize>,
    },
    /// `unique`: vertex indices already passed.
    Unique { seen: HashSet<usize> },
    /// `take`: cursors passed so far.
    Take { taken: u64 },
    /// `merge`: bound vertices still to emit and the branch state to carry.
    Merge {
        pending: VecDeque<usize>,
        state: BranchState,
    },
}

/// Traversal direction for `out`/`in`.
#[derive(Debug, Clone, Copy)]
enum Direction {
    Out,
    In,
}

/// Evaluates one step against the incoming token and its scratch state.
pub(crate) fn evaluate(
    graph: &Graph,
    dialect: &Dialect,
    step: &Step,
    input: Option<Cursor>,
    state: &mut PipeState,
) -> PipeSignal {
    match StepKind::lookup(&step.name) {
        Some(StepKind::Vertex) => source(graph, &step.args, input, state),
        Some(StepKind::Out) => traverse(graph, &step.args, input, state, Direction::Out),
        Some(StepKind::In) => traverse(graph, &step.args, input, state, Direction::In),
        Some(StepKind::Property) => property(graph, &step.args, input),
        Some(StepKind::Unique) => unique(input, state),
        Some(StepKind::Filter) => filter(graph, &step.args, input),
        Some(StepKind::Take) => take(&step.args, input, state),
        Some(StepKind::As) => tag(&step.args, input),
        Some(StepKind::Back) => back(&step.args, input),
        Some(StepKind::Except) => except(&step.args, input),
        Some(StepKind::Merge) => merge(&step.args, input, state),
        Some(StepKind::MaxDepth) => max_depth(&step.args, input),
        None => {
            if !dialect.is_placeholder(&step.name) {
                warn!("{}", Error::UnrecognizedStep(step.name.clone()));
            }
            // Pass-through: forward the token, else ask upstream.
            input.map_or(PipeSignal::Pull, PipeSignal::Emit)
        }
    }
}

// ── Source ─────────────────────────────────────────────────────────────

fn source(
    graph: &Graph,
    args: &[Arg],
    input: Option<Cursor>,
    state: &mut PipeState,
) -> PipeSignal {
    if matches!(state, PipeState::Untouched) {
        let pending = graph.find_vertex_indices(&vertex_query(args)).into();
        *state = PipeState::Source { pending };
    }
    let PipeState::Source { pending } = state else {
        return PipeSignal::Done;
    };
    match pending.pop_front() {
        Some(ix) => {
            // Seed the new branch with the incoming token's state, if any.
            let seed = input.map(|c| c.state).unwrap_or_default();
            PipeSignal::Emit(Cursor::new(ix, seed))
        }
        None => PipeSignal::Done,
    }
}

fn vertex_query(args: &[Arg]) -> VertexQuery {
    if args.is_empty() {
        return VertexQuery::All;
    }
    if let Arg::Value(Value::Object(obj)) = &args[0] {
        return VertexQuery::Props(object_to_props(obj));
    }
    let ids = args
        .iter()
        .filter_map(|arg| match arg {
            Arg::Value(Value::Number(n)) => n.as_u64().map(Into::into),
            Arg::Value(Value::String(s)) => Some(s.as_str().into()),
            _ => None,
        })
        .collect();
    VertexQuery::Ids(ids)
}

// ── Directional traversal ──────────────────────────────────────────────

fn traverse(
    graph: &Graph,
    args: &[Arg],
    input: Option<Cursor>,
    state: &mut PipeState,
    direction: Direction,
) -> PipeSignal {
    if matches!(state, PipeState::Untouched) {
        *state = PipeState::Traverse {
            cursor: None,
            edges: VecDeque::new(),
        };
    }
    let PipeState::Traverse { cursor, edges } = state else {
        return PipeSignal::Pull;
    };

    if edges.is_empty() {
        // Fan out a fresh cursor: cache its matching edges.
        let Some(incoming) = input else {
            return PipeSignal::Pull;
        };
        let sel = edge_filter(args);
        let id = incoming.vertex(graph).id();
        let candidates = match direction {
            Direction::Out => graph.out_edge_indices(id),
            Direction::In => graph.in_edge_indices(id),
        };
        edges.extend(
            candidates
                .iter()
                .copied()
                .filter(|&ix| edge_matches(graph.edge_at(ix), &sel)),
        );
        *cursor = Some(incoming);
        if edges.is_empty() {
            return PipeSignal::Pull;
        }
    }

    let Some(eix) = edges.pop_front() else {
        return PipeSignal::Pull;
    };
    let Some(base) = cursor.as_ref() else {
        return PipeSignal::Pull;
    };
    let edge = graph.edge_at(eix);
    let next = match direction {
        Direction::Out => edge.target(),
        Direction::In => edge.source(),
    };
    match graph.vertex_index_of(next) {
        Some(ix) => PipeSignal::Emit(base.to_vertex(ix)),
        // Unreachable under the endpoint invariant; degrade to a pull.
        None => PipeSignal::Pull,
    }
}

fn edge_filter(args: &[Arg]) -> EdgeFilter {
    match args.first() {
        None | Some(Arg::Value(Value::Null)) => EdgeFilter::Any,
        Some(Arg::Value(Value::String(label))) => EdgeFilter::Label(label.clone()),
        Some(Arg::Value(Value::Array(labels))) => EdgeFilter::Labels(
            labels
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect(),
        ),
        Some(Arg::Value(Value::Object(obj))) => EdgeFilter::Props(object_to_props(obj)),
        Some(_) => EdgeFilter::Any,
    }
}

fn edge_matches(edge: &Edge, filter: &EdgeFilter) -> bool {
    match filter {
        EdgeFilter::Any => true,
        EdgeFilter::Label(label) => edge.label() == label,
        EdgeFilter::Labels(labels) => labels.iter().any(|l| l == edge.label()),
        EdgeFilter::Props(props) => props
            .iter()
            .all(|(key, want)| edge.property(key) == Some(want)),
    }
}

// ── Value extraction and filtering ─────────────────────────────────────

fn property(graph: &Graph, args: &[Arg], input: Option<Cursor>) -> PipeSignal {
    let Some(mut cursor) = input else {
        return PipeSignal::Pull;
    };
    let value = args
        .first()
        .and_then(Arg::as_str)
        .and_then(|key| cursor.vertex(graph).property(key))
        .cloned();
    match value {
        // Absent (or null) properties discard the token rather than emit.
        None | Some(Value::Null) => PipeSignal::Empty,
        Some(value) => {
            cursor.result = Some(value);
            PipeSignal::Emit(cursor)
        }
    }
}

fn unique(input: Option<Cursor>, state: &mut PipeState) -> PipeSignal {
    if matches!(state, PipeState::Untouched) {
        *state = PipeState::Unique {
            seen: HashSet::new(),
        };
    }
    let PipeState::Unique { seen } = state else {
        return PipeSignal::Pull;
    };
    let Some(cursor) = input else {
        return PipeSignal::Pull;
    };
    if seen.insert(cursor.vertex_ix()) {
        PipeSignal::Emit(cursor)
    } else {
        PipeSignal::Pull
    }
}

fn filter(graph: &Graph, args: &[Arg], input: Option<Cursor>) -> PipeSignal {
    let Some(cursor) = input else {
        return PipeSignal::Pull;
    };
    match args.first() {
        Some(Arg::Value(Value::Object(obj))) => {
            if props_match_object(cursor.vertex(graph).properties(), obj) {
                PipeSignal::Emit(cursor)
            } else {
                PipeSignal::Pull
            }
        }
        Some(Arg::Predicate(pred)) => {
            if pred(cursor.vertex(graph), &cursor) {
                PipeSignal::Emit(cursor)
            } else {
                PipeSignal::Pull
            }
        }
        other => {
            // Fail open: log and pass the cursor through unfiltered.
            warn!(
                "{}",
                Error::InvalidFilterArgument(
                    other.map_or_else(|| "missing".to_string(), |arg| format!("{arg:?}"))
                )
            );
            PipeSignal::Emit(cursor)
        }
    }
}

fn take(args: &[Arg], input: Option<Cursor>, state: &mut PipeState) -> PipeSignal {
    if matches!(state, PipeState::Untouched) {
        *state = PipeState::Take { taken: 0 };
    }
    let PipeState::Take { taken } = state else {
        return PipeSignal::Pull;
    };
    let Some(cursor) = input else {
        return PipeSignal::Pull;
    };
    let limit = args.first().and_then(Arg::as_u64).unwrap_or(0);
    if *taken < limit {
        *taken += 1;
        PipeSignal::Emit(cursor)
    } else {
        // The counter resets on exhaustion so a fresh execution of this
        // program position starts counting from zero again.
        *taken = 0;
        PipeSignal::Done
    }
}

// ── Branch labeling ────────────────────────────────────────────────────

fn tag(args: &[Arg], input: Option<Cursor>) -> PipeSignal {
    let Some(mut cursor) = input else {
        return PipeSignal::Pull;
    };
    match args.first().and_then(Arg::as_str) {
        Some(label) => {
            let ix = cursor.vertex_ix();
            cursor.state.bindings.insert(label.to_string(), ix);
            PipeSignal::Emit(cursor)
        }
        None => {
            warn!("as: missing label argument");
            PipeSignal::Emit(cursor)
        }
    }
}

fn back(args: &[Arg], input: Option<Cursor>) -> PipeSignal {
    let Some(cursor) = input else {
        return PipeSignal::Pull;
    };
    let bound = args
        .first()
        .and_then(Arg::as_str)
        .and_then(|label| cursor.state.bindings.get(label).copied());
    match bound {
        Some(ix) => PipeSignal::Emit(cursor.to_vertex(ix)),
        None => {
            warn!("back: label not bound on this branch, discarding cursor");
            PipeSignal::Pull
        }
    }
}

fn except(args: &[Arg], input: Option<Cursor>) -> PipeSignal {
    let Some(cursor) = input else {
        return PipeSignal::Pull;
    };
    let bound = args
        .first()
        .and_then(Arg::as_str)
        .and_then(|label| cursor.state.bindings.get(label).copied());
    if bound == Some(cursor.vertex_ix()) {
        PipeSignal::Pull
    } else {
        PipeSignal::Emit(cursor)
    }
}

fn merge(args: &[Arg], input: Option<Cursor>, state: &mut PipeState) -> PipeSignal {
    if matches!(state, PipeState::Untouched) {
        *state = PipeState::Merge {
            pending: VecDeque::new(),
            state: BranchState::default(),
        };
    }
    let PipeState::Merge {
        pending,
        state: saved,
    } = state
    else {
        return PipeSignal::Pull;
    };

    if pending.is_empty() {
        let Some(incoming) = input else {
            return PipeSignal::Pull;
        };
        for arg in args {
            if let Some(label) = arg.as_str() {
                // Unbound labels are skipped.
                if let Some(&ix) = incoming.state.bindings.get(label) {
                    pending.push_back(ix);
                }
            }
        }
        *saved = incoming.state;
        if pending.is_empty() {
            return PipeSignal::Pull;
        }
    }

    match pending.pop_front() {
        Some(ix) => PipeSignal::Emit(Cursor::new(ix, saved.clone())),
        None => PipeSignal::Pull,
    }
}

fn max_depth(args: &[Arg], input: Option<Cursor>) -> PipeSignal {
    let Some(mut cursor) = input else {
        return PipeSignal::Pull;
    };
    let limit = args.first().and_then(Arg::as_u64).unwrap_or(0);
    cursor.state.depth += 1;
    if cursor.state.depth > limit {
        PipeSignal::Pull
    } else {
        PipeSignal::Emit(cursor)
    }
}

// ── Shared helpers ─────────────────────────────────────────────────────

fn object_to_props(obj: &Map<String, Value>) -> Properties {
    obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

fn props_match_object(props: &Properties, filter: &Map<String, Value>) -> bool {
    filter.iter().all(|(key, want)| props.get(key) == Some(want))
}
