//! The pipeline virtual machine.
//!
//! A [`Query`] holds an ordered program plus one scratch slot per step.
//! `run()` first asks the graph's dialect to rewrite the program to a
//! fixpoint (expanding aliases, applying optimizations), then drives the
//! pull protocol across the steps: a single token slot moves between
//! adjacent steps under a program counter that walks backward on `Pull`
//! and forward on emission. Tokens falling off the end of the pipeline
//! materialize into the result sequence. This realizes lazy, backtracking,
//! demand-driven evaluation with plain function calls — no coroutines.

use serde_json::Value;

use crate::graph::serialize::vertex_to_value;
use crate::graph::{Graph, VertexId, VertexQuery};

use super::cursor::Cursor;
use super::pipetype::{evaluate, PipeSignal, PipeState};
use super::step::{Arg, EdgeFilter, Program, Step, VertexFilter};

/// A traversal query bound to one graph.
///
/// Built by chaining step methods onto [`Graph::v`], executed with
/// [`Query::run`].
#[derive(Debug)]
pub struct Query<'g> {
    graph: &'g Graph,
    program: Program,
    state: Vec<PipeState>,
}

impl<'g> Query<'g> {
    pub(crate) fn source(graph: &'g Graph, query: VertexQuery) -> Self {
        Self {
            graph,
            program: vec![Step::new("vertex", encode_vertex_query(query))],
            state: Vec::new(),
        }
    }

    /// Appends a step by name — the escape hatch for aliased and uncommon
    /// step names.
    #[must_use]
    pub fn step(mut self, name: &str, args: Vec<Arg>) -> Self {
        self.program.push(Step::new(name, args));
        self
    }

    /// Follows outgoing edges, optionally filtered by label, label list,
    /// or edge-property match.
    #[must_use]
    pub fn out(self, filter: impl Into<EdgeFilter>) -> Self {
        let args = filter.into().into_args();
        self.step("out", args)
    }

    /// Follows incoming edges, optionally filtered like [`Query::out`].
    #[must_use]
    pub fn in_(self, filter: impl Into<EdgeFilter>) -> Self {
        let args = filter.into().into_args();
        self.step("in", args)
    }

    /// Extracts a named property into the result slot; cursors whose
    /// vertex lacks the property are discarded.
    #[must_use]
    pub fn property(self, name: &str) -> Self {
        self.step("property", vec![Arg::Value(Value::String(name.to_string()))])
    }

    /// Keeps only cursors matching the filter; an invalid argument is
    /// logged and fails open.
    #[must_use]
    pub fn filter(self, filter: impl Into<VertexFilter>) -> Self {
        let arg = filter.into().into_arg();
        self.step("filter", vec![arg])
    }

    /// Per-run deduplication by vertex identity.
    #[must_use]
    pub fn unique(self) -> Self {
        self.step("unique", Vec::new())
    }

    /// Passes at most `n` cursors.
    #[must_use]
    pub fn take(self, n: u64) -> Self {
        self.step("take", vec![Arg::Value(Value::from(n))])
    }

    /// Records the current vertex under `label` in this branch's bindings.
    #[must_use]
    pub fn as_(self, label: &str) -> Self {
        self.step("as", vec![Arg::Value(Value::String(label.to_string()))])
    }

    /// Moves the cursor back to the vertex bound to `label` on this branch.
    #[must_use]
    pub fn back(self, label: &str) -> Self {
        self.step("back", vec![Arg::Value(Value::String(label.to_string()))])
    }

    /// Discards the cursor when its vertex equals the one bound to `label`.
    #[must_use]
    pub fn except(self, label: &str) -> Self {
        self.step("except", vec![Arg::Value(Value::String(label.to_string()))])
    }

    /// Emits the vertices bound to each given label on this branch,
    /// skipping unbound labels.
    #[must_use]
    pub fn merge(self, labels: &[&str]) -> Self {
        let args = labels
            .iter()
            .map(|&l| Arg::Value(Value::String(l.to_string())))
            .collect();
        self.step("merge", args)
    }

    /// Discards cursors once their branch depth exceeds `n`.
    #[must_use]
    pub fn max_depth(self, n: u64) -> Self {
        self.step("maxDepth", vec![Arg::Value(Value::from(n))])
    }

    // Built-in alias helpers.

    /// Alias for `out("parent")`.
    #[must_use]
    pub fn parents(self) -> Self {
        self.step("parents", Vec::new())
    }

    /// Alias for `in("parent")`.
    #[must_use]
    pub fn children(self) -> Self {
        self.step("children", Vec::new())
    }

    /// Alias for `out("sibling")`.
    #[must_use]
    pub fn siblings(self) -> Self {
        self.step("siblings", Vec::new())
    }

    /// Alias for `out("spouse")`.
    #[must_use]
    pub fn spouse(self) -> Self {
        self.step("spouse", Vec::new())
    }

    /// The current program (rewritten in place by [`Query::run`]).
    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Rewrites the program through the dialect, then drives the pull
    /// protocol to produce the ordered result sequence: property results
    /// where a step computed one, whole-vertex values otherwise.
    pub fn run(&mut self) -> Vec<Value> {
        self.program = self.graph.dialect().transform(std::mem::take(&mut self.program));

        // Scratch is scoped to one run; a re-run starts clean.
        self.state.clear();
        self.state.resize_with(self.program.len(), PipeState::default);

        if self.program.is_empty() {
            return Vec::new();
        }

        let max = self.program.len() - 1;
        let mut results: Vec<Cursor> = Vec::new();
        let mut slot: Option<Cursor> = None;
        let mut pc = max;
        // One past the highest step known permanently exhausted.
        let mut done = 0;

        while done <= max {
            let step = &self.program[pc];
            let signal = evaluate(
                self.graph,
                self.graph.dialect(),
                step,
                slot.take(),
                &mut self.state[pc],
            );

            match signal {
                PipeSignal::Pull => {
                    if pc > done {
                        // Ask the step upstream for another input.
                        pc -= 1;
                        continue;
                    }
                    // Nothing unexhausted upstream: this step is spent too.
                    done = pc + 1;
                }
                PipeSignal::Done => {
                    done = pc + 1;
                }
                PipeSignal::Emit(cursor) => {
                    slot = Some(cursor);
                }
                PipeSignal::Empty => {}
            }

            pc += 1;
            if pc > max {
                // The token fell off the end of the pipeline.
                if let Some(cursor) = slot.take() {
                    results.push(cursor);
                }
                pc = max;
            }
        }

        results
            .into_iter()
            .map(|cursor| {
                cursor
                    .result
                    .clone()
                    .unwrap_or_else(|| vertex_to_value(cursor.vertex(self.graph)))
            })
            .collect()
    }
}

fn encode_vertex_query(query: VertexQuery) -> Vec<Arg> {
    match query {
        VertexQuery::All => Vec::new(),
        VertexQuery::Ids(ids) => ids
            .into_iter()
            .map(|id| match id {
                VertexId::Int(n) => Arg::Value(Value::from(n)),
                VertexId::Text(s) => Arg::Value(Value::String(s)),
            })
            .collect(),
        VertexQuery::Props(props) => vec![Arg::Value(Value::Object(
            props.into_iter().collect(),
        ))],
    }
}
