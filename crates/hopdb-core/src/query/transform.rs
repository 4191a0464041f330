//! Program rewrite rules.
//!
//! A transformer is a pure function from program to program with an integer
//! priority (higher runs earlier). Before execution the dialect folds every
//! registered rule over the program in priority order, reapplying each rule
//! to its own output until it stops changing (value-level structural
//! equality on the program) or the iteration cap is hit. Hitting the cap
//! logs a non-convergence error and keeps the last computed rewrite, so a
//! runaway rule degrades instead of halting execution.

use tracing::warn;

use crate::error::Error;

use super::step::Program;

/// A rewrite rule.
pub(crate) struct Transformer {
    pub priority: i32,
    pub rewrite: Box<dyn Fn(Program) -> Program + Send + Sync>,
}

/// Inserts a rule keeping the list sorted by priority, descending.
/// Rules of equal priority stay in registration order.
pub(crate) fn insert(transformers: &mut Vec<Transformer>, transformer: Transformer) {
    let position = transformers
        .iter()
        .position(|t| transformer.priority > t.priority)
        .unwrap_or(transformers.len());
    transformers.insert(position, transformer);
}

/// Folds every rule over `program`, each to a fixpoint capped at
/// `max_iterations`.
pub(crate) fn apply(
    transformers: &[Transformer],
    program: Program,
    max_iterations: usize,
) -> Program {
    transformers.iter().fold(program, |acc, transformer| {
        fixpoint(transformer, acc, max_iterations)
    })
}

fn fixpoint(transformer: &Transformer, program: Program, max_iterations: usize) -> Program {
    let mut previous = program;
    let mut current = (transformer.rewrite)(previous.clone());
    let mut iterations = 0;

    while current != previous && iterations < max_iterations {
        previous = current;
        current = (transformer.rewrite)(previous.clone());
        iterations += 1;
    }

    if iterations >= max_iterations {
        warn!("{}", Error::RewriteNonConvergence(max_iterations));
    }

    current
}

/// The bundled pushdown example: swaps each adjacent `(out, filter)` pair
/// into `(filter, out)` order. Demonstrative — not semantics-preserving for
/// filters whose outcome depends on traversal-introduced state.
pub(crate) fn pushdown_rule(mut program: Program) -> Program {
    for i in (1..program.len()).rev() {
        if program[i].name == "filter" && program[i - 1].name == "out" {
            program.swap(i, i - 1);
        }
    }
    program
}
