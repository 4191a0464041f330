//! Alias expansion on top of the transformer registry.
//!
//! An alias is a named shorthand rewritten into concrete steps before
//! execution. A single-step alias carries default arguments used when the
//! alias step was given none; a sequence alias splices a fixed sub-sequence
//! in place of the alias step (and ignores any arguments on it). Alias
//! rewrites run at priority 100, ahead of the optimization rules, and the
//! alias name joins the dialect's placeholder set so an unrewritten alias
//! step never trips the unrecognized-step handling.

use serde_json::json;

use crate::dialect::Dialect;

use super::step::{Arg, Step};

/// What an alias expands to.
#[derive(Debug, Clone)]
pub enum AliasTarget {
    /// One concrete step, with defaults substituted when the alias step was
    /// given no explicit arguments.
    Step {
        /// The concrete step name.
        name: String,
        /// Arguments used when the alias step carries none.
        defaults: Vec<Arg>,
    },
    /// A fixed sub-sequence spliced in place of the alias step.
    Sequence(Vec<Step>),
}

impl AliasTarget {
    /// Convenience constructor for a single-step target.
    #[must_use]
    pub fn step(name: &str, defaults: Vec<Arg>) -> Self {
        Self::Step {
            name: name.to_string(),
            defaults,
        }
    }
}

/// Priority for alias-expansion transformers: ahead of optimizations.
pub(crate) const ALIAS_PRIORITY: i32 = 100;

pub(crate) fn register(dialect: &mut Dialect, alias: &str, target: AliasTarget) {
    let alias = alias.to_string();
    dialect.add_placeholder(&alias);
    match target {
        AliasTarget::Step { name, defaults } => {
            dialect.add_transformer(ALIAS_PRIORITY, move |program| {
                program
                    .into_iter()
                    .map(|step| {
                        if step.name == alias {
                            let args = if step.args.is_empty() {
                                defaults.clone()
                            } else {
                                step.args
                            };
                            Step::new(&name, args)
                        } else {
                            step
                        }
                    })
                    .collect()
            });
        }
        AliasTarget::Sequence(steps) => {
            dialect.add_transformer(ALIAS_PRIORITY, move |program| {
                program
                    .into_iter()
                    .flat_map(|step| {
                        if step.name == alias {
                            steps.clone()
                        } else {
                            vec![step]
                        }
                    })
                    .collect()
            });
        }
    }
}

/// Registers the family-relationship aliases shipped by default.
pub(crate) fn register_defaults(dialect: &mut Dialect) {
    register(
        dialect,
        "parents",
        AliasTarget::step("out", vec![Arg::Value(json!("parent"))]),
    );
    register(
        dialect,
        "children",
        AliasTarget::step("in", vec![Arg::Value(json!("parent"))]),
    );
    register(
        dialect,
        "siblings",
        AliasTarget::step("out", vec![Arg::Value(json!("sibling"))]),
    );
    register(
        dialect,
        "spouse",
        AliasTarget::step("out", vec![Arg::Value(json!("spouse"))]),
    );
}
