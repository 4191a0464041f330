//! Engine dialect: the owned configuration object a graph's queries run
//! under.
//!
//! A dialect bundles the ordered transformer list, the alias placeholder
//! set, and the engine limits. Every graph owns its own dialect, so
//! independent graphs can carry independent alias and rewrite sets without
//! hidden process-wide state, and rewrite ordering stays deterministic and
//! testable in isolation.

use std::collections::HashSet;
use std::fmt;

use crate::config::EngineConfig;
use crate::query::alias::{self, AliasTarget};
use crate::query::step::Program;
use crate::query::transform::{self, Transformer};

/// Per-graph engine configuration: rewrite rules, aliases, and limits.
pub struct Dialect {
    transformers: Vec<Transformer>,
    placeholders: HashSet<String>,
    config: EngineConfig,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl fmt::Debug for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialect")
            .field("transformers", &self.transformers.len())
            .field("placeholders", &self.placeholders)
            .field("config", &self.config)
            .finish()
    }
}

impl Dialect {
    /// Builds a dialect from an [`EngineConfig`], registering the bundled
    /// pushdown rule and default aliases when enabled.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let mut dialect = Self {
            transformers: Vec::new(),
            placeholders: HashSet::new(),
            config,
        };
        if dialect.config.pushdown_rewrite {
            dialect.add_transformer(50, transform::pushdown_rule);
        }
        if dialect.config.default_aliases {
            alias::register_defaults(&mut dialect);
        }
        dialect
    }

    /// Returns the engine configuration this dialect was built from.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registers a rewrite rule. Higher priorities run earlier; rules of
    /// equal priority run in registration order.
    pub fn add_transformer(
        &mut self,
        priority: i32,
        rewrite: impl Fn(Program) -> Program + Send + Sync + 'static,
    ) {
        transform::insert(
            &mut self.transformers,
            Transformer {
                priority,
                rewrite: Box::new(rewrite),
            },
        );
    }

    /// Registers an alias: a named shorthand rewritten into one or more
    /// concrete steps before execution.
    pub fn add_alias(&mut self, name: &str, target: AliasTarget) {
        alias::register(self, name, target);
    }

    /// Rewrites a program to a fixpoint through every registered rule.
    #[must_use]
    pub fn transform(&self, program: Program) -> Program {
        transform::apply(
            &self.transformers,
            program,
            self.config.max_rewrite_iterations,
        )
    }

    /// True if `name` is a registered alias placeholder (rewritten away
    /// before execution, so it must not trip unrecognized-step handling).
    #[must_use]
    pub fn is_placeholder(&self, name: &str) -> bool {
        self.placeholders.contains(name)
    }

    pub(crate) fn add_placeholder(&mut self, name: &str) {
        self.placeholders.insert(name.to_string());
    }
}
