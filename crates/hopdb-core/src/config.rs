//! Engine configuration.
//!
//! `EngineConfig` is layered through figment: hard-coded defaults, then an
//! optional `hopdb.toml` in the working directory, then `HOPDB_`-prefixed
//! environment variables. Each layer overrides the previous one.

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE: &str = "hopdb.toml";

/// Tunable knobs for a graph's engine dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cap on fixpoint iterations per rewrite rule. When a rule is still
    /// changing its output at the cap, the last computed rewrite is used
    /// and the non-convergence is logged.
    pub max_rewrite_iterations: usize,
    /// Register the built-in aliases (`parents`, `children`, `siblings`,
    /// `spouse`) on new dialects.
    pub default_aliases: bool,
    /// Register the demonstrative `(out, filter)` → `(filter, out)` pushdown
    /// rewrite. Not guaranteed semantics-preserving for filters that depend
    /// on traversal order.
    pub pushdown_rewrite: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rewrite_iterations: 100,
            default_aliases: true,
            pushdown_rewrite: true,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from defaults, `hopdb.toml`, and `HOPDB_*`
    /// environment variables, in increasing priority.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a layer is present but malformed.
    pub fn load() -> Result<Self> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("HOPDB_"))
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Loads configuration from an explicit TOML file layered over defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file is missing or malformed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }
}
