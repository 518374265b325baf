//! Loader configuration
//!
//! Read from a TOML file; every key is optional:
//!
//! ```toml
//! loader_set = "switch-only"   # or "default"
//! strict = true                # abort the trace on the first malformed event
//! jobs = 4                     # worker shards
//! ```

use crate::loader::LoaderSet;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How a whole trace is turned into transitions
///
/// # Example
/// ```
/// use schedline::config::LoaderConfig;
/// use schedline::loader::LoaderSet;
///
/// let config = LoaderConfig::default();
/// assert_eq!(config.loader_set, LoaderSet::Default);
/// assert!(!config.strict);
/// assert_eq!(config.jobs, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Which interpreter preset to register
    pub loader_set: LoaderSet,

    /// Treat a malformed event as fatal for the whole trace
    ///
    /// When false, the event is logged, counted, and skipped.
    pub strict: bool,

    /// Number of contiguous shards interpreted in parallel
    pub jobs: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            loader_set: LoaderSet::Default,
            strict: false,
            jobs: 1,
        }
    }
}

impl LoaderConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns error if the file can't be read, isn't valid TOML, or fails
    /// [`validate`](Self::validate).
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read loader config: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid loader config: {}", path.as_ref().display()))
    }

    /// Parse configuration from an in-memory TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse TOML loader configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that can't run
    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            anyhow::bail!("jobs must be at least 1");
        }
        Ok(())
    }
}
