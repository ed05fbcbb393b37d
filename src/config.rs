//! Build configuration model
//!
//! The adapter takes no caller-supplied arguments; its single input is the
//! build configuration, a `testgate.toml` file in the project directory that
//! maps source-set names to compiled output directories:
//!
//! ```toml
//! [source-sets.test]
//! output = "target/test-artifacts"
//! ```
//!
//! Only the `test` source set is consumed by the test task, but the model
//! keeps the full map so other tasks can share the same file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// File name of the build configuration, looked up in the project directory.
pub const CONFIG_FILE: &str = "testgate.toml";

/// Name of the conventional test source set.
pub const TEST_SOURCE_SET: &str = "test";

/// Errors raised while loading or querying the build configuration.
///
/// All of these abort the test task before any test runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("build configuration not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read build configuration {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed build configuration {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("no '{0}' source set configured")]
    MissingSourceSet(String),
}

/// A named set of sources with a compiled output directory.
///
/// Relative `output` paths are resolved against the project directory at load
/// time, so a `SourceSet` taken from a loaded [`BuildConfig`] always carries
/// the path the build actually wrote to.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SourceSet {
    /// Directory holding this source set's compiled output
    pub output: PathBuf,
}

/// The build configuration exposed to tasks.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Source sets by name
    #[serde(default)]
    pub source_sets: BTreeMap<String, SourceSet>,
}

impl BuildConfig {
    /// Load the build configuration from `<project_dir>/testgate.toml`.
    #[tracing::instrument(skip_all, fields(project_dir = %project_dir.as_ref().display()))]
    pub fn load(project_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let project_dir = project_dir.as_ref();
        let path = project_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        let contents = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        let mut config: Self = toml::from_str(&contents).map_err(|e| ConfigError::Malformed {
            path: path.clone(),
            message: e.to_string(),
        })?;

        // Anchor relative output dirs to the project, not the process cwd
        for source_set in config.source_sets.values_mut() {
            if source_set.output.is_relative() {
                source_set.output = project_dir.join(&source_set.output);
            }
        }

        tracing::debug!(source_sets = config.source_sets.len(), "loaded build configuration");
        Ok(config)
    }

    /// Parse a build configuration from a TOML string, without path anchoring.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Malformed {
            path: PathBuf::from(CONFIG_FILE),
            message: e.to_string(),
        })
    }

    /// Look up a source set by name.
    pub fn source_set(&self, name: &str) -> Option<&SourceSet> {
        self.source_sets.get(name)
    }

    /// The conventional `test` source set, required by the test task.
    pub fn test_source_set(&self) -> Result<&SourceSet, ConfigError> {
        self.source_set(TEST_SOURCE_SET)
            .ok_or_else(|| ConfigError::MissingSourceSet(TEST_SOURCE_SET.to_string()))
    }

    /// Insert or replace a source set (used by callers assembling a
    /// configuration programmatically instead of from a file).
    pub fn with_source_set(mut self, name: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        self.source_sets.insert(
            name.into(),
            SourceSet {
                output: output.into(),
            },
        );
        self
    }
}
