//! Classpath roots and the explicit loading context
//!
//! A classpath root is a filesystem location scanned for loadable compiled
//! artifacts. [`ClasspathRoots`] is the unique, unordered set of such
//! locations assembled fresh for one task invocation; [`LoaderContext`] is the
//! resolved form of that set, built once and passed by reference into
//! discovery and execution.
//!
//! ## Design
//!
//! The context is an explicit value, not thread-ambient state. Nothing here
//! mutates global or thread-local state, so callers observe the same ambient
//! environment before and after a task run on every exit path.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while resolving classpath roots into a loading context.
///
/// All of these abort the test task before any test runs.
#[derive(Debug, Error)]
pub enum ClasspathError {
    #[error("invalid classpath entry: {0} does not exist")]
    MissingRoot(PathBuf),

    #[error("invalid classpath entry: {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("invalid classpath entry {path}: {source}")]
    Unresolvable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A unique, unordered set of classpath root directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClasspathRoots {
    roots: BTreeSet<PathBuf>,
}

impl ClasspathRoots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root to the set. Duplicate paths collapse to one entry.
    pub fn add(&mut self, root: impl Into<PathBuf>) {
        self.roots.insert(root.into());
    }

    /// Number of distinct roots.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Iterate the roots in deterministic (path) order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.roots.iter().map(PathBuf::as_path)
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for ClasspathRoots {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            roots: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// An explicit loading context: the validated, canonicalized search path used
/// to locate compiled artifacts for one discovery-and-execution cycle.
#[derive(Debug, Clone)]
pub struct LoaderContext {
    search_path: Vec<PathBuf>,
}

impl LoaderContext {
    /// Resolve a root set into a loading context.
    ///
    /// Every root must resolve to an existing directory; the first root that
    /// does not yields a [`ClasspathError`] and no context is built.
    #[tracing::instrument(skip_all, fields(roots = roots.len()))]
    pub fn resolve(roots: &ClasspathRoots) -> Result<Self, ClasspathError> {
        let mut search_path = Vec::with_capacity(roots.len());

        for root in roots.iter() {
            if !root.exists() {
                return Err(ClasspathError::MissingRoot(root.to_path_buf()));
            }
            if !root.is_dir() {
                return Err(ClasspathError::NotADirectory(root.to_path_buf()));
            }
            let resolved = root
                .canonicalize()
                .map_err(|e| ClasspathError::Unresolvable {
                    path: root.to_path_buf(),
                    source: e,
                })?;
            search_path.push(resolved);
        }

        tracing::debug!(entries = search_path.len(), "resolved loading context");
        Ok(Self { search_path })
    }

    /// The resolved search path, in deterministic order.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }
}
