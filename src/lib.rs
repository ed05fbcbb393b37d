#![forbid(unsafe_code)]
//! testgate: a build-step test execution gate
//!
//! Given a directory of compiled test artifacts configured through a build
//! description (`testgate.toml`), testgate assembles a classpath, resolves it
//! into an explicit loading context, delegates discovery and execution to a
//! test launcher, prints the execution summary, and fails the build step if
//! any test failed.
//!
//! The adapter itself ([`task::TestTask`]) contains no discovery or execution
//! logic; those live behind the narrow [`launcher::TestLauncher`] seam. The
//! shipped [`launcher::ProcessLauncher`] is the thinnest implementation of
//! that seam: one executable artifact, one test unit.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`.
//!   The `cli` module enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod classpath;
pub mod cli;
pub mod config;
pub mod launcher;
pub mod task;
pub mod version;

pub use classpath::{ClasspathError, ClasspathRoots, LoaderContext};
pub use config::{BuildConfig, ConfigError, SourceSet, TEST_SOURCE_SET};
pub use launcher::{
    ClassNameFilter, DiscoveryRequest, ExecutionListener, ExecutionSummary, LaunchError,
    ProcessLauncher, SummaryListener, TestLauncher, TestPlan,
};
pub use task::{TaskError, TestTask};
