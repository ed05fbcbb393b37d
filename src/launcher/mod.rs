//! Test launcher seam
//!
//! This module defines the narrow interface between the test task and
//! whatever actually discovers and runs tests:
//!
//! - [`TestLauncher`] - two operations, `discover` and `execute`
//! - [`DiscoveryRequest`] - selectors (where to look) and filters (what counts)
//! - [`ExecutionListener`] - per-test callbacks during a run
//! - [`SummaryListener`] / [`ExecutionSummary`] - aggregate result collection
//!
//! The task stays free of discovery and execution detail; alternative
//! launchers (remote execution, dry-run, a richer harness) implement the same
//! trait without touching the adapter.

pub mod filter;
pub mod process;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::classpath::LoaderContext;

pub use filter::{ClassNameFilter, STANDARD_INCLUDE_PATTERN};
pub use process::ProcessLauncher;

/// Errors raised by a launcher implementation.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("test discovery failed: {0}")]
    Discovery(String),

    #[error("test execution failed: {0}")]
    Execution(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Discovery request
// ============================================================================

/// A specification of where to look for tests and what counts as one.
///
/// Built by the task for each invocation: the loading context supplies the
/// classpath roots as discovery sources, the filter narrows discovered
/// artifacts to the test naming convention.
#[derive(Debug)]
pub struct DiscoveryRequest<'ctx> {
    context: &'ctx LoaderContext,
    filter: ClassNameFilter,
}

impl<'ctx> DiscoveryRequest<'ctx> {
    /// Start a request selecting the given loading context's classpath roots.
    /// The filter defaults to the standard include pattern.
    pub fn for_context(context: &'ctx LoaderContext) -> Self {
        Self {
            context,
            filter: ClassNameFilter::standard(),
        }
    }

    /// Replace the name filter.
    #[must_use]
    pub fn with_filter(mut self, filter: ClassNameFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn context(&self) -> &LoaderContext {
        self.context
    }

    pub fn filter(&self) -> &ClassNameFilter {
        &self.filter
    }
}

// ============================================================================
// Test plan
// ============================================================================

/// One discovered test unit: an artifact on the classpath that the launcher
/// knows how to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestEntry {
    /// Stable identifier (artifact path relative to its classpath root)
    pub id: String,
    /// Display name (artifact file stem)
    pub name: String,
    /// Absolute path to the artifact
    pub artifact: PathBuf,
}

/// The result of discovery: the set of test units to execute.
///
/// Each entry is its own container in summary terms; the default launcher has
/// no sub-unit structure to report.
#[derive(Debug, Clone, Default)]
pub struct TestPlan {
    entries: Vec<TestEntry>,
}

impl TestPlan {
    pub fn new(entries: Vec<TestEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Execution listener
// ============================================================================

/// Outcome of one executed test unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Passed(Duration),
    Failed(Duration, String),
    Skipped(String),
}

/// Callbacks fired by a launcher during execution.
///
/// Default no-op implementations let listeners subscribe to only the events
/// they care about.
pub trait ExecutionListener {
    /// Called once before the first test runs.
    fn on_plan_started(&mut self, _plan: &TestPlan) {}

    /// Called when a test unit starts.
    fn on_test_started(&mut self, _test: &TestEntry) {}

    /// Called when a test unit finishes (or is skipped).
    fn on_test_finished(&mut self, test: &TestEntry, outcome: &TestOutcome);

    /// Called once after the last test finishes.
    fn on_plan_finished(&mut self, _plan: &TestPlan) {}
}

// ============================================================================
// Launcher trait
// ============================================================================

/// The external launcher capability: discover test units, then execute them.
///
/// Both operations are synchronous and blocking. The launcher reports
/// individual outcomes through the listener; a `LaunchError` from `execute`
/// means the run itself broke, not that a test failed.
pub trait TestLauncher {
    /// Locate test units per the request's selectors and filters.
    fn discover(&self, request: &DiscoveryRequest<'_>) -> Result<TestPlan, LaunchError>;

    /// Execute every unit in the plan, reporting outcomes to the listener.
    fn execute(
        &self,
        plan: &TestPlan,
        listener: &mut dyn ExecutionListener,
    ) -> Result<(), LaunchError>;
}

// ============================================================================
// Summary collection
// ============================================================================

/// Details for one failed test unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFailure {
    pub test_name: String,
    pub message: String,
}

/// Aggregate pass/fail/skip counts and details for one
/// discovery-and-execution cycle. Immutable once produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    containers_found: u64,
    tests_found: u64,
    tests_succeeded: u64,
    tests_failed: u64,
    tests_skipped: u64,
    duration: Duration,
    failures: Vec<TestFailure>,
}

impl ExecutionSummary {
    pub fn containers_found(&self) -> u64 {
        self.containers_found
    }

    pub fn tests_found(&self) -> u64 {
        self.tests_found
    }

    pub fn tests_succeeded(&self) -> u64 {
        self.tests_succeeded
    }

    pub fn tests_failed(&self) -> u64 {
        self.tests_failed
    }

    pub fn tests_skipped(&self) -> u64 {
        self.tests_skipped
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn failures(&self) -> &[TestFailure] {
        &self.failures
    }

    /// Total number of failed tests. The task fails the build step when this
    /// is non-zero.
    pub fn total_failure_count(&self) -> u64 {
        self.tests_failed
    }

    /// Render the summary report.
    pub fn print_to(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            out,
            "Test run finished after {} ms",
            self.duration.as_millis()
        )?;
        writeln!(out, "[{:>10} containers found      ]", self.containers_found)?;
        writeln!(out, "[{:>10} tests found           ]", self.tests_found)?;
        writeln!(out, "[{:>10} tests successful      ]", self.tests_succeeded)?;
        writeln!(out, "[{:>10} tests skipped         ]", self.tests_skipped)?;
        writeln!(out, "[{:>10} tests failed          ]", self.tests_failed)?;

        if !self.failures.is_empty() {
            writeln!(out)?;
            writeln!(out, "Failures ({}):", self.failures.len())?;
            for failure in &self.failures {
                writeln!(out, "  {}", failure.test_name)?;
                for line in failure.message.lines() {
                    writeln!(out, "    => {}", line)?;
                }
            }
        }

        Ok(())
    }
}

/// A listener that aggregates outcomes into an [`ExecutionSummary`].
#[derive(Debug, Default)]
pub struct SummaryListener {
    summary: ExecutionSummary,
    started: Option<std::time::Instant>,
}

impl SummaryListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the listener, producing the collected summary.
    pub fn into_summary(self) -> ExecutionSummary {
        self.summary
    }
}

impl ExecutionListener for SummaryListener {
    fn on_plan_started(&mut self, plan: &TestPlan) {
        self.summary.containers_found = plan.len() as u64;
        self.summary.tests_found = plan.len() as u64;
        self.started = Some(std::time::Instant::now());
    }

    fn on_test_finished(&mut self, test: &TestEntry, outcome: &TestOutcome) {
        match outcome {
            TestOutcome::Passed(_) => self.summary.tests_succeeded += 1,
            TestOutcome::Failed(_, message) => {
                self.summary.tests_failed += 1;
                self.summary.failures.push(TestFailure {
                    test_name: test.name.clone(),
                    message: message.clone(),
                });
            }
            TestOutcome::Skipped(_) => self.summary.tests_skipped += 1,
        }
    }

    fn on_plan_finished(&mut self, _plan: &TestPlan) {
        if let Some(started) = self.started {
            self.summary.duration = started.elapsed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> TestEntry {
        TestEntry {
            id: name.to_string(),
            name: name.to_string(),
            artifact: PathBuf::from(name),
        }
    }

    #[test]
    fn summary_listener_aggregates_outcomes() {
        let plan = TestPlan::new(vec![entry("AlphaTest"), entry("BetaTest"), entry("GammaTest")]);
        let mut listener = SummaryListener::new();

        listener.on_plan_started(&plan);
        listener.on_test_finished(&plan.entries()[0], &TestOutcome::Passed(Duration::ZERO));
        listener.on_test_finished(
            &plan.entries()[1],
            &TestOutcome::Failed(Duration::ZERO, "assertion failed".to_string()),
        );
        listener.on_test_finished(
            &plan.entries()[2],
            &TestOutcome::Skipped("not supported here".to_string()),
        );
        listener.on_plan_finished(&plan);

        let summary = listener.into_summary();
        assert_eq!(summary.containers_found(), 3);
        assert_eq!(summary.tests_found(), 3);
        assert_eq!(summary.tests_succeeded(), 1);
        assert_eq!(summary.tests_failed(), 1);
        assert_eq!(summary.tests_skipped(), 1);
        assert_eq!(summary.total_failure_count(), 1);
        assert_eq!(summary.failures().len(), 1);
        assert_eq!(summary.failures()[0].test_name, "BetaTest");
    }

    #[test]
    fn summary_report_contains_counts_and_failures() {
        let plan = TestPlan::new(vec![entry("LoginTest")]);
        let mut listener = SummaryListener::new();
        listener.on_plan_started(&plan);
        listener.on_test_finished(
            &plan.entries()[0],
            &TestOutcome::Failed(Duration::ZERO, "expected 200, got 500".to_string()),
        );
        listener.on_plan_finished(&plan);

        let mut buf = Vec::new();
        listener.into_summary().print_to(&mut buf).unwrap();
        let report = String::from_utf8(buf).unwrap();

        assert!(report.contains("1 tests found"));
        assert!(report.contains("1 tests failed"));
        assert!(report.contains("0 tests successful"));
        assert!(report.contains("LoginTest"));
        assert!(report.contains("=> expected 200, got 500"));
    }

    #[test]
    fn empty_plan_summarizes_to_zero_counts() {
        let plan = TestPlan::default();
        let mut listener = SummaryListener::new();
        listener.on_plan_started(&plan);
        listener.on_plan_finished(&plan);

        let summary = listener.into_summary();
        assert_eq!(summary.tests_found(), 0);
        assert_eq!(summary.total_failure_count(), 0);
    }
}
