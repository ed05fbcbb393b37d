//! The test execution task
//!
//! [`TestTask`] is the build-step adapter: it reads the test source set from
//! the build configuration, assembles the classpath, resolves the loading
//! context, delegates discovery and execution to its launcher, prints the
//! execution summary, and fails when any test failed.
//!
//! The task never retries and holds no state across invocations. Every error
//! propagates unchanged to the caller, which is expected to mark the build
//! step as failed.

use std::io::Write;

use thiserror::Error;

use crate::classpath::{ClasspathError, ClasspathRoots, LoaderContext};
use crate::config::{BuildConfig, ConfigError};
use crate::launcher::{
    ClassNameFilter, DiscoveryRequest, ExecutionSummary, LaunchError, ProcessLauncher,
    SummaryListener, TestLauncher,
};

/// Errors surfaced by [`TestTask::execute_tests`].
///
/// `TestFailure` is the expected/common failure path: it is raised only after
/// execution and reporting complete. The other kinds abort before any test
/// runs, in which case no summary is printed.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Classpath(#[from] ClasspathError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error("failed to write execution summary: {0}")]
    Report(#[source] std::io::Error),

    #[error("At least one test case failed")]
    TestFailure,
}

/// The test execution adapter, generic over its launcher so the seam can be
/// replaced in tests or by richer harnesses.
pub struct TestTask<L: TestLauncher = ProcessLauncher> {
    config: BuildConfig,
    launcher: L,
}

impl TestTask<ProcessLauncher> {
    /// A task using the default process launcher.
    pub fn new(config: BuildConfig) -> Self {
        Self::with_launcher(config, ProcessLauncher::new())
    }
}

impl<L: TestLauncher> TestTask<L> {
    pub fn with_launcher(config: BuildConfig, launcher: L) -> Self {
        Self { config, launcher }
    }

    /// Execute all discoverable tests, printing the summary to stdout.
    ///
    /// ## Errors
    ///
    /// - [`TaskError::Configuration`] when no `test` source set is configured
    /// - [`TaskError::Classpath`] when the test output directory cannot be
    ///   resolved to a loadable location
    /// - [`TaskError::TestFailure`] when the summary reports one or more
    ///   failed tests (raised after the summary is printed)
    pub fn execute_tests(&self) -> Result<ExecutionSummary, TaskError> {
        self.execute_tests_to(&mut std::io::stdout())
    }

    /// Same as [`execute_tests`](Self::execute_tests) with an injectable
    /// output stream for the summary report.
    #[tracing::instrument(skip_all)]
    pub fn execute_tests_to(&self, out: &mut dyn Write) -> Result<ExecutionSummary, TaskError> {
        let source_set = self.config.test_source_set()?;

        // The classpath is exactly the test source set's output directory
        let roots: ClasspathRoots = [source_set.output.clone()].into_iter().collect();
        debug_assert!(!roots.is_empty());

        let context = LoaderContext::resolve(&roots)?;

        let request =
            DiscoveryRequest::for_context(&context).with_filter(ClassNameFilter::standard());
        let plan = self.launcher.discover(&request)?;
        tracing::info!(tests = plan.len(), "executing discovered tests");

        let mut listener = SummaryListener::new();
        self.launcher.execute(&plan, &mut listener)?;
        let summary = listener.into_summary();

        summary.print_to(out).map_err(TaskError::Report)?;

        if summary.total_failure_count() > 0 {
            return Err(TaskError::TestFailure);
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::{ExecutionListener, TestEntry, TestOutcome, TestPlan};
    use std::path::PathBuf;
    use std::time::Duration;

    /// Launcher returning prescribed outcomes, for exercising the adapter
    /// without touching the filesystem during execution.
    struct ScriptedLauncher {
        outcomes: Vec<(String, TestOutcome)>,
    }

    impl TestLauncher for ScriptedLauncher {
        fn discover(&self, _request: &DiscoveryRequest<'_>) -> Result<TestPlan, LaunchError> {
            let entries = self
                .outcomes
                .iter()
                .map(|(name, _)| TestEntry {
                    id: name.clone(),
                    name: name.clone(),
                    artifact: PathBuf::from(name),
                })
                .collect();
            Ok(TestPlan::new(entries))
        }

        fn execute(
            &self,
            plan: &TestPlan,
            listener: &mut dyn ExecutionListener,
        ) -> Result<(), LaunchError> {
            listener.on_plan_started(plan);
            for (test, (_, outcome)) in plan.entries().iter().zip(&self.outcomes) {
                listener.on_test_started(test);
                listener.on_test_finished(test, outcome);
            }
            listener.on_plan_finished(plan);
            Ok(())
        }
    }

    fn config_for(dir: &std::path::Path) -> BuildConfig {
        BuildConfig::default().with_source_set("test", dir)
    }

    #[test]
    fn passing_run_returns_summary() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = ScriptedLauncher {
            outcomes: vec![("AlphaTest".into(), TestOutcome::Passed(Duration::ZERO))],
        };
        let task = TestTask::with_launcher(config_for(dir.path()), launcher);

        let mut out = Vec::new();
        let summary = task.execute_tests_to(&mut out).unwrap();
        assert_eq!(summary.tests_succeeded(), 1);
        assert_eq!(summary.total_failure_count(), 0);
        assert!(String::from_utf8(out).unwrap().contains("1 tests found"));
    }

    #[test]
    fn failing_run_prints_summary_then_fails() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = ScriptedLauncher {
            outcomes: vec![
                ("AlphaTest".into(), TestOutcome::Passed(Duration::ZERO)),
                (
                    "BetaTest".into(),
                    TestOutcome::Failed(Duration::ZERO, "nope".into()),
                ),
            ],
        };
        let task = TestTask::with_launcher(config_for(dir.path()), launcher);

        let mut out = Vec::new();
        let err = task.execute_tests_to(&mut out).unwrap_err();
        assert_eq!(err.to_string(), "At least one test case failed");
        // Summary was printed before the failure was raised
        let report = String::from_utf8(out).unwrap();
        assert!(report.contains("1 tests failed"));
        assert!(report.contains("BetaTest"));
    }

    #[test]
    fn missing_source_set_aborts_before_any_output() {
        let launcher = ScriptedLauncher { outcomes: vec![] };
        let task = TestTask::with_launcher(BuildConfig::default(), launcher);

        let mut out = Vec::new();
        let err = task.execute_tests_to(&mut out).unwrap_err();
        assert!(matches!(err, TaskError::Configuration(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn unresolvable_output_dir_aborts_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = ScriptedLauncher { outcomes: vec![] };
        let config = config_for(&dir.path().join("never-built"));
        let task = TestTask::with_launcher(config, launcher);

        let mut out = Vec::new();
        let err = task.execute_tests_to(&mut out).unwrap_err();
        assert!(matches!(err, TaskError::Classpath(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn repeated_runs_produce_identical_counts() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = ScriptedLauncher {
            outcomes: vec![
                ("AlphaTest".into(), TestOutcome::Passed(Duration::ZERO)),
                ("BetaTest".into(), TestOutcome::Skipped(String::new())),
            ],
        };
        let task = TestTask::with_launcher(config_for(dir.path()), launcher);

        let first = task.execute_tests_to(&mut Vec::new()).unwrap();
        let second = task.execute_tests_to(&mut Vec::new()).unwrap();
        assert_eq!(first.tests_found(), second.tests_found());
        assert_eq!(first.tests_succeeded(), second.tests_succeeded());
        assert_eq!(first.tests_skipped(), second.tests_skipped());
    }
}
