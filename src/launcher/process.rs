//! Process-based launcher (default behavior)
//!
//! The thinnest implementation of the launcher seam: a test artifact is an
//! executable file on the classpath, and executing it means running it as a
//! child process with captured output.
//!
//! Outcome mapping:
//! - exit status 0: passed
//! - exit code 77: skipped (the autotools test-skip convention)
//! - anything else, including spawn failure and termination by signal: failed,
//!   with the captured output as the failure detail

use std::path::Path;
use std::process::Command;
use std::time::Instant;

use walkdir::WalkDir;

use super::{
    DiscoveryRequest, ExecutionListener, LaunchError, TestEntry, TestLauncher, TestOutcome,
    TestPlan,
};

/// Exit code a test artifact uses to report "skipped".
const SKIP_EXIT_CODE: i32 = 77;

/// Launcher that treats each executable artifact as one test unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl TestLauncher for ProcessLauncher {
    #[tracing::instrument(skip_all, fields(roots = request.context().search_path().len()))]
    fn discover(&self, request: &DiscoveryRequest<'_>) -> Result<TestPlan, LaunchError> {
        let mut entries = Vec::new();

        for root in request.context().search_path() {
            for dir_entry in WalkDir::new(root).sort_by_file_name() {
                let dir_entry = dir_entry
                    .map_err(|e| LaunchError::Discovery(format!("cannot scan {}: {}", root.display(), e)))?;
                if !dir_entry.file_type().is_file() {
                    continue;
                }

                let path = dir_entry.path();
                let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if !request.filter().matches(name) {
                    continue;
                }
                if !is_executable(path) {
                    tracing::debug!(artifact = %path.display(), "skipping non-executable artifact");
                    continue;
                }

                let id = path
                    .strip_prefix(root)
                    .unwrap_or(path)
                    .to_string_lossy()
                    .into_owned();
                entries.push(TestEntry {
                    id,
                    name: name.to_string(),
                    artifact: path.to_path_buf(),
                });
            }
        }

        tracing::debug!(discovered = entries.len(), "test discovery complete");
        Ok(TestPlan::new(entries))
    }

    #[tracing::instrument(skip_all, fields(tests = plan.len()))]
    fn execute(
        &self,
        plan: &TestPlan,
        listener: &mut dyn ExecutionListener,
    ) -> Result<(), LaunchError> {
        listener.on_plan_started(plan);

        for test in plan.entries() {
            listener.on_test_started(test);
            let outcome = run_artifact(test);
            listener.on_test_finished(test, &outcome);
        }

        listener.on_plan_finished(plan);
        Ok(())
    }
}

/// Run one artifact to completion and map its exit status to an outcome.
///
/// A spawn failure is reported as a failed test rather than aborting the run,
/// so one broken artifact does not hide the outcomes of the rest.
fn run_artifact(test: &TestEntry) -> TestOutcome {
    let started = Instant::now();

    let output = match Command::new(&test.artifact).output() {
        Ok(output) => output,
        Err(e) => {
            return TestOutcome::Failed(
                started.elapsed(),
                format!("failed to run {}: {}", test.artifact.display(), e),
            );
        }
    };
    let duration = started.elapsed();

    if output.status.success() {
        return TestOutcome::Passed(duration);
    }

    if output.status.code() == Some(SKIP_EXIT_CODE) {
        let reason = String::from_utf8_lossy(&output.stdout).trim().to_string();
        return TestOutcome::Skipped(reason);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut message = match output.status.code() {
        Some(code) => format!("exited with code {}", code),
        None => "terminated by signal".to_string(),
    };
    let detail = if stderr.trim().is_empty() {
        stdout.trim()
    } else {
        stderr.trim()
    };
    if !detail.is_empty() {
        message.push('\n');
        message.push_str(detail);
    }

    TestOutcome::Failed(duration, message)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt as _;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}
