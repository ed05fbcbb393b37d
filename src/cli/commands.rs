//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::Path;

use crate::config::BuildConfig;
use crate::task::{TaskError, TestTask};

use super::{CliError, CliResult, ExitCode};

/// Run the test task for the given project directory.
///
/// The summary is printed to stdout by the task itself; this function maps
/// the task's outcome to a shell exit code. A test failure exits with code 1
/// and the message "At least one test case failed", matching what the task
/// raises.
pub fn run_tests(project_dir: &Path) -> CliResult<ExitCode> {
    let config = BuildConfig::load(project_dir).map_err(|e| CliError::failure(e.to_string()))?;
    let task = TestTask::new(config);

    match task.execute_tests() {
        Ok(_summary) => Ok(ExitCode::SUCCESS),
        Err(e @ TaskError::TestFailure) => Err(CliError::failure(e.to_string())),
        Err(e) => Err(CliError::failure(format!("testgate: {}", e))),
    }
}

/// Print the resolved build configuration.
pub fn show_config(project_dir: &Path) -> CliResult<ExitCode> {
    let config = BuildConfig::load(project_dir).map_err(|e| CliError::failure(e.to_string()))?;

    if config.source_sets.is_empty() {
        println!("(no source sets configured)");
        return Ok(ExitCode::SUCCESS);
    }

    for (name, source_set) in &config.source_sets {
        println!("{}: {}", name, source_set.output.display());
    }
    Ok(ExitCode::SUCCESS)
}
