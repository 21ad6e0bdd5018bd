//! Orchestration for `sdkctl harness`.
//!
//! Installs the SDK and runs the cucumber suite against it. Each step is a
//! blocking subprocess; the first failing step aborts the command.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::core::plan::{HarnessLayout, Invocation, setup_plan, test_plan};
use crate::io::command::{CommandRunner, ProcessRunner, RunStatus};
use crate::io::config::HarnessConfig;

/// A harness subprocess did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("{label} failed with exit code {code}: {command}{}", tail_suffix(.tail))]
    Exited {
        label: String,
        command: String,
        code: i32,
        tail: String,
    },
    #[error("{label} was terminated by a signal: {command}")]
    Signaled { label: String, command: String },
    #[error("{label} timed out after {}s: {command}", .after.as_secs())]
    TimedOut {
        label: String,
        command: String,
        after: Duration,
    },
}

fn tail_suffix(tail: &str) -> String {
    if tail.is_empty() {
        String::new()
    } else {
        format!("\n{tail}")
    }
}

/// Build the real process runner from config.
pub fn process_runner(cfg: &HarnessConfig) -> ProcessRunner {
    ProcessRunner {
        timeout: cfg.timeout_secs.map(Duration::from_secs),
        output_limit_bytes: cfg.output_limit_bytes,
    }
}

/// Install SDK dependencies, then install the SDK into the working directory.
#[instrument(skip_all)]
pub fn run_setup<R: CommandRunner>(cfg: &HarnessConfig, runner: &R) -> Result<()> {
    let layout = resolve_layout(cfg)?;
    for invocation in setup_plan(&layout) {
        run_step(runner, &invocation)?;
    }
    info!("harness setup complete");
    Ok(())
}

/// Run the cucumber suite with every step file required.
#[instrument(skip_all)]
pub fn run_tests<R: CommandRunner>(cfg: &HarnessConfig, runner: &R) -> Result<()> {
    std::io::stdout().flush().context("flush stdout")?;
    let layout = resolve_layout(cfg)?;
    let step_files = list_step_files(&layout.steps_dir)?;
    debug!(count = step_files.len(), "found step files");
    run_step(runner, &test_plan(&layout, &step_files))?;
    info!("harness tests passed");
    Ok(())
}

/// Setup followed by tests.
pub fn run_all<R: CommandRunner>(cfg: &HarnessConfig, runner: &R) -> Result<()> {
    run_setup(cfg, runner)?;
    run_tests(cfg, runner)
}

/// Entries matched by the shell glob `<steps_dir>/*`: every file and directory
/// whose name does not start with `.`, sorted by name.
///
/// cucumber-js loads a required directory recursively.
pub fn list_step_files(steps_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(steps_dir)
        .with_context(|| format!("read steps dir {}", steps_dir.display()))?
    {
        let entry = entry.context("read entry")?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}

fn resolve_layout(cfg: &HarnessConfig) -> Result<HarnessLayout> {
    let mut layout = cfg.layout();
    // Child processes get `workdir` as cwd, so the runner path must not depend on ours.
    layout.workdir = std::path::absolute(&cfg.workdir)
        .with_context(|| format!("resolve workdir {}", cfg.workdir.display()))?;
    Ok(layout)
}

fn run_step<R: CommandRunner>(runner: &R, invocation: &Invocation) -> Result<()> {
    let status = runner.run(invocation)?;
    let label = invocation.label.clone();
    let command = invocation.to_string();
    match status {
        RunStatus::Success => Ok(()),
        RunStatus::Failed {
            code: Some(code),
            tail,
        } => Err(StepError::Exited {
            label,
            command,
            code,
            tail,
        }
        .into()),
        RunStatus::Failed { code: None, .. } => Err(StepError::Signaled { label, command }.into()),
        RunStatus::TimedOut { after } => Err(StepError::TimedOut {
            label,
            command,
            after,
        }
        .into()),
    }
}
