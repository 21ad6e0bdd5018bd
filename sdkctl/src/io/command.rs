//! Subprocess execution seam for the harness launcher.
//!
//! The [`CommandRunner`] trait decouples harness orchestration from process
//! spawning. Tests use a scripted runner that records invocations and returns
//! queued statuses without spawning anything.

use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::core::plan::Invocation;
use crate::io::process::run_command;

/// How a harness subprocess ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// Non-zero exit, or termination by signal (`code` is `None`).
    Failed { code: Option<i32>, tail: String },
    TimedOut { after: Duration },
}

/// Abstraction over subprocess execution.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunStatus>;
}

/// Runner that spawns real processes and echoes their output.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    pub timeout: Option<Duration>,
    pub output_limit_bytes: usize,
}

impl CommandRunner for ProcessRunner {
    #[instrument(skip_all, fields(label = %invocation.label))]
    fn run(&self, invocation: &Invocation) -> Result<RunStatus> {
        info!(command = %invocation, cwd = %invocation.cwd.display(), "running");
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).current_dir(&invocation.cwd);

        let output = run_command(cmd, self.timeout, self.output_limit_bytes, true)
            .with_context(|| format!("run {}", invocation.label))?;

        if output.timed_out {
            let after = self.timeout.unwrap_or_default();
            return Ok(RunStatus::TimedOut { after });
        }
        if output.status.success() {
            return Ok(RunStatus::Success);
        }
        Ok(RunStatus::Failed {
            code: output.status.code(),
            tail: output.failure_tail(),
        })
    }
}
