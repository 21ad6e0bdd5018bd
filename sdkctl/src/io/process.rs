//! Helpers for running child processes with optional timeouts and bounded output.

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

/// Captured child process output.
///
/// Each stream keeps only its last `output_limit_bytes` bytes; the count of
/// dropped leading bytes is recorded in the `*_truncated` fields.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
    pub timed_out: bool,
}

impl CommandOutput {
    /// Tail of stderr (or stdout when stderr is empty) for error messages.
    pub fn failure_tail(&self) -> String {
        let (bytes, truncated) = if self.stderr.iter().any(|b| !b.is_ascii_whitespace()) {
            (&self.stderr, self.stderr_truncated)
        } else {
            (&self.stdout, self.stdout_truncated)
        };
        let text = String::from_utf8_lossy(bytes);
        if truncated > 0 {
            format!("[{truncated} earlier bytes omitted]\n{}", text.trim_end())
        } else {
            text.trim_end().to_string()
        }
    }
}

/// Where a child's output lines are echoed as they arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Echo {
    Stdout,
    Stderr,
}

/// Run a command, optionally with a timeout, capturing stdout/stderr without risking
/// pipe deadlocks.
///
/// Output is read concurrently while the child runs. When `echo` is set, every line is
/// forwarded to the parent's stdout/stderr immediately so the child appears to run in
/// the foreground. stdin is closed.
///
/// With a timeout set, the child leads its own process group and the whole group is
/// killed on expiry, so grandchildren holding the output pipes cannot outlive the limit.
#[instrument(skip_all, fields(timeout_secs = timeout.map(|t| t.as_secs()), output_limit_bytes, echo))]
pub fn run_command(
    mut cmd: Command,
    timeout: Option<Duration>,
    output_limit_bytes: usize,
    echo: bool,
) -> Result<CommandOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    if timeout.is_some() {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    debug!(program = ?cmd.get_program(), "spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, program = ?cmd.get_program(), "failed to spawn command");
            return Err(e).with_context(|| format!("spawn {:?}", cmd.get_program()));
        }
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let stdout_echo = echo.then_some(Echo::Stdout);
    let stderr_echo = echo.then_some(Echo::Stderr);
    let stdout_handle =
        thread::spawn(move || read_stream_tail(stdout, output_limit_bytes, stdout_echo));
    let stderr_handle =
        thread::spawn(move || read_stream_tail(stderr, output_limit_bytes, stderr_echo));

    let mut timed_out = false;
    let status = match timeout {
        None => child.wait().context("wait for command")?,
        Some(timeout) => match child.wait_timeout(timeout).context("wait for command")? {
            Some(status) => status,
            None => {
                warn!(
                    timeout_secs = timeout.as_secs(),
                    "command timed out, killing"
                );
                timed_out = true;
                kill_process_tree(&mut child)?;
                child.wait().context("wait command after kill")?
            }
        },
    };

    let (stdout, stdout_truncated) = join_output(stdout_handle).context("join stdout")?;
    let (stderr, stderr_truncated) = join_output(stderr_handle).context("join stderr")?;

    if stdout_truncated > 0 || stderr_truncated > 0 {
        debug!(stdout_truncated, stderr_truncated, "captured output truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
        stdout_truncated,
        stderr_truncated,
        timed_out,
    })
}

/// Kill the child's process group (the child is its leader).
#[cfg(unix)]
fn kill_process_tree(child: &mut Child) -> Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let pgid = i32::try_from(child.id()).context("child pid out of range")?;
    match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(e).context("kill process group"),
    }
}

#[cfg(not(unix))]
fn kill_process_tree(child: &mut Child) -> Result<()> {
    child.kill().context("kill command")
}

fn join_output(handle: thread::JoinHandle<Result<(Vec<u8>, usize)>>) -> Result<(Vec<u8>, usize)> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

/// Drain a stream line by line, keeping the last `limit` bytes and optionally echoing.
fn read_stream_tail<R: Read>(
    reader: R,
    limit: usize,
    echo: Option<Echo>,
) -> Result<(Vec<u8>, usize)> {
    let mut buf_reader = BufReader::new(reader);
    let mut collected = Vec::new();
    let mut truncated = 0usize;

    loop {
        let mut line = Vec::new();
        let n = buf_reader
            .read_until(b'\n', &mut line)
            .context("read output")?;
        if n == 0 {
            break;
        }

        if let Some(target) = echo
            && let Err(e) = echo_line(target, &line)
        {
            warn!(err = %e, "failed to echo child output");
        }

        collected.extend_from_slice(&line);
        if collected.len() > limit {
            let excess = collected.len() - limit;
            collected.drain(..excess);
            truncated += excess;
        }
    }

    Ok((collected, truncated))
}

fn echo_line(target: Echo, line: &[u8]) -> std::io::Result<()> {
    match target {
        Echo::Stdout => {
            let mut out = std::io::stdout().lock();
            out.write_all(line)?;
            out.flush()
        }
        Echo::Stderr => {
            let mut err = std::io::stderr().lock();
            err.write_all(line)?;
            err.flush()
        }
    }
}
