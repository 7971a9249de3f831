//! Blocking external-process execution with an optional timeout.

use crate::error::MeasureError;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const STDERR_TAIL_LINES: usize = 5;
/// How long pipe readers get after a timeout kill before output is dropped.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: PathBuf,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub command: String,
    /// `None` when the process was ended by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into [`MeasureError::Failed`].
    pub fn check(self) -> Result<Self, MeasureError> {
        if self.success() {
            return Ok(self);
        }
        let lines: Vec<&str> = self.stderr.lines().collect();
        let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
        Err(MeasureError::Failed {
            command: self.command,
            code: self.code,
            stderr_tail: tail,
        })
    }

    /// Both streams, stdout first. Profilers report on either.
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Seam between orchestration and the operating system.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, MeasureError>;
}

/// Runs commands for real, one at a time.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Option<Duration>,
    poll_interval: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(20),
        }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(None)
    }
}

fn drain<R: Read + Send + 'static>(name: &'static str, stream: Option<R>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut stream) = stream {
            if let Err(err) = stream.read_to_end(&mut buf) {
                warn!(stream = name, %err, "reading child output failed, keeping partial output");
            }
        }
        // The receiver is gone if the run already gave up on this stream.
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

/// Waits for a drained stream, for at most `limit` when given.
fn collect(name: &'static str, rx: Receiver<String>, limit: Option<Duration>) -> String {
    let received = match limit {
        Some(limit) => rx.recv_timeout(limit).map_err(|err| err.to_string()),
        None => rx.recv().map_err(|err| err.to_string()),
    };
    received.unwrap_or_else(|err| {
        warn!(stream = name, %err, "child output unavailable");
        String::new()
    })
}

/// Puts the child in a process group of its own so a timeout can take
/// down everything it started.
#[cfg(unix)]
fn isolate(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn isolate(_command: &mut Command) {}

fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        let pgid = child.id() as libc::pid_t;
        // SAFETY: plain syscall on a group id we created; no memory is shared.
        if unsafe { libc::kill(-pgid, libc::SIGKILL) } != 0 {
            debug!(pgid, err = %std::io::Error::last_os_error(), "process group already gone");
        }
    }
    if let Err(err) = child.kill() {
        debug!(%err, "child already exited");
    }
    let _ = child.wait();
}

impl SystemRunner {
    fn wait(&self, child: &mut Child, command: &str) -> Result<Option<i32>, MeasureError> {
        let start = Instant::now();
        loop {
            let status = child.try_wait().map_err(|source| MeasureError::Spawn {
                command: command.to_string(),
                source,
            })?;
            if let Some(status) = status {
                return Ok(status.code());
            }
            if let Some(timeout) = self.timeout {
                if start.elapsed() >= timeout {
                    warn!(command, ?timeout, "killing process group after timeout");
                    kill_tree(child);
                    return Err(MeasureError::Timeout {
                        command: command.to_string(),
                        timeout,
                    });
                }
            }
            thread::sleep(self.poll_interval);
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, MeasureError> {
        let command = invocation.to_string();
        debug!(command = %command, dir = %invocation.current_dir.display(), "spawning");

        let start = Instant::now();
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .current_dir(&invocation.current_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        isolate(&mut cmd);
        let mut child = cmd.spawn().map_err(|source| MeasureError::Spawn {
            command: command.clone(),
            source,
        })?;

        // Pipes are drained concurrently so a chatty child cannot block on a
        // full buffer while we wait for it.
        let stdout = drain("stdout", child.stdout.take());
        let stderr = drain("stderr", child.stderr.take());

        let waited = self.wait(&mut child, &command);
        // Anything that escaped the group may still hold the pipes open.
        let limit = match waited {
            Err(MeasureError::Timeout { .. }) => Some(DRAIN_GRACE),
            _ => self.timeout,
        };
        let stdout = collect("stdout", stdout, limit);
        let stderr = collect("stderr", stderr, limit);
        let code = waited?;

        Ok(ProcessOutput {
            command,
            code,
            stdout,
            stderr,
            elapsed: start.elapsed(),
        })
    }
}
