use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Grace period between SIGTERM and SIGKILL when a child times out.
const KILL_GRACE: Duration = Duration::from_millis(500);

/// Configuration for spawning a child process.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub command: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
    pub log_prefix: String,
    pub env: Vec<(String, String)>,
    /// Combined stdout+stderr bytes to keep. Lines past the cap are drained and dropped.
    pub max_output_bytes: Option<usize>,
}

/// Output from a completed child process.
#[derive(Debug)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub signal: Option<i32>,
    pub stdout_lines: Vec<String>,
    pub stderr_lines: Vec<String>,
    pub truncated: bool,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0 && self.signal.is_none()
    }

    pub fn stdout(&self) -> String {
        self.stdout_lines.join("\n")
    }

    pub fn stderr(&self) -> String {
        self.stderr_lines.join("\n")
    }
}

fn collect_lines<R>(
    reader: R,
    prefix: String,
    stream: &'static str,
    budget: Arc<AtomicUsize>,
) -> JoinHandle<(Vec<String>, bool)>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = Vec::new();
        let mut truncated = false;
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!(stream, "[{prefix}] read error, dropping remaining output: {e}");
                    truncated = true;
                    break;
                }
            }
            if buf.last() == Some(&b'\n') {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
            }
            // Invalid UTF-8 becomes U+FFFD instead of ending the stream.
            let line = String::from_utf8_lossy(&buf).into_owned();
            debug!(stream, "[{prefix}] {line}");
            let cost = line.len() + 1;
            let kept = budget
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                    left.checked_sub(cost)
                })
                .is_ok();
            if kept {
                lines.push(line);
            } else {
                truncated = true;
            }
        }
        (lines, truncated)
    })
}

#[cfg(unix)]
fn kill_group(pgid: i32, signal: i32) {
    unsafe {
        libc::killpg(pgid, signal);
    }
}

/// Spawn a child process, collect its output line-by-line, and enforce the timeout.
///
/// The child is placed in its own process group on Unix. SIGINT and SIGTERM
/// received by the parent are forwarded to that group, and a timeout sends
/// SIGTERM followed by SIGKILL to the whole group.
pub async fn spawn_and_stream(config: ProcessConfig) -> Result<ProcessOutput> {
    let mut cmd = Command::new(&config.command);
    cmd.args(&config.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(ref dir) = config.working_dir {
        cmd.current_dir(dir);
    }
    for (key, value) in &config.env {
        cmd.env(key, value);
    }

    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd
        .spawn()
        .map_err(|e| Error::Process(format!("failed to spawn '{}': {e}", config.command)))?;

    let pid = child
        .id()
        .ok_or_else(|| Error::Process("child has no pid".into()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::Process("child stdout not captured".into()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| Error::Process("child stderr not captured".into()))?;

    let budget = Arc::new(AtomicUsize::new(config.max_output_bytes.unwrap_or(usize::MAX)));
    let stdout_task = collect_lines(stdout, config.log_prefix.clone(), "stdout", budget.clone());
    let stderr_task = collect_lines(stderr, config.log_prefix.clone(), "stderr", budget);

    #[cfg(unix)]
    let signal_task = {
        let pgid = pid as i32;
        tokio::spawn(async move {
            use tokio::signal::unix::{SignalKind, signal};
            let (Ok(mut sigint), Ok(mut sigterm)) = (
                signal(SignalKind::interrupt()),
                signal(SignalKind::terminate()),
            ) else {
                return;
            };
            loop {
                tokio::select! {
                    _ = sigint.recv() => kill_group(pgid, libc::SIGINT),
                    _ = sigterm.recv() => kill_group(pgid, libc::SIGTERM),
                }
            }
        })
    };

    let status = if let Some(dur) = config.timeout {
        match tokio::time::timeout(dur, child.wait()).await {
            Ok(r) => r.map_err(|e| Error::Process(format!("wait error: {e}")))?,
            Err(_) => {
                debug!(pid, "[{}] timed out after {dur:?}", config.log_prefix);
                #[cfg(unix)]
                {
                    signal_task.abort();
                    kill_group(pid as i32, libc::SIGTERM);
                    tokio::time::sleep(KILL_GRACE).await;
                    kill_group(pid as i32, libc::SIGKILL);
                }
                stdout_task.abort();
                stderr_task.abort();
                return Err(Error::Timeout(dur));
            }
        }
    } else {
        child
            .wait()
            .await
            .map_err(|e| Error::Process(format!("wait error: {e}")))?
    };

    #[cfg(unix)]
    signal_task.abort();

    let (stdout_lines, stdout_truncated) = stdout_task
        .await
        .map_err(|e| Error::Process(format!("stdout reader failed: {e}")))?;
    let (stderr_lines, stderr_truncated) = stderr_task
        .await
        .map_err(|e| Error::Process(format!("stderr reader failed: {e}")))?;

    let (exit_code, signal) = extract_exit_info(&status);

    Ok(ProcessOutput {
        exit_code,
        signal,
        stdout_lines,
        stderr_lines,
        truncated: stdout_truncated || stderr_truncated,
    })
}

fn extract_exit_info(status: &std::process::ExitStatus) -> (i32, Option<i32>) {
    if let Some(code) = status.code() {
        return (code, None);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return (128 + sig, Some(sig));
        }
    }
    (-1, None)
}
