//! Child process spawning, stdin delivery, and timeout kill.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use hookforge_core::{ExecutionResult, HookDescriptor, HookOutcome};

/// Exit code hooks use to signal a block; stderr carries the reason.
pub const BLOCK_EXIT_CODE: i32 = 2;

/// Run one hook to completion or timeout.
///
/// The serialized event is the child's entire stdin. Exit code 0 means
/// allowed, 2 means blocked, anything else (including a failed spawn or a
/// signal death) means errored. A hook that outlives `timeout_ms` is
/// forcibly killed and recorded as timed out. Errored and timed-out hooks
/// both resolve to allow at aggregation time.
pub async fn run_hook(descriptor: &HookDescriptor, payload: &str) -> ExecutionResult {
    let started = Instant::now();

    let mut parts = descriptor.command.split_whitespace();
    let Some(program) = parts.next() else {
        return errored(descriptor, started, "empty hook command");
    };

    let mut cmd = Command::new(program);
    cmd.args(parts)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // An orchestrator panic must not leak children.
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(command = %descriptor.command, error = %e, "hook spawn failed");
            return errored(descriptor, started, &format!("spawn failed: {e}"));
        }
    };

    debug!(command = %descriptor.command, timeout_ms = descriptor.timeout_ms, "hook started");

    // Feed stdin from a task: a hook that never reads must not stall the
    // wait below. Dropping the handle closes the pipe.
    if let Some(mut stdin) = child.stdin.take() {
        let payload = payload.to_owned();
        tokio::spawn(async move {
            let _ = stdin.write_all(payload.as_bytes()).await;
        });
    }

    // Drain both pipes concurrently with the wait so a chatty hook cannot
    // deadlock on a full pipe buffer.
    let stdout_task = drain(child.stdout.take());
    let stderr_task = drain(child.stderr.take());

    let deadline = Duration::from_millis(descriptor.timeout_ms);
    match tokio::time::timeout(deadline, child.wait()).await {
        Ok(Ok(status)) => {
            let stdout = stdout_task.await.unwrap_or_default();
            let stderr = stderr_task.await.unwrap_or_default();
            let exit_code = status.code();
            let outcome = match exit_code {
                Some(0) => HookOutcome::Allowed,
                Some(BLOCK_EXIT_CODE) => HookOutcome::Blocked,
                // Nonzero-nonblock exit, or killed by a signal.
                _ => HookOutcome::Errored,
            };
            if outcome == HookOutcome::Errored {
                warn!(command = %descriptor.command, ?exit_code, "hook errored");
            }
            ExecutionResult {
                hook_command: descriptor.command.clone(),
                outcome,
                exit_code,
                stdout,
                stderr,
                duration_ms: started.elapsed().as_millis() as u64,
            }
        }
        Ok(Err(e)) => {
            let _ = stdout_task.await;
            let stderr = stderr_task.await.unwrap_or_default();
            warn!(command = %descriptor.command, error = %e, "hook wait failed");
            ExecutionResult {
                hook_command: descriptor.command.clone(),
                outcome: HookOutcome::Errored,
                exit_code: None,
                stdout: String::new(),
                stderr,
                duration_ms: started.elapsed().as_millis() as u64,
            }
        }
        Err(_) => {
            warn!(
                command = %descriptor.command,
                timeout_ms = descriptor.timeout_ms,
                "hook exceeded timeout; killing"
            );
            let _ = child.start_kill();
            let _ = child.wait().await;
            // Pipes close once the child dies; collect whatever it printed.
            let stdout = stdout_task.await.unwrap_or_default();
            let stderr = stderr_task.await.unwrap_or_default();
            ExecutionResult {
                hook_command: descriptor.command.clone(),
                outcome: HookOutcome::TimedOut,
                exit_code: None,
                stdout,
                stderr,
                duration_ms: started.elapsed().as_millis() as u64,
            }
        }
    }
}

fn errored(descriptor: &HookDescriptor, started: Instant, message: &str) -> ExecutionResult {
    ExecutionResult {
        hook_command: descriptor.command.clone(),
        outcome: HookOutcome::Errored,
        exit_code: None,
        stdout: String::new(),
        stderr: message.to_string(),
        duration_ms: started.elapsed().as_millis() as u64,
    }
}

fn drain<R>(pipe: Option<R>) -> JoinHandle<String>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf).await;
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}
