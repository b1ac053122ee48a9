// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run a child process with realm variables in its environment.

use std::process::{ExitStatus, Stdio};

use envault_core::EnvaultError;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// What to run and what to hand it.
#[derive(Debug, Clone, Default)]
pub struct ExecRequest {
    pub program: String,
    pub args: Vec<String>,
    /// `KEY=VALUE` entries appended to the inherited environment.
    pub vars: Vec<String>,
    /// Feed `yes\n` on stdin instead of inheriting it.
    pub answer_yes: bool,
}

/// Run the request to completion and return the child's exit code.
///
/// SIGINT and SIGTERM delivered to this process are passed on to the child,
/// except a SIGINT the terminal already sent to the whole foreground group.
/// A child killed by a signal reports `128 + signal`.
pub async fn run(request: &ExecRequest) -> Result<i32, EnvaultError> {
    let mut cmd = Command::new(&request.program);
    cmd.args(&request.args)
        .envs(request.vars.iter().filter_map(|kv| kv.split_once('=')))
        .stdin(if request.answer_yes {
            Stdio::piped()
        } else {
            Stdio::inherit()
        })
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|e| {
        EnvaultError::Internal(format!("cannot start {}: {e}", request.program))
    })?;
    debug!(program = %request.program, vars = request.vars.len(), "started child");

    if let Some(mut stdin) = child.stdin.take() {
        // The child may exit without reading; a closed pipe is not an error.
        if let Err(e) = stdin.write_all(b"yes\n").await {
            debug!(error = %e, "child closed stdin early");
        }
    }

    let status = wait_forwarding_signals(&mut child).await?;
    Ok(exit_code(status))
}

#[cfg(unix)]
async fn wait_forwarding_signals(
    child: &mut tokio::process::Child,
) -> Result<ExitStatus, EnvaultError> {
    use tokio::signal::unix::{SignalKind, signal};

    let pid = child.id();
    let listen = |kind: SignalKind| {
        signal(kind).map_err(|e| EnvaultError::Internal(format!("installing signal handler: {e}")))
    };
    let mut sigint = listen(SignalKind::interrupt())?;
    let mut sigterm = listen(SignalKind::terminate())?;

    loop {
        let signal = tokio::select! {
            status = child.wait() => {
                return status.map_err(|e| EnvaultError::Internal(format!("waiting for child: {e}")));
            }
            _ = sigint.recv() => libc::SIGINT,
            _ = sigterm.recv() => libc::SIGTERM,
        };
        if should_forward(signal, in_terminal_foreground()) {
            forward_signal(pid, signal);
        } else {
            debug!(signal, "child shares the terminal foreground group, not forwarding");
        }
    }
}

/// The child inherits our process group, so a terminal-generated SIGINT
/// already reached it when that group is in the foreground.
#[cfg(unix)]
fn should_forward(signal: libc::c_int, foreground: bool) -> bool {
    signal != libc::SIGINT || !foreground
}

#[cfg(unix)]
fn in_terminal_foreground() -> bool {
    // SAFETY: isatty, tcgetpgrp and getpgrp only read process state.
    unsafe {
        libc::isatty(libc::STDIN_FILENO) == 1
            && libc::tcgetpgrp(libc::STDIN_FILENO) == libc::getpgrp()
    }
}

#[cfg(not(unix))]
async fn wait_forwarding_signals(
    child: &mut tokio::process::Child,
) -> Result<ExitStatus, EnvaultError> {
    child
        .wait()
        .await
        .map_err(|e| EnvaultError::Internal(format!("waiting for child: {e}")))
}

#[cfg(unix)]
fn forward_signal(pid: Option<u32>, signal: libc::c_int) {
    let Some(pid) = pid.and_then(|p| libc::pid_t::try_from(p).ok()) else {
        return;
    };
    debug!(pid, signal, "forwarding signal to child");

    // SAFETY: kill(2) has no memory-safety preconditions.
    if unsafe { libc::kill(pid, signal) } != 0 {
        warn!(pid, signal, "can't send signal, killing child");
        // SAFETY: as above.
        if unsafe { libc::kill(pid, libc::SIGKILL) } != 0 {
            warn!(pid, "failed to stop child");
        }
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
