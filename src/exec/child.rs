// src/exec/child.rs

//! Individual runner process.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::console::{Console, output_label};
use crate::engine::TaskOutcome;

use super::backend::{ChildSpec, ChildStatus};

/// How long output may keep arriving after the runner exits.
const OUTPUT_DRAIN: Duration = Duration::from_millis(250);

/// Consecutive read errors tolerated before a stream is abandoned.
const MAX_READ_ERRORS: u32 = 8;

/// Run the runner for one directory, forwarding stdout/stderr to `console`.
///
/// - If the cancel channel fires the process is killed and
///   [`ChildStatus::Cancelled`] is returned.
/// - A process that cannot be spawned or waited on counts as a failure
///   with exit code -1.
pub async fn run_child(
    spec: ChildSpec,
    console: Arc<dyn Console>,
    cancel_rx: oneshot::Receiver<()>,
) -> ChildStatus {
    match run_child_inner(&spec, console, cancel_rx).await {
        Ok(status) => status,
        Err(err) => {
            error!(
                directory = %spec.directory.display(),
                task = %spec.task,
                error = %err,
                "task execution error"
            );
            ChildStatus::Exited(TaskOutcome::Failed(-1))
        }
    }
}

async fn run_child_inner(
    spec: &ChildSpec,
    console: Arc<dyn Console>,
    mut cancel_rx: oneshot::Receiver<()>,
) -> Result<ChildStatus> {
    info!(
        directory = %spec.directory.display(),
        task = %spec.task,
        runner = %spec.runner,
        "starting task process"
    );

    let mut cmd = Command::new(spec.runner.path());
    cmd.arg(&spec.task)
        .current_dir(&spec.directory)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().with_context(|| {
        format!(
            "spawning {} in {}",
            spec.runner,
            spec.directory.display()
        )
    })?;

    let label = output_label(&spec.directory);
    let mut forwarders = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        forwarders.push(forward_output(stdout, label.clone(), Arc::clone(&console)));
    }
    if let Some(stderr) = child.stderr.take() {
        forwarders.push(forward_output(stderr, label, console));
    }

    // Either the process exits on its own, or teardown asks us to stop it.
    tokio::select! {
        status_res = child.wait() => {
            let status = status_res.with_context(|| {
                format!("waiting for process in {}", spec.directory.display())
            })?;

            // Give buffered output a moment to reach the console. A
            // descendant may still hold the pipes; its forwarders stay
            // detached and keep draining.
            let drain = async {
                for forwarder in forwarders.iter_mut() {
                    let _ = forwarder.await;
                }
            };
            if timeout(OUTPUT_DRAIN, drain).await.is_err() {
                debug!(
                    directory = %spec.directory.display(),
                    "output still open after exit; not waiting for it"
                );
            }

            let outcome = TaskOutcome::from_code(status.code());
            info!(
                directory = %spec.directory.display(),
                exit_code = status.code().unwrap_or(-1),
                success = status.success(),
                "task process exited"
            );
            Ok(ChildStatus::Exited(outcome))
        }

        cancel = &mut cancel_rx => {
            match cancel {
                Ok(()) => {
                    info!(
                        directory = %spec.directory.display(),
                        "termination requested; killing process"
                    );
                    if let Err(e) = child.kill().await {
                        warn!(
                            directory = %spec.directory.display(),
                            error = %e,
                            "failed to kill child process"
                        );
                    }
                }
                Err(e) => {
                    debug!(
                        directory = %spec.directory.display(),
                        error = %e,
                        "cancel channel closed without explicit cancellation"
                    );
                    // Child will be killed on drop due to kill_on_drop(true).
                }
            }
            for forwarder in forwarders {
                forwarder.abort();
            }
            Ok(ChildStatus::Cancelled)
        }
    }
}

/// Copy a child stream to the console line by line, each line prefixed
/// with `label`.
///
/// Bytes are forwarded as-is apart from lossy UTF-8 conversion. The reader
/// is kept open until EOF so the child never sees a closed pipe.
fn forward_output<R>(reader: R, label: String, console: Arc<dyn Console>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut errors = 0;
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    errors = 0;
                    console.write_str(&labelled(&label, &buf));
                }
                Err(e) => {
                    warn!(error = %e, "reading task output failed");
                    if !buf.is_empty() {
                        console.write_str(&labelled(&label, &buf));
                    }
                    errors += 1;
                    if errors >= MAX_READ_ERRORS {
                        break;
                    }
                }
            }
        }
    })
}

fn labelled(label: &str, chunk: &[u8]) -> String {
    let text = String::from_utf8_lossy(chunk);
    if text.ends_with('\n') {
        format!("{label}{text}")
    } else {
        format!("{label}{text}\n")
    }
}
