// src/engine/runtime.rs

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::console::Console;
use crate::discover::TaskDirectorySet;
use crate::errors::{Result, TreerunError};
use crate::exec::{ChildRegistry, ChildSpec, ChildStatus, ProcessBackend};
use crate::locate::RunnerLocation;

use super::core::CompletionCore;
use super::teardown::TeardownController;
use super::{ChildExit, CoreCommand, InvocationState};

/// Runs one task in every task directory and waits for the aggregate result.
///
/// This is the async IO shell around [`CompletionCore`]: it spawns one child
/// per directory through the `ProcessBackend`, reads their exits from a
/// channel, feeds them to the core and executes the resulting commands.
/// The registry, pending set and failure latch all live here, so separate
/// invocations never share state.
pub struct Supervisor<B: ProcessBackend> {
    backend: B,
    registry: ChildRegistry,
    teardown: TeardownController,
}

impl<B: ProcessBackend> fmt::Debug for Supervisor<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("registry", &self.registry)
            .field("teardown", &self.teardown)
            .finish_non_exhaustive()
    }
}

impl<B: ProcessBackend> Supervisor<B> {
    pub fn new(backend: B, console: Arc<dyn Console>) -> Self {
        Self {
            backend,
            registry: ChildRegistry::new(),
            teardown: TeardownController::new(console),
        }
    }

    /// Run `task` in every directory of `directories`.
    ///
    /// - Resolves once every child exited with code 0 (immediately when
    ///   there are no directories).
    /// - On the first non-zero exit, signals every other child, waits for
    ///   them to be killed and fails with [`TreerunError::TaskFailed`].
    pub async fn run(
        mut self,
        directories: &TaskDirectorySet,
        task: &str,
        runner: &RunnerLocation,
    ) -> Result<()> {
        let mut core = CompletionCore::new(directories.iter().cloned());
        if !core.start().keep_running {
            info!("no task directories; nothing to run");
            return finish(core.state());
        }

        // Each child sends at most one exit, so this never blocks a sender.
        let (exit_tx, mut exit_rx) = mpsc::channel::<ChildExit>(directories.len());
        for directory in directories {
            self.spawn_child(
                ChildSpec {
                    directory: directory.clone(),
                    task: task.to_string(),
                    runner: runner.clone(),
                },
                exit_tx.clone(),
            );
        }
        drop(exit_tx);
        info!(count = directories.len(), task, "spawned task processes");

        while let Some(exit) = exit_rx.recv().await {
            debug!(?exit, pending = core.pending_len(), "child exited");
            self.registry.forget(&exit.directory);

            let step = core.step(exit);
            for command in step.commands {
                self.execute_command(command).await;
            }

            if !step.keep_running {
                break;
            }
        }

        finish(core.state())
    }

    fn spawn_child(&mut self, spec: ChildSpec, exit_tx: mpsc::Sender<ChildExit>) {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let directory = spec.directory.clone();
        let child = self.backend.run_child(spec, cancel_rx);

        let report_dir = directory.clone();
        let handle = tokio::spawn(async move {
            match child.await {
                ChildStatus::Exited(outcome) => {
                    let _ = exit_tx
                        .send(ChildExit {
                            directory: report_dir,
                            outcome,
                        })
                        .await;
                }
                ChildStatus::Cancelled => {
                    debug!(directory = ?report_dir, "child cancelled; not reporting exit");
                }
            }
        });

        self.registry.insert(directory, cancel_tx, handle);
    }

    async fn execute_command(&mut self, command: CoreCommand) {
        match command {
            CoreCommand::Resolve => {
                info!("all task directories succeeded");
            }
            CoreCommand::Abort { directory, code } => {
                debug!(directory = ?directory, code, "aborting invocation");
                self.abort(&directory).await;
            }
        }
    }

    async fn abort(&mut self, offending: &Path) {
        if self.teardown.abort(offending, &mut self.registry) {
            self.registry.reap().await;
        }
    }
}

fn finish(state: &InvocationState) -> Result<()> {
    match state {
        InvocationState::AllSucceeded => Ok(()),
        InvocationState::Failed { directory, code } => Err(TreerunError::TaskFailed {
            directory: directory.clone(),
            code: *code,
        }),
        InvocationState::Running => Err(TreerunError::Other(anyhow::anyhow!(
            "children stopped reporting before every directory finished"
        ))),
    }
}
