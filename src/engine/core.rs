// src/engine/core.rs

//! Pure completion state machine.
//!
//! The core consumes [`ChildExit`]s and produces:
//! - an updated [`InvocationState`]
//! - a list of commands describing what the supervisor should do next
//!
//! It has **no** channels, no Tokio types, and does not perform any IO, so
//! all completion semantics can be tested without spawning processes.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::debug;

use crate::engine::{ChildExit, InvocationState, TaskOutcome};

/// Command produced by the core, executed by the supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Every directory succeeded.
    Resolve,
    /// A directory failed; tear down everything still running.
    Abort { directory: PathBuf, code: i32 },
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the supervisor should keep waiting for exits.
    pub keep_running: bool,
}

impl CoreStep {
    fn running() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }

    fn finished(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: false,
        }
    }
}

/// Tracks which directories have not yet succeeded.
#[derive(Debug)]
pub struct CompletionCore {
    pending: HashSet<PathBuf>,
    state: InvocationState,
}

impl CompletionCore {
    pub fn new(directories: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            pending: directories.into_iter().collect(),
            state: InvocationState::Running,
        }
    }

    pub fn state(&self) -> &InvocationState {
        &self.state
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Called once before any exit arrives. With nothing to run the
    /// invocation succeeds immediately.
    pub fn start(&mut self) -> CoreStep {
        if self.state == InvocationState::Running && self.pending.is_empty() {
            self.state = InvocationState::AllSucceeded;
            return CoreStep::finished(vec![CoreCommand::Resolve]);
        }
        CoreStep {
            commands: Vec::new(),
            keep_running: !self.state.is_terminal(),
        }
    }

    /// Handle one child exit.
    ///
    /// Exits arriving after a terminal state are ignored.
    pub fn step(&mut self, exit: ChildExit) -> CoreStep {
        if self.state.is_terminal() {
            debug!(directory = ?exit.directory, "exit after terminal state; ignoring");
            return CoreStep::finished(Vec::new());
        }

        match exit.outcome {
            TaskOutcome::Success => {
                self.pending.remove(&exit.directory);
                if self.pending.is_empty() {
                    self.state = InvocationState::AllSucceeded;
                    return CoreStep::finished(vec![CoreCommand::Resolve]);
                }
                CoreStep::running()
            }
            TaskOutcome::Failed(code) => {
                self.state = InvocationState::Failed {
                    directory: exit.directory.clone(),
                    code,
                };
                CoreStep::finished(vec![CoreCommand::Abort {
                    directory: exit.directory,
                    code,
                }])
            }
        }
    }
}
