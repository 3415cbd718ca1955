// src/engine/mod.rs

//! Orchestration engine for treerun.
//!
//! This module ties together:
//! - the completion core (pending directories, terminal outcome)
//! - the teardown controller (one-shot kill sweep on first failure)
//! - the supervisor, the async shell that spawns one child per task
//!   directory and feeds their exits into the core
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::path::PathBuf;

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// How a child process finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed(i32),
}

impl TaskOutcome {
    /// Map a process exit code (`None` when killed by a signal).
    pub fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => TaskOutcome::Success,
            Some(code) => TaskOutcome::Failed(code),
            None => TaskOutcome::Failed(-1),
        }
    }
}

/// Exit report sent by each child to the supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildExit {
    pub directory: PathBuf,
    pub outcome: TaskOutcome,
}

/// Lifecycle of one invocation. `AllSucceeded` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationState {
    Running,
    AllSucceeded,
    Failed { directory: PathBuf, code: i32 },
}

impl InvocationState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvocationState::Running)
    }
}

pub mod core;
pub mod runtime;
pub mod teardown;

pub use self::core::{CompletionCore, CoreCommand, CoreStep};
pub use runtime::Supervisor;
pub use teardown::{FailureLatch, TeardownController};
