// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! The supervisor talks to a `ProcessBackend` instead of spawning processes
//! itself. This makes it easy to swap in a fake backend in tests while
//! keeping the production implementation in [`child`](super::child).

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::console::Console;
use crate::engine::{TaskName, TaskOutcome};
use crate::locate::RunnerLocation;

use super::child::run_child;

/// Everything needed to start one child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildSpec {
    pub directory: PathBuf,
    pub task: TaskName,
    pub runner: RunnerLocation,
}

/// How a child's future ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    /// The process exited on its own.
    Exited(TaskOutcome),
    /// The process was killed on request; its exit is not reported.
    Cancelled,
}

/// Trait abstracting how a single child is run.
///
/// Implementations must finish promptly once `cancel` fires, returning
/// [`ChildStatus::Cancelled`].
pub trait ProcessBackend: Send + Sync {
    fn run_child(
        &self,
        spec: ChildSpec,
        cancel: oneshot::Receiver<()>,
    ) -> Pin<Box<dyn Future<Output = ChildStatus> + Send + 'static>>;
}

/// Real backend: spawns the runner and writes its labelled output to a
/// console.
#[derive(Debug, Clone)]
pub struct RealProcessBackend {
    console: Arc<dyn Console>,
}

impl RealProcessBackend {
    pub fn new(console: Arc<dyn Console>) -> Self {
        Self { console }
    }
}

impl ProcessBackend for RealProcessBackend {
    fn run_child(
        &self,
        spec: ChildSpec,
        cancel: oneshot::Receiver<()>,
    ) -> Pin<Box<dyn Future<Output = ChildStatus> + Send + 'static>> {
        // Clone the console so the future doesn't borrow `self`.
        let console = Arc::clone(&self.console);
        Box::pin(run_child(spec, console, cancel))
    }
}
