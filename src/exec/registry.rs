// src/exec/registry.rs

//! Live children of one invocation.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

/// Internal handle for a running child.
///
/// - `cancel` asks the child's task to kill its process.
/// - `handle` is the Tokio task driving the process.
struct ActiveChild {
    cancel: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

/// Children that have been spawned and have not reported an exit yet.
#[derive(Default)]
pub struct ChildRegistry {
    active: HashMap<PathBuf, ActiveChild>,
}

impl fmt::Debug for ChildRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildRegistry")
            .field("active", &self.active.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ChildRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        directory: PathBuf,
        cancel: oneshot::Sender<()>,
        handle: JoinHandle<()>,
    ) {
        self.active.insert(
            directory,
            ActiveChild {
                cancel: Some(cancel),
                handle,
            },
        );
    }

    /// Drop the entry for a child that has exited.
    pub fn forget(&mut self, directory: &Path) -> bool {
        self.active.remove(directory).is_some()
    }

    /// Ask every registered child to terminate. Returns how many requests
    /// were delivered; children that already finished are skipped.
    pub fn signal_all(&mut self) -> usize {
        let mut delivered = 0;
        for (directory, child) in self.active.iter_mut() {
            let Some(cancel) = child.cancel.take() else {
                debug!(directory = ?directory, "child already signalled");
                continue;
            };
            if cancel.send(()).is_ok() {
                delivered += 1;
            } else {
                debug!(directory = ?directory, "child already finished");
            }
        }
        delivered
    }

    /// Wait for every registered child task to finish and empty the registry.
    pub async fn reap(&mut self) {
        for (directory, child) in self.active.drain() {
            if let Err(e) = child.handle.await {
                debug!(directory = ?directory, error = %e, "child task ended abnormally");
            }
        }
    }
}
