use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use treerun::engine::TaskOutcome;
use treerun::exec::{ChildSpec, ChildStatus, ProcessBackend};

/// What a fake child does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Exit with this outcome after the delay.
    Exit { outcome: TaskOutcome, after: Duration },
    /// Never exit on its own; only cancellation ends it.
    Hang,
}

impl Script {
    pub fn succeed_after(ms: u64) -> Self {
        Script::Exit {
            outcome: TaskOutcome::Success,
            after: Duration::from_millis(ms),
        }
    }

    pub fn fail_after(code: i32, ms: u64) -> Self {
        Script::Exit {
            outcome: TaskOutcome::Failed(code),
            after: Duration::from_millis(ms),
        }
    }
}

/// What the fake backend observed.
#[derive(Debug, Clone, Default)]
pub struct BackendLog {
    pub started: Vec<ChildSpec>,
    pub cancelled: Vec<PathBuf>,
    pub exited: Vec<PathBuf>,
}

/// A fake backend whose children follow per-directory scripts.
///
/// Directories without a script succeed immediately.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    scripts: HashMap<PathBuf, Script>,
    log: Arc<Mutex<BackendLog>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, directory: impl AsRef<Path>, script: Script) -> Self {
        self.scripts.insert(directory.as_ref().to_path_buf(), script);
        self
    }

    /// Shared handle to the log; stays valid after the backend is moved.
    pub fn log(&self) -> Arc<Mutex<BackendLog>> {
        Arc::clone(&self.log)
    }
}

impl ProcessBackend for ScriptedBackend {
    fn run_child(
        &self,
        spec: ChildSpec,
        mut cancel: oneshot::Receiver<()>,
    ) -> Pin<Box<dyn Future<Output = ChildStatus> + Send + 'static>> {
        let script = self
            .scripts
            .get(&spec.directory)
            .copied()
            .unwrap_or(Script::succeed_after(0));
        let log = Arc::clone(&self.log);

        Box::pin(async move {
            let directory = spec.directory.clone();
            log.lock().unwrap().started.push(spec);

            let finish = async {
                match script {
                    Script::Exit { outcome, after } => {
                        tokio::time::sleep(after).await;
                        outcome
                    }
                    Script::Hang => std::future::pending().await,
                }
            };

            tokio::select! {
                outcome = finish => {
                    log.lock().unwrap().exited.push(directory);
                    ChildStatus::Exited(outcome)
                }
                res = &mut cancel => {
                    if res.is_ok() {
                        log.lock().unwrap().cancelled.push(directory);
                    }
                    ChildStatus::Cancelled
                }
            }
        })
    }
}
