// src/invocation.rs

//! Turning positional arguments into root paths and a task name.

use std::path::{Component, Path, PathBuf};

use crate::engine::TaskName;
use crate::fs::FileSystem;

/// What to run and where to start looking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub roots: Vec<PathBuf>,
    pub task: TaskName,
}

impl Invocation {
    /// Infer roots and task from positional arguments.
    ///
    /// - With no arguments, `default_task` runs under `cwd`.
    /// - If the last argument exists on disk it is a root as well and the
    ///   task is `default_task`.
    /// - Otherwise the last argument is the task and everything before it is
    ///   a root (possibly none).
    ///
    /// Relative arguments are resolved against `cwd`.
    pub fn from_args(
        args: &[String],
        default_task: &str,
        cwd: &Path,
        fs: &dyn FileSystem,
    ) -> Self {
        let resolve = |arg: &String| resolve_against(cwd, Path::new(arg));

        match args.split_last() {
            None => Self {
                roots: vec![cwd.to_path_buf()],
                task: default_task.to_string(),
            },
            Some((last, _)) if fs.exists(&resolve(last)) => Self {
                roots: args.iter().map(resolve).collect(),
                task: default_task.to_string(),
            },
            Some((last, rest)) => Self {
                roots: rest.iter().map(resolve).collect(),
                task: last.clone(),
            },
        }
    }
}

/// `cwd.join(path)` without the `.` components.
fn resolve_against(cwd: &Path, path: &Path) -> PathBuf {
    cwd.join(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
