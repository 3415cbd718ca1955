use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Task definition file name used by the default settings.
pub const TASK_FILE: &str = "gulpfile.js";

/// A directory tree on disk that is removed when dropped.
pub struct TaskTree {
    dir: TempDir,
}

impl TaskTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("creating temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Create `rel` as a task directory (it gets a task definition file).
    pub fn task_dir(self, rel: &str) -> Self {
        self.file(&format!("{rel}/{TASK_FILE}"), "")
    }

    /// Create an empty directory.
    pub fn dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.path(rel)).expect("creating dir");
        self
    }

    /// Create a file with the given contents, creating parents as needed.
    pub fn file(self, rel: &str, contents: &str) -> Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("creating parent dir");
        }
        fs::write(&path, contents).expect("writing file");
        self
    }
}

impl Default for TaskTree {
    fn default() -> Self {
        Self::new()
    }
}
