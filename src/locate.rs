// src/locate.rs

//! Runner lookup.
//!
//! Candidates are checked in a fixed order and the first one that exists
//! wins:
//! 1. a runner pinned through `--runner` or `[runner].path`
//! 2. the global install (`/usr/local/bin/gulp` by default)
//! 3. the runner in the project's dependency directory, relative to the
//!    current working directory
//! 4. the runner bundled next to the `treerun` executable

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::RunnerSettings;
use crate::errors::{Result, TreerunError};
use crate::fs::FileSystem;

/// Absolute path of the executable used to run tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerLocation(PathBuf);

impl RunnerLocation {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RunnerLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Pinned,
    Global,
    ProjectLocal,
    Bundled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerCandidate {
    pub kind: CandidateKind,
    pub path: PathBuf,
}

/// Ordered list of runner candidates for one invocation.
#[derive(Debug, Clone)]
pub struct RunnerLocator {
    candidates: Vec<RunnerCandidate>,
}

impl RunnerLocator {
    /// Build the candidate list.
    ///
    /// `bundle_dir` is the directory holding the `treerun` executable, when
    /// it can be determined.
    pub fn from_settings(settings: &RunnerSettings, cwd: &Path, bundle_dir: Option<&Path>) -> Self {
        let mut candidates = Vec::with_capacity(4);

        if let Some(pinned) = &settings.path {
            candidates.push(RunnerCandidate {
                kind: CandidateKind::Pinned,
                path: cwd.join(pinned),
            });
        }
        candidates.push(RunnerCandidate {
            kind: CandidateKind::Global,
            path: settings.global.clone(),
        });
        candidates.push(RunnerCandidate {
            kind: CandidateKind::ProjectLocal,
            path: cwd.join(&settings.local),
        });
        if let Some(dir) = bundle_dir {
            candidates.push(RunnerCandidate {
                kind: CandidateKind::Bundled,
                path: dir.join(&settings.local),
            });
        }

        Self { candidates }
    }

    /// First existing candidate, if any. No side effects.
    pub fn locate(&self, fs: &dyn FileSystem) -> Option<RunnerLocation> {
        self.candidates.iter().find_map(|candidate| {
            let found = fs.exists(&candidate.path);
            debug!(kind = ?candidate.kind, path = ?candidate.path, found, "checked runner candidate");
            found.then(|| RunnerLocation::new(candidate.path.clone()))
        })
    }

    /// Like [`locate`](Self::locate) but fails with `RunnerNotFound` when no
    /// candidate exists.
    pub fn require(&self, fs: &dyn FileSystem) -> Result<RunnerLocation> {
        self.locate(fs).ok_or_else(|| TreerunError::RunnerNotFound {
            candidates: self.candidates.iter().map(|c| c.path.clone()).collect(),
        })
    }
}

/// Directory containing the running executable.
pub fn bundle_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}
