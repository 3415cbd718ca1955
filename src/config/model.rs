// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_TASK_FILE: &str = "gulpfile.js";
pub const DEFAULT_TASK: &str = "default";
pub const DEFAULT_GLOBAL_RUNNER: &str = "/usr/local/bin/gulp";
pub const DEFAULT_LOCAL_RUNNER: &str = "node_modules/gulp/bin/gulp.js";

/// Settings exactly as read from TOML (plus CLI overrides), before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    /// File whose presence marks a task directory.
    pub task_file: String,
    /// Task run when the last argument turns out to be a path.
    pub default_task: String,
    pub runner: RunnerSettings,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            task_file: DEFAULT_TASK_FILE.to_string(),
            default_task: DEFAULT_TASK.to_string(),
            runner: RunnerSettings::default(),
        }
    }
}

impl RawSettings {
    /// Apply CLI flags on top of file values.
    pub fn apply_overrides(&mut self, runner: Option<PathBuf>, task_file: Option<String>) {
        if let Some(path) = runner {
            self.runner.path = Some(path);
        }
        if let Some(name) = task_file {
            self.task_file = name;
        }
    }
}

/// `[runner]` section: where to look for the task runner executable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerSettings {
    /// Pinned runner; checked before every other candidate.
    pub path: Option<PathBuf>,
    /// Well-known global install location.
    pub global: PathBuf,
    /// Runner path relative to a project's dependency directory.
    pub local: PathBuf,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            path: None,
            global: PathBuf::from(DEFAULT_GLOBAL_RUNNER),
            local: PathBuf::from(DEFAULT_LOCAL_RUNNER),
        }
    }
}

/// Validated settings. Only obtainable through `Settings::try_from(raw)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub task_file: String,
    pub default_task: String,
    pub runner: RunnerSettings,
}

impl Settings {
    pub(crate) fn new_unchecked(raw: RawSettings) -> Self {
        Self {
            task_file: raw.task_file,
            default_task: raw.default_task,
            runner: raw.runner,
        }
    }
}
