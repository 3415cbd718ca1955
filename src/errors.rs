// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreerunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("no task runner found (checked: {})", join_paths(.candidates))]
    RunnerNotFound { candidates: Vec<PathBuf> },

    #[error("task failed in {} with exit code {code}", .directory.display())]
    TaskFailed { directory: PathBuf, code: i32 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TreerunError {
    /// True for the error class that has already been reported to the user
    /// by the teardown controller.
    pub fn is_task_failure(&self) -> bool {
        matches!(self, TreerunError::TaskFailed { .. })
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, TreerunError>;
