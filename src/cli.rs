// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `treerun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "treerun",
    version,
    about = "Run a task in every directory of a tree that defines one.",
    long_about = None
)]
pub struct CliArgs {
    /// Root directories to search, optionally followed by the task name.
    ///
    /// If the last value is an existing path it is treated as another root
    /// and the default task is run.
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Treerun.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use this runner executable instead of searching for one.
    #[arg(long, value_name = "PATH")]
    pub runner: Option<PathBuf>,

    /// Name of the task definition file that marks a task directory.
    #[arg(long, value_name = "NAME")]
    pub task_file: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TREERUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the command and target directories without running anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_values_keep_their_order() {
        let args = CliArgs::parse_from(["treerun", "apps", "libs", "build"]);
        assert_eq!(args.args, vec!["apps", "libs", "build"]);
        assert!(!args.dry_run);
        assert!(args.runner.is_none());
    }

    #[test]
    fn flags_are_accepted_alongside_positionals() {
        let args = CliArgs::parse_from([
            "treerun",
            "--runner",
            "/opt/gulp",
            "--task-file",
            "Gulpfile.js",
            "--dry-run",
            "apps",
        ]);
        assert_eq!(args.runner, Some(PathBuf::from("/opt/gulp")));
        assert_eq!(args.task_file.as_deref(), Some("Gulpfile.js"));
        assert!(args.dry_run);
        assert_eq!(args.args, vec!["apps"]);
    }
}
