// src/console.rs

//! User-facing console output.
//!
//! Everything the user is meant to read (the run banner, labelled task
//! output, the failure notice) goes through a [`Console`]. Diagnostics go to
//! `tracing` instead.

use std::fmt::{self, Debug, Write as _};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::locate::RunnerLocation;

/// Destination for console text. Each call is written as one unit.
pub trait Console: Send + Sync + Debug {
    fn write_str(&self, text: &str);
}

/// Writes to the process's standard output.
#[derive(Debug, Clone, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn write_str(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        // Nothing sensible to do if stdout is gone.
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

/// Collects console text in memory.
#[derive(Clone, Default)]
pub struct BufferConsole {
    buf: Arc<Mutex<String>>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.buf.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl Debug for BufferConsole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferConsole").finish_non_exhaustive()
    }
}

impl Console for BufferConsole {
    fn write_str(&self, text: &str) {
        self.buf
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push_str(text);
    }
}

/// Prefix written before every line of a child's output.
///
/// Short directory names get an extra tab so output from several
/// directories lines up.
pub fn output_label(directory: &Path) -> String {
    let shown = directory.display().to_string();
    let padding = if shown.chars().count() > 22 { "\t" } else { "\t\t" };
    format!("({shown}){padding}-> ")
}

/// Banner printed before any task starts.
pub fn banner(runner: &RunnerLocation, task: &str, directories: &[PathBuf]) -> String {
    let mut out = format!("Running cmd:   {runner} {task}\nIn directories: \n");
    for dir in directories {
        let _ = writeln!(out, "           {}", dir.display());
    }
    out.push_str("\n----------\n\n");
    out
}

/// Notice printed once when a task fails.
pub fn failure_notice(directory: &Path) -> String {
    format!(
        "\n\nEncountered an error in: {}\nPlease resolve errors and try again.\n\n",
        directory.display()
    )
}
