// src/discover.rs

//! Task directory discovery.
//!
//! Starting from the root paths, a path is a task directory when it directly
//! contains the task definition file. Task directories are not descended
//! into. Any other directory is listed and its entries are searched in turn;
//! everything else contributes nothing.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::fs::FileSystem;

/// Deduplicated task directories, in discovery order.
///
/// Directory entries are visited in sorted order, so the same tree always
/// produces the same sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDirectorySet {
    dirs: Vec<PathBuf>,
}

impl TaskDirectorySet {
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.dirs.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl FromIterator<PathBuf> for TaskDirectorySet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let dirs = iter
            .into_iter()
            .filter(|dir| seen.insert(dir.clone()))
            .collect();
        Self { dirs }
    }
}

impl<'a> IntoIterator for &'a TaskDirectorySet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.dirs.iter()
    }
}

/// Walks root paths looking for directories that hold `task_file`.
#[derive(Debug)]
pub struct Discoverer<'a> {
    fs: &'a dyn FileSystem,
    task_file: &'a str,
}

impl<'a> Discoverer<'a> {
    pub fn new(fs: &'a dyn FileSystem, task_file: &'a str) -> Self {
        Self { fs, task_file }
    }

    /// Expand `roots` into the set of task directories beneath them.
    pub fn discover(&self, roots: &[PathBuf]) -> TaskDirectorySet {
        let mut visited = HashSet::new();
        let found: TaskDirectorySet = self.walk(roots, &mut visited).into_iter().collect();
        debug!(roots = ?roots, found = found.len(), "task directory discovery finished");
        found
    }

    /// Depth-first search over `paths`.
    ///
    /// `visited` holds the canonical form of every directory entered so
    /// far. A directory reached again (through a link, a cycle or an
    /// overlapping root) is not entered twice.
    fn walk(&self, paths: &[PathBuf], visited: &mut HashSet<PathBuf>) -> Vec<PathBuf> {
        paths
            .iter()
            .flat_map(|path| self.visit(path, visited))
            .collect()
    }

    fn visit(&self, path: &Path, visited: &mut HashSet<PathBuf>) -> Vec<PathBuf> {
        let is_task_dir = self.fs.exists(&path.join(self.task_file));
        if !is_task_dir && !self.fs.is_dir(path) {
            return Vec::new();
        }

        let canonical = self
            .fs
            .canonicalize(path)
            .unwrap_or_else(|_| path.to_path_buf());
        if !visited.insert(canonical) {
            debug!(path = ?path, "directory already visited; skipping");
            return Vec::new();
        }

        if is_task_dir {
            return vec![path.to_path_buf()];
        }

        let mut children = match self.fs.read_dir(path) {
            Ok(children) => children,
            Err(err) => {
                warn!(path = ?path, error = %err, "cannot list directory; skipping");
                return Vec::new();
            }
        };
        children.sort();
        self.walk(&children, visited)
    }
}
