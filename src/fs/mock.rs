// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(Vec<String>), // List of child names
    /// Points at another path; resolved by `canonicalize` and directory reads.
    Link(PathBuf),
}

/// In-memory filesystem for discovery and locator tests.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    unreadable: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
            unreadable: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.insert(path.as_ref(), MockEntry::File(content.into()));
    }

    /// Add an (empty) directory and any missing parents.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut files = self.lock();
        Self::ensure_dir_entry(&mut files, path);
    }

    /// Add a symbolic link at `path` pointing to `target`.
    pub fn add_link(&self, path: impl AsRef<Path>, target: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::Link(target.as_ref().to_path_buf()));
    }

    /// Make `read_dir` fail for this directory, as if permission was denied.
    pub fn deny_read(&self, path: impl AsRef<Path>) {
        self.unreadable
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(path.as_ref().to_path_buf());
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.files.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let mut files = self.lock();
        files.insert(path.to_path_buf(), entry);

        if let Some(parent) = path.parent() {
            let parent = normalise_parent(parent);
            Self::ensure_dir_entry(&mut files, parent);
            Self::link_child(&mut files, parent, path);
        }
    }

    fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if files.contains_key(path) {
            return;
        }
        files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        if let Some(parent) = path.parent() {
            let parent = normalise_parent(parent);
            if parent != path {
                Self::ensure_dir_entry(files, parent);
                Self::link_child(files, parent, path);
            }
        }
    }

    fn link_child(files: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
        if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
            if let Some(name) = child.file_name().and_then(|n| n.to_str()) {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }

    /// Resolve links in every component of `path`. `None` if the result
    /// does not exist or links nest too deeply.
    fn resolve(files: &HashMap<PathBuf, MockEntry>, path: &Path) -> Option<PathBuf> {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            let mut hops = 0;
            while let Some(MockEntry::Link(target)) = files.get(&current) {
                hops += 1;
                if hops > 32 {
                    return None;
                }
                current = target.clone();
            }
        }
        files.contains_key(&current).then_some(current)
    }
}

fn normalise_parent(parent: &Path) -> &Path {
    if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = self.lock();
        let resolved = Self::resolve(&files, path);
        match resolved.as_ref().and_then(|p| files.get(p)) {
            Some(MockEntry::File(content)) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(_) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.lock();
        Self::resolve(&files, path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        let files = self.lock();
        let resolved = Self::resolve(&files, path);
        matches!(resolved.and_then(|p| files.get(&p)), Some(MockEntry::Dir(_)))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        let files = self.lock();
        Self::resolve(&files, path).ok_or_else(|| anyhow!("File not found: {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let denied = self
            .unreadable
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .contains(path);
        if denied {
            return Err(anyhow!("Permission denied: {:?}", path));
        }

        let files = self.lock();
        let resolved = Self::resolve(&files, path);
        match resolved.and_then(|p| files.get(&p)) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_create_their_parent_directories() {
        let fs = MockFileSystem::new();
        fs.add_file("apps/web/gulpfile.js", "");

        assert!(fs.is_dir(Path::new("apps")));
        assert!(fs.is_dir(Path::new("apps/web")));
        assert!(fs.exists(Path::new("apps/web/gulpfile.js")));
        assert_eq!(
            fs.read_dir(Path::new("apps")).unwrap(),
            vec![PathBuf::from("apps/web")]
        );
    }

    #[test]
    fn links_resolve_through_to_their_target() {
        let fs = MockFileSystem::new();
        fs.add_dir("real");
        fs.add_link("alias", "real");

        assert!(fs.is_dir(Path::new("alias")));
        assert_eq!(
            fs.canonicalize(Path::new("alias")).unwrap(),
            PathBuf::from("real")
        );
    }

    #[test]
    fn links_resolve_inside_longer_paths() {
        let fs = MockFileSystem::new();
        fs.add_file("real/gulpfile.js", "");
        fs.add_link("alias", "real");

        assert!(fs.exists(Path::new("alias/gulpfile.js")));
        assert_eq!(
            fs.read_dir(Path::new("alias")).unwrap(),
            vec![PathBuf::from("alias/gulpfile.js")]
        );
    }

    #[test]
    fn denied_directories_fail_to_list() {
        let fs = MockFileSystem::new();
        fs.add_dir("secret");
        fs.deny_read("secret");

        assert!(fs.is_dir(Path::new("secret")));
        assert!(fs.read_dir(Path::new("secret")).is_err());
    }
}
