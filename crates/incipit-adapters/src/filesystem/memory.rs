//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use incipit_core::application::ports::Filesystem;
use incipit_core::error::IncipitResult;

/// In-memory filesystem for testing.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let inner = self.inner.read().unwrap();
        let mut files: Vec<_> = inner.files.keys().cloned().collect();
        files.sort();
        files
    }

    /// Check whether a directory was created.
    pub fn has_dir(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap();
        inner.directories.contains(path)
    }

    /// Clear all contents.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.files.clear();
        inner.directories.clear();
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> IncipitResult<()> {
        let mut inner = lock_write(&self.inner)?;
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &str) -> IncipitResult<()> {
        let mut inner = lock_write(&self.inner)?;

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(
                    incipit_core::application::ApplicationError::FilesystemError {
                        path: path.display().to_string(),
                        reason: "Parent directory does not exist".into(),
                    }
                    .into(),
                );
            }
        }

        inner.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }
}

fn lock_write(
    inner: &RwLock<MemoryFilesystemInner>,
) -> IncipitResult<std::sync::RwLockWriteGuard<'_, MemoryFilesystemInner>> {
    inner.write().map_err(|_| {
        incipit_core::application::ApplicationError::FilesystemError {
            path: "<memory>".into(),
            reason: "filesystem lock poisoned".into(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_an_existing_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/a/b/x.txt"), "x").is_err());
        fs.create_dir_all(Path::new("/a/b")).unwrap();
        fs.write_file(Path::new("/a/b/x.txt"), "x").unwrap();
        assert_eq!(fs.read_file(Path::new("/a/b/x.txt")).as_deref(), Some("x"));
    }

    #[test]
    fn intermediate_directories_are_recorded() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/a/b/c")).unwrap();
        assert!(fs.has_dir(Path::new("/a")));
        assert!(fs.has_dir(Path::new("/a/b")));
        assert!(fs.exists(Path::new("/a/b/c")));
    }
}
