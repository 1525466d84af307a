//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use incipit_core::{application::ports::Filesystem, error::IncipitResult};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> IncipitResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, contents: &str) -> IncipitResult<()> {
        std::fs::write(path, contents).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> incipit_core::error::IncipitError {
    use incipit_core::application::ApplicationError;

    ApplicationError::FilesystemError {
        path: path.display().to_string(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_reports_existence() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let nested = dir.path().join("a/b");
        fs.create_dir_all(&nested).unwrap();
        let file = nested.join("x.txt");
        fs.write_file(&file, "hello").unwrap();
        assert!(fs.exists(&file));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "hello");
    }
}
