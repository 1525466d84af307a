//! Ports: the traits adapters implement.
//!
//! The core never talks to a terminal, a disk, or a subprocess
//! directly. Everything goes through these traits so the whole
//! bootstrap pipeline runs unchanged against scripted prompts, an
//! in-memory filesystem, and a recording command runner in tests.

use std::path::Path;

use crate::application::structure::FileSpec;
use crate::domain::ConfigNode;
use crate::error::IncipitResult;

/// Interactive question surface.
pub trait Prompter {
    /// Offer a candidate value for confirmation. Returns the final
    /// answer, which may be empty when the user declines.
    fn confirm(&self, label: &str, candidate: &str) -> IncipitResult<String>;

    /// Ask for a value with no candidate. Required questions keep
    /// asking until the answer is non-empty.
    fn ask(&self, label: &str, required: bool) -> IncipitResult<String>;

    /// Pick one of several candidates.
    fn choose(&self, label: &str, candidates: &[String]) -> IncipitResult<String>;
}

/// Filesystem operations the bootstrap needs.
pub trait Filesystem: Send + Sync {
    fn create_dir_all(&self, path: &Path) -> IncipitResult<()>;
    fn write_file(&self, path: &Path, contents: &str) -> IncipitResult<()>;
    fn exists(&self, path: &Path) -> bool;
}

/// Captured output of a finished subprocess.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Subprocess execution.
pub trait CommandRunner {
    fn run(&self, argv: &[String], cwd: Option<&Path>) -> IncipitResult<CommandOutput>;

    /// Whether a program can be found on PATH.
    fn which(&self, program: &str) -> bool;
}

/// Serialization of a resolved configuration tree into file contents.
pub trait Dumper {
    fn dump(&self, spec: &FileSpec, root: &ConfigNode) -> IncipitResult<String>;
}
