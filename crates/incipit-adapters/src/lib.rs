//! Infrastructure adapters for Incipit.
//!
//! This crate implements the ports defined in `incipit-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod dumper;
pub mod filesystem;
pub mod prompt;
pub mod runner;

// Re-export commonly used adapters
pub use dumper::FormatDumper;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
#[cfg(feature = "interactive")]
pub use prompt::TerminalPrompter;
pub use prompt::{AssumeDefaults, ScriptedPrompter};
pub use runner::{RecordingRunner, SystemRunner};
