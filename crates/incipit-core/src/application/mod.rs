//! Application layer: ports, the project structure, the tools, and
//! the orchestrator that drives a bootstrap run through its stages.

pub mod error;
pub mod orchestrator;
pub mod ports;
pub mod structure;
pub mod tools;

pub use error::ApplicationError;
pub use orchestrator::{BootstrapService, Hook, ToolContext};
pub use ports::{CommandOutput, CommandRunner, Dumper, Filesystem, Prompter};
pub use structure::{FileFormat, FileSpec, ProjectStructure};
pub use tools::Tool;
