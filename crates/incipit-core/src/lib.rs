//! Incipit Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Incipit
//! Python project bootstrapper, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          incipit-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │     (BootstrapService, the Tools)       │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Prompter, Filesystem, Runner, Dumper)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    incipit-adapters (Infrastructure)    │
//! │ (TerminalPrompter, LocalFilesystem, ..) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Domain Layer (Pure Logic)         │
//! │ (Environment, StringTemplate, Variables)│
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use incipit_core::prelude::*;
//!
//! // 1. Assemble environment and tools
//! let mut environment = Environment::default();
//! let mut tools: Vec<Box<dyn Tool>> = vec![
//!     Box::new(Git),
//!     Box::new(Venv),
//!     Box::new(License::default()),
//!     Box::new(Pep517::new(Pep517Backend::Flit)),
//! ];
//!
//! // 2. Use the bootstrap service (with injected adapters)
//! let service = BootstrapService::new(prompter, runner, filesystem, dumper);
//! service.bootstrap(workon, &mut tools, &mut environment)?;
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

#[cfg(test)]
pub mod test_support;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BootstrapService, Hook, ProjectStructure, Tool, ToolContext,
        ports::{CommandOutput, CommandRunner, Dumper, Filesystem, Prompter},
        structure::{FileFormat, FileSpec},
        tools::{
            Git, KNOWN_LICENSES, License, Pep517, Pep517Backend, Poetry, PyEnv, Setuptools, Venv,
        },
    };
    pub use crate::domain::{
        ConfigNode, Environment, Stage, StringTemplate, TemplateDict, TemplateList, VarKind,
        Variable, VariableSet, sanitize,
    };
    pub use crate::error::{IncipitError, IncipitResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
