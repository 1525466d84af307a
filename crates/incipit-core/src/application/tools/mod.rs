//! Bootstrap tools.
//!
//! Each tool owns one concern of the generated project: version
//! control, the virtual environment, licensing, or the build backend.
//! Tools only interact through the structure they share and the hooks
//! they exchange, so any subset composes.

mod git;
mod license;
mod pep517;
mod poetry;
mod pyenv;
mod setuptools;
mod venv;

pub use git::Git;
pub use license::{KNOWN_LICENSES, License, classifier};
pub use pep517::{Pep517, Pep517Backend};
pub use poetry::Poetry;
pub use pyenv::PyEnv;
pub use setuptools::Setuptools;
pub use venv::Venv;

use std::path::Path;

use crate::application::orchestrator::{Hook, ToolContext};
use crate::error::IncipitResult;

/// One participant in a bootstrap run. All callbacks default to
/// no-ops, a tool implements only the stages it cares about.
pub trait Tool {
    fn name(&self) -> &'static str;

    /// Register files, variables, and hooks. Runs before anything
    /// touches disk.
    fn setup(&mut self, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        let _ = ctx;
        Ok(())
    }

    /// React to a hook another tool emitted.
    fn on_hook(&mut self, hook: &Hook, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        let _ = (hook, ctx);
        Ok(())
    }

    /// Runs after directories exist but before files are written.
    fn pre(&mut self, workon: &Path, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        let _ = (workon, ctx);
        Ok(())
    }

    /// Runs after every file has been written.
    fn post(&mut self, workon: &Path, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        let _ = (workon, ctx);
        Ok(())
    }
}
