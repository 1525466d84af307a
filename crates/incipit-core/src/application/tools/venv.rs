//! Virtual environment tool.
//!
//! Creates the venv before files are committed and repoints
//! `PYTHON_CMD` at the interpreter inside it, so later tools install
//! into the project environment instead of the system one.

use std::path::Path;

use tracing::debug;

use crate::application::error::ApplicationError;
use crate::application::orchestrator::{Hook, ToolContext};
use crate::application::tools::Tool;
use crate::error::IncipitResult;

#[derive(Debug, Default)]
pub struct Venv;

impl Tool for Venv {
    fn name(&self) -> &'static str {
        "venv"
    }

    fn setup(&mut self, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        ctx.emit(Hook::VcsIgnore("{VENV_FOLDER}".into()));
        Ok(())
    }

    fn pre(&mut self, workon: &Path, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        let folder = ctx
            .environment
            .lookup("VENV_FOLDER", ctx.prompter)?
            .ok_or_else(|| ApplicationError::CommandSubstitution {
                command: "python -m venv {VENV_FOLDER}".into(),
            })?;
        let venv_path = workon.join(&folder);

        ctx.run(
            &[
                "{PYTHON_CMD}".into(),
                "-m".into(),
                "venv".into(),
                "--upgrade-deps".into(),
                venv_path.display().to_string().into(),
            ],
            None,
        )?;

        let bin_dir = if cfg!(windows) { "Scripts" } else { "bin" };
        let python = venv_path.join(bin_dir).join("python");
        debug!(python = %python.display(), "repointing PYTHON_CMD");
        ctx.environment
            .override_value("PYTHON_CMD", &python.display().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::orchestrator::BootstrapService;
    use crate::domain::Environment;
    use crate::test_support::{
        MemoryFilesystem, PlainDumper, RecordingRunner, ScriptedPrompter,
    };

    #[test]
    fn venv_is_created_and_python_repointed() {
        let runner = RecordingRunner::default();
        let fs = MemoryFilesystem::default();
        let service = BootstrapService::new(
            Box::new(ScriptedPrompter::default()),
            Box::new(runner.clone()),
            Box::new(fs),
            Box::new(PlainDumper),
        );
        let mut tools: Vec<Box<dyn Tool>> = vec![Box::new(Venv)];
        let mut env = Environment::default();
        service
            .bootstrap(Path::new("/work"), &mut tools, &mut env)
            .unwrap();

        let commands = runner.commands();
        assert!(
            commands
                .iter()
                .any(|c| c.starts_with("python3 -m venv --upgrade-deps"))
        );

        let prompter = ScriptedPrompter::default();
        let python = env.lookup("PYTHON_CMD", &prompter).unwrap();
        assert!(python.unwrap().contains(".venv"));
    }
}
