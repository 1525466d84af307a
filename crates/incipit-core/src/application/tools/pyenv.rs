//! Pyenv-virtualenv tool.
//!
//! Alternative to [`crate::application::tools::Venv`]: the project
//! environment lives under the pyenv root instead of inside the
//! project folder, and `pyenv local` pins it through a
//! `.python-version` file.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::application::error::ApplicationError;
use crate::application::orchestrator::{Hook, ToolContext};
use crate::application::tools::Tool;
use crate::domain::StringTemplate;
use crate::error::IncipitResult;

#[derive(Debug, Default)]
pub struct PyEnv;

impl Tool for PyEnv {
    fn name(&self) -> &'static str {
        "pyenv"
    }

    fn setup(&mut self, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        if !ctx.runner.which("pyenv") {
            return Err(ApplicationError::ProgramNotFound {
                program: "pyenv".into(),
            }
            .into());
        }

        let output = ctx.run(&["pyenv".into(), "root".into()], None)?;
        let root = output.stdout.trim().to_owned();
        if root.is_empty() {
            return Err(ApplicationError::CommandFailed {
                command: "pyenv root".into(),
                stderr: "pyenv root returned no path".into(),
                status: output.status,
            }
            .into());
        }
        ctx.environment.inject("PYENV_ROOT", &root);

        // the global interpreter is only a suggestion, the user may
        // pin another version
        let output = ctx.run_unchecked(&["pyenv".into(), "global".into()], None)?;
        let global = output.stdout.trim().to_owned();
        if output.success() && !global.is_empty() {
            ctx.environment.suggest("PYENV_VERSION", &global);
        }

        ctx.emit(Hook::VcsIgnore(".python-version".into()));
        Ok(())
    }

    fn pre(&mut self, workon: &Path, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        ctx.run(
            &[
                "pyenv".into(),
                "virtualenv".into(),
                "{PYENV_VERSION}".into(),
                "{PROJECT_NAME}_{PYENV_VERSION}".into(),
            ],
            None,
        )?;
        // writes .python-version into the project folder
        ctx.run(
            &[
                "pyenv".into(),
                "local".into(),
                "{PROJECT_NAME}_{PYENV_VERSION}".into(),
            ],
            Some(workon),
        )?;

        let render = |ctx: &mut ToolContext<'_>, pattern: &str| -> IncipitResult<String> {
            StringTemplate::from(pattern)
                .render(ctx.environment, ctx.prompter)?
                .ok_or_else(|| {
                    ApplicationError::CommandSubstitution {
                        command: pattern.to_owned(),
                    }
                    .into()
                })
        };
        let root = render(ctx, "{PYENV_ROOT}")?;
        let version = render(ctx, "{PYENV_VERSION}")?;
        let name = render(ctx, "{PROJECT_NAME}_{PYENV_VERSION}")?;

        let bin_dir = if cfg!(windows) { "Scripts" } else { "bin" };
        let python = PathBuf::from(root)
            .join("versions")
            .join(version)
            .join("envs")
            .join(name)
            .join(bin_dir)
            .join("python");
        debug!(python = %python.display(), "repointing PYTHON_CMD");
        ctx.environment
            .override_value("PYTHON_CMD", &python.display().to_string());

        ctx.run(
            &[
                "{PYTHON_CMD}".into(),
                "-m".into(),
                "pip".into(),
                "install".into(),
                "--upgrade".into(),
                "pip>=21.3.0".into(),
            ],
            None,
        )?;
        Ok(())
    }
}
