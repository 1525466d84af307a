//! Git version control tool.
//!
//! Initializes the repository, collects ignore patterns from other
//! tools into `.gitignore`, borrows the author identity from the git
//! configuration, and stages everything at the end of the run.

use std::path::Path;

use tracing::debug;

use crate::application::error::ApplicationError;
use crate::application::orchestrator::{Hook, ToolContext};
use crate::application::structure::FileSpec;
use crate::application::tools::Tool;
use crate::error::IncipitResult;

#[derive(Debug, Default)]
pub struct Git;

impl Git {
    /// Read one `git config` key into the environment, injecting an
    /// empty string when the key is unset so templates still render.
    fn inject_config(
        &self,
        ctx: &mut ToolContext<'_>,
        workon: &Path,
        key: &str,
        variable: &str,
    ) -> IncipitResult<()> {
        let output = ctx.run_unchecked(
            &[
                "git".into(),
                "-C".into(),
                workon.display().to_string().into(),
                "config".into(),
                key.into(),
            ],
            None,
        )?;
        let value = if output.success() {
            output.stdout.trim().to_owned()
        } else {
            String::new()
        };
        debug!(variable, %value, "git config lookup");
        ctx.environment.suggest(variable, &value);
        Ok(())
    }
}

impl Tool for Git {
    fn name(&self) -> &'static str {
        "git"
    }

    fn setup(&mut self, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        if !ctx.runner.which("git") {
            return Err(ApplicationError::ProgramNotFound {
                program: "git".into(),
            }
            .into());
        }
        ctx.emit(Hook::ProjectUrl {
            kind: "Repository".into(),
            value: "{REPOSITORY}".into(),
        });
        ctx.emit(Hook::ProjectUrl {
            kind: "Issue".into(),
            value: "{REPOSITORY}/issues".into(),
        });
        ctx.emit(Hook::ProjectUrl {
            kind: "Documentation".into(),
            value: "{REPOSITORY}/wiki".into(),
        });
        Ok(())
    }

    fn on_hook(&mut self, hook: &Hook, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        if let Hook::VcsIgnore(pattern) = hook {
            ctx.structure
                .config_list(FileSpec::text(".gitignore"))?
                .push(pattern.as_str());
        }
        Ok(())
    }

    fn pre(&mut self, workon: &Path, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        ctx.run(
            &["git".into(), "init".into(), workon.display().to_string().into()],
            None,
        )?;
        self.inject_config(ctx, workon, "user.name", "AUTHOR_NAME")?;
        self.inject_config(ctx, workon, "user.email", "AUTHOR_EMAIL")?;
        Ok(())
    }

    fn post(&mut self, workon: &Path, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        ctx.run(
            &[
                "git".into(),
                "-C".into(),
                workon.display().to_string().into(),
                "add".into(),
                "--all".into(),
            ],
            None,
        )?;
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

    fn run_bootstrap(runner: RecordingRunner) -> (MemoryFilesystem, RecordingRunner) {
        let fs = MemoryFilesystem::default();
        let service = BootstrapService::new(
            Box::new(ScriptedPrompter::default()),
            Box::new(runner.clone()),
            Box::new(fs.clone()),
            Box::new(PlainDumper),
        );
        let mut tools: Vec<Box<dyn Tool>> = vec![Box::new(Git)];
        let mut env = Environment::default();
        service
            .bootstrap(Path::new("/work"), &mut tools, &mut env)
            .unwrap();
        (fs, runner)
    }

    #[test]
    fn init_and_stage_commands_are_issued() {
        let (_fs, runner) = run_bootstrap(RecordingRunner::default());
        let commands = runner.commands();
        assert!(commands.iter().any(|c| c.starts_with("git init")));
        assert!(commands.iter().any(|c| c.ends_with("add --all")));
    }

    #[test]
    fn git_identity_is_suggested_to_the_environment() {
        let runner = RecordingRunner::default();
        runner.respond("git config user.name", "Ada Lovelace\n");
        runner.respond("git config user.email", "ada@example.org\n");
        let fs = MemoryFilesystem::default();
        let service = BootstrapService::new(
            Box::new(ScriptedPrompter::accept_all()),
            Box::new(runner),
            Box::new(fs),
            Box::new(PlainDumper),
        );
        let mut tools: Vec<Box<dyn Tool>> = vec![Box::new(Git)];
        let mut env = Environment::default();
        service
            .bootstrap(Path::new("/work"), &mut tools, &mut env)
            .unwrap();
        let prompter = ScriptedPrompter::accept_all();
        assert_eq!(
            env.lookup("AUTHOR_NAME", &prompter).unwrap().as_deref(),
            Some("Ada Lovelace")
        );
    }

    #[test]
    fn missing_git_fails_setup() {
        let runner = RecordingRunner::default();
        runner.hide_program("git");
        let fs = MemoryFilesystem::default();
        let service = BootstrapService::new(
            Box::new(ScriptedPrompter::default()),
            Box::new(runner),
            Box::new(fs),
            Box::new(PlainDumper),
        );
        let mut tools: Vec<Box<dyn Tool>> = vec![Box::new(Git)];
        let mut env = Environment::default();
        let err = service.bootstrap(Path::new("/work"), &mut tools, &mut env);
        assert!(err.is_err());
    }
}
