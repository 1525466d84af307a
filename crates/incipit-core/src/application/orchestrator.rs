//! Bootstrap orchestration.
//!
//! Tools never call each other. When one has something another might
//! care about (a dependency to add, a classifier, an ignore pattern)
//! it emits a [`Hook`]; the orchestrator dispatches queued hooks to
//! every tool between stages. A handler may emit further hooks, the
//! queue is drained to a fixed point.
//!
//! # Run sequence
//!
//! | Stage  | Action                                             |
//! |--------|----------------------------------------------------|
//! | Setup  | every tool registers files, variables, hooks       |
//! | —      | dispatch queued hooks                              |
//! | Mkdir  | render file paths, create directories              |
//! | Pre    | every tool runs pre-commit actions                 |
//! | —      | dispatch hooks emitted during Pre                  |
//! | Commit | resolve trees, write files                         |
//! | Post   | every tool runs post-commit actions                |

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::application::error::ApplicationError;
use crate::application::ports::{CommandOutput, CommandRunner, Dumper, Filesystem, Prompter};
use crate::application::structure::ProjectStructure;
use crate::application::tools::Tool;
use crate::domain::{Environment, Stage, StringTemplate};
use crate::error::IncipitResult;

/// Cross-tool notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum Hook {
    /// A package the build tooling should install for development.
    BuildDependency {
        name: String,
        min_version: Option<String>,
    },
    /// A trove classifier for the project metadata.
    Classifier(String),
    /// A named URL for the project metadata.
    ProjectUrl { kind: String, value: StringTemplate },
    /// A pattern the version control system should ignore.
    VcsIgnore(String),
}

/// Everything a tool may touch during one callback.
pub struct ToolContext<'a> {
    pub environment: &'a mut Environment,
    pub structure: &'a mut ProjectStructure,
    pub prompter: &'a dyn Prompter,
    pub runner: &'a dyn CommandRunner,
    hooks: &'a mut Vec<Hook>,
}

impl<'a> ToolContext<'a> {
    /// Queue a hook for dispatch after the current stage.
    pub fn emit(&mut self, hook: Hook) {
        debug!(?hook, "hook emitted");
        self.hooks.push(hook);
    }

    /// Run a command built from templates, failing on non-zero exit.
    pub fn run(
        &mut self,
        args: &[StringTemplate],
        cwd: Option<&Path>,
    ) -> IncipitResult<CommandOutput> {
        let argv = self.render_argv(args)?;
        let output = self.spawn(&argv, cwd)?;
        if output.success() {
            Ok(output)
        } else {
            Err(ApplicationError::CommandFailed {
                command: argv.join(" "),
                stderr: output.stderr,
                status: output.status,
            }
            .into())
        }
    }

    /// Run a command and hand back the output whatever the exit code.
    pub fn run_unchecked(
        &mut self,
        args: &[StringTemplate],
        cwd: Option<&Path>,
    ) -> IncipitResult<CommandOutput> {
        let argv = self.render_argv(args)?;
        self.spawn(&argv, cwd)
    }

    fn render_argv(&mut self, args: &[StringTemplate]) -> IncipitResult<Vec<String>> {
        let mut argv = Vec::with_capacity(args.len());
        for arg in args {
            match arg.render(self.environment, self.prompter)? {
                Some(value) => argv.push(value),
                None => {
                    let command = args
                        .iter()
                        .map(StringTemplate::pattern)
                        .collect::<Vec<_>>()
                        .join(" ");
                    return Err(ApplicationError::CommandSubstitution { command }.into());
                }
            }
        }
        Ok(argv)
    }

    fn spawn(&self, argv: &[String], cwd: Option<&Path>) -> IncipitResult<CommandOutput> {
        info!(command = %argv.join(" "), "running command");
        self.runner.run(argv, cwd)
    }
}

/// Drives a full bootstrap run over a set of tools.
pub struct BootstrapService {
    prompter: Box<dyn Prompter>,
    runner: Box<dyn CommandRunner>,
    filesystem: Box<dyn Filesystem>,
    dumper: Box<dyn Dumper>,
}

impl BootstrapService {
    pub fn new(
        prompter: Box<dyn Prompter>,
        runner: Box<dyn CommandRunner>,
        filesystem: Box<dyn Filesystem>,
        dumper: Box<dyn Dumper>,
    ) -> Self {
        Self {
            prompter,
            runner,
            filesystem,
            dumper,
        }
    }

    /// Bootstrap a project at `workon`.
    #[instrument(skip_all, fields(workon = %workon.display()))]
    pub fn bootstrap(
        &self,
        workon: &Path,
        tools: &mut [Box<dyn Tool>],
        environment: &mut Environment,
    ) -> IncipitResult<()> {
        let mut structure = ProjectStructure::new();
        let mut hooks: Vec<Hook> = Vec::new();

        environment.advance_to(Stage::Setup);
        for tool in tools.iter_mut() {
            debug!(tool = tool.name(), "setup");
            let mut ctx = context(environment, &mut structure, &mut hooks, self);
            tool.setup(&mut ctx)?;
        }
        self.dispatch_hooks(environment, &mut structure, &mut hooks, tools)?;

        environment.advance_to(Stage::Mkdir);
        structure.mkdir(workon, environment, self.prompter.as_ref(), self.filesystem.as_ref())?;

        environment.advance_to(Stage::Pre);
        for tool in tools.iter_mut() {
            debug!(tool = tool.name(), "pre");
            let mut ctx = context(environment, &mut structure, &mut hooks, self);
            tool.pre(workon, &mut ctx)?;
        }
        self.dispatch_hooks(environment, &mut structure, &mut hooks, tools)?;

        environment.advance_to(Stage::Commit);
        structure.commit(
            environment,
            self.prompter.as_ref(),
            self.dumper.as_ref(),
            self.filesystem.as_ref(),
        )?;

        environment.advance_to(Stage::Post);
        for tool in tools.iter_mut() {
            debug!(tool = tool.name(), "post");
            let mut ctx = context(environment, &mut structure, &mut hooks, self);
            tool.post(workon, &mut ctx)?;
        }

        info!("bootstrap complete");
        Ok(())
    }

    /// Deliver queued hooks to every tool until none remain.
    fn dispatch_hooks(
        &self,
        environment: &mut Environment,
        structure: &mut ProjectStructure,
        hooks: &mut Vec<Hook>,
        tools: &mut [Box<dyn Tool>],
    ) -> IncipitResult<()> {
        while !hooks.is_empty() {
            let batch = std::mem::take(hooks);
            for hook in &batch {
                for tool in tools.iter_mut() {
                    let mut ctx = context(environment, structure, hooks, self);
                    tool.on_hook(hook, &mut ctx)?;
                }
            }
        }
        Ok(())
    }
}

fn context<'a>(
    environment: &'a mut Environment,
    structure: &'a mut ProjectStructure,
    hooks: &'a mut Vec<Hook>,
    service: &'a BootstrapService,
) -> ToolContext<'a> {
    ToolContext {
        environment,
        structure,
        prompter: service.prompter.as_ref(),
        runner: service.runner.as_ref(),
        hooks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::structure::FileSpec;
    use crate::test_support::{
        MemoryFilesystem, PlainDumper, RecordingRunner, ScriptedPrompter,
    };

    struct Emitter;

    impl Tool for Emitter {
        fn name(&self) -> &'static str {
            "emitter"
        }

        fn setup(&mut self, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
            ctx.emit(Hook::VcsIgnore("dist/".into()));
            Ok(())
        }
    }

    struct Collector {
        seen: Vec<String>,
    }

    impl Tool for Collector {
        fn name(&self) -> &'static str {
            "collector"
        }

        fn on_hook(&mut self, hook: &Hook, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
            if let Hook::VcsIgnore(pattern) = hook {
                self.seen.push(pattern.clone());
                ctx.structure
                    .config_list(FileSpec::text(".gitignore"))?
                    .push(pattern.as_str());
            }
            Ok(())
        }
    }

    fn service() -> (BootstrapService, MemoryFilesystem, RecordingRunner) {
        let fs = MemoryFilesystem::default();
        let runner = RecordingRunner::default();
        let service = BootstrapService::new(
            Box::new(ScriptedPrompter::default()),
            Box::new(runner.clone()),
            Box::new(fs.clone()),
            Box::new(PlainDumper),
        );
        (service, fs, runner)
    }

    #[test]
    fn hooks_are_dispatched_across_tools() {
        let (service, fs, _runner) = service();
        let mut tools: Vec<Box<dyn Tool>> =
            vec![Box::new(Emitter), Box::new(Collector { seen: Vec::new() })];
        let mut env = Environment::default();
        service
            .bootstrap(Path::new("/work"), &mut tools, &mut env)
            .unwrap();
        let contents = fs.read_file(Path::new("/work/.gitignore")).unwrap();
        assert!(contents.contains("dist/"));
    }

    #[test]
    fn stages_advance_through_the_run() {
        let (service, _fs, _runner) = service();
        let mut tools: Vec<Box<dyn Tool>> = vec![];
        let mut env = Environment::default();
        service
            .bootstrap(Path::new("/work"), &mut tools, &mut env)
            .unwrap();
        assert_eq!(env.stage(), Stage::Post);
    }

    #[test]
    fn command_substitution_fails_on_missing_variable() {
        let (service, _fs, _runner) = service();
        let mut env = Environment::default();
        let mut structure = ProjectStructure::new();
        let mut hooks = Vec::new();
        let mut ctx = context(&mut env, &mut structure, &mut hooks, &service);
        let err = ctx.run(&["{REPOSITORY}".into()], None);
        assert!(err.is_err());
    }
}
