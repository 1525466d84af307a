//! PEP 517 build backends with PEP 621 metadata.
//!
//! Flit, Hatch, Pdm, and modern setuptools all share the `[project]`
//! table, only the `[build-system]` entry and the development
//! dependency differ. One tool parameterized by backend covers them.

use std::path::Path;

use crate::application::orchestrator::{Hook, ToolContext};
use crate::application::structure::FileSpec;
use crate::application::tools::Tool;
use crate::domain::error::DomainError;
use crate::domain::{ConfigNode, StringTemplate, sanitize};
use crate::error::IncipitResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pep517Backend {
    Flit,
    Hatch,
    Pdm,
    Setuptools,
}

impl Pep517Backend {
    pub fn build_backend(self) -> &'static str {
        match self {
            Self::Flit => "flit_core.buildapi",
            Self::Hatch => "hatchling.build",
            Self::Pdm => "pdm.pep517.api",
            Self::Setuptools => "setuptools.build_meta",
        }
    }

    /// Requirement strings for `[build-system].requires`.
    pub fn requires(self) -> &'static [&'static str] {
        match self {
            Self::Flit => &["flit_core>=3.4.0"],
            Self::Hatch => &["hatchling>=1.3.0"],
            Self::Pdm => &["pdm-pep517>=1.0.0"],
            Self::Setuptools => &["setuptools>=61.0.0"],
        }
    }

    /// The frontend to install as a development dependency.
    pub fn dev_dependency(self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Flit => Some(("flit", "3.4.0")),
            Self::Hatch => Some(("hatch", "1.2.0")),
            Self::Pdm => Some(("pdm", "2.0.0")),
            Self::Setuptools => None,
        }
    }
}

const README_BODY: &str = "## Installation\n\n```\npip install {PROJECT_NAME}\n```";

#[derive(Debug)]
pub struct Pep517 {
    backend: Pep517Backend,
}

impl Pep517 {
    pub fn new(backend: Pep517Backend) -> Self {
        Self { backend }
    }
}

impl Tool for Pep517 {
    fn name(&self) -> &'static str {
        "pep517"
    }

    fn setup(&mut self, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        let mut pyproject = ctx.structure.config_table(FileSpec::toml("pyproject.toml"))?;
        if pyproject.contains(&["build-system"]) {
            return Err(DomainError::BuildSystemConflict {
                path: "pyproject.toml".into(),
            }
            .into());
        }
        pyproject.set(
            &["build-system", "build-backend"],
            ConfigNode::literal(self.backend.build_backend()),
        )?;
        for requirement in self.backend.requires() {
            pyproject.append(
                &["build-system", "requires"],
                ConfigNode::literal(requirement),
            )?;
        }

        let mut author = ConfigNode::table();
        if let ConfigNode::Table(entries) = &mut author {
            entries.insert("name".into(), "{AUTHOR_NAME}".into());
            entries.insert("email".into(), "{AUTHOR_EMAIL}".into());
        }
        pyproject.append(&["project", "authors"], author.clone())?;
        pyproject.append(&["project", "maintainers"], author)?;
        pyproject.set(&["project", "description"], "{SUMMARY_DESCRIPTION}")?;
        pyproject.set(
            &["project", "license", "file"],
            ConfigNode::literal("LICENSE"),
        )?;
        pyproject.set(
            &["project", "name"],
            StringTemplate::from("{PROJECT_NAME}").with_sanitizer(sanitize::project),
        )?;
        pyproject.set(&["project", "readme"], ConfigNode::literal("README.md"))?;
        pyproject.set(
            &["project", "requires-python"],
            ">={AUDIENCE_PYTHON_VERSION}",
        )?;
        pyproject.set(&["project", "version"], "{PACKAGE_VERSION}")?;

        ctx.structure
            .config_list(
                FileSpec::text("{PROJECT_NAME}/__init__.py").with_sanitizer(sanitize::package),
            )?
            .push(ConfigNode::literal(""));
        ctx.structure
            .config_list(FileSpec::text("tests/__init__.py"))?
            .push(ConfigNode::literal(""));

        let mut docs = ctx
            .structure
            .config_list(FileSpec::text_sep("docs/index.md", "\n\n"))?;
        docs.push(StringTemplate::from("# {PROJECT_NAME}"));
        docs.push(StringTemplate::from("{SUMMARY_DESCRIPTION}").allow_empty());

        let mut readme = ctx
            .structure
            .config_list(FileSpec::text_sep("README.md", "\n\n"))?;
        readme.push(StringTemplate::from("# {PROJECT_NAME}"));
        readme.push(StringTemplate::from("{SUMMARY_DESCRIPTION}").allow_empty());
        readme.push(StringTemplate::from(README_BODY).with_sanitizer(sanitize::project));

        ctx.emit(Hook::BuildDependency {
            name: "build".into(),
            min_version: Some("0.2.0".into()),
        });
        if let Some((name, version)) = self.backend.dev_dependency() {
            ctx.emit(Hook::BuildDependency {
                name: name.into(),
                min_version: Some(version.into()),
            });
        }
        ctx.emit(Hook::Classifier(
            "Programming Language :: Python :: 3 :: Only".into(),
        ));
        ctx.emit(Hook::VcsIgnore("dist/".into()));
        ctx.emit(Hook::VcsIgnore("*.egg-info".into()));
        Ok(())
    }

    fn on_hook(&mut self, hook: &Hook, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        let mut pyproject = ctx.structure.config_table(FileSpec::toml("pyproject.toml"))?;
        match hook {
            Hook::Classifier(value) => {
                pyproject.append(&["project", "classifiers"], ConfigNode::literal(value))?;
            }
            Hook::BuildDependency { name, min_version } => {
                let requirement = match min_version {
                    Some(version) => format!("{name}>={version}"),
                    None => name.clone(),
                };
                pyproject.append(
                    &["project", "optional-dependencies", "dev"],
                    ConfigNode::literal(&requirement),
                )?;
            }
            Hook::ProjectUrl { kind, value } => {
                pyproject.set(&["project", "urls", kind.as_str()], value.clone())?;
            }
            Hook::VcsIgnore(_) => {}
        }
        Ok(())
    }

    fn post(&mut self, workon: &Path, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        ctx.run(
            &[
                "{PYTHON_CMD}".into(),
                "-m".into(),
                "pip".into(),
                "--verbose".into(),
                "install".into(),
                "--upgrade".into(),
                "--upgrade-strategy".into(),
                "eager".into(),
                "--editable".into(),
                format!("{}[dev]", workon.display()).into(),
            ],
            None,
        )?;
        if ctx.environment.flag("CHECK_BUILD", ctx.prompter)? {
            ctx.run(
                &[
                    "{PYTHON_CMD}".into(),
                    "-m".into(),
                    "build".into(),
                    workon.display().to_string().into(),
                ],
                None,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::orchestrator::BootstrapService;
    use crate::application::tools::{Git, License, Venv};
    use crate::domain::Environment;
    use crate::test_support::{
        MemoryFilesystem, PlainDumper, RecordingRunner, ScriptedPrompter,
    };

    fn seeded_env() -> Environment {
        let mut env = Environment::default();
        env.feed_cli("PROJECT_NAME", "my-tool").unwrap();
        env.feed_cli("AUTHOR_NAME", "Ada Lovelace").unwrap();
        env.feed_cli("AUTHOR_EMAIL", "ada@example.org").unwrap();
        env.feed_cli("SUMMARY_DESCRIPTION", "A demo").unwrap();
        env.feed_cli("REPOSITORY", "https://example.org/my-tool")
            .unwrap();
        env
    }

    #[test]
    fn flit_layout_names_the_backend() {
        let fs = MemoryFilesystem::default();
        let service = BootstrapService::new(
            Box::new(ScriptedPrompter::accept_all()),
            Box::new(RecordingRunner::default()),
            Box::new(fs.clone()),
            Box::new(PlainDumper),
        );
        let mut tools: Vec<Box<dyn Tool>> =
            vec![Box::new(Pep517::new(Pep517Backend::Flit))];
        let mut env = seeded_env();
        service
            .bootstrap(Path::new("/work"), &mut tools, &mut env)
            .unwrap();
        let pyproject = fs.read_file(Path::new("/work/pyproject.toml")).unwrap();
        assert!(pyproject.contains("flit_core.buildapi"));
        assert!(pyproject.contains("flit>=3.4.0"));
        assert!(pyproject.contains("my-tool"));
        assert!(fs.read_file(Path::new("/work/tests/__init__.py")).is_some());
        assert!(fs.read_file(Path::new("/work/docs/index.md")).is_some());
    }

    #[test]
    fn full_stack_composes() {
        let fs = MemoryFilesystem::default();
        let runner = RecordingRunner::default();
        let service = BootstrapService::new(
            Box::new(ScriptedPrompter::accept_all()),
            Box::new(runner.clone()),
            Box::new(fs.clone()),
            Box::new(PlainDumper),
        );
        let mut tools: Vec<Box<dyn Tool>> = vec![
            Box::new(Git),
            Box::new(Venv),
            Box::new(License::default()),
            Box::new(Pep517::new(Pep517Backend::Hatch)),
        ];
        let mut env = seeded_env();
        service
            .bootstrap(Path::new("/work"), &mut tools, &mut env)
            .unwrap();

        let gitignore = fs.read_file(Path::new("/work/.gitignore")).unwrap();
        assert!(gitignore.contains(".venv"));
        assert!(gitignore.contains("dist/"));
        let pyproject = fs.read_file(Path::new("/work/pyproject.toml")).unwrap();
        assert!(pyproject.contains("hatchling.build"));
        assert!(pyproject.contains("Python :: 3 :: Only"));
        assert!(fs.read_file(Path::new("/work/LICENSE")).is_some());
    }

    #[test]
    fn setuptools_backend_has_no_extra_frontend() {
        assert_eq!(Pep517Backend::Setuptools.dev_dependency(), None);
        assert_eq!(Pep517Backend::Pdm.dev_dependency(), Some(("pdm", "2.0.0")));
    }
}
