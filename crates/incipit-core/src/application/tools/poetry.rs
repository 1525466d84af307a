//! Poetry build backend.
//!
//! Poetry keeps its metadata under `[tool.poetry]` instead of the
//! PEP 621 `[project]` table and requires an author identity, so the
//! tool marks `AUTHOR_NAME` and `AUTHOR_EMAIL` as required up front.

use std::path::Path;

use crate::application::orchestrator::{Hook, ToolContext};
use crate::application::structure::FileSpec;
use crate::application::tools::Tool;
use crate::domain::error::DomainError;
use crate::domain::{ConfigNode, StringTemplate, sanitize};
use crate::error::IncipitResult;

const README_BODY: &str = "## Installation\n\n```\npip install {PROJECT_NAME}\n```";

#[derive(Debug, Default)]
pub struct Poetry;

impl Tool for Poetry {
    fn name(&self) -> &'static str {
        "poetry"
    }

    fn setup(&mut self, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        ctx.environment.mark_required("AUTHOR_NAME")?;
        ctx.environment.mark_required("AUTHOR_EMAIL")?;

        let mut pyproject = ctx.structure.config_table(FileSpec::toml("pyproject.toml"))?;
        if pyproject.contains(&["build-system"]) {
            return Err(DomainError::BuildSystemConflict {
                path: "pyproject.toml".into(),
            }
            .into());
        }
        pyproject.set(
            &["build-system", "build-backend"],
            ConfigNode::literal("poetry.core.masonry.api"),
        )?;
        pyproject.append(
            &["build-system", "requires"],
            ConfigNode::literal("poetry_core>=1.0.0"),
        )?;

        pyproject.append(
            &["tool", "poetry", "authors"],
            StringTemplate::from("{AUTHOR_NAME} <{AUTHOR_EMAIL}>"),
        )?;
        pyproject.append(
            &["tool", "poetry", "maintainers"],
            StringTemplate::from("{AUTHOR_NAME} <{AUTHOR_EMAIL}>"),
        )?;
        pyproject.set(&["tool", "poetry", "description"], "{SUMMARY_DESCRIPTION}")?;
        pyproject.set(&["tool", "poetry", "license"], "{LICENSE}")?;
        pyproject.set(
            &["tool", "poetry", "name"],
            StringTemplate::from("{PROJECT_NAME}").with_sanitizer(sanitize::project),
        )?;
        pyproject.set(&["tool", "poetry", "readme"], ConfigNode::literal("README.md"))?;
        pyproject.set(&["tool", "poetry", "version"], "{PACKAGE_VERSION}")?;
        pyproject.set(
            &["tool", "poetry", "dependencies", "python"],
            ">={AUDIENCE_PYTHON_VERSION}",
        )?;

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
        ctx.emit(Hook::BuildDependency {
            name: "poetry".into(),
            min_version: None,
        });
        ctx.emit(Hook::Classifier(
            "Programming Language :: Python :: 3 :: Only".into(),
        ));
        ctx.emit(Hook::VcsIgnore("dist/".into()));
        Ok(())
    }

    fn on_hook(&mut self, hook: &Hook, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        let mut pyproject = ctx.structure.config_table(FileSpec::toml("pyproject.toml"))?;
        match hook {
            Hook::Classifier(value) => {
                pyproject.append(&["tool", "poetry", "classifiers"], ConfigNode::literal(value))?;
            }
            Hook::BuildDependency { name, min_version } => {
                let constraint = match min_version {
                    Some(version) => format!(">={version}"),
                    None => "*".to_owned(),
                };
                pyproject.set(
                    &["tool", "poetry", "dev-dependencies", name.as_str()],
                    ConfigNode::literal(&constraint),
                )?;
            }
            Hook::ProjectUrl { kind, value } => {
                pyproject.set(&["tool", "poetry", "urls", kind.as_str()], value.clone())?;
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
                "poetry".into(),
            ],
            None,
        )?;
        ctx.run(
            &["poetry".into(), "env".into(), "use".into(), "{PYTHON_CMD}".into()],
            Some(workon),
        )?;
        ctx.run(&["poetry".into(), "install".into()], Some(workon))?;
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
