//! Classic setuptools tool.
//!
//! Generates the declarative `setup.cfg` layout with a shim `setup.py`
//! and a minimal `pyproject.toml` naming the backend. The modern
//! PEP 621 layouts live in [`crate::application::tools::pep517`].

use std::path::Path;

use crate::application::orchestrator::{Hook, ToolContext};
use crate::application::structure::FileSpec;
use crate::application::tools::Tool;
use crate::domain::error::DomainError;
use crate::domain::{ConfigNode, StringTemplate, sanitize};
use crate::error::IncipitResult;

const README_BODY: &str = "## Installation\n\n```\npip install {PROJECT_NAME}\n```";

#[derive(Debug, Default)]
pub struct Setuptools;

impl Tool for Setuptools {
    fn name(&self) -> &'static str {
        "setuptools"
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
            ConfigNode::literal("setuptools.build_meta"),
        )?;
        pyproject.append(
            &["build-system", "requires"],
            ConfigNode::literal("setuptools"),
        )?;
        pyproject.append(&["build-system", "requires"], ConfigNode::literal("wheel"))?;

        let mut cfg = ctx.structure.config_table(FileSpec::ini("setup.cfg"))?;
        cfg.set(&["metadata", "author"], "{AUTHOR_NAME}")?;
        cfg.set(&["metadata", "author_email"], "{AUTHOR_EMAIL}")?;
        cfg.set(&["metadata", "description"], "{SUMMARY_DESCRIPTION}")?;
        cfg.set(
            &["metadata", "long_description"],
            ConfigNode::literal("file: README.md"),
        )?;
        cfg.set(
            &["metadata", "long_description_content_type"],
            ConfigNode::literal("text/markdown"),
        )?;
        cfg.set(&["metadata", "maintainer"], "{AUTHOR_NAME}")?;
        cfg.set(&["metadata", "maintainer_email"], "{AUTHOR_EMAIL}")?;
        cfg.set(
            &["metadata", "name"],
            StringTemplate::from("{PROJECT_NAME}").with_sanitizer(sanitize::project),
        )?;
        cfg.set(&["metadata", "version"], "{PACKAGE_VERSION}")?;
        cfg.append(
            &["options", "packages"],
            StringTemplate::from("{PROJECT_NAME}").with_sanitizer(sanitize::package),
        )?;
        cfg.set(
            &["options", "python_requires"],
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
        readme.push(
            StringTemplate::from(README_BODY).with_sanitizer(sanitize::project),
        );

        ctx.structure
            .config_list(FileSpec::text("setup.py"))?
            .push(ConfigNode::literal("import setuptools\n\nsetuptools.setup()"));

        ctx.emit(Hook::BuildDependency {
            name: "build".into(),
            min_version: Some("0.2.0".into()),
        });
        ctx.emit(Hook::Classifier(
            "Programming Language :: Python :: 3 :: Only".into(),
        ));
        ctx.emit(Hook::VcsIgnore("dist/".into()));
        ctx.emit(Hook::VcsIgnore("*.egg-info".into()));
        Ok(())
    }

    fn on_hook(&mut self, hook: &Hook, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        let mut cfg = ctx.structure.config_table(FileSpec::ini("setup.cfg"))?;
        match hook {
            Hook::Classifier(value) => {
                cfg.append(&["metadata", "classifiers"], ConfigNode::literal(value))?;
            }
            Hook::BuildDependency { name, min_version } => {
                let requirement = match min_version {
                    Some(version) => format!("{name}>={version}"),
                    None => name.clone(),
                };
                cfg.append(
                    &["options.extras_require", "dev"],
                    ConfigNode::literal(&requirement),
                )?;
            }
            Hook::ProjectUrl { kind, value } => {
                cfg.set(&["metadata", "project_urls", kind.as_str()], value.clone())?;
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
