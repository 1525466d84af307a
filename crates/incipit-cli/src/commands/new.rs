//! `incipit new` - bootstrap a Python project.
//!
//! This is the only command that touches the real filesystem and
//! spawns subprocesses.  It assembles the environment from every
//! source (config file, process environment, `-o` flags), picks the
//! tool set, and hands everything to the core bootstrap service.

use std::path::Path;

use tracing::{debug, info};

use incipit_adapters::{AssumeDefaults, FormatDumper, LocalFilesystem, SystemRunner};
use incipit_core::prelude::*;

use crate::cli::{BuildSystem, NewArgs, PythonManager};
use crate::config::AppConfig;
use crate::error::{CliError, IntoCli};
use crate::output::OutputManager;

pub fn execute(
    args: &NewArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> Result<(), CliError> {
    ensure_folder_usable(&args.folder)?;

    let mut environment = build_environment(args, config)?;
    let build_system = select_build_system(args, config)?;
    let mut tools = assemble_tools(args, build_system);
    debug!(%build_system, tools = tools.len(), "tool set assembled");

    let prompter = make_prompter(args.yes)?;
    let service = BootstrapService::new(
        prompter,
        Box::new(SystemRunner::new()),
        Box::new(LocalFilesystem::new()),
        Box::new(FormatDumper::new()),
    );

    std::fs::create_dir_all(&args.folder)?;
    info!(folder = %args.folder.display(), "bootstrapping project");
    service
        .bootstrap(&args.folder, &mut tools, &mut environment)
        .into_cli()?;

    output.success(&format!(
        "Project bootstrapped in {}",
        args.folder.display()
    ));
    output.print("");
    output.print("Next steps:");
    output.hint(&format!("cd {}", args.folder.display()));
    if python_manager(args) == PythonManager::Venv {
        if cfg!(windows) {
            output.hint(".venv\\Scripts\\activate");
        } else {
            output.hint("source .venv/bin/activate");
        }
    }
    Ok(())
}

fn python_manager(args: &NewArgs) -> PythonManager {
    if args.no_venv {
        PythonManager::None
    } else {
        args.python_manager.unwrap_or(PythonManager::Venv)
    }
}

/// The target must not exist, or exist as an empty directory.
fn ensure_folder_usable(folder: &Path) -> Result<(), CliError> {
    if !folder.exists() {
        return Ok(());
    }
    let mut entries = std::fs::read_dir(folder)?;
    if entries.next().is_some() {
        return Err(CliError::FolderNotEmpty {
            path: folder.display().to_string(),
        });
    }
    Ok(())
}

/// Layer every value source into one environment.
///
/// Config-file values stay unconfirmed so they surface as prompt
/// defaults; `-o` and dedicated flags are confirmed and never prompt.
fn build_environment(args: &NewArgs, config: &AppConfig) -> Result<Environment, CliError> {
    let mut environment = Environment::default();

    for (name, value) in std::env::vars() {
        environment.feed_environ(&name, &value).into_cli()?;
    }

    for (key, value) in &config.variables {
        environment.feed_config(key, value).into_cli()?;
    }
    if let Some(name) = &config.defaults.author_name {
        environment.feed_config("AUTHOR_NAME", name).into_cli()?;
    }
    if let Some(email) = &config.defaults.author_email {
        environment.feed_config("AUTHOR_EMAIL", email).into_cli()?;
    }
    if let Some(license) = &config.defaults.license {
        environment.feed_config("LICENSE", license).into_cli()?;
    }

    // the folder name is the natural project-name suggestion
    if let Some(name) = args.folder.file_name().and_then(|n| n.to_str()) {
        environment.feed_config("PROJECT_NAME", name).into_cli()?;
    }

    for option in &args.option {
        let Some((key, value)) = option.split_once('=') else {
            return Err(CliError::InvalidOption {
                argument: option.clone(),
            });
        };
        environment.feed_cli(key.trim(), value).into_cli()?;
    }

    if let Some(license) = &args.license {
        if !KNOWN_LICENSES.contains(&license.as_str()) {
            return Err(CliError::UnknownLicense {
                identifier: license.clone(),
            });
        }
        environment.feed_cli("LICENSE", license).into_cli()?;
    }

    // always decided here so the flag never prompts
    let check_build = if args.check_build { "1" } else { "0" };
    environment.feed_cli("CHECK_BUILD", check_build).into_cli()?;

    Ok(environment)
}

fn select_build_system(args: &NewArgs, config: &AppConfig) -> Result<BuildSystem, CliError> {
    if let Some(system) = args.build_system {
        return Ok(system);
    }
    match config.defaults.build_system.as_deref() {
        Some("setuptools") | None => Ok(BuildSystem::Setuptools),
        Some("setuptools-pep517") => Ok(BuildSystem::SetuptoolsPep517),
        Some("flit") => Ok(BuildSystem::Flit),
        Some("hatch") => Ok(BuildSystem::Hatch),
        Some("pdm") => Ok(BuildSystem::Pdm),
        Some("poetry") => Ok(BuildSystem::Poetry),
        Some(other) => Err(CliError::ConfigError(format!(
            "unknown build system '{other}' in defaults.build_system"
        ))),
    }
}

fn assemble_tools(args: &NewArgs, build_system: BuildSystem) -> Vec<Box<dyn Tool>> {
    let mut tools: Vec<Box<dyn Tool>> = Vec::new();
    if !args.no_vcs {
        tools.push(Box::new(Git));
    }
    match python_manager(args) {
        PythonManager::Venv => tools.push(Box::new(Venv)),
        PythonManager::Pyenv => tools.push(Box::new(PyEnv)),
        PythonManager::None => {}
    }
    tools.push(Box::new(License::default()));
    tools.push(match build_system {
        BuildSystem::Setuptools => Box::new(Setuptools),
        BuildSystem::SetuptoolsPep517 => Box::new(Pep517::new(Pep517Backend::Setuptools)),
        BuildSystem::Flit => Box::new(Pep517::new(Pep517Backend::Flit)),
        BuildSystem::Hatch => Box::new(Pep517::new(Pep517Backend::Hatch)),
        BuildSystem::Pdm => Box::new(Pep517::new(Pep517Backend::Pdm)),
        BuildSystem::Poetry => Box::new(Poetry),
    });
    tools
}

#[cfg(feature = "interactive")]
fn make_prompter(yes: bool) -> Result<Box<dyn Prompter>, CliError> {
    if yes {
        Ok(Box::new(AssumeDefaults))
    } else {
        Ok(Box::new(incipit_adapters::TerminalPrompter::new()))
    }
}

#[cfg(not(feature = "interactive"))]
fn make_prompter(yes: bool) -> Result<Box<dyn Prompter>, CliError> {
    if yes {
        Ok(Box::new(AssumeDefaults))
    } else {
        Err(CliError::FeatureNotAvailable)
    }
}
