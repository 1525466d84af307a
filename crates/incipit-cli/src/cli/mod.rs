//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "incipit",
    bin_name = "incipit",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f40d} Interactive Python project bootstrapper",
    long_about = "Incipit bootstraps a Python project: it asks for the metadata \
                  it cannot infer, wires up a PEP 517 build backend, git, and a \
                  virtual environment, and writes everything in one pass.",
    after_help = "EXAMPLES:\n\
        \x20 incipit new my-project\n\
        \x20 incipit new my-project --build-system flit --license MIT\n\
        \x20 incipit new my-project --yes -o AUTHOR_NAME='Ada Lovelace'\n\
        \x20 incipit list --licenses\n\
        \x20 incipit completions bash > /usr/share/bash-completion/completions/incipit",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Bootstrap a new Python project.
    #[command(
        visible_alias = "n",
        about = "Bootstrap a new Python project",
        after_help = "EXAMPLES:\n\
            \x20 incipit new my-project\n\
            \x20 incipit new my-project --build-system hatch --license Apache-2.0\n\
            \x20 incipit new my-project --yes --check-build\n\
            \x20 incipit new my-project -o PACKAGE_VERSION=1.0.0 -o YEAR=2026"
    )]
    New(NewArgs),

    /// List supported licenses and build systems.
    #[command(
        visible_alias = "ls",
        about = "List supported licenses and build systems",
        after_help = "EXAMPLES:\n\
            \x20 incipit list\n\
            \x20 incipit list --licenses\n\
            \x20 incipit list --build-systems"
    )]
    List(ListArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 incipit completions bash > ~/.local/share/bash-completion/completions/incipit\n\
            \x20 incipit completions zsh  > ~/.zfunc/_incipit\n\
            \x20 incipit completions fish > ~/.config/fish/completions/incipit.fish"
    )]
    Completions(CompletionsArgs),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `incipit new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Folder to bootstrap into.  Created if missing; must be empty if
    /// it already exists.
    #[arg(value_name = "FOLDER", help = "Project folder (must be empty)")]
    pub folder: PathBuf,

    /// Build backend wiring for the generated project.
    #[arg(
        short = 'b',
        long = "build-system",
        value_name = "BACKEND",
        value_enum,
        help = "Build system to wire up"
    )]
    pub build_system: Option<BuildSystem>,

    /// License identifier for the LICENSE file.
    #[arg(
        short = 'l',
        long = "license",
        value_name = "ID",
        help = "License identifier (see `incipit list --licenses`)"
    )]
    pub license: Option<String>,

    /// Accept every suggested value without prompting.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Accept all defaults and never prompt"
    )]
    pub yes: bool,

    /// Build a wheel after bootstrapping to validate the setup.
    #[arg(long = "check-build", help = "Run a wheel build after bootstrap")]
    pub check_build: bool,

    /// Skip git initialization.
    #[arg(long = "no-vcs", help = "Do not initialize a git repository")]
    pub no_vcs: bool,

    /// Skip virtual environment creation.
    #[arg(long = "no-venv", help = "Do not create a virtual environment")]
    pub no_venv: bool,

    /// How the project's Python environment is managed.
    #[arg(
        long = "python-manager",
        value_name = "MANAGER",
        value_enum,
        conflicts_with = "no_venv",
        help = "Python environment manager (default: venv)"
    )]
    pub python_manager: Option<PythonManager>,

    /// Set a variable directly, bypassing its prompt.
    #[arg(
        short = 'o',
        long = "option",
        value_name = "KEY=VALUE",
        help = "Set a variable (e.g. -o AUTHOR_NAME='Ada Lovelace')"
    )]
    pub option: Vec<String>,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `incipit list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only list license identifiers.
    #[arg(long = "licenses", help = "List supported license identifiers")]
    pub licenses: bool,

    /// Only list build systems.
    #[arg(long = "build-systems", help = "List supported build systems")]
    pub build_systems: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `incipit completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Supported build systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum BuildSystem {
    /// Classic declarative setup.cfg with a setup.py shim.
    Setuptools,
    /// setuptools driven purely through pyproject.toml (PEP 621).
    #[value(name = "setuptools-pep517")]
    SetuptoolsPep517,
    Flit,
    Hatch,
    Pdm,
    Poetry,
}

impl std::fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setuptools => write!(f, "setuptools"),
            Self::SetuptoolsPep517 => write!(f, "setuptools-pep517"),
            Self::Flit => write!(f, "flit"),
            Self::Hatch => write!(f, "hatch"),
            Self::Pdm => write!(f, "pdm"),
            Self::Poetry => write!(f, "poetry"),
        }
    }
}

impl BuildSystem {
    pub const ALL: [Self; 6] = [
        Self::Setuptools,
        Self::SetuptoolsPep517,
        Self::Flit,
        Self::Hatch,
        Self::Pdm,
        Self::Poetry,
    ];
}

/// Python environment managers for the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum PythonManager {
    /// `python -m venv` inside the project folder.
    Venv,
    /// A pyenv virtualenv pinned through `.python-version`.
    Pyenv,
    /// No environment management at all.
    None,
}

// ── tests ─────────────────────────────────────────────────────────────────────
