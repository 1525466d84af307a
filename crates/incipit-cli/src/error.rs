//! CLI error type and exit-code mapping.
//!
//! Core errors are wrapped rather than re-stringified so suggestions
//! and categories survive up to the terminal.

use owo_colors::OwoColorize;
use tracing::error;

use incipit_core::error::IncipitError;

/// Errors surfaced to the terminal.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("target folder is not empty: {path}")]
    FolderNotEmpty { path: String },

    #[error("invalid --option argument '{argument}', expected KEY=VALUE")]
    InvalidOption { argument: String },

    #[error("unknown license identifier '{identifier}'")]
    UnknownLicense { identifier: String },

    #[error("interactive prompts are not available in this build, pass --yes")]
    FeatureNotAvailable,

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Core(#[from] IncipitError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// How an error should be reported and which exit code it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input or invalid request, exit code 2.
    UserError,
    /// Something referenced does not exist, exit code 3.
    NotFound,
    /// Configuration problem, exit code 4.
    Configuration,
    /// Bug or unexpected condition, exit code 1.
    Internal,
}

impl CliError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FolderNotEmpty { .. }
            | Self::InvalidOption { .. }
            | Self::FeatureNotAvailable => ErrorCategory::UserError,
            Self::UnknownLicense { .. } => ErrorCategory::NotFound,
            Self::ConfigError(_) => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                incipit_core::domain::ErrorCategory::Validation
                | incipit_core::domain::ErrorCategory::Conflict => ErrorCategory::UserError,
                incipit_core::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                incipit_core::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError(_) => ErrorCategory::Internal,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Actionable follow-ups shown under the error message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FolderNotEmpty { .. } => vec![
                "Pick an empty or non-existent folder".into(),
                "Remove the existing contents first".into(),
            ],
            Self::InvalidOption { .. } => {
                vec!["Use the form -o KEY=VALUE, e.g. -o AUTHOR_NAME='Ada Lovelace'".into()]
            }
            Self::UnknownLicense { .. } => {
                vec!["Run `incipit list --licenses` to see supported identifiers".into()]
            }
            Self::FeatureNotAvailable => {
                vec!["Rebuild with the `interactive` feature, or pass --yes".into()]
            }
            Self::Core(core) => core.suggestions(),
            Self::ConfigError(_) | Self::IoError(_) => Vec::new(),
        }
    }

    pub fn format_colored(&self) -> String {
        let mut out = format!("{} {}", "error:".red().bold(), self);
        for suggestion in self.suggestions() {
            out.push_str(&format!("\n  {} {}", "hint:".cyan(), suggestion));
        }
        out
    }

    pub fn format_plain(&self) -> String {
        let mut out = format!("error: {self}");
        for suggestion in self.suggestions() {
            out.push_str(&format!("\n  hint: {suggestion}"));
        }
        out
    }

    pub fn log(&self) {
        error!(category = ?self.category(), "{self}");
    }
}

/// Attach CLI context to core results without a map_err at every call
/// site.
pub trait IntoCli<T> {
    fn into_cli(self) -> Result<T, CliError>;
}

impl<T> IntoCli<T> for Result<T, IncipitError> {
    fn into_cli(self) -> Result<T, CliError> {
        self.map_err(CliError::from)
    }
}
