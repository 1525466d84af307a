//! Orchestration errors: prompting, filesystem, and subprocess
//! failures surfaced while driving a bootstrap run.

use thiserror::Error;

use crate::domain::ErrorCategory;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("prompt failed: {reason}")]
    PromptFailed { reason: String },

    #[error("filesystem operation on {path} failed: {reason}")]
    FilesystemError { path: String, reason: String },

    #[error("file {path} already exists")]
    FileExists { path: String },

    #[error("command `{command}` exited with status {status}")]
    CommandFailed {
        command: String,
        stderr: String,
        status: i32,
    },

    #[error("command `{command}` references a variable without a value")]
    CommandSubstitution { command: String },

    #[error("program `{program}` was not found on PATH")]
    ProgramNotFound { program: String },

    #[error("could not serialize {path}: {reason}")]
    SerializeFailed { path: String, reason: String },
}

impl ApplicationError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FileExists { path } => vec![
                format!("'{path}' would be overwritten"),
                "Bootstrap into an empty folder".into(),
            ],
            Self::CommandFailed { command, stderr, .. } => {
                let mut out = vec![format!("`{command}` failed")];
                let trimmed = stderr.trim();
                if !trimmed.is_empty() {
                    out.push(format!("stderr: {trimmed}"));
                }
                out
            }
            Self::ProgramNotFound { program } => vec![
                format!("Install `{program}` and make sure it is on PATH"),
            ],
            Self::CommandSubstitution { .. } => vec![
                "Provide the missing variable with -o NAME=VALUE".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProgramNotFound { .. } => ErrorCategory::NotFound,
            Self::FileExists { .. } => ErrorCategory::Conflict,
            Self::CommandSubstitution { .. } => ErrorCategory::Validation,
            Self::PromptFailed { .. }
            | Self::FilesystemError { .. }
            | Self::CommandFailed { .. }
            | Self::SerializeFailed { .. } => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failure_surfaces_stderr() {
        let err = ApplicationError::CommandFailed {
            command: "git init".into(),
            stderr: "fatal: not a repository".into(),
            status: 128,
        };
        assert!(err.suggestions().iter().any(|s| s.contains("fatal:")));
    }

    #[test]
    fn missing_program_is_not_found() {
        let err = ApplicationError::ProgramNotFound {
            program: "git".into(),
        };
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }
}
