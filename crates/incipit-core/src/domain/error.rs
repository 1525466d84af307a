//! Domain-level errors: violations of the variable, template, and
//! population rules. Orchestration failures live in
//! `crate::application::error`.

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (callers may retry a prompt round)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ── Variable registry ────────────────────────────────────────────────
    #[error("unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("metadata for variable {name} already exists, update it instead")]
    VariableExists { name: String },

    #[error("a variable can only be required when it doesn't provide a default value")]
    RequiredWithDefault { name: String },

    #[error("metadata field {field} cannot be set during the {stage} stage")]
    StageViolation { field: &'static str, stage: String },

    // ── Environment ──────────────────────────────────────────────────────
    #[error("environment variable {name} already exists, delete it before")]
    ValueAlreadySet { name: String },

    #[error("invalid value {value:?} for {kind} variable {name}")]
    InvalidValue {
        name: String,
        value: String,
        kind: &'static str,
    },

    // ── Templates / configuration trees ──────────────────────────────────
    #[error("unterminated placeholder in pattern {pattern:?}")]
    InvalidPlaceholder { pattern: String },

    #[error("configuration key {path} is a {found}, expected a {expected}")]
    NodeTypeConflict {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("configuration file {path} holds unresolved template content")]
    UnresolvedNode { path: String },

    // ── Structure population ─────────────────────────────────────────────
    #[error("a build system is already registered in {path}")]
    BuildSystemConflict { path: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownVariable { name } => vec![
                format!("'{name}' is not a registered variable"),
                "Pass it explicitly with -o NAME=VALUE".into(),
                "Or export it as INCIPIT_NAME=VALUE".into(),
            ],
            Self::InvalidValue { name, kind, .. } => vec![
                format!("'{name}' expects a {kind} value"),
                "Flags accept: 1/0, true/false, yes/no, on/off".into(),
            ],
            Self::BuildSystemConflict { path } => vec![
                format!("Two tools tried to own [build-system] in {path}"),
                "Select a single build backend with --build-system".into(),
            ],
            Self::StageViolation { field, .. } => vec![
                format!("The '{field}' metadata field is frozen at this point of the run"),
                "This is a tool implementation bug, please report it".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownVariable { .. } => ErrorCategory::NotFound,
            Self::InvalidValue { .. } | Self::InvalidPlaceholder { .. } => {
                ErrorCategory::Validation
            }
            Self::NodeTypeConflict { .. }
            | Self::BuildSystemConflict { .. }
            | Self::ValueAlreadySet { .. }
            | Self::VariableExists { .. } => ErrorCategory::Conflict,
            Self::RequiredWithDefault { .. } | Self::StageViolation { .. } => {
                ErrorCategory::Internal
            }
            Self::UnresolvedNode { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Internal,
}
