//! Crate-wide error type.
//!
//! Domain rule violations and orchestration failures both funnel into
//! [`IncipitError`], which carries the categorization and suggestion
//! machinery the CLI renders from.

use thiserror::Error;

use crate::application::error::ApplicationError;
use crate::domain::error::{DomainError, ErrorCategory};

pub type IncipitResult<T> = Result<T, IncipitError>;

#[derive(Debug, Error)]
pub enum IncipitError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl IncipitError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(err) => err.suggestions(),
            Self::Application(err) => err.suggestions(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(err) => err.category(),
            Self::Application(err) => err.category(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_convert() {
        let err: IncipitError = DomainError::UnknownVariable { name: "X".into() }.into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn application_errors_convert() {
        let err: IncipitError = ApplicationError::ProgramNotFound {
            program: "git".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }
}
