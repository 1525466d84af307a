//! Non-interactive prompter backing the `--yes` flag.

use incipit_core::application::ApplicationError;
use incipit_core::application::ports::Prompter;
use incipit_core::error::IncipitResult;
use tracing::debug;

/// Accepts every candidate and declines every open question. A
/// required question with no candidate is an error, there is nobody
/// to answer it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeDefaults;

impl Prompter for AssumeDefaults {
    fn confirm(&self, label: &str, candidate: &str) -> IncipitResult<String> {
        debug!(label, candidate, "accepting candidate");
        Ok(candidate.to_owned())
    }

    fn ask(&self, label: &str, required: bool) -> IncipitResult<String> {
        if required {
            return Err(ApplicationError::PromptFailed {
                reason: format!("'{label}' is required but --yes suppressed the prompt"),
            }
            .into());
        }
        Ok(String::new())
    }

    fn choose(&self, _label: &str, candidates: &[String]) -> IncipitResult<String> {
        candidates.first().cloned().ok_or_else(|| {
            ApplicationError::PromptFailed {
                reason: "nothing to choose from".into(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_are_accepted_as_is() {
        let prompter = AssumeDefaults;
        assert_eq!(prompter.confirm("Year", "2026").unwrap(), "2026");
        assert_eq!(prompter.ask("Repository", false).unwrap(), "");
    }

    #[test]
    fn required_questions_fail() {
        let prompter = AssumeDefaults;
        assert!(prompter.ask("Summary description", true).is_err());
    }
}
