//! Terminal prompter built on `dialoguer`.

use dialoguer::{Input, Select, theme::ColorfulTheme};
use incipit_core::application::ApplicationError;
use incipit_core::application::ports::Prompter;
use incipit_core::error::IncipitResult;

/// Interactive prompter for a real terminal session.
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

fn prompt_error(e: dialoguer::Error) -> incipit_core::error::IncipitError {
    ApplicationError::PromptFailed {
        reason: e.to_string(),
    }
    .into()
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, label: &str, candidate: &str) -> IncipitResult<String> {
        Input::with_theme(&self.theme)
            .with_prompt(label)
            .default(candidate.to_owned())
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)
    }

    fn ask(&self, label: &str, required: bool) -> IncipitResult<String> {
        Input::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty(!required)
            .interact_text()
            .map_err(prompt_error)
    }

    fn choose(&self, label: &str, candidates: &[String]) -> IncipitResult<String> {
        let index = Select::with_theme(&self.theme)
            .with_prompt(label)
            .items(candidates)
            .default(0)
            .interact()
            .map_err(prompt_error)?;
        candidates.get(index).cloned().ok_or_else(|| {
            ApplicationError::PromptFailed {
                reason: "selection out of range".into(),
            }
            .into()
        })
    }
}
