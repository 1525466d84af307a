//! Scripted prompter for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use incipit_core::application::ports::Prompter;
use incipit_core::error::IncipitResult;

/// Feeds answers from a queue, in order, regardless of question type.
/// With the queue exhausted it behaves like `--yes`: candidates are
/// accepted, open questions are declined.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
        }
    }

    fn next(&self) -> Option<String> {
        self.answers.lock().unwrap().pop_front()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, _label: &str, candidate: &str) -> IncipitResult<String> {
        Ok(self.next().unwrap_or_else(|| candidate.to_owned()))
    }

    fn ask(&self, _label: &str, _required: bool) -> IncipitResult<String> {
        Ok(self.next().unwrap_or_default())
    }

    fn choose(&self, _label: &str, candidates: &[String]) -> IncipitResult<String> {
        Ok(self
            .next()
            .or_else(|| candidates.first().cloned())
            .unwrap_or_default())
    }
}
