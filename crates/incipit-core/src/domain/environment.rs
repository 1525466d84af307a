//! Layered variable environment.
//!
//! Values for template placeholders come from many places: command-line
//! overrides, `INCIPIT_*` environment variables, tool injections,
//! configuration files, suggestions, and finally interactive prompts.
//! The environment keeps each source in its own map and resolves a
//! variable by walking the sources in priority order.
//!
//! # Source priority (highest first)
//!
//! | # | Source                       | Confirmed |
//! |---|------------------------------|-----------|
//! | 1 | command-line `-o` overrides  | yes       |
//! | 2 | `INCIPIT_*` process env      | yes       |
//! | 3 | tool injections              | yes       |
//! | 4 | non-prompt variable defaults | yes       |
//! | 5 | configuration file           | no        |
//! | 6 | tool suggestions             | no        |
//! | 7 | bare process env             | no        |
//! | 8 | prompted variable defaults   | no        |
//!
//! A confirmed hit is used as-is. An unconfirmed hit is offered to the
//! user for confirmation. When no source has the variable, the user is
//! asked outright. Every resolution is cached, so each variable is
//! prompted at most once per run.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::application::ports::Prompter;
use crate::domain::error::DomainError;
use crate::domain::variables::{Stage, VarKind, Variable, VariableSet, parse_flag};
use crate::error::IncipitResult;

/// Per-source value maps, ordered by declaration priority.
#[derive(Debug, Clone, Default, PartialEq)]
struct Sources {
    cli: BTreeMap<String, String>,
    environ_confirmed: BTreeMap<String, String>,
    tool_confirmed: BTreeMap<String, String>,
    default_confirmed: BTreeMap<String, String>,
    config: BTreeMap<String, String>,
    tool_prompt: BTreeMap<String, String>,
    environ_prompt: BTreeMap<String, String>,
    default_prompt: BTreeMap<String, String>,
}

impl Sources {
    /// Maps in priority order, tagged with whether values in them are
    /// already confirmed by the user.
    fn stack(&self) -> [(bool, &BTreeMap<String, String>); 8] {
        [
            (true, &self.cli),
            (true, &self.environ_confirmed),
            (true, &self.tool_confirmed),
            (true, &self.default_confirmed),
            (false, &self.config),
            (false, &self.tool_prompt),
            (false, &self.environ_prompt),
            (false, &self.default_prompt),
        ]
    }
}

/// The variable environment for one bootstrap run.
#[derive(Debug)]
pub struct Environment {
    /// Resolved values. `None` records that the user declined a value.
    values: BTreeMap<String, Option<String>>,
    sources: Sources,
    variables: VariableSet,
    stage: Stage,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(VariableSet::new())
    }
}

impl Environment {
    pub fn new(variables: VariableSet) -> Self {
        let mut sources = Sources::default();
        for (name, default) in variables.silent_defaults() {
            sources
                .default_confirmed
                .insert(name.to_owned(), default.to_owned());
        }
        for (name, default) in variables.prompted_defaults() {
            sources
                .default_prompt
                .insert(name.to_owned(), default.to_owned());
        }
        Self {
            values: BTreeMap::new(),
            sources,
            variables,
            stage: Stage::Init,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn advance_to(&mut self, stage: Stage) {
        debug!(from = %self.stage, to = %stage, "advancing stage");
        self.stage = stage;
    }

    pub fn variables(&self) -> &VariableSet {
        &self.variables
    }

    // ── Value sources ────────────────────────────────────────────────────

    /// Feed a command-line override (`-o KEY=VALUE`). Highest priority.
    pub fn feed_cli(&mut self, key: &str, value: &str) -> IncipitResult<()> {
        self.validate(key, value)?;
        self.variables.register_ad_hoc(key);
        self.sources.cli.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    /// Feed values from a configuration file. Unconfirmed.
    pub fn feed_config(&mut self, key: &str, value: &str) -> IncipitResult<()> {
        self.validate(key, value)?;
        self.sources
            .config
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    /// Feed one process environment variable.
    ///
    /// `INCIPIT_`-prefixed names are stripped, registered, and treated
    /// as confirmed: exporting them is an explicit act. Bare names are
    /// picked up only when they match a known variable, and still go
    /// through confirmation.
    pub fn feed_environ(&mut self, name: &str, value: &str) -> IncipitResult<()> {
        if let Some(stripped) = name.strip_prefix("INCIPIT_") {
            self.validate(stripped, value)?;
            self.variables.register_ad_hoc(stripped);
            self.sources
                .environ_confirmed
                .insert(stripped.to_owned(), value.to_owned());
        } else if self.variables.contains(name) {
            self.sources
                .environ_prompt
                .insert(name.to_owned(), value.to_owned());
        } else {
            trace!(name, "ignoring unrelated environment variable");
        }
        Ok(())
    }

    /// A tool injects a value it computed itself. Confirmed, no prompt.
    pub fn inject(&mut self, key: &str, value: &str) {
        self.variables.register_ad_hoc(key);
        self.sources
            .tool_confirmed
            .insert(key.to_owned(), value.to_owned());
    }

    /// A tool suggests a value the user should confirm.
    pub fn suggest(&mut self, key: &str, value: &str) {
        self.variables.register_ad_hoc(key);
        self.sources
            .tool_prompt
            .insert(key.to_owned(), value.to_owned());
    }

    // ── Resolution ───────────────────────────────────────────────────────

    /// Resolve a variable, prompting if needed. `Ok(None)` means the
    /// user declined to provide a value; that outcome is cached too.
    pub fn lookup(
        &mut self,
        key: &str,
        prompter: &dyn Prompter,
    ) -> IncipitResult<Option<String>> {
        if let Some(cached) = self.values.get(key) {
            return Ok(cached.clone());
        }

        let required = self
            .variables
            .get(key)
            .map(|v| v.required)
            .unwrap_or(false);
        let label = prompt_label(key);

        let mut resolved: Option<Option<String>> = None;
        for (confirmed, map) in self.sources.stack() {
            let Some(candidate) = map.get(key) else {
                continue;
            };
            if confirmed {
                debug!(key, "resolved from confirmed source");
                resolved = Some(Some(candidate.clone()));
                break;
            }
            // A required variable needs a real answer, an empty
            // suggestion is not worth confirming.
            if required && candidate.is_empty() {
                continue;
            }
            let answer = prompter.confirm(&label, candidate)?;
            if answer.is_empty() {
                if required {
                    continue;
                }
                resolved = Some(None);
            } else {
                self.validate(key, &answer)?;
                resolved = Some(Some(answer));
            }
            break;
        }

        let value = match resolved {
            Some(value) => value,
            None => {
                let answer = prompter.ask(&label, required)?;
                if answer.is_empty() {
                    None
                } else {
                    self.validate(key, &answer)?;
                    Some(answer)
                }
            }
        };

        trace!(key, found = value.is_some(), "cached resolution");
        self.values.insert(key.to_owned(), value.clone());
        Ok(value)
    }

    /// Resolve a flag variable to a boolean. Missing means false.
    pub fn flag(&mut self, key: &str, prompter: &dyn Prompter) -> IncipitResult<bool> {
        let value = self.lookup(key, prompter)?;
        Ok(value.as_deref().and_then(parse_flag).unwrap_or(false))
    }

    /// Record a resolved value directly. Errors if one already exists.
    pub fn set(&mut self, key: &str, value: &str) -> IncipitResult<()> {
        if matches!(self.values.get(key), Some(Some(_))) {
            return Err(DomainError::ValueAlreadySet {
                name: key.to_owned(),
            }
            .into());
        }
        self.validate(key, value)?;
        self.variables.register_ad_hoc(key);
        self.values.insert(key.to_owned(), Some(value.to_owned()));
        Ok(())
    }

    /// Replace a resolved value unconditionally.
    pub fn override_value(&mut self, key: &str, value: &str) {
        self.variables.register_ad_hoc(key);
        self.values.insert(key.to_owned(), Some(value.to_owned()));
    }

    // ── Staged metadata wrappers ─────────────────────────────────────────

    pub fn set_variable_default(&mut self, name: &str, default: &str) -> IncipitResult<()> {
        self.variables.set_default(self.stage, name, default)?;
        // keep the prompt suggestion in sync with the new default
        if let Some(var) = self.variables.get(name) {
            let map = if var.prompt {
                &mut self.sources.default_prompt
            } else {
                &mut self.sources.default_confirmed
            };
            map.insert(name.to_owned(), default.to_owned());
        }
        Ok(())
    }

    pub fn mark_do_not_prompt(&mut self, name: &str) -> IncipitResult<()> {
        self.variables.set_no_prompt(self.stage, name)?;
        if let Some(default) = self.sources.default_prompt.remove(name) {
            self.sources
                .default_confirmed
                .insert(name.to_owned(), default);
        }
        Ok(())
    }

    pub fn mark_required(&mut self, name: &str) -> IncipitResult<()> {
        self.variables.set_required(self.stage, name)?;
        Ok(())
    }

    pub fn register_variable(&mut self, variable: Variable) -> IncipitResult<()> {
        if !variable.default.is_empty() {
            let map = if variable.prompt {
                &mut self.sources.default_prompt
            } else {
                &mut self.sources.default_confirmed
            };
            map.insert(variable.name.clone(), variable.default.clone());
        }
        self.variables.register(variable)?;
        Ok(())
    }

    fn validate(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let kind = self
            .variables
            .get(key)
            .map(|v| v.kind)
            .unwrap_or(VarKind::Str);
        kind.validate(key, value)
    }
}

/// Human-readable prompt label for a variable name.
///
/// `AUTHOR_NAME` becomes `Author name`.
fn prompt_label(key: &str) -> String {
    let lowered = key.replace('_', " ").to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => lowered,
    }
}
