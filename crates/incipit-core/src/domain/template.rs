//! String templates and configuration trees.
//!
//! Files a tool wants to generate are described as trees of
//! [`ConfigNode`]s whose string leaves are [`StringTemplate`]s.
//! Placeholders stay symbolic until commit time: the tree is built up
//! front by every tool, then resolved in one pass so each variable is
//! prompted at most once.
//!
//! Template syntax is `{NAME}` with `{{` and `}}` as literal braces.
//! Placeholder names are uppercase with digits and underscores.

use std::collections::BTreeMap;

use tracing::trace;

use crate::application::ports::Prompter;
use crate::domain::environment::Environment;
use crate::domain::error::DomainError;
use crate::error::IncipitResult;

/// Post-lookup value transformation, keyed by the placeholder name.
pub type Sanitizer = fn(&str, &str) -> String;

// ── String templates ─────────────────────────────────────────────────────

/// A pattern with `{NAME}` placeholders, rendered against the
/// environment at commit time.
#[derive(Debug, Clone, PartialEq)]
pub struct StringTemplate {
    pattern: String,
    /// Values pushed into the environment before rendering. Confirmed
    /// overrides are used as-is, unconfirmed ones are suggestions.
    overrides: BTreeMap<String, String>,
    confirmed: bool,
    sanitizer: Option<Sanitizer>,
    /// Substitute missing placeholders with an empty string instead of
    /// collapsing the whole render to `None`.
    allow_empty: bool,
}

impl From<&str> for StringTemplate {
    fn from(pattern: &str) -> Self {
        Self::new(pattern.to_owned())
    }
}

impl From<String> for StringTemplate {
    fn from(pattern: String) -> Self {
        Self::new(pattern)
    }
}

impl StringTemplate {
    pub fn new(pattern: String) -> Self {
        Self {
            pattern,
            overrides: BTreeMap::new(),
            confirmed: false,
            sanitizer: None,
            allow_empty: false,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Suggest a value for one of the placeholders before rendering.
    pub fn with_override(mut self, key: &str, value: &str) -> Self {
        self.overrides.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Treat overrides as confirmed values rather than suggestions.
    pub fn confirmed(mut self) -> Self {
        self.confirmed = true;
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }

    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// Placeholder names appearing in the pattern, in order, deduped.
    pub fn placeholders(&self) -> Result<Vec<String>, DomainError> {
        let mut names = Vec::new();
        let mut chars = self.pattern.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '{' => {
                    if chars.peek() == Some(&'{') {
                        chars.next();
                        continue;
                    }
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) if c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' => {
                                name.push(c)
                            }
                            _ => {
                                return Err(DomainError::InvalidPlaceholder {
                                    pattern: self.pattern.clone(),
                                });
                            }
                        }
                    }
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
                '}' => {
                    if chars.next() != Some('}') {
                        return Err(DomainError::InvalidPlaceholder {
                            pattern: self.pattern.clone(),
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(names)
    }

    /// Render the pattern. `Ok(None)` when a placeholder resolved to
    /// nothing and empty substitution is not allowed.
    pub fn render(
        &self,
        env: &mut Environment,
        prompter: &dyn Prompter,
    ) -> IncipitResult<Option<String>> {
        for (key, value) in &self.overrides {
            if self.confirmed {
                env.inject(key, value);
            } else {
                env.suggest(key, value);
            }
        }

        let mut substitutions = BTreeMap::new();
        for name in self.placeholders()? {
            let value = match env.lookup(&name, prompter)? {
                Some(value) => value,
                None if self.allow_empty => String::new(),
                None => {
                    trace!(placeholder = %name, pattern = %self.pattern, "render collapsed");
                    return Ok(None);
                }
            };
            let value = match self.sanitizer {
                Some(sanitize) => sanitize(&name, &value),
                None => value,
            };
            substitutions.insert(name, value);
        }

        Ok(Some(substitute(&self.pattern, &substitutions)))
    }
}

/// Replace `{NAME}` placeholders, unescaping `{{` and `}}`.
fn substitute(pattern: &str, values: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    name.push(c);
                }
                if let Some(value) = values.get(&name) {
                    out.push_str(value);
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

// ── Configuration trees ──────────────────────────────────────────────────

/// One value in a configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNode {
    Str(String),
    Int(i64),
    Bool(bool),
    Template(StringTemplate),
    /// Conflicting scalar assignments, settled by the user at commit.
    Choice(MultipleValues),
    Array(Vec<ConfigNode>),
    Table(BTreeMap<String, ConfigNode>),
}

impl From<&str> for ConfigNode {
    fn from(pattern: &str) -> Self {
        Self::Template(pattern.into())
    }
}

impl From<String> for ConfigNode {
    fn from(pattern: String) -> Self {
        Self::Template(pattern.into())
    }
}

impl From<StringTemplate> for ConfigNode {
    fn from(template: StringTemplate) -> Self {
        Self::Template(template)
    }
}

impl From<i64> for ConfigNode {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ConfigNode {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl ConfigNode {
    /// A plain string with no placeholder processing.
    pub fn literal(value: &str) -> Self {
        Self::Str(value.to_owned())
    }

    pub fn table() -> Self {
        Self::Table(BTreeMap::new())
    }

    pub fn array() -> Self {
        Self::Array(Vec::new())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Str(_) | Self::Template(_) | Self::Choice(_) => "string",
            Self::Int(_) => "integer",
            Self::Bool(_) => "boolean",
            Self::Array(_) => "array",
            Self::Table(_) => "table",
        }
    }

    fn is_scalar(&self) -> bool {
        !matches!(self, Self::Array(_) | Self::Table(_))
    }
}

/// Conflicting values for a single configuration key. The user picks
/// one when the tree is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipleValues {
    values: Vec<ConfigNode>,
}

impl MultipleValues {
    fn merge(existing: ConfigNode, incoming: ConfigNode) -> Self {
        let mut values = match existing {
            ConfigNode::Choice(multi) => multi.values,
            other => vec![other],
        };
        match incoming {
            ConfigNode::Choice(multi) => values.extend(multi.values),
            other => {
                if !values.contains(&other) {
                    values.push(other);
                }
            }
        }
        Self { values }
    }

    fn resolve(
        &self,
        path: &str,
        env: &mut Environment,
        prompter: &dyn Prompter,
    ) -> IncipitResult<Option<String>> {
        let mut candidates = Vec::new();
        for value in &self.values {
            match value {
                ConfigNode::Str(s) => candidates.push(s.clone()),
                ConfigNode::Template(t) => {
                    if let Some(rendered) = t.render(env, prompter)? {
                        candidates.push(rendered);
                    }
                }
                ConfigNode::Int(i) => candidates.push(i.to_string()),
                ConfigNode::Bool(b) => candidates.push(b.to_string()),
                ConfigNode::Choice(_) | ConfigNode::Array(_) | ConfigNode::Table(_) => {
                    return Err(DomainError::NodeTypeConflict {
                        path: path.to_owned(),
                        expected: "string",
                        found: value.kind_name(),
                    }
                    .into());
                }
            }
        }
        candidates.dedup();
        match candidates.len() {
            0 => Ok(None),
            1 => Ok(candidates.pop()),
            _ => {
                let label = format!("Conflicting configuration for {path}, choose between");
                Ok(Some(prompter.choose(&label, &candidates)?))
            }
        }
    }
}

// ── Tree editing ─────────────────────────────────────────────────────────

/// Mutable view over a table-rooted configuration tree.
///
/// Tools share these trees, so `set` merges instead of replacing:
/// identical scalars are kept, differing scalars become a [`Choice`],
/// tables recurse, and arrays append missing items.
pub struct TemplateDict<'a> {
    node: &'a mut ConfigNode,
    path: String,
}

impl<'a> TemplateDict<'a> {
    pub fn new(node: &'a mut ConfigNode, path: &str) -> Result<Self, DomainError> {
        match node {
            ConfigNode::Table(_) => Ok(Self {
                node,
                path: path.to_owned(),
            }),
            other => Err(DomainError::NodeTypeConflict {
                path: path.to_owned(),
                expected: "table",
                found: other.kind_name(),
            }),
        }
    }

    /// Set a value at a nested key path, creating tables on the way.
    pub fn set(&mut self, keys: &[&str], value: impl Into<ConfigNode>) -> Result<(), DomainError> {
        let (slot, path) = self.descend(keys)?;
        merge(slot, value.into(), &path)
    }

    /// Append a value to the array at the key path, creating it if
    /// missing. Duplicate items are dropped.
    pub fn append(
        &mut self,
        keys: &[&str],
        value: impl Into<ConfigNode>,
    ) -> Result<(), DomainError> {
        let (slot, path) = self.descend(keys)?;
        let value = value.into();
        match slot {
            ConfigNode::Array(items) => {
                if !items.contains(&value) {
                    items.push(value);
                }
                Ok(())
            }
            other => Err(DomainError::NodeTypeConflict {
                path,
                expected: "array",
                found: other.kind_name(),
            }),
        }
    }

    pub fn contains(&self, keys: &[&str]) -> bool {
        let mut current = &*self.node;
        for key in keys {
            match current {
                ConfigNode::Table(entries) => match entries.get(*key) {
                    Some(node) => current = node,
                    None => return false,
                },
                _ => return false,
            }
        }
        true
    }

    /// Walk to the slot for `keys`, creating intermediate tables and an
    /// empty table at the leaf when absent.
    fn descend(&mut self, keys: &[&str]) -> Result<(&mut ConfigNode, String), DomainError> {
        assert!(!keys.is_empty());
        let mut current = &mut *self.node;
        let mut path = self.path.clone();
        for key in keys {
            path.push('.');
            path.push_str(key);
            let entries = match current {
                ConfigNode::Table(entries) => entries,
                other => {
                    return Err(DomainError::NodeTypeConflict {
                        path,
                        expected: "table",
                        found: other.kind_name(),
                    });
                }
            };
            // an empty table at the leaf merges cleanly with whatever
            // value arrives next
            current = entries
                .entry((*key).to_owned())
                .or_insert_with(ConfigNode::table);
        }
        Ok((current, path))
    }
}

/// Merge an incoming node into an existing slot.
fn merge(slot: &mut ConfigNode, incoming: ConfigNode, path: &str) -> Result<(), DomainError> {
    match (&mut *slot, incoming) {
        // fresh slot from descend()
        (ConfigNode::Table(existing), incoming) if existing.is_empty() => {
            *slot = incoming;
            Ok(())
        }
        (ConfigNode::Table(existing), ConfigNode::Table(incoming)) => {
            for (key, value) in incoming {
                let child_path = format!("{path}.{key}");
                match existing.get_mut(&key) {
                    Some(child) => merge(child, value, &child_path)?,
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
            Ok(())
        }
        (ConfigNode::Array(existing), ConfigNode::Array(incoming)) => {
            for item in incoming {
                if !existing.contains(&item) {
                    existing.push(item);
                }
            }
            Ok(())
        }
        (existing, incoming) if existing.is_scalar() && incoming.is_scalar() => {
            if *existing != incoming {
                let merged = MultipleValues::merge(existing.clone(), incoming);
                *slot = ConfigNode::Choice(merged);
            }
            Ok(())
        }
        (existing, incoming) => Err(DomainError::NodeTypeConflict {
            path: path.to_owned(),
            expected: existing.kind_name(),
            found: incoming.kind_name(),
        }),
    }
}

/// Mutable view over an array-rooted tree, used for line-oriented
/// files such as `.gitignore`.
pub struct TemplateList<'a> {
    node: &'a mut ConfigNode,
}

impl<'a> TemplateList<'a> {
    pub fn new(node: &'a mut ConfigNode, path: &str) -> Result<Self, DomainError> {
        match node {
            ConfigNode::Array(_) => Ok(Self { node }),
            other => Err(DomainError::NodeTypeConflict {
                path: path.to_owned(),
                expected: "array",
                found: other.kind_name(),
            }),
        }
    }

    pub fn push(&mut self, value: impl Into<ConfigNode>) {
        let value = value.into();
        if let ConfigNode::Array(items) = self.node {
            if !items.contains(&value) {
                items.push(value);
            }
        }
    }
}

// ── Resolution ───────────────────────────────────────────────────────────

/// Resolve a tree: render templates, settle choices, prune empties.
///
/// Returns `None` when the whole subtree collapsed, so callers can
/// drop keys whose values the user declined.
pub fn resolve(
    node: &ConfigNode,
    path: &str,
    env: &mut Environment,
    prompter: &dyn Prompter,
) -> IncipitResult<Option<ConfigNode>> {
    match node {
        ConfigNode::Str(s) => Ok(Some(ConfigNode::Str(s.clone()))),
        ConfigNode::Int(i) => Ok(Some(ConfigNode::Int(*i))),
        ConfigNode::Bool(b) => Ok(Some(ConfigNode::Bool(*b))),
        ConfigNode::Template(template) => {
            Ok(template.render(env, prompter)?.map(ConfigNode::Str))
        }
        ConfigNode::Choice(multi) => {
            Ok(multi.resolve(path, env, prompter)?.map(ConfigNode::Str))
        }
        ConfigNode::Array(items) => {
            let mut resolved = Vec::new();
            for item in items {
                if let Some(value) = resolve(item, path, env, prompter)? {
                    resolved.push(value);
                }
            }
            if resolved.is_empty() {
                Ok(None)
            } else {
                Ok(Some(ConfigNode::Array(resolved)))
            }
        }
        ConfigNode::Table(entries) => {
            let mut resolved = BTreeMap::new();
            for (key, value) in entries {
                let child_path = format!("{path}.{key}");
                if let Some(value) = resolve(value, &child_path, env, prompter)? {
                    resolved.insert(key.clone(), value);
                }
            }
            if resolved.is_empty() {
                Ok(None)
            } else {
                Ok(Some(ConfigNode::Table(resolved)))
            }
        }
    }
}
