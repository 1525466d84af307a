//! Variable metadata registry and run stages.
//!
//! Every placeholder a tool may reference is declared here with its
//! type, default value, and prompting behavior. Tools adjust metadata
//! during early stages only; once files are on disk the registry is
//! frozen so a late adjustment cannot silently change what was written.
//!
//! # Stage gates
//!
//! | Field         | Writable during |
//! |---------------|-----------------|
//! | `default`     | Setup, Pre      |
//! | `prompt`      | Setup           |
//! | `required`    | Init, Setup     |

use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::error::DomainError;

/// Lifecycle stages of a bootstrap run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Assembling tools and feeding value sources.
    Init,
    /// Tools declare files, variables, and hooks.
    Setup,
    /// File paths are rendered and directories created.
    Mkdir,
    /// Pre-commit actions (vcs init, interpreter discovery).
    Pre,
    /// Configuration trees are resolved and written out.
    Commit,
    /// Post-commit actions (editable install, build check).
    Post,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Setup => "setup",
            Self::Mkdir => "mkdir",
            Self::Pre => "pre",
            Self::Commit => "commit",
            Self::Post => "post",
        };
        write!(f, "{name}")
    }
}

/// Value type of a variable, used to validate user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Str,
    Int,
    Flag,
}

impl VarKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Int => "integer",
            Self::Flag => "flag",
        }
    }

    /// Check a raw value against this kind.
    pub fn validate(self, name: &str, value: &str) -> Result<(), DomainError> {
        let ok = match self {
            Self::Str => true,
            Self::Int => value.parse::<i64>().is_ok(),
            Self::Flag => parse_flag(value).is_some(),
        };
        if ok {
            Ok(())
        } else {
            Err(DomainError::InvalidValue {
                name: name.to_owned(),
                value: value.to_owned(),
                kind: self.name(),
            })
        }
    }
}

/// Parse a flag value. Accepts the usual truthy/falsy spellings.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "y" => Some(true),
        "0" | "false" | "no" | "off" | "n" | "" => Some(false),
        _ => None,
    }
}

/// Metadata for a single variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
    /// Suggested value when prompting. Empty means no default.
    pub default: String,
    /// Whether the user is consulted before the value is used.
    pub prompt: bool,
    /// Required variables reject empty answers and never skip the prompt.
    pub required: bool,
    pub help: &'static str,
}

impl Variable {
    fn new(name: &str, kind: VarKind, default: &str, prompt: bool, help: &'static str) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            default: default.to_owned(),
            prompt,
            required: false,
            help,
        }
    }

    fn required(mut self) -> Self {
        debug_assert!(self.default.is_empty());
        self.required = true;
        self
    }
}

/// Registry of all known variables.
///
/// Seeded with the builtin set every run needs; tools and `INCIPIT_*`
/// environment variables register additional entries at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSet {
    entries: BTreeMap<String, Variable>,
}

impl Default for VariableSet {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableSet {
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        let builtins = [
            Variable::new(
                "AUDIENCE_PYTHON_VERSION",
                VarKind::Str,
                "3.9",
                true,
                "Minimum Python version the project supports",
            ),
            Variable::new(
                "AUTHOR_EMAIL",
                VarKind::Str,
                "",
                true,
                "Contact email published in the project metadata",
            ),
            Variable::new(
                "AUTHOR_NAME",
                VarKind::Str,
                "",
                true,
                "Author name published in the project metadata",
            ),
            Variable::new(
                "CHECK_BUILD",
                VarKind::Flag,
                "",
                false,
                "Run a wheel build after bootstrap to validate the setup",
            ),
            Variable::new(
                "LICENSE",
                VarKind::Str,
                "Copyright",
                false,
                "License identifier for the LICENSE file and classifiers",
            ),
            Variable::new(
                "PACKAGE_VERSION",
                VarKind::Str,
                "0.0.0",
                true,
                "Initial version number of the package",
            ),
            Variable::new(
                "PROJECT_NAME",
                VarKind::Str,
                "",
                true,
                "Name of the project being bootstrapped",
            ),
            Variable::new(
                "PYTHON_CMD",
                VarKind::Str,
                "python3",
                false,
                "Python interpreter used for subprocess calls",
            ),
            Variable::new(
                "REPOSITORY",
                VarKind::Str,
                "",
                true,
                "URL of the project repository",
            ),
            Variable::new(
                "SUMMARY_DESCRIPTION",
                VarKind::Str,
                "",
                true,
                "One-line description of the project",
            )
            .required(),
            Variable::new(
                "VENV_FOLDER",
                VarKind::Str,
                ".venv",
                false,
                "Directory name of the virtual environment",
            ),
            Variable::new(
                "YEAR",
                VarKind::Int,
                "",
                false,
                "Current year, used in license texts",
            ),
        ];
        for mut var in builtins {
            if var.name == "YEAR" {
                var.default = current_year().to_string();
            }
            entries.insert(var.name.clone(), var);
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Register a new variable. Errors if metadata already exists.
    pub fn register(&mut self, variable: Variable) -> Result<(), DomainError> {
        if self.entries.contains_key(&variable.name) {
            return Err(DomainError::VariableExists {
                name: variable.name,
            });
        }
        self.entries.insert(variable.name.clone(), variable);
        Ok(())
    }

    /// Register a plain string variable discovered at runtime, such as
    /// one fed through an `INCIPIT_*` environment variable. Prompting
    /// is disabled: the caller already supplied a value.
    pub fn register_ad_hoc(&mut self, name: &str) {
        self.entries.entry(name.to_owned()).or_insert(Variable {
            name: name.to_owned(),
            kind: VarKind::Str,
            default: String::new(),
            prompt: false,
            required: false,
            help: "",
        });
    }

    /// Change a variable's suggested default. Allowed during Setup and Pre.
    pub fn set_default(
        &mut self,
        stage: Stage,
        name: &str,
        default: &str,
    ) -> Result<(), DomainError> {
        if !matches!(stage, Stage::Setup | Stage::Pre) {
            return Err(DomainError::StageViolation {
                field: "default",
                stage: stage.to_string(),
            });
        }
        let var = self.get_mut(name)?;
        var.default = default.to_owned();
        Ok(())
    }

    /// Stop prompting for a variable. Allowed during Setup only.
    pub fn set_no_prompt(&mut self, stage: Stage, name: &str) -> Result<(), DomainError> {
        if stage != Stage::Setup {
            return Err(DomainError::StageViolation {
                field: "prompt",
                stage: stage.to_string(),
            });
        }
        let var = self.get_mut(name)?;
        var.prompt = false;
        Ok(())
    }

    /// Mark a variable as required. Allowed during Init and Setup, and
    /// only for variables without a default: a default would make the
    /// requirement unobservable.
    pub fn set_required(&mut self, stage: Stage, name: &str) -> Result<(), DomainError> {
        if !matches!(stage, Stage::Init | Stage::Setup) {
            return Err(DomainError::StageViolation {
                field: "required",
                stage: stage.to_string(),
            });
        }
        let var = self.get_mut(name)?;
        if !var.default.is_empty() {
            return Err(DomainError::RequiredWithDefault {
                name: name.to_owned(),
            });
        }
        var.required = true;
        Ok(())
    }

    /// Defaults of variables that are never prompted for. These count
    /// as confirmed values.
    pub fn silent_defaults(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .filter(|v| !v.prompt && !v.default.is_empty())
            .map(|v| (v.name.as_str(), v.default.as_str()))
    }

    /// Defaults of prompted variables. These are suggestions the user
    /// still has to confirm.
    pub fn prompted_defaults(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .filter(|v| v.prompt && !v.default.is_empty())
            .map(|v| (v.name.as_str(), v.default.as_str()))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Variable, DomainError> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| DomainError::UnknownVariable {
                name: name.to_owned(),
            })
    }
}

/// Current calendar year from the system clock, no timezone handling.
///
/// Uses Howard Hinnant's civil-from-days algorithm so we don't pull in
/// a date crate for a single field.
fn current_year() -> i64 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    let days = secs.div_euclid(86_400);
    civil_year_from_days(days)
}

fn civil_year_from_days(days_since_epoch: i64) -> i64 {
    let z = days_since_epoch + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    // January and February belong to the following civil year
    if mp >= 10 { y + 1 } else { y }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let set = VariableSet::new();
        for name in [
            "AUDIENCE_PYTHON_VERSION",
            "AUTHOR_EMAIL",
            "AUTHOR_NAME",
            "CHECK_BUILD",
            "LICENSE",
            "PACKAGE_VERSION",
            "PROJECT_NAME",
            "PYTHON_CMD",
            "REPOSITORY",
            "SUMMARY_DESCRIPTION",
            "VENV_FOLDER",
            "YEAR",
        ] {
            assert!(set.contains(name), "missing builtin {name}");
        }
    }

    #[test]
    fn summary_description_is_required_without_default() {
        let set = VariableSet::new();
        let var = set.get("SUMMARY_DESCRIPTION").unwrap();
        assert!(var.required);
        assert!(var.default.is_empty());
    }

    #[test]
    fn silent_defaults_skip_prompted_variables() {
        let set = VariableSet::new();
        let silent: Vec<_> = set.silent_defaults().map(|(n, _)| n).collect();
        assert!(silent.contains(&"PYTHON_CMD"));
        assert!(silent.contains(&"VENV_FOLDER"));
        assert!(!silent.contains(&"PACKAGE_VERSION"));
    }

    #[test]
    fn registering_twice_fails() {
        let mut set = VariableSet::new();
        let dup = set.get("YEAR").unwrap().clone();
        assert_eq!(
            set.register(dup),
            Err(DomainError::VariableExists {
                name: "YEAR".into()
            })
        );
    }

    #[test]
    fn required_rejects_variables_with_defaults() {
        let mut set = VariableSet::new();
        let err = set.set_required(Stage::Setup, "PACKAGE_VERSION");
        assert_eq!(
            err,
            Err(DomainError::RequiredWithDefault {
                name: "PACKAGE_VERSION".into()
            })
        );
    }

    #[test]
    fn metadata_setters_honor_stage_gates() {
        let mut set = VariableSet::new();
        assert!(set.set_default(Stage::Pre, "LICENSE", "MIT").is_ok());
        assert!(set.set_default(Stage::Post, "LICENSE", "MIT").is_err());
        assert!(set.set_no_prompt(Stage::Setup, "REPOSITORY").is_ok());
        assert!(set.set_no_prompt(Stage::Pre, "REPOSITORY").is_err());
        assert!(set.set_required(Stage::Init, "AUTHOR_NAME").is_ok());
        assert!(set.set_required(Stage::Mkdir, "AUTHOR_EMAIL").is_err());
    }

    #[test]
    fn flag_parsing_accepts_common_spellings() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn civil_year_matches_known_dates() {
        assert_eq!(civil_year_from_days(0), 1970);
        // 2000-01-01 is 10957 days after the epoch
        assert_eq!(civil_year_from_days(10_957), 2000);
        // 2024-12-31
        assert_eq!(civil_year_from_days(20_088), 2024);
        // 2025-01-01
        assert_eq!(civil_year_from_days(20_089), 2025);
    }

    #[test]
    fn year_default_is_plausible() {
        let set = VariableSet::new();
        let year: i64 = set.get("YEAR").unwrap().default.parse().unwrap();
        assert!((2024..2100).contains(&year));
    }
}
