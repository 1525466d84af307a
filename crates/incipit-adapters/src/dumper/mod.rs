//! Serialization of resolved configuration trees.
//!
//! One dumper handles all three formats a bootstrap produces: TOML
//! for `pyproject.toml`, the configparser INI dialect for
//! `setup.cfg`, and plain joined text for everything else.

use incipit_core::application::ApplicationError;
use incipit_core::application::ports::Dumper;
use incipit_core::application::structure::{FileFormat, FileSpec};
use incipit_core::domain::{ConfigNode, DomainError};
use incipit_core::error::IncipitResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct FormatDumper;

impl FormatDumper {
    pub fn new() -> Self {
        Self
    }
}

impl Dumper for FormatDumper {
    fn dump(&self, spec: &FileSpec, root: &ConfigNode) -> IncipitResult<String> {
        match spec.format {
            FileFormat::Toml => dump_toml(spec, root),
            FileFormat::Ini => dump_ini(spec, root),
            FileFormat::Text => dump_text(spec, root),
        }
    }
}

// ── TOML ─────────────────────────────────────────────────────────────────

fn dump_toml(spec: &FileSpec, root: &ConfigNode) -> IncipitResult<String> {
    let value = to_toml(spec, root)?;
    toml::to_string_pretty(&value).map_err(|e| {
        ApplicationError::SerializeFailed {
            path: spec.path.clone(),
            reason: e.to_string(),
        }
        .into()
    })
}

fn to_toml(spec: &FileSpec, node: &ConfigNode) -> IncipitResult<toml::Value> {
    match node {
        ConfigNode::Str(s) => Ok(toml::Value::String(s.clone())),
        ConfigNode::Int(i) => Ok(toml::Value::Integer(*i)),
        ConfigNode::Bool(b) => Ok(toml::Value::Boolean(*b)),
        ConfigNode::Array(items) => {
            let mut array = Vec::with_capacity(items.len());
            for item in items {
                array.push(to_toml(spec, item)?);
            }
            Ok(toml::Value::Array(array))
        }
        ConfigNode::Table(entries) => {
            let mut table = toml::value::Table::new();
            for (key, value) in entries {
                table.insert(key.clone(), to_toml(spec, value)?);
            }
            Ok(toml::Value::Table(table))
        }
        ConfigNode::Template(_) | ConfigNode::Choice(_) => Err(DomainError::UnresolvedNode {
            path: spec.path.clone(),
        }
        .into()),
    }
}

// ── INI (configparser dialect) ───────────────────────────────────────────

fn dump_ini(spec: &FileSpec, root: &ConfigNode) -> IncipitResult<String> {
    let ConfigNode::Table(sections) = root else {
        return Err(DomainError::NodeTypeConflict {
            path: spec.path.clone(),
            expected: "table",
            found: root.kind_name(),
        }
        .into());
    };

    let mut out = String::new();
    for (name, section) in sections {
        let ConfigNode::Table(entries) = section else {
            return Err(DomainError::NodeTypeConflict {
                path: format!("{}.{name}", spec.path),
                expected: "table",
                found: section.kind_name(),
            }
            .into());
        };
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("[{name}]\n"));
        for (key, value) in entries {
            write_ini_entry(spec, &mut out, key, value)?;
        }
    }
    Ok(out)
}

/// Multi-valued entries use the indented continuation form
/// configparser reads back as a list.
fn write_ini_entry(
    spec: &FileSpec,
    out: &mut String,
    key: &str,
    value: &ConfigNode,
) -> IncipitResult<()> {
    match value {
        ConfigNode::Str(s) => out.push_str(&format!("{key} = {s}\n")),
        ConfigNode::Int(i) => out.push_str(&format!("{key} = {i}\n")),
        ConfigNode::Bool(b) => out.push_str(&format!("{key} = {b}\n")),
        ConfigNode::Array(items) => {
            out.push_str(&format!("{key} =\n"));
            for item in items {
                match item {
                    ConfigNode::Str(s) => out.push_str(&format!("\t{s}\n")),
                    ConfigNode::Int(i) => out.push_str(&format!("\t{i}\n")),
                    other => {
                        return Err(DomainError::NodeTypeConflict {
                            path: format!("{}.{key}", spec.path),
                            expected: "string",
                            found: other.kind_name(),
                        }
                        .into());
                    }
                }
            }
        }
        ConfigNode::Table(entries) => {
            out.push_str(&format!("{key} =\n"));
            for (sub, value) in entries {
                match value {
                    ConfigNode::Str(s) => out.push_str(&format!("\t{sub} = {s}\n")),
                    other => {
                        return Err(DomainError::NodeTypeConflict {
                            path: format!("{}.{key}.{sub}", spec.path),
                            expected: "string",
                            found: other.kind_name(),
                        }
                        .into());
                    }
                }
            }
        }
        ConfigNode::Template(_) | ConfigNode::Choice(_) => {
            return Err(DomainError::UnresolvedNode {
                path: spec.path.clone(),
            }
            .into());
        }
    }
    Ok(())
}

// ── Text ─────────────────────────────────────────────────────────────────

fn dump_text(spec: &FileSpec, root: &ConfigNode) -> IncipitResult<String> {
    let ConfigNode::Array(items) = root else {
        return Err(DomainError::NodeTypeConflict {
            path: spec.path.clone(),
            expected: "array",
            found: root.kind_name(),
        }
        .into());
    };
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        match item {
            ConfigNode::Str(s) => lines.push(s.as_str()),
            other => {
                return Err(DomainError::NodeTypeConflict {
                    path: spec.path.clone(),
                    expected: "string",
                    found: other.kind_name(),
                }
                .into());
            }
        }
    }
    let mut out = lines.join(spec.separator);
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use incipit_core::application::structure::FileSpec;

    fn table(entries: &[(&str, ConfigNode)]) -> ConfigNode {
        let mut node = ConfigNode::table();
        if let ConfigNode::Table(map) = &mut node {
            for (key, value) in entries {
                map.insert((*key).to_owned(), value.clone());
            }
        }
        node
    }

    fn strings(items: &[&str]) -> ConfigNode {
        ConfigNode::Array(items.iter().map(|s| ConfigNode::literal(s)).collect())
    }

    #[test]
    fn toml_output_is_well_formed() {
        let root = table(&[(
            "build-system",
            table(&[
                ("build-backend", ConfigNode::literal("flit_core.buildapi")),
                ("requires", strings(&["flit_core>=3.4.0"])),
            ]),
        )]);
        let out = FormatDumper::new()
            .dump(&FileSpec::toml("pyproject.toml"), &root)
            .unwrap();
        let parsed: toml::Value = toml::from_str(&out).unwrap();
        assert_eq!(
            parsed["build-system"]["build-backend"].as_str(),
            Some("flit_core.buildapi")
        );
    }

    #[test]
    fn unresolved_templates_refuse_to_serialize() {
        let root = table(&[("project", table(&[("name", "{PROJECT_NAME}".into())]))]);
        let err = FormatDumper::new().dump(&FileSpec::toml("pyproject.toml"), &root);
        assert!(err.is_err());
    }

    #[test]
    fn ini_lists_use_indented_continuations() {
        let root = table(&[(
            "metadata",
            table(&[
                ("name", ConfigNode::literal("my-tool")),
                (
                    "classifiers",
                    strings(&[
                        "Programming Language :: Python :: 3 :: Only",
                        "License :: OSI Approved :: MIT License",
                    ]),
                ),
            ]),
        )]);
        let out = FormatDumper::new()
            .dump(&FileSpec::ini("setup.cfg"), &root)
            .unwrap();
        assert!(out.starts_with("[metadata]\n"));
        assert!(out.contains("name = my-tool\n"));
        assert!(out.contains("classifiers =\n\tProgramming Language"));
    }

    #[test]
    fn ini_nested_tables_become_keyed_lines() {
        let root = table(&[(
            "metadata",
            table(&[(
                "project_urls",
                table(&[(
                    "Repository",
                    ConfigNode::literal("https://example.org/demo"),
                )]),
            )]),
        )]);
        let out = FormatDumper::new()
            .dump(&FileSpec::ini("setup.cfg"), &root)
            .unwrap();
        assert!(out.contains("project_urls =\n\tRepository = https://example.org/demo"));
    }

    #[test]
    fn text_files_honor_the_separator() {
        let root = strings(&["# demo", "A description"]);
        let out = FormatDumper::new()
            .dump(&FileSpec::text_sep("README.md", "\n\n"), &root)
            .unwrap();
        assert_eq!(out, "# demo\n\nA description\n");
    }
}
