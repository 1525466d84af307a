//! Project structure: the set of files a bootstrap run will create.
//!
//! Tools register files by [`FileSpec`] and edit their configuration
//! trees through [`TemplateDict`] / [`TemplateList`] views. Nothing
//! touches disk until the two structure passes:
//!
//! 1. `mkdir` renders every file path (paths are templates too, a
//!    package directory is `{PROJECT_NAME}/__init__.py`) and creates
//!    parent directories, failing early when a file already exists.
//! 2. `commit` resolves every tree against the environment and writes
//!    the serialized contents out.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::application::error::ApplicationError;
use crate::application::ports::{Dumper, Filesystem, Prompter};
use crate::domain::template::{self, StringTemplate};
use crate::domain::{ConfigNode, Environment, Sanitizer, TemplateDict, TemplateList};
use crate::error::IncipitResult;

/// On-disk serialization format of a registered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Ini,
    /// Line-oriented text, items joined by the spec separator.
    Text,
}

/// Identity of one generated file: templated path plus format.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSpec {
    pub path: String,
    pub format: FileFormat,
    /// Applied to placeholder values inside the path.
    pub sanitizer: Option<Sanitizer>,
    /// Separator between items of a text file.
    pub separator: &'static str,
}

impl FileSpec {
    pub fn toml(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            format: FileFormat::Toml,
            sanitizer: None,
            separator: "\n",
        }
    }

    pub fn ini(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            format: FileFormat::Ini,
            sanitizer: None,
            separator: "\n",
        }
    }

    pub fn text(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            format: FileFormat::Text,
            sanitizer: None,
            separator: "\n",
        }
    }

    pub fn text_sep(path: &str, separator: &'static str) -> Self {
        Self {
            path: path.to_owned(),
            format: FileFormat::Text,
            sanitizer: None,
            separator,
        }
    }

    pub fn with_sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }
}

#[derive(Debug)]
struct StructureEntry {
    spec: FileSpec,
    node: ConfigNode,
    /// Rendered absolute path, filled in by `mkdir`.
    resolved: Option<PathBuf>,
}

/// All files registered for the current run.
#[derive(Debug, Default)]
pub struct ProjectStructure {
    entries: Vec<StructureEntry>,
}

impl ProjectStructure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table view over a file's configuration tree, registering the
    /// file on first use.
    pub fn config_table(&mut self, spec: FileSpec) -> IncipitResult<TemplateDict<'_>> {
        let entry = self.entry(spec, ConfigNode::table);
        let path = entry.spec.path.clone();
        Ok(TemplateDict::new(&mut entry.node, &path)?)
    }

    /// Array view for line-oriented files.
    pub fn config_list(&mut self, spec: FileSpec) -> IncipitResult<TemplateList<'_>> {
        let entry = self.entry(spec, ConfigNode::array);
        let path = entry.spec.path.clone();
        Ok(TemplateList::new(&mut entry.node, &path)?)
    }

    pub fn is_registered(&self, path: &str) -> bool {
        self.entries.iter().any(|e| e.spec.path == path)
    }

    fn entry(&mut self, spec: FileSpec, empty: fn() -> ConfigNode) -> &mut StructureEntry {
        let index = match self.entries.iter().position(|e| e.spec.path == spec.path) {
            Some(index) => index,
            None => {
                debug!(path = %spec.path, "registering file");
                self.entries.push(StructureEntry {
                    spec,
                    node: empty(),
                    resolved: None,
                });
                self.entries.len() - 1
            }
        };
        &mut self.entries[index]
    }

    /// Render file paths and create parent directories under `workon`.
    pub fn mkdir(
        &mut self,
        workon: &Path,
        env: &mut Environment,
        prompter: &dyn Prompter,
        fs: &dyn Filesystem,
    ) -> IncipitResult<()> {
        for entry in &mut self.entries {
            let mut template = StringTemplate::from(entry.spec.path.as_str());
            if let Some(sanitizer) = entry.spec.sanitizer {
                template = template.with_sanitizer(sanitizer);
            }
            let rendered = template.render(env, prompter)?.ok_or_else(|| {
                ApplicationError::FilesystemError {
                    path: entry.spec.path.clone(),
                    reason: "file path did not resolve to a value".into(),
                }
            })?;
            let full = workon.join(&rendered);
            if fs.exists(&full) {
                return Err(ApplicationError::FileExists {
                    path: full.display().to_string(),
                }
                .into());
            }
            if let Some(parent) = full.parent() {
                fs.create_dir_all(parent)?;
            }
            debug!(path = %full.display(), "created parent directories");
            entry.resolved = Some(full);
        }
        Ok(())
    }

    /// Resolve every configuration tree and write the files out.
    pub fn commit(
        &mut self,
        env: &mut Environment,
        prompter: &dyn Prompter,
        dumper: &dyn Dumper,
        fs: &dyn Filesystem,
    ) -> IncipitResult<()> {
        for entry in &mut self.entries {
            let Some(full) = entry.resolved.clone() else {
                return Err(ApplicationError::FilesystemError {
                    path: entry.spec.path.clone(),
                    reason: "commit called before mkdir".into(),
                }
                .into());
            };
            let resolved = template::resolve(&entry.node, &entry.spec.path, env, prompter)?
                .unwrap_or_else(|| match entry.spec.format {
                    FileFormat::Text => ConfigNode::array(),
                    _ => ConfigNode::table(),
                });
            let contents = dumper.dump(&entry.spec, &resolved)?;
            fs.write_file(&full, &contents)?;
            info!(path = %full.display(), "wrote file");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryFilesystem, PlainDumper, ScriptedPrompter};

    #[test]
    fn files_are_registered_once() {
        let mut structure = ProjectStructure::new();
        structure
            .config_table(FileSpec::toml("pyproject.toml"))
            .unwrap()
            .set(&["project", "name"], "{PROJECT_NAME}")
            .unwrap();
        structure
            .config_table(FileSpec::toml("pyproject.toml"))
            .unwrap()
            .set(&["project", "version"], "{PACKAGE_VERSION}")
            .unwrap();
        assert!(structure.is_registered("pyproject.toml"));
        assert_eq!(structure.entries.len(), 1);
    }

    #[test]
    fn table_and_list_views_conflict() {
        let mut structure = ProjectStructure::new();
        structure.config_table(FileSpec::toml("pyproject.toml")).unwrap();
        assert!(structure.config_list(FileSpec::toml("pyproject.toml")).is_err());
    }

    #[test]
    fn mkdir_renders_templated_paths() {
        let mut structure = ProjectStructure::new();
        structure
            .config_list(
                FileSpec::text("{PROJECT_NAME}/__init__.py")
                    .with_sanitizer(crate::domain::sanitize::package),
            )
            .unwrap()
            .push(ConfigNode::literal(""));
        let mut env = Environment::default();
        env.feed_cli("PROJECT_NAME", "my-tool").unwrap();
        let prompter = ScriptedPrompter::default();
        let fs = MemoryFilesystem::default();
        structure
            .mkdir(Path::new("/work"), &mut env, &prompter, &fs)
            .unwrap();
        assert_eq!(
            structure.entries[0].resolved.as_deref(),
            Some(Path::new("/work/my_tool/__init__.py"))
        );
        assert!(fs.has_dir(Path::new("/work/my_tool")));
    }

    #[test]
    fn mkdir_refuses_existing_files() {
        let mut structure = ProjectStructure::new();
        structure.config_table(FileSpec::toml("pyproject.toml")).unwrap();
        let mut env = Environment::default();
        let prompter = ScriptedPrompter::default();
        let fs = MemoryFilesystem::default();
        fs.write_file(Path::new("/work/pyproject.toml"), "").unwrap();
        let err = structure.mkdir(Path::new("/work"), &mut env, &prompter, &fs);
        assert!(err.is_err());
    }

    #[test]
    fn commit_before_mkdir_is_an_error() {
        let mut structure = ProjectStructure::new();
        structure.config_table(FileSpec::toml("pyproject.toml")).unwrap();
        let mut env = Environment::default();
        let prompter = ScriptedPrompter::default();
        let fs = MemoryFilesystem::default();
        let err = structure.commit(&mut env, &prompter, &PlainDumper, &fs);
        assert!(err.is_err());
    }

    #[test]
    fn commit_writes_resolved_contents() {
        let mut structure = ProjectStructure::new();
        structure
            .config_list(FileSpec::text(".gitignore"))
            .unwrap()
            .push("{VENV_FOLDER}");
        let mut env = Environment::default();
        let prompter = ScriptedPrompter::default();
        let fs = MemoryFilesystem::default();
        structure
            .mkdir(Path::new("/work"), &mut env, &prompter, &fs)
            .unwrap();
        structure
            .commit(&mut env, &prompter, &PlainDumper, &fs)
            .unwrap();
        let contents = fs.read_file(Path::new("/work/.gitignore")).unwrap();
        assert!(contents.contains(".venv"));
    }
}
