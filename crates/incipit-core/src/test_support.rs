//! Scripted port implementations for unit tests.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::application::ports::{CommandOutput, CommandRunner, Dumper, Filesystem, Prompter};
use crate::application::structure::{FileFormat, FileSpec};
use crate::domain::ConfigNode;
use crate::error::IncipitResult;

// ── Prompter ─────────────────────────────────────────────────────────────

/// Answers questions from a queue. With an empty queue the default
/// mode declines everything; `accept_all` takes whatever candidate is
/// offered instead.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    accept: bool,
    count: AtomicUsize,
}

impl ScriptedPrompter {
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            accept: false,
            count: AtomicUsize::new(0),
        }
    }

    pub fn accept_all() -> Self {
        Self {
            accept: true,
            ..Self::default()
        }
    }

    pub fn interactions(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    fn next(&self) -> Option<String> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.answers.lock().unwrap().pop_front()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, _label: &str, candidate: &str) -> IncipitResult<String> {
        Ok(self.next().unwrap_or_else(|| {
            if self.accept {
                candidate.to_owned()
            } else {
                String::new()
            }
        }))
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

// ── Filesystem ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct FsState {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

/// In-memory filesystem, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    state: Arc<Mutex<FsState>>,
}

impl MemoryFilesystem {
    pub fn read_file(&self, path: &Path) -> Option<String> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    pub fn has_dir(&self, path: &Path) -> bool {
        self.state.lock().unwrap().dirs.contains(path)
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> IncipitResult<()> {
        let mut state = self.state.lock().unwrap();
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            state.dirs.insert(current.clone());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &str) -> IncipitResult<()> {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(path.to_path_buf(), contents.to_owned());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains_key(path) || state.dirs.contains(path)
    }
}

// ── Command runner ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct RunnerState {
    commands: Vec<String>,
    responses: Vec<(String, String)>,
    hidden: BTreeSet<String>,
}

/// Records every command, succeeds by default, and can serve canned
/// stdout keyed by a word subsequence of the command line.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    state: Arc<Mutex<RunnerState>>,
}

impl RecordingRunner {
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().commands.clone()
    }

    pub fn respond(&self, key: &str, stdout: &str) {
        self.state
            .lock()
            .unwrap()
            .responses
            .push((key.to_owned(), stdout.to_owned()));
    }

    pub fn hide_program(&self, program: &str) {
        self.state.lock().unwrap().hidden.insert(program.to_owned());
    }
}

fn matches_subsequence(key: &str, argv: &[String]) -> bool {
    let mut args = argv.iter();
    key.split_whitespace()
        .all(|word| args.any(|arg| arg.as_str() == word))
}

impl CommandRunner for RecordingRunner {
    fn run(&self, argv: &[String], _cwd: Option<&Path>) -> IncipitResult<CommandOutput> {
        let mut state = self.state.lock().unwrap();
        state.commands.push(argv.join(" "));
        let stdout = state
            .responses
            .iter()
            .find(|(key, _)| matches_subsequence(key, argv))
            .map(|(_, stdout)| stdout.clone())
            .unwrap_or_default();
        Ok(CommandOutput {
            stdout,
            stderr: String::new(),
            status: 0,
        })
    }

    fn which(&self, program: &str) -> bool {
        !self.state.lock().unwrap().hidden.contains(program)
    }
}

// ── Dumper ───────────────────────────────────────────────────────────────

/// Flat textual dump, good enough to assert on file contents.
pub struct PlainDumper;

impl Dumper for PlainDumper {
    fn dump(&self, spec: &FileSpec, root: &ConfigNode) -> IncipitResult<String> {
        let mut out = String::new();
        match (spec.format, root) {
            (FileFormat::Text, ConfigNode::Array(items)) => {
                let lines: Vec<&str> = items
                    .iter()
                    .filter_map(|item| match item {
                        ConfigNode::Str(s) => Some(s.as_str()),
                        _ => None,
                    })
                    .collect();
                out.push_str(&lines.join(spec.separator));
            }
            (_, node) => flatten(node, "", &mut out),
        }
        out.push('\n');
        Ok(out)
    }
}

fn flatten(node: &ConfigNode, prefix: &str, out: &mut String) {
    match node {
        ConfigNode::Str(s) => out.push_str(&format!("{prefix} = {s}\n")),
        ConfigNode::Int(i) => out.push_str(&format!("{prefix} = {i}\n")),
        ConfigNode::Bool(b) => out.push_str(&format!("{prefix} = {b}\n")),
        ConfigNode::Array(items) => {
            for item in items {
                flatten(item, prefix, out);
            }
        }
        ConfigNode::Table(entries) => {
            for (key, value) in entries {
                let child = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(value, &child, out);
            }
        }
        ConfigNode::Template(_) | ConfigNode::Choice(_) => {}
    }
}
