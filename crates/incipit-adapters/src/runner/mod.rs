//! Command runner adapters.

use std::collections::HashSet;
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex};

use incipit_core::application::ApplicationError;
use incipit_core::application::ports::{CommandOutput, CommandRunner};
use incipit_core::error::IncipitResult;
use tracing::debug;

/// Runs real subprocesses through `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[String], cwd: Option<&Path>) -> IncipitResult<CommandOutput> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            ApplicationError::CommandFailed {
                command: String::new(),
                stderr: "empty command line".into(),
                status: -1,
            }
        })?;

        let mut command = Command::new(program);
        command.args(args);
        if let Some(cwd) = cwd {
            command.current_dir(cwd);
        }

        let output = command
            .output()
            .map_err(|e| ApplicationError::CommandFailed {
                command: argv.join(" "),
                stderr: e.to_string(),
                status: -1,
            })?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code().unwrap_or(-1),
        };
        debug!(command = %argv.join(" "), status = result.status, "command finished");
        Ok(result)
    }

    fn which(&self, program: &str) -> bool {
        let Some(paths) = std::env::var_os("PATH") else {
            return false;
        };
        std::env::split_paths(&paths).any(|dir| {
            let direct = dir.join(program);
            if direct.is_file() {
                return true;
            }
            // Windows resolves through PATHEXT, checking .exe covers
            // the programs we spawn
            cfg!(windows) && dir.join(format!("{program}.exe")).is_file()
        })
    }
}

// ── Recording runner (testing) ───────────────────────────────────────────

#[derive(Debug, Default)]
struct RecordingState {
    commands: Vec<String>,
    responses: Vec<(String, String)>,
    hidden: HashSet<String>,
    failures: HashSet<String>,
}

/// Records every command instead of spawning anything. Commands
/// succeed with empty output unless a canned response or failure was
/// registered for a matching word subsequence.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command line issued so far, words joined by spaces.
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().commands.clone()
    }

    /// Serve canned stdout for commands containing the key's words in
    /// order.
    pub fn respond(&self, key: &str, stdout: &str) {
        self.state
            .lock()
            .unwrap()
            .responses
            .push((key.to_owned(), stdout.to_owned()));
    }

    /// Make matching commands exit with status 1.
    pub fn fail_on(&self, key: &str) {
        self.state.lock().unwrap().failures.insert(key.to_owned());
    }

    /// Make `which` report the program as missing.
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
        let failed = state
            .failures
            .iter()
            .any(|key| matches_subsequence(key, argv));
        let stdout = state
            .responses
            .iter()
            .find(|(key, _)| matches_subsequence(key, argv))
            .map(|(_, stdout)| stdout.clone())
            .unwrap_or_default();
        Ok(CommandOutput {
            stdout,
            stderr: String::new(),
            status: if failed { 1 } else { 0 },
        })
    }

    fn which(&self, program: &str) -> bool {
        !self.state.lock().unwrap().hidden.contains(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_runner_matches_word_subsequences() {
        let runner = RecordingRunner::new();
        runner.respond("git config user.name", "Ada\n");
        let argv: Vec<String> = ["git", "-C", "/work", "config", "user.name"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let output = runner.run(&argv, None).unwrap();
        assert_eq!(output.stdout, "Ada\n");
        assert_eq!(runner.commands().len(), 1);
    }

    #[test]
    fn failures_flip_the_exit_status() {
        let runner = RecordingRunner::new();
        runner.fail_on("pip install");
        let argv: Vec<String> = ["python3", "-m", "pip", "install", "x"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(runner.run(&argv, None).unwrap().status, 1);
    }

    #[test]
    fn system_runner_finds_common_programs() {
        // `sh` is on PATH in any environment these tests run in
        assert!(SystemRunner::new().which("sh"));
        assert!(!SystemRunner::new().which("definitely-not-a-real-program"));
    }

    #[test]
    fn system_runner_captures_output() {
        let argv: Vec<String> = ["sh", "-c", "echo hello"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let output = SystemRunner::new().run(&argv, None).unwrap();
        assert_eq!(output.status, 0);
        assert_eq!(output.stdout.trim(), "hello");
    }
}
