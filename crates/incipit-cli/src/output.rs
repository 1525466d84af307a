//! User-facing terminal output.
//!
//! All non-log output goes through [`OutputManager`] so that `--quiet`
//! and `--no-color` are honored in one place.  Diagnostics go to
//! stderr; payload output (completion scripts, listings) goes to
//! stdout directly from the commands.

use console::Term;
use owo_colors::OwoColorize;

/// Writes styled status messages to the terminal.
pub struct OutputManager {
    term: Term,
    quiet: bool,
    color: bool,
}

impl OutputManager {
    pub fn new(quiet: bool, no_color: bool) -> Self {
        let term = Term::stderr();
        let color = !no_color && term.features().colors_supported();
        Self { term, quiet, color }
    }

    /// Plain line, suppressed by `--quiet`.
    pub fn print(&self, message: &str) {
        if !self.quiet {
            let _ = self.term.write_line(message);
        }
    }

    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        let line = if self.color {
            format!("{} {}", "✓".green().bold(), message)
        } else {
            format!("✓ {message}")
        };
        let _ = self.term.write_line(&line);
    }

    /// Errors always print, even under `--quiet`.
    pub fn error(&self, message: &str) {
        let line = if self.color {
            format!("{} {}", "✗".red().bold(), message.red())
        } else {
            format!("✗ {message}")
        };
        let _ = self.term.write_line(&line);
    }

    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        let line = if self.color {
            format!("{} {}", "⚠".yellow().bold(), message.yellow())
        } else {
            format!("⚠ {message}")
        };
        let _ = self.term.write_line(&line);
    }

    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let line = if self.color {
            format!("{} {}", "ℹ".blue().bold(), message)
        } else {
            format!("ℹ {message}")
        };
        let _ = self.term.write_line(&line);
    }

    /// Section header for multi-part listings.
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        let line = if self.color {
            format!("{}", title.bold().underline())
        } else {
            title.to_owned()
        };
        let _ = self.term.write_line(&line);
    }

    /// Hint lines printed after a successful bootstrap.
    pub fn hint(&self, message: &str) {
        if self.quiet {
            return;
        }
        let line = if self.color {
            format!("  {}", message.dimmed())
        } else {
            format!("  {message}")
        };
        let _ = self.term.write_line(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_manager_constructs() {
        // smoke test, output goes to the real stderr
        let out = OutputManager::new(true, true);
        out.print("suppressed");
        out.success("suppressed");
        out.warning("suppressed");
    }
}
