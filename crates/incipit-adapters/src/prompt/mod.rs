//! Prompter adapters.
//!
//! `TerminalPrompter` drives a real terminal through `dialoguer` and
//! is behind the `interactive` feature. `AssumeDefaults` backs the
//! `--yes` flag, and `ScriptedPrompter` feeds canned answers in tests.

mod assume;
mod scripted;
#[cfg(feature = "interactive")]
mod terminal;

pub use assume::AssumeDefaults;
pub use scripted::ScriptedPrompter;
#[cfg(feature = "interactive")]
pub use terminal::TerminalPrompter;
