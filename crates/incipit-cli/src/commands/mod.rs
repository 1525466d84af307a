//! Command implementations.
//!
//! One module per subcommand; `main` dispatches here after parsing and
//! setup.

pub mod completions;
pub mod list;
pub mod new;
