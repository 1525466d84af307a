//! `incipit list` - enumerate supported licenses and build systems.
//!
//! Listings go to stdout so they stay pipeable; headers go through the
//! output manager and respect `--quiet`.

use incipit_core::prelude::KNOWN_LICENSES;

use crate::cli::{BuildSystem, ListArgs};
use crate::error::CliError;
use crate::output::OutputManager;

pub fn execute(args: &ListArgs, output: &OutputManager) -> Result<(), CliError> {
    // with no filter, show both sections
    let all = !args.licenses && !args.build_systems;

    if all || args.licenses {
        output.header("Licenses");
        for identifier in KNOWN_LICENSES {
            println!("{identifier}");
        }
    }
    if all && !KNOWN_LICENSES.is_empty() {
        output.print("");
    }
    if all || args.build_systems {
        output.header("Build systems");
        for system in BuildSystem::ALL {
            println!("{system}");
        }
    }
    Ok(())
}
