//! Incipit CLI binary.
//!
//! Startup sequence:
//!   1. Load `.env` (optional, silently skipped when absent)
//!   2. Parse arguments
//!   3. Initialize logging
//!   4. Load configuration
//!   5. Dispatch to the command
//!   6. Map errors to exit codes
//!
//! Exit codes:
//!   0 - success
//!   1 - internal error
//!   2 - user error (bad input, non-empty folder)
//!   3 - not found (unknown license, unknown variable)
//!   4 - configuration error

use clap::Parser;

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

use cli::{Cli, Commands};
use config::AppConfig;
use error::CliError;
use output::OutputManager;

fn main() {
    // 1. Environment file, before anything reads process env
    let _ = dotenvy::dotenv();

    // 2. Arguments
    let cli = Cli::parse();

    // 3. Logging
    logging::init_logging(cli.global.verbose, cli.global.quiet, cli.global.no_color);

    // 4. Configuration
    let config = match AppConfig::load(cli.global.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.global.no_color),
    };
    let no_color = cli.global.no_color || config.output.no_color;

    // 5. Dispatch
    let output = OutputManager::new(cli.global.quiet, no_color);
    let result = run(&cli.command, &config, &output);

    // 6. Exit
    if let Err(err) = result {
        handle_error(err, no_color)
    }
}

fn run(
    command: &Commands,
    config: &AppConfig,
    output: &OutputManager,
) -> Result<(), CliError> {
    match command {
        Commands::New(args) => commands::new::execute(args, config, output),
        Commands::List(args) => commands::list::execute(args, output),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

fn handle_error(err: CliError, no_color: bool) -> ! {
    err.log();
    if no_color {
        eprintln!("{}", err.format_plain());
    } else {
        eprintln!("{}", err.format_colored());
    }
    std::process::exit(err.exit_code());
}
