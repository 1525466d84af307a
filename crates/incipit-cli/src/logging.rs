//! Logging initialization via `tracing-subscriber`.
//!
//! Verbosity is driven by `-v` flags unless the user sets `RUST_LOG`,
//! which always wins.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any log statement.
pub fn init_logging(verbose: u8, quiet: bool, no_color: bool) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(spec) => EnvFilter::new(spec),
        Err(_) => {
            let level = derive_level(verbose, quiet);
            EnvFilter::new(format!(
                "incipit={level},incipit_core={level},incipit_adapters={level}"
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .init();
}

fn derive_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
