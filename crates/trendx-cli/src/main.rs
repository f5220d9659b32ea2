mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::Cli;
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(&cli) {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "trendx=debug,trendx_core=debug,warn"
    } else {
        "trendx=info,trendx_core=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let envelope = commands::run(cli)?;
    output::render(&envelope, cli.pretty)?;

    if cli.strict && (!envelope.meta.warnings.is_empty() || !envelope.errors.is_empty()) {
        return Err(CliError::StrictModeViolation {
            warning_count: envelope.meta.warnings.len(),
            error_count: envelope.errors.len(),
        });
    }

    Ok(())
}
