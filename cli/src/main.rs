#![deny(missing_docs)]

//! # Sensorhub CLI
//!
//! Offline tooling for the sensorhub payload pipeline.
//!
//! Supported Commands:
//! - `check`: Compiles every built-in schema and lists the resources.
//! - `validate`: Runs a payload file through decoding and validation and
//!   prints the reply the server would render.

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sensorhub_core::Pipeline;
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod check;
mod error;
mod validate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Sensorhub payload tooling")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile the built-in JSON and XML Schemas.
    Check,
    /// Validate a payload file as a create request would.
    Validate(validate::ValidateArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> CliResult<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Commands::Check => {
            check::execute(&mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate(args) => {
            let pipeline = Pipeline::builtin()?;
            let rendered = validate::execute(args, &pipeline, &mut stdout)?;
            if (200..300).contains(&rendered.status) {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from([
            "sensorhub",
            "validate",
            "--resource",
            "sensor",
            "--content-type",
            "application/xml",
            "payload.xml",
        ])
        .unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.resource, "sensor");
        assert_eq!(args.accept, None);
        assert_eq!(args.file, std::path::PathBuf::from("payload.xml"));
    }
}
