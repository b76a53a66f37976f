//! Resource OpenAPI Reader - command-line front-end.
//!
//! # Usage
//!
//! ```bash
//! resource-openapi-reader [OPTIONS] <FILES>...
//! ```
//!
//! # Examples
//!
//! Print YAML for two resource files:
//! ```bash
//! resource-openapi-reader src/pets.rs src/users.rs
//! ```
//!
//! Print JSON and fail on any broken operation:
//! ```bash
//! resource-openapi-reader src/pets.rs -f json --strict
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use resource_openapi_reader::cli;

fn main() -> Result<()> {
    // Parse first so --verbose can pick the log level
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Resource OpenAPI Reader starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)
}
