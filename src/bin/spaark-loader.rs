//! Spaark Loader CLI Binary
//!
//! Command-line interface for resolving, inspecting and validating Spaark units.

use clap::Parser;
use spaark_loader::logging::init_logging;
use spaark_loader::tooling::cli::{load_config, Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli.app_root, cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let logging = match cli.logging_config(&config.logging) {
        Ok(logging) => logging,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    let mut context = match CliContext::from_config(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error initializing loader: {}", e);
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
