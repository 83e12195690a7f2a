// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dogrun - dog-park booking platform service.
//!
//! Binary entry point: loads configuration, then dispatches to the
//! `serve` or `status` subcommand.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;
mod status;

/// Dogrun - dog-park booking platform service.
#[derive(Parser, Debug)]
#[command(name = "dogrun", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the dogrun service.
    Serve,
    /// Show whether a running service is healthy.
    Status {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match dogrun_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            dogrun_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Status { json }) => status::run_status(&config, json).await,
        None => {
            println!("dogrun: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("dogrun: {e}");
        std::process::exit(1);
    }
}
