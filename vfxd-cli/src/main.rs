//! # vfxd
//!
//! Non-interactive VerifiedX wallet CLI. Each invocation runs one command
//! and prints one JSON document on stdout; logs go to stderr.
//!
//! ```text
//! vfxd create-account --words 24
//! VFXD_MNEMONIC="..." vfxd restore --index 1
//! vfxd --network mainnet details R...
//! VFXD_PRIVATE_KEY=... vfxd send --to x... --amount 2.5
//! vfxd domain check alice.vfx
//! ```

#![forbid(unsafe_code)]

mod cli;
mod commands;
mod config;
mod logging;

use clap::Parser;
use serde_json::json;
use std::process::ExitCode;
use tracing::{debug, error};
use vfxd_error::VfxdError;

use crate::cli::VfxdCli;
use crate::config::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    // .env must be loaded before clap reads the environment.
    let dotenv = dotenvy::dotenv();

    let cli = VfxdCli::parse();
    logging::init_logging(
        logging::level_for_verbosity(cli.global.verbose),
        cli.global.log_format,
    );
    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }

    match run(cli).await {
        Ok(output) => {
            println!("{output:#}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "command failed");
            println!("{:#}", error_json(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: VfxdCli) -> anyhow::Result<serde_json::Value> {
    let settings = Settings::from_args(&cli.global)?;
    debug!(network = %settings.network, "resolved settings");
    commands::run(cli.command, settings.network, || settings.ledger()).await
}

fn error_json(err: &anyhow::Error) -> serde_json::Value {
    match err.downcast_ref::<VfxdError>() {
        Some(e) => json!({
            "error": {
                "kind": e.kind(),
                "code": e.code() as u32,
                "message": e.to_string(),
            }
        }),
        None => json!({ "error": { "message": format!("{err:#}") } }),
    }
}
