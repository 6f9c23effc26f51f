//! Forgelink CLI entrypoint.
//!
//! Loads layered configuration, connects to the configured Gitea or GitLab
//! server, and prints a short read-only report.

use std::io::{self, Write};
use std::process::ExitCode;

use forgelink::{ForgeConfig, GitServiceError};
use ortho_config::OrthoConfig;

mod cli;

use cli::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), CliError> {
    let config = load_config()?;
    cli::run(&config).await
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`GitServiceError::Configuration`] when ortho-config fails to
/// parse arguments or load configuration files.
fn load_config() -> Result<ForgeConfig, GitServiceError> {
    ForgeConfig::load().map_err(|error| GitServiceError::Configuration {
        message: error.to_string(),
    })
}
