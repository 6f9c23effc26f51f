//! Read-only commands run by the `forgelink` binary.
//!
//! The binary validates the configured token first, then either lists the
//! caller's repositories or, when `repo` is configured, shows that
//! repository with its branches.

use std::io::{self, Write};

use forgelink::forge::{
    GitService, GitServiceError, ListBranchesOptions, ListReposOptions, RepoOrder, RepoRef,
    connect,
};
use forgelink::ForgeConfig;
use thiserror::Error;

pub mod output;

/// Errors surfaced to the terminal.
#[derive(Debug, Error)]
pub enum CliError {
    /// The provider call failed or the configuration was unusable.
    #[error(transparent)]
    Service(#[from] GitServiceError),

    /// The provider rejected the token.
    #[error("token validation failed: {message}")]
    InvalidToken {
        /// Reason reported by the provider.
        message: String,
    },

    /// Writing the report failed.
    #[error("failed to write output: {message}")]
    Io {
        /// Underlying I/O error message.
        message: String,
    },
}

/// Connects to the configured provider and writes the report to stdout.
///
/// # Errors
///
/// Returns [`CliError::Service`] for configuration or provider failures and
/// [`CliError::InvalidToken`] when the token does not authenticate.
pub async fn run(config: &ForgeConfig) -> Result<(), CliError> {
    let provider_config = config.provider_config()?;
    let service = connect(&provider_config)?;
    let mut stdout = io::stdout().lock();
    run_with_service(service.as_ref(), config, &mut stdout).await
}

/// Runs the report against an already constructed adapter.
///
/// Exposed so tests can point the command at a mock server.
pub async fn run_with_service<W: Write>(
    service: &dyn GitService,
    config: &ForgeConfig,
    writer: &mut W,
) -> Result<(), CliError> {
    let validation = service.validate_token().await;
    let Some(user) = validation.user.filter(|_| validation.valid) else {
        return Err(CliError::InvalidToken {
            message: validation
                .error
                .unwrap_or_else(|| "no user returned".to_owned()),
        });
    };
    output::write_user(writer, service.provider(), &user)?;

    match config.repo_ref()? {
        Some(repo) => show_repository(service, &repo, config, writer).await,
        None => list_repositories(service, config, writer).await,
    }
}

async fn show_repository<W: Write>(
    service: &dyn GitService,
    repo: &RepoRef,
    config: &ForgeConfig,
    writer: &mut W,
) -> Result<(), CliError> {
    let repository = service.get_repo(repo).await?;
    let branch_options = ListBranchesOptions {
        page: None,
        per_page: config.per_page,
    };
    let branches = service
        .list_branches(&repository.id.to_ref(), &branch_options)
        .await?;
    output::write_repository(writer, service, &repository, &branches)
}

async fn list_repositories<W: Write>(
    service: &dyn GitService,
    config: &ForgeConfig,
    writer: &mut W,
) -> Result<(), CliError> {
    let options = ListReposOptions {
        per_page: config.per_page,
        owned: true,
        order_by: Some(RepoOrder::Updated),
        ..ListReposOptions::default()
    };
    let repositories = service.list_repos(&options).await?;
    output::write_repository_listing(writer, &repositories)
}
