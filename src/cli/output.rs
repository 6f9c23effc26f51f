//! Plain-text rendering of command results.

use std::io::{self, Write};

use forgelink::forge::models::short_sha;
use forgelink::forge::{Branch, GitService, GitUser, Provider, Repository};

use super::CliError;

/// Writes the authenticated user line.
pub fn write_user<W: Write>(
    writer: &mut W,
    provider: Provider,
    user: &GitUser,
) -> Result<(), CliError> {
    let name = user.name.as_deref().unwrap_or(&user.username);
    writeln!(writer, "Authenticated to {provider} as {name} (@{})", user.username)
        .map_err(|e| io_error(&e))
}

/// Writes one line per repository.
pub fn write_repository_listing<W: Write>(
    writer: &mut W,
    repositories: &[Repository],
) -> Result<(), CliError> {
    writeln!(writer).map_err(|e| io_error(&e))?;
    if repositories.is_empty() {
        return writeln!(writer, "No repositories found.").map_err(|e| io_error(&e));
    }

    writeln!(writer, "Repositories:").map_err(|e| io_error(&e))?;
    for repo in repositories {
        let description = repo.description.as_deref().unwrap_or("(no description)");
        writeln!(
            writer,
            "  {} [{}] {description}",
            repo.full_name,
            repo.visibility.as_str()
        )
        .map_err(|e| io_error(&e))?;
    }
    writeln!(writer, "({} shown)", repositories.len()).map_err(|e| io_error(&e))
}

/// Writes a repository header followed by its branches.
pub fn write_repository<W: Write>(
    writer: &mut W,
    service: &dyn GitService,
    repo: &Repository,
    branches: &[Branch],
) -> Result<(), CliError> {
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "{} [{}] default branch: {}",
        repo.full_name,
        repo.visibility.as_str(),
        repo.default_branch
    )
    .map_err(|e| io_error(&e))?;
    writeln!(writer, "URL: {}", service.repo_url(&repo.full_name)).map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "Stars: {}  Forks: {}  Open issues: {}",
        repo.stars, repo.forks, repo.open_issues
    )
    .map_err(|e| io_error(&e))?;

    writeln!(writer, "Branches:").map_err(|e| io_error(&e))?;
    for branch in branches {
        let marker = if branch.is_default { "*" } else { " " };
        let protection = if branch.is_protected { " (protected)" } else { "" };
        let sha = short_sha(&branch.commit_sha);
        writeln!(writer, "  {marker} {}{protection} {sha}", branch.name)
            .map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Converts an I/O error to a [`CliError::Io`].
pub(crate) fn io_error(error: &io::Error) -> CliError {
    CliError::Io {
        message: error.to_string(),
    }
}
