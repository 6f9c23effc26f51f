//! Configuration loaded from CLI, environment, and files.
//!
//! [`ForgeConfig`] merges values from command-line arguments, environment
//! variables, and configuration files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Values are loaded with the following precedence (lowest to highest):
//!
//! 1. **Defaults**: built-in application defaults
//! 2. **Configuration file**: `.forgelink.toml` in the current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables**: `FORGELINK_PROVIDER`, `FORGELINK_TOKEN`, and
//!    so on, plus the legacy `GITEA_TOKEN` / `GITLAB_TOKEN` for tokens
//! 4. **Command-line arguments**: `--provider`/`-p`, `--token`/`-t`, ...
//!
//! # Configuration File
//!
//! ```toml
//! provider = "gitlab"
//! base_url = "https://gitlab.example.com"
//! token = "glpat-example"
//! timeout_ms = 10000
//! repo = "group/project"
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::forge::{GitServiceError, Provider, ProviderConfig, RepoRef};

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `FORGELINK_PROVIDER` or `--provider`: `gitea` or `gitlab`
/// - `FORGELINK_BASE_URL` or `--base-url`: server root URL
/// - `FORGELINK_TOKEN`, `GITEA_TOKEN`/`GITLAB_TOKEN`, or `--token`
/// - `FORGELINK_TIMEOUT_MS` or `--timeout-ms`: request timeout
/// - `FORGELINK_PROXY_URL` or `--proxy-url`: GitLab proxy endpoint
/// - `FORGELINK_REPO` or `--repo`: repository to inspect
///
/// # Example
///
/// ```no_run
/// use forgelink::ForgeConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = ForgeConfig::load().expect("failed to load configuration");
/// let provider_config = config.provider_config().expect("incomplete configuration");
/// let service = forgelink::forge::connect(&provider_config).expect("unusable configuration");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "FORGELINK",
    discovery(
        dotfile_name = ".forgelink.toml",
        config_file_name = "forgelink.toml",
        app_name = "forgelink"
    )
)]
pub struct ForgeConfig {
    /// Git hosting provider: `gitea` (or `forgejo`) or `gitlab`.
    ///
    /// Can be provided via:
    /// - CLI: `--provider <NAME>` or `-p <NAME>`
    /// - Environment: `FORGELINK_PROVIDER`
    /// - Config file: `provider = "..."`
    #[ortho_config(cli_short = 'p')]
    pub provider: Option<String>,

    /// Server root URL, for example `https://gitea.example.com`.
    ///
    /// Can be provided via:
    /// - CLI: `--base-url <URL>` or `-b <URL>`
    /// - Environment: `FORGELINK_BASE_URL`
    /// - Config file: `base_url = "..."`
    #[ortho_config(cli_short = 'b')]
    pub base_url: Option<String>,

    /// Personal access token.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `FORGELINK_TOKEN`, or `GITEA_TOKEN` / `GITLAB_TOKEN`
    ///   depending on the provider (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Per-request timeout in milliseconds. Defaults to 30 seconds; zero is
    /// rejected.
    #[ortho_config()]
    pub timeout_ms: u64,

    /// GitLab proxy endpoint that injects credentials on our behalf.
    ///
    /// When set, no token header is sent and `/api/v4` is appended to the
    /// proxy URL instead of `base_url`.
    #[ortho_config()]
    pub proxy_url: Option<String>,

    /// Accepts self-signed TLS certificates.
    ///
    /// Note: `ortho_config` does not load boolean values from the
    /// environment, so use the CLI flag or the config file.
    #[ortho_config()]
    pub accept_invalid_certs: bool,

    /// Repository to inspect, as `owner/name` or a numeric id.
    ///
    /// Can be provided via:
    /// - CLI: `--repo <REPO>` or `-r <REPO>`
    /// - Environment: `FORGELINK_REPO`
    /// - Config file: `repo = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Page size for listings (1-100).
    #[ortho_config()]
    pub per_page: Option<u8>,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            provider: None,
            base_url: None,
            token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            proxy_url: None,
            accept_invalid_certs: false,
            repo: None,
            per_page: None,
        }
    }
}

/// Legacy environment variable holding the token for `provider`.
#[must_use]
pub const fn legacy_token_var(provider: Provider) -> &'static str {
    match provider {
        Provider::Gitea => "GITEA_TOKEN",
        Provider::GitLab => "GITLAB_TOKEN",
    }
}

impl ForgeConfig {
    /// Parses the configured provider.
    ///
    /// # Errors
    ///
    /// Returns [`GitServiceError::Configuration`] when no provider is set or
    /// the name is not recognised.
    pub fn provider(&self) -> Result<Provider, GitServiceError> {
        let name = self
            .provider
            .as_deref()
            .ok_or_else(|| GitServiceError::Configuration {
                message: "git provider is required (use --provider or -p)".to_owned(),
            })?;
        name.parse::<Provider>()
            .map_err(|error| GitServiceError::Configuration {
                message: error.to_string(),
            })
    }

    /// Returns the base URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`GitServiceError::Configuration`] when no base URL is set.
    pub fn require_base_url(&self) -> Result<&str, GitServiceError> {
        self.base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| GitServiceError::Configuration {
                message: "server base URL is required (use --base-url or -b)".to_owned(),
            })
    }

    /// Resolves the token from configuration or the provider's legacy
    /// environment variable (`GITEA_TOKEN` or `GITLAB_TOKEN`).
    ///
    /// Returns `None` when no source provides a value. A GitLab proxy does
    /// not need one; every other setup is rejected later by
    /// [`connect`](crate::forge::connect).
    #[must_use]
    pub fn resolve_token(&self, provider: Provider) -> Option<String> {
        self.token
            .clone()
            .or_else(|| env::var(legacy_token_var(provider)).ok())
    }

    /// Configured request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parses the configured repository, if any.
    ///
    /// # Errors
    ///
    /// Returns [`GitServiceError::Configuration`] when the value is blank.
    pub fn repo_ref(&self) -> Result<Option<RepoRef>, GitServiceError> {
        self.repo
            .as_deref()
            .map(|raw| {
                raw.parse::<RepoRef>()
                    .map_err(|error| GitServiceError::Configuration {
                        message: format!("invalid repository `{raw}`: {error}"),
                    })
            })
            .transpose()
    }

    /// Builds the adapter description consumed by
    /// [`connect`](crate::forge::connect).
    ///
    /// # Errors
    ///
    /// Returns [`GitServiceError::Configuration`] when the provider or base
    /// URL is missing or invalid, or when `timeout_ms` is zero.
    pub fn provider_config(&self) -> Result<ProviderConfig, GitServiceError> {
        let provider = self.provider()?;
        if self.timeout_ms == 0 {
            return Err(GitServiceError::Configuration {
                message: "timeout_ms must be greater than zero".to_owned(),
            });
        }
        let mut config = ProviderConfig::new(
            provider,
            self.require_base_url()?,
            self.resolve_token(provider),
        );
        config.timeout = self.timeout();
        config.proxy_endpoint.clone_from(&self.proxy_url);
        config.accept_invalid_certs = self.accept_invalid_certs;
        Ok(config)
    }
}

#[cfg(test)]
mod tests;
