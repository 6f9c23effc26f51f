//! Construction-time provider selection.
//!
//! Callers describe the backend once with [`ProviderConfig`] and receive a
//! boxed [`GitService`]. There is no fallback between providers and no
//! process-wide instance.

use std::time::Duration;

use super::error::GitServiceError;
use super::gitea::GiteaService;
use super::gitlab::{GitLabAuth, GitLabService};
use super::options::{ClientOptions, DEFAULT_TIMEOUT};
use super::provider::Provider;
use super::service::GitService;
use super::token::PersonalAccessToken;

/// Everything needed to build one adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Backend to talk to.
    pub provider: Provider,
    /// Server root, for example `https://gitea.example.com`.
    pub base_url: String,
    /// Personal access token. Optional only for GitLab behind a proxy.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// GitLab only: route API calls through this proxy instead of sending
    /// the token directly.
    pub proxy_endpoint: Option<String>,
    /// Accept invalid TLS certificates.
    pub accept_invalid_certs: bool,
    /// Keep raw provider payloads on returned repositories.
    pub keep_raw_payloads: bool,
}

impl ProviderConfig {
    /// Creates a config with default timeout and flags.
    #[must_use]
    pub fn new(provider: Provider, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            provider,
            base_url: base_url.into(),
            token,
            timeout: DEFAULT_TIMEOUT,
            proxy_endpoint: None,
            accept_invalid_certs: false,
            keep_raw_payloads: false,
        }
    }

    const fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: self.timeout,
            accept_invalid_certs: self.accept_invalid_certs,
            keep_raw_payloads: self.keep_raw_payloads,
        }
    }

    fn require_token(&self) -> Result<PersonalAccessToken, GitServiceError> {
        PersonalAccessToken::new(self.token.as_deref().unwrap_or_default()).map_err(|_| {
            GitServiceError::Configuration {
                message: format!("{} requires a personal access token", self.provider),
            }
        })
    }
}

/// Builds the adapter described by `config`.
///
/// # Errors
///
/// Returns [`GitServiceError::Configuration`] when the token is missing, the
/// proxy endpoint is set for Gitea, or a URL is unusable.
pub fn connect(config: &ProviderConfig) -> Result<Box<dyn GitService>, GitServiceError> {
    let options = config.client_options();
    tracing::debug!(
        provider = %config.provider,
        base_url = %config.base_url,
        proxied = config.proxy_endpoint.is_some(),
        "connecting to git provider"
    );
    match config.provider {
        Provider::Gitea => {
            if config.proxy_endpoint.is_some() {
                return Err(GitServiceError::Configuration {
                    message: "proxy endpoints are only supported for GitLab".to_owned(),
                });
            }
            let token = config.require_token()?;
            Ok(Box::new(GiteaService::new(&config.base_url, &token, options)?))
        }
        Provider::GitLab => {
            let auth = match &config.proxy_endpoint {
                Some(endpoint) => GitLabAuth::Proxy {
                    endpoint: endpoint.clone(),
                },
                None => GitLabAuth::Direct(config.require_token()?),
            };
            Ok(Box::new(GitLabService::new(&config.base_url, auth, options)?))
        }
    }
}
