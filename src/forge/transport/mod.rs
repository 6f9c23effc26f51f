//! Shared HTTP plumbing for the provider adapters.
//!
//! The transport owns the reqwest client, the API base URL, and the request
//! timeout. Each call runs inside its own `tokio::time::timeout` scope that
//! covers both sending the request and reading the body, so an expired
//! deadline drops the in-flight request and surfaces as
//! [`GitServiceError::Timeout`].

mod error_mapping;
mod http_utils;

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use http::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use http::{Method, StatusCode};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::error::GitServiceError;
use super::provider::Provider;

use error_mapping::{map_decode_error, map_http_error, map_transport_error};

/// Query parameters appended to a request.
pub(crate) type Query = Vec<(&'static str, String)>;

/// Construction settings for [`Transport`].
pub(crate) struct TransportSettings {
    pub(crate) provider: Provider,
    pub(crate) api_base: Url,
    pub(crate) auth_header: Option<(HeaderName, String)>,
    pub(crate) timeout: Duration,
    pub(crate) accept_invalid_certs: bool,
}

/// Parses a server base URL such as `https://git.example.com/gitea/`.
pub(crate) fn parse_base_url(provider: Provider, raw: &str) -> Result<Url, GitServiceError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|error| GitServiceError::Configuration {
        message: format!("{provider} base URL `{trimmed}` is invalid: {error}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(GitServiceError::Configuration {
            message: format!("{provider} base URL must use http or https: {trimmed}"),
        });
    }
    Ok(url)
}

/// Appends the API prefix (for example `api/v4`) to a server base URL.
pub(crate) fn api_base(
    provider: Provider,
    base: &Url,
    prefix: &[&str],
) -> Result<Url, GitServiceError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| GitServiceError::Configuration {
            message: format!("{provider} base URL cannot carry a path: {base}"),
        })?
        .pop_if_empty()
        .extend(prefix);
    Ok(url)
}

/// Formats a timestamp the way both providers accept in query strings.
pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Browser URL prefix without a trailing slash.
pub(crate) fn web_base(base: &Url) -> String {
    base.as_str().trim_end_matches('/').to_owned()
}

/// Authenticated JSON client bound to one provider API base.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    client: Client,
    provider: Provider,
    api_base: Url,
    timeout: Duration,
}

impl Transport {
    /// Builds the reqwest client with default headers.
    pub(crate) fn new(settings: TransportSettings) -> Result<Self, GitServiceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("forgelink/", env!("CARGO_PKG_VERSION"))),
        );
        if let Some((name, value)) = settings.auth_header {
            let mut header_value =
                HeaderValue::from_str(&value).map_err(|error| GitServiceError::Configuration {
                    message: format!("token is not a valid header value: {error}"),
                })?;
            header_value.set_sensitive(true);
            headers.insert(name, header_value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .map_err(|error| GitServiceError::Configuration {
                message: format!("failed to configure {} HTTP client: {error}", settings.provider),
            })?;

        Ok(Self {
            client,
            provider: settings.provider,
            api_base: settings.api_base,
            timeout: settings.timeout,
        })
    }

    /// Builds an API URL from path segments, escaping each segment.
    ///
    /// A segment containing `/` is escaped as `%2F`, which is how GitLab
    /// expects namespaced project paths.
    pub(crate) fn endpoint<I, S>(&self, segments: I) -> Result<Url, GitServiceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| GitServiceError::Configuration {
                message: format!("{} API base cannot carry a path: {}", self.provider, self.api_base),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issues a GET and decodes the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: Url,
        query: &Query,
    ) -> Result<T, GitServiceError> {
        let body = self
            .execute(operation, self.request(Method::GET, url).query(query))
            .await?;
        self.decode(operation, &body)
    }

    /// Issues a POST with a JSON payload and decodes the JSON response.
    pub(crate) async fn post_json<B, T>(
        &self,
        operation: &str,
        url: Url,
        payload: &B,
    ) -> Result<T, GitServiceError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let body = self
            .execute(operation, self.request(Method::POST, url).json(payload))
            .await?;
        self.decode(operation, &body)
    }

    /// Issues a DELETE, discarding any response body.
    pub(crate) async fn delete(&self, operation: &str, url: Url) -> Result<(), GitServiceError> {
        self.execute(operation, self.request(Method::DELETE, url))
            .await
            .map(drop)
    }

    /// Decodes a JSON body into `T`.
    pub(crate) fn decode<T: DeserializeOwned>(
        &self,
        operation: &str,
        body: &str,
    ) -> Result<T, GitServiceError> {
        serde_json::from_str(body).map_err(|error| map_decode_error(self.provider, operation, &error))
    }

    /// Decodes a JSON value into `T`.
    pub(crate) fn decode_value<T: DeserializeOwned>(
        &self,
        operation: &str,
        value: serde_json::Value,
    ) -> Result<T, GitServiceError> {
        serde_json::from_value(value)
            .map_err(|error| map_decode_error(self.provider, operation, &error))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(provider = %self.provider, %method, path = url.path(), "sending request");
        self.client.request(method, url)
    }

    async fn execute(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<String, GitServiceError> {
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<(StatusCode, String), reqwest::Error>((status, body))
        };

        let (status, body) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| {
                tracing::debug!(provider = %self.provider, operation, "request timed out");
                GitServiceError::Timeout {
                    provider: self.provider,
                    timeout: self.timeout,
                }
            })?
            .map_err(|error| map_transport_error(self.provider, operation, self.timeout, &error))?;

        if status.is_success() {
            return Ok(body);
        }

        tracing::debug!(
            provider = %self.provider,
            operation,
            status = status.as_u16(),
            "request failed"
        );
        Err(map_http_error(self.provider, operation, status, &body))
    }
}
