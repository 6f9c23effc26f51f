//! Request options accepted by [`GitService`](super::GitService) operations.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::models::Visibility;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Adapter construction options shared by both providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Upper bound for one request, including reading the body.
    pub timeout: Duration,
    /// Accept self-signed or otherwise invalid TLS certificates.
    pub accept_invalid_certs: bool,
    /// Keep the untouched provider payload on returned repositories.
    pub keep_raw_payloads: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
            keep_raw_payloads: false,
        }
    }
}

/// Field used to order repository listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoOrder {
    /// Creation time.
    Created,
    /// Last update or activity time.
    Updated,
    /// Repository name.
    Name,
}

/// Sort direction for ordered listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl SortDirection {
    /// Returns the query parameter value shared by both providers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Options for listing repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListReposOptions {
    /// Page number (1-based). Defaults to 1.
    pub page: Option<u32>,
    /// Items per page (max 100). Defaults to 30.
    pub per_page: Option<u8>,
    /// Free-text filter on repository names.
    ///
    /// Gitea applies it to owned listings after fetching, so a page may
    /// hold fewer than `per_page` matches.
    pub search: Option<String>,
    /// Restrict to repositories owned by the authenticated user.
    pub owned: bool,
    /// Ordering field; provider default when `None`.
    ///
    /// Gitea's owned listing has no server-side ordering, so there the
    /// order only holds within the returned page, not across pages.
    pub order_by: Option<RepoOrder>,
    /// Ordering direction; only used together with `order_by`.
    pub sort: Option<SortDirection>,
}

/// Options for creating a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRepoOptions {
    /// Repository name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Requested visibility. Gitea stores anything but public as private.
    pub visibility: Visibility,
    /// Create an initial commit with a README.
    pub auto_init: bool,
    /// Name of the initial branch.
    pub default_branch: Option<String>,
    /// Owning organisation (Gitea) or numeric namespace id (GitLab).
    pub namespace: Option<String>,
}

impl CreateRepoOptions {
    /// Creates options for a private, uninitialised repository.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            visibility: Visibility::Private,
            auto_init: false,
            default_branch: None,
            namespace: None,
        }
    }
}

/// Options for listing branches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListBranchesOptions {
    /// Page number (1-based). Defaults to 1.
    pub page: Option<u32>,
    /// Items per page (max 100). Defaults to 30.
    pub per_page: Option<u8>,
}

/// Options for listing commits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCommitsOptions {
    /// Branch, tag, or sha to list history from.
    pub ref_name: Option<String>,
    /// Only commits touching this path.
    pub path: Option<String>,
    /// Only commits after this instant.
    pub since: Option<DateTime<Utc>>,
    /// Only commits before this instant.
    pub until: Option<DateTime<Utc>>,
    /// Include per-commit diff statistics.
    pub with_stats: bool,
    /// Page number (1-based). Defaults to 1.
    pub page: Option<u32>,
    /// Items per page (max 100). Defaults to 30.
    pub per_page: Option<u8>,
}

/// State filter for pull request listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PullRequestStateFilter {
    /// Only open pull requests.
    #[default]
    Open,
    /// Only pull requests closed without merging.
    Closed,
    /// Only merged pull requests.
    Merged,
    /// Every pull request regardless of state.
    All,
}

/// Options for listing pull requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListPullRequestsOptions {
    /// State filter. Defaults to open.
    pub state: PullRequestStateFilter,
    /// Page number (1-based). Defaults to 1.
    pub page: Option<u32>,
    /// Items per page (max 100). Defaults to 30.
    pub per_page: Option<u8>,
}
