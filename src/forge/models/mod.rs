//! Provider-agnostic entities returned by every adapter.
//!
//! These are value projections of heterogeneous upstream JSON. Each adapter
//! owns private `Api*` deserialisation targets and converts them into the
//! types below; nothing here is cached or merged across calls.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::provider::Provider;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Length of the abbreviated commit hash shown to users.
pub const SHORT_SHA_LEN: usize = 7;

/// Repository identity as reported by the provider.
///
/// Gitea repositories are identified by their `owner/name` path, GitLab
/// projects by their numeric id. Serialises untagged so JSON consumers see a
/// string or a number respectively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RepoId {
    /// Gitea `owner/name` path.
    Gitea(String),
    /// GitLab project id.
    GitLab(u64),
}

impl RepoId {
    /// Returns an identifier usable for follow-up calls on the same adapter.
    #[must_use]
    pub fn to_ref(&self) -> RepoRef {
        match self {
            Self::Gitea(path) => RepoRef::Path(path.clone()),
            Self::GitLab(id) => RepoRef::Id(*id),
        }
    }

    /// Returns the provider this identifier belongs to.
    #[must_use]
    pub const fn provider(&self) -> Provider {
        match self {
            Self::Gitea(_) => Provider::Gitea,
            Self::GitLab(_) => Provider::GitLab,
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gitea(path) => formatter.write_str(path),
            Self::GitLab(id) => write!(formatter, "{id}"),
        }
    }
}

/// Caller-supplied repository identifier.
///
/// Passed through to the provider as received; adapters take care of URL
/// escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepoRef {
    /// Numeric repository or project id.
    Id(u64),
    /// `owner/name` (or GitLab `group/subgroup/project`) path.
    Path(String),
}

impl RepoRef {
    /// Builds a path reference from owner and repository name.
    #[must_use]
    pub fn from_owner_repo(owner: &str, name: &str) -> Self {
        Self::Path(format!("{owner}/{name}"))
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(formatter, "{id}"),
            Self::Path(path) => formatter.write_str(path),
        }
    }
}

impl From<u64> for RepoRef {
    fn from(value: u64) -> Self {
        Self::Id(value)
    }
}

/// Error returned when a repository identifier string is empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("repository identifier must be a numeric id or an owner/name path")]
pub struct InvalidRepoRef;

impl FromStr for RepoRef {
    type Err = InvalidRepoRef;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Err(InvalidRepoRef);
        }
        if trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            return trimmed.parse().map(Self::Id).map_err(|_| InvalidRepoRef);
        }
        Ok(Self::Path(trimmed.to_owned()))
    }
}

/// Normalised repository visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to members only.
    Private,
    /// Visible to any authenticated user of the instance.
    Internal,
    /// Visible to everyone.
    Public,
}

impl Visibility {
    /// Folds boolean `private`/`internal` flags into a visibility.
    ///
    /// `private` takes precedence over `internal`.
    #[must_use]
    pub const fn from_flags(private: bool, internal: bool) -> Self {
        if private {
            Self::Private
        } else if internal {
            Self::Internal
        } else {
            Self::Public
        }
    }

    /// Returns the lowercase wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Internal => "internal",
            Self::Public => "public",
        }
    }
}

/// Normalised user identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GitUser {
    /// Provider-local numeric user id.
    pub id: u64,
    /// Login name.
    pub username: String,
    /// Display name, when set.
    pub name: Option<String>,
    /// Public e-mail address, when visible.
    pub email: Option<String>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Profile page URL.
    pub web_url: Option<String>,
}

/// Outcome of a token validation. Invalid credentials are a value here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Whether the token authenticated successfully.
    pub valid: bool,
    /// The authenticated user on success.
    pub user: Option<GitUser>,
    /// Human-readable failure reason.
    pub error: Option<String>,
    /// Backend that was asked.
    pub provider: Provider,
}

impl ValidationResult {
    /// Builds a successful result.
    #[must_use]
    pub const fn success(provider: Provider, user: GitUser) -> Self {
        Self {
            valid: true,
            user: Some(user),
            error: None,
            provider,
        }
    }

    /// Builds a failed result.
    #[must_use]
    pub fn failure(provider: Provider, error: impl Into<String>) -> Self {
        Self {
            valid: false,
            user: None,
            error: Some(error.into()),
            provider,
        }
    }
}

/// Normalised repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Repository {
    /// Provider-native identity.
    pub id: RepoId,
    /// Short repository name.
    pub name: String,
    /// `owner/name` path.
    pub full_name: String,
    /// Free-form description; `None` when empty.
    pub description: Option<String>,
    /// Name of the default branch.
    pub default_branch: String,
    /// Normalised visibility.
    pub visibility: Visibility,
    /// Browser URL.
    pub web_url: String,
    /// HTTP(S) clone URL.
    pub clone_url: String,
    /// SSH clone URL.
    pub ssh_url: String,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update or activity timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Star count.
    pub stars: u64,
    /// Fork count.
    pub forks: u64,
    /// Open issue count.
    pub open_issues: u64,
    /// Owning user, when reported.
    pub owner: Option<GitUser>,
    /// Untouched provider payload, populated only when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

/// Identity and timestamp attached to a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Signature {
    /// Display name.
    pub name: String,
    /// E-mail address.
    pub email: String,
    /// Authored or committed timestamp.
    pub date: Option<DateTime<Utc>>,
}

/// Line-level diff statistics for a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitStats {
    /// Lines added.
    pub additions: u64,
    /// Lines removed.
    pub deletions: u64,
    /// Lines changed in total.
    pub total: u64,
}

/// Normalised commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// Full hash.
    pub sha: String,
    /// Abbreviated hash.
    pub short_sha: String,
    /// Full commit message.
    pub message: String,
    /// First line of the message.
    pub title: String,
    /// Author identity.
    pub author: Signature,
    /// Committer identity; may differ from the author.
    pub committer: Signature,
    /// Parent hashes.
    pub parent_shas: Vec<String>,
    /// Browser URL.
    pub web_url: Option<String>,
    /// Diff statistics, only present when explicitly requested.
    pub stats: Option<CommitStats>,
}

/// Normalised branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    /// Branch name.
    pub name: String,
    /// Whether this is the owning repository's default branch.
    pub is_default: bool,
    /// Whether the branch is protected.
    pub is_protected: bool,
    /// Tip commit hash.
    pub commit_sha: String,
    /// Tip commit message.
    pub commit_message: String,
    /// Tip commit author name.
    pub commit_author: Option<String>,
    /// Tip commit timestamp.
    pub commit_date: Option<DateTime<Utc>>,
}

/// Normalised pull/merge request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    /// Open for review.
    Open,
    /// Closed without merging.
    Closed,
    /// Merged into the target branch.
    Merged,
}

impl PullRequestState {
    /// Returns the lowercase wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Merged => "merged",
        }
    }
}

/// Diff statistics for a pull request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PullRequestStats {
    /// Lines added.
    pub additions: u64,
    /// Lines removed.
    pub deletions: u64,
    /// Files touched.
    pub changed_files: u64,
}

/// Normalised pull request (GitLab: merge request).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    /// Global numeric id.
    pub id: u64,
    /// Repository-local number (Gitea `number`, GitLab `iid`).
    pub number: u64,
    /// Title.
    pub title: String,
    /// Description body.
    pub description: Option<String>,
    /// Normalised state.
    pub state: PullRequestState,
    /// Branch the changes come from.
    pub source_branch: String,
    /// Branch the changes merge into.
    pub target_branch: String,
    /// Author, when reported.
    pub author: Option<GitUser>,
    /// Browser URL.
    pub web_url: String,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Merge timestamp.
    pub merged_at: Option<DateTime<Utc>>,
    /// Close timestamp.
    pub closed_at: Option<DateTime<Utc>>,
    /// Label names.
    pub labels: Vec<String>,
    /// Diff statistics, when the provider reports them.
    pub stats: Option<PullRequestStats>,
}

/// Returns the abbreviated form of a commit hash.
#[must_use]
pub fn short_sha(sha: &str) -> String {
    sha.chars().take(SHORT_SHA_LEN).collect()
}

/// Returns the first line of a commit message.
#[must_use]
pub fn message_title(message: &str) -> String {
    message.lines().next().unwrap_or_default().trim_end().to_owned()
}

/// Maps blank strings to `None`.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
