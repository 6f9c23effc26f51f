//! GitLab v4 wire models and their normalisation into shared entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::forge::models::{
    Branch, Commit, CommitStats, GitUser, PullRequest, PullRequestState, RepoId, Repository,
    Signature, Visibility, message_title, non_empty, short_sha,
};

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) id: u64,
    pub(super) username: String,
    pub(super) name: Option<String>,
    /// Only present for the authenticated user or for admins.
    pub(super) email: Option<String>,
    pub(super) public_email: Option<String>,
    pub(super) avatar_url: Option<String>,
    pub(super) web_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum ApiVisibility {
    Private,
    Internal,
    Public,
}

impl From<ApiVisibility> for Visibility {
    fn from(value: ApiVisibility) -> Self {
        match value {
            ApiVisibility::Private => Self::Private,
            ApiVisibility::Internal => Self::Internal,
            ApiVisibility::Public => Self::Public,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiProject {
    pub(super) id: u64,
    pub(super) name: String,
    pub(super) path_with_namespace: String,
    pub(super) description: Option<String>,
    /// Absent for empty repositories.
    pub(super) default_branch: Option<String>,
    pub(super) visibility: ApiVisibility,
    pub(super) web_url: String,
    #[serde(default)]
    pub(super) http_url_to_repo: String,
    #[serde(default)]
    pub(super) ssh_url_to_repo: String,
    pub(super) created_at: Option<DateTime<Utc>>,
    pub(super) last_activity_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(super) star_count: u64,
    #[serde(default)]
    pub(super) forks_count: u64,
    /// Omitted when the issue tracker is disabled.
    pub(super) open_issues_count: Option<u64>,
    pub(super) owner: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiBranch {
    pub(super) name: String,
    #[serde(default)]
    pub(super) protected: bool,
    pub(super) commit: ApiCommit,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommit {
    pub(super) id: String,
    #[serde(default)]
    pub(super) message: String,
    #[serde(default)]
    pub(super) title: String,
    #[serde(default)]
    pub(super) author_name: String,
    #[serde(default)]
    pub(super) author_email: String,
    pub(super) authored_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(super) committer_name: String,
    #[serde(default)]
    pub(super) committer_email: String,
    pub(super) committed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(super) parent_ids: Vec<String>,
    pub(super) web_url: Option<String>,
    pub(super) stats: Option<ApiCommitStats>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(super) struct ApiCommitStats {
    pub(super) additions: u64,
    pub(super) deletions: u64,
    pub(super) total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum ApiMergeRequestState {
    Opened,
    Closed,
    Merged,
    Locked,
}

impl From<ApiMergeRequestState> for PullRequestState {
    fn from(value: ApiMergeRequestState) -> Self {
        match value {
            ApiMergeRequestState::Opened | ApiMergeRequestState::Locked => Self::Open,
            ApiMergeRequestState::Closed => Self::Closed,
            ApiMergeRequestState::Merged => Self::Merged,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiMergeRequest {
    pub(super) id: u64,
    pub(super) iid: u64,
    pub(super) title: String,
    pub(super) description: Option<String>,
    pub(super) state: ApiMergeRequestState,
    pub(super) author: Option<ApiUser>,
    pub(super) source_branch: String,
    pub(super) target_branch: String,
    pub(super) web_url: String,
    pub(super) created_at: Option<DateTime<Utc>>,
    pub(super) updated_at: Option<DateTime<Utc>>,
    pub(super) merged_at: Option<DateTime<Utc>>,
    pub(super) closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(super) labels: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ApiCreateProject<'a> {
    pub(super) name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) description: Option<&'a str>,
    pub(super) visibility: &'static str,
    pub(super) initialize_with_readme: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) default_branch: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) namespace_id: Option<u64>,
}

impl From<ApiUser> for GitUser {
    fn from(value: ApiUser) -> Self {
        Self {
            id: value.id,
            username: value.username,
            name: non_empty(value.name),
            email: non_empty(value.email).or_else(|| non_empty(value.public_email)),
            avatar_url: non_empty(value.avatar_url),
            web_url: non_empty(value.web_url),
        }
    }
}

impl ApiProject {
    pub(super) fn into_repository(self, raw: Option<Value>) -> Repository {
        Repository {
            id: RepoId::GitLab(self.id),
            name: self.name,
            full_name: self.path_with_namespace,
            description: non_empty(self.description),
            default_branch: self.default_branch.unwrap_or_default(),
            visibility: self.visibility.into(),
            web_url: self.web_url,
            clone_url: self.http_url_to_repo,
            ssh_url: self.ssh_url_to_repo,
            created_at: self.created_at,
            updated_at: self.last_activity_at,
            stars: self.star_count,
            forks: self.forks_count,
            open_issues: self.open_issues_count.unwrap_or_default(),
            owner: self.owner.map(GitUser::from),
            raw,
        }
    }
}

impl ApiBranch {
    /// GitLab's own `default` flag is ignored in favour of the project's
    /// `default_branch`, so both adapters derive the flag the same way.
    pub(super) fn into_branch(self, default_branch: &str) -> Branch {
        Branch {
            is_default: self.name == default_branch,
            name: self.name,
            is_protected: self.protected,
            commit_author: non_empty(Some(self.commit.author_name)),
            commit_date: self.commit.committed_date,
            commit_sha: self.commit.id,
            commit_message: self.commit.message,
        }
    }
}

impl ApiCommit {
    pub(super) fn into_commit(self, with_stats: bool) -> Commit {
        let stats = self.stats.filter(|_| with_stats).map(|stats| CommitStats {
            additions: stats.additions,
            deletions: stats.deletions,
            total: stats.total,
        });
        let title = if self.title.is_empty() {
            message_title(&self.message)
        } else {
            self.title
        };
        Commit {
            short_sha: short_sha(&self.id),
            sha: self.id,
            title,
            message: self.message,
            author: Signature {
                name: self.author_name,
                email: self.author_email,
                date: self.authored_date,
            },
            committer: Signature {
                name: self.committer_name,
                email: self.committer_email,
                date: self.committed_date,
            },
            parent_shas: self.parent_ids,
            web_url: non_empty(self.web_url),
            stats,
        }
    }
}

impl From<ApiMergeRequest> for PullRequest {
    fn from(value: ApiMergeRequest) -> Self {
        Self {
            id: value.id,
            number: value.iid,
            title: value.title,
            description: non_empty(value.description),
            state: value.state.into(),
            source_branch: value.source_branch,
            target_branch: value.target_branch,
            author: value.author.map(GitUser::from),
            web_url: value.web_url,
            created_at: value.created_at,
            updated_at: value.updated_at,
            merged_at: value.merged_at,
            closed_at: value.closed_at,
            labels: value.labels,
            stats: None,
        }
    }
}
