//! Gitea wire models and their normalisation into shared entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::forge::models::{
    Branch, Commit, CommitStats, GitUser, PullRequest, PullRequestState, PullRequestStats, RepoId,
    Repository, Signature, Visibility, message_title, non_empty, short_sha,
};

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) id: u64,
    pub(super) login: String,
    pub(super) full_name: Option<String>,
    pub(super) email: Option<String>,
    pub(super) avatar_url: Option<String>,
    pub(super) html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) name: String,
    pub(super) full_name: String,
    pub(super) description: Option<String>,
    pub(super) default_branch: Option<String>,
    #[serde(default)]
    pub(super) private: bool,
    #[serde(default)]
    pub(super) internal: bool,
    pub(super) html_url: String,
    #[serde(default)]
    pub(super) clone_url: String,
    #[serde(default)]
    pub(super) ssh_url: String,
    pub(super) created_at: Option<DateTime<Utc>>,
    pub(super) updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(super) stars_count: u64,
    #[serde(default)]
    pub(super) forks_count: u64,
    #[serde(default)]
    pub(super) open_issues_count: u64,
    pub(super) owner: Option<ApiUser>,
}

/// `/repos/search` wraps its results in an envelope.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiSearchResults {
    #[serde(default)]
    pub(super) data: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiBranch {
    pub(super) name: String,
    #[serde(default)]
    pub(super) protected: bool,
    pub(super) commit: ApiPayloadCommit,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPayloadCommit {
    pub(super) id: String,
    #[serde(default)]
    pub(super) message: String,
    pub(super) author: Option<ApiPayloadUser>,
    pub(super) timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPayloadUser {
    pub(super) name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommit {
    pub(super) sha: String,
    pub(super) html_url: Option<String>,
    pub(super) commit: ApiRepoCommit,
    #[serde(default)]
    pub(super) parents: Vec<ApiCommitMeta>,
    pub(super) stats: Option<ApiCommitStats>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepoCommit {
    #[serde(default)]
    pub(super) message: String,
    pub(super) author: Option<ApiCommitUser>,
    pub(super) committer: Option<ApiCommitUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommitUser {
    #[serde(default)]
    pub(super) name: String,
    #[serde(default)]
    pub(super) email: String,
    pub(super) date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommitMeta {
    pub(super) sha: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(super) struct ApiCommitStats {
    pub(super) total: u64,
    pub(super) additions: u64,
    pub(super) deletions: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) id: u64,
    pub(super) number: u64,
    #[serde(default)]
    pub(super) title: String,
    pub(super) body: Option<String>,
    pub(super) state: String,
    #[serde(default)]
    pub(super) merged: bool,
    pub(super) user: Option<ApiUser>,
    pub(super) head: ApiPullRequestBranch,
    pub(super) base: ApiPullRequestBranch,
    #[serde(default)]
    pub(super) html_url: String,
    pub(super) created_at: Option<DateTime<Utc>>,
    pub(super) updated_at: Option<DateTime<Utc>>,
    pub(super) merged_at: Option<DateTime<Utc>>,
    pub(super) closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(super) labels: Vec<ApiLabel>,
    pub(super) additions: Option<u64>,
    pub(super) deletions: Option<u64>,
    pub(super) changed_files: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequestBranch {
    #[serde(rename = "ref")]
    pub(super) ref_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiLabel {
    pub(super) name: String,
}

/// Body of `POST /user/repos` and `POST /orgs/{org}/repos`.
#[derive(Debug, Clone, Serialize)]
pub(super) struct ApiCreateRepository<'a> {
    pub(super) name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) description: Option<&'a str>,
    pub(super) private: bool,
    pub(super) auto_init: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) default_branch: Option<&'a str>,
}

/// Gitea only reports `open`/`closed`; merged is a separate flag.
pub(super) fn normalize_state(state: &str, merged: bool) -> PullRequestState {
    if merged {
        PullRequestState::Merged
    } else if state.eq_ignore_ascii_case("closed") {
        PullRequestState::Closed
    } else {
        PullRequestState::Open
    }
}

impl From<ApiUser> for GitUser {
    fn from(value: ApiUser) -> Self {
        Self {
            id: value.id,
            username: value.login,
            name: non_empty(value.full_name),
            email: non_empty(value.email),
            avatar_url: non_empty(value.avatar_url),
            web_url: non_empty(value.html_url),
        }
    }
}

impl ApiRepository {
    pub(super) fn into_repository(self, raw: Option<Value>) -> Repository {
        Repository {
            id: RepoId::Gitea(self.full_name.clone()),
            name: self.name,
            full_name: self.full_name,
            description: non_empty(self.description),
            default_branch: self.default_branch.unwrap_or_default(),
            visibility: Visibility::from_flags(self.private, self.internal),
            web_url: self.html_url,
            clone_url: self.clone_url,
            ssh_url: self.ssh_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
            stars: self.stars_count,
            forks: self.forks_count,
            open_issues: self.open_issues_count,
            owner: self.owner.map(GitUser::from),
            raw,
        }
    }
}

impl ApiBranch {
    pub(super) fn into_branch(self, default_branch: &str) -> Branch {
        Branch {
            is_default: self.name == default_branch,
            name: self.name,
            is_protected: self.protected,
            commit_sha: self.commit.id,
            commit_message: self.commit.message,
            commit_author: self.commit.author.map(|author| author.name),
            commit_date: self.commit.timestamp,
        }
    }
}

impl From<ApiCommitUser> for Signature {
    fn from(value: ApiCommitUser) -> Self {
        Self {
            name: value.name,
            email: value.email,
            date: value.date,
        }
    }
}

impl ApiCommit {
    pub(super) fn into_commit(self, with_stats: bool) -> Commit {
        let stats = if with_stats {
            self.stats.map(|stats| CommitStats {
                additions: stats.additions,
                deletions: stats.deletions,
                total: stats.total,
            })
        } else {
            None
        };
        Commit {
            short_sha: short_sha(&self.sha),
            sha: self.sha,
            title: message_title(&self.commit.message),
            message: self.commit.message,
            author: self.commit.author.map(Signature::from).unwrap_or_default(),
            committer: self
                .commit
                .committer
                .map(Signature::from)
                .unwrap_or_default(),
            parent_shas: self.parents.into_iter().map(|parent| parent.sha).collect(),
            web_url: non_empty(self.html_url),
            stats,
        }
    }
}

impl From<ApiPullRequest> for PullRequest {
    fn from(value: ApiPullRequest) -> Self {
        let stats = match (value.additions, value.deletions, value.changed_files) {
            (Some(additions), Some(deletions), changed_files) => Some(PullRequestStats {
                additions,
                deletions,
                changed_files: changed_files.unwrap_or_default(),
            }),
            _ => None,
        };
        Self {
            id: value.id,
            number: value.number,
            title: value.title,
            description: non_empty(value.body),
            state: normalize_state(&value.state, value.merged),
            source_branch: value.head.ref_name,
            target_branch: value.base.ref_name,
            author: value.user.map(GitUser::from),
            web_url: value.html_url,
            created_at: value.created_at,
            updated_at: value.updated_at,
            merged_at: value.merged_at,
            closed_at: value.closed_at,
            labels: value.labels.into_iter().map(|label| label.name).collect(),
            stats,
        }
    }
}
