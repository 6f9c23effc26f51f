//! Provider-agnostic access to Gitea and GitLab servers.
//!
//! [`GitService`] is the single contract. [`GiteaService`] and
//! [`GitLabService`] translate it to each provider's REST API, normalise the
//! responses into the entities in [`models`], and fold failures into
//! [`GitServiceError`]. [`connect`] picks the adapter from a
//! [`ProviderConfig`].

pub mod error;
pub mod gitea;
pub mod gitlab;
pub mod models;
pub mod options;
pub mod pagination;
pub mod provider;
pub mod selector;
pub mod service;
pub mod token;

mod transport;

pub use error::{ErrorKind, GitServiceError};
pub use gitea::GiteaService;
pub use gitlab::{GitLabAuth, GitLabService};
pub use models::{
    Branch, Commit, CommitStats, GitUser, PullRequest, PullRequestState, PullRequestStats, RepoId,
    RepoRef, Repository, Signature, ValidationResult, Visibility,
};
pub use options::{
    ClientOptions, CreateRepoOptions, ListBranchesOptions, ListCommitsOptions,
    ListPullRequestsOptions, ListReposOptions, PullRequestStateFilter, RepoOrder, SortDirection,
};
pub use pagination::{PageRequest, collect_pages};
pub use provider::{Provider, UnknownProvider};
pub use selector::{ProviderConfig, connect};
pub use service::GitService;
pub use token::PersonalAccessToken;

#[cfg(test)]
pub use service::MockGitService;
