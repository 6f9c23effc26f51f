//! The provider-agnostic contract every adapter implements.

use async_trait::async_trait;

use super::error::GitServiceError;
use super::models::{Branch, Commit, GitUser, PullRequest, RepoRef, Repository, ValidationResult};
use super::options::{
    CreateRepoOptions, ListBranchesOptions, ListCommitsOptions, ListPullRequestsOptions,
    ListReposOptions,
};
use super::provider::Provider;

/// Typed REST client over one git-hosting backend.
///
/// Every data-returning method fails with a [`GitServiceError`]; the two
/// presence checks, [`GitService::get_current_user`] and
/// [`GitService::validate_token`], never fail. Listing methods return exactly
/// one page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitService: Send + Sync {
    /// Backend this adapter talks to.
    fn provider(&self) -> Provider;

    /// Fetch the authenticated user.
    async fn current_user(&self) -> Result<GitUser, GitServiceError>;

    /// Fetch the authenticated user, or `None` on any failure.
    async fn get_current_user(&self) -> Option<GitUser> {
        match self.current_user().await {
            Ok(user) => Some(user),
            Err(error) => {
                tracing::debug!(provider = %self.provider(), %error, "current user lookup failed");
                None
            }
        }
    }

    /// Check whether the configured token authenticates.
    async fn validate_token(&self) -> ValidationResult {
        match self.current_user().await {
            Ok(user) => ValidationResult::success(self.provider(), user),
            Err(error) => ValidationResult::failure(self.provider(), error.to_string()),
        }
    }

    /// List one page of repositories.
    async fn list_repos(
        &self,
        options: &ListReposOptions,
    ) -> Result<Vec<Repository>, GitServiceError>;

    /// Fetch one repository.
    async fn get_repo(&self, repo: &RepoRef) -> Result<Repository, GitServiceError>;

    /// Create a repository owned by the user or the given namespace.
    async fn create_repo(&self, options: &CreateRepoOptions)
    -> Result<Repository, GitServiceError>;

    /// Delete a repository.
    async fn delete_repo(&self, repo: &RepoRef) -> Result<(), GitServiceError>;

    /// List one page of branches, flagging the default branch.
    async fn list_branches(
        &self,
        repo: &RepoRef,
        options: &ListBranchesOptions,
    ) -> Result<Vec<Branch>, GitServiceError>;

    /// Fetch one branch, flagging whether it is the default branch.
    async fn get_branch(&self, repo: &RepoRef, name: &str) -> Result<Branch, GitServiceError>;

    /// List one page of commits.
    async fn list_commits(
        &self,
        repo: &RepoRef,
        options: &ListCommitsOptions,
    ) -> Result<Vec<Commit>, GitServiceError>;

    /// Fetch one commit; diff statistics only when `with_stats` is set.
    async fn get_commit(
        &self,
        repo: &RepoRef,
        sha: &str,
        with_stats: bool,
    ) -> Result<Commit, GitServiceError>;

    /// List one page of pull requests.
    async fn list_pull_requests(
        &self,
        repo: &RepoRef,
        options: &ListPullRequestsOptions,
    ) -> Result<Vec<PullRequest>, GitServiceError>;

    /// Fetch one pull request by its repository-local number.
    async fn get_pull_request(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> Result<PullRequest, GitServiceError>;

    /// Browser URL of a repository.
    fn repo_url(&self, full_name: &str) -> String;

    /// Browser URL of a commit.
    fn commit_url(&self, full_name: &str, sha: &str) -> String;

    /// Browser URL of a branch.
    fn branch_url(&self, full_name: &str, branch: &str) -> String;

    /// Browser URL of a pull request.
    fn pull_request_url(&self, full_name: &str, number: u64) -> String;
}
