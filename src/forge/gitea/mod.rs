//! Gitea adapter over the `/api/v1` REST surface.
//!
//! Gitea addresses repositories by `owner/name`. Numeric ids are accepted
//! and resolved through `/repositories/{id}` before repository-scoped calls.

mod models;

use async_trait::async_trait;
use http::header::AUTHORIZATION;
use serde_json::Value;

use super::error::GitServiceError;
use super::models::{
    Branch, Commit, GitUser, PullRequest, PullRequestState, RepoRef, Repository, Visibility,
};
use super::options::{
    ClientOptions, CreateRepoOptions, ListBranchesOptions, ListCommitsOptions,
    ListPullRequestsOptions, ListReposOptions, PullRequestStateFilter, RepoOrder, SortDirection,
};
use super::pagination::PageRequest;
use super::provider::Provider;
use super::service::GitService;
use super::token::PersonalAccessToken;
use super::transport::{
    Query, Transport, TransportSettings, api_base, format_timestamp, parse_base_url, web_base,
};

use models::{
    ApiBranch, ApiCommit, ApiCreateRepository, ApiPullRequest, ApiRepository, ApiSearchResults,
    ApiUser,
};

const PROVIDER: Provider = Provider::Gitea;

/// Gitea-backed [`GitService`].
#[derive(Debug, Clone)]
pub struct GiteaService {
    transport: Transport,
    web_base: String,
    keep_raw_payloads: bool,
}

/// Repository path split into its two segments.
struct RepoPath {
    owner: String,
    name: String,
}

impl RepoPath {
    fn parse(full_name: &str) -> Result<Self, GitServiceError> {
        match full_name.trim_matches('/').split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_owned(),
                    name: name.to_owned(),
                })
            }
            _ => Err(GitServiceError::InvalidRequest {
                provider: PROVIDER,
                message: format!("repository path `{full_name}` must look like owner/name"),
            }),
        }
    }

    fn segments<'a>(&'a self, rest: &[&'a str]) -> Vec<&'a str> {
        let mut segments = vec!["repos", self.owner.as_str(), self.name.as_str()];
        segments.extend_from_slice(rest);
        segments
    }
}

impl GiteaService {
    /// Builds an adapter for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GitServiceError::Configuration`] when the base URL is not an
    /// http(s) URL or the HTTP client cannot be constructed.
    pub fn new(
        base_url: &str,
        token: &PersonalAccessToken,
        options: ClientOptions,
    ) -> Result<Self, GitServiceError> {
        let base = parse_base_url(PROVIDER, base_url)?;
        let transport = Transport::new(TransportSettings {
            provider: PROVIDER,
            api_base: api_base(PROVIDER, &base, &["api", "v1"])?,
            auth_header: Some((AUTHORIZATION, format!("token {}", token.value()))),
            timeout: options.timeout,
            accept_invalid_certs: options.accept_invalid_certs,
        })?;
        Ok(Self {
            transport,
            web_base: web_base(&base),
            keep_raw_payloads: options.keep_raw_payloads,
        })
    }

    fn paging(page: &PageRequest) -> Query {
        vec![
            ("page", page.page().to_string()),
            ("limit", page.per_page().to_string()),
        ]
    }

    fn normalize_repository(
        &self,
        operation: &str,
        value: Value,
    ) -> Result<Repository, GitServiceError> {
        let raw = self.keep_raw_payloads.then(|| value.clone());
        let api: ApiRepository = self.transport.decode_value(operation, value)?;
        Ok(api.into_repository(raw))
    }

    fn normalize_repositories(
        &self,
        operation: &str,
        values: Vec<Value>,
    ) -> Result<Vec<Repository>, GitServiceError> {
        values
            .into_iter()
            .map(|value| self.normalize_repository(operation, value))
            .collect()
    }

    async fn fetch_repository(&self, repo: &RepoRef) -> Result<Repository, GitServiceError> {
        let url = match repo {
            RepoRef::Id(id) => self
                .transport
                .endpoint(["repositories".to_owned(), id.to_string()])?,
            RepoRef::Path(path) => {
                let parsed = RepoPath::parse(path)?;
                self.transport.endpoint(parsed.segments(&[]))?
            }
        };
        let value: Value = self.transport.get_json("get repo", url, &Vec::new()).await?;
        self.normalize_repository("get repo", value)
    }

    /// Resolves a caller identifier to `owner/name`, fetching only for ids.
    async fn resolve_path(&self, repo: &RepoRef) -> Result<RepoPath, GitServiceError> {
        match repo {
            RepoRef::Path(path) => RepoPath::parse(path),
            RepoRef::Id(_) => {
                let repository = self.fetch_repository(repo).await?;
                RepoPath::parse(&repository.full_name)
            }
        }
    }

    async fn list_owned_repos(
        &self,
        options: &ListReposOptions,
        page: &PageRequest,
    ) -> Result<Vec<Repository>, GitServiceError> {
        let url = self.transport.endpoint(["user", "repos"])?;
        let values: Vec<Value> = self
            .transport
            .get_json("list repos", url, &Self::paging(page))
            .await?;
        let mut repositories = self.normalize_repositories("list repos", values)?;

        // `/user/repos` has no search or ordering parameters; both apply
        // to this page only.
        if let Some(needle) = options.search.as_deref().map(str::to_lowercase) {
            repositories.retain(|repo| repo.full_name.to_lowercase().contains(&needle));
        }
        if let Some(order) = options.order_by {
            sort_repositories(&mut repositories, order, options.sort.unwrap_or_default());
        }
        Ok(repositories)
    }

    async fn search_repos(
        &self,
        options: &ListReposOptions,
        page: &PageRequest,
    ) -> Result<Vec<Repository>, GitServiceError> {
        let url = self.transport.endpoint(["repos", "search"])?;
        let mut query = Self::paging(page);
        if let Some(search) = options.search.as_deref().filter(|text| !text.is_empty()) {
            query.push(("q", search.to_owned()));
        }
        if let Some(order) = options.order_by {
            query.push(("sort", search_sort_key(order).to_owned()));
            query.push(("order", options.sort.unwrap_or_default().as_str().to_owned()));
        }
        let envelope: ApiSearchResults = self.transport.get_json("search repos", url, &query).await?;
        self.normalize_repositories("search repos", envelope.data)
    }
}

const fn search_sort_key(order: RepoOrder) -> &'static str {
    match order {
        RepoOrder::Created => "created",
        RepoOrder::Updated => "updated",
        RepoOrder::Name => "alpha",
    }
}

fn sort_repositories(repositories: &mut [Repository], order: RepoOrder, direction: SortDirection) {
    repositories.sort_by(|left, right| {
        let ordering = match order {
            RepoOrder::Created => left.created_at.cmp(&right.created_at),
            RepoOrder::Updated => left.updated_at.cmp(&right.updated_at),
            RepoOrder::Name => left.name.to_lowercase().cmp(&right.name.to_lowercase()),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Gitea has no native merged filter: merged and closed both come from the
/// `closed` listing and are told apart by the `merged` flag.
const fn native_state(filter: PullRequestStateFilter) -> &'static str {
    match filter {
        PullRequestStateFilter::Open => "open",
        PullRequestStateFilter::Closed | PullRequestStateFilter::Merged => "closed",
        PullRequestStateFilter::All => "all",
    }
}

fn matches_filter(state: PullRequestState, filter: PullRequestStateFilter) -> bool {
    match filter {
        PullRequestStateFilter::All => true,
        PullRequestStateFilter::Open => state == PullRequestState::Open,
        PullRequestStateFilter::Closed => state == PullRequestState::Closed,
        PullRequestStateFilter::Merged => state == PullRequestState::Merged,
    }
}

#[async_trait]
impl GitService for GiteaService {
    fn provider(&self) -> Provider {
        PROVIDER
    }

    async fn current_user(&self) -> Result<GitUser, GitServiceError> {
        let url = self.transport.endpoint(["user"])?;
        let api: ApiUser = self.transport.get_json("current user", url, &Vec::new()).await?;
        let mut user = GitUser::from(api);
        if user.web_url.is_none() {
            user.web_url = Some(format!("{}/{}", self.web_base, user.username));
        }
        Ok(user)
    }

    async fn list_repos(
        &self,
        options: &ListReposOptions,
    ) -> Result<Vec<Repository>, GitServiceError> {
        let page = PageRequest::resolve(PROVIDER, options.page, options.per_page)?;
        if options.owned {
            self.list_owned_repos(options, &page).await
        } else {
            self.search_repos(options, &page).await
        }
    }

    async fn get_repo(&self, repo: &RepoRef) -> Result<Repository, GitServiceError> {
        self.fetch_repository(repo).await
    }

    async fn create_repo(
        &self,
        options: &CreateRepoOptions,
    ) -> Result<Repository, GitServiceError> {
        let url = match options.namespace.as_deref() {
            Some(org) => self.transport.endpoint(["orgs", org, "repos"])?,
            None => self.transport.endpoint(["user", "repos"])?,
        };
        let payload = ApiCreateRepository {
            name: &options.name,
            description: options.description.as_deref(),
            private: options.visibility != Visibility::Public,
            auto_init: options.auto_init,
            default_branch: options.default_branch.as_deref(),
        };
        let value: Value = self.transport.post_json("create repo", url, &payload).await?;
        self.normalize_repository("create repo", value)
    }

    async fn delete_repo(&self, repo: &RepoRef) -> Result<(), GitServiceError> {
        let path = self.resolve_path(repo).await?;
        let url = self.transport.endpoint(path.segments(&[]))?;
        self.transport.delete("delete repo", url).await
    }

    async fn list_branches(
        &self,
        repo: &RepoRef,
        options: &ListBranchesOptions,
    ) -> Result<Vec<Branch>, GitServiceError> {
        let page = PageRequest::resolve(PROVIDER, options.page, options.per_page)?;
        let repository = self.fetch_repository(repo).await?;
        let path = RepoPath::parse(&repository.full_name)?;
        let url = self.transport.endpoint(path.segments(&["branches"]))?;
        let branches: Vec<ApiBranch> = self
            .transport
            .get_json("list branches", url, &Self::paging(&page))
            .await?;
        Ok(branches
            .into_iter()
            .map(|branch| branch.into_branch(&repository.default_branch))
            .collect())
    }

    async fn get_branch(&self, repo: &RepoRef, name: &str) -> Result<Branch, GitServiceError> {
        let repository = self.fetch_repository(repo).await?;
        let path = RepoPath::parse(&repository.full_name)?;
        let url = self.transport.endpoint(path.segments(&["branches", name]))?;
        let branch: ApiBranch = self.transport.get_json("get branch", url, &Vec::new()).await?;
        Ok(branch.into_branch(&repository.default_branch))
    }

    async fn list_commits(
        &self,
        repo: &RepoRef,
        options: &ListCommitsOptions,
    ) -> Result<Vec<Commit>, GitServiceError> {
        let page = PageRequest::resolve(PROVIDER, options.page, options.per_page)?;
        let path = self.resolve_path(repo).await?;
        let url = self.transport.endpoint(path.segments(&["commits"]))?;

        let mut query = Self::paging(&page);
        query.push(("stat", options.with_stats.to_string()));
        if let Some(ref_name) = &options.ref_name {
            query.push(("sha", ref_name.clone()));
        }
        if let Some(file_path) = &options.path {
            query.push(("path", file_path.clone()));
        }
        if let Some(since) = &options.since {
            query.push(("since", format_timestamp(since)));
        }
        if let Some(until) = &options.until {
            query.push(("until", format_timestamp(until)));
        }

        let commits: Vec<ApiCommit> = self.transport.get_json("list commits", url, &query).await?;
        Ok(commits
            .into_iter()
            .map(|commit| commit.into_commit(options.with_stats))
            .collect())
    }

    async fn get_commit(
        &self,
        repo: &RepoRef,
        sha: &str,
        with_stats: bool,
    ) -> Result<Commit, GitServiceError> {
        let path = self.resolve_path(repo).await?;
        let url = self.transport.endpoint(path.segments(&["git", "commits", sha]))?;
        let query: Query = vec![("stat", with_stats.to_string())];
        let commit: ApiCommit = self.transport.get_json("get commit", url, &query).await?;
        Ok(commit.into_commit(with_stats))
    }

    async fn list_pull_requests(
        &self,
        repo: &RepoRef,
        options: &ListPullRequestsOptions,
    ) -> Result<Vec<PullRequest>, GitServiceError> {
        let page = PageRequest::resolve(PROVIDER, options.page, options.per_page)?;
        let path = self.resolve_path(repo).await?;
        let url = self.transport.endpoint(path.segments(&["pulls"]))?;

        let mut query = Self::paging(&page);
        query.push(("state", native_state(options.state).to_owned()));

        let pulls: Vec<ApiPullRequest> =
            self.transport.get_json("list pull requests", url, &query).await?;
        Ok(pulls
            .into_iter()
            .map(PullRequest::from)
            .filter(|pull| matches_filter(pull.state, options.state))
            .collect())
    }

    async fn get_pull_request(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> Result<PullRequest, GitServiceError> {
        let path = self.resolve_path(repo).await?;
        let number_segment = number.to_string();
        let url = self.transport.endpoint(path.segments(&["pulls", number_segment.as_str()]))?;
        let pull: ApiPullRequest = self
            .transport
            .get_json("get pull request", url, &Vec::new())
            .await?;
        Ok(pull.into())
    }

    fn repo_url(&self, full_name: &str) -> String {
        format!("{}/{full_name}", self.web_base)
    }

    fn commit_url(&self, full_name: &str, sha: &str) -> String {
        format!("{}/{full_name}/commit/{sha}", self.web_base)
    }

    fn branch_url(&self, full_name: &str, branch: &str) -> String {
        format!("{}/{full_name}/src/branch/{branch}", self.web_base)
    }

    fn pull_request_url(&self, full_name: &str, number: u64) -> String {
        format!("{}/{full_name}/pulls/{number}", self.web_base)
    }
}

#[cfg(test)]
mod tests;
