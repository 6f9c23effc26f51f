//! GitLab adapter over the `/api/v4` REST surface.
//!
//! Projects are addressed either by numeric id or by their namespaced path,
//! which is sent as a single escaped segment (`group%2Fproject`).

mod models;

use async_trait::async_trait;
use http::header::HeaderName;
use serde_json::Value;

use super::error::GitServiceError;
use super::models::{Branch, Commit, GitUser, PullRequest, RepoRef, Repository};
use super::options::{
    ClientOptions, CreateRepoOptions, ListBranchesOptions, ListCommitsOptions,
    ListPullRequestsOptions, ListReposOptions, PullRequestStateFilter, RepoOrder,
};
use super::pagination::PageRequest;
use super::provider::Provider;
use super::service::GitService;
use super::token::PersonalAccessToken;
use super::transport::{
    Query, Transport, TransportSettings, api_base, format_timestamp, parse_base_url, web_base,
};

use models::{ApiBranch, ApiCommit, ApiCreateProject, ApiMergeRequest, ApiProject, ApiUser};

const PROVIDER: Provider = Provider::GitLab;
const TOKEN_HEADER: &str = "private-token";

/// How requests reach the GitLab API.
#[derive(Debug, Clone)]
pub enum GitLabAuth {
    /// Talk to the server directly with a `PRIVATE-TOKEN` header.
    Direct(PersonalAccessToken),
    /// Send requests through a proxy that injects credentials itself.
    Proxy {
        /// Proxy base URL; `/api/v4` is appended to it.
        endpoint: String,
    },
}

/// GitLab-backed [`GitService`].
#[derive(Debug, Clone)]
pub struct GitLabService {
    transport: Transport,
    web_base: String,
    keep_raw_payloads: bool,
}

impl GitLabService {
    /// Builds an adapter for the server at `base_url`.
    ///
    /// Web URLs always derive from `base_url`, even when API traffic goes
    /// through a proxy.
    ///
    /// # Errors
    ///
    /// Returns [`GitServiceError::Configuration`] when either URL is not an
    /// http(s) URL or the HTTP client cannot be constructed.
    pub fn new(
        base_url: &str,
        auth: GitLabAuth,
        options: ClientOptions,
    ) -> Result<Self, GitServiceError> {
        let base = parse_base_url(PROVIDER, base_url)?;
        let (api_root, auth_header) = match auth {
            GitLabAuth::Direct(token) => (
                base.clone(),
                Some((
                    HeaderName::from_static(TOKEN_HEADER),
                    token.value().to_owned(),
                )),
            ),
            GitLabAuth::Proxy { endpoint } => (parse_base_url(PROVIDER, &endpoint)?, None),
        };
        let transport = Transport::new(TransportSettings {
            provider: PROVIDER,
            api_base: api_base(PROVIDER, &api_root, &["api", "v4"])?,
            auth_header,
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
            ("per_page", page.per_page().to_string()),
        ]
    }

    fn project_segments<'a>(project: &'a str, rest: &[&'a str]) -> Vec<&'a str> {
        let mut segments = vec!["projects", project];
        segments.extend_from_slice(rest);
        segments
    }

    fn normalize_project(
        &self,
        operation: &str,
        value: Value,
    ) -> Result<Repository, GitServiceError> {
        let raw = self.keep_raw_payloads.then(|| value.clone());
        let api: ApiProject = self.transport.decode_value(operation, value)?;
        Ok(api.into_repository(raw))
    }
}

/// Project identifier as a single path segment.
fn project_id(repo: &RepoRef) -> String {
    match repo {
        RepoRef::Id(id) => id.to_string(),
        RepoRef::Path(path) => path.trim_matches('/').to_owned(),
    }
}

const fn order_key(order: RepoOrder) -> &'static str {
    match order {
        RepoOrder::Created => "created_at",
        RepoOrder::Updated => "updated_at",
        RepoOrder::Name => "name",
    }
}

const fn native_state(filter: PullRequestStateFilter) -> &'static str {
    match filter {
        PullRequestStateFilter::Open => "opened",
        PullRequestStateFilter::Closed => "closed",
        PullRequestStateFilter::Merged => "merged",
        PullRequestStateFilter::All => "all",
    }
}

fn parse_namespace(namespace: &str) -> Result<u64, GitServiceError> {
    namespace
        .trim()
        .parse()
        .map_err(|_| GitServiceError::InvalidRequest {
            provider: PROVIDER,
            message: format!("namespace `{namespace}` must be a numeric namespace id"),
        })
}

#[async_trait]
impl GitService for GitLabService {
    fn provider(&self) -> Provider {
        PROVIDER
    }

    async fn current_user(&self) -> Result<GitUser, GitServiceError> {
        let url = self.transport.endpoint(["user"])?;
        let api: ApiUser = self.transport.get_json("current user", url, &Vec::new()).await?;
        Ok(api.into())
    }

    async fn list_repos(
        &self,
        options: &ListReposOptions,
    ) -> Result<Vec<Repository>, GitServiceError> {
        let page = PageRequest::resolve(PROVIDER, options.page, options.per_page)?;
        let url = self.transport.endpoint(["projects"])?;

        let mut query = Self::paging(&page);
        if options.owned {
            query.push(("owned", "true".to_owned()));
        }
        if let Some(search) = options.search.as_deref().filter(|text| !text.is_empty()) {
            query.push(("search", search.to_owned()));
        }
        if let Some(order) = options.order_by {
            query.push(("order_by", order_key(order).to_owned()));
            query.push(("sort", options.sort.unwrap_or_default().as_str().to_owned()));
        }

        let values: Vec<Value> = self.transport.get_json("list repos", url, &query).await?;
        values
            .into_iter()
            .map(|value| self.normalize_project("list repos", value))
            .collect()
    }

    async fn get_repo(&self, repo: &RepoRef) -> Result<Repository, GitServiceError> {
        let project = project_id(repo);
        let url = self.transport.endpoint(Self::project_segments(&project, &[]))?;
        let value: Value = self.transport.get_json("get repo", url, &Vec::new()).await?;
        self.normalize_project("get repo", value)
    }

    async fn create_repo(
        &self,
        options: &CreateRepoOptions,
    ) -> Result<Repository, GitServiceError> {
        let namespace_id = options
            .namespace
            .as_deref()
            .map(parse_namespace)
            .transpose()?;
        let payload = ApiCreateProject {
            name: &options.name,
            description: options.description.as_deref(),
            visibility: options.visibility.as_str(),
            initialize_with_readme: options.auto_init,
            default_branch: options.default_branch.as_deref(),
            namespace_id,
        };
        let url = self.transport.endpoint(["projects"])?;
        let value: Value = self.transport.post_json("create repo", url, &payload).await?;
        self.normalize_project("create repo", value)
    }

    async fn delete_repo(&self, repo: &RepoRef) -> Result<(), GitServiceError> {
        let project = project_id(repo);
        let url = self.transport.endpoint(Self::project_segments(&project, &[]))?;
        self.transport.delete("delete repo", url).await
    }

    async fn list_branches(
        &self,
        repo: &RepoRef,
        options: &ListBranchesOptions,
    ) -> Result<Vec<Branch>, GitServiceError> {
        let page = PageRequest::resolve(PROVIDER, options.page, options.per_page)?;
        let repository = self.get_repo(repo).await?;
        let project = project_id(repo);
        let url = self
            .transport
            .endpoint(Self::project_segments(&project, &["repository", "branches"]))?;
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
        let repository = self.get_repo(repo).await?;
        let project = project_id(repo);
        let url = self
            .transport
            .endpoint(Self::project_segments(&project, &["repository", "branches", name]))?;
        let branch: ApiBranch = self.transport.get_json("get branch", url, &Vec::new()).await?;
        Ok(branch.into_branch(&repository.default_branch))
    }

    async fn list_commits(
        &self,
        repo: &RepoRef,
        options: &ListCommitsOptions,
    ) -> Result<Vec<Commit>, GitServiceError> {
        let page = PageRequest::resolve(PROVIDER, options.page, options.per_page)?;
        let project = project_id(repo);
        let url = self
            .transport
            .endpoint(Self::project_segments(&project, &["repository", "commits"]))?;

        let mut query = Self::paging(&page);
        if let Some(ref_name) = &options.ref_name {
            query.push(("ref_name", ref_name.clone()));
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
        if options.with_stats {
            query.push(("with_stats", "true".to_owned()));
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
        let project = project_id(repo);
        let url = self
            .transport
            .endpoint(Self::project_segments(&project, &["repository", "commits", sha]))?;
        let query: Query = vec![("stats", with_stats.to_string())];
        let commit: ApiCommit = self.transport.get_json("get commit", url, &query).await?;
        Ok(commit.into_commit(with_stats))
    }

    async fn list_pull_requests(
        &self,
        repo: &RepoRef,
        options: &ListPullRequestsOptions,
    ) -> Result<Vec<PullRequest>, GitServiceError> {
        let page = PageRequest::resolve(PROVIDER, options.page, options.per_page)?;
        let project = project_id(repo);
        let url = self
            .transport
            .endpoint(Self::project_segments(&project, &["merge_requests"]))?;

        let mut query = Self::paging(&page);
        query.push(("state", native_state(options.state).to_owned()));

        let requests: Vec<ApiMergeRequest> = self
            .transport
            .get_json("list pull requests", url, &query)
            .await?;
        Ok(requests.into_iter().map(PullRequest::from).collect())
    }

    async fn get_pull_request(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> Result<PullRequest, GitServiceError> {
        let project = project_id(repo);
        let iid = number.to_string();
        let url = self
            .transport
            .endpoint(Self::project_segments(&project, &["merge_requests", iid.as_str()]))?;
        let request: ApiMergeRequest = self
            .transport
            .get_json("get pull request", url, &Vec::new())
            .await?;
        Ok(request.into())
    }

    fn repo_url(&self, full_name: &str) -> String {
        format!("{}/{full_name}", self.web_base)
    }

    fn commit_url(&self, full_name: &str, sha: &str) -> String {
        format!("{}/{full_name}/-/commit/{sha}", self.web_base)
    }

    fn branch_url(&self, full_name: &str, branch: &str) -> String {
        format!("{}/{full_name}/-/tree/{branch}", self.web_base)
    }

    fn pull_request_url(&self, full_name: &str, number: u64) -> String {
        format!("{}/{full_name}/-/merge_requests/{number}", self.web_base)
    }
}
