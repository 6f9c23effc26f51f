//! Adapter tests against a `wiremock` Gitea.

use std::time::Duration;

use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::GiteaService;
use crate::forge::error::{ErrorKind, GitServiceError};
use crate::forge::models::test_support::{
    gitea_branch, gitea_commit, gitea_pull_request, gitea_repository, gitea_user,
};
use crate::forge::models::{PullRequestState, RepoId, RepoRef, Visibility};
use crate::forge::options::{
    ClientOptions, CreateRepoOptions, ListBranchesOptions, ListCommitsOptions,
    ListPullRequestsOptions, ListReposOptions, PullRequestStateFilter, RepoOrder, SortDirection,
};
use crate::forge::pagination::{PageRequest, collect_pages};
use crate::forge::provider::Provider;
use crate::forge::service::GitService;
use crate::forge::token::PersonalAccessToken;

fn token() -> PersonalAccessToken {
    PersonalAccessToken::new("gitea-token").expect("token should be valid")
}

fn service_for(server: &MockServer, options: ClientOptions) -> GiteaService {
    GiteaService::new(&server.uri(), &token(), options).expect("service should build")
}

async fn mount_repo(server: &MockServer, full_name: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/repos/{full_name}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(gitea_repository(
            full_name, false, false,
        )))
        .mount(server)
        .await;
}

fn octo_repo() -> RepoRef {
    RepoRef::from_owner_repo("octo", "repo")
}

#[tokio::test]
async fn current_user_sends_token_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .and(header("authorization", "token gitea-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gitea_user(3, "alice")))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server, ClientOptions::default());
    let user = service.current_user().await.expect("user should load");

    assert_eq!(user.id, 3);
    assert_eq!(user.username, "alice");
    assert_eq!(user.name.as_deref(), Some("alice Example"));
}

#[tokio::test]
async fn validate_token_reports_rejection_without_failing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "token is invalid"})))
        .mount(&server)
        .await;

    let service = service_for(&server, ClientOptions::default());
    let result = service.validate_token().await;

    assert!(!result.valid);
    assert!(result.user.is_none());
    assert_eq!(result.provider, Provider::Gitea);
    let message = result.error.expect("error message should be present");
    assert!(message.contains("token is invalid"), "unexpected message: {message}");
    assert!(service.get_current_user().await.is_none());
}

#[rstest]
#[case::unauthorised(401, ErrorKind::Authentication)]
#[case::forbidden(403, ErrorKind::Permission)]
#[case::missing(404, ErrorKind::NotFound)]
#[case::server_error(500, ErrorKind::Service)]
#[case::conflict(409, ErrorKind::Service)]
#[tokio::test]
async fn maps_status_codes_to_error_kinds(#[case] status: u16, #[case] expected: ErrorKind) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/repos/octo/repo"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"message": "nope"})))
        .mount(&server)
        .await;

    let service = service_for(&server, ClientOptions::default());
    let error = service
        .get_repo(&octo_repo())
        .await
        .expect_err("request should fail");

    assert_eq!(error.kind(), expected);
    assert_eq!(error.status_code(), Some(status));
    assert_eq!(error.provider(), Some(Provider::Gitea));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gitea_user(3, "alice"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let options = ClientOptions {
        timeout: Duration::from_millis(1),
        ..ClientOptions::default()
    };
    let error = service_for(&server, options)
        .current_user()
        .await
        .expect_err("request should time out");

    assert_eq!(
        error,
        GitServiceError::Timeout {
            provider: Provider::Gitea,
            timeout: Duration::from_millis(1),
        }
    );
    assert_eq!(error.kind(), ErrorKind::Service);
}

#[rstest]
#[case::public(false, false, Visibility::Public)]
#[case::private(true, false, Visibility::Private)]
#[case::internal(false, true, Visibility::Internal)]
#[case::private_wins(true, true, Visibility::Private)]
#[tokio::test]
async fn get_repo_folds_visibility_flags(
    #[case] private: bool,
    #[case] internal: bool,
    #[case] expected: Visibility,
) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/repos/octo/repo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gitea_repository("octo/repo", private, internal)),
        )
        .mount(&server)
        .await;

    let repo = service_for(&server, ClientOptions::default())
        .get_repo(&octo_repo())
        .await
        .expect("repo should load");

    assert_eq!(repo.visibility, expected);
    assert_eq!(repo.id, RepoId::Gitea("octo/repo".to_owned()));
    assert!(repo.raw.is_none());
}

#[tokio::test]
async fn numeric_ids_resolve_through_repositories_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/repositories/17"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gitea_repository("octo/repo", false, false)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/repos/octo/repo/pulls/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gitea_pull_request(7, "open", false)))
        .expect(1)
        .mount(&server)
        .await;

    let pull = service_for(&server, ClientOptions::default())
        .get_pull_request(&RepoRef::Id(17), 7)
        .await
        .expect("pull request should load");

    assert_eq!(pull.number, 7);
    assert_eq!(pull.state, PullRequestState::Open);
}

#[tokio::test]
async fn keeps_raw_payload_when_asked() {
    let server = MockServer::start().await;
    mount_repo(&server, "octo/repo").await;

    let options = ClientOptions {
        keep_raw_payloads: true,
        ..ClientOptions::default()
    };
    let repo = service_for(&server, options)
        .get_repo(&octo_repo())
        .await
        .expect("repo should load");

    let raw = repo.raw.expect("raw payload should be kept");
    assert_eq!(raw["stars_count"], json!(4));
}

#[tokio::test]
async fn search_unwraps_envelope_and_maps_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/repos/search"))
        .and(query_param("q", "tool"))
        .and(query_param("sort", "alpha"))
        .and(query_param("order", "asc"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "data": [
                gitea_repository("octo/toolkit", false, false),
                gitea_repository("octo/tooling", true, false)
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = ListReposOptions {
        page: Some(2),
        per_page: Some(10),
        search: Some("tool".to_owned()),
        order_by: Some(RepoOrder::Name),
        sort: Some(SortDirection::Asc),
        ..ListReposOptions::default()
    };
    let repos = service_for(&server, ClientOptions::default())
        .list_repos(&options)
        .await
        .expect("search should succeed");

    let names: Vec<_> = repos.iter().map(|repo| repo.full_name.as_str()).collect();
    assert_eq!(names, ["octo/toolkit", "octo/tooling"]);
}

#[tokio::test]
async fn owned_listing_filters_and_sorts_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user/repos"))
        .and(query_param("limit", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            gitea_repository("octo/zeta-tool", false, false),
            gitea_repository("octo/docs", false, false),
            gitea_repository("octo/Alpha-Tool", false, false)
        ])))
        .mount(&server)
        .await;

    let options = ListReposOptions {
        owned: true,
        search: Some("TOOL".to_owned()),
        order_by: Some(RepoOrder::Name),
        sort: Some(SortDirection::Asc),
        ..ListReposOptions::default()
    };
    let repos = service_for(&server, ClientOptions::default())
        .list_repos(&options)
        .await
        .expect("listing should succeed");

    let names: Vec<_> = repos.iter().map(|repo| repo.name.as_str()).collect();
    assert_eq!(names, ["Alpha-Tool", "zeta-tool"]);
}

#[rstest]
#[case::zero_page(Some(0), None)]
#[case::oversized(None, Some(101))]
#[tokio::test]
async fn rejects_invalid_paging_before_sending(#[case] page: Option<u32>, #[case] per_page: Option<u8>) {
    let server = MockServer::start().await;
    let options = ListReposOptions {
        page,
        per_page,
        ..ListReposOptions::default()
    };
    let error = service_for(&server, ClientOptions::default())
        .list_repos(&options)
        .await
        .expect_err("paging should be rejected");

    assert!(
        matches!(error, GitServiceError::InvalidRequest { .. }),
        "expected InvalidRequest, got {error:?}"
    );
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[rstest]
#[case::public(Visibility::Public, false)]
#[case::private(Visibility::Private, true)]
#[case::internal(Visibility::Internal, true)]
#[tokio::test]
async fn create_repo_sends_private_flag(#[case] visibility: Visibility, #[case] private: bool) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orgs/acme/repos"))
        .and(body_partial_json(json!({
            "name": "widgets",
            "private": private,
            "auto_init": true,
            "default_branch": "trunk"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(gitea_repository("acme/widgets", private, false)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut options = CreateRepoOptions::new("widgets");
    options.visibility = visibility;
    options.auto_init = true;
    options.default_branch = Some("trunk".to_owned());
    options.namespace = Some("acme".to_owned());

    let repo = service_for(&server, ClientOptions::default())
        .create_repo(&options)
        .await
        .expect("repo should be created");

    assert_eq!(repo.full_name, "acme/widgets");
}

#[tokio::test]
async fn delete_repo_accepts_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/repos/octo/repo"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    service_for(&server, ClientOptions::default())
        .delete_repo(&octo_repo())
        .await
        .expect("delete should succeed");
}

#[tokio::test]
async fn rejects_paths_without_owner() {
    let server = MockServer::start().await;
    let error = service_for(&server, ClientOptions::default())
        .delete_repo(&RepoRef::Path("just-a-name".to_owned()))
        .await
        .expect_err("path should be rejected");

    assert!(matches!(error, GitServiceError::InvalidRequest { .. }));
}

#[tokio::test]
async fn branches_are_flagged_against_default_branch() {
    let server = MockServer::start().await;
    mount_repo(&server, "octo/repo").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/repos/octo/repo/branches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            gitea_branch("main", true),
            gitea_branch("feature/login", false)
        ])))
        .mount(&server)
        .await;

    let branches = service_for(&server, ClientOptions::default())
        .list_branches(&octo_repo(), &ListBranchesOptions::default())
        .await
        .expect("branches should load");

    let flags: Vec<_> = branches
        .iter()
        .map(|branch| (branch.name.as_str(), branch.is_default, branch.is_protected))
        .collect();
    assert_eq!(flags, [("main", true, true), ("feature/login", false, false)]);
    assert_eq!(branches[0].commit_author.as_deref(), Some("Alice"));
}

#[tokio::test]
async fn get_branch_escapes_slashes_in_name() {
    let server = MockServer::start().await;
    mount_repo(&server, "octo/repo").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/repos/octo/repo/branches/feature%2Flogin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gitea_branch("feature/login", false)))
        .expect(1)
        .mount(&server)
        .await;

    let branch = service_for(&server, ClientOptions::default())
        .get_branch(&octo_repo(), "feature/login")
        .await
        .expect("branch should load");

    assert!(!branch.is_default);
}

#[tokio::test]
async fn list_commits_forwards_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/repos/octo/repo/commits"))
        .and(query_param("sha", "main"))
        .and(query_param("path", "src/lib.rs"))
        .and(query_param("since", "2024-04-01T00:00:00Z"))
        .and(query_param("stat", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            gitea_commit("0123456789abcdef0123456789abcdef01234567", "Fix parser\n\nLonger body", true)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let options = ListCommitsOptions {
        ref_name: Some("main".to_owned()),
        path: Some("src/lib.rs".to_owned()),
        since: "2024-04-01T00:00:00Z".parse().ok(),
        with_stats: true,
        ..ListCommitsOptions::default()
    };
    let commits = service_for(&server, ClientOptions::default())
        .list_commits(&octo_repo(), &options)
        .await
        .expect("commits should load");

    let commit = commits.first().expect("one commit expected");
    assert_eq!(commit.short_sha, "0123456");
    assert_eq!(commit.title, "Fix parser");
    assert_eq!(commit.stats.map(|stats| stats.total), Some(12));
}

#[tokio::test]
async fn get_commit_uses_git_commits_endpoint() {
    let server = MockServer::start().await;
    let sha = "0123456789abcdef0123456789abcdef01234567";
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/repos/octo/repo/git/commits/{sha}")))
        .and(query_param("stat", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gitea_commit(sha, "Fix parser", true)))
        .expect(1)
        .mount(&server)
        .await;

    let commit = service_for(&server, ClientOptions::default())
        .get_commit(&octo_repo(), sha, false)
        .await
        .expect("commit should load");

    assert!(commit.stats.is_none());
    assert_eq!(commit.parent_shas.len(), 1);
}

#[rstest]
#[case::merged(PullRequestStateFilter::Merged, "closed", &[2, 3])]
#[case::closed(PullRequestStateFilter::Closed, "closed", &[1])]
#[case::open(PullRequestStateFilter::Open, "open", &[1, 2, 3])]
#[tokio::test]
async fn filters_pull_requests_by_state(
    #[case] filter: PullRequestStateFilter,
    #[case] native: &str,
    #[case] expected: &[u64],
) {
    let server = MockServer::start().await;
    let body = if native == "open" {
        json!([
            gitea_pull_request(1, "open", false),
            gitea_pull_request(2, "open", false),
            gitea_pull_request(3, "open", false)
        ])
    } else {
        json!([
            gitea_pull_request(1, "closed", false),
            gitea_pull_request(2, "closed", true),
            gitea_pull_request(3, "closed", true)
        ])
    };
    Mock::given(method("GET"))
        .and(path("/api/v1/repos/octo/repo/pulls"))
        .and(query_param("state", native))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let options = ListPullRequestsOptions {
        state: filter,
        ..ListPullRequestsOptions::default()
    };
    let pulls = service_for(&server, ClientOptions::default())
        .list_pull_requests(&octo_repo(), &options)
        .await
        .expect("pull requests should load");

    let numbers: Vec<_> = pulls.iter().map(|pull| pull.number).collect();
    assert_eq!(numbers, expected);
}

#[tokio::test]
async fn merged_listing_walks_past_filtered_short_page() {
    let server = MockServer::start().await;
    let pages = [
        ("1", json!([
            gitea_pull_request(1, "closed", false),
            gitea_pull_request(2, "closed", true)
        ])),
        ("2", json!([gitea_pull_request(3, "closed", true)])),
        ("3", json!([])),
    ];
    for (page, body) in pages {
        Mock::given(method("GET"))
            .and(path("/api/v1/repos/octo/repo/pulls"))
            .and(query_param("state", "closed"))
            .and(query_param("page", page))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let service = service_for(&server, ClientOptions::default());
    let first = PageRequest::resolve(Provider::Gitea, None, Some(2)).expect("paging is valid");
    let pulls = collect_pages(first, 10, |page| {
        let options = ListPullRequestsOptions {
            state: PullRequestStateFilter::Merged,
            page: Some(page.page()),
            per_page: Some(page.per_page()),
        };
        let service = &service;
        async move { service.list_pull_requests(&octo_repo(), &options).await }
    })
    .await
    .expect("merged pull requests should be collected");

    let numbers: Vec<_> = pulls.iter().map(|pull| pull.number).collect();
    assert_eq!(numbers, [2, 3]);
}

#[rstest]
fn builds_web_urls() {
    let service = GiteaService::new(
        "https://gitea.example.com/",
        &token(),
        ClientOptions::default(),
    )
    .expect("service should build");

    assert_eq!(service.repo_url("octo/repo"), "https://gitea.example.com/octo/repo");
    assert_eq!(
        service.commit_url("octo/repo", "abc"),
        "https://gitea.example.com/octo/repo/commit/abc"
    );
    assert_eq!(
        service.branch_url("octo/repo", "main"),
        "https://gitea.example.com/octo/repo/src/branch/main"
    );
    assert_eq!(
        service.pull_request_url("octo/repo", 9),
        "https://gitea.example.com/octo/repo/pulls/9"
    );
}
