//! JSON fixtures shaped like Gitea and GitLab API payloads.
//!
//! Used by unit and behavioural tests to seed `wiremock` servers with
//! realistic bodies without repeating the full upstream shapes everywhere.

use serde_json::{Value, json};

/// A Gitea `Repository` payload.
#[must_use]
pub fn gitea_repository(full_name: &str, private: bool, internal: bool) -> Value {
    let (owner, name) = full_name.split_once('/').unwrap_or(("octo", full_name));
    json!({
        "id": 17,
        "name": name,
        "full_name": full_name,
        "description": "",
        "default_branch": "main",
        "private": private,
        "internal": internal,
        "html_url": format!("https://gitea.example.com/{full_name}"),
        "clone_url": format!("https://gitea.example.com/{full_name}.git"),
        "ssh_url": format!("git@gitea.example.com:{full_name}.git"),
        "created_at": "2024-03-01T09:00:00+01:00",
        "updated_at": "2024-04-02T10:30:00Z",
        "stars_count": 4,
        "forks_count": 1,
        "open_issues_count": 2,
        "owner": gitea_user(3, owner)
    })
}

/// A Gitea `User` payload.
#[must_use]
pub fn gitea_user(id: u64, login: &str) -> Value {
    json!({
        "id": id,
        "login": login,
        "full_name": format!("{login} Example"),
        "email": format!("{login}@example.com"),
        "avatar_url": format!("https://gitea.example.com/avatars/{login}"),
        "html_url": format!("https://gitea.example.com/{login}")
    })
}

/// A Gitea `Branch` payload.
#[must_use]
pub fn gitea_branch(name: &str, protected: bool) -> Value {
    json!({
        "name": name,
        "protected": protected,
        "commit": {
            "id": "4f2a1c9be0d7a6b5c4d3e2f1a0b9c8d7e6f5a4b3",
            "message": format!("Tip of {name}\n\nDetails"),
            "author": { "name": "Alice", "email": "alice@example.com", "username": "alice" },
            "committer": { "name": "Bob", "email": "bob@example.com", "username": "bob" },
            "timestamp": "2024-04-02T10:30:00Z"
        }
    })
}

/// A Gitea `Commit` payload, optionally carrying diff statistics.
#[must_use]
pub fn gitea_commit(sha: &str, message: &str, with_stats: bool) -> Value {
    let mut commit = json!({
        "sha": sha,
        "html_url": format!("https://gitea.example.com/octo/repo/commit/{sha}"),
        "commit": {
            "message": message,
            "author": { "name": "Alice", "email": "alice@example.com", "date": "2024-04-01T08:00:00Z" },
            "committer": { "name": "Bob", "email": "bob@example.com", "date": "2024-04-01T09:00:00Z" }
        },
        "author": gitea_user(5, "alice"),
        "parents": [{ "sha": "1111111111111111111111111111111111111111" }]
    });
    if with_stats && let Some(object) = commit.as_object_mut() {
        object.insert(
            "stats".to_owned(),
            json!({ "total": 12, "additions": 10, "deletions": 2 }),
        );
    }
    commit
}

/// A Gitea `PullRequest` payload.
#[must_use]
pub fn gitea_pull_request(number: u64, state: &str, merged: bool) -> Value {
    let merged_at = if merged {
        Value::from("2024-04-03T12:00:00Z")
    } else {
        Value::Null
    };
    let closed_at = if state == "closed" {
        Value::from("2024-04-03T12:00:00Z")
    } else {
        Value::Null
    };
    json!({
        "id": 1000 + number,
        "number": number,
        "title": format!("Change {number}"),
        "body": "Adds the thing",
        "state": state,
        "merged": merged,
        "merged_at": merged_at,
        "closed_at": closed_at,
        "user": gitea_user(5, "alice"),
        "head": { "ref": "feature/login", "sha": "abc123" },
        "base": { "ref": "main", "sha": "def456" },
        "html_url": format!("https://gitea.example.com/octo/repo/pulls/{number}"),
        "created_at": "2024-04-01T08:00:00Z",
        "updated_at": "2024-04-03T12:00:00Z",
        "labels": [{ "name": "enhancement" }],
        "additions": 40,
        "deletions": 3,
        "changed_files": 2
    })
}

/// A GitLab `Project` payload.
#[must_use]
pub fn gitlab_project(id: u64, path_with_namespace: &str, visibility: &str) -> Value {
    let name = path_with_namespace
        .rsplit('/')
        .next()
        .unwrap_or(path_with_namespace);
    json!({
        "id": id,
        "name": name,
        "path_with_namespace": path_with_namespace,
        "description": "Project description",
        "default_branch": "main",
        "visibility": visibility,
        "web_url": format!("https://gitlab.example.com/{path_with_namespace}"),
        "http_url_to_repo": format!("https://gitlab.example.com/{path_with_namespace}.git"),
        "ssh_url_to_repo": format!("git@gitlab.example.com:{path_with_namespace}.git"),
        "created_at": "2024-03-01T09:00:00.000Z",
        "last_activity_at": "2024-04-02T10:30:00.000Z",
        "star_count": 4,
        "forks_count": 1,
        "open_issues_count": 2,
        "owner": gitlab_user(3, "alice")
    })
}

/// A GitLab `User` payload.
#[must_use]
pub fn gitlab_user(id: u64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "name": format!("{username} Example"),
        "state": "active",
        "avatar_url": format!("https://gitlab.example.com/uploads/{username}.png"),
        "web_url": format!("https://gitlab.example.com/{username}")
    })
}

/// A GitLab `Branch` payload.
#[must_use]
pub fn gitlab_branch(name: &str, protected: bool) -> Value {
    json!({
        "name": name,
        "protected": protected,
        "default": false,
        "merged": false,
        "commit": gitlab_commit(
            "4f2a1c9be0d7a6b5c4d3e2f1a0b9c8d7e6f5a4b3",
            &format!("Tip of {name}\n\nDetails"),
            false
        )
    })
}

/// A GitLab `Commit` payload, optionally carrying diff statistics.
#[must_use]
pub fn gitlab_commit(sha: &str, message: &str, with_stats: bool) -> Value {
    let short_id: String = sha.chars().take(8).collect();
    let title = message.lines().next().unwrap_or_default();
    let mut commit = json!({
        "id": sha,
        "short_id": short_id,
        "title": title,
        "message": message,
        "author_name": "Alice",
        "author_email": "alice@example.com",
        "authored_date": "2024-04-01T08:00:00.000Z",
        "committer_name": "Bob",
        "committer_email": "bob@example.com",
        "committed_date": "2024-04-01T09:00:00.000Z",
        "parent_ids": ["1111111111111111111111111111111111111111"],
        "web_url": format!("https://gitlab.example.com/group/project/-/commit/{sha}")
    });
    if with_stats && let Some(object) = commit.as_object_mut() {
        object.insert(
            "stats".to_owned(),
            json!({ "additions": 10, "deletions": 2, "total": 12 }),
        );
    }
    commit
}

/// A GitLab `MergeRequest` payload.
#[must_use]
pub fn gitlab_merge_request(iid: u64, state: &str) -> Value {
    let finished_at = |expected: &str| {
        if state == expected {
            Value::from("2024-04-03T12:00:00.000Z")
        } else {
            Value::Null
        }
    };
    let merged_at = finished_at("merged");
    let closed_at = finished_at("closed");
    json!({
        "id": 5000 + iid,
        "iid": iid,
        "project_id": 42,
        "title": format!("Change {iid}"),
        "description": "Adds the thing",
        "state": state,
        "author": gitlab_user(5, "alice"),
        "source_branch": "feature/login",
        "target_branch": "main",
        "web_url": format!("https://gitlab.example.com/group/project/-/merge_requests/{iid}"),
        "created_at": "2024-04-01T08:00:00.000Z",
        "updated_at": "2024-04-03T12:00:00.000Z",
        "merged_at": merged_at,
        "closed_at": closed_at,
        "labels": ["enhancement"]
    })
}
