//! Resource operation tests against a mocked TGit API.

use std::time::Duration;

use chrono::{Datelike, FixedOffset, Timelike};
use tgit::{
    compare, create_file, current_user, delete_file, get_file, get_merge_request_changes,
    get_raw_file, list_commit_refs, update_file, Branch, Commit, CompareOptions,
    CreateFileOptions, DeleteFileOptions, Get, GetFileOptions, List, ListBranchesOptions,
    ListCommitRefsOptions, ListCommitsOptions, ListMergeRequestsOptions, ListOptions,
    ListProjectsOptions, MergeRequest, ProjectId, ProjectItem, RetryPolicy, Tag, TgitClient,
    TgitError, Transport, UpdateFileOptions, User, VisibilityLevel,
};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> TgitClient {
    let transport = Transport::default().with_retry(RetryPolicy::None);
    TgitClient::new(transport, "test-token")
        .unwrap()
        .with_base_url(&server.uri())
        .unwrap()
}

#[tokio::test]
async fn test_list_projects_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/projects"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "30"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([
                    {
                        "id": 10,
                        "name": "app",
                        "path_with_namespace": "team/app",
                        "visibility_level": 10,
                        "default_branch": "master",
                        "created_at": "2020-05-06T10:00:00+0000"
                    },
                    {"id": 11, "path_with_namespace": "team/empty", "default_branch": ""}
                ]))
                .insert_header("X-Total", "57")
                .insert_header("X-Total-Pages", "2")
                .insert_header("X-Page", "1")
                .insert_header("X-Next-Page", "2"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = ListProjectsOptions {
        list: ListOptions::for_page(1, 30),
        ..Default::default()
    };
    let page = ProjectItem::list_page(&client(&server), &query).await.unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page.total(), 57);
    assert_eq!(page.response.total_pages, 2);
    assert!(page.has_more());
    assert_eq!(page.next_page(), Some(2));

    let app = &page.items[0];
    assert_eq!(app.path_with_namespace, "team/app");
    assert_eq!(app.visibility_level, VisibilityLevel::INTERNAL);
    assert!(app.has_default_branch());
    assert!(!page.items[1].has_default_branch());

    // "+0000" from the server is read as UTC+8 wall-clock time
    let created = app.created_at.unwrap();
    assert_eq!(created.offset(), &FixedOffset::east_opt(8 * 3600).unwrap());
    assert_eq!((created.year(), created.hour()), (2020, 10));
}

#[tokio::test]
async fn test_list_all_follows_next_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/projects/team%2Fapp/repository/branches"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"name": "master"}, {"name": "dev"}]))
                .insert_header("X-Next-Page", "2"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/projects/team%2Fapp/repository/branches"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"name": "release"}]))
                .insert_header("X-Next-Page", ""),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = (ProjectId::from("team/app"), ListBranchesOptions::default());
    let branches = Branch::list_all(&client(&server), &query).await.unwrap();

    let names: Vec<_> = branches.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["master", "dev", "release"]);
}

#[tokio::test]
async fn test_get_branch_escapes_project_and_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/api/v3/projects/team%2Fmy%2Eapp/repository/branches/feature%2Flogin",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "feature/login",
            "protected": true,
            "commit": {"id": "abc123", "short_id": "abc"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = (ProjectId::from("team/my.app"), "feature/login".to_string());
    let (branch, _) = Branch::get(&client(&server), id).await.unwrap();

    assert_eq!(branch.name, "feature/login");
    assert!(branch.protected);
    assert_eq!(branch.commit.unwrap().short_id, "abc");
}

#[tokio::test]
async fn test_dot_identifiers_never_leave_the_project_path() {
    let server = MockServer::start().await;
    let client = client(&server);

    let err = Branch::get(&client, (ProjectId::from(".."), "master".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, TgitError::InvalidArgument(_)));

    let err = Tag::get(&client, (ProjectId::Int(42), "..".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, TgitError::InvalidArgument(_)));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_numeric_project_id_is_used_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/projects/42/repository/tags/v1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "v1.0",
            "message": "first release"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (tag, _) = Tag::get(&client(&server), (ProjectId::Int(42), "v1.0".to_string()))
        .await
        .unwrap();
    assert_eq!(tag.message.as_deref(), Some("first release"));
}

#[tokio::test]
async fn test_list_tags() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/projects/42/repository/tags"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{"name": "v2"}, {"name": "v1"}])),
        )
        .mount(&server)
        .await;

    let query = (ProjectId::Int(42), Default::default());
    let page = Tag::list_page(&client(&server), &query).await.unwrap();
    assert_eq!(page.len(), 2);
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_list_commits_with_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/projects/42/repository/commits"))
        .and(query_param("ref_name", "dev"))
        .and(query_param("path", "README"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "c2", "parent_ids": ["c1", "b1"]},
            {"id": "c1", "parent_ids": ["c0"]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let options = ListCommitsOptions {
        ref_name: Some("dev".to_string()),
        path: Some("README".to_string()),
        ..Default::default()
    };
    let page = Commit::list_page(&client(&server), &(ProjectId::Int(42), options))
        .await
        .unwrap();

    assert!(page.items[0].is_merge());
    assert!(!page.items[1].is_merge());
}

#[tokio::test]
async fn test_get_commit_requires_sha() {
    let server = MockServer::start().await;

    let err = Commit::get(&client(&server), (ProjectId::Int(42), String::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, TgitError::InvalidArgument(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_commit_refs() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/projects/42/repository/commits/abc123/refs"))
        .and(query_param("type", "tag"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"type": "tag", "name": "v1"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let options = ListCommitRefsOptions {
        ref_type: Some("tag".to_string()),
        ..Default::default()
    };
    let page = list_commit_refs(&client(&server), &ProjectId::Int(42), "abc123", &options)
        .await
        .unwrap();

    assert_eq!(page.items[0].ref_type, "tag");
    assert_eq!(page.items[0].name, "v1");
}

#[tokio::test]
async fn test_list_merge_requests_by_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/projects/team%2Fapp/merge_requests"))
        .and(query_param("state", "opened"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 100, "iid": 3, "title": "Add feature", "state": "opened",
             "source_branch": "feature", "target_branch": "master"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let options = ListMergeRequestsOptions {
        state: Some("opened".to_string()),
        ..Default::default()
    };
    let page = MergeRequest::list_page(&client(&server), &("team/app".into(), options))
        .await
        .unwrap();

    assert_eq!(page.items[0].iid, 3);
    assert!(page.items[0].files.is_empty());
}

#[tokio::test]
async fn test_merge_request_changes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/projects/42/merge_request/100/changes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 100,
            "iid": 3,
            "files": [
                {"old_path": "a", "new_path": "a", "additions": 5, "deletions": 2},
                {"old_path": "b", "new_path": "c", "renamed_file": true, "additions": 1}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (mr, _) = get_merge_request_changes(&client(&server), &ProjectId::Int(42), 100)
        .await
        .unwrap();

    assert_eq!(mr.files.len(), 2);
    assert_eq!(mr.line_changes(), (6, 2));
}

#[tokio::test]
async fn test_compare_refs() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/projects/42/repository/compare"))
        .and(query_param("from", "v1"))
        .and(query_param("to", "master"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "commits": [{"id": "c1"}],
            "diffs": [{"old_path": "x", "new_path": "x", "additions": 1}],
            "commits_total": 1,
            "files_total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (cmp, _) = compare(&client(&server), &ProjectId::Int(42), &CompareOptions::new("v1", "master"))
        .await
        .unwrap();

    assert_eq!(cmp.commits_total, 1);
    assert_eq!(cmp.diffs[0].additions, 1);
}

#[tokio::test]
async fn test_get_file_at_ref() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/projects/42/repository/files"))
        .and(query_param("file_path", "src/lib.rs"))
        .and(query_param("ref", "dev"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "file_name": "lib.rs",
            "file_path": "src/lib.rs",
            "size": 4,
            "encoding": "base64",
            "content": "Ly8K",
            "ref": "dev"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = GetFileOptions::new("src/lib.rs").at("dev");
    let (file, _) = get_file(&client(&server), &ProjectId::Int(42), &options)
        .await
        .unwrap();

    assert_eq!(file.git_ref, "dev");
    assert_eq!(file.content, "Ly8K");
}

#[tokio::test]
async fn test_get_raw_file_streams_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/projects/42/repository/blobs/master"))
        .and(query_param("filepath", "README"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# Title\n"))
        .expect(1)
        .mount(&server)
        .await;

    let mut out = Vec::new();
    get_raw_file(&client(&server), &ProjectId::Int(42), "master", "README", &mut out)
        .await
        .unwrap();

    assert_eq!(out, b"# Title\n");
}

#[tokio::test]
async fn test_file_writes_send_json_bodies() {
    let server = MockServer::start().await;
    let files_path = "/api/v3/projects/team%2Fapp/repository/files";
    let info = serde_json::json!({"file_path": "a.txt", "branch_name": "master"});

    Mock::given(method("POST"))
        .and(path(files_path))
        .and(body_json(serde_json::json!({
            "file_path": "a.txt",
            "branch_name": "master",
            "content": "hi",
            "commit_message": "add a"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&info))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(files_path))
        .and(body_json(serde_json::json!({
            "file_path": "a.txt",
            "branch_name": "master",
            "encoding": "text",
            "content": "hello",
            "commit_message": "edit a"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&info))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(files_path))
        .and(body_json(serde_json::json!({
            "file_path": "a.txt",
            "branch_name": "master",
            "commit_message": "drop a"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&info))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let project = ProjectId::from("team/app");

    let create = CreateFileOptions {
        file_path: "a.txt".to_string(),
        branch_name: "master".to_string(),
        encoding: None,
        content: "hi".to_string(),
        commit_message: "add a".to_string(),
    };
    let (created, response) = create_file(&client, &project, &create).await.unwrap();
    assert_eq!(created.branch_name, "master");
    assert_eq!(response.status.as_u16(), 201);

    let update = UpdateFileOptions {
        file_path: "a.txt".to_string(),
        branch_name: "master".to_string(),
        encoding: Some("text".to_string()),
        content: "hello".to_string(),
        commit_message: "edit a".to_string(),
    };
    update_file(&client, &project, &update).await.unwrap();

    let delete = DeleteFileOptions {
        file_path: "a.txt".to_string(),
        branch_name: "master".to_string(),
        commit_message: "drop a".to_string(),
    };
    let (deleted, _) = delete_file(&client, &project, &delete).await.unwrap();
    assert_eq!(deleted.file_path, "a.txt");
}

#[tokio::test]
async fn test_current_user_and_user_by_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1, "username": "me", "state": "active"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/users/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 2, "username": "alice", "state": "blocked"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let (me, _) = current_user(&client).await.unwrap();
    assert!(me.is_active());

    let (alice, _) = User::get(&client, "alice".to_string()).await.unwrap();
    assert_eq!(alice.id, 2);
    assert!(!alice.is_active());
}

#[tokio::test]
async fn test_list_all_stops_on_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/projects"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"id": 1}]))
                .insert_header("X-Next-Page", "2"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/projects"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let transport = Transport::default().with_retry(RetryPolicy::Linear {
        delay: Duration::from_millis(1),
        max_retries: 1,
    });
    let client = TgitClient::new(transport, "test-token")
        .unwrap()
        .with_base_url(&server.uri())
        .unwrap();

    let err = ProjectItem::list_all(&client, &ListProjectsOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(500));
}
