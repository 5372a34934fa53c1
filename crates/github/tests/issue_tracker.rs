//! HTTP contract tests for `GitHubIssueTracker` against a mock GitHub.

use backlog::{IssueDraft, IssueId, IssueNumber, IssueTracker, LinkOutcome, TrackerError};
use github::{GitHubConfig, GitHubIssueTracker};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ISSUES: &str = "/repos/acme/widgets/issues";

fn tracker(server: &MockServer) -> GitHubIssueTracker {
    let config = GitHubConfig::new("acme/widgets".parse().unwrap(), "test-token").with_api_url(server.uri());
    GitHubIssueTracker::new(&config).unwrap()
}

fn draft() -> IssueDraft {
    IssueDraft {
        title: "[PALI-E1] Ingestion".into(),
        body: "body".into(),
        labels: vec!["Epics".into(), "E1".into(), "P0".into()],
    }
}

#[tokio::test]
async fn list_sends_auth_headers_and_paging_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ISSUES))
        .and(query_param("state", "all"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "2"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("x-github-api-version", "2022-11-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 11, "number": 1, "title": "[PALI-E1] Ingestion", "body": null,
                "state": "open", "labels": [{"name": "Epics"}],
                "html_url": "https://github.com/acme/widgets/issues/1"
            },
            {
                "id": 12, "number": 2, "title": "Bump deps", "body": "",
                "state": "open", "labels": [],
                "pull_request": {"url": "https://api.github.com/repos/acme/widgets/pulls/2"}
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let issues = tracker(&server).list_issues(2, 100).await.unwrap();

    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].id, IssueId::new(11));
    assert_eq!(issues[0].labels, vec!["Epics"]);
    assert!(!issues[0].is_pull_request);
    assert!(issues[1].is_pull_request);
}

#[tokio::test]
async fn list_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ISSUES))
        .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
        .mount(&server)
        .await;

    let err = tracker(&server).list_issues(1, 100).await.unwrap_err();
    assert_eq!(
        err,
        TrackerError::Status {
            status: 401,
            body: "Bad credentials".into()
        }
    );
}

#[tokio::test]
async fn create_posts_title_body_and_labels() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ISSUES))
        .and(body_json(json!({
            "title": "[PALI-E1] Ingestion",
            "body": "body",
            "labels": ["Epics", "E1", "P0"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 99, "number": 42, "html_url": "https://github.com/acme/widgets/issues/42"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = tracker(&server).create_issue(&draft()).await.unwrap();
    assert_eq!(created.number, IssueNumber::new(42));
    assert_eq!(
        created.html_url.as_deref(),
        Some("https://github.com/acme/widgets/issues/42")
    );
}

#[tokio::test]
async fn create_validation_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ISSUES))
        .respond_with(ResponseTemplate::new(422).set_body_string(r#"{"message":"Validation Failed"}"#))
        .mount(&server)
        .await;

    let err = tracker(&server).create_issue(&draft()).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn update_patches_the_numbered_issue() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("{ISSUES}/7")))
        .and(body_json(json!({
            "title": "[PALI-E1] Ingestion",
            "body": "body",
            "labels": ["Epics", "E1", "P0"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"number": 7})))
        .expect(1)
        .mount(&server)
        .await;

    tracker(&server)
        .update_issue(IssueNumber::new(7), &draft())
        .await
        .unwrap();
}

#[tokio::test]
async fn close_sends_only_the_state() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("{ISSUES}/8")))
        .and(body_json(json!({"state": "closed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"number": 8})))
        .expect(1)
        .mount(&server)
        .await;

    tracker(&server).close_issue(IssueNumber::new(8)).await.unwrap();
}

#[tokio::test]
async fn link_distinguishes_new_existing_and_failed_relationships() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{ISSUES}/1/sub_issues")))
        .and(body_json(json!({"sub_issue_id": 501})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"number": 1})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{ISSUES}/1/sub_issues")))
        .and(body_json(json!({"sub_issue_id": 502})))
        .respond_with(ResponseTemplate::new(422).set_body_string("already a sub-issue"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{ISSUES}/1/sub_issues")))
        .and(body_json(json!({"sub_issue_id": 503})))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let tracker = tracker(&server);
    let parent = IssueNumber::new(1);
    assert_eq!(
        tracker.add_sub_issue(parent, IssueId::new(501)).await.unwrap(),
        LinkOutcome::Linked
    );
    assert_eq!(
        tracker.add_sub_issue(parent, IssueId::new(502)).await.unwrap(),
        LinkOutcome::AlreadyLinked
    );
    let err = tracker.add_sub_issue(parent, IssueId::new(503)).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}
