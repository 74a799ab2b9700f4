use super::*;
use crate::models::{
    AdfDocument, AdfNode, IssueTypeReference, NewIssueFields, ProjectReference,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BASIC_AUTH_HEADER: &str = "Basic bWVAZXhhbXBsZS5jb206c2VjcmV0LXRva2Vu";

fn basic_credentials() -> Credentials {
    Credentials::Basic {
        email: "me@example.com".to_string(),
        api_token: "secret-token".to_string(),
    }
}

async fn client_for(server: &MockServer) -> AtlassianClient {
    create_client(&server.uri(), basic_credentials()).expect("Failed to create client")
}

fn sample_new_issue() -> NewIssue {
    NewIssue {
        fields: NewIssueFields {
            project: ProjectReference {
                key: "DOC".to_string(),
            },
            issue_type: IssueTypeReference {
                id: "10002".to_string(),
            },
            assignee: None,
            summary: "Launch Plan (v. 1)".to_string(),
            description: AdfDocument::new(vec![AdfNode::paragraph(vec![AdfNode::text(
                "View latest version",
            )])]),
        },
    }
}

#[test]
fn test_credentials_debug_redacts_secrets() {
    let basic = format!("{:?}", basic_credentials());
    assert!(basic.contains("me@example.com"));
    assert!(!basic.contains("secret-token"));

    let bearer = format!("{:?}", Credentials::Bearer("abc123".to_string()));
    assert!(!bearer.contains("abc123"));
}

#[test]
fn test_base_url_trailing_slash_is_removed() {
    let client = AtlassianClient::new(
        Client::new(),
        "https://example.atlassian.net/",
        Credentials::Anonymous,
    );

    assert_eq!(client.base_url(), "https://example.atlassian.net");
}

#[tokio::test]
async fn test_get_page_content_sends_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/rest/api/content/65537"))
        .and(header("authorization", BASIC_AUTH_HEADER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "65537",
            "title": "Launch Plan",
            "version": { "number": 3 },
            "_links": { "webui": "/spaces/DOC/pages/65537/Launch+Plan" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let content = client
        .get_page_content("65537")
        .await
        .expect("Content fetch should succeed");

    assert_eq!(content.title, "Launch Plan");
    assert_eq!(content.version_number(), 3);
}

#[tokio::test]
async fn test_get_page_content_sends_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/rest/api/content/1"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1",
            "title": "T",
            "version": { "number": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server.uri(), Credentials::Bearer("abc123".to_string()))
        .expect("Failed to create client");

    assert!(client.get_page_content("1").await.is_ok());
}

#[tokio::test]
async fn test_get_page_content_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/rest/api/content/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "statusCode": 404,
            "message": "No content found with id"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.get_page_content("404").await;

    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_get_page_content_invalid_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/rest/api/content/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.get_page_content("7").await;

    assert!(matches!(result, Err(Error::InvalidResponse)));
}

#[tokio::test]
async fn test_list_projects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/3/project"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "10000", "key": "DOC", "name": "Documentation" },
            { "id": "10001", "key": "OPS", "name": "Operations" }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let projects = client.list_projects().await.expect("Listing should succeed");

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].key, "DOC");
    assert_eq!(projects[1].name, "Operations");
}

#[tokio::test]
async fn test_list_issue_types_keeps_subtasks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/3/issuetype"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "10001", "name": "Task", "subtask": false },
            { "id": "10003", "name": "Sub-task", "subtask": true }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let issue_types = client
        .list_issue_types()
        .await
        .expect("Listing should succeed");

    assert_eq!(issue_types.len(), 2);
    assert!(issue_types[1].subtask);
}

#[tokio::test]
async fn test_list_projects_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/3/project"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.list_projects().await;

    assert!(matches!(result, Err(Error::AuthError(_))));
}

#[tokio::test]
async fn test_search_issues_posts_jql_and_max_results() {
    let server = MockServer::start().await;
    let jql = "project = \"DOC\" AND summary ~ \"Launch Plan\" ORDER BY createdDate DESC";
    Mock::given(method("POST"))
        .and(path("/rest/api/3/search"))
        .and(body_json(json!({ "jql": jql, "maxResults": 50 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "issues": [{
                "key": "DOC-1",
                "fields": {
                    "summary": "Launch Plan (v. 1)",
                    "status": { "name": "In Progress" },
                    "created": "2024-01-15T10:30:00.000+0000",
                    "updated": "2024-01-15T10:30:00.000+0000"
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client
        .search_issues(jql, 50)
        .await
        .expect("Search should succeed");

    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].key, "DOC-1");
}

#[tokio::test]
async fn test_search_issues_bad_request_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/3/search"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string("{\"errorMessages\":[\"The value 'DOC' does not exist\"]}"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.search_issues("project = \"DOC\"", 10).await;

    match result {
        Err(Error::UnexpectedStatus(operation, status, body)) => {
            assert_eq!(operation, "search_issues");
            assert_eq!(status, 400);
            assert!(body.contains("does not exist"));
        }
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_search_issues_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/3/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.search_issues("project = \"DOC\"", 10).await;

    assert!(matches!(result, Err(Error::RateLimitExceeded)));
}

#[tokio::test]
async fn test_create_issue_posts_fields() {
    let server = MockServer::start().await;
    let issue = sample_new_issue();
    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .and(body_json(serde_json::to_value(&issue).expect("serializable")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "10011",
            "key": "DOC-3",
            "self": "https://example.atlassian.net/rest/api/3/issue/10011"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let created = client
        .create_issue(&issue)
        .await
        .expect("Creation should succeed");

    assert_eq!(created.key, "DOC-3");
}

#[tokio::test]
async fn test_create_issue_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.create_issue(&sample_new_issue()).await;

    assert!(matches!(result, Err(Error::UnexpectedStatus(_, 500, _))));
}
