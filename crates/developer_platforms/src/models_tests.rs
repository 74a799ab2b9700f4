use super::*;
use chrono::{Datelike, Timelike};
use serde_json::{from_str, json, to_value};

#[test]
fn test_page_content_deserialization() {
    let json_str = r#"{
        "id": "65537",
        "type": "page",
        "status": "current",
        "title": "Launch Plan",
        "version": { "number": 4, "minorEdit": false },
        "_links": {
            "webui": "/spaces/DOC/pages/65537/Launch+Plan",
            "self": "https://example.atlassian.net/wiki/rest/api/content/65537"
        }
    }"#;

    let content: PageContent = from_str(json_str).expect("Failed to deserialize PageContent");

    assert_eq!(content.id, "65537");
    assert_eq!(content.title, "Launch Plan");
    assert_eq!(content.version_number(), 4);
    assert_eq!(content.web_ui_path(), "/spaces/DOC/pages/65537/Launch+Plan");
}

#[test]
fn test_page_content_without_links() {
    let json_str = r#"{ "id": "1", "title": "T", "version": { "number": 1 } }"#;

    let content: PageContent = from_str(json_str).expect("Failed to deserialize PageContent");

    assert_eq!(content.web_ui_path(), "");
}

#[test]
fn test_issue_search_result_deserialization() {
    let json_str = r#"{
        "startAt": 0,
        "maxResults": 50,
        "total": 2,
        "issues": [
            {
                "id": "10010",
                "key": "DOC-2",
                "fields": {
                    "summary": "Launch Plan (v. 2)",
                    "status": { "name": "In Progress", "id": "3" },
                    "created": "2024-01-15T10:30:00.000+0000",
                    "updated": "2024-01-16T08:00:00.000+0100"
                }
            },
            {
                "id": "10009",
                "key": "DOC-1",
                "fields": {
                    "summary": "Launch Plan (v. 1)",
                    "status": { "name": "Approved" },
                    "created": "2024-01-10T10:30:00.000+0000",
                    "updated": "2024-01-11T10:30:00.000+0000"
                }
            }
        ]
    }"#;

    let result: IssueSearchResult =
        from_str(json_str).expect("Failed to deserialize IssueSearchResult");

    assert_eq!(result.total, Some(2));
    assert_eq!(result.issues.len(), 2);
    assert_eq!(result.issues[0].key, "DOC-2");
    assert_eq!(result.issues[0].summary(), "Launch Plan (v. 2)");
    assert_eq!(result.issues[0].status_name(), "In Progress");
    assert_eq!(result.issues[1].status_name(), "Approved");
}

#[test]
fn test_issue_search_result_without_issues() {
    let result: IssueSearchResult = from_str("{}").expect("Failed to deserialize");

    assert!(result.is_empty());
    assert_eq!(result.total, None);
}

#[test]
fn test_issue_timestamps_parse_jira_offset_format() {
    let issue = ReviewIssue {
        key: "DOC-1".to_string(),
        fields: IssueFields {
            summary: "Launch Plan (v. 1)".to_string(),
            status: IssueStatus {
                name: "Approved".to_string(),
            },
            created: "2024-01-15T10:30:00.000+0000".to_string(),
            updated: "2024-02-01T23:05:09.123+0200".to_string(),
        },
    };

    let created = issue.created_at().expect("created should parse");
    assert_eq!(created.year(), 2024);
    assert_eq!(created.month(), 1);
    assert_eq!(created.day(), 15);
    assert_eq!(created.hour(), 10);

    let updated = issue.updated_at().expect("updated should parse");
    assert_eq!(updated.offset().local_minus_utc(), 2 * 3600);
}

#[test]
fn test_parse_jira_timestamp_accepts_rfc3339() {
    assert!(parse_jira_timestamp("2024-01-15T10:30:00Z").is_some());
    assert!(parse_jira_timestamp("2024-01-15T10:30:00.000+00:00").is_some());
}

#[test]
fn test_parse_jira_timestamp_rejects_garbage() {
    assert!(parse_jira_timestamp("").is_none());
    assert!(parse_jira_timestamp("yesterday").is_none());
}

#[test]
fn test_issue_type_subtask_defaults_to_false() {
    let issue_type: IssueType =
        from_str(r#"{ "id": "10001", "name": "Task" }"#).expect("Failed to deserialize");

    assert!(!issue_type.subtask);
}

#[test]
fn test_search_request_serialization() {
    let request = SearchRequest {
        jql: "project = \"DOC\"".to_string(),
        max_results: 50,
    };

    let value = to_value(&request).expect("Failed to serialize SearchRequest");

    assert_eq!(value, json!({ "jql": "project = \"DOC\"", "maxResults": 50 }));
}

#[test]
fn test_new_issue_serialization_omits_missing_assignee() {
    let issue = NewIssue {
        fields: NewIssueFields {
            project: ProjectReference {
                key: "DOC".to_string(),
            },
            issue_type: IssueTypeReference {
                id: "10002".to_string(),
            },
            assignee: None,
            summary: "Launch Plan (v. 1)".to_string(),
            description: AdfDocument::new(vec![]),
        },
    };

    let value = to_value(&issue).expect("Failed to serialize NewIssue");

    assert_eq!(value["fields"]["project"]["key"], "DOC");
    assert_eq!(value["fields"]["issuetype"]["id"], "10002");
    assert_eq!(value["fields"]["summary"], "Launch Plan (v. 1)");
    assert!(value["fields"].get("assignee").is_none());
}

#[test]
fn test_new_issue_serialization_includes_assignee() {
    let issue = NewIssue {
        fields: NewIssueFields {
            project: ProjectReference {
                key: "DOC".to_string(),
            },
            issue_type: IssueTypeReference {
                id: "10002".to_string(),
            },
            assignee: Some(AccountReference {
                id: "5b10ac8d82e05b22cc7d4ef5".to_string(),
            }),
            summary: "Launch Plan (v. 1)".to_string(),
            description: AdfDocument::new(vec![]),
        },
    };

    let value = to_value(&issue).expect("Failed to serialize NewIssue");

    assert_eq!(value["fields"]["assignee"]["id"], "5b10ac8d82e05b22cc7d4ef5");
}

#[test]
fn test_adf_document_serialization_matches_wire_format() {
    let doc = AdfDocument::new(vec![AdfNode::paragraph(vec![
        AdfNode::emoji(":check_mark:"),
        AdfNode::text(" "),
        AdfNode::link("View latest version", "/wiki/spaces/DOC/pages/1"),
    ])]);

    let value = to_value(&doc).expect("Failed to serialize AdfDocument");

    assert_eq!(
        value,
        json!({
            "type": "doc",
            "version": 1,
            "content": [{
                "type": "paragraph",
                "content": [
                    {
                        "type": "emoji",
                        "attrs": { "shortName": ":check_mark:", "text": ":check_mark:" }
                    },
                    { "type": "text", "text": " " },
                    {
                        "type": "text",
                        "text": "View latest version",
                        "marks": [{
                            "type": "link",
                            "attrs": {
                                "href": "/wiki/spaces/DOC/pages/1",
                                "title": "View latest version"
                            }
                        }]
                    }
                ]
            }]
        })
    );
}

#[test]
fn test_adf_document_links_are_collected_in_order() {
    let doc = AdfDocument::new(vec![
        AdfNode::paragraph(vec![AdfNode::link("first", "/a")]),
        AdfNode::paragraph(vec![AdfNode::emoji(":x:"), AdfNode::link("second", "/b")]),
    ]);

    let links = doc.links();

    assert_eq!(links.len(), 2);
    assert_eq!(links[0].title, "first");
    assert_eq!(links[1].href, "/b");
}

#[test]
fn test_created_issue_deserialization() {
    let created: CreatedIssue = from_str(
        r#"{ "id": "10011", "key": "DOC-3", "self": "https://example.atlassian.net/rest/api/3/issue/10011" }"#,
    )
    .expect("Failed to deserialize CreatedIssue");

    assert_eq!(created.key, "DOC-3");
}
