//! # Models
//!
//! This module contains the data models exchanged with the Confluence and Jira
//! REST APIs.
//!
//! The read models (`PageContent`, `ReviewIssue`, `Project`, `IssueType`) mirror
//! the subset of the JSON responses that Page Approvals needs. The write models
//! (`NewIssue`, `AdfDocument`) describe the create-issue payload, including the
//! Atlassian Document Format description.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// The Jira timestamp format, e.g. `2024-01-15T10:30:00.000+0000`.
const JIRA_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// A snapshot of the Confluence page being reviewed.
///
/// # Examples
///
/// ```
/// use page_approvals_developer_platforms::models::{PageContent, PageLinks, PageVersion};
///
/// let content = PageContent {
///     id: "65537".to_string(),
///     title: "Launch Plan".to_string(),
///     version: PageVersion { number: 3 },
///     links: PageLinks {
///         web_ui: "/spaces/DOC/pages/65537/Launch+Plan".to_string(),
///     },
/// };
///
/// assert_eq!(content.version_number(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    /// The opaque content identifier
    pub id: String,

    /// The page title
    pub title: String,

    /// The current version of the page
    pub version: PageVersion,

    /// Relative links to the page
    #[serde(rename = "_links", default)]
    pub links: PageLinks,
}

impl PageContent {
    /// The current version number of the page.
    pub fn version_number(&self) -> u64 {
        self.version.number
    }

    /// The relative web UI path of the page, without the `/wiki` prefix.
    pub fn web_ui_path(&self) -> &str {
        &self.links.web_ui
    }
}

/// The version block of a Confluence content response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageVersion {
    /// Monotonically increasing edit counter, starting at 1
    pub number: u64,
}

/// The `_links` block of a Confluence content response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    /// Relative link to the latest version of the page
    #[serde(rename = "webui", default)]
    pub web_ui: String,
}

/// A Jira project, as offered in the configuration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// The numeric project id, as a string
    #[serde(default)]
    pub id: String,

    /// The project key, e.g. `DOC`
    pub key: String,

    /// The display name of the project
    pub name: String,
}

/// A Jira issue type, as offered in the configuration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueType {
    /// The issue type id
    pub id: String,

    /// The display name of the issue type
    pub name: String,

    /// Whether this is a sub-task issue type
    #[serde(default)]
    pub subtask: bool,
}

/// A Jira issue returned by a search, tracking one review cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewIssue {
    /// The human readable issue key, e.g. `DOC-12`
    pub key: String,

    /// The issue fields used by Page Approvals
    pub fields: IssueFields,
}

impl ReviewIssue {
    /// The issue summary.
    pub fn summary(&self) -> &str {
        &self.fields.summary
    }

    /// The name of the current workflow status.
    pub fn status_name(&self) -> &str {
        &self.fields.status.name
    }

    /// The creation time, if Jira supplied a parsable timestamp.
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_jira_timestamp(&self.fields.created)
    }

    /// The last update time, if Jira supplied a parsable timestamp.
    pub fn updated_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_jira_timestamp(&self.fields.updated)
    }
}

/// The `fields` block of a Jira issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFields {
    /// The issue summary, expected to be `"{title} (v. {version})"`
    #[serde(default)]
    pub summary: String,

    /// The workflow status
    pub status: IssueStatus,

    /// Raw creation timestamp
    #[serde(default)]
    pub created: String,

    /// Raw last update timestamp
    #[serde(default)]
    pub updated: String,
}

/// The workflow status of a Jira issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStatus {
    /// The status name, e.g. `In Progress`
    pub name: String,
}

/// The result of a JQL search, in the order returned by Jira.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSearchResult {
    /// The returned issues
    #[serde(default)]
    pub issues: Vec<ReviewIssue>,

    /// The total number of issues matching the query, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl IssueSearchResult {
    /// Returns `true` when the search returned no issues.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// The body of a `POST /rest/api/3/search` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The JQL query
    pub jql: String,

    /// The maximum number of issues to return
    #[serde(rename = "maxResults")]
    pub max_results: u32,
}

/// The body of a `POST /rest/api/3/issue` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssue {
    /// The fields of the issue to create
    pub fields: NewIssueFields,
}

/// The fields of an issue to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssueFields {
    /// The target project
    pub project: ProjectReference,

    /// The issue type
    #[serde(rename = "issuetype")]
    pub issue_type: IssueTypeReference,

    /// The account the issue is assigned to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<AccountReference>,

    /// The issue summary
    pub summary: String,

    /// The issue description in Atlassian Document Format
    pub description: AdfDocument,
}

/// Reference to a project by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReference {
    pub key: String,
}

/// Reference to an issue type by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTypeReference {
    pub id: String,
}

/// Reference to a user account by account id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountReference {
    pub id: String,
}

/// The response of a successful issue creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    /// The numeric issue id, as a string
    pub id: String,

    /// The issue key, e.g. `DOC-13`
    pub key: String,
}

/// A minimal Atlassian Document Format document.
///
/// Only the node types Page Approvals writes are modelled: paragraphs holding
/// emoji and (optionally linked) text.
///
/// # Examples
///
/// ```
/// use page_approvals_developer_platforms::models::{AdfDocument, AdfNode};
///
/// let doc = AdfDocument::new(vec![AdfNode::paragraph(vec![AdfNode::text(" ")])]);
/// let json = serde_json::to_value(&doc).unwrap();
///
/// assert_eq!(json["type"], "doc");
/// assert_eq!(json["version"], 1);
/// assert_eq!(json["content"][0]["type"], "paragraph");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdfDocument {
    /// Always `doc`
    #[serde(rename = "type")]
    pub doc_type: String,

    /// Always `1`
    pub version: u32,

    /// The top level block nodes
    pub content: Vec<AdfNode>,
}

impl AdfDocument {
    /// Creates a version 1 document with the given block nodes.
    pub fn new(content: Vec<AdfNode>) -> Self {
        Self {
            doc_type: "doc".to_string(),
            version: 1,
            content,
        }
    }

    /// Collects every link mark in document order.
    pub fn links(&self) -> Vec<&AdfLinkAttributes> {
        let mut links = Vec::new();
        for node in &self.content {
            node.collect_links(&mut links);
        }
        links
    }
}

/// A node of an Atlassian Document Format document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AdfNode {
    /// A block of inline nodes
    Paragraph { content: Vec<AdfNode> },

    /// An emoji, e.g. `:check_mark:`
    Emoji { attrs: AdfEmojiAttributes },

    /// A run of text with optional marks
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<AdfMark>,
    },
}

impl AdfNode {
    /// Creates a paragraph node.
    pub fn paragraph(content: Vec<AdfNode>) -> Self {
        AdfNode::Paragraph { content }
    }

    /// Creates an emoji node whose fallback text equals its short name.
    pub fn emoji(short_name: &str) -> Self {
        AdfNode::Emoji {
            attrs: AdfEmojiAttributes {
                short_name: short_name.to_string(),
                text: short_name.to_string(),
            },
        }
    }

    /// Creates a plain text node.
    pub fn text(text: &str) -> Self {
        AdfNode::Text {
            text: text.to_string(),
            marks: Vec::new(),
        }
    }

    /// Creates a text node linking to `href`, using the text as link title.
    pub fn link(text: &str, href: &str) -> Self {
        AdfNode::Text {
            text: text.to_string(),
            marks: vec![AdfMark::Link {
                attrs: AdfLinkAttributes {
                    href: href.to_string(),
                    title: text.to_string(),
                },
            }],
        }
    }

    fn collect_links<'a>(&'a self, links: &mut Vec<&'a AdfLinkAttributes>) {
        match self {
            AdfNode::Paragraph { content } => {
                for node in content {
                    node.collect_links(links);
                }
            }
            AdfNode::Emoji { .. } => {}
            AdfNode::Text { marks, .. } => {
                for mark in marks {
                    let AdfMark::Link { attrs } = mark;
                    links.push(attrs);
                }
            }
        }
    }
}

/// Attributes of an emoji node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdfEmojiAttributes {
    #[serde(rename = "shortName")]
    pub short_name: String,
    pub text: String,
}

/// A mark applied to a text node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AdfMark {
    /// A hyperlink
    Link { attrs: AdfLinkAttributes },
}

/// Attributes of a link mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdfLinkAttributes {
    pub href: String,
    pub title: String,
}

/// Parses a Jira timestamp, accepting RFC 3339 as well as Jira's
/// `+0000` offset notation.
pub fn parse_jira_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, JIRA_TIMESTAMP_FORMAT))
        .ok()
}
