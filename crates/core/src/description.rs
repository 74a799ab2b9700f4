//! # Review Issue Description
//!
//! Builds the create-issue payload for a review request. The description links
//! the reviewer to the latest version of the page and, from version 2 onwards,
//! to the diff against the previous version.

use page_approvals_developer_platforms::models::{
    AccountReference, AdfDocument, AdfNode, IssueTypeReference, NewIssue, NewIssueFields,
    PageContent, ProjectReference,
};

use crate::config::InstallationConfig;
use crate::state::review_summary;

#[cfg(test)]
#[path = "description_tests.rs"]
mod tests;

/// Link text pointing to the latest version of the page
pub const LATEST_VERSION_LINK_TEXT: &str = "View latest version";

/// Link text pointing to the diff with the previous version
pub const CHANGES_LINK_TEXT: &str = "View what's changed";

const LATEST_VERSION_EMOJI: &str = ":check_mark:";

const CHANGES_EMOJI: &str = ":question_mark:";

/// Builds the issue description for a review of `version` of the page.
///
/// # Examples
///
/// ```
/// use page_approvals_core::description::build_review_description;
/// use page_approvals_developer_platforms::models::{PageContent, PageLinks, PageVersion};
///
/// let content = PageContent {
///     id: "65537".to_string(),
///     title: "Launch Plan".to_string(),
///     version: PageVersion { number: 1 },
///     links: PageLinks { web_ui: "/spaces/DOC/pages/65537".to_string() },
/// };
///
/// let description = build_review_description(&content, 1);
///
/// // Version 1 has nothing to diff against
/// assert_eq!(description.links().len(), 1);
/// ```
pub fn build_review_description(content: &PageContent, version: u64) -> AdfDocument {
    let mut paragraphs = vec![AdfNode::paragraph(vec![
        AdfNode::emoji(LATEST_VERSION_EMOJI),
        AdfNode::text(" "),
        AdfNode::link(LATEST_VERSION_LINK_TEXT, &latest_version_href(content)),
    ])];

    if let Some(href) = changes_href(content, version) {
        paragraphs.push(AdfNode::paragraph(vec![
            AdfNode::emoji(CHANGES_EMOJI),
            AdfNode::text(" "),
            AdfNode::link(CHANGES_LINK_TEXT, &href),
        ]));
    }

    AdfDocument::new(paragraphs)
}

/// Builds the complete create-issue request for a review of `version`.
pub fn build_review_issue(
    content: &PageContent,
    version: u64,
    config: &InstallationConfig,
) -> NewIssue {
    NewIssue {
        fields: NewIssueFields {
            project: ProjectReference {
                key: config.project_key.clone(),
            },
            issue_type: IssueTypeReference {
                id: config.issue_type_id.clone(),
            },
            assignee: config
                .assignee_id()
                .map(|id| AccountReference { id: id.to_string() }),
            summary: review_summary(&content.title, version),
            description: build_review_description(content, version),
        },
    }
}

/// The diff link between `version - 1` and `version`, or `None` for the first version.
pub fn changes_href(content: &PageContent, version: u64) -> Option<String> {
    if version <= 1 {
        return None;
    }

    Some(format!(
        "/wiki/pages/diffpagesbyversion.action?pageId={}&originalVersion={}&revisedVersion={}",
        content.id,
        version - 1,
        version
    ))
}

/// The link to the latest version of the page.
pub fn latest_version_href(content: &PageContent) -> String {
    format!("/wiki{}", content.web_ui_path())
}
