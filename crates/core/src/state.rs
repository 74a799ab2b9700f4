//! # Review State
//!
//! Derives the review state of a page version from the Jira issues returned by
//! a search.
//!
//! A page version is linked to an issue purely by summary: the issue summary
//! must equal `"{title} (v. {version})"` exactly. Only the first matching issue,
//! in the order returned by the search, determines the state.

use page_approvals_developer_platforms::models::{IssueSearchResult, PageContent, ReviewIssue};
use serde::Serialize;
use tracing::error;

use crate::config::{InstallationConfig, DEFAULT_APPROVED_STATUS, DEFAULT_REJECTED_STATUS};

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;

/// Visual severity of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Info,
    Warning,
    Confirmation,
    Error,
}

impl Appearance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Appearance::Info => "info",
            Appearance::Warning => "warning",
            Appearance::Confirmation => "confirmation",
            Appearance::Error => "error",
        }
    }
}

/// The review state of a page version. Derived on every view, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReviewState {
    /// No review issue exists for this version
    Draft,

    /// A review issue exists and is in neither the approved nor rejected status
    InReview,

    /// The review issue is in the approved status
    Approved,

    /// The review issue is in the rejected status
    Rejected,
}

impl ReviewState {
    pub fn appearance(&self) -> Appearance {
        match self {
            ReviewState::Draft => Appearance::Info,
            ReviewState::InReview => Appearance::Warning,
            ReviewState::Approved => Appearance::Confirmation,
            ReviewState::Rejected => Appearance::Error,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReviewState::Draft => "This version has not been sent for review",
            ReviewState::InReview => "This version is in review",
            ReviewState::Approved => "This version has been approved",
            ReviewState::Rejected => "This version has been rejected",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReviewState::Draft => "Draft",
            ReviewState::InReview => "In Review",
            ReviewState::Approved => "Approved",
            ReviewState::Rejected => "Rejected",
        }
    }
}

/// Tag shown next to an issue status in the review list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusAppearance {
    Default,
    Success,
    Removed,
    InProgress,
}

impl StatusAppearance {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusAppearance::Default => "default",
            StatusAppearance::Success => "success",
            StatusAppearance::Removed => "removed",
            StatusAppearance::InProgress => "inprogress",
        }
    }
}

/// Builds the summary that links an issue to a page version.
///
/// # Examples
///
/// ```
/// use page_approvals_core::state::review_summary;
///
/// assert_eq!(review_summary("Launch Plan", 3), "Launch Plan (v. 3)");
/// ```
pub fn review_summary(title: &str, version: u64) -> String {
    format!("{} (v. {})", title, version)
}

/// Derives the review state of a page version.
///
/// # Arguments
///
/// * `issues` - The raw search result, if a search was made
/// * `content` - The page, if one is in context
/// * `version` - The page version being reviewed
/// * `config` - The installation settings, if configured
pub fn derive_review_state(
    issues: Option<&IssueSearchResult>,
    content: Option<&PageContent>,
    version: u64,
    config: Option<&InstallationConfig>,
) -> ReviewState {
    let Some(result) = issues.filter(|r| !r.is_empty()) else {
        return ReviewState::Draft;
    };

    let Some(issue) = find_content_issue(&result.issues, content, version) else {
        return ReviewState::Draft;
    };

    let (approved, rejected) = status_labels(config);
    let status = issue.status_name();
    if status == approved {
        ReviewState::Approved
    } else if status == rejected {
        ReviewState::Rejected
    } else {
        ReviewState::InReview
    }
}

/// Finds the first issue whose summary matches the page version.
///
/// Without page content nothing can match; this is logged and treated as
/// "not found".
pub fn find_content_issue<'a>(
    issues: &'a [ReviewIssue],
    content: Option<&PageContent>,
    version: u64,
) -> Option<&'a ReviewIssue> {
    let Some(content) = content else {
        if !issues.is_empty() {
            error!(
                operation = "find_content_issue",
                "Cannot match review issues because the page content is not defined"
            );
        }
        return None;
    };

    let expected = review_summary(&content.title, version);
    issues.iter().find(|issue| issue.summary() == expected)
}

/// Chooses the tag for an issue status in the review list.
pub fn status_appearance(status: &str, config: Option<&InstallationConfig>) -> StatusAppearance {
    let Some(config) = config else {
        return StatusAppearance::Default;
    };

    if status == config.approved_status() {
        StatusAppearance::Success
    } else if status == config.rejected_status() {
        StatusAppearance::Removed
    } else {
        StatusAppearance::InProgress
    }
}

fn status_labels(config: Option<&InstallationConfig>) -> (&str, &str) {
    match config {
        Some(c) => (c.approved_status(), c.rejected_status()),
        None => (DEFAULT_APPROVED_STATUS, DEFAULT_REJECTED_STATUS),
    }
}
