//! # View Model
//!
//! A plain data projection of a [`ReviewSession`] that any rendering layer
//! (terminal, web page, report) can draw. Exactly one of the three views is
//! produced for a session, selected by its render mode.

use chrono::{DateTime, FixedOffset};
use page_approvals_developer_platforms::models::ReviewIssue;
use serde::Serialize;

use crate::config::InstallationConfig;
use crate::session::{RenderMode, ReviewSession};
use crate::state::{status_appearance, Appearance, ReviewState, StatusAppearance};

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;

/// Title of the error panel
pub const APP_TITLE: &str = "Approve Pages";

/// Number of review issues per page of the review list
pub const APPROVALS_PAGE_SIZE: usize = 10;

pub const SEND_FOR_REVIEW_LABEL: &str = "Send for review";

pub const SHOW_REVIEWS_LABEL: &str = "Show reviews";

pub const BACK_LABEL: &str = "<- View status";

/// The view to render for a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ReviewView {
    Notice(NoticePanel),
    State(StatePanel),
    Approvals(ApprovalsTable),
}

impl ReviewView {
    /// Projects the session into the view for its current render mode.
    pub fn project(session: &ReviewSession, config: Option<&InstallationConfig>) -> Self {
        match session.render_mode() {
            RenderMode::Error => ReviewView::Notice(NoticePanel {
                title: APP_TITLE.to_string(),
                message: session.error_text().to_string(),
                appearance: Appearance::Error,
            }),
            RenderMode::State => ReviewView::State(StatePanel::from_session(session)),
            RenderMode::Approvals => {
                let issues = session
                    .issues()
                    .map(|r| r.issues.as_slice())
                    .unwrap_or_default();
                ReviewView::Approvals(ApprovalsTable::new(issues, config))
            }
        }
    }
}

/// An error-style panel, used for missing configuration and failed fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticePanel {
    pub title: String,
    pub message: String,
    pub appearance: Appearance,
}

/// The review state of the page version with the available actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatePanel {
    /// e.g. `Approved (v. 3)`
    pub title: String,
    pub text: String,
    pub appearance: Appearance,
    pub state: ReviewState,
    pub send_for_review_enabled: bool,
    pub show_reviews_enabled: bool,
}

impl StatePanel {
    fn from_session(session: &ReviewSession) -> Self {
        let state = session.state();
        Self {
            title: format!("{} (v. {})", state.title(), session.content_version()),
            text: state.description().to_string(),
            appearance: state.appearance(),
            state,
            send_for_review_enabled: session.can_send_for_review(),
            show_reviews_enabled: session.can_show_reviews(),
        }
    }
}

/// One review issue in the review list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalRow {
    pub key: String,
    pub summary: String,

    /// Relative link to the issue, e.g. `/browse/DOC-3`
    pub link: String,

    /// Parsed creation time, `None` when Jira sent an unparsable value
    pub created: Option<DateTime<FixedOffset>>,

    /// Raw creation timestamp as sent by Jira
    pub created_raw: String,

    pub updated: Option<DateTime<FixedOffset>>,
    pub updated_raw: String,
    pub status: String,
    pub status_appearance: StatusAppearance,
}

impl ApprovalRow {
    fn from_issue(issue: &ReviewIssue, config: Option<&InstallationConfig>) -> Self {
        Self {
            key: issue.key.clone(),
            summary: issue.summary().to_string(),
            link: format!("/browse/{}", issue.key),
            created: issue.created_at(),
            created_raw: issue.fields.created.clone(),
            updated: issue.updated_at(),
            updated_raw: issue.fields.updated.clone(),
            status: issue.status_name().to_string(),
            status_appearance: status_appearance(issue.status_name(), config),
        }
    }
}

/// The paginated list of every issue returned by the search.
///
/// Rows are listed as returned, including issues whose summary does not match
/// the current page version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalsTable {
    pub rows: Vec<ApprovalRow>,
    pub page_size: usize,
}

impl ApprovalsTable {
    pub fn new(issues: &[ReviewIssue], config: Option<&InstallationConfig>) -> Self {
        Self {
            rows: issues
                .iter()
                .map(|issue| ApprovalRow::from_issue(issue, config))
                .collect(),
            page_size: APPROVALS_PAGE_SIZE,
        }
    }

    /// The rows of a 1-based page. Page 0 and pages past the end are empty.
    pub fn page(&self, number: usize) -> &[ApprovalRow] {
        if number == 0 {
            return &[];
        }
        let start = (number - 1).saturating_mul(self.page_size);
        if start >= self.rows.len() {
            return &[];
        }
        let end = (start + self.page_size).min(self.rows.len());
        &self.rows[start..end]
    }

    /// The number of pages, at least 1.
    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size).max(1)
    }
}
