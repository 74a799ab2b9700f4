//! # Review Session
//!
//! The per-viewer state of one review view: which display mode is shown, the
//! page and issues fetched for it, the derived review state and the current
//! error message.
//!
//! All transitions here are synchronous and perform no I/O. The async pipeline
//! that fills a session lives in [`crate::ReviewEngine`].

use page_approvals_developer_platforms::models::{IssueSearchResult, PageContent};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::InstallationConfig;
use crate::state::{derive_review_state, review_summary, ReviewState};

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

/// Message shown when the installation has not been configured
pub const NOT_CONFIGURED_MESSAGE: &str = "This app requires configuration before use.";

/// Message shown when a failure did not supply a specific message
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Is the app configured correctly?";

/// Message shown when the review issue search failed
pub const ISSUE_SEARCH_FAILED_MESSAGE: &str =
    "Something went wrong while fetching issues. Do you have access to the configured project?";

/// Message shown when creating the review issue failed
pub const ISSUE_CREATION_FAILED_MESSAGE: &str =
    "Something went wrong while creating new issue. Do you have access to the configured project?";

/// The page version used when no page is in context
pub const DEFAULT_CONTENT_VERSION: u64 = 1;

/// Which of the mutually exclusive views is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenderMode {
    /// Missing configuration or a failed fetch
    Error,

    /// The review state with its actions
    State,

    /// The list of review issues
    Approvals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSession {
    render_mode: RenderMode,
    error_message: Option<String>,
    content: Option<PageContent>,
    content_version: u64,
    issues: Option<IssueSearchResult>,
    state: ReviewState,
}

impl ReviewSession {
    /// Returns to the state view from the review list.
    ///
    /// Returns `false`, leaving the session unchanged, when the review list is
    /// not shown.
    pub fn back(&mut self) -> bool {
        if self.render_mode != RenderMode::Approvals {
            debug!(render_mode = ?self.render_mode, "Ignoring back outside of the review list");
            return false;
        }

        self.render_mode = RenderMode::State;
        true
    }

    /// Whether the "Send for review" action is enabled.
    ///
    /// Only the state view of a draft offers the action. The state of a session
    /// in the error view was never derived.
    pub fn can_send_for_review(&self) -> bool {
        self.render_mode == RenderMode::State && self.state == ReviewState::Draft
    }

    /// Whether the "Show reviews" action is enabled.
    pub fn can_show_reviews(&self) -> bool {
        self.has_issues()
    }

    pub fn content(&self) -> Option<&PageContent> {
        self.content.as_ref()
    }

    pub fn content_version(&self) -> u64 {
        self.content_version
    }

    /// Recomputes the review state from the current content and issues.
    pub fn derive_state(&mut self, config: Option<&InstallationConfig>) {
        self.state = derive_review_state(
            self.issues.as_ref(),
            self.content.as_ref(),
            self.content_version,
            config,
        );
    }

    /// The message of the error view, falling back to the generic message.
    pub fn error_text(&self) -> &str {
        self.error_message
            .as_deref()
            .unwrap_or(GENERIC_ERROR_MESSAGE)
    }

    /// The summary a review issue for the current page version must have.
    pub fn expected_summary(&self) -> Option<String> {
        self.content
            .as_ref()
            .map(|c| review_summary(&c.title, self.content_version))
    }

    /// Switches to the error view.
    ///
    /// A `None` message shows the generic error text.
    pub fn fail(&mut self, message: Option<&str>) {
        self.error_message = message.map(str::to_string);
        self.render_mode = RenderMode::Error;
    }

    pub fn has_issues(&self) -> bool {
        self.issues.as_ref().is_some_and(|r| !r.is_empty())
    }

    pub fn issues(&self) -> Option<&IssueSearchResult> {
        self.issues.as_ref()
    }

    /// Optimistically moves the page version into review after the issue was created.
    pub fn mark_in_review(&mut self) {
        self.state = ReviewState::InReview;
    }

    /// Creates a session for a configured installation, showing the state view.
    ///
    /// Without content the page version defaults to 1.
    pub fn new(content: Option<PageContent>) -> Self {
        let content_version = content
            .as_ref()
            .map(PageContent::version_number)
            .unwrap_or(DEFAULT_CONTENT_VERSION);

        Self {
            render_mode: RenderMode::State,
            error_message: None,
            content,
            content_version,
            issues: None,
            state: ReviewState::Draft,
        }
    }

    /// Creates the terminal session for an installation without configuration.
    pub fn not_configured() -> Self {
        Self {
            render_mode: RenderMode::Error,
            error_message: Some(NOT_CONFIGURED_MESSAGE.to_string()),
            content: None,
            content_version: DEFAULT_CONTENT_VERSION,
            issues: None,
            state: ReviewState::Draft,
        }
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    /// Replaces the issue set with a fresh search result.
    ///
    /// The review state is not recomputed, so an optimistic `InReview` survives
    /// until the next load.
    pub fn replace_issues(&mut self, issues: Option<IssueSearchResult>) {
        self.issues = issues;
    }

    /// Shows the review list.
    ///
    /// Returns `false`, leaving the session unchanged, when not in the state
    /// view or when there are no review issues to show.
    pub fn show_reviews(&mut self) -> bool {
        if self.render_mode != RenderMode::State {
            debug!(render_mode = ?self.render_mode, "Ignoring show reviews outside of the state view");
            return false;
        }

        if !self.can_show_reviews() {
            warn!("Ignoring show reviews because no review issues exist");
            return false;
        }

        self.render_mode = RenderMode::Approvals;
        true
    }

    pub fn state(&self) -> ReviewState {
        self.state
    }
}
