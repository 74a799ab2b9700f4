//! # Page Approvals Core
//!
//! Core business logic for a lightweight page approval workflow: a page author
//! requests a review, a linked Jira issue is created, and the workflow status of
//! that issue is reflected back as the review state of the page version.
//!
//! Page Approvals determines the review state by:
//! - Fetching the page title and version from Confluence
//! - Searching Jira for issues whose summary is `"{title} (v. {version})"`
//! - Comparing the status of the first match against the configured
//!   approved and rejected status names
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use page_approvals_core::{config::InstallationConfig, view::ReviewView, ReviewEngine};
//! use page_approvals_developer_platforms::{ContentProvider, IssueTracker};
//! use anyhow::Result;
//!
//! async fn show_review<C: ContentProvider, T: IssueTracker>(
//!     content_provider: C,
//!     issue_tracker: T,
//! ) -> Result<()> {
//!     let config = InstallationConfig::new("DOC", "10002");
//!     let engine = ReviewEngine::new(content_provider, issue_tracker, Some(config));
//!
//!     // Fetch the page and its review issues, then derive the state
//!     let mut session = engine.load(Some("65537")).await;
//!
//!     if session.can_send_for_review() {
//!         engine.send_for_review(&mut session).await?;
//!     }
//!
//!     let view = ReviewView::project(&session, engine.config());
//!     println!("{:?}", view);
//!
//!     Ok(())
//! }
//! ```

use page_approvals_developer_platforms::models::{CreatedIssue, IssueSearchResult, PageContent};
use page_approvals_developer_platforms::{ContentProvider, IssueTracker};
use tracing::{debug, error, info, instrument, warn};

pub mod config;
use config::InstallationConfig;

pub mod description;
use description::build_review_issue;

pub mod errors;
use errors::PageApprovalsError;

pub mod query;
use query::build_search_jql;

pub mod resolver;

pub mod session;
use session::{ReviewSession, ISSUE_CREATION_FAILED_MESSAGE, ISSUE_SEARCH_FAILED_MESSAGE};

pub mod state;

pub mod view;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Computes and changes the review state of pages.
///
/// `ReviewEngine` runs the per-view pipeline (configuration, page content,
/// review issues, derived state) and performs the "send for review" action.
/// Upstream failures are never returned as errors from the pipeline; they
/// become an error message and the `Error` render mode of the session.
#[derive(Debug)]
pub struct ReviewEngine<C: ContentProvider, T: IssueTracker> {
    content_provider: C,
    issue_tracker: T,
    config: Option<InstallationConfig>,
}

impl<C: ContentProvider, T: IssueTracker> ReviewEngine<C, T> {
    /// The installation settings, `None` when not configured.
    pub fn config(&self) -> Option<&InstallationConfig> {
        self.config.as_ref()
    }

    /// Fetches the page content.
    ///
    /// No content id means there is no page in context, which is not an error.
    #[instrument(skip(self))]
    async fn fetch_content(
        &self,
        content_id: Option<&str>,
    ) -> Result<Option<PageContent>, PageApprovalsError> {
        let Some(content_id) = content_id else {
            debug!("No content id in context");
            return Ok(None);
        };

        let content = self
            .content_provider
            .get_page_content(content_id)
            .await
            .map_err(|e| {
                error!(
                    operation = "fetch_content",
                    content_id,
                    error = e.to_string(),
                    "Failed to fetch the page content"
                );
                PageApprovalsError::ContentFetchFailed(e.to_string())
            })?;

        debug!(
            content_id,
            version = content.version_number(),
            "Fetched page content"
        );

        Ok(Some(content))
    }

    /// Searches the review issues of the page.
    ///
    /// Without content or configuration no search is made and `None` is
    /// returned, which is treated as "no matches".
    #[instrument(skip(self, content))]
    async fn fetch_content_issues(
        &self,
        content: Option<&PageContent>,
    ) -> Result<Option<IssueSearchResult>, PageApprovalsError> {
        let (Some(content), Some(config)) = (content, self.config.as_ref()) else {
            debug!("Skipping the review issue search without content or configuration");
            return Ok(None);
        };

        let jql = build_search_jql(&config.project_key, &content.title);
        let result = self
            .issue_tracker
            .search_issues(&jql, config.max_results())
            .await
            .map_err(|e| {
                error!(
                    operation = "fetch_content_issues",
                    project_key = config.project_key.as_str(),
                    error = e.to_string(),
                    "Failed to search for review issues"
                );
                PageApprovalsError::IssueSearchFailed(e.to_string())
            })?;

        debug!(
            project_key = config.project_key.as_str(),
            count = result.issues.len(),
            "Searched for review issues"
        );

        Ok(Some(result))
    }

    /// Runs the view pipeline for a page.
    ///
    /// 1. Without configuration the session is the terminal "not configured" error.
    /// 2. Without a content id there is no page; the version defaults to 1.
    /// 3. The page content is fetched. A failure shows the generic error.
    /// 4. The review issues are searched. A failure shows the search error.
    /// 5. The review state is derived.
    ///
    /// # Arguments
    ///
    /// * `content_id` - The id of the page in context, if any
    #[instrument(skip(self))]
    pub async fn load(&self, content_id: Option<&str>) -> ReviewSession {
        info!("Loading the review state");

        if self.config.is_none() {
            warn!("The installation has not been configured");
            return ReviewSession::not_configured();
        }

        let content = match self.fetch_content(content_id).await {
            Ok(c) => c,
            Err(_) => {
                let mut session = ReviewSession::new(None);
                session.fail(None);
                return session;
            }
        };

        let mut session = ReviewSession::new(content);

        match self.fetch_content_issues(session.content()).await {
            Ok(issues) => session.replace_issues(issues),
            Err(_) => {
                session.fail(Some(ISSUE_SEARCH_FAILED_MESSAGE));
                return session;
            }
        }

        session.derive_state(self.config.as_ref());

        info!(
            version = session.content_version(),
            state = ?session.state(),
            "Derived the review state"
        );

        session
    }

    pub fn new(content_provider: C, issue_tracker: T, config: Option<InstallationConfig>) -> Self {
        Self {
            content_provider,
            issue_tracker,
            config,
        }
    }

    /// Re-runs the review issue search and replaces the issue set of the session.
    ///
    /// The review state is left as is. A failure switches the session to the
    /// search error.
    #[instrument(skip(self, session))]
    pub async fn refresh_issues(&self, session: &mut ReviewSession) {
        match self.fetch_content_issues(session.content()).await {
            Ok(issues) => session.replace_issues(issues),
            Err(_) => session.fail(Some(ISSUE_SEARCH_FAILED_MESSAGE)),
        }
    }

    /// Requests a review of the current page version by creating a Jira issue.
    ///
    /// Only available from the state view while the page version is a draft
    /// and both the page and the configuration are present. On success the session moves to
    /// `InReview` straight away, and then the issue search is re-run so the new
    /// issue shows up in the review list. A failed re-run shows the search
    /// error while the session stays `InReview`.
    ///
    /// Nothing prevents two concurrent calls on sessions of the same page
    /// version from creating two issues.
    ///
    /// # Errors
    ///
    /// - `ActionNotAvailable` when the action is disabled. The session is unchanged.
    /// - `IssueCreationFailed` when Jira rejected the issue. The session shows
    ///   the creation error and keeps its review state.
    #[instrument(skip(self, session))]
    pub async fn send_for_review(
        &self,
        session: &mut ReviewSession,
    ) -> Result<CreatedIssue, PageApprovalsError> {
        if !session.can_send_for_review() {
            warn!(
                state = ?session.state(),
                render_mode = ?session.render_mode(),
                "Send for review is only available from the state view of a draft"
            );
            return Err(PageApprovalsError::ActionNotAvailable(
                "send_for_review".to_string(),
            ));
        }

        let (Some(content), Some(config)) = (session.content(), self.config.as_ref()) else {
            warn!("Send for review requires page content and configuration");
            return Err(PageApprovalsError::ActionNotAvailable(
                "send_for_review".to_string(),
            ));
        };

        let issue = build_review_issue(content, session.content_version(), config);
        info!(
            project_key = config.project_key.as_str(),
            summary = issue.fields.summary.as_str(),
            "Creating the review issue"
        );

        let created = match self.issue_tracker.create_issue(&issue).await {
            Ok(c) => c,
            Err(e) => {
                error!(
                    operation = "create_issue",
                    project_key = config.project_key.as_str(),
                    error = e.to_string(),
                    "Failed to create the review issue"
                );
                session.fail(Some(ISSUE_CREATION_FAILED_MESSAGE));
                return Err(PageApprovalsError::IssueCreationFailed(e.to_string()));
            }
        };

        session.mark_in_review();
        self.refresh_issues(session).await;

        info!(issue_key = created.key.as_str(), "Sent the page for review");

        Ok(created)
    }
}
