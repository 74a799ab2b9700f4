use async_trait::async_trait;

pub mod atlassian;

pub mod errors;

pub mod models;
use errors::Error;
use models::{CreatedIssue, IssueSearchResult, IssueType, NewIssue, PageContent, Project};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Trait for fetching wiki page content (e.g., Confluence).
///
/// # Example Implementation
///
/// ```rust,no_run
/// use page_approvals_developer_platforms::{ContentProvider, errors::Error, models::PageContent};
/// use anyhow::Result;
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct StaticContent {
///     content: PageContent,
/// }
///
/// #[async_trait]
/// impl ContentProvider for StaticContent {
///     async fn get_page_content(&self, _content_id: &str) -> Result<PageContent, Error> {
///         Ok(self.content.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait ContentProvider: Sync + Send {
    /// Retrieves the current snapshot of a page.
    ///
    /// # Arguments
    ///
    /// * `content_id` - The opaque content identifier of the page
    ///
    /// # Returns
    ///
    /// A `Result` containing the page title, version and links
    async fn get_page_content(&self, content_id: &str) -> Result<PageContent, Error>;
}

/// Trait for interacting with the issue tracker that holds review issues (e.g., Jira).
///
/// Implementations only construct requests and interpret responses. They do not
/// retry, cache or deduplicate.
#[async_trait]
pub trait IssueTracker: Sync + Send {
    /// Lists the projects visible to the caller, in the order returned.
    ///
    /// # Returns
    ///
    /// A `Result` containing the projects
    async fn list_projects(&self) -> Result<Vec<Project>, Error>;

    /// Lists all issue types visible to the caller, including sub-task types.
    ///
    /// # Returns
    ///
    /// A `Result` containing the issue types
    async fn list_issue_types(&self) -> Result<Vec<IssueType>, Error>;

    /// Runs a JQL search.
    ///
    /// # Arguments
    ///
    /// * `jql` - The JQL query
    /// * `max_results` - The maximum number of issues to return
    ///
    /// # Returns
    ///
    /// A `Result` containing the issues in the order returned by the tracker
    async fn search_issues(&self, jql: &str, max_results: u32)
        -> Result<IssueSearchResult, Error>;

    /// Creates a new issue.
    ///
    /// # Arguments
    ///
    /// * `issue` - The fields of the new issue
    ///
    /// # Returns
    ///
    /// A `Result` containing the id and key of the created issue
    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, Error>;
}
