use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

#[derive(Error, Debug)]
pub enum PageApprovalsError {
    #[error("Action '{0}' is not available in the current review state")]
    ActionNotAvailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to fetch the page content. Issue was: '{0}'.")]
    ContentFetchFailed(String),

    #[error("Failed to create the review issue. Issue was: '{0}'.")]
    IssueCreationFailed(String),

    #[error("Failed to search for review issues. Issue was: '{0}'.")]
    IssueSearchFailed(String),
}
