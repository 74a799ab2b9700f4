use page_approvals_core::errors::PageApprovalsError;
use page_approvals_developer_platforms::errors::Error as PlatformError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Invalid arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The review could not be requested or shown
    #[error("Review failed: {0}")]
    ReviewFailed(String),

    /// Other errors
    #[error("Error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Other(err.to_string())
    }
}

impl From<PageApprovalsError> for CliError {
    fn from(err: PageApprovalsError) -> Self {
        match err {
            PageApprovalsError::ConfigError(msg) => CliError::ConfigError(msg),
            PageApprovalsError::ActionNotAvailable(_) => CliError::InvalidArguments(err.to_string()),
            PageApprovalsError::ContentFetchFailed(_)
            | PageApprovalsError::IssueCreationFailed(_)
            | PageApprovalsError::IssueSearchFailed(_) => CliError::ReviewFailed(err.to_string()),
        }
    }
}

impl From<PlatformError> for CliError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::AuthError(_) => CliError::AuthError(err.to_string()),
            _ => CliError::NetworkError(err.to_string()),
        }
    }
}

impl CliError {
    /// The process exit code reported for the error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::ConfigError(_) => 2,
            CliError::AuthError(_) => 3,
            CliError::NetworkError(_) => 4,
            CliError::InvalidArguments(_) => 5,
            CliError::ReviewFailed(_) => 1,
            CliError::Other(_) => 1,
        }
    }
}

impl std::process::Termination for CliError {
    fn report(self) -> std::process::ExitCode {
        std::process::ExitCode::from(self.exit_code())
    }
}
