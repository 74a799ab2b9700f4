#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Error types for developer platform operations.
///
/// This enum represents all possible errors that can occur when interacting
/// with the Atlassian platforms (Confluence for page content, Jira for review
/// issues). Each variant provides specific context about the type of failure
/// encountered.
///
/// # Examples
///
/// ```rust
/// use page_approvals_developer_platforms::errors::Error;
///
/// // Authentication error
/// let auth_error = Error::AuthError("Invalid token".to_string());
/// println!("{}", auth_error);
///
/// // Rate limit error
/// let rate_limit = Error::RateLimitExceeded;
/// assert_eq!(rate_limit.to_string(), "Rate limit exceeded");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic API request failure.
    ///
    /// The request could not be sent or no response was received, for example
    /// because of a DNS or connection failure. The string parameter carries the
    /// transport error.
    #[error("API request failed: {0}")]
    ApiError(String),

    /// Authentication failed with the platform.
    ///
    /// The platform answered `401` or `403`: the credentials are invalid,
    /// expired, or lack access to the requested project or page.
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Invalid response format from platform API.
    ///
    /// The response body did not match the expected JSON structure.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The requested resource does not exist.
    ///
    /// The string parameter names the resource, e.g. the content id.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Platform rate limit exceeded.
    ///
    /// No retry is attempted; the caller surfaces the failure once.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The platform answered with a non-success status code.
    ///
    /// Parameters: operation name, HTTP status code, response body
    #[error("Request '{0}' failed with status {1}")]
    UnexpectedStatus(String, u16, String),
}

impl Error {
    /// Maps a non-success HTTP status into the matching error variant.
    pub fn from_status(operation: &str, status: u16, body: String) -> Self {
        match status {
            401 | 403 => Error::AuthError(format!(
                "Request '{}' was rejected with status {}",
                operation, status
            )),
            404 => Error::NotFound(operation.to_string()),
            429 => Error::RateLimitExceeded,
            _ => Error::UnexpectedStatus(operation.to_string(), status, body),
        }
    }
}
