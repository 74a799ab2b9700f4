//! Installation settings for Page Approvals.
//!
//! The administrator picks a Jira project and issue type, and optionally
//! overrides the workflow status names that count as approved or rejected.
//! These settings are read-only input to the review engine; their storage is
//! owned by the host (the CLI keeps them in its TOML settings file).
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::PageApprovalsError;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Workflow status name treated as approved when none is configured
pub const DEFAULT_APPROVED_STATUS: &str = "Approved";

/// Workflow status name treated as rejected when none is configured
pub const DEFAULT_REJECTED_STATUS: &str = "Rejected";

/// Maximum number of review issues fetched when none is configured
pub const DEFAULT_MAX_REVIEWS: u32 = 50;

/// Administrator-set values scoping the review workflow of one installation.
///
/// # Examples
///
/// ```
/// use page_approvals_core::config::InstallationConfig;
///
/// let config = InstallationConfig::new("DOC", "10002");
///
/// assert_eq!(config.approved_status(), "Approved");
/// assert_eq!(config.rejected_status(), "Rejected");
/// assert_eq!(config.max_results(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationConfig {
    /// Key of the Jira project review issues are created in
    #[serde(alias = "projectKey")]
    pub project_key: String,

    /// Id of the issue type used for review issues
    #[serde(alias = "issueTypeId")]
    pub issue_type_id: String,

    /// Status name considered as approved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<String>,

    /// Status name considered as rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,

    /// Maximum number of reviews fetched and displayed
    #[serde(
        default,
        alias = "maxReviews",
        deserialize_with = "deserialize_max_reviews",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_reviews: Option<u32>,

    /// Account id review issues are assigned to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl InstallationConfig {
    /// The account id to assign review issues to, if one is configured.
    pub fn assignee_id(&self) -> Option<&str> {
        self.assignee.as_deref().filter(|a| !a.trim().is_empty())
    }

    /// The status name treated as approved, falling back to `Approved`.
    pub fn approved_status(&self) -> &str {
        self.approved
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_APPROVED_STATUS)
    }

    /// The maximum number of review issues to fetch, falling back to 50.
    pub fn max_results(&self) -> u32 {
        self.max_reviews.unwrap_or(DEFAULT_MAX_REVIEWS)
    }

    pub fn new(project_key: &str, issue_type_id: &str) -> Self {
        Self {
            project_key: project_key.to_string(),
            issue_type_id: issue_type_id.to_string(),
            approved: None,
            rejected: None,
            max_reviews: None,
            assignee: None,
        }
    }

    /// The status name treated as rejected, falling back to `Rejected`.
    pub fn rejected_status(&self) -> &str {
        self.rejected
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_REJECTED_STATUS)
    }

    /// Checks the required fields the configuration form marks as mandatory.
    pub fn validate(&self) -> Result<(), PageApprovalsError> {
        if self.project_key.trim().is_empty() {
            return Err(PageApprovalsError::ConfigError(
                "A project key is required".to_string(),
            ));
        }

        if self.issue_type_id.trim().is_empty() {
            return Err(PageApprovalsError::ConfigError(
                "An issue type id is required".to_string(),
            ));
        }

        if self.max_reviews == Some(0) {
            return Err(PageApprovalsError::ConfigError(
                "The maximum number of reviews must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Accepts `max_reviews` either as an integer or as the text the original
/// configuration form stored (e.g. `"50"`).
fn deserialize_max_reviews<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMaxReviews {
        Number(u32),
        Text(String),
    }

    match Option::<RawMaxReviews>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawMaxReviews::Number(n)) => Ok(Some(n)),
        Some(RawMaxReviews::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse::<u32>().map(Some).map_err(|_| {
                serde::de::Error::custom(format!(
                    "max_reviews must be a positive integer, got '{}'",
                    text
                ))
            })
        }
    }
}
