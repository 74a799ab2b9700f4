//! # Configuration Resolver
//!
//! Supplies the choices of the installation configuration form: the Jira
//! projects review issues can be filed in and the issue types they can use.
//! Failures never reach the form; it simply shows no options.

use page_approvals_developer_platforms::IssueTracker;
use serde::Serialize;
use tracing::{debug, instrument, warn};

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// One selectable entry of a configuration form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    /// The text shown to the administrator
    pub label: String,

    /// The value persisted when the option is chosen
    pub value: String,
}

#[derive(Debug)]
pub struct ConfigurationResolver<T: IssueTracker> {
    tracker: T,
}

impl<T: IssueTracker> ConfigurationResolver<T> {
    /// Lists the non sub-task issue types as `{name}` / id options.
    #[instrument(skip(self))]
    pub async fn list_issue_types(&self) -> Vec<SelectOption> {
        match self.tracker.list_issue_types().await {
            Ok(issue_types) => {
                let options: Vec<SelectOption> = issue_types
                    .into_iter()
                    .filter(|t| !t.subtask)
                    .map(|t| SelectOption {
                        label: t.name,
                        value: t.id,
                    })
                    .collect();
                debug!(count = options.len(), "Resolved issue type options");
                options
            }
            Err(e) => {
                warn!(
                    operation = "list_issue_types",
                    error = e.to_string(),
                    "Failed to list issue types"
                );
                Vec::new()
            }
        }
    }

    /// Lists the projects as `{name} ({key})` / key options.
    #[instrument(skip(self))]
    pub async fn list_projects(&self) -> Vec<SelectOption> {
        match self.tracker.list_projects().await {
            Ok(projects) => {
                let options: Vec<SelectOption> = projects
                    .into_iter()
                    .map(|p| SelectOption {
                        label: format!("{} ({})", p.name, p.key),
                        value: p.key,
                    })
                    .collect();
                debug!(count = options.len(), "Resolved project options");
                options
            }
            Err(e) => {
                warn!(
                    operation = "list_projects",
                    error = e.to_string(),
                    "Failed to list projects"
                );
                Vec::new()
            }
        }
    }

    pub fn new(tracker: T) -> Self {
        Self { tracker }
    }
}
