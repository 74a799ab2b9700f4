use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::{debug, error, info, instrument};

use crate::{
    errors::Error,
    models::{
        CreatedIssue, IssueSearchResult, IssueType, NewIssue, PageContent, Project, SearchRequest,
    },
    ContentProvider, IssueTracker,
};

#[cfg(test)]
#[path = "atlassian_tests.rs"]
mod tests;

/// Credentials used to call the Atlassian Cloud REST APIs.
///
/// Both Confluence and Jira on the same site accept the same credentials.
#[derive(Clone)]
pub enum Credentials {
    /// HTTP basic authentication with the account email and an API token
    Basic { email: String, api_token: String },

    /// A bearer token, e.g. an OAuth 2.0 access token
    Bearer(String),

    /// No authentication, for anonymous-access sites
    Anonymous,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { email, .. } => f
                .debug_struct("Basic")
                .field("email", email)
                .field("api_token", &"<redacted>")
                .finish(),
            Credentials::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
            Credentials::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// Builds a client for an Atlassian Cloud site.
///
/// # Arguments
///
/// * `base_url` - The site URL, e.g. `https://example.atlassian.net`
/// * `credentials` - The credentials to send with every request
///
/// # Errors
///
/// Returns `Error::ApiError` if the underlying HTTP client cannot be built.
///
/// # Example
///
/// ```rust,no_run
/// use anyhow::Result;
/// use page_approvals_developer_platforms::atlassian::{create_client, Credentials};
/// use page_approvals_developer_platforms::ContentProvider;
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let client = create_client(
///         "https://example.atlassian.net",
///         Credentials::Basic {
///             email: "me@example.com".to_string(),
///             api_token: "<token>".to_string(),
///         },
///     )?;
///
///     let page = client.get_page_content("65537").await?;
///     println!("{} (v. {})", page.title, page.version_number());
///     Ok(())
/// }
/// ```
#[instrument(skip(credentials))]
pub fn create_client(base_url: &str, credentials: Credentials) -> Result<AtlassianClient, Error> {
    let client = Client::builder()
        .user_agent(concat!("page-approvals/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            error!(
                error_message = e.to_string(),
                "Failed to build the HTTP client"
            );
            Error::ApiError(e.to_string())
        })?;

    info!(base_url, "Created Atlassian client");

    Ok(AtlassianClient::new(client, base_url, credentials))
}

/// Confluence and Jira REST client for a single Atlassian site.
#[derive(Debug, Clone)]
pub struct AtlassianClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl AtlassianClient {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Basic { email, api_token } => request.basic_auth(email, Some(api_token)),
            Credentials::Bearer(token) => request.bearer_auth(token),
            Credentials::Anonymous => request,
        }
    }

    /// The site URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn new(client: Client, base_url: &str, credentials: Credentials) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Sends the request and decodes a successful JSON response.
    ///
    /// Non-success responses are logged with the operation name, status and
    /// body before being converted into an `Error`.
    async fn send<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, Error> {
        let response = self
            .authorize(request)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                error!(
                    operation,
                    error_message = e.to_string(),
                    "Failed to send the request"
                );
                Error::ApiError(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                operation,
                status = status.as_u16(),
                body = body.as_str(),
                "Received an error response"
            );
            return Err(Error::from_status(operation, status.as_u16(), body));
        }

        debug!(operation, status = status.as_u16(), "Received response");

        response.json::<T>().await.map_err(|e| {
            error!(
                operation,
                error_message = e.to_string(),
                "Failed to decode the response body"
            );
            Error::InvalidResponse
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ContentProvider for AtlassianClient {
    #[instrument(skip(self))]
    async fn get_page_content(&self, content_id: &str) -> Result<PageContent, Error> {
        let path = format!(
            "/wiki/rest/api/content/{}",
            urlencoding::encode(content_id)
        );
        let request = self.client.get(self.url(&path));
        self.send("fetch_content", request).await
    }
}

#[async_trait]
impl IssueTracker for AtlassianClient {
    #[instrument(skip(self))]
    async fn list_projects(&self) -> Result<Vec<Project>, Error> {
        let request = self.client.get(self.url("/rest/api/3/project"));
        self.send("list_projects", request).await
    }

    #[instrument(skip(self))]
    async fn list_issue_types(&self) -> Result<Vec<IssueType>, Error> {
        let request = self.client.get(self.url("/rest/api/3/issuetype"));
        self.send("list_issue_types", request).await
    }

    #[instrument(skip(self))]
    async fn search_issues(
        &self,
        jql: &str,
        max_results: u32,
    ) -> Result<IssueSearchResult, Error> {
        let body = SearchRequest {
            jql: jql.to_string(),
            max_results,
        };
        let request = self
            .client
            .post(self.url("/rest/api/3/search"))
            .json(&body);
        self.send("search_issues", request).await
    }

    #[instrument(skip(self, issue), fields(summary = issue.fields.summary.as_str()))]
    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, Error> {
        let request = self.client.post(self.url("/rest/api/3/issue")).json(issue);
        let created: CreatedIssue = self.send("create_issue", request).await?;

        info!(issue_key = created.key.as_str(), "Created review issue");

        Ok(created)
    }
}
