use std::{
    fs,
    path::{Path, PathBuf},
};

use page_approvals_core::{config::InstallationConfig, errors::PageApprovalsError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = ".page-approvals.toml";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Configuration for the Page Approvals CLI
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// The Atlassian site
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub authentication: AuthenticationConfig,

    /// Installation settings. Absent until the app has been configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation: Option<InstallationConfig>,
}

impl AppConfig {
    /// Load configuration from the specified file
    pub fn load(path: &Path) -> Result<Self, PageApprovalsError> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(PageApprovalsError::ConfigError(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            PageApprovalsError::ConfigError(format!("Failed to read configuration file: {}", e))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            PageApprovalsError::ConfigError(format!("Failed to parse configuration file: {}", e))
        })?;

        Ok(config)
    }

    /// Save configuration to the specified file
    pub fn save(&self, path: &Path) -> Result<(), PageApprovalsError> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self).map_err(|e| {
            PageApprovalsError::ConfigError(format!("Failed to serialize configuration: {}", e))
        })?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PageApprovalsError::ConfigError(format!("Failed to create directory: {}", e))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            PageApprovalsError::ConfigError(format!("Failed to write configuration file: {}", e))
        })?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Checks that the site is set and that the installation settings, when
    /// present, are complete.
    pub fn validate(&self) -> Result<(), PageApprovalsError> {
        if self.site.base_url.trim().is_empty() {
            return Err(PageApprovalsError::ConfigError(
                "site.base_url must be set".to_string(),
            ));
        }

        match self.authentication.auth_method.as_str() {
            "basic" => {
                if self.authentication.email.as_deref().unwrap_or("").is_empty() {
                    return Err(PageApprovalsError::ConfigError(
                        "authentication.email must be set for basic authentication".to_string(),
                    ));
                }
            }
            "bearer" => {}
            other => {
                return Err(PageApprovalsError::ConfigError(format!(
                    "Unsupported authentication method: {}",
                    other
                )));
            }
        }

        if let Some(installation) = &self.installation {
            installation.validate()?;
        }

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthenticationConfig {
    /// `basic` (email + API token) or `bearer`
    #[serde(default = "AuthenticationConfig::default_auth_method")]
    pub auth_method: String,

    /// Account email used for basic authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AuthenticationConfig {
    fn default_auth_method() -> String {
        "basic".to_string()
    }

    pub fn new() -> Self {
        AuthenticationConfig {
            auth_method: Self::default_auth_method(),
            email: None,
        }
    }
}

impl Default for AuthenticationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The Atlassian Cloud site hosting Confluence and Jira
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// e.g. `https://example.atlassian.net`
    #[serde(default)]
    pub base_url: String,
}

/// Get the path to the configuration file
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        // Look for config in current directory
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}
