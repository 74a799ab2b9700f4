use anyhow::Result;
use clap::Subcommand;
use page_approvals_core::config::InstallationConfig;
use page_approvals_core::resolver::{ConfigurationResolver, SelectOption};
use serde::Serialize;
use tracing::debug;

use crate::commands::auth::create_atlassian_client;
use crate::config::{get_config_path, AppConfig};
use crate::errors::CliError;

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;

/// Subcommands for the config command
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create initial configuration file
    Init {
        /// Path to save the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Check configuration syntax and completeness
    Validate {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Show current configuration
    Get {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,

        /// Configuration key to get (e.g., "installation.project_key")
        key: Option<String>,
    },

    /// Update configuration values
    Set {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,

        /// Configuration key to set (e.g., "installation.project_key")
        key: String,

        /// Value to set. An empty value clears optional settings.
        value: String,
    },

    /// List the projects and issue types available for the installation
    Options {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,

        /// Print the options as JSON
        #[arg(long)]
        json: bool,
    },
}

/// The choices of the installation settings form
#[derive(Debug, Serialize)]
struct FormOptions {
    projects: Vec<SelectOption>,
    issue_types: Vec<SelectOption>,
}

/// Execute the config command
pub async fn execute(cmd: ConfigCommands) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Init { path } => init_config(path.as_deref()),
        ConfigCommands::Validate { path } => validate_config(path.as_deref()),
        ConfigCommands::Get { path, key } => get_config(path.as_deref(), key.as_deref()),
        ConfigCommands::Set { path, key, value } => set_config(path.as_deref(), &key, &value),
        ConfigCommands::Options { path, json } => list_options(path.as_deref(), json).await,
    }
}

/// Initialize a new configuration file
fn init_config(path: Option<&str>) -> Result<(), CliError> {
    let config_path = get_config_path(path);
    debug!("Initializing configuration at {:?}", config_path);

    if config_path.exists() {
        return Err(CliError::ConfigError(format!(
            "Configuration file already exists at {:?}",
            config_path
        )));
    }

    let config = AppConfig::default();
    config.save(&config_path)?;

    println!("Configuration initialized at {:?}", config_path);
    Ok(())
}

/// Validate a configuration file
fn validate_config(path: Option<&str>) -> Result<(), CliError> {
    let config_path = get_config_path(path);
    debug!("Validating configuration at {:?}", config_path);

    let config = AppConfig::load(&config_path)?;
    config.validate()?;

    if config.installation.is_none() {
        println!("Configuration is valid, but the installation has not been configured yet");
    } else {
        println!("Configuration is valid");
    }
    Ok(())
}

/// Get a configuration value
fn get_config(path: Option<&str>, key: Option<&str>) -> Result<(), CliError> {
    let config_path = get_config_path(path);
    debug!("Getting configuration from {:?}", config_path);

    let config = AppConfig::load(&config_path)?;

    if let Some(key) = key {
        let value = get_config_value(&config, key)?;
        println!("{}: {}", key, value);
    } else {
        let config_str = toml::to_string_pretty(&config).map_err(|e| {
            CliError::ConfigError(format!("Failed to serialize configuration: {}", e))
        })?;
        println!("{}", config_str);
    }

    Ok(())
}

/// Set a configuration value
fn set_config(path: Option<&str>, key: &str, value: &str) -> Result<(), CliError> {
    let config_path = get_config_path(path);
    debug!("Setting configuration at {:?}", config_path);

    let mut config = if config_path.exists() {
        AppConfig::load(&config_path)?
    } else {
        AppConfig::default()
    };

    set_config_value(&mut config, key, value)?;
    config.save(&config_path)?;

    println!("Configuration updated: {} = {}", key, value);
    Ok(())
}

/// Print the projects and issue types the installation can be configured with
async fn list_options(path: Option<&str>, json: bool) -> Result<(), CliError> {
    let config_path = get_config_path(path);
    let config = AppConfig::load(&config_path)?;

    let client = create_atlassian_client(&config)?;
    let resolver = ConfigurationResolver::new(client);

    let options = FormOptions {
        projects: resolver.list_projects().await,
        issue_types: resolver.list_issue_types().await,
    };

    if json {
        let text = serde_json::to_string_pretty(&options)
            .map_err(|e| CliError::Other(format!("Failed to serialize the options: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    println!("Projects (installation.project_key):");
    print_options(&options.projects);
    println!();
    println!("Issue types (installation.issue_type_id):");
    print_options(&options.issue_types);

    Ok(())
}

fn print_options(options: &[SelectOption]) {
    if options.is_empty() {
        println!("  (none available)");
    }
    for option in options {
        println!("  {:<12} {}", option.value, option.label);
    }
}

fn invalid_key(key: &str) -> CliError {
    CliError::InvalidArguments(format!("Invalid configuration key: {}", key))
}

/// Get a value from the configuration by key path
fn get_config_value(config: &AppConfig, key: &str) -> Result<String, CliError> {
    let parts: Vec<&str> = key.split('.').collect();

    match (parts[0], parts.get(1).copied()) {
        ("site", Some("base_url")) => Ok(config.site.base_url.clone()),
        ("authentication", Some("auth_method")) => Ok(config.authentication.auth_method.clone()),
        ("authentication", Some("email")) => {
            Ok(config.authentication.email.clone().unwrap_or_default())
        }
        ("installation", Some(field)) => {
            let Some(installation) = &config.installation else {
                return Ok(String::new());
            };
            match field {
                "project_key" => Ok(installation.project_key.clone()),
                "issue_type_id" => Ok(installation.issue_type_id.clone()),
                "approved" => Ok(installation.approved.clone().unwrap_or_default()),
                "rejected" => Ok(installation.rejected.clone().unwrap_or_default()),
                "max_reviews" => Ok(installation
                    .max_reviews
                    .map(|n| n.to_string())
                    .unwrap_or_default()),
                "assignee" => Ok(installation.assignee.clone().unwrap_or_default()),
                _ => Err(invalid_key(key)),
            }
        }
        _ => Err(invalid_key(key)),
    }
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Set a value in the configuration by key path
fn set_config_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), CliError> {
    let parts: Vec<&str> = key.split('.').collect();

    match (parts[0], parts.get(1).copied()) {
        ("site", Some("base_url")) => {
            config.site.base_url = value.trim_end_matches('/').to_string();
            Ok(())
        }
        ("authentication", Some("auth_method")) => {
            config.authentication.auth_method = value.to_string();
            Ok(())
        }
        ("authentication", Some("email")) => {
            config.authentication.email = optional(value);
            Ok(())
        }
        ("installation", Some(field)) => {
            let installation = config
                .installation
                .get_or_insert_with(|| InstallationConfig::new("", ""));
            match field {
                "project_key" => installation.project_key = value.to_string(),
                "issue_type_id" => installation.issue_type_id = value.to_string(),
                "approved" => installation.approved = optional(value),
                "rejected" => installation.rejected = optional(value),
                "max_reviews" => {
                    installation.max_reviews = if value.is_empty() {
                        None
                    } else {
                        Some(value.trim().parse().map_err(|_| {
                            CliError::InvalidArguments(format!(
                                "Invalid value for max_reviews: {}",
                                value
                            ))
                        })?)
                    };
                }
                "assignee" => installation.assignee = optional(value),
                _ => return Err(invalid_key(key)),
            }
            Ok(())
        }
        _ => Err(invalid_key(key)),
    }
}
