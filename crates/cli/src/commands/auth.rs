use anyhow::Result;
use clap::Subcommand;
use keyring::Entry;
use page_approvals_developer_platforms::atlassian::{create_client, AtlassianClient, Credentials};
use tracing::{debug, info, warn};

use crate::config::{get_config_path, AppConfig};
use crate::errors::CliError;

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;

pub const KEY_RING_SERVICE_NAME: &str = "page_approvals_cli";
pub const KEY_RING_API_TOKEN: &str = "atlassian_api_token";

/// Environment variable that overrides the token stored in the keyring
pub const API_TOKEN_ENV_VAR: &str = "PAGE_APPROVALS_API_TOKEN";

/// Subcommands for the auth command
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Authenticate with an Atlassian Cloud site
    Atlassian {
        /// Authentication method (basic or bearer)
        #[arg(default_value = "basic")]
        method: String,

        /// Alternate config file
        #[arg(short, long)]
        config: Option<String>,
    },
}

/// Execute the auth command
pub async fn execute(cmd: AuthCommands) -> Result<(), CliError> {
    match cmd {
        AuthCommands::Atlassian { method, config } => auth_atlassian(&method, config.as_deref()),
    }
}

/// Reads the API token, preferring the environment over the keyring.
pub fn api_token() -> Result<String, CliError> {
    if let Ok(token) = std::env::var(API_TOKEN_ENV_VAR) {
        if !token.trim().is_empty() {
            debug!("Using the API token from {}", API_TOKEN_ENV_VAR);
            return Ok(token.trim().to_string());
        }
    }

    Entry::new(KEY_RING_SERVICE_NAME, KEY_RING_API_TOKEN)
        .map_err(|e| {
            CliError::AuthError(format!("Failed to create an entry in the keyring: {}", e))
        })?
        .get_password()
        .map_err(|e| {
            CliError::AuthError(format!(
                "Failed to get the API token from the keyring: {}. Run 'page-approvals auth atlassian' first.",
                e
            ))
        })
}

/// Builds the Atlassian client for the configured site and authentication method.
pub fn create_atlassian_client(config: &AppConfig) -> Result<AtlassianClient, CliError> {
    if config.site.base_url.trim().is_empty() {
        return Err(CliError::ConfigError(
            "No site configured. Set site.base_url first.".to_string(),
        ));
    }

    let credentials = credentials_for(config, api_token()?)?;
    let client = create_client(&config.site.base_url, credentials)?;

    info!(base_url = client.base_url(), "Connected to the Atlassian site");
    Ok(client)
}

/// Combines the configured authentication method with an API token.
pub fn credentials_for(config: &AppConfig, token: String) -> Result<Credentials, CliError> {
    match config.authentication.auth_method.as_str() {
        "basic" => {
            let email = config
                .authentication
                .email
                .clone()
                .filter(|e| !e.is_empty())
                .ok_or_else(|| {
                    CliError::ConfigError(
                        "authentication.email must be set for basic authentication".to_string(),
                    )
                })?;
            Ok(Credentials::Basic {
                email,
                api_token: token,
            })
        }
        "bearer" => Ok(Credentials::Bearer(token)),
        other => Err(CliError::InvalidArguments(format!(
            "Unsupported authentication method: {}",
            other
        ))),
    }
}

fn read_line() -> Result<String, CliError> {
    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::AuthError(format!("Failed to read input: {}", e)))?;
    Ok(input.trim().to_string())
}

fn store_token(token: &str) -> Result<(), CliError> {
    if token.is_empty() {
        return Err(CliError::AuthError("Token cannot be empty".to_string()));
    }

    let keyring = Entry::new(KEY_RING_SERVICE_NAME, KEY_RING_API_TOKEN).map_err(|e| {
        CliError::AuthError(format!("Failed to create an entry in the keyring: {}", e))
    })?;
    keyring
        .set_password(token)
        .map_err(|e| CliError::AuthError(format!("Failed to save token to keyring: {}", e)))
}

/// Authenticate with Atlassian Cloud
fn auth_atlassian(method: &str, config_path: Option<&str>) -> Result<(), CliError> {
    debug!("Authenticating with Atlassian using method: {}", method);

    let config_path = get_config_path(config_path);
    let mut config = if config_path.exists() {
        AppConfig::load(&config_path)?
    } else {
        AppConfig::default()
    };

    match method {
        "basic" => {
            println!("Atlassian API Token Authentication");
            println!("----------------------------------");

            println!("Account email:");
            let email = read_line()?;
            if email.is_empty() {
                return Err(CliError::AuthError("Email cannot be empty".to_string()));
            }

            println!("API token (create one at https://id.atlassian.com/manage-profile/security/api-tokens):");
            let token = read_line()?;
            store_token(&token)?;

            config.authentication.auth_method = "basic".to_string();
            config.authentication.email = Some(email);
        }
        "bearer" => {
            println!("Atlassian Bearer Token Authentication");
            println!("-------------------------------------");
            println!("Access token:");
            let token = read_line()?;
            store_token(&token)?;

            config.authentication.auth_method = "bearer".to_string();
        }
        _ => {
            return Err(CliError::InvalidArguments(format!(
                "Unsupported authentication method: {}",
                method
            )));
        }
    }

    if config.site.base_url.is_empty() {
        warn!("No site configured yet");
        println!("Remember to set the site: page-approvals config set site.base_url <url>");
    }

    config.save(&config_path)?;

    println!("Atlassian authentication configured successfully!");
    Ok(())
}
