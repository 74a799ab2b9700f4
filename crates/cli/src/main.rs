//! # Page Approvals CLI
//!
//! Command-line interface for requesting and tracking Confluence page approvals.
//!
//! This binary renders the review state of a page version, sends page versions
//! for review by creating Jira issues, lists the review issues of a page, and
//! manages the local settings and credentials.
//!
//! # Commands
//!
//! - `status` - Show the review state of a page version
//! - `request` - Send the current page version for review
//! - `reviews` - List the review issues of a page
//! - `config` - Manage configuration files and settings
//! - `auth` - Authenticate with an Atlassian Cloud site
//!
//! # Examples
//!
//! ```bash
//! # Authenticate and point at the site
//! page-approvals auth atlassian basic
//! page-approvals config set site.base_url https://example.atlassian.net
//!
//! # Pick the project and issue type for review issues
//! page-approvals config options
//! page-approvals config set installation.project_key DOC
//! page-approvals config set installation.issue_type_id 10002
//!
//! # Review a page
//! page-approvals status 65537
//! page-approvals request 65537
//! page-approvals reviews 65537 --page 2
//! ```

#![deny(missing_docs)]

use clap::{Parser, Subcommand};
use std::process::{ExitCode, Termination};
use tracing::{error, info, instrument};

/// Command implementations for the CLI.
mod commands;

/// Configuration management for the CLI.
mod config;

/// Error types specific to the CLI.
mod errors;

use commands::{
    auth::AuthCommands,
    config_cmd::ConfigCommands,
    review::{ReviewArgs, ReviewsArgs},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command-line interface structure for Page Approvals.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands for the Page Approvals CLI.
#[derive(Subcommand)]
enum Commands {
    /// Show the review state of a page version
    Status(ReviewArgs),

    /// Send the current page version for review
    Request(ReviewArgs),

    /// List the review issues of a page
    Reviews(ReviewsArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Authenticate with Atlassian Cloud
    #[command(subcommand)]
    Auth(AuthCommands),
}

/// Main entry point for the Page Approvals CLI.
///
/// Initializes logging, parses the command line and dispatches to the command
/// handler. A failed command exits with the code of its `CliError`.
#[tokio::main]
#[instrument]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().pretty().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("PAGE_APPROVALS_LOG"))
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let result = match cli.command {
        Commands::Status(args) => commands::review::status(args).await,
        Commands::Request(args) => commands::review::request(args).await,
        Commands::Reviews(args) => commands::review::reviews(args).await,
        Commands::Config(cmd) => commands::config_cmd::execute(cmd).await,
        Commands::Auth(cmd) => commands::auth::execute(cmd).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error executing command: {}", e);
            eprintln!("{}", e);
            e.report()
        }
    }
}
