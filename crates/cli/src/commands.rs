/// Authentication commands for configuring Atlassian access
pub mod auth;
/// Configuration management commands
pub mod config_cmd;
/// Review status, request and listing commands
pub mod review;
