use anyhow::Result;
use clap::Args;
use page_approvals_core::session::{RenderMode, ReviewSession};
use page_approvals_core::view::{
    ApprovalsTable, NoticePanel, ReviewView, StatePanel, BACK_LABEL, SEND_FOR_REVIEW_LABEL,
    SHOW_REVIEWS_LABEL,
};
use page_approvals_core::ReviewEngine;
use page_approvals_developer_platforms::atlassian::{create_client, AtlassianClient, Credentials};
use tracing::{debug, info, instrument, warn};

use crate::commands::auth::create_atlassian_client;
use crate::config::{get_config_path, AppConfig};
use crate::errors::CliError;

#[cfg(test)]
#[path = "review_tests.rs"]
mod tests;

type AtlassianEngine = ReviewEngine<AtlassianClient, AtlassianClient>;

/// Arguments shared by the review commands
#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Id of the Confluence page
    pub content_id: Option<String>,

    /// Alternate config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Print the view as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the reviews command
#[derive(Args, Debug)]
pub struct ReviewsArgs {
    #[command(flatten)]
    pub review: ReviewArgs,

    /// Page of the review list to show, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

/// Show the review state of the page version
#[instrument(skip(args), fields(content_id = ?args.content_id))]
pub async fn status(args: ReviewArgs) -> Result<(), CliError> {
    let (config, engine) = create_engine(args.config.as_deref())?;

    let session = engine.load(args.content_id.as_deref()).await;
    print_view(&session, &config, &engine, 1, args.json)?;

    session_error(&session, engine.config().is_some()).map_or(Ok(()), Err)
}

/// Send the current page version for review
#[instrument(skip(args), fields(content_id = ?args.content_id))]
pub async fn request(args: ReviewArgs) -> Result<(), CliError> {
    let (config, engine) = create_engine(args.config.as_deref())?;

    let mut session = engine.load(args.content_id.as_deref()).await;
    if let Some(err) = session_error(&session, engine.config().is_some()) {
        print_view(&session, &config, &engine, 1, args.json)?;
        return Err(err);
    }

    match engine.send_for_review(&mut session).await {
        Ok(created) => {
            info!(issue_key = created.key.as_str(), "Review requested");
            if !args.json {
                println!(
                    "Created review issue {} ({}/browse/{})",
                    created.key, config.site.base_url, created.key
                );
                println!();
            }
            print_view(&session, &config, &engine, 1, args.json)?;
            session_error(&session, engine.config().is_some()).map_or(Ok(()), Err)
        }
        Err(e) => {
            print_view(&session, &config, &engine, 1, args.json)?;
            Err(e.into())
        }
    }
}

/// Show the review issues found for the page
#[instrument(skip(args), fields(content_id = ?args.review.content_id, page = args.page))]
pub async fn reviews(args: ReviewsArgs) -> Result<(), CliError> {
    let (config, engine) = create_engine(args.review.config.as_deref())?;

    let mut session = engine.load(args.review.content_id.as_deref()).await;
    if let Some(err) = session_error(&session, engine.config().is_some()) {
        print_view(&session, &config, &engine, args.page, args.review.json)?;
        return Err(err);
    }

    if !session.show_reviews() {
        warn!("No review issues to show");
        print_view(&session, &config, &engine, args.page, args.review.json)?;
        return Err(CliError::InvalidArguments(format!(
            "'{}' is not available: no review issues exist for this page",
            SHOW_REVIEWS_LABEL
        )));
    }

    print_view(&session, &config, &engine, args.page, args.review.json)
}

/// Loads the settings and builds the engine.
///
/// An installation that has not been configured gets an anonymous client;
/// the engine never calls it.
fn create_engine(config_path: Option<&str>) -> Result<(AppConfig, AtlassianEngine), CliError> {
    let config_path = get_config_path(config_path);
    let config = AppConfig::load(&config_path)?;

    let client = match &config.installation {
        Some(installation) => {
            installation.validate()?;
            create_atlassian_client(&config)?
        }
        None => {
            debug!("No installation settings; skipping credentials");
            create_client(&config.site.base_url, Credentials::Anonymous)?
        }
    };

    let engine = ReviewEngine::new(client.clone(), client, config.installation.clone());
    Ok((config, engine))
}

fn print_view(
    session: &ReviewSession,
    config: &AppConfig,
    engine: &AtlassianEngine,
    page: usize,
    json: bool,
) -> Result<(), CliError> {
    let view = ReviewView::project(session, engine.config());

    if json {
        let text = serde_json::to_string_pretty(&view)
            .map_err(|e| CliError::Other(format!("Failed to serialize the view: {}", e)))?;
        println!("{}", text);
    } else {
        print!("{}", render_view(&view, &config.site.base_url, page));
    }

    Ok(())
}

/// The error to exit with when the session ended in the error view.
fn session_error(session: &ReviewSession, configured: bool) -> Option<CliError> {
    if session.render_mode() != RenderMode::Error {
        return None;
    }

    let message = session.error_text().to_string();
    if configured {
        Some(CliError::ReviewFailed(message))
    } else {
        Some(CliError::ConfigError(message))
    }
}

/// Renders a view as terminal text.
///
/// # Arguments
///
/// * `view` - The view to render
/// * `base_url` - The site URL, prefixed to issue links
/// * `page` - The 1-based page of the review list
pub fn render_view(view: &ReviewView, base_url: &str, page: usize) -> String {
    match view {
        ReviewView::Notice(panel) => render_notice(panel),
        ReviewView::State(panel) => render_state(panel),
        ReviewView::Approvals(table) => render_approvals(table, base_url, page),
    }
}

fn render_notice(panel: &NoticePanel) -> String {
    format!(
        "{} [{}]\n{}\n",
        panel.title,
        panel.appearance.as_str(),
        panel.message
    )
}

fn render_action(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[{}]", label)
    } else {
        format!("[{}] (disabled)", label)
    }
}

fn render_state(panel: &StatePanel) -> String {
    format!(
        "{} [{}]\n{}\n\n{}  {}\n",
        panel.title,
        panel.appearance.as_str(),
        panel.text,
        render_action(SEND_FOR_REVIEW_LABEL, panel.send_for_review_enabled),
        render_action(SHOW_REVIEWS_LABEL, panel.show_reviews_enabled),
    )
}

fn render_timestamp(
    parsed: Option<chrono::DateTime<chrono::FixedOffset>>,
    raw: &str,
) -> String {
    parsed
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn render_approvals(table: &ApprovalsTable, base_url: &str, page: usize) -> String {
    let mut out = format!(
        "{}\n\n{:<40} {:<17} {:<17} {}\n",
        BACK_LABEL, "Summary", "Created", "Updated", "Status"
    );

    let rows = table.page(page);
    if rows.is_empty() {
        out.push_str("(no reviews on this page)\n");
    }

    for row in rows {
        out.push_str(&format!(
            "{:<40} {:<17} {:<17} {} ({})\n  {}{}\n",
            row.summary,
            render_timestamp(row.created, &row.created_raw),
            render_timestamp(row.updated, &row.updated_raw),
            row.status,
            row.status_appearance.as_str(),
            base_url,
            row.link
        ));
    }

    out.push_str(&format!(
        "\nPage {} of {} ({} reviews)\n",
        page,
        table.page_count(),
        table.rows.len()
    ));
    out
}
