//! CAPDUEL — Marty vs Winslow market-cap race email reporter.
//!
//! Entry point. Resolves configuration, initialises structured logging,
//! then runs the load → render → send sequence once and exits. The
//! process is triggered externally on a schedule; any failure aborts the
//! run with a non-zero status and the next trigger starts fresh.

use anyhow::Result;
use chrono::Local;
use tracing::info;

use capduel::config::ReportConfig;
use capduel::history::{self, HistoryError};
use capduel::mailer::{self, BrevoClient, ReportMailer};
use capduel::report;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Resolve configuration before touching the filesystem or network.
    let cfg = ReportConfig::from_env()?;

    init_logging();

    info!(to = %cfg.to_email, from = %cfg.from_email, "CAPDUEL report run starting");

    let rows = match history::load_history(None) {
        Ok(rows) => rows,
        Err(HistoryError::Missing { path }) => {
            eprintln!("No history.json found at {path}");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let today = Local::now().date_naive();
    let html = report::render_report(&rows, cfg.site_url.as_deref(), today);
    info!(records = rows.len(), bytes = html.len(), "Report rendered");

    let brevo = BrevoClient::new(&cfg)?;
    brevo
        .send_report(&mailer::subject_line(today), &html)
        .await?;

    info!("Report run complete");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("capduel=info"));

    if std::env::var("CAPDUEL_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
