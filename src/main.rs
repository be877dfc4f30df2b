use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use fleetwatch::alert::AlertTransition;
use fleetwatch::source::FetchError;
use fleetwatch::{AlertSeverity, ApiClient, ApiSource, Session, Watcher, WatchConfig};

#[derive(Parser, Debug)]
#[command(name = "fleetwatch")]
#[command(about = "Diagnostic client for monitoring industrial machine fleet health")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the fleet API (overrides config)
    #[arg(short, long)]
    url: Option<String>,

    /// Poll cadence in seconds, measured from cycle completion (overrides config)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Path where the bearer token is persisted (overrides config)
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Username (email) to authenticate with before watching
    #[arg(long, requires = "password")]
    username: Option<String>,

    /// Password for --username
    #[arg(long, requires = "username")]
    password: Option<String>,

    /// Download the fleet summary report (PDF) to this path and exit
    #[arg(short, long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fleetwatch=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = WatchConfig::load(args.config.as_deref())?;
    if let Some(url) = args.url {
        config.base_url = url;
    }
    if let Some(interval) = args.interval {
        config.cadence_secs = interval;
    }
    if let Some(token_file) = args.token_file {
        config.token_file = Some(token_file);
    }

    let session = Arc::new(match &config.token_file {
        Some(path) => Session::with_store(path),
        None => Session::new(),
    });

    let client = ApiClient::builder()
        .base_url(&config.base_url)
        .timeout(config.timeout())
        .session(session.clone())
        .build();

    if let (Some(username), Some(password)) = (&args.username, &args.password) {
        client
            .login(username, password)
            .await
            .context("login failed")?;
        info!(user = %username, "authenticated");
    }

    if !session.is_authenticated() {
        bail!("not authenticated: pass --username/--password or provide a stored token");
    }

    if let Some(report_path) = args.report {
        return download_report(&client, &report_path).await;
    }

    run_watch(client, config).await
}

/// One-shot download of the summary report PDF.
async fn download_report(client: &ApiClient, path: &std::path::Path) -> Result<()> {
    let bytes = client
        .summary_report()
        .await
        .context("report download failed")?;
    std::fs::write(path, &bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), size = bytes.len(), "report saved");
    Ok(())
}

/// Run the polling loop until interrupted or the credential is rejected.
async fn run_watch(client: ApiClient, config: WatchConfig) -> Result<()> {
    let source = ApiSource::new(client, &config.base_url);
    let (mut updates, handle) = Watcher::new(source).cadence(config.cadence()).start();
    info!(url = %config.base_url, cadence_secs = config.cadence_secs, "watching fleet");

    let mut banner_shown = false;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                handle.stop();
                return Ok(());
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    // Watcher exited on its own (session torn down)
                    bail!("polling stopped: authentication rejected, log in again");
                }
                let update = updates.borrow_and_update().clone();
                report_update(&update, &mut banner_shown);
                if matches!(update.error, Some(FetchError::Unauthorized)) {
                    bail!("polling stopped: authentication rejected, log in again");
                }
            }
        }
    }
}

fn report_update(update: &fleetwatch::FleetUpdate, banner_shown: &mut bool) {
    match &update.error {
        Some(err) => {
            // Persistent banner: shown once per outage, retried every cycle
            if !*banner_shown {
                error!(cycle = update.cycle, error = %err, "fleet unreachable");
                *banner_shown = true;
            }
            return;
        }
        None => {
            if *banner_shown {
                info!(cycle = update.cycle, "connection restored");
                *banner_shown = false;
            }
        }
    }

    info!(
        cycle = update.cycle,
        total = update.stats.total,
        critical = update.stats.critical,
        healthy = update.stats.healthy,
        "fleet status"
    );

    for alert in &update.alerts {
        match alert.transition {
            AlertTransition::Raised => match alert.severity {
                AlertSeverity::Critical => {
                    error!(id = %alert.notification_id, "{}", alert.message);
                }
                AlertSeverity::Danger => {
                    warn!(id = %alert.notification_id, "{}", alert.message);
                }
            },
            // Same notification id as the raise: coalesce instead of re-logging
            AlertTransition::Active => {
                debug!(id = %alert.notification_id, "alert still active");
            }
            AlertTransition::Resolved => {
                info!(id = %alert.notification_id, "{}", alert.message);
            }
        }
    }
}
