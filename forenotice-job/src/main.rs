use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::prelude::*;

mod config;
mod helpers;
mod integrations;
mod jobs;

use helpers::google_oauth::{GoogleAuthenticator, GoogleOAuthClient};
use helpers::keyring_service::KeyringService;
use integrations::calendar_client::CalendarClient;
use integrations::gmail_client::GmailClient;
use integrations::sheets_client::SheetsClient;
use jobs::notice_job::NoticeJob;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,

    /// Use a config file other than the default location
    #[arg(long)]
    config_path: Option<PathBuf>,

    /// Run one batch and exit instead of staying on the schedule
    #[arg(long)]
    once: bool,

    /// Store a Google refresh token in the OS keychain and exit
    #[arg(long, value_name = "TOKEN")]
    store_refresh_token: Option<String>,

    /// Remove the stored refresh token from the OS keychain and exit
    #[arg(long)]
    forget_refresh_token: bool,
}

fn init_tracing(log_file_path: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("forenotice-job.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.log_file_path.as_deref());

    let (config, config_path) =
        config::JobConfig::load(args.config_path).context("Failed to load config")?;
    tracing::info!("using config at {:?}", config_path);

    if let Some(token) = args.store_refresh_token {
        KeyringService::set_refresh_token(&config.google_oauth.account, &token)?;
        tracing::info!(
            "refresh token stored for account {}",
            config.google_oauth.account
        );
        return Ok(());
    }

    if args.forget_refresh_token {
        KeyringService::delete_refresh_token(&config.google_oauth.account)?;
        tracing::info!(
            "refresh token removed for account {}",
            config.google_oauth.account
        );
        return Ok(());
    }

    let oauth = GoogleOAuthClient::new(
        &config.google_oauth.client_id,
        config.google_oauth.client_secret.as_deref(),
    )
    .context("Failed to initialize OAuth client")?;
    let auth = Arc::new(GoogleAuthenticator::new(
        oauth,
        config.google_oauth.account.clone(),
    ));

    let calendar_config = config.calendar.clone().unwrap_or_default();
    let job = NoticeJob::new(
        config.gmail_query(),
        GmailClient::new(auth.clone()),
        SheetsClient::new(auth.clone(), config.sheets.spreadsheet_id.clone()),
        CalendarClient::new(
            auth.clone(),
            calendar_config
                .calendar_id
                .unwrap_or_else(|| "primary".to_string()),
            calendar_config.timezone.unwrap_or_else(|| "UTC".to_string()),
        ),
    );

    let interval_minutes = config
        .schedule
        .as_ref()
        .and_then(|s| s.interval_minutes)
        .unwrap_or(1440);

    tracing::info!(
        "foreclosure notice job started, interval {} minutes",
        interval_minutes
    );

    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_minutes * 60));

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received, shutting down");
                break;
            }
        }

        match job.run().await {
            Ok(summary) => {
                tracing::info!(
                    "job finished successfully ({} processed, {} added)",
                    summary.processed,
                    summary.added
                );
            }
            Err(e) => {
                tracing::error!("batch run failed: {:#}", e);
            }
        }

        if args.once {
            break;
        }
    }

    Ok(())
}
