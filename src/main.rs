mod api_routes;
mod api_state;
mod drive;
mod models;
mod service;
mod utils;
mod web_routes;

use crate::api_state::AppState;
use crate::drive::DriveStore;
use crate::models::config::{setup_config, Config};
use crate::service::backup::{run_backup, BackupContext};
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::OpenOptions;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[macro_use]
extern crate rocket;

use rocket_dyn_templates::Template;

#[derive(Parser)]
#[command(name = "RustyDriveBackup")]
#[command(about = "Folder backup utility for Google Drive", long_about = None)]
struct Cli {
    #[arg(
        short = 'c',
        long = "config",
        default_value = "config.json",
        env = "RUSTYDRIVEBACKUP_CONFIG"
    )]
    config_file: String,

    #[arg(
        long = "secrets",
        default_value = "client_secrets.json",
        env = "RUSTYDRIVEBACKUP_SECRETS"
    )]
    secrets_file: String,

    #[arg(
        short = 'l',
        long = "log-level",
        default_value = "info",
        env = "LOG_LEVEL"
    )]
    log_level: String,

    /// Append log lines to this file instead of stderr
    #[arg(long = "log-file")]
    log_file: Option<String>,

    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    #[arg(short = 'v', long = "validate-only")]
    validate_only: bool,

    /// Run the scheduler loop in the foreground until interrupted
    #[arg(long = "schedule", conflicts_with_all = ["watch", "serve"])]
    schedule: bool,

    /// Run the filesystem watcher in the foreground until interrupted
    #[arg(short = 'w', long = "watch", conflicts_with = "serve")]
    watch: bool,

    /// Serve the web front end
    #[arg(long = "serve")]
    serve: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(&args.log_level, args.log_file.as_deref())?;

    info!("RustyDriveBackup starting...");
    let config: Config =
        setup_config(args.config_file).context("Failed to load configuration")?;

    if args.validate_only {
        info!("Configuration is valid. Exiting (--validate-only mode).");
        return Ok(());
    }

    // One Drive session per process; nothing works without it.
    let store = DriveStore::connect(&args.secrets_file, config.google_drive_folder_id.clone())
        .context("Google Drive authentication failed")?;
    let ctx = Arc::new(BackupContext::new(config, Box::new(store)));

    if args.serve {
        serve(ctx)
    } else if args.schedule {
        let cancel = install_interrupt_flag()?;
        service::scheduler::run_scheduler(ctx, cancel).context("Scheduler loop failed")?;
        Ok(())
    } else if args.watch {
        let cancel = install_interrupt_flag()?;
        service::watcher::run_watcher(ctx, cancel).context("File watcher failed")?;
        Ok(())
    } else {
        let summary = run_backup(&ctx, !args.quiet);
        info!(
            "{} uploaded, {} unchanged, {} failed",
            summary.uploaded,
            summary.unchanged,
            summary.failed.len()
        );
        Ok(())
    }
}

fn install_interrupt_flag() -> Result<Arc<AtomicBool>> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal, stopping...");
        flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;
    Ok(cancel)
}

fn init_logging(level: &str, log_file: Option<&str>) -> Result<()> {
    let filter = match level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(filter).format_timestamp_secs();
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn serve(ctx: Arc<BackupContext>) -> Result<()> {
    let state = AppState::new(ctx);
    rocket::execute(build_rocket(state).launch()).context("Web front end failed")?;
    Ok(())
}

fn build_rocket(state: AppState) -> rocket::Rocket<rocket::Build> {
    rocket::build()
        .manage(state)
        .attach(Template::fairing())
        .mount("/", routes![web_routes::index])
        .mount(
            "/api",
            routes![
                api_routes::backup_now,
                api_routes::start_scheduler,
                api_routes::start_watcher,
                api_routes::get_status,
                api_routes::get_history,
                api_routes::get_config,
                api_routes::health_check,
            ],
        )
}
