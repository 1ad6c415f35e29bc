use crate::models::error::Result;
use crate::service::backup::{run_backup, BackupContext};
use chrono::{DateTime, Local};
use cron::Schedule;
use log::{info, warn};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polling loop that fires one sweep per scheduled time. Checks the
/// cancellation flag at least once per second and returns once it is raised.
/// Sweeps run synchronously on the loop's own thread; overlapping runs are
/// not serialized beyond that.
pub fn run_scheduler(ctx: Arc<BackupContext>, cancel: Arc<AtomicBool>) -> Result<()> {
    let schedule = Schedule::from_str(ctx.config.backup_schedule.cron_expr())?;
    info!(
        "Scheduler started ({:?} backups at 01:00)",
        ctx.config.backup_schedule
    );

    let mut announced: Option<DateTime<Local>> = None;
    while !cancel.load(Ordering::SeqCst) {
        let now = Local::now();
        let next = match schedule.upcoming(Local).next() {
            Some(next) => next,
            None => {
                warn!("No upcoming scheduled times found");
                break;
            }
        };

        if announced != Some(next) {
            info!("Next backup scheduled for {}", next.format("%Y-%m-%d %H:%M:%S"));
            announced = Some(next);
        }

        let until = (next - now).to_std().unwrap_or(Duration::ZERO);
        std::thread::sleep(POLL_INTERVAL.min(until));

        if Local::now() >= next && !cancel.load(Ordering::SeqCst) {
            info!("Running scheduled backup...");
            let summary = run_backup(&ctx, false);
            info!(
                "Scheduled backup finished: {} uploaded, {} unchanged, {} failed",
                summary.uploaded,
                summary.unchanged,
                summary.failed.len()
            );
        }
    }

    info!("Scheduler stopped");
    Ok(())
}
