use crate::models::error::Result;
use crate::service::backup::{backup_file, BackupContext};
use crate::utils::directory::matches_file_types;
use log::{error, info, warn};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

const CANCEL_POLL: Duration = Duration::from_millis(500);

/// Subscribes to create/modify events on every configured folder,
/// recursively, and feeds matching paths through the same tracker-gated
/// upload the orchestrator uses. Returns once the cancellation flag is
/// raised; dropping the watcher tears the subscriptions down.
pub fn run_watcher(ctx: Arc<BackupContext>, cancel: Arc<AtomicBool>) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut watcher =
        notify::recommended_watcher(move |res: std::result::Result<Event, notify::Error>| {
            let _ = tx.send(res);
        })?;

    let mut watched = 0;
    for folder in &ctx.config.backup_folders {
        let root = Path::new(folder);
        if !root.is_dir() {
            warn!("Folder {} does not exist.", folder);
            continue;
        }
        watcher.watch(root, RecursiveMode::Recursive)?;
        watched += 1;
    }
    info!("Watching {} folders for changes", watched);

    while !cancel.load(Ordering::SeqCst) {
        match rx.recv_timeout(CANCEL_POLL) {
            Ok(Ok(event)) => handle_event(&ctx, &event),
            Ok(Err(e)) => error!("Watch error: {}", e),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    info!("File watcher stopped");
    Ok(())
}

fn handle_event(ctx: &BackupContext, event: &Event) {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return;
    }
    for path in &event.paths {
        if !should_handle(path, &ctx.config.file_types) {
            continue;
        }
        info!("Detected change in {}, triggering backup.", path.display());
        backup_file(ctx, path);
    }
}

/// Directories, vanished paths and non-matching names are ignored at the
/// event level.
fn should_handle(path: &Path, file_types: &[String]) -> bool {
    path.is_file() && matches_file_types(path, file_types)
}
