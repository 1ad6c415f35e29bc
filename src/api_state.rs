use crate::models::api::SweepRecord;
use crate::service::backup::BackupContext;
use crate::service::{scheduler, watcher};
use log::error;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Maximum number of history entries to keep in memory
const MAX_HISTORY_ENTRIES: usize = 100;

/// Shared front-end state around the backup context.
#[derive(Clone)]
pub struct AppState {
    ctx: Arc<BackupContext>,

    /// True while a manual "Backup Now" sweep is in flight
    backup_running: Arc<AtomicBool>,

    /// Cancellation flag handed to every spawned loop
    cancel: Arc<AtomicBool>,

    /// Recent manual sweep history
    history: Arc<Mutex<VecDeque<SweepRecord>>>,

    schedulers_started: Arc<AtomicUsize>,
    watchers_started: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(ctx: Arc<BackupContext>) -> Self {
        Self {
            ctx,
            backup_running: Arc::new(AtomicBool::new(false)),
            cancel: Arc::new(AtomicBool::new(false)),
            history: Arc::new(Mutex::new(VecDeque::new())),
            schedulers_started: Arc::new(AtomicUsize::new(0)),
            watchers_started: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn context(&self) -> Arc<BackupContext> {
        self.ctx.clone()
    }

    /// Marks a manual sweep as running. Returns false if one already is,
    /// mirroring the disabled "Backup Now" button.
    pub fn try_begin_backup(&self) -> bool {
        self.backup_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn finish_backup(&self, record: SweepRecord) {
        let mut history = self.history.lock().unwrap();
        history.push_front(record);
        if history.len() > MAX_HISTORY_ENTRIES {
            history.pop_back();
        }
        drop(history);
        self.backup_running.store(false, Ordering::SeqCst);
    }

    pub fn is_backup_running(&self) -> bool {
        self.backup_running.load(Ordering::SeqCst)
    }

    /// Each call spawns another independent scheduler loop; repeated
    /// presses stack. Returns the total number started so far.
    pub fn start_scheduler(&self) -> usize {
        let ctx = self.ctx.clone();
        let cancel = self.cancel.clone();
        std::thread::spawn(move || {
            if let Err(e) = scheduler::run_scheduler(ctx, cancel) {
                error!("Scheduler loop exited with error: {}", e);
            }
        });
        self.schedulers_started.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Same stacking contract as the scheduler.
    pub fn start_watcher(&self) -> usize {
        let ctx = self.ctx.clone();
        let cancel = self.cancel.clone();
        std::thread::spawn(move || {
            if let Err(e) = watcher::run_watcher(ctx, cancel) {
                error!("File watcher exited with error: {}", e);
            }
        });
        self.watchers_started.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn schedulers_started(&self) -> usize {
        self.schedulers_started.load(Ordering::SeqCst)
    }

    pub fn watchers_started(&self) -> usize {
        self.watchers_started.load(Ordering::SeqCst)
    }

    pub fn history(&self) -> Vec<SweepRecord> {
        self.history.lock().unwrap().iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::RemoteStore;
    use crate::models::config::{Config, Frequency};
    use std::path::Path;

    struct NullStore;

    impl RemoteStore for NullStore {
        fn upload(&self, _path: &Path) -> crate::models::error::Result<()> {
            Ok(())
        }
    }

    fn test_state() -> AppState {
        let config = Config {
            backup_folders: vec!["/tmp".to_string()],
            file_types: vec![],
            google_drive_folder_id: "folder-id".to_string(),
            backup_schedule: Frequency::Daily,
        };
        AppState::new(Arc::new(BackupContext::new(config, Box::new(NullStore))))
    }

    fn test_record(id: &str) -> SweepRecord {
        SweepRecord {
            id: id.to_string(),
            started_at: "2026-01-01T00:00:00Z".to_string(),
            completed_at: None,
            uploaded: 0,
            unchanged: 0,
            failed: 0,
            error: None,
        }
    }

    #[test]
    fn test_only_one_manual_backup_at_a_time() {
        let state = test_state();

        assert!(state.try_begin_backup());
        assert!(state.is_backup_running());
        assert!(!state.try_begin_backup());

        state.finish_backup(test_record("run-1"));
        assert!(!state.is_backup_running());
        assert!(state.try_begin_backup());
    }

    #[test]
    fn test_history_is_bounded_and_newest_first() {
        let state = test_state();

        for i in 0..(MAX_HISTORY_ENTRIES + 5) {
            assert!(state.try_begin_backup());
            state.finish_backup(test_record(&format!("run-{}", i)));
        }

        let history = state.history();
        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(history[0].id, format!("run-{}", MAX_HISTORY_ENTRIES + 4));
    }
}
