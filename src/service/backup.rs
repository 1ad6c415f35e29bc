use crate::drive::RemoteStore;
use crate::models::config::Config;
use crate::service::tracker::ChangeTracker;
use crate::utils::directory::collect_candidates;
use crate::utils::progress::{create_progress_bar, create_spinner};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Everything a sweep needs, constructed once at startup and shared by the
/// CLI modes, the scheduler, the watcher and the web front end.
pub struct BackupContext {
    pub config: Config,
    pub tracker: Mutex<ChangeTracker>,
    pub store: Box<dyn RemoteStore>,
}

impl BackupContext {
    pub fn new(config: Config, store: Box<dyn RemoteStore>) -> Self {
        Self {
            config,
            tracker: Mutex::new(ChangeTracker::new()),
            store,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Uploaded,
    Unchanged,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct UploadFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Aggregate result of one sweep, so outcomes are inspectable without
/// scraping the log.
#[derive(Debug, Default)]
pub struct BackupSummary {
    pub scanned: usize,
    pub uploaded: usize,
    pub unchanged: usize,
    pub failed: Vec<UploadFailure>,
}

/// One full sweep: scan, gate every candidate through the change tracker,
/// upload the due ones sequentially. Individual failures are recorded and
/// never abort the batch.
pub fn run_backup(ctx: &BackupContext, show_progress: bool) -> BackupSummary {
    let spinner = show_progress.then(|| create_spinner("Scanning backup folders..."));
    let candidates = collect_candidates(&ctx.config);
    if let Some(spinner) = spinner {
        spinner.finish_with_message(format!("Found {} candidate files", candidates.len()));
    }

    let mut summary = BackupSummary {
        scanned: candidates.len(),
        ..Default::default()
    };

    if candidates.is_empty() {
        info!("No files to backup.");
        return summary;
    }

    let bar = show_progress.then(|| create_progress_bar(candidates.len() as u64, "Backing up"));
    for path in &candidates {
        match backup_file(ctx, path) {
            FileOutcome::Uploaded => summary.uploaded += 1,
            FileOutcome::Unchanged => summary.unchanged += 1,
            FileOutcome::Failed(message) => summary.failed.push(UploadFailure {
                path: path.clone(),
                message,
            }),
        }
        if let Some(bar) = &bar {
            bar.inc(1);
        }
    }
    if let Some(bar) = bar {
        bar.finish();
    }

    info!("Backup completed successfully.");
    summary
}

/// Tracker-gated upload of a single path, shared by the sweep and the
/// filesystem watcher. The tracker records the new timestamp before the
/// upload runs, so a failed upload is not retried until the file changes.
pub fn backup_file(ctx: &BackupContext, path: &Path) -> FileOutcome {
    let due = match ctx.tracker.lock().unwrap().check(path) {
        Ok(due) => due,
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            return FileOutcome::Failed(e.to_string());
        }
    };
    if !due {
        return FileOutcome::Unchanged;
    }

    match ctx.store.upload(path) {
        Ok(()) => {
            info!("Uploaded {} to Google Drive.", path.display());
            FileOutcome::Uploaded
        }
        Err(e) => {
            error!("Failed to upload {}: {}", path.display(), e);
            FileOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::Frequency;
    use crate::models::error::BackupError;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Test double that records uploads and can simulate a network failure
    /// for paths matching a suffix.
    struct RecordingStore {
        uploads: Arc<Mutex<Vec<PathBuf>>>,
        fail_suffix: Option<String>,
    }

    impl RemoteStore for RecordingStore {
        fn upload(&self, path: &Path) -> crate::models::error::Result<()> {
            if let Some(suffix) = &self.fail_suffix {
                if path.to_string_lossy().ends_with(suffix.as_str()) {
                    return Err(BackupError::Upload {
                        path: path.to_path_buf(),
                        message: "simulated network error".to_string(),
                    });
                }
            }
            self.uploads.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    fn test_context(
        folders: Vec<String>,
        file_types: Vec<&str>,
        fail_suffix: Option<&str>,
    ) -> (BackupContext, Arc<Mutex<Vec<PathBuf>>>) {
        let uploads = Arc::new(Mutex::new(Vec::new()));
        let store = RecordingStore {
            uploads: uploads.clone(),
            fail_suffix: fail_suffix.map(String::from),
        };
        let config = Config {
            backup_folders: folders,
            file_types: file_types.into_iter().map(String::from).collect(),
            google_drive_folder_id: "folder-id".to_string(),
            backup_schedule: Frequency::Daily,
        };
        (BackupContext::new(config, Box::new(store)), uploads)
    }

    #[test]
    fn test_sweep_uploads_only_matching_files_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::write(dir.path().join("b.png"), b"b").unwrap();

        let (ctx, uploads) = test_context(
            vec![dir.path().to_str().unwrap().to_string()],
            vec![".txt"],
            None,
        );

        let summary = run_backup(&ctx, false);
        assert_eq!(summary.scanned, 1);
        assert_eq!(summary.uploaded, 1);
        assert!(summary.failed.is_empty());
        assert_eq!(*uploads.lock().unwrap(), vec![dir.path().join("a.txt")]);

        // Nothing changed, so an immediate re-run uploads nothing.
        let summary = run_backup(&ctx, false);
        assert_eq!(summary.uploaded, 0);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(uploads.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_folder_yields_empty_sweep() {
        let (ctx, uploads) = test_context(vec!["/missing".to_string()], vec![".txt"], None);

        let summary = run_backup(&ctx, false);

        assert_eq!(summary.scanned, 0);
        assert_eq!(summary.uploaded, 0);
        assert!(uploads.lock().unwrap().is_empty());
    }

    #[test]
    fn test_upload_failure_is_recorded_and_does_not_abort_the_batch() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.txt"), b"g").unwrap();
        fs::write(dir.path().join("bad-net.txt"), b"b").unwrap();

        let (ctx, uploads) = test_context(
            vec![dir.path().to_str().unwrap().to_string()],
            vec![".txt"],
            Some("bad-net.txt"),
        );

        let summary = run_backup(&ctx, false);

        assert_eq!(summary.uploaded, 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].path, dir.path().join("bad-net.txt"));
        assert!(summary.failed[0].message.contains("simulated network error"));
        assert_eq!(*uploads.lock().unwrap(), vec![dir.path().join("good.txt")]);
    }

    #[test]
    fn test_failed_upload_is_not_retried_until_the_file_changes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad-net.txt"), b"b").unwrap();

        let (ctx, uploads) = test_context(
            vec![dir.path().to_str().unwrap().to_string()],
            vec![".txt"],
            Some("bad-net.txt"),
        );

        let summary = run_backup(&ctx, false);
        assert_eq!(summary.failed.len(), 1);

        // The tracker recorded the timestamp before the failed upload, so
        // the unchanged file is not attempted again.
        let summary = run_backup(&ctx, false);
        assert_eq!(summary.failed.len(), 0);
        assert_eq!(summary.unchanged, 1);
        assert!(uploads.lock().unwrap().is_empty());
    }

    #[test]
    fn test_single_path_outcomes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"a").unwrap();

        let (ctx, _uploads) = test_context(
            vec![dir.path().to_str().unwrap().to_string()],
            vec![".txt"],
            None,
        );

        assert_eq!(backup_file(&ctx, &path), FileOutcome::Uploaded);
        assert_eq!(backup_file(&ctx, &path), FileOutcome::Unchanged);
        assert!(matches!(
            backup_file(&ctx, &dir.path().join("gone.txt")),
            FileOutcome::Failed(_)
        ));
    }
}
