use crate::api_state::AppState;
use crate::models::api::{
    ActionResponse, BackupNowResponse, ConfigResponse, HistoryResponse, StatusResponse,
    SweepRecord,
};
use crate::service::backup::run_backup;
use chrono::Utc;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

/// POST /api/backup - Run a full sweep synchronously ("Backup Now")
///
/// A panicking sweep surfaces as a join error here and is reported to the
/// caller instead of crashing the server.
#[post("/backup")]
pub async fn backup_now(state: &State<AppState>) -> Json<BackupNowResponse> {
    if !state.try_begin_backup() {
        return Json(BackupNowResponse {
            success: false,
            message: "A backup is already running".to_string(),
            uploaded: 0,
            unchanged: 0,
            failed: 0,
        });
    }

    let started_at = Utc::now().to_rfc3339();
    let ctx = state.context();
    let result = rocket::tokio::task::spawn_blocking(move || run_backup(&ctx, false)).await;

    let response = match &result {
        Ok(summary) => BackupNowResponse {
            success: true,
            message: format!(
                "Backup completed: {} uploaded, {} unchanged, {} failed",
                summary.uploaded,
                summary.unchanged,
                summary.failed.len()
            ),
            uploaded: summary.uploaded,
            unchanged: summary.unchanged,
            failed: summary.failed.len(),
        },
        Err(e) => BackupNowResponse {
            success: false,
            message: format!("Backup failed: {}", e),
            uploaded: 0,
            unchanged: 0,
            failed: 0,
        },
    };

    state.finish_backup(SweepRecord {
        id: Uuid::new_v4().to_string(),
        started_at,
        completed_at: Some(Utc::now().to_rfc3339()),
        uploaded: response.uploaded,
        unchanged: response.unchanged,
        failed: response.failed,
        error: result.err().map(|e| e.to_string()),
    });

    Json(response)
}

/// POST /api/scheduler/start - Launch another scheduler loop
#[post("/scheduler/start")]
pub fn start_scheduler(state: &State<AppState>) -> Json<ActionResponse> {
    let count = state.start_scheduler();
    Json(ActionResponse {
        success: true,
        message: format!(
            "Scheduler started, backups will run as scheduled. ({} running)",
            count
        ),
    })
}

/// POST /api/watcher/start - Launch another filesystem watcher
#[post("/watcher/start")]
pub fn start_watcher(state: &State<AppState>) -> Json<ActionResponse> {
    let count = state.start_watcher();
    Json(ActionResponse {
        success: true,
        message: format!(
            "Watchdog started, it will monitor changes and trigger backups. ({} running)",
            count
        ),
    })
}

/// GET /api/status - Current front-end status
#[get("/status")]
pub fn get_status(state: &State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        backup_running: state.is_backup_running(),
        schedulers_started: state.schedulers_started(),
        watchers_started: state.watchers_started(),
    })
}

/// GET /api/history - Recent manual sweeps
#[get("/history")]
pub fn get_history(state: &State<AppState>) -> Json<HistoryResponse> {
    let entries = state.history();
    let total = entries.len();
    Json(HistoryResponse { entries, total })
}

/// GET /api/config - The configuration loaded at startup
#[get("/config")]
pub fn get_config(state: &State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        success: true,
        message: "Configuration retrieved successfully".to_string(),
        config: Some(state.context().config.clone()),
    })
}

/// GET /api/health - Health check endpoint
#[get("/health")]
pub fn health_check() -> &'static str {
    "OK"
}
