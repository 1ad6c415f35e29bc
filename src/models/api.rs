use serde::{Deserialize, Serialize};

/// Generic acknowledgment for the scheduler/watchdog start endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// Response for the synchronous "Backup Now" endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupNowResponse {
    pub success: bool,
    pub message: String,
    pub uploaded: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Status response for GET /api/status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub backup_running: bool,
    pub schedulers_started: usize,
    pub watchers_started: usize,
}

/// One completed manual sweep, kept in the in-memory history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRecord {
    pub id: String,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub uploaded: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub error: Option<String>,
}

/// Sweep history response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub entries: Vec<SweepRecord>,
    pub total: usize,
}

/// Configuration response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub success: bool,
    pub message: String,
    pub config: Option<crate::models::config::Config>,
}
