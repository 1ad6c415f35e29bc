use crate::models::error::{BackupError, Result};
use google_drive3::api::{File as DriveFile, Scope};
use google_drive3::oauth2::{self, InstalledFlowAuthenticator, InstalledFlowReturnMethod};
use google_drive3::{hyper, hyper_rustls, DriveHub};
use log::info;
use std::fs;
use std::path::Path;
use tokio::runtime::Runtime;

const TOKEN_CACHE_FILE: &str = "token_cache.json";

type Hub = DriveHub<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>;

/// Destination for backed-up files. The orchestrator and watcher only see
/// this seam; tests substitute their own store.
pub trait RemoteStore: Send + Sync {
    /// Creates a remote file named after the local base name, parented under
    /// the configured destination folder, streaming the local content.
    fn upload(&self, path: &Path) -> Result<()>;
}

/// Google Drive client. Owns a private tokio runtime so the synchronous
/// backup pipeline can drive the async SDK from plain threads.
pub struct DriveStore {
    hub: Hub,
    folder_id: String,
    runtime: Runtime,
}

impl DriveStore {
    /// Runs the interactive installed-app OAuth flow and verifies the
    /// session with a probe request. Startup aborts if this fails.
    pub fn connect(secrets_file: &str, folder_id: String) -> Result<Self> {
        let runtime = Runtime::new()?;
        let hub = runtime.block_on(build_hub(secrets_file))?;
        info!("Authenticated with Google Drive");
        Ok(Self {
            hub,
            folder_id,
            runtime,
        })
    }
}

async fn build_hub(secrets_file: &str) -> Result<Hub> {
    let secret = oauth2::read_application_secret(secrets_file)
        .await
        .map_err(|e| BackupError::Auth(format!("could not read '{}': {}", secrets_file, e)))?;

    let auth = InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::HTTPRedirect)
        .persist_tokens_to_disk(TOKEN_CACHE_FILE)
        .build()
        .await
        .map_err(|e| BackupError::Auth(e.to_string()))?;

    let client = hyper::Client::builder().build(
        hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()?
            .https_or_http()
            .enable_http1()
            .build(),
    );
    let hub = DriveHub::new(client, auth);

    // Forces the consent flow now rather than on the first upload.
    hub.files()
        .list()
        .page_size(1)
        .add_scope(Scope::Full)
        .doit()
        .await
        .map_err(|e| BackupError::Auth(e.to_string()))?;

    Ok(hub)
}

impl RemoteStore for DriveStore {
    fn upload(&self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| BackupError::Upload {
                path: path.to_path_buf(),
                message: "file has no usable name".to_string(),
            })?
            .to_string();

        let content = fs::File::open(path).map_err(|cause| BackupError::FileRead {
            path: path.to_path_buf(),
            cause,
        })?;

        let entry = DriveFile {
            name: Some(name),
            parents: Some(vec![self.folder_id.clone()]),
            ..Default::default()
        };

        self.runtime
            .block_on(
                self.hub
                    .files()
                    .create(entry)
                    .add_scope(Scope::Full)
                    .upload(content, mime::APPLICATION_OCTET_STREAM),
            )
            .map_err(|e| BackupError::Upload {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(())
    }
}
