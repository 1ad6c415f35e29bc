use crate::models::config::Config;
use crate::models::error::{BackupError, Result};
use log::{info, warn};
use std::path::Path;

/// Validates the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    info!("Validating configuration...");

    validate_backup_folders(config)?;
    validate_file_types(&config.file_types)?;
    validate_drive_folder(&config.google_drive_folder_id)?;

    info!("Configuration validation passed");
    Ok(())
}

/// A folder that is missing at load time is only warned about; the scanner
/// and watcher skip it at runtime, and it may appear later.
fn validate_backup_folders(config: &Config) -> Result<()> {
    if config.backup_folders.is_empty() {
        return Err(BackupError::ConfigInvalid(
            "At least one backup folder must be configured".to_string(),
        ));
    }

    for (idx, folder) in config.backup_folders.iter().enumerate() {
        if folder.trim().is_empty() {
            return Err(BackupError::ConfigInvalid(format!(
                "Backup folder #{} is empty",
                idx + 1
            )));
        }

        let path = Path::new(folder);
        if !path.is_dir() {
            warn!(
                "Backup folder #{} does not exist yet and will be skipped until created: {}",
                idx + 1,
                folder
            );
        }
    }

    Ok(())
}

fn validate_file_types(file_types: &[String]) -> Result<()> {
    for (idx, file_type) in file_types.iter().enumerate() {
        if file_type.trim().is_empty() {
            return Err(BackupError::ConfigInvalid(format!(
                "File type #{} is empty; remove it or use a suffix such as \".txt\"",
                idx + 1
            )));
        }
    }
    Ok(())
}

fn validate_drive_folder(folder_id: &str) -> Result<()> {
    if folder_id.trim().is_empty() {
        return Err(BackupError::ConfigInvalid(
            "google_drive_folder_id must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::Frequency;
    use tempfile::TempDir;

    fn create_test_config(folders: Vec<String>) -> Config {
        Config {
            backup_folders: folders,
            file_types: vec![".txt".to_string()],
            google_drive_folder_id: "folder-id".to_string(),
            backup_schedule: Frequency::Daily,
        }
    }

    #[test]
    fn test_validate_config_passes_for_valid_config() {
        let temp_folder = TempDir::new().unwrap();
        let config =
            create_test_config(vec![temp_folder.path().to_str().unwrap().to_string()]);

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_empty_backup_folders() {
        let config = create_test_config(vec![]);

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("At least one backup folder"));
    }

    #[test]
    fn test_rejects_blank_backup_folder_entry() {
        let config = create_test_config(vec!["   ".to_string()]);

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("is empty"));
    }

    #[test]
    fn test_accepts_nonexistent_folder_with_warning() {
        // Missing folders are a runtime concern, not a config error.
        let config = create_test_config(vec!["/this/does/not/exist".to_string()]);

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_empty_drive_folder_id() {
        let temp_folder = TempDir::new().unwrap();
        let mut config =
            create_test_config(vec![temp_folder.path().to_str().unwrap().to_string()]);
        config.google_drive_folder_id = String::new();

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("google_drive_folder_id"));
    }

    #[test]
    fn test_rejects_blank_file_type_entry() {
        let temp_folder = TempDir::new().unwrap();
        let mut config =
            create_test_config(vec![temp_folder.path().to_str().unwrap().to_string()]);
        config.file_types = vec!["".to_string()];

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("File type"));
    }
}
