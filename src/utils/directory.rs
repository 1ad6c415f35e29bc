use crate::models::config::Config;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Enumerates every regular file under the configured folders whose name
/// matches the configured file types. Missing folders are warned about and
/// skipped; they never abort the scan. Ordering is not guaranteed.
pub fn collect_candidates(config: &Config) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for folder in &config.backup_folders {
        let root = Path::new(folder);
        if !root.is_dir() {
            warn!("Folder {} does not exist.", folder);
            continue;
        }
        for entry in WalkDir::new(root)
            .follow_links(true)
            .contents_first(true)
            .into_iter()
            .filter_map(Result::ok)
        {
            if entry.file_type().is_dir() {
                continue;
            }
            if matches_file_types(entry.path(), &config.file_types) {
                files.push(entry.path().to_path_buf());
            }
        }
    }
    files
}

/// Suffix match against the configured file types; an empty list matches
/// every file.
pub fn matches_file_types(path: &Path, file_types: &[String]) -> bool {
    if file_types.is_empty() {
        return true;
    }
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    file_types.iter().any(|suffix| name.ends_with(suffix.as_str()))
}
