use super::schema::ServiceConfig;
use crate::error::{Result, ServeError};
use std::path::{Component, Path, PathBuf};

pub fn validate_config(config: &ServiceConfig) -> Result<()> {
    if config.server.host.trim().is_empty() {
        return Err(ServeError::ValidationError(
            "server.host must not be empty".to_string(),
        ));
    }
    if config.server.port == 0 {
        return Err(ServeError::ValidationError(
            "server.port must be non-zero".to_string(),
        ));
    }
    if config.server.max_upload_bytes == 0 {
        return Err(ServeError::ValidationError(
            "server.max_upload_bytes must be non-zero".to_string(),
        ));
    }
    if config.server.stream_chunk_bytes == 0 {
        return Err(ServeError::ValidationError(
            "server.stream_chunk_bytes must be non-zero".to_string(),
        ));
    }

    let extension = config.voices.extension.trim_start_matches('.');
    if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ServeError::ValidationError(format!(
            "voices.extension must be a plain file extension, got '{}'",
            config.voices.extension
        )));
    }

    if resolve_dir(&config.storage.temp_dir) == resolve_dir(&config.voices.presets_dir) {
        return Err(ServeError::ValidationError(
            "storage.temp_dir must differ from voices.presets_dir".to_string(),
        ));
    }
    Ok(())
}

/// Best-effort real location of a directory that may not exist yet: the deepest
/// existing ancestor is canonicalized and the remaining components appended.
fn resolve_dir(path: &Path) -> PathBuf {
    let normalized = lexically_normalized(path);
    let mut existing = normalized.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = std::fs::canonicalize(existing) {
            return missing
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return normalized,
        }
    }
}

fn lexically_normalized(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
