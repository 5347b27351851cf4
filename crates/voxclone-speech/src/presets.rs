//! Preset voices discovered from a directory of `<id>.<ext>` reference files

use crate::error::{SpeechError, SpeechResult};
use std::path::{Path, PathBuf};

pub const DEFAULT_PRESET_EXTENSION: &str = "wav";

/// Registry of preset voices backed by a directory. Nothing is cached; every call
/// reads the directory again.
#[derive(Clone, Debug)]
pub struct PresetRegistry {
    dir: PathBuf,
    extension: String,
}

impl PresetRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_extension(dir, DEFAULT_PRESET_EXTENSION)
    }

    pub fn with_extension(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List preset identifiers, sorted. A missing directory yields an empty list.
    pub async fn list(&self) -> SpeechResult<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("Presets directory {:?} does not exist", self.dir);
                return Ok(Vec::new());
            }
            Err(e) => return Err(SpeechError::storage(e, "list presets", &self.dir)),
        };

        let mut voices = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SpeechError::storage(e, "list presets", &self.dir))?
        {
            let path = entry.path();
            if !self.has_preset_extension(&path) {
                continue;
            }
            // Same test as `resolve`: symlinks are followed, dangling ones skipped
            let is_file = tokio::fs::metadata(&path)
                .await
                .map(|meta| meta.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(id) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_id(id) {
                    voices.push(id.to_string());
                }
            }
        }

        voices.sort();
        Ok(voices)
    }

    /// Resolve a preset id to its reference file, or `VoiceNotFound`
    pub async fn resolve(&self, id: &str) -> SpeechResult<PathBuf> {
        if !is_valid_id(id) {
            return Err(SpeechError::VoiceNotFound(id.to_string()));
        }

        let path = self.dir.join(format!("{}.{}", id, self.extension));
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(SpeechError::VoiceNotFound(id.to_string())),
        }
    }

    fn has_preset_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.extension)
            .unwrap_or(false)
    }
}

/// Ids are single path components: no separators, not `.` or `..`
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\', '\0'])
}
