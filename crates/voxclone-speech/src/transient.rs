//! Scoped storage for caller-supplied reference audio
//!
//! Every upload is written to a fresh, collision-free file under the store root and
//! handed back as a [`TransientResource`]. The handle owns that file: releasing it (or
//! dropping it) removes the file, and removal problems are logged, never returned.

use crate::error::{SpeechError, SpeechResult};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;

const MAX_EXTENSION_LEN: usize = 8;

/// Process-wide namespace for transient reference files
#[derive(Clone, Debug)]
pub struct TransientStore {
    root: PathBuf,
}

impl TransientStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn new(root: impl Into<PathBuf>) -> SpeechResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .map_err(|e| SpeechError::storage(e, "create transient directory", &root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` to a new unique location and return its handle
    pub async fn materialize(
        &self,
        bytes: &[u8],
        original_name: &str,
    ) -> SpeechResult<TransientResource> {
        let file_name = match sanitized_extension(original_name) {
            Some(ext) => format!("{}.{}", uuid::Uuid::new_v4(), ext),
            None => uuid::Uuid::new_v4().to_string(),
        };
        let path = self.root.join(file_name);

        if let Err(e) = write_new(&path, bytes).await {
            // A partially written file must not outlive the failed request
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Failed to remove partial upload {:?}: {}", path, cleanup);
                }
            }
            return Err(SpeechError::storage(e, "write upload", &path));
        }

        log::debug!("Materialized {} byte upload at {:?}", bytes.len(), path);
        Ok(TransientResource {
            path,
            created_at: Instant::now(),
            released: false,
        })
    }

    /// Remove uploads left behind by a previous run. Returns how many were removed.
    ///
    /// Only files named the way [`TransientStore::materialize`] names them are touched.
    /// Call this once at server startup, before any request is accepted.
    pub async fn purge(&self) -> usize {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cannot scan transient directory {:?}: {}", self.root, e);
                return 0;
            }
        };

        let mut removed = 0;
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if !is_transient_name(&path) {
                continue;
            }
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if is_file && tokio::fs::remove_file(&path).await.is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            log::info!("Purged {} stale transient file(s) from {:?}", removed, self.root);
        }
        removed
    }
}

async fn write_new(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(())
}

fn is_transient_name(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| uuid::Uuid::try_parse(stem).is_ok())
        .unwrap_or(false)
}

/// Keep only a short alphanumeric extension for downstream format sniffing
fn sanitized_extension(original_name: &str) -> Option<String> {
    let (_, ext) = original_name.rsplit_once('.')?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Exclusive handle to one materialized upload
#[derive(Debug)]
pub struct TransientResource {
    path: PathBuf,
    created_at: Instant,
    released: bool,
}

impl TransientResource {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Remove the underlying file. A missing file is not an error.
    pub async fn release(mut self) {
        self.released = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => log::debug!(
                "Released transient file {:?} after {:.2}s",
                self.path,
                self.age().as_secs_f64()
            ),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove transient file {:?}: {}", self.path, e),
        }
    }
}

impl Drop for TransientResource {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Removed unreleased transient file {:?}", self.path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove transient file {:?}: {}", self.path, e),
        }
    }
}
