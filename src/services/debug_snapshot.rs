use pixel_art::RawImage;
use std::path::{Path, PathBuf};

use super::codec;

/// Writes intermediate images to a directory for inspection.
///
/// Only active when a debug directory is configured. Write failures are
/// logged and never fail a request.
#[derive(Debug, Clone)]
pub struct DebugSnapshots {
    dir: PathBuf,
}

impl DebugSnapshots {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Timestamp shared by all snapshots of one request.
    pub fn stamp() -> String {
        chrono::Local::now().format("%Y%m%d_%H%M%S_%3f").to_string()
    }

    /// Save `image` as `<stamp>_<label>.png`. Returns the written path.
    pub fn save(&self, stamp: &str, label: &str, image: &RawImage) -> Option<PathBuf> {
        let path = self.dir.join(format!("{stamp}_{label}.png"));

        let result = std::fs::create_dir_all(&self.dir)
            .map_err(|e| e.to_string())
            .and_then(|_| codec::encode_png(image, false).map_err(|e| e.to_string()))
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(|e| e.to_string()));

        match result {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Wrote debug snapshot");
                Some(path)
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Failed to write debug snapshot");
                None
            }
        }
    }
}
