use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Blob store for uploaded video assets.
///
/// Saves bytes under the storage root and hands back the public path the
/// catalog record keeps. Assets are served statically from that path; the
/// store never reads them back.
#[derive(Debug, Clone)]
pub struct VideoStore {
    root: PathBuf,
}

/// Directory under the storage root (and the public prefix) for video assets
const VIDEOS_SUBDIR: &str = "videos";

impl VideoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store an uploaded asset and return its public path
    /// (`/storage/videos/<uuid>.<ext>`).
    ///
    /// The stored name is a fresh UUID; the client filename contributes only
    /// its extension, so nothing attacker-controlled lands on disk.
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> std::io::Result<String> {
        let ext = original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string());

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), ext);

        let dir = self.root.join(VIDEOS_SUBDIR);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        tracing::info!("Stored video asset {} ({} bytes)", file_name, bytes.len());

        Ok(format!("/storage/{}/{}", VIDEOS_SUBDIR, file_name))
    }
}
