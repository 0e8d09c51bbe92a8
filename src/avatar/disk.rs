/// Disk-based avatar storage backend
use crate::avatar::AvatarStore;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// Stores avatar assets on the local filesystem
///
/// URLs are `file://` paths under the base directory.
#[derive(Clone)]
pub struct DiskAvatarStore {
    base_path: PathBuf,
}

impl DiskAvatarStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn url_for(&self, relative: &str) -> String {
        format!("file://{}", self.base_path.join(relative).display())
    }

    /// Resolve a URL back to a path, refusing anything outside the base
    fn path_for(&self, url: &str) -> ClientResult<PathBuf> {
        let path = url
            .strip_prefix("file://")
            .map(PathBuf::from)
            .ok_or_else(|| {
                ClientError::AvatarStorage(format!("Not a disk avatar URL: {}", url))
            })?;
        if !path.starts_with(&self.base_path) {
            return Err(ClientError::AvatarStorage(format!(
                "Asset is outside the avatar directory: {}",
                url
            )));
        }
        Ok(path)
    }
}

#[async_trait]
impl AvatarStore for DiskAvatarStore {
    async fn upload(&self, user_id: &str, data: Vec<u8>, mime_type: &str) -> ClientResult<String> {
        let relative = super::asset_path(user_id, mime_type)?;
        let full_path = self.base_path.join(&relative);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                ClientError::AvatarStorage(format!("Failed to create avatar directory: {}", e))
            })?;
        }

        fs::write(&full_path, data)
            .await
            .map_err(|e| ClientError::AvatarStorage(format!("Failed to write avatar: {}", e)))?;

        Ok(self.url_for(&relative))
    }

    async fn remove(&self, url: &str) -> ClientResult<()> {
        let path = self.path_for(url)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::AvatarStorage(format!(
                "Failed to delete avatar: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PNG_BYTES: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
    ];

    #[tokio::test]
    async fn test_upload_and_remove() {
        let dir = tempdir().unwrap();
        let store = DiskAvatarStore::new(dir.path().to_path_buf());

        let url = store
            .upload("7", PNG_BYTES.to_vec(), "image/png")
            .await
            .unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.contains("avatars/7/"));

        let on_disk = store.path_for(&url).unwrap();
        assert!(on_disk.exists());

        store.remove(&url).await.unwrap();
        assert!(!on_disk.exists());
    }

    #[tokio::test]
    async fn test_remove_missing_asset_succeeds() {
        let dir = tempdir().unwrap();
        let store = DiskAvatarStore::new(dir.path().to_path_buf());
        let url = format!("file://{}/avatars/7/gone.png", dir.path().display());
        store.remove(&url).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_refuses_foreign_paths() {
        let dir = tempdir().unwrap();
        let store = DiskAvatarStore::new(dir.path().join("avatars-root"));
        let err = store.remove("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, ClientError::AvatarStorage(_)));
    }
}
