/// Disk-backed token store
use crate::error::{ClientError, ClientResult};
use crate::token::{StoredTokens, TokenStore};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// Stores the token pair as a small JSON file
///
/// A missing file reads as "no session"; clearing a missing file succeeds.
pub struct DiskTokenStore {
    path: PathBuf,
}

impl DiskTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn ensure_parent_dir(&self) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                ClientError::TokenStorage(format!("Failed to create token directory: {}", e))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl TokenStore for DiskTokenStore {
    async fn load(&self) -> ClientResult<Option<StoredTokens>> {
        match fs::read(&self.path).await {
            Ok(data) => {
                let tokens = serde_json::from_slice(&data).map_err(|e| {
                    ClientError::TokenStorage(format!("Corrupt token file: {}", e))
                })?;
                Ok(Some(tokens))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::TokenStorage(format!(
                "Failed to read tokens: {}",
                e
            ))),
        }
    }

    async fn save(&self, tokens: &StoredTokens) -> ClientResult<()> {
        self.ensure_parent_dir().await?;
        let data = serde_json::to_vec_pretty(tokens)
            .map_err(|e| ClientError::TokenStorage(format!("Failed to encode tokens: {}", e)))?;
        fs::write(&self.path, data)
            .await
            .map_err(|e| ClientError::TokenStorage(format!("Failed to write tokens: {}", e)))
    }

    async fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::TokenStorage(format!(
                "Failed to clear tokens: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_round_trip_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let tokens = StoredTokens {
            access_token: "access-abc".to_string(),
            refresh_token: "refresh-def".to_string(),
        };
        DiskTokenStore::new(path.clone()).save(&tokens).await.unwrap();

        // A fresh store over the same path sees the pair
        let reopened = DiskTokenStore::new(path);
        assert_eq!(reopened.load().await.unwrap(), Some(tokens));
    }

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let store = DiskTokenStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = DiskTokenStore::new(dir.path().join("tokens.json"));

        store
            .save(&StoredTokens {
                access_token: "a".to_string(),
                refresh_token: "r".to_string(),
            })
            .await
            .unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = DiskTokenStore::new(dir.path().join("nested/deeper/tokens.json"));
        store
            .save(&StoredTokens {
                access_token: "a".to_string(),
                refresh_token: "r".to_string(),
            })
            .await
            .unwrap();
        assert!(store.load().await.unwrap().is_some());
    }
}
