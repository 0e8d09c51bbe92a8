/// In-memory avatar storage, for tests and prototyping
use crate::avatar::AvatarStore;
use crate::error::ClientResult;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryAvatarStore {
    assets: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryAvatarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an asset still exists behind a URL (test helper)
    pub fn contains(&self, url: &str) -> bool {
        self.assets.read().contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.assets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.read().is_empty()
    }
}

#[async_trait]
impl AvatarStore for MemoryAvatarStore {
    async fn upload(&self, user_id: &str, data: Vec<u8>, mime_type: &str) -> ClientResult<String> {
        let url = format!("memory://{}", super::asset_path(user_id, mime_type)?);
        self.assets.write().insert(url.clone(), data);
        Ok(url)
    }

    async fn remove(&self, url: &str) -> ClientResult<()> {
        self.assets.write().remove(url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_remove_cycle() {
        let store = MemoryAvatarStore::new();
        let url = store
            .upload("9", vec![0x89, 0x50], "image/png")
            .await
            .unwrap();
        assert!(store.contains(&url));

        store.remove(&url).await.unwrap();
        assert!(!store.contains(&url));
        // Idempotent
        store.remove(&url).await.unwrap();
    }
}
