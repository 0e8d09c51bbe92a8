/// HTTP object-storage avatar backend
use crate::avatar::AvatarStore;
use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use async_trait::async_trait;

/// Uploads avatar assets to an HTTP storage endpoint
///
/// Assets land at `{base_url}/{asset_path}` and that same URL is the public
/// one handed back to the profile record.
pub struct HttpAvatarStore {
    http: HttpClient,
}

impl HttpAvatarStore {
    pub fn new(base_url: &str, api: &ApiConfig) -> ClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url, api)?,
        })
    }
}

#[async_trait]
impl AvatarStore for HttpAvatarStore {
    async fn upload(&self, user_id: &str, data: Vec<u8>, mime_type: &str) -> ClientResult<String> {
        let relative = super::asset_path(user_id, mime_type)?;
        let path = format!("/{}", relative);
        self.http.put_bytes(&path, data, mime_type).await?;
        Ok(format!("{}{}", self.http.base_url(), path))
    }

    async fn remove(&self, url: &str) -> ClientResult<()> {
        let path = url.strip_prefix(self.http.base_url()).ok_or_else(|| {
            ClientError::AvatarStorage(format!("Asset is not on this storage host: {}", url))
        })?;
        self.http.delete(path).await
    }
}
