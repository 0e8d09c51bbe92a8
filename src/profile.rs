/// Profile operations: fetch, upsert save, and avatar handling
use crate::avatar::{self, AvatarStore};
use crate::backend::Backend;
use crate::error::ClientResult;
use crate::models::{Profile, ProfileUpdate};
use crate::session::SessionManager;
use std::sync::Arc;
use tracing::warn;

pub struct ProfileManager {
    backend: Arc<dyn Backend>,
    avatar_store: Arc<dyn AvatarStore>,
    session: Arc<SessionManager>,
}

impl ProfileManager {
    pub fn new(
        backend: Arc<dyn Backend>,
        avatar_store: Arc<dyn AvatarStore>,
        session: Arc<SessionManager>,
    ) -> Self {
        Self {
            backend,
            avatar_store,
            session,
        }
    }

    /// The current user's profile; `None` when they have never saved one
    pub async fn fetch(&self) -> ClientResult<Option<Profile>> {
        let user = self.session.require_user()?;
        self.backend.fetch_profile(&user.id).await
    }

    /// Another user's profile (staff views)
    pub async fn fetch_for(&self, user_id: &str) -> ClientResult<Option<Profile>> {
        self.backend.fetch_profile(user_id).await
    }

    /// Upsert the profile: update if one exists, insert otherwise
    ///
    /// The backend's upsert primitive is atomic on the owning user id, so a
    /// double-save from two tabs cannot produce two rows.
    pub async fn save(&self, update: ProfileUpdate) -> ClientResult<Profile> {
        self.session.require_user()?;
        self.backend.save_profile(&update).await
    }

    /// Upload a new avatar image and point the profile at it
    ///
    /// Non-image bytes fail closed before anything is stored. Once the new
    /// asset is in place and the profile updated, the previous asset is
    /// deleted best-effort.
    pub async fn upload_avatar(&self, data: Vec<u8>, mime_type: &str) -> ClientResult<Profile> {
        let user = self.session.require_user()?;
        avatar::validate_image(&data, mime_type)?;

        let previous = self
            .backend
            .fetch_profile(&user.id)
            .await?
            .and_then(|p| p.avatar_url);

        let url = self.avatar_store.upload(&user.id, data, mime_type).await?;
        let profile = self
            .backend
            .save_profile(&ProfileUpdate {
                avatar_url: Some(Some(url)),
                ..Default::default()
            })
            .await?;

        if let Some(previous_url) = previous {
            if let Err(e) = self.avatar_store.remove(&previous_url).await {
                warn!("Failed to delete previous avatar asset: {}", e);
            }
        }
        Ok(profile)
    }

    /// Remove the avatar: delete the asset best-effort, always blank the URL
    pub async fn remove_avatar(&self) -> ClientResult<Profile> {
        let user = self.session.require_user()?;

        let current = self
            .backend
            .fetch_profile(&user.id)
            .await?
            .and_then(|p| p.avatar_url);
        if let Some(url) = current {
            if let Err(e) = self.avatar_store.remove(&url).await {
                // A storage cleanup failure must not block the profile update
                warn!("Failed to delete avatar asset: {}", e);
            }
        }

        self.backend
            .save_profile(&ProfileUpdate {
                avatar_url: Some(None),
                ..Default::default()
            })
            .await
    }
}
