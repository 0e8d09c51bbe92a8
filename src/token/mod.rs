/// Token persistence
///
/// The access/refresh pair is cached in memory by the session layer and
/// mirrored through a `TokenStore` so a session survives process restarts.
mod disk;
mod memory;

pub use disk::DiskTokenStore;
pub use memory::MemoryTokenStore;

use crate::error::ClientResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The persisted token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Persistent key-value storage for the session tokens
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the stored pair, `None` when nothing has been saved
    async fn load(&self) -> ClientResult<Option<StoredTokens>>;

    /// Persist the pair, replacing any previous one
    async fn save(&self, tokens: &StoredTokens) -> ClientResult<()>;

    /// Remove both tokens; succeeds when nothing was stored
    async fn clear(&self) -> ClientResult<()>;
}
