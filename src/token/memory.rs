/// In-memory token store
use crate::error::ClientResult;
use crate::token::{StoredTokens, TokenStore};
use async_trait::async_trait;
use parking_lot::RwLock;

/// Process-local token store; the session does not survive a restart
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<StoredTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> ClientResult<Option<StoredTokens>> {
        Ok(self.tokens.read().clone())
    }

    async fn save(&self, tokens: &StoredTokens) -> ClientResult<()> {
        *self.tokens.write() = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        *self.tokens.write() = None;
        Ok(())
    }
}
