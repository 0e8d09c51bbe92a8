/// Application context and dependency injection
use crate::{
    avatar::{AvatarStore, DiskAvatarStore, HttpAvatarStore, MemoryAvatarStore},
    backend::{build_backend, Backend},
    bookings::BookingManager,
    catalog::CatalogManager,
    config::{AvatarStorageConfig, ClientConfig, TokenStorageConfig},
    error::ClientResult,
    profile::ProfileManager,
    session::SessionManager,
    token::{DiskTokenStore, MemoryTokenStore, TokenStore},
};
use std::sync::Arc;

/// Application context holding all client services
///
/// Explicitly owned and injectable: construct one per process, or one per
/// test case — there is no hidden global state behind it.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ClientConfig>,
    pub token_store: Arc<dyn TokenStore>,
    pub avatar_store: Arc<dyn AvatarStore>,
    pub backend: Arc<dyn Backend>,
    pub session: Arc<SessionManager>,
    pub bookings: Arc<BookingManager>,
    pub profile: Arc<ProfileManager>,
    pub catalog: Arc<CatalogManager>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let token_store: Arc<dyn TokenStore> = match &config.token_storage {
            TokenStorageConfig::Memory => Arc::new(MemoryTokenStore::new()),
            TokenStorageConfig::Disk { path } => Arc::new(DiskTokenStore::new(path.clone())),
        };

        let avatar_store: Arc<dyn AvatarStore> = match &config.avatar_storage {
            AvatarStorageConfig::Memory => Arc::new(MemoryAvatarStore::new()),
            AvatarStorageConfig::Disk { location } => {
                Arc::new(DiskAvatarStore::new(location.clone()))
            }
            AvatarStorageConfig::Http { base_url } => {
                Arc::new(HttpAvatarStore::new(base_url, &config.api)?)
            }
        };

        let backend = build_backend(&config.backend, &config.api)?;
        Ok(Self::wire(config, backend, token_store, avatar_store))
    }

    /// Wire a context around injected adapter and store instances
    ///
    /// Used by tests and embedders that bring their own backend (e.g. the
    /// in-process `MemoryBackend`).
    pub fn with_backend(
        config: ClientConfig,
        backend: Arc<dyn Backend>,
        token_store: Arc<dyn TokenStore>,
        avatar_store: Arc<dyn AvatarStore>,
    ) -> Self {
        Self::wire(config, backend, token_store, avatar_store)
    }

    fn wire(
        config: ClientConfig,
        backend: Arc<dyn Backend>,
        token_store: Arc<dyn TokenStore>,
        avatar_store: Arc<dyn AvatarStore>,
    ) -> Self {
        let session = Arc::new(SessionManager::new(backend.clone(), token_store.clone()));
        let bookings = Arc::new(BookingManager::new(backend.clone(), session.clone()));
        let profile = Arc::new(ProfileManager::new(
            backend.clone(),
            avatar_store.clone(),
            session.clone(),
        ));
        let catalog = Arc::new(CatalogManager::new(backend.clone()));

        Self {
            config: Arc::new(config),
            token_store,
            avatar_store,
            backend,
            session,
            bookings,
            profile,
            catalog,
        }
    }

    /// Run the startup session restore
    pub async fn init(&self) {
        self.session.restore().await;
    }
}
