/// Session manager
///
/// Owns the authenticated identity for the process: the current user, their
/// role, and the token lifecycle (acquire, persist, attach, clear). There is
/// exactly one invariant here: a stored access token implies a validated
/// user. Whenever validation fails, tokens and in-memory state are cleared
/// together so no half-logged-in state can be observed.
use crate::backend::Backend;
use crate::error::{ClientError, ClientResult};
use crate::models::{AuthSession, ProfileUpdate, RegistrationRequest, Role, User};
use crate::token::{StoredTokens, TokenStore};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Observable session state for the UI layer
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<User>,
    pub role: Option<Role>,
    pub loading: bool,
}

pub struct SessionManager {
    backend: Arc<dyn Backend>,
    token_store: Arc<dyn TokenStore>,
    state: RwLock<SessionState>,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn Backend>, token_store: Arc<dyn TokenStore>) -> Self {
        Self {
            backend,
            token_store,
            state: RwLock::new(SessionState {
                user: None,
                role: None,
                // Stays set until the initial restore() has run
                loading: true,
            }),
        }
    }

    /// Restore a persisted session on startup
    ///
    /// If tokens are stored, attach the access token and validate it by
    /// fetching the current user. Any failure — expired token or a transient
    /// network error alike — silently drops to logged-out and clears the
    /// stored tokens. This is the only automatic transition not triggered by
    /// an explicit user action.
    pub async fn restore(&self) {
        let tokens = match self.token_store.load().await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("Failed to load stored tokens: {}", e);
                None
            }
        };

        if let Some(tokens) = tokens {
            self.backend.set_token(Some(tokens.access_token.clone()));
            match self.backend.current_user().await {
                Ok(user) => {
                    let mut state = self.state.write();
                    state.role = Some(user.role);
                    state.user = Some(user);
                }
                Err(e) => {
                    debug!("Session restore failed, dropping to logged out: {}", e);
                    self.clear_session().await;
                }
            }
        }

        self.state.write().loading = false;
    }

    /// Register a new account and open a session
    pub async fn sign_up(&self, request: RegistrationRequest) -> ClientResult<User> {
        let session = self.backend.register(&request).await?;
        self.install_session(session).await
    }

    /// Sign in with email and password
    ///
    /// The loading flag is set for the duration so the UI can disable its
    /// form. On failure the session state is untouched.
    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<User> {
        self.state.write().loading = true;
        let result = match self.backend.login(email, password).await {
            Ok(session) => self.install_session(session).await,
            Err(e) => Err(e),
        };
        self.state.write().loading = false;
        result
    }

    /// Sign out locally: clear user, role and both tokens
    ///
    /// Idempotent, and never fails — a failed disk cleanup is logged and
    /// swallowed. No server-side revocation happens.
    pub async fn sign_out(&self) {
        {
            let mut state = self.state.write();
            state.user = None;
            state.role = None;
        }
        self.backend.set_token(None);
        if let Err(e) = self.token_store.clear().await {
            warn!("Failed to clear stored tokens: {}", e);
        }
    }

    /// Send a partial profile update and adopt the server's returned user
    ///
    /// The in-memory user is replaced, not merged, so the store's view of
    /// "self" is always server-authoritative after a write.
    pub async fn update_profile(&self, update: ProfileUpdate) -> ClientResult<User> {
        let user = self.backend.update_profile(&update).await?;
        let mut state = self.state.write();
        state.role = Some(user.role);
        state.user = Some(user.clone());
        Ok(user)
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.state.read().role
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// The signed-in user, or an authentication error
    pub fn require_user(&self) -> ClientResult<User> {
        self.current_user()
            .ok_or_else(|| ClientError::Authentication("Not signed in".to_string()))
    }

    async fn install_session(&self, session: AuthSession) -> ClientResult<User> {
        self.token_store
            .save(&StoredTokens {
                access_token: session.access.clone(),
                refresh_token: session.refresh.clone(),
            })
            .await?;
        self.backend.set_token(Some(session.access));

        let mut state = self.state.write();
        state.role = Some(session.user.role);
        state.user = Some(session.user.clone());
        Ok(session.user)
    }

    async fn clear_session(&self) {
        {
            let mut state = self.state.write();
            state.user = None;
            state.role = None;
        }
        self.backend.set_token(None);
        if let Err(e) = self.token_store.clear().await {
            warn!("Failed to clear stored tokens: {}", e);
        }
    }
}
