//! Session-scoped credential store
//!
//! Single holder of the authentication status, verified identity, token
//! material, and client handle for one user session. Mutation happens
//! through `commit`/`reset` under a write lock, so readers always observe
//! either the pre- or post-commit snapshot, never a torn one. Token
//! material never leaves the running session through this store.

use box_auth::{AntiForgeryToken, ClientHandle, Identity, TokenBundle};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Authentication status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Unauthenticated,
    Authenticated,
}

/// Snapshot of one user session.
///
/// Invariant: `Authenticated` iff `identity`, `tokens`, and `client` are
/// all present. `pending_anti_forgery` is set only between authorization
/// URL issuance and callback processing; at most one pending value exists.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub status: SessionStatus,
    pub identity: Option<Identity>,
    pub tokens: Option<TokenBundle>,
    pub client: Option<ClientHandle>,
    pub pending_anti_forgery: Option<AntiForgeryToken>,
}

/// Thread-safe session holder, injected wherever session state is read.
#[derive(Default)]
pub struct SessionStore {
    state: RwLock<Session>,
}

impl SessionStore {
    /// Fresh store in the unauthenticated state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically mark the session authenticated.
    ///
    /// Sets identity, tokens, and client together and discards any pending
    /// anti-forgery token — a committed session has no outstanding attempt.
    pub async fn commit(&self, identity: Identity, tokens: TokenBundle, client: ClientHandle) {
        let mut state = self.state.write().await;
        info!(
            user = %identity.name,
            strategy = tokens.issued_for.label(),
            "session authenticated"
        );
        *state = Session {
            status: SessionStatus::Authenticated,
            identity: Some(identity),
            tokens: Some(tokens),
            client: Some(client),
            pending_anti_forgery: None,
        };
    }

    /// Atomically clear every field back to the unauthenticated defaults.
    /// Idempotent.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        if state.status == SessionStatus::Authenticated {
            info!("session logged out");
        }
        *state = Session::default();
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.status == SessionStatus::Authenticated
    }

    pub async fn current_identity(&self) -> Option<Identity> {
        self.state.read().await.identity.clone()
    }

    pub async fn current_client(&self) -> Option<ClientHandle> {
        self.state.read().await.client.clone()
    }

    /// Full point-in-time copy of the session.
    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    /// Store a fresh pending anti-forgery token, superseding any stale one.
    pub async fn set_pending(&self, token: AntiForgeryToken) {
        let mut state = self.state.write().await;
        if state.pending_anti_forgery.is_some() {
            debug!("superseding stale pending anti-forgery token");
        }
        state.pending_anti_forgery = Some(token);
    }

    /// The pending token for the outstanding delegated attempt, if any.
    /// Not consumed — a correctable callback error keeps it valid.
    pub async fn pending(&self) -> Option<AntiForgeryToken> {
        self.state.read().await.pending_anti_forgery.clone()
    }

    /// Invalidate the pending token (attempt completed or failed fatally).
    pub async fn clear_pending(&self) {
        self.state.write().await.pending_anti_forgery = None;
    }
}
