//! Authentication coordinator state machine
//!
//! One coordinator per user session. Each user action maps to one
//! transition: select a strategy, begin delegated authorization, submit
//! input, or log out. Validation always runs before protocol execution,
//! execution is an exclusive phase (a second submit while one is in
//! flight is rejected, not queued), and the session store is only ever
//! committed with a complete identity + token + client triple.
//!
//! Phases persisted between interactions:
//! `Unselected -> StrategyChosen -> AwaitingCallback (delegated only)
//!  -> Authenticated`, with `Failed` parking a rejected attempt until the
//! user resubmits. Validating and Executing happen inside `submit`.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use box_auth::{
    AuthError, BoxApi, ClientHandle, Identity, StrategyKind, TokenBundle, strategy, validator,
};
use common::SecretStore;

use crate::error::{Error, Result};
use crate::session::SessionStore;

/// Coordinator phase persisted between user interactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Unselected,
    StrategyChosen(StrategyKind),
    /// Delegated flow: authorization URL issued, waiting for the pasted
    /// redirect URL. The pending anti-forgery token lives in the session.
    AwaitingCallback,
    Authenticated,
    /// A failed attempt, parked until the user resubmits.
    Failed(StrategyKind),
}

/// Strategy-specific input to `submit`.
#[derive(Debug, Clone)]
pub enum StrategyInput {
    /// The full redirect URL pasted by the user (delegated flow).
    CallbackUrl(String),
    /// No further input needed (assertion and static-token flows).
    Execute,
}

/// Drives strategy selection, validation, execution, and session commit
/// for one user session.
pub struct AuthCoordinator {
    api: Arc<dyn BoxApi>,
    secrets: SecretStore,
    session: Arc<SessionStore>,
    phase: RwLock<Phase>,
    /// Single-flight guard: `Executing` is exclusive per session.
    executing: Mutex<()>,
}

impl AuthCoordinator {
    pub fn new(api: Arc<dyn BoxApi>, secrets: SecretStore, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            secrets,
            session,
            phase: RwLock::new(Phase::Unselected),
            executing: Mutex::new(()),
        }
    }

    /// Current coordinator phase.
    pub async fn phase(&self) -> Phase {
        self.phase.read().await.clone()
    }

    /// The session store, for downstream readers.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Choose (or switch) the active strategy.
    ///
    /// Abandons any outstanding delegated attempt: the stale pending
    /// anti-forgery token is discarded, not leaked.
    pub async fn select_strategy(&self, kind: StrategyKind) {
        // Wait out any in-flight attempt; transitions never interleave
        let _guard = self.executing.lock().await;
        self.session.clear_pending().await;
        *self.phase.write().await = Phase::StrategyChosen(kind);
        info!(strategy = kind.label(), "strategy selected");
    }

    /// Start a delegated authorization attempt and return the URL the
    /// user must open. Stores the fresh anti-forgery token as pending,
    /// superseding any stale one.
    pub async fn begin_delegated(&self) -> Result<String> {
        let _guard = self.executing.try_lock().map_err(|_| Error::Busy)?;

        let phase = self.phase.read().await.clone();
        if Self::active_kind(&phase) != Some(StrategyKind::DelegatedCode) {
            return Err(Error::InvalidTransition(
                "select the delegated strategy before beginning authorization".into(),
            ));
        }

        match strategy::begin_authorization(&self.secrets) {
            Ok((url, token)) => {
                self.session.set_pending(token).await;
                *self.phase.write().await = Phase::AwaitingCallback;
                Ok(url)
            }
            Err(e) => {
                *self.phase.write().await = Phase::Failed(StrategyKind::DelegatedCode);
                Err(e.into())
            }
        }
    }

    /// Run the active strategy to completion: validate, execute, verify
    /// identity, commit. All-or-nothing — on any failure the session is
    /// left exactly as it was.
    pub async fn submit(&self, input: StrategyInput) -> Result<()> {
        let _guard = self.executing.try_lock().map_err(|_| Error::Busy)?;

        let phase = self.phase.read().await.clone();
        let kind = Self::active_kind(&phase)
            .ok_or_else(|| Error::InvalidTransition("no strategy selected".into()))?;

        // The gate: no network call happens with incomplete configuration
        if let Err(e) = validator::validate(kind, &self.secrets) {
            *self.phase.write().await = Phase::Failed(kind);
            return Err(e.into());
        }

        let bundle = self.execute(kind, input).await?;

        // Liveness check on the freshly issued token, then commit
        let client = ClientHandle::new(self.api.clone(), bundle.access_token.clone());
        match client.current_user().await {
            Ok(identity) => {
                self.finish(identity, bundle, client).await;
                Ok(())
            }
            Err(e) => {
                warn!(strategy = kind.label(), error = %e, "identity verification failed");
                self.session.clear_pending().await;
                *self.phase.write().await = Phase::Failed(kind);
                Err(e.into())
            }
        }
    }

    /// Reset the session back to unauthenticated. Idempotent.
    pub async fn logout(&self) {
        // Wait out any in-flight attempt; transitions never interleave
        let _guard = self.executing.lock().await;
        self.session.reset().await;
        *self.phase.write().await = Phase::Unselected;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.is_authenticated().await
    }

    pub async fn current_identity(&self) -> Option<Identity> {
        self.session.current_identity().await
    }

    pub async fn current_client(&self) -> Option<ClientHandle> {
        self.session.current_client().await
    }

    /// The strategy an actionable phase is operating on.
    fn active_kind(phase: &Phase) -> Option<StrategyKind> {
        match phase {
            Phase::StrategyChosen(kind) | Phase::Failed(kind) => Some(*kind),
            Phase::AwaitingCallback => Some(StrategyKind::DelegatedCode),
            Phase::Unselected | Phase::Authenticated => None,
        }
    }

    /// Dispatch to the strategy protocol. Failure handling differs per
    /// error class: a malformed callback keeps the attempt open, anything
    /// else parks the phase in `Failed` and invalidates the pending token.
    async fn execute(&self, kind: StrategyKind, input: StrategyInput) -> Result<TokenBundle> {
        match (kind, input) {
            (StrategyKind::DelegatedCode, StrategyInput::CallbackUrl(url)) => {
                let pending = self.session.pending().await.ok_or_else(|| {
                    Error::InvalidTransition(
                        "no authorization attempt in progress; begin authorization first".into(),
                    )
                })?;

                match strategy::complete_authorization(
                    self.api.as_ref(),
                    &self.secrets,
                    &url,
                    &pending,
                )
                .await
                {
                    Ok(bundle) => Ok(bundle),
                    Err(e @ AuthError::MalformedCallback(_)) => {
                        // User-correctable: same pending token, still
                        // awaiting a corrected paste
                        Err(e.into())
                    }
                    Err(e) => {
                        self.session.clear_pending().await;
                        *self.phase.write().await = Phase::Failed(kind);
                        Err(e.into())
                    }
                }
            }
            (StrategyKind::SignedAssertion, StrategyInput::Execute) => {
                match strategy::execute_assertion(self.api.as_ref(), &self.secrets).await {
                    Ok(bundle) => Ok(bundle),
                    Err(e) => {
                        *self.phase.write().await = Phase::Failed(kind);
                        Err(e.into())
                    }
                }
            }
            (StrategyKind::StaticToken, StrategyInput::Execute) => {
                match strategy::execute_static(&self.secrets) {
                    Ok(bundle) => Ok(bundle),
                    Err(e) => {
                        *self.phase.write().await = Phase::Failed(kind);
                        Err(e.into())
                    }
                }
            }
            (kind, _) => Err(Error::InvalidTransition(format!(
                "input does not match the {} strategy",
                kind.label()
            ))),
        }
    }

    async fn finish(&self, identity: Identity, bundle: TokenBundle, client: ClientHandle) {
        self.session.commit(identity, bundle, client).await;
        *self.phase.write().await = Phase::Authenticated;
    }
}
