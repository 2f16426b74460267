//! Session state shared across the client.
//!
//! [`SessionHandle`] owns the token store and the current [`AuthState`].
//! Handles are cheap to clone; every clone observes the same session.
//!
//! # State machine
//!
//! ```text
//!                 begin_verification
//!   (any) ───────────────────────────────▶ Unresolved
//!   Unresolved ── Verified ──────────────▶ Authenticated
//!   Unresolved ── Rejected / Anonymous ──▶ Unauthenticated
//!   Authenticated ── clear / expire ─────▶ Unauthenticated
//!   (any) ── establish (login) ──────────▶ Authenticated
//! ```
//!
//! Every transition bumps an epoch. A verification result is applied only if
//! the epoch still matches the one captured when the verification began, so a
//! slow `whoami` response cannot overwrite a login or logout that completed
//! while it was in flight.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use medadmin_models::Identity;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, StoreError, TokenPair, TokenStore};

/// Authentication state observed by route gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Startup verification has not finished.
    Unresolved,
    /// A verified administrator is signed in.
    Authenticated(Identity),
    /// No usable session.
    Unauthenticated,
}

impl AuthState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, AuthState::Unresolved)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Ticket returned by [`SessionHandle::begin_verification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Verification {
    epoch: u64,
}

/// Result of verifying a stored token against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The token belongs to an administrator.
    Verified(Identity),
    /// The token was rejected or belongs to a non-administrator.
    Rejected,
    /// There was no token to verify.
    Anonymous,
}

struct Inner {
    store: Arc<dyn TokenStore>,
    state: watch::Sender<AuthState>,
    epoch: AtomicU64,
    transition: Mutex<()>,
}

/// Shared handle to the session.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Inner>,
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("state", &*self.inner.state.borrow())
            .field("epoch", &self.inner.epoch.load(Ordering::SeqCst))
            .finish()
    }
}

impl SessionHandle {
    /// Creates a session in the [`AuthState::Unresolved`] state.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(AuthState::Unresolved);
        Self {
            inner: Arc::new(Inner {
                store,
                state,
                epoch: AtomicU64::new(0),
                transition: Mutex::new(()),
            }),
        }
    }

    fn lock_transition(&self) -> MutexGuard<'_, ()> {
        self.inner
            .transition
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn bump_epoch(&self) -> u64 {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.borrow().identity().cloned()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner.store.get(REFRESH_TOKEN_KEY)
    }

    /// Enters [`AuthState::Unresolved`] and returns a ticket for the result.
    pub fn begin_verification(&self) -> Verification {
        let _guard = self.lock_transition();
        let epoch = self.bump_epoch();
        self.inner.state.send_replace(AuthState::Unresolved);
        Verification { epoch }
    }

    /// Applies a verification result unless the session changed meanwhile.
    ///
    /// Returns `false` when the result was discarded as stale.
    pub fn complete_verification(
        &self,
        ticket: Verification,
        outcome: VerificationOutcome,
    ) -> bool {
        let _guard = self.lock_transition();
        if self.inner.epoch.load(Ordering::SeqCst) != ticket.epoch {
            info!("Discarding stale session verification");
            return false;
        }

        match outcome {
            VerificationOutcome::Verified(identity) => {
                self.inner
                    .state
                    .send_replace(AuthState::Authenticated(identity));
            }
            VerificationOutcome::Rejected => {
                self.remove_tokens();
                self.inner.state.send_replace(AuthState::Unauthenticated);
            }
            VerificationOutcome::Anonymous => {
                self.inner.state.send_replace(AuthState::Unauthenticated);
            }
        }
        true
    }

    /// Persists a new token pair and marks `identity` as signed in.
    ///
    /// Nothing changes if the tokens cannot be written.
    pub fn establish(&self, tokens: &TokenPair, identity: Identity) -> Result<(), StoreError> {
        let _guard = self.lock_transition();

        match &tokens.refresh_token {
            Some(refresh) => self.inner.store.set(&[
                (ACCESS_TOKEN_KEY, tokens.access_token.as_str()),
                (REFRESH_TOKEN_KEY, refresh.as_str()),
            ])?,
            None => {
                self.inner
                    .store
                    .set(&[(ACCESS_TOKEN_KEY, tokens.access_token.as_str())])?;
                if let Err(e) = self.inner.store.remove(&[REFRESH_TOKEN_KEY]) {
                    warn!(error = %e, "Failed to drop previous refresh token");
                }
            }
        }

        self.bump_epoch();
        self.inner
            .state
            .send_replace(AuthState::Authenticated(identity));
        Ok(())
    }

    /// Clears both tokens and the identity.
    pub fn clear(&self) {
        let _guard = self.lock_transition();
        self.bump_epoch();
        self.remove_tokens();
        self.inner.state.send_replace(AuthState::Unauthenticated);
    }

    /// Forced logout after the backend rejected the bearer token.
    ///
    /// Returns `true` if there was a session to end.
    pub fn expire(&self) -> bool {
        let had_session = self.state().is_authenticated() || self.access_token().is_some();
        if had_session {
            warn!("Session rejected by the backend, signing out");
            self.clear();
        }
        had_session
    }

    fn remove_tokens(&self) {
        if let Err(e) = self
            .inner
            .store
            .remove(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])
        {
            warn!(error = %e, "Failed to clear persisted tokens");
        }
    }
}
