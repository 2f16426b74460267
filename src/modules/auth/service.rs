use std::sync::Arc;

use medadmin_auth::{AuthState, SessionHandle, StoreError, TokenPair, VerificationOutcome};
use medadmin_core::ApiError;
use medadmin_models::{Identity, LoginRequest, LoginResponse};
use tracing::{info, instrument, warn};

use crate::http::{ApiClient, AuthScope};
use crate::router::{Navigator, Route};

/// Why a login attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Access denied. Admin privileges required.")]
    AccessDenied,

    #[error("Unable to reach the server: {0}")]
    Network(String),

    #[error("Failed to persist session: {0}")]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for SessionError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Network(message) => SessionError::Network(message),
            ApiError::Auth { .. } | ApiError::Validation { .. } | ApiError::NotFound(_) => {
                SessionError::InvalidCredentials
            }
            other => SessionError::Api(other),
        }
    }
}

/// Establishes, verifies and ends the administrator session.
pub struct SessionGuard {
    client: ApiClient,
    navigator: Arc<dyn Navigator>,
}

impl SessionGuard {
    pub fn new(client: ApiClient, navigator: Arc<dyn Navigator>) -> Self {
        Self { client, navigator }
    }

    pub fn session(&self) -> &SessionHandle {
        self.client.session()
    }

    pub fn state(&self) -> AuthState {
        self.session().state()
    }

    /// Verifies the persisted token, if any, against `auth/me`.
    ///
    /// Resolves to `Authenticated` only for an administrator. Any failure
    /// clears the stored tokens. Never fails.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> AuthState {
        let session = self.session();
        let ticket = session.begin_verification();

        let outcome = if session.access_token().is_none() {
            VerificationOutcome::Anonymous
        } else {
            match self
                .client
                .get_with_scope::<Identity>("auth/me", AuthScope::Verify)
                .await
            {
                Ok(identity) if identity.is_administrator() => {
                    VerificationOutcome::Verified(identity)
                }
                Ok(identity) => {
                    warn!(user_id = %identity.id, role = %identity.role, "Stored session is not an administrator");
                    VerificationOutcome::Rejected
                }
                Err(e) => {
                    warn!(error = %e, "Stored session could not be verified");
                    VerificationOutcome::Rejected
                }
            }
        };

        session.complete_verification(ticket, outcome);
        let state = session.state();
        info!(authenticated = state.is_authenticated(), "Session resolved");
        state
    }

    /// Signs in. Only administrators are accepted; nothing is stored otherwise.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        let request = LoginRequest::new(email, password);
        let response: LoginResponse = self
            .client
            .post_with_scope("auth/login", &request, AuthScope::Public)
            .await?;

        if !response.user.is_administrator() {
            warn!(user_id = %response.user.id, role = %response.user.role, "Login rejected: not an administrator");
            return Err(SessionError::AccessDenied);
        }

        let tokens = TokenPair {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        };
        self.session().establish(&tokens, response.user.clone())?;

        info!(user_id = %response.user.id, "Administrator signed in");
        Ok(response.user)
    }

    /// Signs out locally, whatever the backend says, and returns to login.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if self.session().access_token().is_some() {
            if let Err(e) = self.client.post_empty("auth/logout", AuthScope::Verify).await {
                warn!(error = %e, "Logout notification failed");
            }
        }

        self.session().clear();
        info!("Signed out");
        self.navigator.navigate(Route::Login);
    }
}
