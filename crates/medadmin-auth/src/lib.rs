//! # medadmin Auth
//!
//! Session bookkeeping for the medadmin client.
//!
//! This crate provides:
//!
//! - [`store`]: Persistent storage for the access/refresh token pair
//! - [`session`]: The shared [`SessionHandle`] and its [`AuthState`] machine
//! - [`claims`]: Unverified inspection of access token claims
//!
//! The HTTP side of authentication (login, `whoami`, logout) lives in the
//! client crate; this crate only tracks what those calls produced.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use medadmin_auth::{FileTokenStore, SessionHandle, VerificationOutcome};
//!
//! let store = Arc::new(FileTokenStore::open("storage/session.json"));
//! let session = SessionHandle::new(store);
//!
//! let ticket = session.begin_verification();
//! // ... call whoami ...
//! session.complete_verification(ticket, VerificationOutcome::Verified(identity));
//! assert!(session.state().is_authenticated());
//! ```

pub mod claims;
pub mod session;
pub mod store;

// Re-export commonly used types at crate root
pub use claims::{AccessClaims, ClaimsError, peek_claims};
pub use session::{AuthState, SessionHandle, Verification, VerificationOutcome};
pub use store::{
    ACCESS_TOKEN_KEY, FileTokenStore, MemoryTokenStore, REFRESH_TOKEN_KEY, StoreError, TokenPair,
    TokenStore,
};
