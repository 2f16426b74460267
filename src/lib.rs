//! # medadmin
//!
//! Administrative client for a healthcare directory backend. It manages the
//! doctors, doctor categories, pharmacies and user accounts the backend
//! serves, on behalf of a signed-in administrator.
//!
//! ## Overview
//!
//! - **Session guard**: login, logout and verification of a persisted token
//!   pair; only administrators may hold a session
//! - **Paginated lists**: page/size/filter state per collection, where the
//!   most recently requested page always wins
//! - **Resource services**: typed create/read/update/delete per collection,
//!   with multipart submissions for doctors and categories
//! - **CLI**: the `medadmin` binary drives all of the above from a terminal
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── cli/              # clap commands, dialoguer prompts, output
//! ├── http/             # reqwest client and multipart payloads
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Session guard (login, verify, logout)
//! │   ├── doctors/     # Doctors and the promote-user flow
//! │   ├── categories/  # Doctor categories
//! │   ├── pharmacies/  # Pharmacies
//! │   ├── users/       # User accounts
//! │   └── dashboard/   # Record counts
//! ├── utils/            # List view state machine
//! ├── router.rs         # Routes and session gating
//! └── state.rs          # Shared client state
//! ```
//!
//! Workspace crates:
//!
//! - [`medadmin_core`]: error taxonomy, pagination, uploads
//! - [`medadmin_config`]: environment configuration
//! - [`medadmin_models`]: resource models and DTOs
//! - [`medadmin_auth`]: token storage and session state
//!
//! ## Environment Variables
//!
//! ```bash
//! MEDADMIN_API_URL=http://localhost:3000/api
//! MEDADMIN_HTTP_TIMEOUT_SECS=30
//! MEDADMIN_PAGE_SIZE=10
//! MEDADMIN_SESSION_FILE=storage/session.json
//! MEDADMIN_LOG_DIR=storage/logs
//! LOG_LEVEL=info
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use medadmin::state::init_app_state;
//!
//! let state = init_app_state(ApiConfig::from_env(), &SessionConfig::from_env())?;
//! let guard = state.session_guard(Arc::new(navigator));
//!
//! guard.login("admin@example.com", "secret").await?;
//! let page = state.doctors().list(&PageRequest::new(1, 10)).await?;
//! ```

pub mod cli;
pub mod http;
pub mod logging;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

// Re-export workspace crates for convenience
pub use medadmin_auth;
pub use medadmin_config;
pub use medadmin_core;
pub use medadmin_models;
