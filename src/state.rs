use std::sync::Arc;

use medadmin_auth::{FileTokenStore, SessionHandle, TokenStore};
use medadmin_config::{ApiConfig, SessionConfig};
use medadmin_core::ApiError;

use crate::http::ApiClient;
use crate::modules::{
    CategoryService, DashboardService, DoctorService, PharmacyService, SessionGuard, UserService,
};
use crate::router::Navigator;

/// Shared client state: configuration, session and the HTTP client.
#[derive(Clone, Debug)]
pub struct AppState {
    pub api_config: ApiConfig,
    pub session: SessionHandle,
    pub client: ApiClient,
}

impl AppState {
    pub fn new(api_config: ApiConfig, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let session = SessionHandle::new(store);
        let client = ApiClient::new(&api_config, session.clone())?;
        Ok(Self {
            api_config,
            session,
            client,
        })
    }

    pub fn session_guard(&self, navigator: Arc<dyn Navigator>) -> SessionGuard {
        SessionGuard::new(self.client.clone(), navigator)
    }

    pub fn doctors(&self) -> DoctorService {
        DoctorService::new(self.client.clone())
    }

    pub fn categories(&self) -> CategoryService {
        CategoryService::new(self.client.clone())
    }

    pub fn pharmacies(&self) -> PharmacyService {
        PharmacyService::new(self.client.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.client.clone())
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.client.clone())
    }
}

/// Builds the state with the token pair persisted on disk.
pub fn init_app_state(
    api_config: ApiConfig,
    session_config: &SessionConfig,
) -> Result<AppState, ApiError> {
    let store = Arc::new(FileTokenStore::from_config(session_config));
    AppState::new(api_config, store)
}
