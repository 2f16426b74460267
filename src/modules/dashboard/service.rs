use medadmin_core::{ApiError, PageRequest};
use serde::Serialize;
use tracing::instrument;

use crate::http::ApiClient;
use crate::modules::categories::CATEGORIES_ENDPOINT;
use crate::modules::doctors::DOCTORS_ENDPOINT;
use crate::modules::pharmacies::PHARMACIES_ENDPOINT;
use crate::modules::users::USERS_ENDPOINT;

/// Record counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    pub doctors: u64,
    pub pharmacies: u64,
    pub categories: u64,
    pub users: u64,
}

#[derive(Debug, Clone)]
pub struct DashboardService {
    client: ApiClient,
}

impl DashboardService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn count(&self, endpoint: &str) -> Result<u64, ApiError> {
        let page = self
            .client
            .fetch_page::<serde_json::Value>(endpoint, &PageRequest::new(1, 1))
            .await?;
        Ok(page.total_count)
    }

    /// Fetches all four counts concurrently. The first failure wins.
    #[instrument(skip(self))]
    pub async fn counts(&self) -> Result<DashboardCounts, ApiError> {
        let (doctors, pharmacies, categories, users) = tokio::try_join!(
            self.count(DOCTORS_ENDPOINT),
            self.count(PHARMACIES_ENDPOINT),
            self.count(CATEGORIES_ENDPOINT),
            self.count(USERS_ENDPOINT),
        )?;

        Ok(DashboardCounts {
            doctors,
            pharmacies,
            categories,
            users,
        })
    }
}
