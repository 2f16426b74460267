use medadmin_core::{ApiError, PageRequest, PageResult};
use medadmin_models::{Pharmacy, PharmacyId, PharmacyPayload};
use tracing::{info, instrument};

use crate::http::{ApiClient, resource_path};
use crate::utils::PageSource;
use crate::validator::validate_form;

pub const PHARMACIES_ENDPOINT: &str = "pharmacies";

#[derive(Debug, Clone)]
pub struct PharmacyService {
    client: ApiClient,
}

impl PharmacyService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, request: &PageRequest) -> Result<PageResult<Pharmacy>, ApiError> {
        self.client.fetch_page(PHARMACIES_ENDPOINT, request).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &PharmacyId) -> Result<Option<Pharmacy>, ApiError> {
        self.client
            .get_optional(&resource_path(PHARMACIES_ENDPOINT, id.as_str()))
            .await
    }

    #[instrument(skip(self, payload), fields(name = %payload.name))]
    pub async fn create(&self, payload: PharmacyPayload) -> Result<Pharmacy, ApiError> {
        let payload = payload.normalized();
        validate_form(&payload)?;
        let pharmacy: Pharmacy = self.client.post(PHARMACIES_ENDPOINT, &payload).await?;
        info!(pharmacy_id = %pharmacy.id, "Pharmacy created");
        Ok(pharmacy)
    }

    #[instrument(skip(self, payload))]
    pub async fn update(
        &self,
        id: &PharmacyId,
        payload: PharmacyPayload,
    ) -> Result<Pharmacy, ApiError> {
        let payload = payload.normalized();
        validate_form(&payload)?;
        let pharmacy = self
            .client
            .patch(&resource_path(PHARMACIES_ENDPOINT, id.as_str()), &payload)
            .await?;
        info!(pharmacy_id = %id, "Pharmacy updated");
        Ok(pharmacy)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &PharmacyId) -> Result<(), ApiError> {
        self.client
            .delete(&resource_path(PHARMACIES_ENDPOINT, id.as_str()))
            .await?;
        info!(pharmacy_id = %id, "Pharmacy deleted");
        Ok(())
    }
}

impl PageSource<Pharmacy> for PharmacyService {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult<Pharmacy>, ApiError> {
        self.list(request).await
    }
}
