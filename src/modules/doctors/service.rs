use medadmin_core::{ApiError, PageRequest, PageResult};
use medadmin_models::{AssignDoctorDto, Doctor, DoctorId};
use tracing::{info, instrument};

use crate::http::{ApiClient, resource_path};
use crate::modules::doctors::form::DoctorForm;
use crate::utils::PageSource;
use crate::validator::validate_form;

pub const DOCTORS_ENDPOINT: &str = "doctors";

#[derive(Debug, Clone)]
pub struct DoctorService {
    client: ApiClient,
}

impl DoctorService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, request: &PageRequest) -> Result<PageResult<Doctor>, ApiError> {
        self.client.fetch_page(DOCTORS_ENDPOINT, request).await
    }

    /// `Ok(None)` when no doctor has this id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &DoctorId) -> Result<Option<Doctor>, ApiError> {
        self.client
            .get_optional(&resource_path(DOCTORS_ENDPOINT, id.as_str()))
            .await
    }

    #[instrument(skip(self, form), fields(name = %form.first_name))]
    pub async fn create(&self, form: DoctorForm) -> Result<Doctor, ApiError> {
        let payload = form.into_payload()?;
        let doctor: Doctor = self.client.post_multipart(DOCTORS_ENDPOINT, payload).await?;
        info!(doctor_id = %doctor.id, "Doctor created");
        Ok(doctor)
    }

    #[instrument(skip(self, form))]
    pub async fn update(&self, id: &DoctorId, form: DoctorForm) -> Result<Doctor, ApiError> {
        let payload = form.into_payload()?;
        let doctor = self
            .client
            .patch_multipart(&resource_path(DOCTORS_ENDPOINT, id.as_str()), payload)
            .await?;
        info!(doctor_id = %id, "Doctor updated");
        Ok(doctor)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &DoctorId) -> Result<(), ApiError> {
        self.client
            .delete(&resource_path(DOCTORS_ENDPOINT, id.as_str()))
            .await?;
        info!(doctor_id = %id, "Doctor deleted");
        Ok(())
    }

    /// Creates a doctor profile for an existing account.
    #[instrument(skip(self, dto), fields(user_id = %dto.user_id))]
    pub async fn assign_to_user(&self, dto: &AssignDoctorDto) -> Result<Doctor, ApiError> {
        validate_form(dto)?;
        let doctor: Doctor = self
            .client
            .post(
                &resource_path(&format!("{}/users", DOCTORS_ENDPOINT), dto.user_id.as_str()),
                dto,
            )
            .await?;
        info!(doctor_id = %doctor.id, user_id = %dto.user_id, "User promoted to doctor");
        Ok(doctor)
    }
}

impl PageSource<Doctor> for DoctorService {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult<Doctor>, ApiError> {
        self.list(request).await
    }
}
