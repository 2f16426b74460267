use medadmin_core::{ApiError, PageRequest, PageResult};
use medadmin_models::{CreateUserDto, UpdateUserDto, User, UserId};
use tracing::{info, instrument};

use crate::http::{ApiClient, resource_path};
use crate::utils::PageSource;
use crate::validator::validate_form;

pub const USERS_ENDPOINT: &str = "users";

#[derive(Debug, Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, request: &PageRequest) -> Result<PageResult<User>, ApiError> {
        self.client.fetch_page(USERS_ENDPOINT, request).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &UserId) -> Result<Option<User>, ApiError> {
        self.client
            .get_optional(&resource_path(USERS_ENDPOINT, id.as_str()))
            .await
    }

    #[instrument(skip(self, dto), fields(email = %dto.email, role = %dto.role))]
    pub async fn create(&self, dto: CreateUserDto) -> Result<User, ApiError> {
        validate_form(&dto)?;
        let user: User = self.client.post(USERS_ENDPOINT, &dto).await?;
        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Sends only the fields that are set. A blank password is never sent.
    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: &UserId, dto: UpdateUserDto) -> Result<User, ApiError> {
        if dto.is_empty() {
            return Err(ApiError::validation(["No changes to save"]));
        }
        validate_form(&dto)?;
        let user = self
            .client
            .patch(&resource_path(USERS_ENDPOINT, id.as_str()), &dto)
            .await?;
        info!(user_id = %id, "User updated");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &UserId) -> Result<(), ApiError> {
        self.client
            .delete(&resource_path(USERS_ENDPOINT, id.as_str()))
            .await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }
}

impl PageSource<User> for UserService {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult<User>, ApiError> {
        self.list(request).await
    }
}
