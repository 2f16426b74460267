use medadmin_core::{ApiError, PageRequest, PageResult};
use medadmin_models::{Category, CategoryId};
use tracing::{info, instrument};

use crate::http::{ApiClient, resource_path};
use crate::modules::categories::form::CategoryForm;
use crate::utils::PageSource;

pub const CATEGORIES_ENDPOINT: &str = "doctors/categories";

/// Page size used when every category is needed, e.g. for a picker.
const ALL_CATEGORIES_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct CategoryService {
    client: ApiClient,
}

impl CategoryService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, request: &PageRequest) -> Result<PageResult<Category>, ApiError> {
        self.client.fetch_page(CATEGORIES_ENDPOINT, request).await
    }

    /// Categories for selection lists.
    pub async fn options(&self) -> Result<Vec<Category>, ApiError> {
        let page = self
            .list(&PageRequest::new(1, ALL_CATEGORIES_LIMIT))
            .await?;
        Ok(page.items)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &CategoryId) -> Result<Option<Category>, ApiError> {
        self.client
            .get_optional(&resource_path(CATEGORIES_ENDPOINT, id.as_str()))
            .await
    }

    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create(&self, form: CategoryForm) -> Result<Category, ApiError> {
        let payload = form.into_payload()?;
        let category: Category = self
            .client
            .post_multipart(CATEGORIES_ENDPOINT, payload)
            .await?;
        info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    #[instrument(skip(self, form))]
    pub async fn update(&self, id: &CategoryId, form: CategoryForm) -> Result<Category, ApiError> {
        let payload = form.into_payload()?;
        let category = self
            .client
            .patch_multipart(&resource_path(CATEGORIES_ENDPOINT, id.as_str()), payload)
            .await?;
        info!(category_id = %id, "Category updated");
        Ok(category)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &CategoryId) -> Result<(), ApiError> {
        self.client
            .delete(&resource_path(CATEGORIES_ENDPOINT, id.as_str()))
            .await?;
        info!(category_id = %id, "Category deleted");
        Ok(())
    }
}

impl PageSource<Category> for CategoryService {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult<Category>, ApiError> {
        self.list(request).await
    }
}
