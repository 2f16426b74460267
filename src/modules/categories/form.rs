use medadmin_core::{ApiError, FileUpload};
use medadmin_models::Category;
use validator::Validate;

use crate::http::MultipartPayload;
use crate::validator::validate_form;

/// Create/edit form for a doctor category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    /// New icon; `None` keeps the current one on update
    pub icon: Option<FileUpload>,
}

impl CategoryForm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Prefills an edit form. The icon is left empty.
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
            parent_id: category.parent_id.as_ref().map(|id| id.to_string()),
            icon: None,
        }
    }

    pub fn into_payload(mut self) -> Result<MultipartPayload, ApiError> {
        self.name = self.name.trim().to_string();
        validate_form(&self)?;

        Ok(MultipartPayload::new()
            .text("name", &self.name)
            .text_opt("description", self.description)
            .text_opt("parentId", self.parent_id)
            .file("icon", self.icon))
    }
}
