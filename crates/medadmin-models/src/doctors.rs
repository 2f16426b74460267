//! Doctor profile models and DTOs.
//!
//! Doctor create/update payloads are multipart forms built in the client
//! crate; this module holds the decoded profile, list filters, and the JSON
//! payload used to promote an existing user account to a doctor.

use chrono::{DateTime, Utc};
use medadmin_core::Filters;
use medadmin_core::serde::{
    deserialize_optional_count, deserialize_optional_decimal, deserialize_optional_string,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::categories::Category;
use crate::ids::{CategoryId, DoctorId, UserId};
use crate::value_types::GeoPoint;

/// A doctor listed in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: DoctorId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Present when the backend joins the category
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub specialization: String,
    #[serde(default, deserialize_with = "deserialize_optional_count")]
    pub years_experience: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_count")]
    pub reviews_count: Option<u64>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub consultation_fee: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub contact_email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub contact_phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub clinic_address: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub available_slots: Vec<DateTime<Utc>>,
    /// Account this profile was promoted from, if any
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Category name when joined, otherwise the raw category id.
    pub fn category_label(&self) -> Option<&str> {
        self.category
            .as_ref()
            .map(|c| c.name.as_str())
            .or_else(|| self.category_id.as_ref().map(|id| id.as_str()))
    }

    /// Case-insensitive match on first name, last name or specialization.
    ///
    /// A blank term matches every doctor.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [&self.first_name, &self.last_name, &self.specialization]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    /// Whether this doctor belongs to `category_id`, by id or joined category.
    pub fn in_category(&self, category_id: &CategoryId) -> bool {
        self.category_id.as_ref() == Some(category_id)
            || self.category.as_ref().map(|c| &c.id) == Some(category_id)
    }
}

/// Filters accepted by the doctors collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorFilters {
    /// Matches first name, last name or specialization
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl DoctorFilters {
    pub fn into_filters(self) -> Filters {
        let mut filters = Filters::new();
        if let Some(search) = self.search {
            filters.set("search", search);
        }
        if let Some(category_id) = self.category_id {
            filters.set("categoryId", category_id.as_str());
        }
        filters
    }
}

/// Payload for `POST /doctors/users/{userId}`, which creates a doctor
/// profile from an existing account.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignDoctorDto {
    #[validate(length(min = 1, message = "Specialization is required"))]
    pub specialization: String,
    pub years_experience: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub bio: String,
    pub languages: Vec<String>,
    #[validate(range(min = 0.0, message = "Consultation fee must not be negative"))]
    pub consultation_fee: f64,
    pub contact_phone: String,
    pub clinic_address: String,
    pub location: GeoPoint,
    #[validate(length(min = 1, message = "Please select a category"))]
    pub category_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available_slots: Vec<DateTime<Utc>>,
    pub user_id: UserId,
}

impl AssignDoctorDto {
    /// An empty form for `user_id`.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            specialization: String::new(),
            years_experience: 0,
            photo_url: None,
            bio: String::new(),
            languages: Vec::new(),
            consultation_fee: 0.0,
            contact_phone: String::new(),
            clinic_address: String::new(),
            location: GeoPoint::default(),
            category_id: String::new(),
            available_slots: Vec::new(),
            user_id,
        }
    }
}
