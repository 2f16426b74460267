//! Pharmacy models and DTOs.

use medadmin_core::Filters;
use medadmin_core::serde::deserialize_optional_string;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ids::PharmacyId;
use crate::value_types::GeoPoint;

/// Opening hours assumed when none are entered.
pub const DEFAULT_OPENING_HOURS: &str = "9:00-18:00";

fn default_opening_hours() -> String {
    DEFAULT_OPENING_HOURS.to_string()
}

/// A pharmacy listed in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pharmacy {
    pub id: PharmacyId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub city: Option<String>,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default = "default_opening_hours")]
    pub opening_hours: String,
    #[serde(default, rename = "is24h")]
    pub is_24h: bool,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

/// Create/update payload. Coordinates are sent as flat fields.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub contact_phone: String,
    #[validate(email(message = "A valid contact email is required"))]
    pub contact_email: String,
    pub opening_hours: String,
    #[serde(rename = "is24h")]
    pub is_24h: bool,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
}

impl Default for PharmacyPayload {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            city: None,
            contact_phone: String::new(),
            contact_email: String::new(),
            opening_hours: default_opening_hours(),
            is_24h: false,
            latitude: 0.0,
            longitude: 0.0,
        }
    }
}

impl PharmacyPayload {
    /// Prefills an edit form from an existing pharmacy.
    pub fn from_pharmacy(pharmacy: &Pharmacy) -> Self {
        let location = pharmacy.location.unwrap_or_default();
        Self {
            name: pharmacy.name.clone(),
            address: pharmacy.address.clone(),
            city: pharmacy.city.clone(),
            contact_phone: pharmacy.contact_phone.clone(),
            contact_email: pharmacy.contact_email.clone(),
            opening_hours: pharmacy.opening_hours.clone(),
            is_24h: pharmacy.is_24h,
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }

    /// Blank opening hours fall back to [`DEFAULT_OPENING_HOURS`] and a
    /// blank city is dropped.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.opening_hours.trim().is_empty() {
            self.opening_hours = default_opening_hours();
        }
        self.city = self.city.filter(|c| !c.trim().is_empty());
        self
    }
}

/// Filters accepted by the pharmacies collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PharmacyFilters {
    pub search: Option<String>,
    pub city: Option<String>,
}

impl PharmacyFilters {
    pub fn into_filters(self) -> Filters {
        let mut filters = Filters::new();
        if let Some(search) = self.search {
            filters.set("search", search);
        }
        if let Some(city) = self.city {
            filters.set("city", city);
        }
        filters
    }
}
