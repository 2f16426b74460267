//! Doctor category models.

use medadmin_core::Filters;
use medadmin_core::serde::deserialize_optional_string;
use serde::{Deserialize, Serialize};

use crate::ids::CategoryId;

/// A speciality category doctors are grouped under.
///
/// Categories may be nested through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub icon_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

/// Filters accepted by the categories collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilters {
    pub search: Option<String>,
    pub parent_id: Option<CategoryId>,
}

impl CategoryFilters {
    pub fn into_filters(self) -> Filters {
        let mut filters = Filters::new();
        if let Some(search) = self.search {
            filters.set("search", search);
        }
        if let Some(parent_id) = self.parent_id {
            filters.set("parentId", parent_id.as_str());
        }
        filters
    }
}
