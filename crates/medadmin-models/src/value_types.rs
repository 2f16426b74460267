//! Strongly-typed value types with validation for domain primitives.
//!
//! # Example
//!
//! ```ignore
//! use medadmin_models::value_types::GeoPoint;
//!
//! let clinic = GeoPoint::new(6.5244, 3.3792)?;
//! assert!(GeoPoint::new(91.0, 0.0).is_err());
//! ```

use medadmin_core::serde::deserialize_decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error type for value type parsing failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueTypeError {
    #[error("Latitude must be between -90 and 90, got {0}")]
    InvalidLatitude(f64),
    #[error("Longitude must be between -180 and 180, got {0}")]
    InvalidLongitude(f64),
}

/// A geographic coordinate.
///
/// Coordinates in responses may arrive as numeric strings.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(deserialize_with = "deserialize_decimal")]
    pub latitude: f64,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a coordinate, validating both ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValueTypeError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValueTypeError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValueTypeError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Debug for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeoPoint({}, {})", self.latitude, self.longitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}
