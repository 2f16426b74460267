//! # medadmin Models
//!
//! Domain models and DTOs for the medadmin client.
//!
//! This crate provides the data structures exchanged with the directory
//! backend: decoded resources, create/update payloads, and list filters.
//!
//! # Modules
//!
//! - [`auth`]: Login payloads and the authenticated [`Identity`]
//! - [`categories`]: Doctor categories
//! - [`doctors`]: Doctor profiles and the promote-user payload
//! - [`ids`]: Strongly-typed identifiers
//! - [`pharmacies`]: Pharmacies
//! - [`roles`]: The closed [`Role`] enumeration
//! - [`users`]: User accounts
//! - [`value_types`]: Validated primitives such as [`GeoPoint`]
//!
//! # Example
//!
//! ```ignore
//! use medadmin_models::{Doctor, DoctorFilters, Role};
//!
//! let filters = DoctorFilters {
//!     search: Some("eze".into()),
//!     category_id: None,
//! }
//! .into_filters();
//!
//! let role: Role = "ADMIN".parse()?;
//! assert!(role.is_administrator());
//! ```

pub mod auth;
pub mod categories;
pub mod doctors;
pub mod ids;
pub mod pharmacies;
pub mod roles;
pub mod users;
pub mod value_types;

// Re-export commonly used types at crate root for convenience
pub use auth::{Identity, LoginRequest, LoginResponse};
pub use categories::{Category, CategoryFilters};
pub use doctors::{AssignDoctorDto, Doctor, DoctorFilters};
pub use ids::{CategoryId, DoctorId, ParseIdError, PharmacyId, UserId};
pub use pharmacies::{DEFAULT_OPENING_HOURS, Pharmacy, PharmacyFilters, PharmacyPayload};
pub use roles::{Role, UnknownRole};
pub use users::{CreateUserDto, UpdateUserDto, User, UserFilters};
pub use value_types::{GeoPoint, ValueTypeError};
