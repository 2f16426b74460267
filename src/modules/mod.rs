pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod doctors;
pub mod pharmacies;
pub mod users;

pub use self::auth::{SessionError, SessionGuard};
pub use self::categories::{CategoryForm, CategoryService};
pub use self::dashboard::{DashboardCounts, DashboardService};
pub use self::doctors::{DoctorForm, DoctorService};
pub use self::pharmacies::PharmacyService;
pub use self::users::UserService;
