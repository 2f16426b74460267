pub mod form;
pub mod service;

pub use form::CategoryForm;
pub use service::{CATEGORIES_ENDPOINT, CategoryService};
