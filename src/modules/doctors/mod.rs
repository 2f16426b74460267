pub mod form;
pub mod service;

pub use form::DoctorForm;
pub use service::{DOCTORS_ENDPOINT, DoctorService};
