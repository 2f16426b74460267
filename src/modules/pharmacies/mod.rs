pub mod service;

pub use service::{PHARMACIES_ENDPOINT, PharmacyService};
