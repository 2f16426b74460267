pub mod service;

pub use service::{USERS_ENDPOINT, UserService};
