pub mod service;

pub use service::{SessionError, SessionGuard};
