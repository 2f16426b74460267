pub mod service;

pub use service::{DashboardCounts, DashboardService};
