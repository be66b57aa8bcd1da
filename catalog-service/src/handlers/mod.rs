pub mod health;
pub mod products;
pub mod suppliers;

pub use health::{health_check, metrics, readiness_check};

/// Raised when the id in the path and the id in the body disagree.
pub const IDS_DO_NOT_MATCH: &str = "ids do not match";
