//! service-core: Shared request pipeline and HTTP infrastructure for catalog services.
//!
//! Every inbound request flows through the same stages:
//! authentication → authorization gate → structural validation →
//! business validation (notifier) → persistence → response shaping.
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod outcome;
pub mod validation;

pub use async_trait;
pub use axum;
pub use mongodb;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tower;
pub use tower_http;
pub use tracing;
pub use validator;
