pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod rules;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
