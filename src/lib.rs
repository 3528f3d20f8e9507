//! Real-estate agent backend: users, property listings and buyer messages,
//! gated by an attribute based permission model.
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod models;
pub mod permissions;
pub mod search;
pub mod store;
pub mod validation;

pub use app::{build_router, AppState};
pub use config::AppConfig;
